use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Visual theme, loadable from JSON. All colors are RGBA `[f32; 4]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub sky: SkyTheme,
    pub background: BackgroundTheme,
    pub platform: PlatformTheme,
    pub player: ActorTheme,
    pub enemy: ActorTheme,
    pub coin: CoinTheme,
    pub hud: HudTheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyTheme {
    pub top: [f32; 4],
    pub bottom: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundTheme {
    pub hills: [f32; 4],
    pub clouds: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTheme {
    pub body_top: [f32; 4],
    pub body_bottom: [f32; 4],
    /// Single body color used in safe mode.
    pub body_flat: [f32; 4],
    pub grass_top: [f32; 4],
    pub grass_bottom: [f32; 4],
    /// Width of one repeated platform tile in px.
    pub tile_width: f32,
    /// Height of the grass strip on top of each tile in px.
    pub grass_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTheme {
    pub body: [f32; 4],
    pub eyes: [f32; 4],
    pub corner_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinTheme {
    pub fill: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudTheme {
    pub text: [f32; 4],
    pub font_px: f32,
    pub controls_hint: String,
}

// --- Default implementations matching the built-in palette ---

impl Default for Theme {
    fn default() -> Self {
        Self {
            sky: SkyTheme::default(),
            background: BackgroundTheme::default(),
            platform: PlatformTheme::default(),
            player: ActorTheme::default(),
            enemy: ActorTheme {
                body: [1.0, 0.2, 0.2, 1.0],
                ..ActorTheme::default()
            },
            coin: CoinTheme::default(),
            hud: HudTheme::default(),
        }
    }
}

impl Default for SkyTheme {
    fn default() -> Self {
        Self {
            top: [0.53, 0.81, 0.92, 1.0],
            bottom: [0.88, 0.96, 1.0, 1.0],
        }
    }
}

impl Default for BackgroundTheme {
    fn default() -> Self {
        Self {
            hills: [0.42, 0.56, 0.42, 1.0],
            clouds: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Default for PlatformTheme {
    fn default() -> Self {
        Self {
            body_top: [0.65, 0.43, 0.17, 1.0],
            body_bottom: [0.36, 0.23, 0.1, 1.0],
            body_flat: [0.55, 0.35, 0.17, 1.0],
            grass_top: [0.25, 0.76, 0.25, 1.0],
            grass_bottom: [0.17, 0.61, 0.17, 1.0],
            tile_width: 48.0,
            grass_height: 8.0,
        }
    }
}

impl Default for ActorTheme {
    /// Player palette; enemies override the body color.
    fn default() -> Self {
        Self {
            body: [0.2, 0.8, 0.2, 1.0],
            eyes: [0.0, 0.0, 0.0, 1.0],
            corner_radius: 10.0,
        }
    }
}

impl Default for CoinTheme {
    fn default() -> Self {
        Self {
            fill: [1.0, 0.84, 0.0, 1.0],
        }
    }
}

impl Default for HudTheme {
    fn default() -> Self {
        Self {
            text: [1.0, 1.0, 1.0, 1.0],
            font_px: 20.0,
            controls_hint: "WASD/Arrows to move, Space to jump".to_string(),
        }
    }
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a theme file, falling back to the built-in palette.
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(theme) => {
                    tracing::info!(path, "loaded theme");
                    theme
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(e) => {
                tracing::warn!("Failed to read {path}: {e}, using defaults");
                Self::default()
            },
        }
    }
}

/// Convert an RGBA `[f32; 4]` array to a color vector.
pub fn rgba(c: &[f32; 4]) -> Vec4 {
    Vec4::from_array(*c)
}
