use serde::{Deserialize, Serialize};

use skyhop_core::input::KeyBindings;

/// Frame loop timing and safe-mode thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    /// Elapsed time per frame is clamped to this, so a long stall (tab in the
    /// background, debugger) never triggers a burst of catch-up steps.
    pub max_frame_ms: f64,
    /// Length of the FPS measurement window.
    pub fps_window_ms: f64,
    /// Enter safe mode when a window measures below this rate.
    pub safe_mode_fps: f32,
    /// Leave safe mode when a window measures at or above this rate.
    pub recover_fps: f32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            max_frame_ms: 1000.0,
            fps_window_ms: 1000.0,
            safe_mode_fps: 40.0,
            recover_fps: 50.0,
        }
    }
}

/// Size of the ASCII frame produced by the text renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub cols: usize,
    pub rows: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Host-side configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "loop")]
    pub frame_loop: LoopSettings,
    pub bindings: KeyBindings,
    pub text: TextSettings,
    /// JSON theme file. The built-in palette is used when unset or unreadable.
    pub theme_path: Option<String>,
    /// Seed for cosmetic randomness (blink timers, coin phases).
    pub animation_seed: Option<u64>,
}

impl ClientConfig {
    /// Load config from `SKYHOP_CLIENT_CONFIG` or `config/client.toml`. Falls
    /// back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYHOP_CLIENT_CONFIG")
            .unwrap_or_else(|_| "config/client.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "loaded client config");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    ClientConfig::default()
                },
            },
            Err(_) => ClientConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ClientConfig>(content).map(Self::sanitized)
    }

    pub fn sanitized(mut self) -> Self {
        let defaults = LoopSettings::default();
        let lp = &mut self.frame_loop;
        if !(lp.max_frame_ms.is_finite() && lp.max_frame_ms > 0.0) {
            tracing::warn!(max_frame_ms = lp.max_frame_ms, "invalid frame clamp, using default");
            lp.max_frame_ms = defaults.max_frame_ms;
        }
        if !(lp.fps_window_ms.is_finite() && lp.fps_window_ms > 0.0) {
            tracing::warn!(fps_window_ms = lp.fps_window_ms, "invalid FPS window, using default");
            lp.fps_window_ms = defaults.fps_window_ms;
        }
        if lp.recover_fps < lp.safe_mode_fps {
            tracing::warn!(
                safe_mode_fps = lp.safe_mode_fps,
                recover_fps = lp.recover_fps,
                "recover_fps below safe_mode_fps, raising it"
            );
            lp.recover_fps = lp.safe_mode_fps;
        }
        self.text.cols = self.text.cols.max(1);
        self.text.rows = self.text.rows.max(1);
        self
    }
}
