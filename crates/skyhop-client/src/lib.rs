pub mod config;
pub mod effects;
pub mod frame_loop;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod text_renderer;
pub mod theme;

use skyhop_platformer::Session;
use skyhop_platformer::config::PlatformerConfig;

use config::ClientConfig;
use effects::AnimationTable;
use frame_loop::FrameLoop;
use renderer::SceneRenderer;
use text_renderer::TextRenderer;
use theme::Theme;

/// Frame loop driving a session into the ASCII renderer.
pub type HeadlessLoop = FrameLoop<Session, TextRenderer>;

/// Wire a session, theme, animation table and text renderer together.
pub fn headless_loop(game: PlatformerConfig, client: &ClientConfig) -> HeadlessLoop {
    let theme = Theme::load(client.theme_path.as_deref());
    let anim = match client.animation_seed {
        Some(seed) => AnimationTable::with_seed(seed),
        None => AnimationTable::new(),
    };
    let scene = SceneRenderer::new(theme, anim, game.viewport_width);
    let renderer = TextRenderer::new(scene, &client.text);
    FrameLoop::new(
        Session::new(game),
        renderer,
        client.bindings.clone(),
        client.frame_loop.clone(),
    )
}
