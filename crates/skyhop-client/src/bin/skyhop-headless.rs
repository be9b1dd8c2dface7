use tracing_subscriber::EnvFilter;

use skyhop_client::config::ClientConfig;
use skyhop_client::headless_loop;
use skyhop_client::resources::SpriteKey;
use skyhop_platformer::config::PlatformerConfig;

/// Host frame interval (60 Hz display).
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frame at which sprite decoding "finishes" on this fake host.
const SPRITES_READY_AT: u64 = 30;

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(v) => v.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {name}={v}: {e}, using {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Scripted keyboard: run right the whole time, hop every second.
fn script(frame: u64) -> (&'static [&'static str], &'static [&'static str]) {
    match frame % 60 {
        0 if frame == 0 => (&["KeyD"], &[]),
        0 => (&["Space"], &[]),
        12 => (&[], &["Space"]),
        _ => (&[], &[]),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Skyhop headless demo starting");

    let game = PlatformerConfig::load();
    let client = ClientConfig::load();
    let frames = env_u64("SKYHOP_FRAMES", 600);
    let print_every = env_u64("SKYHOP_PRINT_EVERY", 120).max(1);

    let mut lp = headless_loop(game, &client);
    for frame in 0..frames {
        let (down, up) = script(frame);
        for code in down {
            lp.key_down(code);
        }
        for code in up {
            lp.key_up(code);
        }
        if frame == SPRITES_READY_AT {
            let sprites = lp.renderer_mut().scene_renderer_mut().sprites_mut();
            for key in SpriteKey::ALL {
                sprites.mark_ready(key);
            }
        }

        if let Err(e) = lp.guarded_frame(frame as f64 * FRAME_MS) {
            eprintln!("{e}");
            std::process::exit(1);
        }

        if frame % print_every == 0 {
            println!("--- frame {frame} ---");
            println!("{}", lp.renderer().last_frame());
        }
    }

    let world = lp.sim().world();
    println!(
        "Coins: {}/{}  won: {}  tick: {}",
        world.collected_count,
        world.total_coins(),
        lp.sim().is_won(),
        lp.sim().state().tick,
    );
}
