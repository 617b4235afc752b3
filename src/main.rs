//! EMBERFIELD: a top-down fire-spread arena
//!
//! One keyboard-driven player and a pack of wandering enemies roam a
//! burning 200x200 meadow. Fire spreads as a cellular automaton over a
//! CPU pixel buffer committed to a GPU texture each frame; moving actors
//! stamp the ground back out around themselves. Simulation runs on a
//! fixed 1/60s timestep decoupled from rendering by an accumulator.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod config;
mod fire;
mod game;
mod render;
mod scene;
mod surface;
mod timestep;

use macroquad::prelude::*;

use config::GameConfig;
use scene::GameScene;

fn window_conf() -> Conf {
    let config = GameConfig::load_or_default(config::DEFAULT_PATH);
    Conf {
        window_title: format!("emberfield v{}", VERSION),
        window_width: config.window.width,
        window_height: config.window.height,
        fullscreen: config.window.fullscreen,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = GameConfig::load_or_default(config::DEFAULT_PATH);
    info!("emberfield v{} starting", VERSION);

    // `::rand`, not the prelude's quad-rand module of the same name
    let mut scene = GameScene::new(&config, ::rand::random());

    loop {
        scene.frame();
        if scene.close_requested() {
            break;
        }
        next_frame().await;
    }

    scene.discard();
}
