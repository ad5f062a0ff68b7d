use isoframe::backend::{load_tilemap, MacroquadBackend, MacroquadEvents};
use isoframe::{CameraController, EngineConfig, GameContext};
use macroquad::window::Conf;
use std::cell::RefCell;
use std::rc::Rc;

const CONFIG_PATH: &str = "assets/engine.json";

fn config() -> EngineConfig {
    EngineConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        eprintln!("using default config: {e}");
        EngineConfig {
            title: "Isometric Tilemap".into(),
            target_fps: 100,
            ..EngineConfig::default()
        }
    })
}

fn window_conf() -> Conf {
    Conf::from(&config())
}

// Left drag pans, right drag zooms, middle click resets the zoom, Esc quits.
#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "isometric demo failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/map.json".into());
    let map = load_tilemap(&path).await?;

    let mut ctx = GameContext::new(MacroquadBackend::new(), MacroquadEvents::new(), config())?;
    ctx.dispatcher
        .add_pointer_target(Rc::new(RefCell::new(CameraController::new())));
    ctx.add_renderable(map);

    ctx.run_async().await?;
    Ok(())
}
