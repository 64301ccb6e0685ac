//! # Room Viewer
//!
//! Loads an OBJ room and runs the interactive viewer in a window.
//!
//! ```text
//! cargo run --example room_viewer -- room.obj [viewer.toml]
//! RUST_LOG=roomfolio=debug cargo run --example room_viewer -- room.obj
//! ```
//!
//! Controls:
//! • Move the mouse over objects to see hover feedback
//! • Left click a social icon to open its link, or a button to open a panel
//! • Escape, or a click or tap anywhere while a panel is open, closes it
//! • Drag to orbit, scroll to zoom

use std::time::Instant;

use anyhow::{Context, Result};
use roomfolio::prelude::*;

/// Stand-in renderer that reports frame rate and panel state to the log
struct FrameLogger {
    window_start: Instant,
    frames: u32,
}

impl SceneRenderer for FrameLogger {
    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Viewport {width}x{height}");
    }

    fn render(&mut self, world: &World, _camera: CameraUniform) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed < 1.0 {
            return;
        }

        let open: Vec<String> = PanelId::ALL
            .into_iter()
            .filter(|panel| world.panel(*panel).visible)
            .map(|panel| panel.to_string())
            .collect();
        log::info!(
            "{:.0} fps, {} nodes, panels shown: {:?}",
            self.frames as f32 / elapsed,
            world.scene.len(),
            open
        );
        self.frames = 0;
        self.window_start = Instant::now();
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let model = args
        .next()
        .context("usage: room_viewer <model.obj> [config.toml]")?;

    let config = match args.next() {
        Some(path) => ViewerConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ViewerConfig::default(),
    };

    let mut app = RoomViewerApp::new(&config)
        .context("creating viewer")?
        .with_title(format!("Roomfolio - {model}"));
    app.load_model(&model)
        .with_context(|| format!("loading model {model}"))?;
    log::info!(
        "Registered {} interactive objects",
        app.viewer().registry().len()
    );

    app.set_renderer(FrameLogger {
        window_start: Instant::now(),
        frames: 0,
    });

    app.run().context("running viewer")?;
    Ok(())
}
