//! Water plane viewer - egui window around the tessellated plane

mod app;
mod launch;
mod settings;
mod viewport;

pub use app::plane_config;
pub use launch::{Command, LaunchOptions, Verbosity, USAGE};
pub use settings::Settings;

use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Run the viewer with the given command-line overrides
pub fn run(options: LaunchOptions) -> Result<()> {
    // egui/eframe still log through the `log` crate
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();

    let trace_guard = init_tracing(options.verbosity);

    // Friendly panic handler for GL errors
    std::panic::set_hook(Box::new(|info| {
        let msg = info
            .payload()
            .downcast_ref::<String>()
            .map(|s| s.as_str())
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("Unknown error");

        if msg.contains("glow") || msg.contains("GL") || msg.contains("shader") {
            eprintln!("\n[GL Error] {}", msg);
            eprintln!("\nThe driver rejected a GL call. OpenGL 4.0 with tessellation is required.");
        } else {
            eprintln!("\n[Error] {}", msg);
        }
        if let Some(loc) = info.location() {
            eprintln!("  at {}:{}:{}", loc.file(), loc.line(), loc.column());
        }
    }));

    let mut settings = Settings::load();
    options.apply(&mut settings);
    tracing::info!(
        variant = %settings.variant,
        camera = %settings.camera_mode,
        "starting viewer"
    );

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_title("Water Plane"),
        multisampling: settings.antialiasing as u16,
        depth_buffer: 24,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Water Plane",
        native,
        Box::new(move |cc| {
            let app = app::PlaneApp::new(cc, settings, trace_guard)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run: {}", e))
}

/// Install the global subscriber: console output filtered by `RUST_LOG`
/// (or the command-line verbosity), plus a Chrome trace when
/// `WATER_PLANE_TRACE=1`.
fn init_tracing(verbosity: Verbosity) -> Option<tracing_chrome::FlushGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));
    let fmt = tracing_subscriber::fmt::layer().with_target(false);

    let base = tracing_subscriber::registry().with(filter).with(fmt);

    if std::env::var("WATER_PLANE_TRACE").ok().as_deref() != Some("1") {
        let _ = tracing::subscriber::set_global_default(base);
        return None;
    }

    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
        .file("trace.json")
        .build();
    if tracing::subscriber::set_global_default(base.with(chrome_layer)).is_err() {
        return None;
    }

    Some(guard)
}
