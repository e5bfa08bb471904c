//! Application entry point for the animated forest viewer.
//!
//! This binary loads a forest description file (the first command-line
//! argument, or a bundled demo), parses it with `forest-core`, and hands
//! the result to [`Viewer`], which animates the layout in an eframe/egui
//! window.

mod viewer;

use forest_core::{config::LayoutConfig, parse::parse_forest};
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Load and parse failures are reported before any window opens and exit
/// the process with a non-zero status.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let cfg = LayoutConfig::default();
    let path = std::env::args().nth(1);
    let source = match &path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(text) => text,
            Err(err) => {
                log::error!("cannot read {p}: {err}");
                std::process::exit(2);
            }
        },
        None => include_str!("../../demos/forest.txt").to_string(),
    };

    let forest = match parse_forest(&source, &cfg) {
        Ok(forest) => forest,
        Err(err) => {
            log::error!(
                "cannot load {}: {err}",
                path.as_deref().unwrap_or("bundled demo")
            );
            std::process::exit(2);
        }
    };
    log::info!("loaded {} nodes", forest.nodes.len());

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Forest",
        options,
        Box::new(move |_cc| {
            // Construct the root app state for the viewer.
            Ok(Box::new(Viewer::new(source, forest, cfg)))
        }),
    )
}
