//! Orbit Viz: 3D orbit trajectory viewer for NASA's Satellite
//! Situation Center web services.

mod app;
mod catalog;
mod plot;
mod request;
mod sscweb;
mod time;

use app::App;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Orbit Viz",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
