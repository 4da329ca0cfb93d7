//! Application shell and eframe integration.
//!
//! Owns all state: the observatory catalog, the user's selection and
//! time range, the in-flight fetch channels, and the rendered
//! trajectories. The update loop polls the background fetches and
//! drives the side-panel controls and the central orbit figure.

use crate::catalog::{CatalogLoadState, ObservatoryCatalog, ObservatoryRecord, DEFAULT_SELECTED};
use crate::plot::{draw_orbit_view, TrajectorySeries};
use crate::request::build_plot_request;
use crate::sscweb;
use eframe::egui;
use nalgebra::Matrix3;
use std::collections::HashSet;
use std::sync::mpsc;

pub(crate) struct App {
    service_url: String,
    catalog: CatalogLoadState,
    catalog_rx: Option<mpsc::Receiver<Result<Vec<ObservatoryRecord>, String>>>,
    selected: HashSet<String>,
    start_text: String,
    stop_text: String,
    busy: bool,
    location_rx: Option<mpsc::Receiver<Result<Vec<TrajectorySeries>, String>>>,
    trajectories: Vec<TrajectorySeries>,
    alert: Option<String>,
    rotation: Matrix3<f64>,
    zoom: f64,
    marker_index: usize,
    show_data_table: bool,
    dark_mode: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        let mut app = Self {
            service_url: sscweb::service_url(),
            catalog: CatalogLoadState::Loading,
            catalog_rx: None,
            selected: HashSet::new(),
            start_text: String::new(),
            stop_text: String::new(),
            busy: false,
            location_rx: None,
            trajectories: Vec::new(),
            alert: None,
            rotation: Matrix3::identity(),
            zoom: 1.0,
            marker_index: 0,
            show_data_table: false,
            dark_mode: true,
        };
        app.start_catalog_fetch();
        app
    }

    fn start_catalog_fetch(&mut self) {
        self.catalog = CatalogLoadState::Loading;
        let url = self.service_url.clone();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(sscweb::fetch_observatories(&url));
        });
        self.catalog_rx = Some(rx);
    }

    fn poll_catalog(&mut self) {
        let Some(rx) = &self.catalog_rx else { return };
        match rx.try_recv() {
            Ok(Ok(records)) => {
                let catalog = ObservatoryCatalog::from_records(records);
                for id in DEFAULT_SELECTED {
                    if catalog.contains(id) {
                        self.selected.insert(id.to_string());
                    }
                }
                log::info!("catalog loaded with {} observatories", catalog.len());
                self.catalog = CatalogLoadState::Loaded(catalog);
                self.catalog_rx = None;
            }
            Ok(Err(e)) => {
                log::warn!("observatory fetch failed: {}", e);
                self.catalog = CatalogLoadState::Failed(e);
                self.catalog_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.catalog = CatalogLoadState::Failed("Fetch thread died".to_string());
                self.catalog_rx = None;
            }
        }
    }

    fn poll_locations(&mut self) {
        let Some(rx) = &self.location_rx else { return };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => Err("Fetch thread died".to_string()),
        };

        // The button is re-enabled no matter how the fetch ended.
        self.busy = false;
        self.location_rx = None;

        match result {
            Ok(mut series) => {
                if let CatalogLoadState::Loaded(catalog) = &self.catalog {
                    for s in &mut series {
                        s.name = catalog
                            .get(&s.satellite_id)
                            .map(|r| r.name.clone())
                            .unwrap_or_else(|| s.satellite_id.clone());
                    }
                }
                self.marker_index = 0;
                self.trajectories = series;
            }
            Err(e) => {
                log::warn!("location fetch failed: {}", e);
                self.alert = Some(format!("Request for information from SSC failed.\n\n{}", e));
            }
        }
    }

    fn request_plot(&mut self) {
        let CatalogLoadState::Loaded(catalog) = &self.catalog else {
            return;
        };
        let selection = gather_selection(catalog, &self.selected);
        match build_plot_request(catalog, &selection, &self.start_text, &self.stop_text) {
            Err(e) => self.alert = Some(e.to_string()),
            Ok(request) => {
                self.busy = true;
                let url = self.service_url.clone();
                let (tx, rx) = mpsc::channel();
                std::thread::spawn(move || {
                    let _ = tx.send(sscweb::fetch_locations(&url, &request));
                });
                self.location_rx = Some(rx);
            }
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let mut plot_clicked = false;
        let mut retry_clicked = false;

        match &self.catalog {
            CatalogLoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading observatories...");
                });
            }
            CatalogLoadState::Failed(e) => {
                ui.colored_label(egui::Color32::RED, format!("Catalog load failed: {}", e));
                if ui.button("Retry").clicked() {
                    retry_clicked = true;
                }
            }
            CatalogLoadState::Loaded(catalog) => {
                ui.label("Satellites:");
                egui::ScrollArea::vertical()
                    .id_salt("satellite_list")
                    .max_height((ui.available_height() - 170.0).max(120.0))
                    .show(ui, |ui| {
                        for record in catalog.iter_display() {
                            let mut checked = self.selected.contains(&record.id);
                            let response = ui
                                .checkbox(&mut checked, &record.name)
                                .on_hover_text(record.validity_window());
                            if response.changed() {
                                if checked {
                                    self.selected.insert(record.id.clone());
                                } else {
                                    self.selected.remove(&record.id);
                                }
                            }
                        }
                    });

                ui.separator();
                ui.label("Start Time:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.start_text)
                        .hint_text("YYYY-MM-DDTHH:MM:SS"),
                );
                ui.label("Stop Time:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.stop_text)
                        .hint_text("YYYY-MM-DDTHH:MM:SS"),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.add_enabled(!self.busy, egui::Button::new("Plot")).clicked() {
                        plot_clicked = true;
                    }
                    if self.busy {
                        ui.spinner();
                        ui.label("Fetching locations...");
                    }
                });
            }
        }

        if retry_clicked {
            self.start_catalog_fetch();
        }
        if plot_clicked {
            self.request_plot();
        }
    }

    fn show_plot_area(&mut self, ui: &mut egui::Ui) {
        if self.trajectories.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Select satellites and a time range, then press Plot.");
            });
            return;
        }

        let sample_count = self
            .trajectories
            .iter()
            .map(|t| t.points.len())
            .max()
            .unwrap_or(0);
        if sample_count > 1 {
            ui.horizontal(|ui| {
                ui.label("Sample:");
                ui.add(egui::Slider::new(&mut self.marker_index, 0..=sample_count - 1));
                if let Some(time) = self
                    .trajectories
                    .first()
                    .and_then(|t| t.times.get(self.marker_index))
                {
                    ui.label(format!("Time: {}", time));
                }
            });
        }

        ui.checkbox(&mut self.show_data_table, "Show data table");

        let available = ui.available_size();
        let table_height = if self.show_data_table { 220.0 } else { 0.0 };
        let plot_height = (available.y - table_height - 10.0).max(100.0);

        let (rotation, zoom) = draw_orbit_view(
            ui,
            &self.trajectories,
            self.marker_index,
            self.rotation,
            self.zoom,
            available.x,
            plot_height,
        );
        self.rotation = rotation;
        self.zoom = zoom;

        if self.show_data_table {
            self.show_samples_table(ui);
        }
    }

    fn show_samples_table(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("data_table")
            .max_height(220.0)
            .show(ui, |ui| {
                for traj in &self.trajectories {
                    ui.strong(format!("{} ({} samples)", traj.name, traj.points.len()));
                    egui::Grid::new(("samples", &traj.satellite_id))
                        .striped(true)
                        .show(ui, |ui| {
                            ui.strong("Time");
                            ui.strong("X (km)");
                            ui.strong("Y (km)");
                            ui.strong("Z (km)");
                            ui.end_row();
                            for (i, point) in traj.points.iter().enumerate() {
                                match traj.times.get(i) {
                                    Some(time) => ui.label(time),
                                    None => ui.label(format!("#{}", i)),
                                };
                                ui.label(format!("{:.1}", point[0]));
                                ui.label(format!("{:.1}", point[1]));
                                ui.label(format!("{:.1}", point[2]));
                                ui.end_row();
                            }
                        });
                    ui.separator();
                }
            });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else { return };
        let mut dismissed = false;
        egui::Window::new("Orbit Viz")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.alert = None;
        }
    }
}

/// Checked ids in display order, so later validation reports the first
/// offender in the order the list shows them.
fn gather_selection(catalog: &ObservatoryCatalog, selected: &HashSet<String>) -> Vec<String> {
    catalog
        .iter_display()
        .filter(|r| selected.contains(&r.id))
        .map(|r| r.id.clone())
        .collect()
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        self.poll_catalog();
        self.poll_locations();
        if self.busy || self.catalog_rx.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Orbit Viz");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.checkbox(&mut self.dark_mode, "Dark mode");
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Endpoint: {}", self.service_url));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let hash = env!("GIT_HASH");
                    if hash.is_empty() {
                        ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                    } else {
                        ui.label(format!("v{} ({})", env!("CARGO_PKG_VERSION"), hash));
                    }
                });
            });
        });

        egui::SidePanel::left("controls")
            .min_width(240.0)
            .show(ctx, |ui| {
                self.show_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_plot_area(ui);
        });

        self.show_alert(ctx);
    }
}
