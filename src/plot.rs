//! 3D trajectory plotting.
//!
//! Assembles trajectory series from the location fetch into one orbit
//! figure: a projected 3D view with labeled axes, a legend, an Earth
//! disc for scale, and a per-trajectory sample marker.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// One satellite's orbit samples in a named coordinate system,
/// positions in kilometers. Produced per satellite from the location
/// response and consumed by the next render.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySeries {
    pub satellite_id: String,
    pub name: String,
    pub coordinate_system: String,
    pub times: Vec<String>,
    pub points: Vec<[f64; 3]>,
}

impl TrajectorySeries {
    pub fn legend_label(&self) -> String {
        format!(
            "{} Orbit ({})",
            self.satellite_id,
            self.coordinate_system.to_uppercase()
        )
    }
}

pub fn rotate_point(x: f64, y: f64, z: f64, rot: &Matrix3<f64>) -> (f64, f64, f64) {
    let v = rot * Vector3::new(x, y, z);
    (v.x, v.y, v.z)
}

pub fn rotation_from_drag(dx: f64, dy: f64) -> Matrix3<f64> {
    let rot_y = Matrix3::new(
        dx.cos(), 0.0, dx.sin(),
        0.0, 1.0, 0.0,
        -dx.sin(), 0.0, dx.cos(),
    );
    let rot_x = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, dy.cos(), -dy.sin(),
        0.0, dy.sin(), dy.cos(),
    );
    rot_x * rot_y
}

/// Largest coordinate magnitude across all series, floored at one Earth
/// radius so a degenerate response still yields a usable view.
fn max_extent(series: &[TrajectorySeries]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.points.iter())
        .flat_map(|p| p.iter())
        .fold(EARTH_RADIUS_KM, |acc, &c| acc.max(c.abs()))
}

pub fn series_color(idx: usize) -> egui::Color32 {
    COLORS[idx % COLORS.len()]
}

const COLORS: [egui::Color32; 8] = [
    egui::Color32::from_rgb(255, 99, 71),
    egui::Color32::from_rgb(50, 205, 50),
    egui::Color32::from_rgb(30, 144, 255),
    egui::Color32::from_rgb(255, 215, 0),
    egui::Color32::from_rgb(238, 130, 238),
    egui::Color32::from_rgb(0, 206, 209),
    egui::Color32::from_rgb(255, 140, 0),
    egui::Color32::from_rgb(147, 112, 219),
];

/// Draws the orbit figure, replacing whatever the plot area showed
/// before. Dragging rotates the view, scrolling zooms. Returns the
/// updated rotation and zoom.
pub fn draw_orbit_view(
    ui: &mut egui::Ui,
    series: &[TrajectorySeries],
    marker_index: usize,
    mut rotation: Matrix3<f64>,
    mut zoom: f64,
    width: f32,
    height: f32,
) -> (Matrix3<f64>, f64) {
    let extent = max_extent(series);
    let axis_len = extent * 1.05;
    let margin = axis_len * 1.25 / zoom;

    let plot = Plot::new("orbit_view")
        .data_aspect(1.0)
        .width(width)
        .height(height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .cursor_color(egui::Color32::TRANSPARENT);

    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(egui_plot::PlotBounds::from_min_max(
            [-margin, -margin],
            [margin, margin],
        ));

        let earth_pts: Vec<[f64; 2]> = (0..=100)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / 100.0;
                [EARTH_RADIUS_KM * theta.cos(), EARTH_RADIUS_KM * theta.sin()]
            })
            .collect();
        plot_ui.polygon(
            Polygon::new("", PlotPoints::new(earth_pts))
                .fill_color(egui::Color32::from_rgb(30, 60, 120))
                .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(70, 130, 180))),
        );

        let axes = [
            ([axis_len, 0.0, 0.0], "X (km)", egui::Color32::from_rgb(255, 100, 100)),
            ([0.0, axis_len, 0.0], "Y (km)", egui::Color32::from_rgb(100, 255, 100)),
            ([0.0, 0.0, axis_len], "Z (km)", egui::Color32::from_rgb(100, 100, 255)),
        ];
        for (end, label, color) in axes {
            let (px, py, _) = rotate_point(end[0], end[1], end[2], &rotation);
            let (nx, ny, _) = rotate_point(-end[0], -end[1], -end[2], &rotation);
            plot_ui.line(
                Line::new("", PlotPoints::new(vec![[nx, ny], [px, py]]))
                    .color(color)
                    .width(1.5),
            );
            let offset = 1.15;
            let (lx, ly, _) =
                rotate_point(end[0] * offset, end[1] * offset, end[2] * offset, &rotation);
            plot_ui.text(
                Text::new("", PlotPoint::new(lx, ly), label).color(egui::Color32::WHITE),
            );
        }

        for (idx, traj) in series.iter().enumerate() {
            let color = series_color(idx);
            let pts: Vec<[f64; 2]> = traj
                .points
                .iter()
                .map(|&[x, y, z]| {
                    let (rx, ry, _) = rotate_point(x, y, z, &rotation);
                    [rx, ry]
                })
                .collect();
            plot_ui.line(
                Line::new(traj.legend_label(), PlotPoints::new(pts))
                    .color(color)
                    .width(2.0),
            );

            if let Some(&[x, y, z]) = traj.points.get(marker_index) {
                let (rx, ry, _) = rotate_point(x, y, z, &rotation);
                plot_ui.points(
                    Points::new("", PlotPoints::new(vec![[rx, ry]]))
                        .color(color)
                        .radius(5.0)
                        .filled(true),
                );
            }
        }
    });

    if response.response.dragged() && !response.response.drag_started() {
        let drag = response.response.drag_delta();
        let delta_rot = rotation_from_drag(drag.x as f64 * 0.01, drag.y as f64 * 0.01);
        rotation = delta_rot * rotation;
    }

    if response.response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let factor = 1.0 + scroll as f64 * 0.001;
            zoom = (zoom * factor).clamp(0.2, 10.0);
        }
    }

    (rotation, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(id: &str, coord: &str, points: Vec<[f64; 3]>) -> TrajectorySeries {
        TrajectorySeries {
            satellite_id: id.to_string(),
            name: id.to_string(),
            coordinate_system: coord.to_string(),
            times: Vec::new(),
            points,
        }
    }

    #[test]
    fn legend_label_uppercases_frame_tag() {
        let s = series("cluster1", "Gse", vec![]);
        assert_eq!(s.legend_label(), "cluster1 Orbit (GSE)");
    }

    #[test]
    fn identity_rotation_is_a_straight_projection() {
        let (x, y, z) = rotate_point(1.0, 2.0, 3.0, &Matrix3::identity());
        assert_eq!((x, y, z), (1.0, 2.0, 3.0));
    }

    #[test]
    fn zero_drag_is_identity() {
        let rot = rotation_from_drag(0.0, 0.0);
        assert!((rot - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn extent_floors_at_earth_radius() {
        let small = vec![series("s", "Gse", vec![[1.0, 2.0, 3.0]])];
        assert_eq!(max_extent(&small), EARTH_RADIUS_KM);

        let big = vec![series("s", "Gse", vec![[0.0, -90000.0, 3.0]])];
        assert_eq!(max_extent(&big), 90000.0);
    }

    #[test]
    fn colors_cycle() {
        assert_eq!(series_color(0), series_color(COLORS.len()));
    }
}
