//! Small reusable widgets shared by the panels.

use crate::ui::gui::theme::{spacing, Palette};
use crate::ui::gui::typography::{self, FontSize};
use egui::{self, Response, Sense, Stroke, Vec2};

/// Default diameter of inline spinners.
pub const SPINNER_SIZE: f32 = 16.0;

/// Size of the on/off switch.
const TOGGLE_SIZE: Vec2 = Vec2::new(36.0, 20.0);

/// Render a rotating arc used for in-flight operations.
pub fn spinner(ui: &mut egui::Ui, size: f32) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());

    if ui.is_rect_visible(rect) {
        let color = Palette::of(ui).brand;
        let center = rect.center();
        let radius = size / 2.0 - 2.0;
        let time = ui.input(|i| i.time);
        let start_angle = (time * 2.0) as f32 % std::f32::consts::TAU;
        let arc_length = std::f32::consts::PI * 1.5;

        let n_points = 32;
        let points: Vec<_> = (0..=n_points)
            .map(|i| {
                let angle = start_angle + arc_length * (i as f32 / n_points as f32);
                egui::pos2(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect();

        ui.painter()
            .add(egui::Shape::line(points, Stroke::new(2.0, color)));
        ui.ctx().request_repaint();
    }

    response
}

/// An iOS-style on/off switch. Returns a response marked changed on flip.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> Response {
    let (rect, mut response) = ui.allocate_exact_size(TOGGLE_SIZE, Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let palette = Palette::of(ui);
        let how_on = ui.ctx().animate_bool_responsive(response.id, *on);
        let radius = 0.5 * rect.height();
        let fill = if *on {
            palette.brand
        } else {
            palette.border
        };
        ui.painter().rect_filled(rect, radius, fill);

        let knob_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), how_on);
        ui.painter().circle_filled(
            egui::pos2(knob_x, rect.center().y),
            radius - 2.0,
            egui::Color32::WHITE,
        );
    }

    response
}

/// Section title used at the top of each settings group.
pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .font(typography::font(FontSize::Body))
            .strong()
            .color(Palette::of(ui).text_primary),
    );
    ui.add_space(spacing::SM);
}

/// Secondary explanatory text.
pub fn description(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .font(typography::font(FontSize::Small))
            .color(Palette::of(ui).text_tertiary),
    );
}

/// A settings row: title and description on the left, a control on the right.
pub fn setting_row<R>(
    ui: &mut egui::Ui,
    title: &str,
    detail: &str,
    control: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(title)
                    .font(typography::font(FontSize::Body))
                    .color(Palette::of(ui).text_primary),
            );
            description(ui, detail);
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), control)
            .inner
    })
    .inner
}
