//! Modal confirmation dialog.
//!
//! The dialog renders a backdrop that swallows clicks on the rest of the
//! window, so only one confirmation can be active at a time. While `busy`
//! the dialog shows a progress indicator in place of the confirm button and
//! refuses to be dismissed.
//!
//! # Example
//!
//! ```ignore
//! let response = ConfirmDialog::new("Delete variable")
//!     .id("env_delete")
//!     .message("Delete RUST_LOG?")
//!     .confirm_button(DialogButton::destructive("Delete"))
//!     .busy(is_deleting)
//!     .show(ctx);
//! ```

use eframe::egui::{self, Color32, Key, Order, Pos2, Rounding, Sense, Stroke};

use crate::ui::gui::components::{self, SPINNER_SIZE};
use crate::ui::gui::theme::{rounding, shadow, spacing, Palette};
use crate::ui::gui::typography::{self, FontSize};

/// Width of the dialog on screens wide enough to fit it.
const DIALOG_WIDTH: f32 = 400.0;

const DIALOG_PADDING: f32 = spacing::XL;

const BUTTON_HEIGHT: f32 = 36.0;

const BUTTON_WIDTH: f32 = 100.0;

const BUTTON_GAP: f32 = spacing::MD;

/// Backdrop opacity (0-255).
const BACKDROP_ALPHA: u8 = 128;

/// Visual flavor of a dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Secondary,
    Destructive,
}

/// A dialog button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    pub label: String,
    pub kind: ButtonKind,
}

impl DialogButton {
    pub fn primary(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Primary,
        }
    }

    pub fn secondary(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Secondary,
        }
    }

    pub fn destructive(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Destructive,
        }
    }

    fn colors(&self, palette: &Palette) -> (Color32, Color32, Option<Stroke>) {
        match self.kind {
            ButtonKind::Primary => (palette.brand, Color32::WHITE, None),
            ButtonKind::Secondary => (
                palette.surface,
                palette.text_primary,
                Some(Stroke::new(1.0, palette.border)),
            ),
            ButtonKind::Destructive => (palette.error, Color32::WHITE, None),
        }
    }
}

/// What the user did with the dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Confirmed,
    /// Cancel button, backdrop click or Escape.
    Cancelled,
    /// Nothing; the dialog stays open.
    Open,
}

/// A modal confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    id: String,
    title: String,
    message: String,
    cancel_button: DialogButton,
    confirm_button: DialogButton,
    busy: bool,
    busy_label: String,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: "confirm_dialog".to_string(),
            title: title.into(),
            message: String::new(),
            cancel_button: DialogButton::secondary("Cancel"),
            confirm_button: DialogButton::primary("Confirm"),
            busy: false,
            busy_label: "Working...".to_string(),
        }
    }

    /// Unique id, needed when several dialogs can exist in one context.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn cancel_button(mut self, button: DialogButton) -> Self {
        self.cancel_button = button;
        self
    }

    pub fn confirm_button(mut self, button: DialogButton) -> Self {
        self.confirm_button = button;
        self
    }

    /// Show progress instead of the confirm button and block dismissal.
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn busy_label(mut self, label: impl Into<String>) -> Self {
        self.busy_label = label.into();
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Render the dialog and report the user's action.
    ///
    /// A busy dialog always reports [`DialogResponse::Open`].
    pub fn show(&self, ctx: &egui::Context) -> DialogResponse {
        let mut response = DialogResponse::Open;

        self.render_backdrop(ctx, &mut response);
        self.render_dialog(ctx, &mut response);

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            response = DialogResponse::Cancelled;
        }

        if self.busy {
            DialogResponse::Open
        } else {
            response
        }
    }

    fn render_backdrop(&self, ctx: &egui::Context, response: &mut DialogResponse) {
        let screen_rect = ctx.screen_rect();

        egui::Area::new(egui::Id::new(format!("{}_backdrop", self.id)))
            .order(Order::Foreground)
            .fixed_pos(Pos2::ZERO)
            .show(ctx, |ui| {
                ui.painter().rect_filled(
                    screen_rect,
                    Rounding::ZERO,
                    Color32::from_black_alpha(BACKDROP_ALPHA),
                );

                let (_, backdrop) = ui.allocate_exact_size(screen_rect.size(), Sense::click());
                if backdrop.clicked() {
                    *response = DialogResponse::Cancelled;
                }
            });
    }

    fn render_dialog(&self, ctx: &egui::Context, response: &mut DialogResponse) {
        let screen_rect = ctx.screen_rect();
        let width = DIALOG_WIDTH.min(screen_rect.width() - 2.0 * spacing::MD);
        let dialog_x = (screen_rect.width() - width) / 2.0;
        let estimated_height = 200.0;
        let dialog_y = ((screen_rect.height() - estimated_height) / 2.0).max(spacing::MD);

        egui::Area::new(self.dialog_area_id())
            .order(Order::Foreground)
            .fixed_pos(Pos2::new(dialog_x, dialog_y))
            .show(ctx, |ui| {
                let palette = Palette::of(ui);
                egui::Frame::none()
                    .fill(palette.surface)
                    .rounding(Rounding::same(rounding::CARD))
                    .shadow(shadow::elevated())
                    .stroke(Stroke::new(1.0, palette.border))
                    .inner_margin(egui::Margin::same(DIALOG_PADDING))
                    .show(ui, |ui| {
                        let inner_width = width - 2.0 * DIALOG_PADDING;
                        ui.set_min_width(inner_width);
                        ui.set_max_width(inner_width);

                        ui.label(
                            egui::RichText::new(&self.title)
                                .font(typography::font(FontSize::Heading))
                                .strong()
                                .color(palette.text_primary),
                        );
                        ui.add_space(spacing::MD);

                        if !self.message.is_empty() {
                            ui.label(
                                egui::RichText::new(&self.message)
                                    .font(typography::font(FontSize::Body))
                                    .color(palette.text_secondary),
                            );
                        }
                        ui.add_space(spacing::XL);

                        // Button row, right-aligned with confirm last.
                        ui.horizontal(|ui| {
                            let total = 2.0 * BUTTON_WIDTH
                                + BUTTON_GAP
                                + ui.spacing().item_spacing.x;
                            ui.add_space((ui.available_width() - total).max(0.0));

                            if self
                                .render_button(ui, &self.cancel_button, !self.busy)
                                .clicked()
                            {
                                *response = DialogResponse::Cancelled;
                            }

                            ui.add_space(BUTTON_GAP);

                            if self.busy {
                                components::spinner(ui, SPINNER_SIZE);
                                ui.label(
                                    egui::RichText::new(&self.busy_label)
                                        .color(palette.text_secondary),
                                );
                            } else if self.render_button(ui, &self.confirm_button, true).clicked()
                            {
                                *response = DialogResponse::Confirmed;
                            }
                        });
                    });
            });
    }

    fn dialog_area_id(&self) -> egui::Id {
        egui::Id::new(format!("{}_dialog", self.id))
    }

    /// Center of the confirm button as laid out on the previous frame.
    #[cfg(test)]
    pub(crate) fn confirm_button_center(&self, ctx: &egui::Context) -> Option<Pos2> {
        let rect = ctx.memory(|m| m.area_rect(self.dialog_area_id()))?;
        Some(Pos2::new(
            rect.right() - DIALOG_PADDING - BUTTON_WIDTH / 2.0,
            rect.bottom() - DIALOG_PADDING - BUTTON_HEIGHT / 2.0,
        ))
    }

    fn render_button(
        &self,
        ui: &mut egui::Ui,
        button: &DialogButton,
        enabled: bool,
    ) -> egui::Response {
        let (fill, text, stroke) = button.colors(Palette::of(ui));
        let mut btn = egui::Button::new(egui::RichText::new(&button.label).color(text))
            .fill(fill)
            .rounding(Rounding::same(rounding::BUTTON));
        if let Some(stroke) = stroke {
            btn = btn.stroke(stroke);
        }

        ui.add_enabled_ui(enabled, |ui| {
            ui.add_sized([BUTTON_WIDTH, BUTTON_HEIGHT], btn)
        })
        .inner
    }
}
