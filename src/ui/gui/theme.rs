//! Theme and color system for the GUI.
//!
//! Two palettes (light and dark) share one spacing and rounding scale.
//! Widgets look up the active palette from the current egui visuals so the
//! theme can be switched at runtime without threading it through every call.

use crate::config::Theme;
use crate::ui::gui::typography;
use eframe::egui::{self, Color32, Rounding, Stroke, Style, Visuals};

/// Spacing scale for consistent layout throughout the application.
pub mod spacing {
    /// Extra small spacing (4px).
    pub const XS: f32 = 4.0;

    /// Small spacing (8px).
    pub const SM: f32 = 8.0;

    /// Medium spacing (12px).
    pub const MD: f32 = 12.0;

    /// Standard component padding (16px).
    pub const LG: f32 = 16.0;

    /// Spacing between major sections (24px).
    pub const XL: f32 = 24.0;
}

/// Corner rounding values.
pub mod rounding {
    /// Cards, list rows and dialogs (8px).
    pub const CARD: f32 = 8.0;

    /// Buttons and inputs (4px).
    pub const BUTTON: f32 = 4.0;
}

/// Shadow depths for elevated surfaces.
pub mod shadow {
    use super::Color32;
    use eframe::egui::Shadow;

    /// Elevated shadow for modals and popovers.
    pub fn elevated() -> Shadow {
        Shadow {
            offset: [0.0, 4.0].into(),
            blur: 16.0,
            spread: 0.0,
            color: Color32::from_black_alpha(40),
        }
    }
}

/// Semantic colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub surface: Color32,
    pub surface_secondary: Color32,
    pub surface_hover: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_tertiary: Color32,
    pub border: Color32,
    pub brand: Color32,
    pub error: Color32,
}

/// Light palette.
pub const LIGHT: Palette = Palette {
    background: Color32::from_rgb(250, 249, 247),
    surface: Color32::from_rgb(255, 255, 255),
    surface_secondary: Color32::from_rgb(245, 243, 239),
    surface_hover: Color32::from_rgb(238, 235, 229),
    text_primary: Color32::from_rgb(28, 28, 30),
    text_secondary: Color32::from_rgb(99, 99, 102),
    text_tertiary: Color32::from_rgb(142, 142, 147),
    border: Color32::from_rgb(232, 229, 222),
    brand: Color32::from_rgb(0, 122, 255),
    error: Color32::from_rgb(220, 38, 38),
};

/// Dark palette.
pub const DARK: Palette = Palette {
    background: Color32::from_rgb(24, 24, 27),
    surface: Color32::from_rgb(32, 32, 36),
    surface_secondary: Color32::from_rgb(39, 39, 43),
    surface_hover: Color32::from_rgb(52, 52, 58),
    text_primary: Color32::from_rgb(244, 244, 245),
    text_secondary: Color32::from_rgb(190, 190, 198),
    text_tertiary: Color32::from_rgb(140, 140, 150),
    border: Color32::from_rgb(63, 63, 70),
    brand: Color32::from_rgb(96, 165, 250),
    error: Color32::from_rgb(248, 113, 113),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    /// Palette matching the visuals currently applied to `ui`.
    pub fn of(ui: &egui::Ui) -> &'static Palette {
        if ui.visuals().dark_mode {
            &DARK
        } else {
            &LIGHT
        }
    }
}

/// Configure egui Visuals for `theme`.
pub fn configure_visuals(theme: Theme) -> Visuals {
    let palette = Palette::for_theme(theme);
    let mut visuals = if theme.is_dark() {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.window_fill = palette.surface;
    visuals.panel_fill = palette.background;
    visuals.faint_bg_color = palette.surface_secondary;
    visuals.extreme_bg_color = palette.surface;
    visuals.hyperlink_color = palette.brand;
    visuals.selection.stroke = Stroke::new(1.0, palette.brand);
    visuals.window_shadow = shadow::elevated();
    visuals.window_stroke = Stroke::new(1.0, palette.border);
    visuals.window_rounding = Rounding::same(rounding::CARD);
    visuals.text_cursor.stroke = Stroke::new(2.0, palette.brand);

    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(rounding::BUTTON);
    }
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.border);
    visuals.widgets.hovered.weak_bg_fill = palette.surface_hover;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.brand);

    visuals
}

/// Configure the egui Style for `theme`.
pub fn configure_style(theme: Theme) -> Style {
    let default_style = Style::default();
    let mut style_spacing = default_style.spacing.clone();
    style_spacing.item_spacing = egui::vec2(spacing::SM, spacing::XS);
    style_spacing.button_padding = egui::vec2(spacing::MD, 6.0);
    style_spacing.indent = spacing::LG;

    Style {
        visuals: configure_visuals(theme),
        spacing: style_spacing,
        animation_time: 0.1,
        ..Default::default()
    }
}

/// Apply `theme` and the type scale to the context.
pub fn apply(ctx: &egui::Context, theme: Theme) {
    ctx.set_theme(if theme.is_dark() {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    });
    ctx.set_style(configure_style(theme));
    typography::init(ctx);
}
