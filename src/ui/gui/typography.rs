//! Type scale for the GUI.

use eframe::egui::{self, FontFamily, FontId, TextStyle};
use std::collections::BTreeMap;

/// Standard font sizes for the type scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Nav captions under icons (10px).
    Caption,
    /// Descriptions and helper text (12px).
    Small,
    /// Standard body text (14px).
    Body,
    /// Section headings (18px).
    Heading,
}

impl FontSize {
    pub fn pixels(self) -> f32 {
        match self {
            FontSize::Caption => 10.0,
            FontSize::Small => 12.0,
            FontSize::Body => 14.0,
            FontSize::Heading => 18.0,
        }
    }
}

pub fn font(size: FontSize) -> FontId {
    FontId::new(size.pixels(), FontFamily::Proportional)
}

pub fn mono(size: FontSize) -> FontId {
    FontId::new(size.pixels(), FontFamily::Monospace)
}

/// Map egui's built-in text styles onto the type scale.
pub fn init(ctx: &egui::Context) {
    let mut text_styles = BTreeMap::new();
    text_styles.insert(TextStyle::Small, font(FontSize::Small));
    text_styles.insert(TextStyle::Body, font(FontSize::Body));
    text_styles.insert(TextStyle::Button, font(FontSize::Body));
    text_styles.insert(TextStyle::Heading, font(FontSize::Heading));
    text_styles.insert(TextStyle::Monospace, mono(FontSize::Body));

    ctx.style_mut(|style| style.text_styles = text_styles);
}
