//! User interface for chatdeck.
//!
//! # Submodules
//!
//! - [`gesture`] - Touch surface and edge swipe detection (no egui dependency)
//! - [`gui`] - Native GUI using eframe/egui

pub mod gesture;
pub mod gui;
