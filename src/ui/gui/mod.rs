//! Native GUI using eframe/egui.
//!
//! # Submodules
//!
//! - [`app`] - Main application, frame loop and window setup
//! - [`components`] - Spinner, toggle switch and settings rows
//! - [`list_panel`] - Generic list management panel with confirmed deletes
//! - [`modal`] - Confirmation dialog
//! - [`settings`] - Settings screen and its store
//! - [`shell`] - Responsive layout shell: activity bar, bottom nav and drawer
//! - [`theme`] - Light and dark palettes, spacing and rounding scales
//! - [`typography`] - Type scale and text styles

pub mod app;
pub mod components;
pub mod list_panel;
pub mod modal;
pub mod settings;
pub mod shell;
pub mod theme;
pub mod typography;
