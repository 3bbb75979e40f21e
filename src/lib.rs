pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod ui;

pub use config::{CustomPrompt, EnvVar, Settings, Theme};
pub use error::{ChatdeckError, Result};
pub use logging::{FailureLog, TracingFailureLog};
pub use ui::gesture::{EdgeSwipeDetector, SwipeConfig, SwipeRegistration, TouchSurface};
pub use ui::gui::list_panel::{DeleteOutcome, ListCallbacks, ListPanel, ListPanelOptions};
