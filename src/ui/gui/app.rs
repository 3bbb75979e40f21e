//! Main GUI application.
//!
//! [`ChatdeckApp`] owns the settings, the layout shell and the touch surface.
//! Raw touch input from egui is forwarded to the surface every frame; the
//! edge swipe registered on it reports back over a channel.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use eframe::egui::{self, Key, Stroke};

use crate::config::{self, Settings, Theme};
use crate::error::{ChatdeckError, Result};
use crate::ui::gesture::{
    EdgeSwipeDetector, SwipeConfig, SwipeRegistration, TouchEvent, TouchPoint, TouchSurface,
    DEFAULT_EDGE_THRESHOLD,
};
use crate::ui::gui::settings::{SettingsScreen, SettingsStore};
use crate::ui::gui::shell::{
    self, DrawerAction, Page, ShellCommand, ShellEvent, ShellState, ACTIVITY_BAR_WIDTH,
    BOTTOM_NAV_HEIGHT,
};
use crate::ui::gui::theme::{self, spacing, Palette};

/// Default window width.
const DEFAULT_WIDTH: f32 = 1100.0;

/// Default window height.
const DEFAULT_HEIGHT: f32 = 720.0;

/// Window size used with `--mobile`.
const MOBILE_WIDTH: f32 = 390.0;
const MOBILE_HEIGHT: f32 = 844.0;

/// Minimum window size.
const MIN_WIDTH: f32 = 320.0;
const MIN_HEIGHT: f32 = 480.0;

/// Options for launching the GUI.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Use the mobile layout regardless of window width, and treat the
    /// primary mouse button as a finger.
    pub force_mobile: bool,
    /// Settings file to use instead of `~/.config/chatdeck/settings.toml`.
    pub settings_path: Option<PathBuf>,
}

pub struct ChatdeckApp {
    settings: Settings,
    /// Theme currently installed in the egui context.
    applied_theme: Option<Theme>,
    shell: ShellState,
    settings_screen: SettingsScreen,
    force_mobile: bool,
    is_mobile: bool,

    touch_surface: TouchSurface,
    swipe: SwipeRegistration,
    shell_rx: Receiver<ShellCommand>,
}

impl ChatdeckApp {
    pub fn new(settings: Settings, store: SettingsStore, force_mobile: bool) -> Self {
        let (shell_tx, shell_rx) = mpsc::channel();
        let touch_surface = TouchSurface::new();

        let swipe = EdgeSwipeDetector::new(SwipeConfig {
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            enabled: false,
            ..Default::default()
        })
        .on_swipe_right(move || {
            let _ = shell_tx.send(ShellCommand::OpenDrawer);
        })
        .attach(&touch_surface);

        Self {
            settings,
            applied_theme: None,
            shell: ShellState::new(),
            settings_screen: SettingsScreen::new(store),
            force_mobile,
            is_mobile: force_mobile,
            touch_surface,
            swipe,
            shell_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn shell(&self) -> &ShellState {
        &self.shell
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn is_swipe_enabled(&self) -> bool {
        self.swipe.is_enabled()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Forward this frame's touches to the surface.
    fn feed_touch_events(&mut self, ctx: &egui::Context) {
        let emulate = self.force_mobile;
        let events: Vec<TouchEvent> = ctx.input(|i| {
            let time_ms = (i.time * 1000.0) as u64;
            i.events
                .iter()
                .filter_map(|event| touch_event(event, time_ms, emulate))
                .collect()
        });

        for event in &events {
            self.touch_surface.dispatch(event);
        }
    }

    fn poll_shell_commands(&mut self) {
        while let Ok(command) = self.shell_rx.try_recv() {
            tracing::debug!(?command, "shell command");
            self.shell.apply(command);
        }
    }

    fn apply_theme_if_changed(&mut self, ctx: &egui::Context) {
        if self.applied_theme != Some(self.settings.theme) {
            theme::apply(ctx, self.settings.theme);
            self.applied_theme = Some(self.settings.theme);
        }
    }

    fn toggle_theme(&mut self) {
        let mut next = self.settings.clone();
        next.theme = next.theme.toggled();
        let _ = self.settings_screen.commit(&mut self.settings, next);
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Run one frame of the UI.
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.apply_theme_if_changed(ctx);

        self.is_mobile = self.force_mobile || shell::is_mobile(ctx.screen_rect().width());
        if !self.is_mobile && self.shell.sidebar_open {
            self.shell.set_sidebar_open(false);
        }

        // There are no sign-in pages in the desktop shell.
        self.swipe.set_enabled(shell::swipe_enabled(
            self.is_mobile,
            self.shell.sidebar_open,
            false,
        ));
        self.feed_touch_events(ctx);
        self.poll_shell_commands();

        let palette = Palette::for_theme(self.settings.theme);

        if self.is_mobile {
            egui::TopBottomPanel::bottom("bottom_nav")
                .exact_height(BOTTOM_NAV_HEIGHT)
                .frame(
                    egui::Frame::none()
                        .fill(palette.surface)
                        .stroke(Stroke::new(1.0, palette.border)),
                )
                .show(ctx, |ui| {
                    if let Some(item) =
                        shell::render_bottom_nav(ui, &self.shell, self.settings.theme)
                    {
                        if self.shell.handle_nav_click(item) == Some(ShellEvent::ToggleTheme) {
                            self.toggle_theme();
                        }
                    }
                });
        } else {
            egui::SidePanel::left("activity_bar")
                .exact_width(ACTIVITY_BAR_WIDTH)
                .resizable(false)
                .frame(
                    egui::Frame::none()
                        .fill(palette.surface)
                        .stroke(Stroke::new(1.0, palette.border)),
                )
                .show(ctx, |ui| {
                    if let Some(view) = shell::render_activity_bar(ui, &self.shell) {
                        self.shell.select_view(view);
                    }
                    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                        ui.add_space(spacing::SM);
                        if ui.button("⚙").on_hover_text("Settings").clicked() {
                            self.shell.navigate(Page::Settings);
                        }
                    });
                });
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(palette.surface_secondary)
                    .inner_margin(egui::Margin::same(spacing::LG)),
            )
            .show(ctx, |ui| match self.shell.page {
                Page::Settings => self.settings_screen.show(ui, &mut self.settings),
                Page::Main => shell::render_view(ui, self.shell.current_view),
            });

        if self.is_mobile {
            match shell::render_drawer(ctx, &self.shell) {
                Some(DrawerAction::SelectView(view)) => {
                    self.shell.select_view(view);
                    self.shell.set_sidebar_open(false);
                }
                Some(DrawerAction::OpenSettings) => {
                    self.shell.navigate(Page::Settings);
                    self.shell.set_sidebar_open(false);
                }
                Some(DrawerAction::Close) => self.shell.set_sidebar_open(false),
                None => {}
            }

            if self.shell.sidebar_open && ctx.input(|i| i.key_pressed(Key::Escape)) {
                self.shell.set_sidebar_open(false);
            }
        }
    }
}

impl eframe::App for ChatdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

/// Translate an egui event into a touch event.
///
/// With `emulate` set, primary mouse presses count as touches.
fn touch_event(event: &egui::Event, time_ms: u64, emulate: bool) -> Option<TouchEvent> {
    match event {
        egui::Event::Touch { phase, pos, .. } => {
            let point = TouchPoint::new(pos.x, pos.y, time_ms);
            match phase {
                egui::TouchPhase::Start => Some(TouchEvent::Start(point)),
                egui::TouchPhase::End => Some(TouchEvent::End(point)),
                egui::TouchPhase::Move | egui::TouchPhase::Cancel => None,
            }
        }
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            ..
        } if emulate => {
            let point = TouchPoint::new(pos.x, pos.y, time_ms);
            Some(if *pressed {
                TouchEvent::Start(point)
            } else {
                TouchEvent::End(point)
            })
        }
        _ => None,
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn build_viewport(force_mobile: bool) -> egui::ViewportBuilder {
    let size = if force_mobile {
        [MOBILE_WIDTH, MOBILE_HEIGHT]
    } else {
        [DEFAULT_WIDTH, DEFAULT_HEIGHT]
    };
    egui::ViewportBuilder::default()
        .with_title("chatdeck")
        .with_inner_size(size)
        .with_min_inner_size([MIN_WIDTH, MIN_HEIGHT])
}

/// Launch the native GUI application.
///
/// # Returns
///
/// * `Ok(())` when the user closes the window
/// * `Err(ChatdeckError)` if settings cannot be loaded or the GUI fails to
///   initialize
pub fn run_gui(options: AppOptions) -> Result<()> {
    let path = match options.settings_path {
        Some(path) => path,
        None => config::settings_path()?,
    };
    let settings = config::load_settings_from(&path)?;
    tracing::info!(path = %path.display(), mobile = options.force_mobile, "starting GUI");

    let native_options = eframe::NativeOptions {
        viewport: build_viewport(options.force_mobile),
        ..Default::default()
    };

    let force_mobile = options.force_mobile;
    eframe::run_native(
        "chatdeck",
        native_options,
        Box::new(move |cc| {
            theme::apply(&cc.egui_ctx, settings.theme);
            Ok(Box::new(ChatdeckApp::new(
                settings,
                SettingsStore::at(path),
                force_mobile,
            )))
        }),
    )
    .map_err(|e| ChatdeckError::GuiError(e.to_string()))
}
