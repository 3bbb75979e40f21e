//! Responsive layout shell.
//!
//! On wide windows the shell shows an activity bar of views down the left
//! edge. Below [`MOBILE_BREAKPOINT`] the activity bar is replaced by a bottom
//! navigation bar and a slide-in drawer that can be opened by swiping in from
//! the left edge.

use eframe::egui::{self, Color32, Rect, Rounding, Sense, Stroke};

use crate::config::Theme;
use crate::ui::gui::theme::{spacing, Palette};
use crate::ui::gui::typography::{self, FontSize};

/// Windows narrower than this use the mobile layout.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Height of the bottom navigation bar.
pub const BOTTOM_NAV_HEIGHT: f32 = 64.0;

/// Width of the desktop activity bar.
pub const ACTIVITY_BAR_WIDTH: f32 = 56.0;

/// Width of the mobile drawer.
pub const DRAWER_WIDTH: f32 = 280.0;

const ACTIVITY_BUTTON_SIZE: f32 = 44.0;

const DRAWER_ITEM_HEIGHT: f32 = 40.0;

const ACTIVE_INDICATOR_WIDTH: f32 = 3.0;

const ITEM_ROUNDING: f32 = 6.0;

const DRAWER_BACKDROP_ALPHA: u8 = 96;

pub fn is_mobile(width: f32) -> bool {
    width < MOBILE_BREAKPOINT
}

/// Whether the edge swipe should be listening.
pub fn swipe_enabled(is_mobile: bool, sidebar_open: bool, is_auth_page: bool) -> bool {
    is_mobile && !sidebar_open && !is_auth_page
}

// ============================================================================
// Navigation Model
// ============================================================================

/// Workspace views reachable from the activity bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Agent,
    Ide,
    Editor,
    Terminal,
    Secrets,
    WebPreview,
    MobilePreview,
}

impl View {
    pub fn all() -> &'static [View] {
        &[
            View::Agent,
            View::Ide,
            View::Editor,
            View::Terminal,
            View::Secrets,
            View::WebPreview,
            View::MobilePreview,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Agent => "Agent",
            View::Ide => "IDE",
            View::Editor => "Editor",
            View::Terminal => "Terminal",
            View::Secrets => "Secrets",
            View::WebPreview => "Web Preview",
            View::MobilePreview => "Mobile Preview",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            View::Agent => "💬",
            View::Ide => "🖥",
            View::Editor => "📝",
            View::Terminal => "⌨",
            View::Secrets => "🔑",
            View::WebPreview => "🌐",
            View::MobilePreview => "📱",
        }
    }

    /// The full IDE needs a wide window.
    pub fn hide_on_mobile(self) -> bool {
        matches!(self, View::Ide)
    }

    /// Views offered for the given layout.
    pub fn visible(is_mobile: bool) -> impl Iterator<Item = View> {
        View::all()
            .iter()
            .copied()
            .filter(move |view| !(is_mobile && view.hide_on_mobile()))
    }
}

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Main,
    Settings,
}

/// An entry in the bottom navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Menu,
    View(View),
    Page(Page),
    ThemeToggle,
}

/// Bottom navigation entries, left to right.
pub const BOTTOM_NAV_ITEMS: [NavItem; 6] = [
    NavItem::Menu,
    NavItem::View(View::Agent),
    NavItem::View(View::Editor),
    NavItem::View(View::Terminal),
    NavItem::Page(Page::Settings),
    NavItem::ThemeToggle,
];

impl NavItem {
    /// Caption under the icon. The theme toggle names the theme it switches to.
    pub fn label(self, theme: Theme) -> &'static str {
        match self {
            NavItem::Menu => "Menu",
            NavItem::View(View::Agent) => "Chat",
            NavItem::View(view) => view.label(),
            NavItem::Page(Page::Settings) => "Settings",
            NavItem::Page(Page::Main) => "Home",
            NavItem::ThemeToggle => {
                if theme.is_dark() {
                    "Light"
                } else {
                    "Dark"
                }
            }
        }
    }

    pub fn icon(self, theme: Theme) -> &'static str {
        match self {
            NavItem::Menu => "☰",
            NavItem::View(view) => view.icon(),
            NavItem::Page(Page::Settings) => "⚙",
            NavItem::Page(Page::Main) => "🏠",
            NavItem::ThemeToggle => {
                if theme.is_dark() {
                    "☀"
                } else {
                    "🌙"
                }
            }
        }
    }
}

/// Side effects of navigation that the shell cannot apply itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    ToggleTheme,
}

/// Messages delivered to the shell from gesture callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    OpenDrawer,
}

/// Navigation state of the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    pub current_view: View,
    pub page: Page,
    pub sidebar_open: bool,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_settings_page(&self) -> bool {
        self.page == Page::Settings
    }

    /// Switch view, leaving the settings page if needed.
    pub fn select_view(&mut self, view: View) {
        self.page = Page::Main;
        self.current_view = view;
    }

    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn apply(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::OpenDrawer => self.set_sidebar_open(true),
        }
    }

    /// Handle a click on a bottom navigation entry.
    pub fn handle_nav_click(&mut self, item: NavItem) -> Option<ShellEvent> {
        match item {
            NavItem::Menu => self.toggle_sidebar(),
            NavItem::View(view) => self.select_view(view),
            NavItem::Page(page) => self.navigate(page),
            NavItem::ThemeToggle => return Some(ShellEvent::ToggleTheme),
        }
        None
    }

    /// Page entries are active on their page; view entries are active when
    /// their view is showing and the settings page is not.
    pub fn is_active(&self, item: NavItem) -> bool {
        match item {
            NavItem::Page(page) => self.page == page,
            NavItem::View(view) => !self.is_settings_page() && self.current_view == view,
            NavItem::Menu | NavItem::ThemeToggle => false,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the desktop activity bar. Returns the view that was clicked.
pub fn render_activity_bar(ui: &mut egui::Ui, state: &ShellState) -> Option<View> {
    let mut clicked = None;
    ui.vertical_centered(|ui| {
        ui.add_space(spacing::SM);
        for view in View::visible(false) {
            let is_active = !state.is_settings_page() && state.current_view == view;
            let response = activity_button(ui, view, is_active).on_hover_text(view.label());
            if response.clicked() {
                clicked = Some(view);
            }
            ui.add_space(spacing::XS);
        }
    });
    clicked
}

fn activity_button(ui: &mut egui::Ui, view: View, is_active: bool) -> egui::Response {
    let palette = Palette::of(ui);
    let (rect, response) =
        ui.allocate_exact_size(egui::Vec2::splat(ACTIVITY_BUTTON_SIZE), Sense::click());

    let bg = if is_active || response.hovered() {
        palette.surface_hover
    } else {
        Color32::TRANSPARENT
    };
    ui.painter()
        .rect_filled(rect, Rounding::same(ITEM_ROUNDING), bg);

    if is_active {
        let indicator = Rect::from_min_size(
            egui::pos2(rect.left() - spacing::XS, rect.top()),
            egui::vec2(ACTIVE_INDICATOR_WIDTH, rect.height()),
        );
        ui.painter().rect_filled(indicator, Rounding::ZERO, palette.brand);
    }

    let color = if is_active {
        palette.brand
    } else {
        palette.text_tertiary
    };
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        view.icon(),
        typography::font(FontSize::Heading),
        color,
    );
    response
}

/// Render the bottom navigation bar. Returns the entry that was clicked.
pub fn render_bottom_nav(ui: &mut egui::Ui, state: &ShellState, theme: Theme) -> Option<NavItem> {
    let palette = Palette::of(ui);
    let item_width = ui.available_width() / BOTTOM_NAV_ITEMS.len() as f32;
    let mut clicked = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for item in BOTTOM_NAV_ITEMS {
            let active = state.is_active(item);
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(item_width, BOTTOM_NAV_HEIGHT),
                Sense::click(),
            );
            if response.is_pointer_button_down_on() {
                ui.painter().rect_filled(rect, Rounding::ZERO, palette.surface_hover);
            }

            let color = if active {
                palette.brand
            } else {
                palette.text_tertiary
            };
            ui.painter().text(
                rect.center() - egui::vec2(0.0, spacing::SM),
                egui::Align2::CENTER_CENTER,
                item.icon(theme),
                typography::font(FontSize::Heading),
                color,
            );
            ui.painter().text(
                rect.center() + egui::vec2(0.0, spacing::MD),
                egui::Align2::CENTER_CENTER,
                item.label(theme),
                typography::font(FontSize::Caption),
                color,
            );

            if response.clicked() {
                clicked = Some(item);
            }
        }
    });

    clicked
}

/// What the user picked in the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerAction {
    SelectView(View),
    OpenSettings,
    Close,
}

/// Render the slide-in drawer over the content when it is open.
pub fn render_drawer(ctx: &egui::Context, state: &ShellState) -> Option<DrawerAction> {
    if !state.sidebar_open {
        return None;
    }

    let mut action = None;
    let screen_rect = ctx.screen_rect();

    egui::Area::new(egui::Id::new("drawer_backdrop"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::Pos2::ZERO)
        .show(ctx, |ui| {
            ui.painter().rect_filled(
                screen_rect,
                Rounding::ZERO,
                Color32::from_black_alpha(DRAWER_BACKDROP_ALPHA),
            );
            let (_, backdrop) = ui.allocate_exact_size(screen_rect.size(), Sense::click());
            if backdrop.clicked() {
                action = Some(DrawerAction::Close);
            }
        });

    egui::Area::new(egui::Id::new("drawer"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::Pos2::ZERO)
        .show(ctx, |ui| {
            let palette = Palette::of(ui);
            egui::Frame::none()
                .fill(palette.surface)
                .stroke(Stroke::new(1.0, palette.border))
                .inner_margin(egui::Margin::same(spacing::MD))
                .show(ui, |ui| {
                    ui.set_width(DRAWER_WIDTH - 2.0 * spacing::MD);
                    ui.set_min_height(screen_rect.height() - 2.0 * spacing::MD);

                    ui.label(
                        egui::RichText::new("chatdeck")
                            .font(typography::font(FontSize::Heading))
                            .strong()
                            .color(palette.text_primary),
                    );
                    ui.add_space(spacing::LG);

                    for view in View::visible(true) {
                        let is_active = !state.is_settings_page() && state.current_view == view;
                        let label = format!("{}  {}", view.icon(), view.label());
                        if drawer_item(ui, &label, is_active) {
                            action = Some(DrawerAction::SelectView(view));
                        }
                        ui.add_space(spacing::XS);
                    }

                    ui.separator();
                    if drawer_item(ui, "⚙  Settings", state.is_settings_page()) {
                        action = Some(DrawerAction::OpenSettings);
                    }
                });
        });

    action
}

/// A full-width drawer row. Returns true if clicked.
fn drawer_item(ui: &mut egui::Ui, label: &str, is_active: bool) -> bool {
    let palette = Palette::of(ui);
    let size = egui::vec2(ui.available_width(), DRAWER_ITEM_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    let bg = if is_active || response.hovered() {
        palette.surface_hover
    } else {
        Color32::TRANSPARENT
    };
    ui.painter()
        .rect_filled(rect, Rounding::same(ITEM_ROUNDING), bg);

    if is_active {
        let indicator = Rect::from_min_size(
            rect.min,
            egui::vec2(ACTIVE_INDICATOR_WIDTH, rect.height()),
        );
        ui.painter().rect_filled(
            indicator,
            Rounding {
                nw: ITEM_ROUNDING,
                sw: ITEM_ROUNDING,
                ne: 0.0,
                se: 0.0,
            },
            palette.brand,
        );
    }

    ui.painter().text(
        egui::pos2(rect.left() + spacing::LG, rect.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        typography::font(FontSize::Body),
        if is_active {
            palette.text_primary
        } else {
            palette.text_secondary
        },
    );

    response.clicked()
}

/// Body of a workspace view.
pub fn render_view(ui: &mut egui::Ui, view: View) {
    let palette = Palette::of(ui);
    ui.vertical_centered(|ui| {
        ui.add_space(spacing::XL);
        ui.label(
            egui::RichText::new(view.icon()).font(egui::FontId::proportional(32.0)),
        );
        ui.add_space(spacing::SM);
        ui.label(
            egui::RichText::new(view.label())
                .font(typography::font(FontSize::Heading))
                .color(palette.text_primary),
        );
        ui.label(
            egui::RichText::new("No session is connected.")
                .font(typography::font(FontSize::Small))
                .color(palette.text_tertiary),
        );
    });
}
