//! Settings screen.
//!
//! Three tabs: General (secrets, sound, theme), Environment (environment
//! variables) and Prompts (custom prompts). Every edit is written through a
//! [`SettingsStore`]; failed writes are logged and shown at the top of the
//! screen while the in-memory settings stay unchanged.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui;
use uuid::Uuid;

use crate::config::{
    self, CustomPrompt, EnvVar, SecretField, Settings, Theme, MAX_CUSTOM_PROMPTS, MAX_ENV_VARS,
};
use crate::error::{ChatdeckError, Result};
use crate::logging::TracingFailureLog;
use crate::ui::gui::components;
use crate::ui::gui::list_panel::{DeleteOutcome, ListCallbacks, ListPanel, ListPanelOptions};
use crate::ui::gui::theme::{spacing, Palette};
use crate::ui::gui::typography::{self, FontSize};

const PROMPT_PREVIEW_CHARS: usize = 80;

const FORM_TEXT_ROWS: usize = 6;

// ============================================================================
// Store
// ============================================================================

/// Where settings are persisted.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// A store backed by the settings file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that validates but never writes.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        match &self.path {
            Some(path) => config::save_settings_to(path, settings),
            None => config::validate_settings(settings),
        }
    }
}

/// Changes made off the UI thread, applied on the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    EnvVarRemoved(Uuid),
}

/// Persist the removal of the environment variable at `index` on a worker
/// thread. The UI learns the outcome through the returned channel, and the
/// in-memory removal arrives on `updates`.
pub fn spawn_env_delete(
    store: &SettingsStore,
    snapshot: &Settings,
    index: usize,
    updates: Sender<StoreUpdate>,
) -> DeleteOutcome {
    let Some(var) = snapshot.env_vars.get(index) else {
        return DeleteOutcome::Done(Err(ChatdeckError::DeleteFailed(
            "environment variable no longer exists".to_string(),
        )));
    };

    let id = var.id;
    let mut next = snapshot.clone();
    next.env_vars.retain(|v| v.id != id);
    let store = store.clone();
    let (tx, outcome) = DeleteOutcome::channel();

    thread::spawn(move || {
        let result = store.save(&next).map(|()| {
            let _ = updates.send(StoreUpdate::EnvVarRemoved(id));
        });
        let _ = tx.send(result);
    });

    outcome
}

// ============================================================================
// Forms
// ============================================================================

/// Add/edit form for an environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarForm {
    /// Index being edited, or `None` when adding.
    pub editing: Option<usize>,
    pub name: String,
    pub value: String,
}

impl EnvVarForm {
    pub fn edit(index: usize, var: &EnvVar) -> Self {
        Self {
            editing: Some(index),
            name: var.name.clone(),
            value: var.value.clone(),
        }
    }

    /// Settings with this form applied, validated.
    pub fn apply(&self, settings: &Settings) -> Result<Settings> {
        let mut next = settings.clone();
        let name = self.name.trim().to_string();
        match self.editing {
            Some(index) => {
                let var = next.env_vars.get_mut(index).ok_or_else(|| {
                    ChatdeckError::InvalidSetting("environment variable no longer exists".into())
                })?;
                var.name = name;
                var.value = self.value.clone();
            }
            None => next.env_vars.push(EnvVar::new(name, self.value.clone())),
        }
        config::validate_settings(&next)?;
        Ok(next)
    }
}

/// Add/edit form for a custom prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    pub editing: Option<usize>,
    pub name: String,
    pub content: String,
}

impl PromptForm {
    pub fn edit(index: usize, prompt: &CustomPrompt) -> Self {
        Self {
            editing: Some(index),
            name: prompt.name.clone(),
            content: prompt.content.clone(),
        }
    }

    pub fn apply(&self, settings: &Settings) -> Result<Settings> {
        let mut next = settings.clone();
        let name = self.name.trim().to_string();
        match self.editing {
            Some(index) => {
                let prompt = next.custom_prompts.get_mut(index).ok_or_else(|| {
                    ChatdeckError::InvalidSetting("custom prompt no longer exists".into())
                })?;
                prompt.name = name;
                prompt.content = self.content.clone();
            }
            None => next
                .custom_prompts
                .push(CustomPrompt::new(name, self.content.clone())),
        }
        config::validate_settings(&next)?;
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Save,
    Cancel,
}

// ============================================================================
// Screen
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Environment,
    Prompts,
}

impl SettingsTab {
    pub fn all() -> &'static [SettingsTab] {
        &[
            SettingsTab::General,
            SettingsTab::Environment,
            SettingsTab::Prompts,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsTab::General => "General",
            SettingsTab::Environment => "Environment",
            SettingsTab::Prompts => "Prompts",
        }
    }
}

pub struct SettingsScreen {
    store: SettingsStore,
    tab: SettingsTab,
    revealed: HashSet<SecretField>,
    env_panel: ListPanel<EnvVar>,
    prompt_panel: ListPanel<CustomPrompt>,
    env_form: Option<EnvVarForm>,
    prompt_form: Option<PromptForm>,
    save_error: Option<String>,
    updates_tx: Sender<StoreUpdate>,
    updates_rx: Receiver<StoreUpdate>,
    failure_log: TracingFailureLog,
}

impl SettingsScreen {
    pub fn new(store: SettingsStore) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel();

        let env_options = ListPanelOptions::new("Environment Variables", "EnvironmentVariables")
            .description("Exported into every sandbox session.")
            .empty_state("No environment variables yet.", "Add your first variable")
            .add_button_text("Add variable")
            .delete_confirm_title("Delete environment variable")
            .max_limit(MAX_ENV_VARS);

        let prompt_options = ListPanelOptions::new("Custom Prompts", "CustomPrompts")
            .description("Reusable instructions you can insert into a chat.")
            .empty_state("No custom prompts yet.", "Create your first prompt")
            .add_button_text("Add prompt")
            .delete_confirm_title("Delete custom prompt")
            .max_limit(MAX_CUSTOM_PROMPTS);

        Self {
            store,
            tab: SettingsTab::default(),
            revealed: HashSet::new(),
            env_panel: ListPanel::new("env_vars_panel", env_options),
            prompt_panel: ListPanel::new("custom_prompts_panel", prompt_options),
            env_form: None,
            prompt_form: None,
            save_error: None,
            updates_tx,
            updates_rx,
            failure_log: TracingFailureLog,
        }
    }

    pub fn tab(&self) -> SettingsTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: SettingsTab) {
        self.tab = tab;
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Apply updates produced by worker threads.
    pub fn poll_updates(&mut self, settings: &mut Settings) {
        while let Ok(update) = self.updates_rx.try_recv() {
            match update {
                StoreUpdate::EnvVarRemoved(id) => {
                    settings.env_vars.retain(|v| v.id != id);
                    tracing::debug!(%id, "environment variable removed");
                }
            }
        }
    }

    /// Persist `next` and adopt it. On failure `settings` is left untouched.
    pub fn commit(&mut self, settings: &mut Settings, next: Settings) -> Result<()> {
        match self.store.save(&next) {
            Ok(()) => {
                *settings = next;
                self.save_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save settings");
                self.save_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        self.poll_updates(settings);
        let palette = Palette::of(ui);

        ui.label(
            egui::RichText::new("Settings")
                .font(typography::font(FontSize::Heading))
                .strong()
                .color(palette.text_primary),
        );
        ui.add_space(spacing::MD);

        ui.horizontal(|ui| {
            for &tab in SettingsTab::all() {
                if ui.selectable_label(self.tab == tab, tab.label()).clicked() {
                    self.tab = tab;
                }
            }
        });
        ui.separator();

        if let Some(error) = &self.save_error {
            ui.label(egui::RichText::new(error).color(palette.error));
            ui.add_space(spacing::SM);
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match self.tab {
                SettingsTab::General => self.render_general(ui, settings),
                SettingsTab::Environment => self.render_environment(ui, settings),
                SettingsTab::Prompts => self.render_prompts(ui, settings),
            });
    }

    // ------------------------------------------------------------------------
    // General
    // ------------------------------------------------------------------------

    fn render_general(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        components::section_heading(ui, "Credentials");
        for &field in SecretField::all() {
            let mut value = settings.secret(field).to_string();
            let revealed = self.revealed.contains(&field);

            ui.label(field.label());
            components::description(ui, field.description());
            let (edit, toggle) = ui
                .horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut value)
                            .password(!revealed)
                            .hint_text(field.placeholder())
                            .desired_width(ui.available_width() - 40.0),
                    );
                    let toggle = ui
                        .button(if revealed { "🙈" } else { "👁" })
                        .on_hover_text(if revealed { "Hide" } else { "Show" });
                    (edit, toggle)
                })
                .inner;

            if toggle.clicked() && !self.revealed.remove(&field) {
                self.revealed.insert(field);
            }
            if edit.changed() {
                let mut next = settings.clone();
                *next.secret_mut(field) = value;
                let _ = self.commit(settings, next);
            }
            ui.add_space(spacing::MD);
        }

        ui.add_space(spacing::LG);
        components::section_heading(ui, "Preferences");

        let mut sound = settings.notification_sound_enabled;
        let changed = components::setting_row(
            ui,
            "Notification sound",
            "Play a sound when a response finishes.",
            |ui| components::toggle_switch(ui, &mut sound).changed(),
        );
        if changed {
            let mut next = settings.clone();
            next.notification_sound_enabled = sound;
            let _ = self.commit(settings, next);
        }

        ui.add_space(spacing::SM);
        let mut dark = settings.theme.is_dark();
        let changed = components::setting_row(ui, "Dark mode", "Use the dark color scheme.", |ui| {
            components::toggle_switch(ui, &mut dark).changed()
        });
        if changed {
            let mut next = settings.clone();
            next.theme = if dark { Theme::Dark } else { Theme::Light };
            let _ = self.commit(settings, next);
        }
    }

    // ------------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------------

    fn render_environment(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        if let Some(form) = self.env_form.as_mut() {
            match render_env_form(ui, form) {
                Some(FormAction::Save) => {
                    let form = form.clone();
                    match form.apply(settings) {
                        Ok(next) => {
                            if self.commit(settings, next).is_ok() {
                                self.env_form = None;
                            }
                        }
                        Err(e) => self.save_error = Some(e.to_string()),
                    }
                }
                Some(FormAction::Cancel) => {
                    self.env_form = None;
                    self.save_error = None;
                }
                None => {}
            }
            ui.add_space(spacing::LG);
        }

        self.env_panel.set_limit_reached(settings.env_vars_full());

        let Self {
            store,
            env_panel,
            env_form,
            updates_tx,
            failure_log,
            ..
        } = self;
        let snapshot: &Settings = settings;

        let mut render = |ui: &mut egui::Ui, var: &EnvVar, _: usize| {
            ui.label(
                egui::RichText::new(&var.name)
                    .font(typography::mono(FontSize::Body))
                    .color(Palette::of(ui).text_primary),
            );
            components::description(ui, &"•".repeat(var.value.chars().count().min(12)));
        };
        let requested_form = Cell::new(None);
        let mut on_add = || requested_form.set(Some(EnvVarForm::default()));
        let mut on_edit = |index: usize| {
            if let Some(var) = snapshot.env_vars.get(index) {
                requested_form.set(Some(EnvVarForm::edit(index, var)));
            }
        };
        let mut on_delete =
            |index: usize| spawn_env_delete(store, snapshot, index, updates_tx.clone());

        let mut callbacks = ListCallbacks {
            item_key: &|var: &EnvVar, _: usize| var.id.to_string(),
            render_item: &mut render,
            delete_confirm_message: &|var: &EnvVar| {
                format!(
                    "Are you sure you want to delete the environment variable \"{}\"? This action cannot be undone.",
                    var.name
                )
            },
            on_add: &mut on_add,
            on_edit: Some(&mut on_edit),
            on_delete: &mut on_delete,
            footer: None,
        };
        env_panel.show(
            ui,
            Some(snapshot.env_vars.as_slice()),
            &mut callbacks,
            &*failure_log,
        );

        if let Some(form) = requested_form.take() {
            *env_form = Some(form);
        }
    }

    // ------------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------------

    fn render_prompts(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        if let Some(form) = self.prompt_form.as_mut() {
            match render_prompt_form(ui, form) {
                Some(FormAction::Save) => {
                    let form = form.clone();
                    match form.apply(settings) {
                        Ok(next) => {
                            if self.commit(settings, next).is_ok() {
                                self.prompt_form = None;
                            }
                        }
                        Err(e) => self.save_error = Some(e.to_string()),
                    }
                }
                Some(FormAction::Cancel) => {
                    self.prompt_form = None;
                    self.save_error = None;
                }
                None => {}
            }
            ui.add_space(spacing::LG);
        }

        self.prompt_panel
            .set_limit_reached(settings.custom_prompts_full());

        let mut staged: Option<Settings> = None;
        {
            let Self {
                store,
                prompt_panel,
                prompt_form,
                failure_log,
                ..
            } = self;
            let snapshot: &Settings = settings;

            let mut render = |ui: &mut egui::Ui, prompt: &CustomPrompt, _: usize| {
                ui.label(
                    egui::RichText::new(&prompt.name)
                        .font(typography::font(FontSize::Body))
                        .strong()
                        .color(Palette::of(ui).text_primary),
                );
                components::description(ui, &prompt_preview(&prompt.content));
            };
            let requested_form = Cell::new(None);
            let mut on_add = || requested_form.set(Some(PromptForm::default()));
            let mut on_edit = |index: usize| {
                if let Some(prompt) = snapshot.custom_prompts.get(index) {
                    requested_form.set(Some(PromptForm::edit(index, prompt)));
                }
            };
            let mut on_delete = |index: usize| {
                if index >= snapshot.custom_prompts.len() {
                    return DeleteOutcome::Done(Err(ChatdeckError::DeleteFailed(
                        "custom prompt no longer exists".to_string(),
                    )));
                }
                let mut next = snapshot.clone();
                next.custom_prompts.remove(index);
                let result = store.save(&next);
                if result.is_ok() {
                    staged = Some(next);
                }
                DeleteOutcome::Done(result)
            };

            let mut callbacks = ListCallbacks {
                item_key: &|prompt: &CustomPrompt, _: usize| prompt.id.to_string(),
                render_item: &mut render,
                delete_confirm_message: &|prompt: &CustomPrompt| {
                    format!(
                        "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                        prompt.name
                    )
                },
                on_add: &mut on_add,
                on_edit: Some(&mut on_edit),
                on_delete: &mut on_delete,
                footer: None,
            };
            prompt_panel.show(
                ui,
                Some(snapshot.custom_prompts.as_slice()),
                &mut callbacks,
                &*failure_log,
            );

            if let Some(form) = requested_form.take() {
                *prompt_form = Some(form);
            }
        }

        if let Some(next) = staged {
            *settings = next;
        }
    }
}

/// First line of a prompt, shortened for the list row.
fn prompt_preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() > PROMPT_PREVIEW_CHARS {
        let truncated: String = first_line.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}

fn render_form_frame<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let palette = Palette::of(ui);
    egui::Frame::none()
        .fill(palette.surface_secondary)
        .stroke(egui::Stroke::new(1.0, palette.border))
        .rounding(egui::Rounding::same(crate::ui::gui::theme::rounding::CARD))
        .inner_margin(egui::Margin::same(spacing::LG))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

fn form_buttons(ui: &mut egui::Ui, is_edit: bool) -> Option<FormAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui.button(if is_edit { "Save" } else { "Add" }).clicked() {
            action = Some(FormAction::Save);
        }
        if ui.button("Cancel").clicked() {
            action = Some(FormAction::Cancel);
        }
    });
    action
}

fn render_env_form(ui: &mut egui::Ui, form: &mut EnvVarForm) -> Option<FormAction> {
    render_form_frame(ui, |ui| {
        components::section_heading(
            ui,
            if form.editing.is_some() {
                "Edit variable"
            } else {
                "New variable"
            },
        );
        ui.label("Name");
        ui.add(
            egui::TextEdit::singleline(&mut form.name)
                .hint_text("API_BASE_URL")
                .font(typography::mono(FontSize::Body)),
        );
        ui.label("Value");
        ui.add(egui::TextEdit::singleline(&mut form.value).password(true));
        ui.add_space(spacing::SM);
        form_buttons(ui, form.editing.is_some())
    })
}

fn render_prompt_form(ui: &mut egui::Ui, form: &mut PromptForm) -> Option<FormAction> {
    render_form_frame(ui, |ui| {
        components::section_heading(
            ui,
            if form.editing.is_some() {
                "Edit prompt"
            } else {
                "New prompt"
            },
        );
        ui.label("Name");
        ui.add(egui::TextEdit::singleline(&mut form.name).hint_text("Code review"));
        ui.label("Content");
        ui.add(
            egui::TextEdit::multiline(&mut form.content)
                .desired_rows(FORM_TEXT_ROWS)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(spacing::SM);
        form_buttons(ui, form.editing.is_some())
    })
}
