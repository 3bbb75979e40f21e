//! Generic list-management panel.
//!
//! [`ListPanel`] renders a titled list of host-owned items with add, optional
//! edit and delete-with-confirmation. The panel never touches the items: all
//! mutation goes through [`ListCallbacks`], and the items only change when the
//! host hands the panel a new slice.
//!
//! Deletion runs through [`ListPanelState`]:
//!
//! ```text
//! Idle --request_delete(i)--> Confirming(i) --cancel--> Idle
//! Confirming(i) --confirm--> Deleting(i) --ok--> Idle
//!                                       \--err--> Confirming(i)
//! ```
//!
//! The host's delete may finish synchronously ([`DeleteOutcome::Done`]) or
//! later over a channel ([`DeleteOutcome::Pending`]), which the panel polls
//! once per frame.

use std::marker::PhantomData;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui::{self, Rounding, Stroke};

use crate::error::{ChatdeckError, Result};
use crate::logging::FailureLog;
use crate::ui::gui::components::{self, SPINNER_SIZE};
use crate::ui::gui::modal::{ConfirmDialog, DialogButton, DialogResponse};
use crate::ui::gui::theme::{rounding, spacing, Palette};
use crate::ui::gui::typography::{self, FontSize};

/// Message used when the confirmation target no longer exists.
pub const GENERIC_DELETE_MESSAGE: &str =
    "Are you sure you want to delete this item? This action cannot be undone.";

const ROW_BUTTON_SIZE: f32 = 28.0;

// ============================================================================
// Delete State Machine
// ============================================================================

/// Result of handing a delete to the host.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The delete already finished.
    Done(Result<()>),
    /// The delete finishes later; the result arrives on this channel.
    Pending(Receiver<Result<()>>),
}

impl DeleteOutcome {
    /// A synchronous success.
    pub fn done() -> Self {
        DeleteOutcome::Done(Ok(()))
    }

    /// A pending outcome plus the sender the host completes it with.
    pub fn channel() -> (std::sync::mpsc::Sender<Result<()>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, DeleteOutcome::Pending(rx))
    }
}

impl From<Result<()>> for DeleteOutcome {
    fn from(result: Result<()>) -> Self {
        DeleteOutcome::Done(result)
    }
}

#[derive(Debug)]
struct InFlight {
    index: usize,
    rx: Receiver<Result<()>>,
}

/// Transient delete state of one panel.
#[derive(Debug, Default)]
pub struct ListPanelState {
    pending_delete: Option<usize>,
    deleting: Option<InFlight>,
}

impl ListPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index waiting for (or undergoing) confirmation.
    pub fn pending_delete_index(&self) -> Option<usize> {
        self.pending_delete
    }

    /// Index whose delete is in flight.
    pub fn deleting_index(&self) -> Option<usize> {
        self.deleting.as_ref().map(|d| d.index)
    }

    pub fn is_confirming(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    /// Open the confirmation for `index`.
    ///
    /// Ignored while another confirmation is open. Returns whether it opened.
    pub fn request_delete(&mut self, index: usize) -> bool {
        if self.pending_delete.is_some() {
            return false;
        }
        self.pending_delete = Some(index);
        true
    }

    /// Close the confirmation without deleting. Ignored while deleting.
    pub fn cancel(&mut self) -> bool {
        if self.deleting.is_some() || self.pending_delete.is_none() {
            return false;
        }
        self.pending_delete = None;
        true
    }

    /// Confirm the pending delete and hand it to `on_delete`.
    ///
    /// Returns false (without calling `on_delete`) when nothing is pending or
    /// a delete is already in flight.
    pub fn confirm(
        &mut self,
        on_delete: impl FnOnce(usize) -> DeleteOutcome,
        log: &dyn FailureLog,
        context: &str,
    ) -> bool {
        let Some(index) = self.pending_delete else {
            return false;
        };
        if self.deleting.is_some() {
            return false;
        }

        tracing::debug!(context, index, "deleting item");
        match on_delete(index) {
            DeleteOutcome::Done(result) => self.finish(index, result, log, context),
            DeleteOutcome::Pending(rx) => self.deleting = Some(InFlight { index, rx }),
        }
        true
    }

    /// Pick up the result of an in-flight delete, if it has arrived.
    pub fn poll(&mut self, log: &dyn FailureLog, context: &str) {
        let Some(in_flight) = self.deleting.as_ref() else {
            return;
        };
        let result = match in_flight.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(ChatdeckError::DeleteAbandoned),
        };
        let index = in_flight.index;
        self.deleting = None;
        self.finish(index, result, log, context);
    }

    fn finish(&mut self, index: usize, result: Result<()>, log: &dyn FailureLog, context: &str) {
        self.deleting = None;
        match result {
            Ok(()) => {
                tracing::debug!(context, index, "item deleted");
                self.pending_delete = None;
            }
            Err(error) => log.log_failure(context, &error),
        }
    }

    /// Confirmation text for the pending item, falling back to a generic
    /// message when the index no longer points into `items`.
    pub fn confirm_message<T>(
        &self,
        items: Option<&[T]>,
        message_for: impl FnOnce(&T) -> String,
    ) -> String {
        self.pending_delete
            .and_then(|index| items.and_then(|items| items.get(index)))
            .map(message_for)
            .unwrap_or_else(|| GENERIC_DELETE_MESSAGE.to_string())
    }
}

// ============================================================================
// Panel Configuration
// ============================================================================

/// Static text and limits for a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPanelOptions {
    pub title: String,
    pub description: String,
    pub empty_text: String,
    pub empty_button_text: String,
    pub add_button_text: String,
    pub delete_confirm_title: String,
    /// Label attached to failures sent to the [`FailureLog`].
    pub log_context: String,
    pub max_limit: Option<usize>,
    /// Host-computed; the panel only disables the add action.
    pub is_max_limit_reached: bool,
}

impl ListPanelOptions {
    pub fn new(title: impl Into<String>, log_context: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            empty_text: "Nothing here yet.".to_string(),
            empty_button_text: "Add the first item".to_string(),
            add_button_text: "Add".to_string(),
            delete_confirm_title: "Delete item".to_string(),
            log_context: log_context.into(),
            max_limit: None,
            is_max_limit_reached: false,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn empty_state(mut self, text: impl Into<String>, button: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self.empty_button_text = button.into();
        self
    }

    pub fn add_button_text(mut self, text: impl Into<String>) -> Self {
        self.add_button_text = text.into();
        self
    }

    pub fn delete_confirm_title(mut self, text: impl Into<String>) -> Self {
        self.delete_confirm_title = text.into();
        self
    }

    pub fn max_limit(mut self, limit: usize) -> Self {
        self.max_limit = Some(limit);
        self
    }

    /// Tooltip for the disabled add action, if any.
    pub fn limit_label(&self) -> Option<String> {
        match (self.is_max_limit_reached, self.max_limit) {
            (true, Some(limit)) => Some(format!("Maximum of {} items reached", limit)),
            _ => None,
        }
    }
}

/// Host-supplied projections and callbacks for one frame.
///
/// `on_edit` is optional; without it rows have no edit button.
pub struct ListCallbacks<'a, T> {
    pub item_key: &'a dyn Fn(&T, usize) -> String,
    pub render_item: &'a mut dyn FnMut(&mut egui::Ui, &T, usize),
    pub delete_confirm_message: &'a dyn Fn(&T) -> String,
    pub on_add: &'a mut dyn FnMut(),
    pub on_edit: Option<&'a mut dyn FnMut(usize)>,
    pub on_delete: &'a mut dyn FnMut(usize) -> DeleteOutcome,
    pub footer: Option<&'a mut dyn FnMut(&mut egui::Ui)>,
}

/// What the rows asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Edit(usize),
    Delete(usize),
}

// ============================================================================
// Panel
// ============================================================================

/// A list-management panel over items of type `T`.
pub struct ListPanel<T> {
    id: egui::Id,
    options: ListPanelOptions,
    state: ListPanelState,
    _item: PhantomData<fn(&T)>,
}

impl<T> ListPanel<T> {
    pub fn new(id_source: impl std::hash::Hash, options: ListPanelOptions) -> Self {
        Self {
            id: egui::Id::new(id_source),
            options,
            state: ListPanelState::new(),
            _item: PhantomData,
        }
    }

    pub fn options(&self) -> &ListPanelOptions {
        &self.options
    }

    /// Update the host-computed limit flag.
    pub fn set_limit_reached(&mut self, reached: bool) {
        self.options.is_max_limit_reached = reached;
    }

    pub fn state(&self) -> &ListPanelState {
        &self.state
    }

    /// Render the panel and its confirmation dialog.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        items: Option<&[T]>,
        callbacks: &mut ListCallbacks<'_, T>,
        log: &dyn FailureLog,
    ) {
        self.state.poll(log, &self.options.log_context);
        if self.state.is_deleting() {
            ui.ctx().request_repaint();
        }

        self.render_header(ui, callbacks);

        let mut row_action = None;
        match items {
            Some(items) if !items.is_empty() => {
                for (index, item) in items.iter().enumerate() {
                    let key = (callbacks.item_key)(item, index);
                    ui.push_id(self.id.with(key), |ui| {
                        if let Some(action) = self.render_row(ui, item, index, callbacks) {
                            row_action = Some(action);
                        }
                    });
                    ui.add_space(spacing::SM);
                }
            }
            _ => self.render_empty(ui, callbacks),
        }

        if let Some(footer) = callbacks.footer.as_mut() {
            footer(ui);
        }

        match row_action {
            Some(RowAction::Edit(index)) => {
                if let Some(on_edit) = callbacks.on_edit.as_mut() {
                    on_edit(index);
                }
            }
            Some(RowAction::Delete(index)) => {
                self.state.request_delete(index);
            }
            None => {}
        }

        self.render_confirmation(ui.ctx(), items, callbacks, log);
    }

    fn render_header(&self, ui: &mut egui::Ui, callbacks: &mut ListCallbacks<'_, T>) {
        let palette = Palette::of(ui);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(&self.options.title)
                    .font(typography::font(FontSize::Body))
                    .strong()
                    .color(palette.text_primary),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let button = egui::Button::new(format!("+ {}", self.options.add_button_text));
                let mut response = ui.add_enabled(!self.options.is_max_limit_reached, button);
                if let Some(label) = self.options.limit_label() {
                    response = response.on_disabled_hover_text(label);
                }
                if response.clicked() {
                    (callbacks.on_add)();
                }
            });
        });

        if !self.options.description.is_empty() {
            components::description(ui, &self.options.description);
        }
        ui.add_space(spacing::MD);
    }

    fn render_empty(&self, ui: &mut egui::Ui, callbacks: &mut ListCallbacks<'_, T>) {
        let palette = Palette::of(ui);
        egui::Frame::none()
            .stroke(Stroke::new(1.0, palette.border))
            .rounding(Rounding::same(rounding::CARD))
            .inner_margin(egui::Margin::same(spacing::XL))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.options.empty_text)
                            .font(typography::font(FontSize::Body))
                            .color(palette.text_tertiary),
                    );
                    ui.add_space(spacing::MD);
                    let button = egui::Button::new(
                        egui::RichText::new(&self.options.empty_button_text)
                            .color(egui::Color32::WHITE),
                    )
                    .fill(palette.brand);
                    if ui.add(button).clicked() {
                        (callbacks.on_add)();
                    }
                });
            });
    }

    fn render_row(
        &self,
        ui: &mut egui::Ui,
        item: &T,
        index: usize,
        callbacks: &mut ListCallbacks<'_, T>,
    ) -> Option<RowAction> {
        let palette = Palette::of(ui);
        let is_deleting = self.state.deleting_index() == Some(index);
        let mut action = None;

        egui::Frame::none()
            .stroke(Stroke::new(1.0, palette.border))
            .rounding(Rounding::same(rounding::CARD))
            .inner_margin(egui::Margin::same(spacing::MD))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                        if is_deleting {
                            components::spinner(ui, SPINNER_SIZE);
                        } else {
                            let delete = egui::Button::new(
                                egui::RichText::new("🗑").color(palette.error),
                            )
                            .frame(false)
                            .min_size(egui::Vec2::splat(ROW_BUTTON_SIZE));
                            if ui.add(delete).on_hover_text("Delete item").clicked() {
                                action = Some(RowAction::Delete(index));
                            }
                        }

                        if callbacks.on_edit.is_some() {
                            let edit = egui::Button::new(
                                egui::RichText::new("✏").color(palette.text_tertiary),
                            )
                            .frame(false)
                            .min_size(egui::Vec2::splat(ROW_BUTTON_SIZE));
                            if ui.add(edit).on_hover_text("Edit item").clicked() {
                                action = Some(RowAction::Edit(index));
                            }
                        }

                        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                            (callbacks.render_item)(ui, item, index);
                        });
                    });
                });
            });

        action
    }

    fn confirm_dialog_id(&self) -> String {
        format!("{:?}_confirm", self.id)
    }

    fn render_confirmation(
        &mut self,
        ctx: &egui::Context,
        items: Option<&[T]>,
        callbacks: &mut ListCallbacks<'_, T>,
        log: &dyn FailureLog,
    ) {
        if !self.state.is_confirming() {
            return;
        }

        let message = self
            .state
            .confirm_message(items, |item| (callbacks.delete_confirm_message)(item));

        let response = ConfirmDialog::new(&self.options.delete_confirm_title)
            .id(self.confirm_dialog_id())
            .message(message)
            .cancel_button(DialogButton::secondary("Cancel"))
            .confirm_button(DialogButton::destructive("Delete"))
            .busy(self.state.is_deleting())
            .busy_label("Deleting...")
            .show(ctx);

        match response {
            DialogResponse::Confirmed => {
                self.state.confirm(
                    |index| (callbacks.on_delete)(index),
                    log,
                    &self.options.log_context,
                );
            }
            DialogResponse::Cancelled => {
                self.state.cancel();
            }
            DialogResponse::Open => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingLog {
        entries: RefCell<Vec<(String, String)>>,
    }

    impl FailureLog for RecordingLog {
        fn log_failure(&self, context: &str, error: &ChatdeckError) {
            self.entries
                .borrow_mut()
                .push((context.to_string(), error.to_string()));
        }
    }

    impl RecordingLog {
        fn count(&self) -> usize {
            self.entries.borrow().len()
        }
    }

    const CTX: &str = "TestList";

    #[test]
    fn test_request_then_cancel_returns_to_idle() {
        let log = RecordingLog::default();
        for n in 1..5usize {
            for i in 0..n {
                let mut state = ListPanelState::new();
                let calls = Cell::new(0);
                assert!(state.request_delete(i));
                assert_eq!(state.pending_delete_index(), Some(i));
                assert!(state.cancel());
                assert_eq!(state.pending_delete_index(), None);
                assert_eq!(state.deleting_index(), None);
                assert!(!state.confirm(
                    |_| {
                        calls.set(calls.get() + 1);
                        DeleteOutcome::done()
                    },
                    &log,
                    CTX
                ));
                assert_eq!(calls.get(), 0);
            }
        }
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_only_one_confirmation_at_a_time() {
        let mut state = ListPanelState::new();
        assert!(state.request_delete(1));
        assert!(!state.request_delete(2));
        assert_eq!(state.pending_delete_index(), Some(1));
    }

    #[test]
    fn test_sync_success_closes_dialog() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        let mut deleted = Vec::new();
        state.request_delete(3);

        assert!(state.confirm(
            |i| {
                deleted.push(i);
                DeleteOutcome::done()
            },
            &log,
            CTX
        ));

        assert_eq!(deleted, vec![3]);
        assert!(!state.is_confirming());
        assert!(!state.is_deleting());
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_sync_failure_keeps_dialog_open() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(0);

        state.confirm(
            |_| Err(ChatdeckError::DeleteFailed("disk full".into())).into(),
            &log,
            CTX,
        );

        assert_eq!(state.pending_delete_index(), Some(0));
        assert_eq!(state.deleting_index(), None);
        assert_eq!(log.count(), 1);
        let entries = log.entries.borrow();
        assert_eq!(entries[0].0, CTX);
        assert!(entries[0].1.contains("disk full"));
    }

    #[test]
    fn test_async_success_after_poll() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(2);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);

        state.confirm(|_| outcome.take().unwrap(), &log, CTX);
        assert_eq!(state.deleting_index(), Some(2));
        assert_eq!(state.pending_delete_index(), Some(2));

        state.poll(&log, CTX);
        assert_eq!(state.deleting_index(), Some(2));

        tx.send(Ok(())).unwrap();
        state.poll(&log, CTX);
        assert!(!state.is_deleting());
        assert!(!state.is_confirming());
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_async_failure_returns_to_confirming() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(1);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        state.confirm(|_| outcome.take().unwrap(), &log, CTX);

        tx.send(Err(ChatdeckError::DeleteFailed("offline".into())))
            .unwrap();
        state.poll(&log, CTX);

        assert_eq!(state.pending_delete_index(), Some(1));
        assert_eq!(state.deleting_index(), None);
        assert_eq!(log.count(), 1);

        // Retry succeeds.
        assert!(state.confirm(|_| DeleteOutcome::done(), &log, CTX));
        assert!(!state.is_confirming());
        assert_eq!(log.count(), 1);
    }

    #[test]
    fn test_dropped_sender_counts_as_failure() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(0);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        state.confirm(|_| outcome.take().unwrap(), &log, CTX);

        drop(tx);
        state.poll(&log, CTX);

        assert_eq!(state.pending_delete_index(), Some(0));
        assert!(!state.is_deleting());
        assert!(log.entries.borrow()[0].1.contains("abandoned"));
    }

    #[test]
    fn test_cancel_ignored_while_deleting() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(0);
        let (_tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        state.confirm(|_| outcome.take().unwrap(), &log, CTX);

        assert!(!state.cancel());
        assert_eq!(state.pending_delete_index(), Some(0));
        assert_eq!(state.deleting_index(), Some(0));
    }

    #[test]
    fn test_confirm_ignored_while_deleting() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(0);
        let (_tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        state.confirm(|_| outcome.take().unwrap(), &log, CTX);

        let calls = Cell::new(0);
        assert!(!state.confirm(
            |_| {
                calls.set(calls.get() + 1);
                DeleteOutcome::done()
            },
            &log,
            CTX
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_late_result_after_drop_is_ignored() {
        let log = RecordingLog::default();
        let mut state = ListPanelState::new();
        state.request_delete(0);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        state.confirm(|_| outcome.take().unwrap(), &log, CTX);

        drop(state);
        assert!(tx.send(Ok(())).is_err());
    }

    #[test]
    fn test_confirm_message_uses_item() {
        let mut state = ListPanelState::new();
        let items = vec!["alpha".to_string(), "beta".to_string()];
        state.request_delete(1);
        let message =
            state.confirm_message(Some(items.as_slice()), |item| format!("Delete {}?", item));
        assert_eq!(message, "Delete beta?");
    }

    #[test]
    fn test_confirm_message_falls_back_for_stale_index() {
        let mut state = ListPanelState::new();
        state.request_delete(5);
        let items = vec!["only".to_string()];
        assert_eq!(
            state.confirm_message(Some(items.as_slice()), |item| item.clone()),
            GENERIC_DELETE_MESSAGE
        );
        assert_eq!(
            state.confirm_message::<String>(None, |item| item.clone()),
            GENERIC_DELETE_MESSAGE
        );
    }

    #[test]
    fn test_limit_label() {
        let options = ListPanelOptions::new("Variables", CTX).max_limit(20);
        assert_eq!(options.limit_label(), None);

        let mut reached = options.clone();
        reached.is_max_limit_reached = true;
        assert_eq!(
            reached.limit_label().as_deref(),
            Some("Maximum of 20 items reached")
        );

        let mut no_limit = ListPanelOptions::new("Variables", CTX);
        no_limit.is_max_limit_reached = true;
        assert_eq!(no_limit.limit_label(), None);
    }

    #[test]
    fn test_options_builder() {
        let options = ListPanelOptions::new("Prompts", "Prompts")
            .description("Reusable snippets")
            .empty_state("No prompts", "Create prompt")
            .add_button_text("Add prompt")
            .delete_confirm_title("Delete prompt");
        assert_eq!(options.description, "Reusable snippets");
        assert_eq!(options.empty_text, "No prompts");
        assert_eq!(options.empty_button_text, "Create prompt");
        assert_eq!(options.add_button_text, "Add prompt");
        assert_eq!(options.delete_confirm_title, "Delete prompt");
        assert_eq!(options.log_context, "Prompts");
    }

    #[test]
    fn test_show_renders_without_invoking_callbacks() {
        let ctx = egui::Context::default();
        let log = RecordingLog::default();
        let mut panel: ListPanel<String> =
            ListPanel::new("test_panel", ListPanelOptions::new("Items", CTX));
        let items = vec!["a".to_string(), "b".to_string()];
        let adds = Cell::new(0);
        let deletes = Cell::new(0);
        let rendered = Cell::new(0);

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let mut render = |ui: &mut egui::Ui, item: &String, _: usize| {
                    rendered.set(rendered.get() + 1);
                    ui.label(item);
                };
                let mut on_add = || adds.set(adds.get() + 1);
                let mut on_delete = |_: usize| {
                    deletes.set(deletes.get() + 1);
                    DeleteOutcome::done()
                };
                let mut callbacks = ListCallbacks {
                    item_key: &|item: &String, _: usize| item.clone(),
                    render_item: &mut render,
                    delete_confirm_message: &|item: &String| format!("Delete {}?", item),
                    on_add: &mut on_add,
                    on_edit: None,
                    on_delete: &mut on_delete,
                    footer: None,
                };
                panel.show(ui, Some(items.as_slice()), &mut callbacks, &log);
            });
        });

        assert!(rendered.get() >= 2);
        assert_eq!(adds.get(), 0);
        assert_eq!(deletes.get(), 0);
        assert!(!panel.state().is_confirming());
    }

    #[test]
    fn test_show_polls_in_flight_delete() {
        let ctx = egui::Context::default();
        let log = RecordingLog::default();
        let mut panel: ListPanel<String> =
            ListPanel::new("poll_panel", ListPanelOptions::new("Items", CTX));
        panel.state.request_delete(0);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        panel
            .state
            .confirm(|_| outcome.take().unwrap(), &log, CTX);
        tx.send(Ok(())).unwrap();

        let items = vec!["a".to_string()];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let mut render = |ui: &mut egui::Ui, item: &String, _: usize| {
                    ui.label(item);
                };
                let mut on_add = || {};
                let mut on_delete = |_: usize| DeleteOutcome::done();
                let mut callbacks = ListCallbacks {
                    item_key: &|item: &String, _: usize| item.clone(),
                    render_item: &mut render,
                    delete_confirm_message: &|item: &String| item.clone(),
                    on_add: &mut on_add,
                    on_edit: None,
                    on_delete: &mut on_delete,
                    footer: None,
                };
                panel.show(ui, Some(items.as_slice()), &mut callbacks, &log);
            });
        });

        assert!(!panel.state().is_deleting());
        assert!(!panel.state().is_confirming());
    }

    /// Drives a panel of strings through headless frames.
    struct PanelHarness {
        ctx: egui::Context,
        panel: ListPanel<String>,
        items: Vec<String>,
        log: RecordingLog,
        deleted: RefCell<Vec<usize>>,
        first_row_top: Cell<f32>,
        content_right: Cell<f32>,
    }

    impl PanelHarness {
        fn new(items: &[&str]) -> Self {
            Self {
                ctx: egui::Context::default(),
                panel: ListPanel::new("harness_panel", ListPanelOptions::new("Items", CTX)),
                items: items.iter().map(|s| s.to_string()).collect(),
                log: RecordingLog::default(),
                deleted: RefCell::new(Vec::new()),
                first_row_top: Cell::new(0.0),
                content_right: Cell::new(0.0),
            }
        }

        fn frame(&mut self, events: Vec<egui::Event>) {
            let Self {
                ctx,
                panel,
                items,
                log,
                deleted,
                first_row_top,
                content_right,
            } = self;
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(800.0, 600.0),
                )),
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    content_right.set(ui.max_rect().right());
                    let mut render = |ui: &mut egui::Ui, item: &String, index: usize| {
                        if index == 0 {
                            first_row_top.set(ui.max_rect().top());
                        }
                        ui.label(item);
                    };
                    let mut on_add = || {};
                    let mut on_delete = |index: usize| {
                        deleted.borrow_mut().push(index);
                        DeleteOutcome::done()
                    };
                    let mut callbacks = ListCallbacks {
                        item_key: &|item: &String, _: usize| item.clone(),
                        render_item: &mut render,
                        delete_confirm_message: &|item: &String| format!("Delete {}?", item),
                        on_add: &mut on_add,
                        on_edit: None,
                        on_delete: &mut on_delete,
                        footer: None,
                    };
                    panel.show(ui, Some(items.as_slice()), &mut callbacks, &*log);
                });
            });
        }

        /// Run idle frames so newly opened areas are laid out and clickable.
        fn settle(&mut self) {
            for _ in 0..2 {
                self.frame(vec![]);
            }
        }

        fn click(&mut self, pos: egui::Pos2) {
            let button = |pressed| egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            };
            self.frame(vec![egui::Event::PointerMoved(pos), button(true)]);
            self.frame(vec![button(false)]);
        }

        fn first_row_delete_button(&self) -> egui::Pos2 {
            egui::pos2(
                self.content_right.get() - spacing::MD - ROW_BUTTON_SIZE / 2.0,
                self.first_row_top.get() + ROW_BUTTON_SIZE / 2.0,
            )
        }

        fn dialog_confirm_button(&self) -> egui::Pos2 {
            ConfirmDialog::new("")
                .id(self.panel.confirm_dialog_id())
                .confirm_button_center(&self.ctx)
                .unwrap()
        }

        fn deleted(&self) -> Vec<usize> {
            self.deleted.borrow().clone()
        }
    }

    fn escape() -> egui::Event {
        egui::Event::Key {
            key: egui::Key::Escape,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_row_delete_button_opens_confirmation() {
        let mut h = PanelHarness::new(&["alpha", "beta"]);
        h.settle();

        h.click(h.first_row_delete_button());

        assert_eq!(h.panel.state().pending_delete_index(), Some(0));
        assert!(h.deleted().is_empty());
    }

    #[test]
    fn test_dialog_delete_button_deletes_once() {
        let mut h = PanelHarness::new(&["alpha", "beta"]);
        h.panel.state.request_delete(1);
        h.settle();

        h.click(h.dialog_confirm_button());
        h.settle();

        assert_eq!(h.deleted(), vec![1]);
        assert!(!h.panel.state().is_confirming());
        assert_eq!(h.log.count(), 0);
    }

    #[test]
    fn test_dialog_escape_cancels_without_deleting() {
        let mut h = PanelHarness::new(&["alpha"]);
        h.panel.state.request_delete(0);
        h.settle();

        h.frame(vec![escape()]);

        assert!(!h.panel.state().is_confirming());
        assert!(h.deleted().is_empty());
    }

    #[test]
    fn test_deleting_row_ignores_clicks() {
        let mut h = PanelHarness::new(&["alpha", "beta"]);
        h.panel.state.request_delete(0);
        let (tx, outcome) = DeleteOutcome::channel();
        let mut outcome = Some(outcome);
        h.panel
            .state
            .confirm(|_| outcome.take().unwrap(), &h.log, CTX);
        h.settle();

        h.click(h.first_row_delete_button());
        h.frame(vec![escape()]);

        assert_eq!(h.panel.state().pending_delete_index(), Some(0));
        assert_eq!(h.panel.state().deleting_index(), Some(0));
        assert!(h.deleted().is_empty());

        tx.send(Ok(())).unwrap();
        h.frame(vec![]);
        assert!(!h.panel.state().is_confirming());
        assert!(!h.panel.state().is_deleting());
    }
}
