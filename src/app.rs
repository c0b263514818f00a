//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Filter logic lives in `FilterController`; App routes actions to it and
//! hands the requests it returns to the fetch runner.

use crate::action::Action;
use crate::component::Component;
use crate::components::max_results_dialog::MAX_INPUT_LEN;
use crate::components::{
    draw_browser_screen, BrowserComponent, BrowserRenderContext, GalleryComponent, HelpDialog,
    LetterBrowserComponent, LetterPicker, MaxResultsDialog, QuitDialog, SelectDialog,
    ViewerComponent,
};
use crate::controller::FilterController;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{Focus, LetterRow, Selector};
use crate::services::{CatalogRequest, FetchRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use tracing::debug;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Filter cascade and everything derived from it
    pub controller: FilterController,

    /// Executes catalog requests off the UI thread
    pub runner: FetchRunner,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Running against the built-in demo catalog
    pub demo: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub browser: BrowserComponent,
    pub gallery: GalleryComponent,
    pub viewer: ViewerComponent,
    pub letter_browser: LetterBrowserComponent,
    pub select_dialog: SelectDialog,
    pub letter_picker: LetterPicker,
    pub max_results_dialog: MaxResultsDialog,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(controller: FilterController, runner: FetchRunner, demo: bool) -> App {
        App {
            controller,
            runner,
            modals: ModalStack::new(),
            should_quit: false,
            demo,
            browser: BrowserComponent::new(),
            gallery: GalleryComponent::new(),
            viewer: ViewerComponent::new(),
            letter_browser: LetterBrowserComponent::new(),
            select_dialog: SelectDialog::new(),
            letter_picker: LetterPicker::default(),
            max_results_dialog: MaxResultsDialog,
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    fn dispatch(&self, requests: Vec<CatalogRequest>) {
        if !requests.is_empty() {
            debug!(count = requests.len(), "dispatching catalog requests");
        }
        self.runner.spawn_all(requests);
    }

    /// Apply every response that has arrived, issuing any follow-ups
    fn poll_catalog(&mut self) {
        for response in self.runner.poll() {
            let follow_ups = self.controller.apply_response(response);
            self.dispatch(follow_ups);
        }
        self.gallery.sync(self.controller.items());
        self.viewer.sync(self.controller.detail());
        self.letter_browser.sync(self.controller.letter_browser());
    }

    /// Letter browser is shown in place of the gallery
    fn letter_browser_open(&self) -> bool {
        self.controller.letter_browser().is_some() && !self.controller.panels().gallery
    }

    fn activate_letter_row(&mut self) {
        let Some(row) = self
            .controller
            .letter_browser()
            .and_then(|browser| self.letter_browser.selected_row(browser))
        else {
            return;
        };

        let requests = match row {
            LetterRow::Genus(genus_id) => self.controller.on_letter_genus_expanded(genus_id),
            LetterRow::All(genus_id) => self.controller.on_letter_all_selected(genus_id),
            LetterRow::Species {
                genus_id,
                species_id,
            } => self
                .controller
                .on_letter_species_selected(genus_id, species_id),
        };
        if !matches!(row, LetterRow::Genus(_)) {
            self.browser.focus = Focus::Gallery;
        }
        self.dispatch(requests);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        let requests = self.controller.initialize();
        self.dispatch(requests);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else if self.letter_browser_open() {
            self.letter_browser.handle_key_event(key)
        } else {
            self.browser.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.poll_catalog(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,
            Action::Reload => {
                let requests = self.controller.initialize();
                self.dispatch(requests);
            }

            // ─────────────────────────────────────────────────────────────────
            // Focus & Gallery Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::FocusNext | Action::FocusPrev => {
                self.browser.update(action)?;
            }
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown => {
                if self.browser.focus == Focus::Gallery {
                    self.gallery.update(action)?;
                }
            }
            Action::SelectThumbnail => {
                if let Some(item_id) = self.gallery.selected_item_id() {
                    // Failure is reported through the controller's notice
                    if self.controller.on_thumbnail_selected(item_id).is_ok() {
                        self.viewer.sync(self.controller.detail());
                    }
                }
            }
            Action::NextPage => {
                let requests = self.controller.on_page_changed(1);
                self.dispatch(requests);
            }
            Action::PrevPage => {
                let requests = self.controller.on_page_changed(-1);
                self.dispatch(requests);
            }
            Action::RefreshGallery => {
                let requests = self.controller.refresh_gallery();
                self.dispatch(requests);
            }

            // ─────────────────────────────────────────────────────────────────
            // Viewer
            // ─────────────────────────────────────────────────────────────────
            Action::NextFocalPlane | Action::PrevFocalPlane => {
                self.viewer.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Filters
            // ─────────────────────────────────────────────────────────────────
            Action::OpenSelector(selector) => {
                self.browser.update(action)?;
                let dropdown = match selector {
                    Selector::Family => self.controller.families(),
                    Selector::Genus => self.controller.genera(),
                    Selector::Species => self.controller.species(),
                };
                self.select_dialog.open(selector, dropdown);
                self.modals.push(Modal::Select(selector));
            }
            Action::SelectOption(selector, value) => {
                self.modals.pop();
                let requests = match selector {
                    Selector::Family => self.controller.on_family_changed(value),
                    Selector::Genus => self.controller.on_genus_changed(value),
                    Selector::Species => self.controller.on_species_changed(value),
                };
                self.dispatch(requests);
            }
            Action::ToggleFilter(which) => {
                let value = !self.controller.state().type_filter(which);
                let requests = self.controller.on_type_filter_toggled(which, value);
                self.dispatch(requests);
            }
            Action::OpenMaxResults => {
                self.modals.push(Modal::MaxResults {
                    input: self.controller.state().max_results.to_string(),
                });
            }
            Action::SetMaxResults(input) => {
                self.modals.pop();
                let requests = self.controller.on_max_results_entered(&input);
                self.dispatch(requests);
            }

            // ─────────────────────────────────────────────────────────────────
            // Letter Lookup
            // ─────────────────────────────────────────────────────────────────
            Action::OpenLetterPicker => {
                self.modals.push(Modal::LetterPicker);
            }
            Action::SelectLetter(letter) => {
                if matches!(self.modals.top(), Some(Modal::LetterPicker)) {
                    self.modals.pop();
                }
                let requests = self.controller.on_alphabet_letter_selected(letter);
                self.letter_browser.sync(self.controller.letter_browser());
                self.dispatch(requests);
            }
            Action::LetterUp => self.letter_browser.move_up(),
            Action::LetterDown => {
                let rows = self
                    .controller
                    .letter_browser()
                    .map(|browser| browser.rows().len())
                    .unwrap_or(0);
                self.letter_browser.move_down(rows);
            }
            Action::LetterActivate => self.activate_letter_row(),
            Action::CloseLetterBrowser => {
                self.controller.close_letter_browser();
                self.letter_browser.sync(None);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.in_flight = self.runner.in_flight();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            // Dialog lists track their own cursor
            Action::ModalUp | Action::ModalDown => {}
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = BrowserRenderContext {
            controller: &self.controller,
            in_flight: self.runner.in_flight(),
            demo: self.demo,
        };

        draw_browser_screen(
            frame,
            area,
            &mut self.browser,
            &mut self.gallery,
            &mut self.viewer,
            &mut self.letter_browser,
            &ctx,
        )?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Select(_) => self.select_dialog.handle_key_event(key),
            Modal::LetterPicker => self.letter_picker.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::MaxResults { input } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::SetMaxResults(input.clone())),
                    KeyCode::Backspace => {
                        if let Some(Modal::MaxResults { input }) = self.modals.top_mut() {
                            input.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) => {
                        if let Some(Modal::MaxResults { input }) = self.modals.top_mut() {
                            if input.chars().count() < MAX_INPUT_LEN {
                                input.push(c);
                            }
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Select(_) => self.select_dialog.draw(frame, area)?,
            Modal::LetterPicker => self.letter_picker.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::MaxResults { input } => {
                let current = self.controller.state().max_results;
                self.max_results_dialog
                    .draw_with_input(frame, area, input, current)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::GalleryStatus;
    use crate::model::OptionValue;
    use crate::services::MemoryCatalog;
    use std::sync::Arc;
    use std::time::Duration;

    fn demo_app() -> App {
        app_with_catalog(MemoryCatalog::demo())
    }

    fn app_with_catalog(catalog: MemoryCatalog) -> App {
        let controller = FilterController::new(catalog.catalog_id(), "http://img", 100);
        let runner = FetchRunner::new(Arc::new(catalog), Duration::from_secs(5)).unwrap();
        let mut app = App::new(controller, runner, true);
        app.init().unwrap();
        settle(&mut app);
        app
    }

    /// Tick until every spawned request, follow-ups included, was applied
    fn settle(app: &mut App) {
        for _ in 0..400 {
            app.update(Action::Tick).unwrap();
            if app.runner.in_flight() == 0 {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("catalog requests did not settle");
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn first_entry(options: &[crate::model::dropdown::DropdownOption]) -> OptionValue {
        options
            .iter()
            .map(|o| o.value)
            .find(|v| matches!(v, OptionValue::Id(_)))
            .unwrap()
    }

    #[test]
    fn test_init_loads_families() {
        let app = demo_app();
        assert_eq!(app.controller.families().entry_count(), 5);
        assert!(!app.controller.families().loading);
        assert_eq!(app.controller.gallery_status(), GalleryStatus::NoSelection);
    }

    #[test]
    fn test_family_selection_fills_genera_and_gallery() {
        let mut app = demo_app();
        let family = first_entry(app.controller.families().options());
        app.update(Action::OpenSelector(Selector::Family)).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::Select(Selector::Family)));

        app.update(Action::SelectOption(Selector::Family, family)).unwrap();
        assert!(app.modals.is_empty());
        settle(&mut app);

        assert!(app.controller.genera().entry_count() > 0);
        assert!(app.controller.genera().contains(OptionValue::All));
        assert!(matches!(
            app.controller.gallery_status(),
            GalleryStatus::Showing(_)
        ));
        assert!(app.gallery.selected_item_id().is_some());

        app.update(Action::SelectThumbnail).unwrap();
        assert_eq!(
            app.controller.detail().map(|d| d.item_id),
            app.gallery.selected_item_id()
        );
    }

    #[test]
    fn test_overlapping_family_selections_keep_latest() {
        let mut app =
            app_with_catalog(MemoryCatalog::demo().with_latency(Duration::from_millis(40)));
        let families: Vec<OptionValue> = app
            .controller
            .families()
            .options()
            .iter()
            .map(|o| o.value)
            .filter(|v| matches!(v, OptionValue::Id(_)))
            .collect();
        let (first, second) = (families[0], families[1]);

        app.update(Action::SelectOption(Selector::Family, first)).unwrap();
        app.update(Action::SelectOption(Selector::Family, second)).unwrap();
        assert!(app.runner.in_flight() >= 4);
        settle(&mut app);

        let OptionValue::Id(second_id) = second else {
            unreachable!()
        };
        assert!(!app.controller.items().is_empty());
        assert!(app
            .controller
            .items()
            .iter()
            .all(|item| item.family_id == Some(second_id)));
        assert_eq!(app.controller.families().selected_value(), second);
        assert!(app.controller.notice().is_none());
    }

    #[test]
    fn test_max_results_dialog_edits_in_place() {
        let mut app = demo_app();
        app.update(Action::OpenMaxResults).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::MaxResults {
                input: "100".to_string()
            })
        );

        for _ in 0..3 {
            app.handle_key_event(key(KeyCode::Backspace)).unwrap();
        }
        app.handle_key_event(key(KeyCode::Char('2'))).unwrap();
        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SetMaxResults("2".to_string())));

        app.update(action.unwrap()).unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(app.controller.state().max_results, 2);
    }

    #[test]
    fn test_letter_lookup_jumps_to_gallery() {
        let mut app = demo_app();
        app.update(Action::OpenLetterPicker).unwrap();
        let action = app.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        assert_eq!(action, Some(Action::SelectLetter('P')));
        app.update(action.unwrap()).unwrap();
        assert!(app.modals.is_empty());
        settle(&mut app);
        assert!(app.letter_browser_open());

        // Expand the first genus, then pick its ALL row
        app.update(Action::LetterActivate).unwrap();
        settle(&mut app);
        app.update(Action::LetterDown).unwrap();
        let browser = app.controller.letter_browser().unwrap();
        assert!(matches!(
            app.letter_browser.selected_row(browser),
            Some(LetterRow::All(_))
        ));

        app.update(Action::LetterActivate).unwrap();
        assert!(!app.letter_browser_open());
        assert_eq!(app.controller.genera().entry_count(), 1);
        settle(&mut app);
        assert!(matches!(
            app.controller.gallery_status(),
            GalleryStatus::Showing(_)
        ));
        assert_eq!(app.browser.focus, Focus::Gallery);
    }

    #[test]
    fn test_letter_browser_takes_keys_while_open() {
        let mut app = demo_app();
        app.update(Action::SelectLetter('B')).unwrap();
        assert_eq!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseLetterBrowser)
        );
        app.update(Action::CloseLetterBrowser).unwrap();
        assert!(app.controller.letter_browser().is_none());
        assert_eq!(
            app.handle_key_event(key(KeyCode::Char('n'))).unwrap(),
            Some(Action::NextPage)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut app = demo_app();
        app.update(Action::OpenHelp).unwrap();
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }
}
