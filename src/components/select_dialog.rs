//! Selector dialog component
//!
//! Lists the options of the family, genus or species selector and emits the
//! picked value. The placeholder entry is never offered.

use crate::action::Action;
use crate::component::Component;
use crate::model::dropdown::DropdownOption;
use crate::model::{Dropdown, OptionValue, Selector};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct SelectDialog {
    pub selector: Selector,
    /// Selectable options, placeholder excluded
    pub options: Vec<DropdownOption>,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Value selected when the dialog opened
    current: OptionValue,
    loading: bool,
}

impl Default for SelectDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selector: Selector::Family,
            options: Vec::new(),
            selected_index: 0,
            list_state,
            current: OptionValue::Placeholder,
            loading: false,
        }
    }

    /// Load the options of `dropdown`, highlighting its current value
    pub fn open(&mut self, selector: Selector, dropdown: &Dropdown) {
        self.selector = selector;
        self.options = dropdown
            .options()
            .iter()
            .filter(|o| o.value != OptionValue::Placeholder)
            .cloned()
            .collect();
        self.current = dropdown.selected_value();
        self.loading = dropdown.loading;
        self.selected_index = self
            .options
            .iter()
            .position(|o| o.value == self.current)
            .unwrap_or(0);
        self.list_state.select(Some(self.selected_index));
    }

    pub fn selected_value(&self) -> Option<OptionValue> {
        self.options.get(self.selected_index).map(|o| o.value)
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.options.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for SelectDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => self
                .selected_value()
                .map(|value| Action::SelectOption(self.selector, value)),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected_index = 0;
                self.list_state.select(Some(0));
                Some(Action::ModalUp)
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected_index = self.options.len().saturating_sub(1);
                self.list_state.select(Some(self.selected_index));
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let content_height = if self.options.is_empty() {
            3
        } else {
            self.options.len() as u16 + 2
        };
        let popup_height = (content_height + 6)
            .min(area.height.saturating_sub(4))
            .max(10);
        let popup_area = super::centered_popup(area, popup_width, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(popup_area);

        let header_text = match self.current {
            OptionValue::Placeholder => "Nothing selected".to_string(),
            current => self
                .options
                .iter()
                .find(|o| o.value == current)
                .map(|o| format!("Current: {}", o.label))
                .unwrap_or_default(),
        };
        let header = Paragraph::new(Line::from(Span::styled(
            header_text,
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Choose {} ", self.selector.name()))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, chunks[0]);

        if self.options.is_empty() {
            let message = if self.loading {
                "Loading…"
            } else {
                match self.selector {
                    Selector::Family => "No families in this catalog",
                    Selector::Genus => "Choose a family first",
                    Selector::Species => "Choose a genus first",
                }
            };
            let empty = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Yellow),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .options
                .iter()
                .map(|option| {
                    let is_current = option.value == self.current;
                    let label_style = match option.value {
                        OptionValue::All => Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                        _ if is_current => Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                        _ => Style::default().fg(Color::White),
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            if is_current { "● " } else { "  " },
                            Style::default().fg(Color::Green),
                        ),
                        Span::styled(option.label.clone(), label_style),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Select  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}
