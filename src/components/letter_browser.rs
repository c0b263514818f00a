//! Letter browser component
//!
//! Shows the genera found by an alphabet lookup. Genus rows expand into an
//! `ALL` entry followed by the genus' species.

use crate::action::Action;
use crate::component::Component;
use crate::model::{LetterBrowser, LetterRow, SpeciesExpansion};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct LetterBrowserComponent {
    pub selected_index: usize,
    pub list_state: ListState,
    letter: Option<char>,
}

impl Default for LetterBrowserComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterBrowserComponent {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selected_index: 0,
            list_state,
            letter: None,
        }
    }

    /// Back to the top when a new letter is searched
    pub fn sync(&mut self, browser: Option<&LetterBrowser>) {
        let letter = browser.map(|b| b.letter);
        if letter != self.letter {
            self.letter = letter;
            self.select(0);
        }
        if let Some(browser) = browser {
            let len = browser.rows().len();
            if self.selected_index >= len {
                self.select(len.saturating_sub(1));
            }
        }
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    pub fn move_down(&mut self, row_count: usize) {
        if self.selected_index + 1 < row_count {
            self.select(self.selected_index + 1);
        }
    }

    pub fn move_up(&mut self) {
        self.select(self.selected_index.saturating_sub(1));
    }

    pub fn selected_row(&self, browser: &LetterBrowser) -> Option<LetterRow> {
        browser.rows().get(self.selected_index).copied()
    }

    pub fn draw_with_browser(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        browser: &LetterBrowser,
    ) -> Result<()> {
        self.sync(Some(browser));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Genera starting with {} ", browser.letter))
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );

        let message = if browser.loading {
            Some(("Loading…".to_string(), Color::Yellow))
        } else if let Some(err) = &browser.error {
            Some((format!("Lookup failed: {}", err), Color::Red))
        } else if browser.genera.is_empty() {
            Some((
                format!("No genera start with {}", browser.letter),
                Color::DarkGray,
            ))
        } else {
            None
        };

        if let Some((text, color)) = message {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(color),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, chunks[0]);
        } else {
            let items: Vec<ListItem> = browser
                .rows()
                .iter()
                .map(|row| ListItem::new(row_line(browser, row)))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Expand / show images  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" a ", Style::default().fg(Color::Cyan)),
            Span::raw("Other letter  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Back to gallery"),
        ]));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

fn row_line(browser: &LetterBrowser, row: &LetterRow) -> Line<'static> {
    match *row {
        LetterRow::Genus(genus_id) => {
            let Some(entry) = browser.genus(genus_id) else {
                return Line::from("");
            };
            let (marker, note) = match &entry.expansion {
                SpeciesExpansion::Collapsed => ("▸ ", None),
                SpeciesExpansion::Loading => ("▸ ", Some(("  loading…".to_string(), Color::Yellow))),
                SpeciesExpansion::Loaded(_) => ("▾ ", None),
                SpeciesExpansion::Failed(err) => ("▸ ", Some((format!("  {}", err), Color::Red))),
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::styled(
                    entry.genus.genus_name.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({})", entry.genus.family_name),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if let Some((text, color)) = note {
                spans.push(Span::styled(text, Style::default().fg(color)));
            }
            Line::from(spans)
        }
        LetterRow::All(_) => Line::from(Span::styled(
            "    ALL",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        LetterRow::Species {
            genus_id,
            species_id,
        } => {
            let name = browser
                .genus(genus_id)
                .and_then(|entry| match &entry.expansion {
                    SpeciesExpansion::Loaded(species) => species
                        .iter()
                        .find(|s| s.id == species_id)
                        .map(|s| s.name.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            Line::from(Span::styled(
                format!("    {}", name),
                Style::default().fg(Color::Cyan),
            ))
        }
    }
}

impl Component for LetterBrowserComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseLetterBrowser),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::LetterActivate),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::LetterUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::LetterDown),
            KeyCode::Char('a') => Some(Action::OpenLetterPicker),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the lookup results, see draw_with_browser
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenusByLetter, Species};
    use uuid::Uuid;

    fn browser() -> LetterBrowser {
        let mut browser = LetterBrowser::new('P');
        browser.set_results(vec![
            GenusByLetter {
                genus_id: Uuid::from_u128(1),
                genus_name: "Picea".into(),
                family_name: "Pinaceae".into(),
            },
            GenusByLetter {
                genus_id: Uuid::from_u128(2),
                genus_name: "Pinus".into(),
                family_name: "Pinaceae".into(),
            },
        ]);
        browser
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_navigation_tracks_rows() {
        let browser = browser();
        let mut component = LetterBrowserComponent::new();
        component.sync(Some(&browser));
        let rows = browser.rows().len();

        component.move_down(rows);
        component.move_down(rows);
        assert_eq!(component.selected_index, 1);
        assert_eq!(
            component.selected_row(&browser),
            Some(LetterRow::Genus(Uuid::from_u128(2)))
        );
        component.move_up();
        component.move_up();
        assert_eq!(component.selected_index, 0);
    }

    #[test]
    fn test_new_letter_resets_selection() {
        let mut component = LetterBrowserComponent::new();
        let first = browser();
        component.sync(Some(&first));
        component.move_down(2);

        let mut other = LetterBrowser::new('Q');
        other.set_results(Vec::new());
        component.sync(Some(&other));
        assert_eq!(component.selected_index, 0);
        assert_eq!(component.selected_row(&other), None);
    }

    #[test]
    fn test_rows_render_family_and_species_names() {
        let mut browser = browser();
        browser
            .genus_mut(Uuid::from_u128(2))
            .unwrap()
            .expansion = SpeciesExpansion::Loaded(vec![Species {
            id: Uuid::from_u128(10),
            name: "mugo".into(),
            genus_id: Some(Uuid::from_u128(2)),
            is_type: false,
        }]);
        let text: Vec<String> = browser
            .rows()
            .iter()
            .map(|row| line_text(&row_line(&browser, row)))
            .collect();
        assert_eq!(
            text,
            vec![
                "▸ Picea  (Pinaceae)",
                "▾ Pinus  (Pinaceae)",
                "    ALL",
                "    mugo"
            ]
        );
    }

    #[test]
    fn test_keys_map_to_letter_actions() {
        use crossterm::event::KeyModifiers;
        let mut component = LetterBrowserComponent::new();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            component.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::LetterActivate)
        );
        assert_eq!(
            component.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseLetterBrowser)
        );
    }
}
