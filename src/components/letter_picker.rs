//! Alphabet picker: a grid of A-Z starting an alphabet lookup

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const LETTERS_PER_ROW: usize = 9;

#[derive(Default)]
pub struct LetterPicker {
    /// Index into A-Z
    pub cursor: usize,
}

impl LetterPicker {
    pub fn letter(&self) -> char {
        char::from(b'A' + self.cursor as u8)
    }

    fn move_by(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        if (0..26).contains(&next) {
            self.cursor = next as usize;
        }
    }
}

impl Component for LetterPicker {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SelectLetter(self.letter())),
            KeyCode::Left => {
                self.move_by(-1);
                None
            }
            KeyCode::Right => {
                self.move_by(1);
                None
            }
            KeyCode::Up => {
                self.move_by(-(LETTERS_PER_ROW as isize));
                None
            }
            KeyCode::Down => {
                self.move_by(LETTERS_PER_ROW as isize);
                None
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                let upper = c.to_ascii_uppercase();
                self.cursor = usize::from(upper as u8 - b'A');
                Some(Action::SelectLetter(upper))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = (LETTERS_PER_ROW * 4 + 4) as u16;
        let popup_area = centered_popup(area, width, 9);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![Line::from("")];
        for row in 0..26usize.div_ceil(LETTERS_PER_ROW) {
            let spans: Vec<Span> = (row * LETTERS_PER_ROW..((row + 1) * LETTERS_PER_ROW).min(26))
                .map(|idx| {
                    let letter = char::from(b'A' + idx as u8);
                    let style = if idx == self.cursor {
                        Style::default()
                            .bg(Color::Blue)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    Span::styled(format!(" {} ", letter), style)
                })
                .flat_map(|span| [span, Span::raw(" ")])
                .collect();
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" A-Z ", Style::default().fg(Color::Cyan)),
            Span::raw("Pick  "),
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Search  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Genera by Letter ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typed_letter_is_uppercased() {
        let mut picker = LetterPicker::default();
        let action = picker.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        assert_eq!(action, Some(Action::SelectLetter('P')));
        assert_eq!(picker.letter(), 'P');
    }

    #[test]
    fn test_grid_movement_stays_in_alphabet() {
        let mut picker = LetterPicker::default();
        picker.handle_key_event(key(KeyCode::Left)).unwrap();
        assert_eq!(picker.letter(), 'A');
        picker.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(picker.letter(), 'J');
        picker.handle_key_event(key(KeyCode::Down)).unwrap();
        picker.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(picker.letter(), 'S');
        let action = picker.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::SelectLetter('S')));
    }

    #[test]
    fn test_non_letters_ignored() {
        let mut picker = LetterPicker::default();
        assert_eq!(picker.handle_key_event(key(KeyCode::Char('1'))).unwrap(), None);
        assert_eq!(
            picker.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
