//! Max results input dialog
//!
//! The typed text lives in `Modal::MaxResults`; App edits it in place and
//! this component only renders it.

use crate::component::Component;
use crate::components::centered_popup;
use crate::model::filter::DEFAULT_MAX_RESULTS;
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Longest accepted input; anything larger is not a sensible page size
pub const MAX_INPUT_LEN: usize = 6;

#[derive(Default)]
pub struct MaxResultsDialog;

impl MaxResultsDialog {
    pub fn draw_with_input(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        input: &str,
        current: u32,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 50, 10);
        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Images per page (now {}):", current),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", input),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                format!("blank or invalid uses {}", DEFAULT_MAX_RESULTS),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled(
                    " Enter ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Apply  "),
                Span::styled(
                    " Esc ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(" Max Results ")
                    .title_style(
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for MaxResultsDialog {
    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the modal's input, see draw_with_input
        Ok(())
    }
}
