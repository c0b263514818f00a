//! Viewer component - metadata, focal-plane slider and scale bar of the
//! selected item

use crate::action::Action;
use crate::component::Component;
use crate::model::detail::FOCAL_PLANE_COUNT;
use crate::model::{DetailView, ScaleBar};
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

#[derive(Default)]
pub struct ViewerComponent {
    /// 0-based index into the focal planes
    pub focal_index: usize,
    item_id: Option<Uuid>,
}

impl ViewerComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the first focal plane whenever a different item is shown
    pub fn sync(&mut self, detail: Option<&DetailView>) {
        let item_id = detail.map(|d| d.item_id);
        if item_id != self.item_id {
            self.item_id = item_id;
            self.focal_index = 0;
        }
    }

    pub fn next_plane(&mut self) {
        if self.focal_index + 1 < FOCAL_PLANE_COUNT {
            self.focal_index += 1;
        }
    }

    pub fn previous_plane(&mut self) {
        self.focal_index = self.focal_index.saturating_sub(1);
    }

    pub fn draw_with_detail(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        detail: Option<&DetailView>,
        focused: bool,
    ) -> Result<()> {
        self.sync(detail);

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Viewer ");

        let Some(detail) = detail else {
            let hint = Paragraph::new(Line::from(Span::styled(
                "Select a thumbnail to inspect it",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(hint, area);
            return Ok(());
        };

        let inner_width = block.inner(area).width;
        let lines = self.detail_lines(detail, inner_width);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        Ok(())
    }

    fn detail_lines(&self, detail: &DetailView, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let mut header = vec![Span::styled(
            detail.item_id.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )];
        if detail.is_reference {
            header.push(Span::styled(
                "  REFERENCE",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(header));
        if let Some(comment) = detail.comment.as_deref().filter(|c| !c.is_empty()) {
            lines.push(Line::from(Span::styled(
                comment.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));

        lines.push(focal_slider(self.focal_index, detail.focal_planes.len()));
        if let Some(plane) = detail.focal_planes.get(self.focal_index) {
            lines.push(Line::from(vec![
                Span::styled("Plane  ", Style::default().fg(Color::DarkGray)),
                Span::raw(plane.name.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("URL    ", Style::default().fg(Color::DarkGray)),
                Span::styled(plane.url.clone(), Style::default().fg(Color::Blue)),
            ]));
        }
        lines.push(scale_bar_line(detail.voxel_width, width));

        for panel in &detail.panels {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                panel.title,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for (label, value) in &panel.fields {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:12}", label), Style::default().fg(Color::Cyan)),
                    Span::raw(value.to_string()),
                ]));
            }
        }

        lines
    }
}

fn focal_slider(index: usize, count: usize) -> Line<'static> {
    let mut spans = vec![Span::styled("Focus  ", Style::default().fg(Color::DarkGray))];
    for i in 0..count {
        if i == index {
            spans.push(Span::styled(
                "● ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled("○ ", Style::default().fg(Color::DarkGray)));
        }
    }
    spans.push(Span::raw(format!(" {}/{}", index + 1, count)));
    Line::from(spans)
}

/// `Scale  ├─────┤ 20 µm`, or a note when the item has no usable voxel width
fn scale_bar_line(voxel_width: Option<f64>, width: u16) -> Line<'static> {
    const PREFIX: &str = "Scale  ";
    // Prefix, bar ends and room for the label
    let max_columns = width.saturating_sub(PREFIX.len() as u16 + 12);
    let label = Span::styled(PREFIX, Style::default().fg(Color::DarkGray));

    match voxel_width.and_then(|vw| ScaleBar::fit(vw, max_columns)) {
        Some(bar) => {
            let inner = usize::from(bar.columns.saturating_sub(2));
            Line::from(vec![
                label,
                Span::styled(
                    format!("├{}┤", "─".repeat(inner)),
                    Style::default().fg(Color::White),
                ),
                Span::raw(format!(" {}", bar.label())),
            ])
        }
        None => Line::from(vec![
            label,
            Span::styled("unavailable", Style::default().fg(Color::DarkGray)),
        ]),
    }
}

impl Component for ViewerComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextFocalPlane => self.next_plane(),
            Action::PrevFocalPlane => self.previous_plane(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the detail view, see draw_with_detail
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    fn detail(n: u128) -> DetailView {
        let item = Item {
            id: Uuid::from_u128(n),
            key_image: String::new(),
            family_id: None,
            genus_id: None,
            species_id: None,
            comment: None,
            slide: None,
            voxel_width: Some(0.1),
        };
        DetailView::from_item(&item, "http://img")
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_focal_plane_clamps() {
        let mut viewer = ViewerComponent::new();
        viewer.previous_plane();
        assert_eq!(viewer.focal_index, 0);
        for _ in 0..10 {
            viewer.update(Action::NextFocalPlane).unwrap();
        }
        assert_eq!(viewer.focal_index, FOCAL_PLANE_COUNT - 1);
    }

    #[test]
    fn test_new_item_resets_focal_plane() {
        let mut viewer = ViewerComponent::new();
        let first = detail(1);
        viewer.sync(Some(&first));
        viewer.next_plane();
        viewer.next_plane();
        viewer.sync(Some(&first));
        assert_eq!(viewer.focal_index, 2);

        viewer.sync(Some(&detail(2)));
        assert_eq!(viewer.focal_index, 0);
    }

    #[test]
    fn test_lines_show_current_plane() {
        let mut viewer = ViewerComponent::new();
        let view = detail(1);
        viewer.sync(Some(&view));
        viewer.next_plane();
        let text: Vec<String> = viewer.detail_lines(&view, 60).iter().map(line_text).collect();
        let expected = format!("http://img/{}_2.png", Uuid::from_u128(1));
        assert!(text.iter().any(|l| l.contains(&expected)));
        assert!(text.iter().any(|l| l.contains("2/5")));
    }

    #[test]
    fn test_scale_bar_line() {
        // 0.8 µm per column, 60 - 19 = 41 columns -> 20 µm over 25 columns
        let text = line_text(&scale_bar_line(Some(0.1), 60));
        assert!(text.ends_with(" 20 µm"));
        assert_eq!(text.matches('─').count(), 23);

        let text = line_text(&scale_bar_line(None, 60));
        assert!(text.contains("unavailable"));
    }
}
