//! Gallery component - thumbnail grid of the current items page

use super::thumbnail::ThumbnailCache;
use crate::action::Action;
use crate::component::Component;
use crate::controller::GalleryStatus;
use crate::model::Item;
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;
use uuid::Uuid;

/// Outer size of one thumbnail card, borders included
pub const CARD_WIDTH: u16 = 16;
pub const CARD_HEIGHT: u16 = 9;

/// Cell rows of thumbnail art inside a card (one row is left for the label)
const ART_ROWS: u16 = CARD_HEIGHT - 3;

/// Cut `text` to at most `max` display columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            while width + 1 > max {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => return out,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

pub struct GalleryComponent {
    /// Index of the highlighted item
    pub cursor: usize,
    /// Cards per row at the last draw
    columns: usize,
    /// First visible card row
    scroll_row: usize,
    item_ids: Vec<Uuid>,
    cache: ThumbnailCache,
}

impl Default for GalleryComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryComponent {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            columns: 1,
            scroll_row: 0,
            item_ids: Vec::new(),
            cache: ThumbnailCache::default(),
        }
    }

    /// Track a new items list; the grid starts over when the page changes
    pub fn sync(&mut self, items: &[Item]) {
        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        if ids != self.item_ids {
            self.cursor = 0;
            self.scroll_row = 0;
            self.cache.retain_items(&ids);
            self.item_ids = ids;
        }
    }

    pub fn selected_item_id(&self) -> Option<Uuid> {
        self.item_ids.get(self.cursor).copied()
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.item_ids.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor >= self.columns {
            self.cursor -= self.columns;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + self.columns < self.item_ids.len() {
            self.cursor += self.columns;
        }
    }

    fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Keep the cursor row within `visible_rows`
    fn scroll_to_cursor(&mut self, visible_rows: usize) {
        let row = self.cursor / self.columns;
        let visible_rows = visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }

    pub fn draw_with_items(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        items: &[Item],
        status: GalleryStatus,
        page: u32,
        focused: bool,
    ) -> Result<()> {
        self.sync(items);

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let title = match status {
            GalleryStatus::Showing(count) => format!(" Gallery - page {} ({} items) ", page, count),
            GalleryStatus::Loading => format!(" Gallery - page {} (loading…) ", page),
            _ => format!(" Gallery - page {} ", page),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = match status {
            GalleryStatus::NoSelection if items.is_empty() => {
                Some("Choose a family to browse its pollen images")
            }
            GalleryStatus::NoResults => Some("No results"),
            GalleryStatus::Loading if items.is_empty() => Some("Loading…"),
            _ => None,
        };
        if let Some(message) = message {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, inner);
            return Ok(());
        }

        self.set_columns((inner.width / CARD_WIDTH) as usize);
        let visible_rows = (inner.height / CARD_HEIGHT) as usize;
        self.scroll_to_cursor(visible_rows);

        let first = self.scroll_row * self.columns;
        for (offset, item) in items
            .iter()
            .enumerate()
            .skip(first)
            .take(self.columns * visible_rows.max(1))
        {
            let slot = offset - first;
            let col = (slot % self.columns) as u16;
            let row = (slot / self.columns) as u16;
            let card = Rect::new(
                inner.x + col * CARD_WIDTH,
                inner.y + row * CARD_HEIGHT,
                CARD_WIDTH,
                CARD_HEIGHT,
            )
            .intersection(inner);
            if card.height < 3 {
                continue;
            }
            self.draw_card(frame, card, item, offset == self.cursor);
        }

        Ok(())
    }

    fn draw_card(&mut self, frame: &mut Frame, area: Rect, item: &Item, highlighted: bool) {
        let border_style = if highlighted {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(item.short_id());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let art_rows = ART_ROWS.min(inner.height.saturating_sub(1));
        let art_area = Rect::new(inner.x, inner.y, inner.width, art_rows);
        match self
            .cache
            .get_or_render(item.id, &item.key_image, inner.width, art_rows)
        {
            Some(art) => {
                let x = art_area.x + art_area.width.saturating_sub(art.width) / 2;
                let art_rect = Rect::new(x, art_area.y, art.width, art.height).intersection(art_area);
                frame.render_widget(Paragraph::new(art.lines().to_vec()), art_rect);
            }
            None => {
                let placeholder = Paragraph::new(Line::from(Span::styled(
                    "no image",
                    Style::default().fg(Color::DarkGray),
                )))
                .alignment(Alignment::Center);
                frame.render_widget(placeholder, art_area);
            }
        }

        if inner.height > art_rows {
            let label_area = Rect::new(inner.x, inner.y + art_rows, inner.width, 1);
            let marker = if item.is_reference() { "◆ " } else { "" };
            let comment = item.comment.as_deref().unwrap_or("");
            let label = truncate_to_width(
                &format!("{}{}", marker, comment),
                inner.width as usize,
            );
            let style = if item.is_reference() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            frame.render_widget(Paragraph::new(Span::styled(label, style)), label_area);
        }
    }
}

impl Component for GalleryComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the current items, see draw_with_items
        Ok(())
    }
}
