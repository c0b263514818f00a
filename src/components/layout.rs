//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the filter bar (three selectors, toggles and paging, borders)
pub const FILTER_BAR_HEIGHT: u16 = 5;

/// Browser screen layout areas
pub struct BrowserLayout {
    pub filters: Rect,
    /// Gallery area; the letter browser takes it over when open
    pub gallery: Rect,
    pub viewer: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate the browser screen layout
pub fn calculate_browser_layout(area: Rect, show_viewer: bool) -> BrowserLayout {
    // Filters + content + status line + help bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let (gallery, viewer) = if show_viewer {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);
        (content[0], Some(content[1]))
    } else {
        (main_chunks[1], None)
    };

    BrowserLayout {
        filters: main_chunks[0],
        gallery,
        viewer,
        status: main_chunks[2],
        help: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_popup(area, 40, 10);
        assert_eq!(popup, Rect::new(30, 15, 40, 10));

        let small = centered_popup(Rect::new(0, 0, 20, 5), 40, 10);
        assert_eq!(small.width, 20);
        assert_eq!(small.height, 5);
    }

    #[test]
    fn test_viewer_area_only_when_shown() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = calculate_browser_layout(area, true);
        let viewer = layout.viewer.unwrap();
        assert_eq!(layout.gallery.width + viewer.width, 120);
        assert_eq!(layout.filters.height, FILTER_BAR_HEIGHT);

        let layout = calculate_browser_layout(area, false);
        assert!(layout.viewer.is_none());
        assert_eq!(layout.gallery.width, 120);
    }
}
