//! Browser screen - filter bar, gallery and viewer
//!
//! Owns panel focus and maps keys to actions. Drawing goes through
//! `draw_browser_screen`, which reads everything else from the controller.

use crate::action::Action;
use crate::component::Component;
use crate::components::filter_bar::{draw_filter_bar, FilterBarContext};
use crate::components::{
    calculate_browser_layout, GalleryComponent, LetterBrowserComponent, ViewerComponent,
};
use crate::controller::{FilterController, GalleryStatus, Notice};
use crate::model::{Focus, Selector, TypeFilter};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Browser Component
// ═══════════════════════════════════════════════════════════════════════════════

pub struct BrowserComponent {
    pub focus: Focus,
}

impl Default for BrowserComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserComponent {
    pub fn new() -> Self {
        Self {
            focus: Focus::Gallery,
        }
    }
}

impl Component for BrowserComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Focus
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),

            // Enter depends on the focused panel
            KeyCode::Enter => match self.focus {
                Focus::Selector(selector) => Some(Action::OpenSelector(selector)),
                Focus::Gallery => Some(Action::SelectThumbnail),
                Focus::Viewer => None,
            },

            // Movement; the viewer steps through focal planes instead
            KeyCode::Char('h') | KeyCode::Left if self.focus == Focus::Viewer => {
                Some(Action::PrevFocalPlane)
            }
            KeyCode::Char('l') | KeyCode::Right if self.focus == Focus::Viewer => {
                Some(Action::NextFocalPlane)
            }
            KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveRight),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),

            // Paging
            KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('u') => Some(Action::RefreshGallery),

            // Filters
            KeyCode::Char('r') => Some(Action::ToggleFilter(TypeFilter::NonReference)),
            KeyCode::Char('g') => Some(Action::ToggleFilter(TypeFilter::GenusType)),
            KeyCode::Char('s') => Some(Action::ToggleFilter(TypeFilter::SpeciesType)),
            KeyCode::Char('m') => Some(Action::OpenMaxResults),

            // Viewer
            KeyCode::Char('[') => Some(Action::PrevFocalPlane),
            KeyCode::Char(']') => Some(Action::NextFocalPlane),

            // Lookup & app
            KeyCode::Char('a') => Some(Action::OpenLetterPicker),
            KeyCode::Char('R') => Some(Action::Reload),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.previous(),
            Action::OpenSelector(selector) => self.focus = Focus::Selector(selector),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_browser_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the browser screen
pub struct BrowserRenderContext<'a> {
    pub controller: &'a FilterController,
    /// Catalog requests still outstanding
    pub in_flight: usize,
    /// Shown in the status bar when running against the built-in catalog
    pub demo: bool,
}

/// Draw the browser screen
pub fn draw_browser_screen(
    frame: &mut Frame,
    area: Rect,
    browser: &mut BrowserComponent,
    gallery: &mut GalleryComponent,
    viewer: &mut ViewerComponent,
    letter_browser: &mut LetterBrowserComponent,
    ctx: &BrowserRenderContext,
) -> Result<()> {
    let controller = ctx.controller;
    let panels = controller.panels();
    let layout = calculate_browser_layout(area, panels.viewer);

    draw_filter_bar(
        frame,
        layout.filters,
        &FilterBarContext {
            families: controller.families(),
            genera: controller.genera(),
            species: controller.species(),
            state: controller.state(),
            focus: browser.focus,
        },
    );

    match controller.letter_browser() {
        Some(results) if !panels.gallery => {
            letter_browser.draw_with_browser(frame, layout.gallery, results)?;
        }
        _ => {
            gallery.draw_with_items(
                frame,
                layout.gallery,
                controller.items(),
                controller.gallery_status(),
                controller.state().page(),
                browser.focus == Focus::Gallery,
            )?;
        }
    }

    if let Some(viewer_area) = layout.viewer {
        viewer.draw_with_detail(
            frame,
            viewer_area,
            controller.detail(),
            browser.focus == Focus::Viewer,
        )?;
    }

    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, browser.focus);

    Ok(())
}

fn status_spans(
    status: GalleryStatus,
    in_flight: usize,
    demo: bool,
    last_refreshed: Option<DateTime<Local>>,
    notice: Option<&Notice>,
) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        if demo { " pollen · demo " } else { " pollen " },
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    let summary = match status {
        GalleryStatus::NoSelection => "no selection".to_string(),
        GalleryStatus::Loading => "loading…".to_string(),
        GalleryStatus::NoResults => "no results".to_string(),
        GalleryStatus::Showing(count) => format!("{} images", count),
    };
    spans.push(Span::styled(summary, Style::default().fg(Color::White)));

    if let Some(at) = last_refreshed {
        spans.push(Span::styled(
            format!("  updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if in_flight > 0 {
        spans.push(Span::styled(
            format!("  ⟳ {}", in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(notice) = notice {
        let color = if notice.is_error { Color::Red } else { Color::Yellow };
        spans.push(Span::styled(
            format!("  [{}] {}", notice.at.format("%H:%M:%S"), notice.message),
            Style::default().fg(color),
        ));
    }

    spans
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &BrowserRenderContext) {
    let controller = ctx.controller;
    let spans = status_spans(
        controller.gallery_status(),
        ctx.in_flight,
        ctx.demo,
        controller.last_refreshed(),
        controller.notice(),
    );
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_span(key: &'static str, color: Color) -> Span<'static> {
    Span::styled(
        key,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, focus: Focus) {
    let enter_label = match focus {
        Focus::Selector(Selector::Family) => "Family ",
        Focus::Selector(Selector::Genus) => "Genus ",
        Focus::Selector(Selector::Species) => "Species ",
        Focus::Gallery => "View ",
        Focus::Viewer => "- ",
    };
    let help_spans = vec![
        key_span(" q ", Color::Yellow),
        Span::raw("Quit "),
        key_span(" Tab ", Color::Cyan),
        Span::raw("Focus "),
        key_span(" Enter ", Color::Green),
        Span::raw(enter_label),
        key_span(" n/b ", Color::Cyan),
        Span::raw("Page "),
        key_span(" r/g/s ", Color::Magenta),
        Span::raw("Filters "),
        key_span(" m ", Color::Magenta),
        Span::raw("Max "),
        key_span(" [ ] ", Color::Cyan),
        Span::raw("Focus plane "),
        key_span(" a ", Color::Blue),
        Span::raw("A-Z "),
        key_span(" ? ", Color::White),
        Span::raw("Help"),
    ];

    let paragraph = Paragraph::new(Line::from(help_spans)).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_enter_depends_on_focus() {
        let mut browser = BrowserComponent::new();
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::SelectThumbnail)
        );

        browser.focus = Focus::Selector(Selector::Genus);
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::OpenSelector(Selector::Genus))
        );

        browser.focus = Focus::Viewer;
        assert_eq!(browser.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
    }

    #[test]
    fn test_arrows_step_focal_planes_in_viewer() {
        let mut browser = BrowserComponent::new();
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Right)).unwrap(),
            Some(Action::MoveRight)
        );
        browser.focus = Focus::Viewer;
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Right)).unwrap(),
            Some(Action::NextFocalPlane)
        );
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Char('h'))).unwrap(),
            Some(Action::PrevFocalPlane)
        );
    }

    #[test]
    fn test_filter_toggle_keys() {
        let mut browser = BrowserComponent::new();
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Char('g'))).unwrap(),
            Some(Action::ToggleFilter(TypeFilter::GenusType))
        );
        assert_eq!(
            browser.handle_key_event(key(KeyCode::Char('u'))).unwrap(),
            Some(Action::RefreshGallery)
        );
    }

    #[test]
    fn test_focus_follows_actions() {
        let mut browser = BrowserComponent::new();
        browser.update(Action::FocusNext).unwrap();
        assert_eq!(browser.focus, Focus::Viewer);
        browser.update(Action::OpenSelector(Selector::Species)).unwrap();
        assert_eq!(browser.focus, Focus::Selector(Selector::Species));
    }

    #[test]
    fn test_status_spans_show_counts_and_pending() {
        let spans = status_spans(GalleryStatus::Showing(12), 2, true, None, None);
        let line = text(&spans);
        assert!(line.contains("pollen · demo"));
        assert!(line.contains("12 images"));
        assert!(line.contains("⟳ 2"));

        let spans = status_spans(GalleryStatus::NoResults, 0, false, None, None);
        let line = text(&spans);
        assert!(line.contains("no results"));
        assert!(!line.contains('⟳'));
    }
}
