//! Filter bar: the three cascading selectors, the include toggles,
//! max results and the current page

use crate::model::{Dropdown, FilterState, Focus, OptionValue, Selector, TypeFilter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What the bar reads from the controller
pub struct FilterBarContext<'a> {
    pub families: &'a Dropdown,
    pub genera: &'a Dropdown,
    pub species: &'a Dropdown,
    pub state: &'a FilterState,
    pub focus: Focus,
}

pub fn draw_filter_bar(frame: &mut Frame, area: Rect, ctx: &FilterBarContext) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    let selectors = [
        (Selector::Family, ctx.families),
        (Selector::Genus, ctx.genera),
        (Selector::Species, ctx.species),
    ];
    for ((selector, dropdown), column) in selectors.into_iter().zip(columns.iter()) {
        render_selector(frame, *column, dropdown, ctx.focus == Focus::Selector(selector));
    }

    render_toggles(frame, rows[1], ctx.state);
}

fn render_selector(frame: &mut Frame, area: Rect, dropdown: &Dropdown, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let (text, style) = selector_text(dropdown);
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(text, style),
        Span::styled(" ▾", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", dropdown.title)),
    );
    frame.render_widget(paragraph, area);
}

fn selector_text(dropdown: &Dropdown) -> (String, Style) {
    if dropdown.loading {
        return ("Loading…".to_string(), Style::default().fg(Color::Yellow));
    }
    match dropdown.selected_value() {
        OptionValue::Placeholder => (
            dropdown.selected_label().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        _ => (
            dropdown.selected_label().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    }
}

fn toggle_spans(key: &'static str, label: &'static str, on: bool) -> Vec<Span<'static>> {
    let (mark, color) = if on { ("[x]", Color::Green) } else { ("[ ]", Color::DarkGray) };
    vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::raw(format!(" {} ", label)),
        Span::styled(format!("({})  ", key), Style::default().fg(Color::DarkGray)),
    ]
}

fn render_toggles(frame: &mut Frame, area: Rect, state: &FilterState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(toggle_spans(
        "r",
        "non-reference",
        state.type_filter(TypeFilter::NonReference),
    ));
    spans.extend(toggle_spans(
        "g",
        "type genera",
        state.type_filter(TypeFilter::GenusType),
    ));
    spans.extend(toggle_spans(
        "s",
        "type species",
        state.type_filter(TypeFilter::SpeciesType),
    ));
    spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw("max "));
    spans.push(Span::styled(
        state.max_results.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw("  page "));
    spans.push(Span::styled(
        state.page().to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_selector_text_follows_dropdown_state() {
        let mut dropdown = Dropdown::new("Genus");
        assert_eq!(selector_text(&dropdown).0, "-- choose genus --");

        dropdown.populate(vec![(Uuid::from_u128(1), "Pinus".to_string())], true);
        dropdown.select_value(OptionValue::All);
        assert_eq!(selector_text(&dropdown).0, "ALL");

        dropdown.loading = true;
        assert_eq!(selector_text(&dropdown).0, "Loading…");
    }

    #[test]
    fn test_toggle_marks() {
        let on: String = toggle_spans("g", "type genera", true)
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(on, "[x] type genera (g)  ");
        let off: String = toggle_spans("s", "type species", false)
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(off.starts_with("[ ]"));
    }
}
