//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn row_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn format_duration(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_use_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(312), "5:12");
        assert_eq!(format_duration(3605), "60:05");
    }

    #[test]
    fn long_strings_are_cut_with_ellipsis() {
        assert_eq!(truncate_string("Aarti Sangam", 8), "Aarti...");
        assert_eq!(truncate_string("Om", 4), "Om  ");
    }
}
