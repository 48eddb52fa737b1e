//! Track browser rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{PlaybackState, RowPlayback, TrackBrowserState};
use super::utils::{format_duration, render_scrollable_list, row_style, truncate_string};

pub fn render_tracks(
    frame: &mut Frame,
    area: Rect,
    state: &TrackBrowserState,
    playback: &PlaybackState,
) {
    let list_area = if state.search_active {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let search = Paragraph::new(format!("{}▏", state.query))
            .style(Style::default().fg(Color::Green))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Search (Esc to close) ")
                    .padding(Padding::horizontal(1))
                    .border_style(Style::default().fg(Color::Green)),
            );
        frame.render_widget(search, chunks[0]);
        chunks[1]
    } else {
        area
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Tracks ({}) ", state.visible.len()))
        .padding(Padding::horizontal(1));
    if let Some(error) = &state.error {
        block = block.title_bottom(Line::from(format!(" {} ", error)).style(Style::default().fg(Color::Red)));
    }

    if state.loading && state.tracks.is_empty() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, list_area);
        return;
    }

    if state.visible.is_empty() {
        let hint = if state.query.trim().is_empty() {
            "No tracks. Press r to reload."
        } else {
            "No tracks match your search."
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, list_area);
        return;
    }

    let content_width = list_area.width.saturating_sub(4) as usize;
    // " ▶ " + two-space separator + duration
    let text_width = content_width.saturating_sub(3 + 2 + 6);
    let title_width = (text_width * 60) / 100;
    let subtitle_width = text_width.saturating_sub(title_width);

    let items: Vec<ListItem> = state
        .visible
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let indicator = match playback.row_state(&track.id) {
                RowPlayback::Idle => "  ",
                RowPlayback::CurrentPaused => "⏸ ",
                RowPlayback::CurrentPlaying => "▶ ",
            };
            let duration = track.duration_secs.map(format_duration).unwrap_or_default();
            let text = format!(
                "{} {}{}  {:>6}",
                indicator,
                truncate_string(&track.title, title_width),
                truncate_string(&track.subtitle, subtitle_width),
                duration
            );
            ListItem::new(text).style(row_style(i == state.selected))
        })
        .collect();

    render_scrollable_list(frame, list_area, items, state.selected, block);
}
