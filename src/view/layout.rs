//! Layout rendering (screen tabs, status bar)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{PlaybackState, Screen, TrackBrowserState};
use super::utils::format_duration;

pub fn render_tabs(frame: &mut Frame, area: Rect, current: Screen) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!(" {} {} ", i + 1, screen.title())))
        .collect();
    let selected = Screen::ALL.iter().position(|s| *s == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" browse-rs ")
                .title_bottom(Line::from(" h: help ").right_aligned()),
        );
    frame.render_widget(tabs, area);
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    tracks: &TrackBrowserState,
    playback: &PlaybackState,
) {
    let status_text = match playback.current().and_then(|id| tracks.find(id)) {
        None => "No track playing".to_string(),
        Some(track) => {
            let icon = if playback.is_playing() { "▶" } else { "⏸ " };
            let duration = track
                .duration_secs
                .map(|secs| format!(" ({})", format_duration(secs)))
                .unwrap_or_default();
            if track.subtitle.is_empty() {
                format!("{} {}{}", icon, track.title, duration)
            } else {
                format!("{} {} | {}{}", icon, track.title, track.subtitle, duration)
            }
        }
    };

    let style = if playback.is_playing() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let status = Paragraph::new(status_text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now Playing ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(status, area);
}
