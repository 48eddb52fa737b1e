//! Overlay rendering (error notification, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::UiState;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_height = (2 + error_line_count.max(1)).min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: area.width.saturating_sub(popup_width) / 2,
            y: area.height.saturating_sub(popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── General ──"),
        ("Tab / Shift+Tab", "Switch screen"),
        ("1 / 2 / 3", "Tracks / Books / Profile"),
        ("H or ?", "Toggle this help"),
        ("Q / Ctrl+C", "Quit"),
        ("", ""),
        ("", "── Tracks ──"),
        ("/", "Search tracks"),
        ("↑ / ↓", "Move selection"),
        ("Enter", "Play / Pause / Resume"),
        ("Space", "Pause or resume current"),
        ("S", "Stop"),
        ("R", "Reload"),
        ("", ""),
        ("", "── Books ──"),
        ("F / Enter", "Toggle favourite"),
        ("C", "Cycle category"),
        ("V", "Favourites only"),
        ("/", "Search books"),
        ("R", "Reload"),
        ("", ""),
        ("", "── Profile ──"),
        ("↑ / ↓", "Move between fields"),
        ("← / →", "Change selection"),
        ("PgUp / PgDn", "Highlight place"),
        ("Enter", "Pick highlighted place"),
        ("Ctrl+S", "Save profile"),
    ];

    let popup_width = 56.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^50}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
