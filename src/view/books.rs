//! Book list rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{Book, BookListState, SelectionSet};
use super::utils::{render_scrollable_list, row_style, truncate_string};

pub fn render_books(
    frame: &mut Frame,
    area: Rect,
    state: &BookListState,
    visible: &[Book],
    favorites: &SelectionSet,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_filter_bar(frame, chunks[0], state, favorites);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Books ({}) ", visible.len()))
        .padding(Padding::horizontal(1));
    if let Some(error) = &state.error {
        block = block.title_bottom(Line::from(format!(" {} ", error)).style(Style::default().fg(Color::Red)));
    }

    if state.loading && state.books.is_empty() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, chunks[1]);
        return;
    }

    if visible.is_empty() {
        let hint = if state.favorites_only {
            "No favourites here yet. Press f on a book to add it."
        } else {
            "No books match the current filters."
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let text_width = content_width.saturating_sub(2 + 2 + 2);
    let title_width = (text_width * 50) / 100;
    let author_width = (text_width * 30) / 100;
    let category_width = text_width.saturating_sub(title_width + author_width);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let star = if favorites.is_selected(&book.id) { "★ " } else { "☆ " };
            let text = format!(
                "{}{}  {}  {}",
                star,
                truncate_string(&book.title, title_width),
                truncate_string(&book.author, author_width),
                truncate_string(&book.category, category_width)
            );
            ListItem::new(text).style(row_style(i == state.selected))
        })
        .collect();

    render_scrollable_list(frame, chunks[1], items, state.selected, block);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, state: &BookListState, favorites: &SelectionSet) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Cyan);

    let mut spans = vec![
        Span::styled("Category: ", label),
        Span::styled(state.category.clone().unwrap_or_else(|| "All".to_string()), value),
        Span::styled("   Favourites: ", label),
        Span::styled(
            if state.favorites_only {
                format!("only ({})", favorites.len())
            } else {
                "all".to_string()
            },
            value,
        ),
    ];
    if state.search_active || !state.query.is_empty() {
        spans.push(Span::styled("   Search: ", label));
        spans.push(Span::styled(format!("{}▏", state.query), Style::default().fg(Color::Green)));
    }

    let border_style = if state.search_active {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filters (c category, v favourites, / search) ")
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(bar, area);
}
