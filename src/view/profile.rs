//! Profile editor rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{Choice, Place, ProfileDraft, ProfileField, SearchSnapshot};
use super::utils::{render_scrollable_list, row_style, truncate_string};

const LABEL_WIDTH: usize = 14;
const QUERY_TITLE_WIDTH: usize = 24;

pub fn render_profile(
    frame: &mut Frame,
    area: Rect,
    draft: &ProfileDraft,
    place_search: &SearchSnapshot<Place>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_form(frame, chunks[0], draft);
    render_suggestions(frame, chunks[1], draft, place_search);
}

fn field_value(draft: &ProfileDraft, field: ProfileField) -> String {
    match field {
        ProfileField::Name => draft.name.clone(),
        ProfileField::BirthDate => draft.birth_date.clone(),
        ProfileField::BirthTime => draft.birth_time.clone(),
        ProfileField::BirthPlace => draft.place_text.clone(),
        ProfileField::Ayanamsa => format!("◀ {} ▶", draft.ayanamsa.label()),
        ProfileField::HouseSystem => format!("◀ {} ▶", draft.house_system.label()),
        ProfileField::ChartStyle => format!("◀ {} ▶", draft.chart_style.label()),
    }
}

fn placeholder(field: ProfileField) -> &'static str {
    match field {
        ProfileField::BirthDate => "YYYY-MM-DD",
        ProfileField::BirthTime => "HH:MM",
        ProfileField::BirthPlace => "Start typing a city",
        _ => "",
    }
}

fn render_form(frame: &mut Frame, area: Rect, draft: &ProfileDraft) {
    let mut lines: Vec<Line> = Vec::new();

    for field in ProfileField::ALL {
        let focused = field == draft.focus;
        let value = field_value(draft, field);
        let label_style = if focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let value_span = if value.is_empty() {
            Span::styled(placeholder(field), Style::default().fg(Color::DarkGray))
        } else if focused && field.is_text() {
            Span::styled(format!("{}▏", value), Style::default().fg(Color::Green))
        } else {
            Span::styled(value, Style::default().fg(Color::White))
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style),
            value_span,
        ]));

        if field == ProfileField::BirthPlace {
            if let Some(place) = &draft.place {
                lines.push(Line::from(Span::styled(
                    format!("{:<width$}{}", "", place.coordinates_label(), width = LABEL_WIDTH),
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    if draft.saving {
        lines.push(Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow))));
    } else if let Some(notice) = &draft.notice {
        let color = if draft.saved { Color::Green } else { Color::Red };
        lines.push(Line::from(Span::styled(notice.clone(), Style::default().fg(color))));
    }

    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Profile ")
            .title_bottom(Line::from(" Ctrl+S save ").right_aligned())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(form, area);
}

/// Name the query the listed suggestions belong to.
fn suggestions_title(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        " Places (PgUp/PgDn, Enter to pick) ".to_string()
    } else {
        let query = truncate_string(query, QUERY_TITLE_WIDTH);
        format!(" Places for \"{}\" (PgUp/PgDn, Enter to pick) ", query.trim_end())
    }
}

fn render_suggestions(
    frame: &mut Frame,
    area: Rect,
    draft: &ProfileDraft,
    place_search: &SearchSnapshot<Place>,
) {
    let active = draft.focus == ProfileField::BirthPlace;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(suggestions_title(&place_search.query))
        .padding(Padding::horizontal(1))
        .border_style(if active {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        });

    let message = if place_search.loading {
        Some(("Searching...", Color::Yellow))
    } else if let Some(error) = &place_search.error {
        Some((error.as_str(), Color::Red))
    } else if place_search.results.is_empty() {
        Some(("Type a few letters of the birth place.", Color::DarkGray))
    } else {
        None
    };

    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = place_search
        .results
        .iter()
        .enumerate()
        .map(|(i, place)| {
            ListItem::new(vec![
                Line::from(place.name.clone()),
                Line::from(Span::styled(
                    format!("  {}", place.coordinates_label()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(row_style(active && i == draft.suggestion_index))
        })
        .collect();

    render_scrollable_list(frame, area, items, draft.suggestion_index, block);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_title_names_the_searched_query() {
        assert_eq!(suggestions_title("  "), " Places (PgUp/PgDn, Enter to pick) ");
        assert_eq!(
            suggestions_title(" delhi "),
            " Places for \"delhi\" (PgUp/PgDn, Enter to pick) "
        );
        assert!(suggestions_title("Thiruvananthapuram, Kerala, India").contains("...\""));
    }
}
