//! Per-screen state: track browser, book list, profile editor

use chrono::{Local, NaiveDate, NaiveTime};

use crate::error::AppError;
use super::{Ayanamsa, Book, ChartStyle, Choice, HouseSystem, Place, Track, UserProfile};
use super::filter::filter;
use super::selection::SelectionSet;
use super::types::ProfileField;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Audio track list with local search
#[derive(Clone, Debug, Default)]
pub struct TrackBrowserState {
    pub tracks: Vec<Track>,
    pub visible: Vec<Track>,
    pub query: String,
    pub search_active: bool,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl TrackBrowserState {
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.refilter();
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.selected = 0;
        self.refilter();
    }

    /// Entering or leaving search mode always starts from an empty query.
    pub fn toggle_search(&mut self) {
        self.search_active = !self.search_active;
        self.set_query(String::new());
    }

    fn refilter(&mut self) {
        self.visible = filter(&self.tracks, &self.query);
        self.selected = clamp_index(self.selected, self.visible.len());
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected = clamp_index(self.selected + 1, self.visible.len());
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible.get(self.selected)
    }

    pub fn find(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }
}

/// Book list filtered by category, favourites and text
#[derive(Clone, Debug, Default)]
pub struct BookListState {
    pub books: Vec<Book>,
    pub category: Option<String>,
    pub favorites_only: bool,
    pub query: String,
    pub search_active: bool,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl BookListState {
    pub fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
        if let Some(category) = &self.category {
            if !self.books.iter().any(|b| &b.category == category) {
                self.category = None;
            }
        }
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for book in &self.books {
            if !categories.contains(&book.category) {
                categories.push(book.category.clone());
            }
        }
        categories
    }

    /// All -> first category -> ... -> last category -> All
    pub fn cycle_category(&mut self) {
        let categories = self.categories();
        self.category = match &self.category {
            None => categories.first().cloned(),
            Some(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1))
                .cloned(),
        };
        self.selected = 0;
    }

    pub fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.selected = 0;
    }

    pub fn toggle_search(&mut self) {
        self.search_active = !self.search_active;
        self.query.clear();
        self.selected = 0;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn visible_books(&self, favorites: &SelectionSet) -> Vec<Book> {
        let narrowed: Vec<Book> = self
            .books
            .iter()
            .filter(|b| self.category.as_ref().is_none_or(|c| &b.category == c))
            .filter(|b| !self.favorites_only || favorites.is_selected(&b.id))
            .cloned()
            .collect();
        filter(&narrowed, &self.query)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, visible_len: usize) {
        self.selected = clamp_index(self.selected + 1, visible_len);
    }

    pub fn clamp_selection(&mut self, visible_len: usize) {
        self.selected = clamp_index(self.selected, visible_len);
    }
}

/// Profile editor form contents
#[derive(Clone, Debug, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub birth_date: String,
    pub birth_time: String,
    pub place_text: String,
    pub place: Option<Place>,
    pub suggestion_index: usize,
    pub ayanamsa: Ayanamsa,
    pub house_system: HouseSystem,
    pub chart_style: ChartStyle,
    pub focus: ProfileField,
    pub saving: bool,
    pub notice: Option<String>,
    pub saved: bool,
}

impl ProfileDraft {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            birth_date: profile.birth_date.format(DATE_FORMAT).to_string(),
            birth_time: profile.birth_time.format(TIME_FORMAT).to_string(),
            place_text: profile.birth_place.name.clone(),
            place: Some(profile.birth_place.clone()),
            ayanamsa: profile.ayanamsa,
            house_system: profile.house_system,
            chart_style: profile.chart_style,
            ..Self::default()
        }
    }

    /// Text of the focused free-text field, if it is one.
    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            ProfileField::Name => Some(&mut self.name),
            ProfileField::BirthDate => Some(&mut self.birth_date),
            ProfileField::BirthTime => Some(&mut self.birth_time),
            ProfileField::BirthPlace => Some(&mut self.place_text),
            _ => None,
        }
    }

    /// Apply a typed character. Editing the place text drops the picked place.
    pub fn push_char(&mut self, c: char) -> bool {
        let edited = match self.focused_text_mut() {
            Some(text) => {
                text.push(c);
                true
            }
            None => false,
        };
        self.after_edit(edited)
    }

    pub fn backspace(&mut self) -> bool {
        let edited = match self.focused_text_mut() {
            Some(text) => text.pop().is_some(),
            None => false,
        };
        self.after_edit(edited)
    }

    fn after_edit(&mut self, edited: bool) -> bool {
        if edited {
            self.saved = false;
            self.notice = None;
            if self.focus == ProfileField::BirthPlace {
                self.place = None;
                self.suggestion_index = 0;
            }
        }
        edited
    }

    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            ProfileField::Ayanamsa => {
                self.ayanamsa = if forward { self.ayanamsa.next() } else { self.ayanamsa.prev() };
            }
            ProfileField::HouseSystem => {
                self.house_system = if forward { self.house_system.next() } else { self.house_system.prev() };
            }
            ProfileField::ChartStyle => {
                self.chart_style = if forward { self.chart_style.next() } else { self.chart_style.prev() };
            }
            _ => return,
        }
        self.saved = false;
    }

    pub fn pick_place(&mut self, place: Place) {
        self.place_text = place.name.clone();
        self.place = Some(place);
        self.suggestion_index = 0;
        self.saved = false;
        self.notice = None;
    }

    pub fn move_suggestion(&mut self, forward: bool, count: usize) {
        self.suggestion_index = if forward {
            clamp_index(self.suggestion_index + 1, count)
        } else {
            self.suggestion_index.saturating_sub(1)
        };
    }

    /// Build a profile from the form, or explain what is missing.
    pub fn validate(&self) -> Result<UserProfile, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required.".to_string()));
        }

        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), DATE_FORMAT)
            .map_err(|_| AppError::Validation("Birth date must be YYYY-MM-DD.".to_string()))?;
        if birth_date > Local::now().date_naive() {
            return Err(AppError::Validation("Birth date can't be in the future.".to_string()));
        }

        let birth_time = NaiveTime::parse_from_str(self.birth_time.trim(), TIME_FORMAT)
            .map_err(|_| AppError::Validation("Birth time must be HH:MM (24-hour).".to_string()))?;

        let birth_place = self
            .place
            .clone()
            .ok_or_else(|| AppError::Validation("Pick a birth place from the suggestions.".to_string()))?;

        Ok(UserProfile {
            name: name.to_string(),
            birth_date,
            birth_time,
            birth_place,
            ayanamsa: self.ayanamsa,
            house_system: self.house_system,
            chart_style: self.chart_style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str, subtitle: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            audio_url: format!("https://cdn.example.org/{}.mp3", id),
            duration_secs: Some(240),
            artwork_url: None,
        }
    }

    fn book(id: &str, title: &str, category: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Anon".to_string(),
            category: category.to_string(),
            cover_url: None,
            description: None,
        }
    }

    fn pune() -> Place {
        Place {
            name: "Pune, Maharashtra, India".to_string(),
            latitude: 18.5204,
            longitude: 73.8567,
        }
    }

    #[test]
    fn track_query_filters_and_clamps_selection() {
        let mut state = TrackBrowserState::default();
        state.set_tracks(vec![
            track("t1", "Aarti Sangam", "Morning"),
            track("t2", "Bhajan", "Evening"),
            track("t3", "Evening Aarti", "Temple"),
        ]);
        state.move_down();
        state.move_down();
        assert_eq!(state.selected, 2);

        state.toggle_search();
        state.set_query("bhaj".to_string());
        assert_eq!(state.visible.len(), 1);
        assert_eq!(state.selected_track().map(|t| t.id.as_str()), Some("t2"));

        state.toggle_search();
        assert!(!state.search_active);
        assert!(state.query.is_empty());
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn reload_keeps_active_query() {
        let mut state = TrackBrowserState::default();
        state.set_query("aarti".to_string());
        state.set_tracks(vec![track("t1", "Aarti Sangam", "Morning"), track("t2", "Bhajan", "Evening")]);
        assert_eq!(state.visible.len(), 1);
        assert!(state.find("t2").is_some());
    }

    #[test]
    fn selection_on_empty_list_stays_at_zero() {
        let mut state = TrackBrowserState::default();
        state.move_down();
        state.move_up();
        assert_eq!(state.selected, 0);
        assert!(state.selected_track().is_none());
    }

    #[test]
    fn categories_cycle_through_all_and_back() {
        let mut state = BookListState::default();
        state.set_books(vec![
            book("b1", "Gita", "Scripture"),
            book("b2", "Yoga Sutras", "Yoga"),
            book("b3", "Upanishads", "Scripture"),
        ]);
        assert_eq!(state.categories(), vec!["Scripture".to_string(), "Yoga".to_string()]);

        state.cycle_category();
        assert_eq!(state.category.as_deref(), Some("Scripture"));
        assert_eq!(state.visible_books(&SelectionSet::new()).len(), 2);

        state.cycle_category();
        assert_eq!(state.category.as_deref(), Some("Yoga"));
        state.cycle_category();
        assert_eq!(state.category, None);
        assert_eq!(state.visible_books(&SelectionSet::new()).len(), 3);
    }

    #[test]
    fn favorites_only_uses_selection() {
        let mut state = BookListState::default();
        state.set_books(vec![book("b1", "Gita", "Scripture"), book("b2", "Yoga Sutras", "Yoga")]);
        let mut favorites = SelectionSet::new();
        favorites.toggle("b2");

        state.toggle_favorites_only();
        let visible = state.visible_books(&favorites);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "b2");
    }

    #[test]
    fn vanished_category_resets_filter() {
        let mut state = BookListState::default();
        state.set_books(vec![book("b1", "Gita", "Scripture")]);
        state.cycle_category();
        state.set_books(vec![book("b2", "Yoga Sutras", "Yoga")]);
        assert_eq!(state.category, None);
    }

    #[test]
    fn book_text_search_applies_after_category() {
        let mut state = BookListState::default();
        state.set_books(vec![
            book("b1", "Gita", "Scripture"),
            book("b2", "Gita Commentary", "Commentary"),
        ]);
        state.cycle_category();
        state.toggle_search();
        for c in "gita".chars() {
            state.push_query_char(c);
        }
        let visible = state.visible_books(&SelectionSet::new());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "b1");
    }

    fn complete_draft() -> ProfileDraft {
        ProfileDraft {
            name: "  Asha  ".to_string(),
            birth_date: "1990-04-12".to_string(),
            birth_time: "06:30".to_string(),
            place_text: pune().name,
            place: Some(pune()),
            ..ProfileDraft::default()
        }
    }

    #[test]
    fn complete_draft_validates() {
        let profile = complete_draft().validate().unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(1990, 4, 12).unwrap());
        assert_eq!(profile.birth_time, NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(profile.birth_place, pune());
    }

    #[test]
    fn validation_reports_first_problem() {
        let cases: Vec<(fn(&mut ProfileDraft), &str)> = vec![
            (|d: &mut ProfileDraft| d.name = "   ".to_string(), "Name is required."),
            (|d: &mut ProfileDraft| d.birth_date = "12/04/1990".to_string(), "Birth date must be YYYY-MM-DD."),
            (|d: &mut ProfileDraft| d.birth_date = "2999-01-01".to_string(), "Birth date can't be in the future."),
            (|d: &mut ProfileDraft| d.birth_time = "6.30pm".to_string(), "Birth time must be HH:MM (24-hour)."),
            (|d: &mut ProfileDraft| d.place = None, "Pick a birth place from the suggestions."),
        ];
        for (break_it, expected) in cases {
            let mut draft = complete_draft();
            break_it(&mut draft);
            match draft.validate() {
                Err(AppError::Validation(notice)) => assert_eq!(notice, expected),
                other => panic!("expected validation error {:?}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn editing_place_text_drops_picked_place() {
        let mut draft = complete_draft();
        draft.focus = ProfileField::BirthPlace;
        assert!(draft.backspace());
        assert!(draft.place.is_none());

        draft.pick_place(pune());
        assert_eq!(draft.place_text, pune().name);
        assert!(draft.place.is_some());
    }

    #[test]
    fn typing_on_picker_is_ignored() {
        let mut draft = complete_draft();
        draft.focus = ProfileField::Ayanamsa;
        assert!(!draft.push_char('x'));
        draft.cycle_choice(true);
        assert_eq!(draft.ayanamsa, Ayanamsa::Raman);
        draft.cycle_choice(false);
        assert_eq!(draft.ayanamsa, Ayanamsa::Lahiri);
    }

    #[test]
    fn draft_round_trips_saved_profile() {
        let profile = complete_draft().validate().unwrap();
        let draft = ProfileDraft::from_profile(&profile);
        assert_eq!(draft.birth_date, "1990-04-12");
        assert_eq!(draft.birth_time, "06:30");
        assert_eq!(draft.validate().unwrap(), profile);
    }

    #[test]
    fn suggestion_cursor_stays_in_range() {
        let mut draft = ProfileDraft::default();
        draft.move_suggestion(true, 2);
        draft.move_suggestion(true, 2);
        assert_eq!(draft.suggestion_index, 1);
        draft.move_suggestion(false, 2);
        draft.move_suggestion(false, 2);
        assert_eq!(draft.suggestion_index, 0);
    }
}
