//! Profile editor: form editing, place autocomplete and saving

use std::sync::Arc;

use crate::model::{ProfileDraft, ProfileField};
use super::AppController;

impl AppController {
    /// Pre-fill the editor from the stored profile, if there is one.
    pub async fn load_profile(&self) {
        match self.services.users.load().await {
            Ok(Some(profile)) => {
                tracing::info!(name = %profile.name, "Profile loaded");
                *self.model.profile.lock().await = ProfileDraft::from_profile(&profile);
            }
            Ok(None) => tracing::debug!("No stored profile"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load profile");
                self.model.profile.lock().await.notice = Some(e.user_message());
            }
        }
    }

    pub async fn profile_focus(&self, forward: bool) {
        let mut profile = self.model.profile.lock().await;
        profile.focus = if forward { profile.focus.next() } else { profile.focus.prev() };
    }

    pub async fn profile_type_char(&self, c: char) {
        let query = {
            let mut profile = self.model.profile.lock().await;
            let edited = profile.push_char(c);
            (edited && profile.focus == ProfileField::BirthPlace).then(|| profile.place_text.clone())
        };
        if let Some(query) = query {
            self.update_place_query(query).await;
        }
    }

    pub async fn profile_backspace(&self) {
        let query = {
            let mut profile = self.model.profile.lock().await;
            let edited = profile.backspace();
            (edited && profile.focus == ProfileField::BirthPlace).then(|| profile.place_text.clone())
        };
        if let Some(query) = query {
            self.update_place_query(query).await;
        }
    }

    /// Feed the place field into the debounced location search.
    pub async fn update_place_query(&self, text: String) {
        let locations = Arc::clone(&self.services.locations);
        let outcome = self
            .model
            .place_search
            .on_input(text, move |query| async move { locations.search(&query).await })
            .await;
        tracing::trace!(?outcome, "Place query updated");
    }

    pub async fn profile_cycle_choice(&self, forward: bool) {
        self.model.profile.lock().await.cycle_choice(forward);
    }

    pub async fn move_place_suggestion(&self, forward: bool) {
        let count = self.model.place_search.result_count().await;
        self.model.profile.lock().await.move_suggestion(forward, count);
    }

    /// Take the highlighted suggestion as the birth place.
    pub async fn pick_place(&self) {
        let index = self.model.profile.lock().await.suggestion_index;
        let Some(place) = self.model.place_search.result_at(index).await else {
            return;
        };
        tracing::debug!(place = %place.name, "Birth place picked");
        self.model.profile.lock().await.pick_place(place);
        self.model.place_search.reset().await;
    }

    /// Validate the form and save it. Invalid input never reaches the store.
    pub async fn save_profile(&self) {
        let profile = {
            let mut draft = self.model.profile.lock().await;
            match draft.validate() {
                Ok(profile) => {
                    draft.saving = true;
                    draft.notice = None;
                    profile
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Profile not saved");
                    draft.notice = Some(e.user_message());
                    draft.saved = false;
                    return;
                }
            }
        };

        let result = self.services.users.save(&profile).await;

        let mut draft = self.model.profile.lock().await;
        draft.saving = false;
        match result {
            Ok(()) => {
                tracing::info!(name = %profile.name, "Profile saved");
                draft.saved = true;
                draft.notice = Some("Profile saved.".to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save profile");
                draft.saved = false;
                draft.notice = Some(e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use crate::error::SAVE_FAILED_MESSAGE;
    use crate::model::{ProfileField, UserProfile};
    use super::super::test_support::{place, Harness};

    async fn fill_valid_form(h: &Harness) {
        let mut draft = h.model().profile.lock().await;
        draft.name = "Asha".to_string();
        draft.birth_date = "1990-04-12".to_string();
        draft.birth_time = "06:30".to_string();
        draft.pick_place(place("New Delhi, Delhi, India"));
    }

    async fn type_text(h: &Harness, text: &str) {
        for c in text.chars() {
            h.controller.profile_type_char(c).await;
        }
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_store() {
        let h = Harness::new();
        h.controller.save_profile().await;

        assert_eq!(h.users.saves.load(Ordering::SeqCst), 0);
        let draft = h.model().profile.lock().await;
        assert_eq!(draft.notice.as_deref(), Some("Name is required."));
        assert!(!draft.saving);
    }

    #[tokio::test]
    async fn valid_form_is_saved_and_reloads() {
        let h = Harness::new();
        fill_valid_form(&h).await;
        h.controller.save_profile().await;

        assert!(h.model().profile.lock().await.saved);
        let stored: UserProfile = h.users.saved.lock().unwrap().clone().unwrap();
        assert_eq!(stored.name, "Asha");

        *h.model().profile.lock().await = Default::default();
        h.controller.load_profile().await;
        assert_eq!(h.model().profile.lock().await.birth_time, "06:30");
    }

    #[tokio::test]
    async fn store_failure_shows_generic_message() {
        let h = Harness::new();
        h.users.fail.store(true, Ordering::SeqCst);
        fill_valid_form(&h).await;

        h.controller.save_profile().await;

        let draft = h.model().profile.lock().await;
        assert_eq!(draft.notice.as_deref(), Some(SAVE_FAILED_MESSAGE));
        assert!(!draft.saved);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_a_place_searches_once_after_quiet() {
        let h = Harness::new();
        *h.locations.places.lock().unwrap() = vec![place("Delhi, India"), place("Delhi Cantonment, India")];
        for _ in 0..3 {
            h.controller.profile_focus(true).await;
        }
        assert_eq!(h.model().profile.lock().await.focus, ProfileField::BirthPlace);

        type_text(&h, "del").await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        type_text(&h, "hi").await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*h.locations.queries.lock().unwrap(), vec!["delhi".to_string()]);
        assert_eq!(h.model().place_search.result_count().await, 2);

        h.controller.move_place_suggestion(true).await;
        h.controller.pick_place().await;

        let draft = h.model().profile.lock().await;
        assert_eq!(draft.place_text, "Delhi Cantonment, India");
        assert!(draft.place.is_some());
        assert_eq!(h.model().place_search.result_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn editing_the_place_drops_the_picked_one() {
        let h = Harness::new();
        fill_valid_form(&h).await;
        h.model().profile.lock().await.focus = ProfileField::BirthPlace;

        h.controller.profile_backspace().await;

        let draft = h.model().profile.lock().await;
        assert!(draft.place.is_none());
        assert!(draft.validate().is_err());
    }

    #[tokio::test]
    async fn pickers_cycle_only_when_focused() {
        let h = Harness::new();
        let before = h.model().profile.lock().await.ayanamsa;
        h.controller.profile_cycle_choice(true).await;
        assert_eq!(h.model().profile.lock().await.ayanamsa, before);

        h.model().profile.lock().await.focus = ProfileField::Ayanamsa;
        h.controller.profile_cycle_choice(true).await;
        assert_ne!(h.model().profile.lock().await.ayanamsa, before);
    }
}
