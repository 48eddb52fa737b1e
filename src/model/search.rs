//! Debounced remote search with stale-result suppression
//!
//! Every keystroke bumps a generation counter and restarts a quiet-period
//! timer. When the timer fires, exactly one fetch runs, tagged with the
//! generation that scheduled it. Its result is applied only if no newer input
//! arrived in the meantime. In-flight fetches are never aborted: they finish
//! and their result is dropped by the generation check.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::AppError;

#[derive(Clone, Copy, Debug)]
pub struct SearchSettings {
    pub min_query_len: usize,
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce: Duration::from_millis(300),
        }
    }
}

/// What `on_input` did with the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Below the threshold; results cleared, nothing scheduled.
    Cleared,
    /// A fetch will run after the quiet period unless superseded.
    Scheduled { generation: u64 },
}

/// Read-only copy of the search state for rendering.
#[derive(Clone, Debug)]
pub struct SearchSnapshot<T> {
    pub query: String,
    pub results: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

struct SearchState<T> {
    query: String,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    results: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> SearchState<T> {
    fn supersede(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation
    }

    fn clear(&mut self) {
        self.results.clear();
        self.loading = false;
        self.error = None;
    }
}

#[derive(Clone)]
pub struct DebouncedSearch<T> {
    settings: SearchSettings,
    state: Arc<Mutex<SearchState<T>>>,
}

impl<T> DebouncedSearch<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            state: Arc::new(Mutex::new(SearchState {
                query: String::new(),
                generation: 0,
                timer: None,
                results: Vec::new(),
                loading: false,
                error: None,
            })),
        }
    }

    /// Record `text` as the latest query and, if long enough, schedule `fetch`
    /// to run after the debounce interval.
    pub async fn on_input<F, Fut>(&self, text: impl Into<String>, fetch: F) -> InputOutcome
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, AppError>> + Send + 'static,
    {
        let text = text.into();
        let mut state = self.state.lock().await;
        let generation = state.supersede();
        state.query = text.clone();

        let query = text.trim().to_string();
        if query.chars().count() < self.settings.min_query_len {
            state.clear();
            tracing::trace!(generation, "Query below threshold, results cleared");
            return InputOutcome::Cleared;
        }

        let this = self.clone();
        let debounce = self.settings.debounce;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            this.fire(generation, query, fetch).await;
        }));

        InputOutcome::Scheduled { generation }
    }

    async fn fire<F, Fut>(&self, generation: u64, query: String, fetch: F)
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return;
            }
            // Detach: from here on, new input must not abort the fetch itself
            state.timer = None;
            state.loading = true;
            state.error = None;
        }

        tracing::debug!(generation, query = %query, "Debounced search firing");
        let result = fetch(query.clone()).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                query = %query,
                "Discarding superseded search result"
            );
            return;
        }

        state.loading = false;
        match result {
            Ok(results) => {
                tracing::debug!(generation, count = results.len(), "Search results applied");
                state.results = results;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(generation, query = %query, error = %e, "Search failed");
                state.error = Some(e.user_message());
            }
        }
    }

    /// Clear query and results and invalidate anything pending or in flight.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.supersede();
        state.query.clear();
        state.clear();
    }

    pub async fn snapshot(&self) -> SearchSnapshot<T> {
        let state = self.state.lock().await;
        SearchSnapshot {
            query: state.query.clone(),
            results: state.results.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub async fn result_at(&self, index: usize) -> Option<T> {
        self.state.lock().await.results.get(index).cloned()
    }

    pub async fn result_count(&self) -> usize {
        self.state.lock().await.results.len()
    }
}
