//! Book list: loading, filters and favourites

use std::collections::HashSet;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::model::Book;
use super::AppController;

impl AppController {
    /// Fetch books and the stored favourites together, then reconcile the
    /// local favourite set with the store.
    pub async fn load_books(&self) {
        {
            let mut books = self.model.books.lock().await;
            books.loading = true;
            books.error = None;
        }

        let result = self.fetch_books_and_favorites().await;

        let mut books = self.model.books.lock().await;
        books.loading = false;
        match result {
            Ok((loaded, stored)) => {
                tracing::info!(count = loaded.len(), "Books loaded");
                books.set_books(loaded);
                let mut favorites = self.model.favorites.write().await;
                if let Some(ids) = stored {
                    tracing::debug!(count = ids.len(), "Favourites reconciled with store");
                    favorites.replace(ids);
                }
                let visible = books.visible_books(&favorites).len();
                books.clamp_selection(visible);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load books");
                books.error = Some(e.user_message());
            }
        }
    }

    /// A favourites read failure keeps the local set rather than failing the load.
    async fn fetch_books_and_favorites(
        &self,
    ) -> Result<(Vec<Book>, Option<HashSet<String>>), AppError> {
        self.ensure_online().await?;

        let (books, stored) = futures::join!(
            self.services.content.fetch_books(),
            self.services.favorites.current_set()
        );

        let stored = match stored {
            Ok(ids) => Some(ids),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read favourites, keeping local set");
                None
            }
        };
        Ok((books?, stored))
    }

    async fn selected_book(&self) -> Option<Book> {
        let books = self.model.books.lock().await;
        let favorites = self.model.favorites.read().await;
        books.visible_books(&favorites).get(books.selected).cloned()
    }

    async fn clamp_book_selection(&self) {
        let visible = self.model.visible_books().await.len();
        self.model.books.lock().await.clamp_selection(visible);
    }

    /// Flip the highlighted book locally at once and persist in the background.
    ///
    /// A store failure is reported but not rolled back; the next
    /// [`load_books`](Self::load_books) reconciles with the store.
    pub async fn toggle_favorite(&self) -> Option<JoinHandle<()>> {
        let book = self.selected_book().await?;
        let now_favorite = self.model.favorites.write().await.toggle(&book.id);
        tracing::info!(id = %book.id, favorite = now_favorite, "Favourite toggled locally");
        self.clamp_book_selection().await;

        let controller = self.clone();
        Some(tokio::spawn(async move {
            match controller.services.favorites.toggle(&book.id).await {
                Ok(stored) if stored != now_favorite => {
                    tracing::warn!(id = %book.id, stored, local = now_favorite, "Favourite diverged from store");
                }
                Ok(_) => {}
                Err(e) => controller.report_error("toggle_favorite", &e).await,
            }
        }))
    }

    pub async fn cycle_category(&self) {
        let mut books = self.model.books.lock().await;
        books.cycle_category();
        tracing::debug!(category = ?books.category, "Book category changed");
    }

    pub async fn toggle_favorites_only(&self) {
        self.model.books.lock().await.toggle_favorites_only();
    }

    pub async fn toggle_book_search(&self) {
        self.model.books.lock().await.toggle_search();
    }

    pub async fn book_query_push(&self, c: char) {
        self.model.books.lock().await.push_query_char(c);
    }

    pub async fn book_query_pop(&self) {
        self.model.books.lock().await.pop_query_char();
    }

    pub async fn book_move_up(&self) {
        self.model.books.lock().await.move_up();
    }

    pub async fn book_move_down(&self) {
        let visible = self.model.visible_books().await.len();
        self.model.books.lock().await.move_down(visible);
    }
}
