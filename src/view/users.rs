//! Users Page
//!
//! View-model of the users screen. The merged users are flattened into
//! [`UserRow`]s and handed to the table widget as a complete dataset on
//! each refresh. Favorites live in their own store and are flipped in place
//! without a refetch.

use super::loader::{Loader, LoaderGuard};
use super::notify::Notifier;
use super::table::{render_table, TableWidget, UserRow};
use super::{ActionError, ActionResult};
use crate::merge::merge;
use crate::model::{EntityKind, UserPatch};
use crate::overlay::{FavoritesStore, OverlayStore};
use crate::source::DataSource;
use crate::storage::StorageResult;
use std::sync::Arc;

/// Values of the add/edit user form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl UserForm {
    fn from_row(row: &UserRow) -> Self {
        Self {
            name: row.name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            city: row.city.clone(),
        }
    }

    /// Trimmed copy of the form
    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }

    fn into_patch(self, id: i64) -> UserPatch {
        UserPatch::fields(id, self.name, self.email, self.phone, self.city)
    }
}

/// Interactions on the users page
#[derive(Debug, Clone)]
pub enum UsersEvent {
    Refresh,
    Add(UserForm),
    Save { id: i64, form: UserForm },
    Delete(i64),
    ToggleFavorite(i64),
}

/// Users page view-model
pub struct UsersPage {
    source: Arc<dyn DataSource>,
    overlay: OverlayStore,
    favorites: FavoritesStore,
    notifier: Arc<dyn Notifier>,
    loader: Arc<dyn Loader>,
    table: Box<dyn TableWidget>,
}

impl UsersPage {
    pub fn new(
        source: Arc<dyn DataSource>,
        overlay: OverlayStore,
        favorites: FavoritesStore,
        notifier: Arc<dyn Notifier>,
        loader: Arc<dyn Loader>,
        table: Box<dyn TableWidget>,
    ) -> Self {
        Self {
            source,
            overlay,
            favorites,
            notifier,
            loader,
            table,
        }
    }

    pub fn table(&self) -> &dyn TableWidget {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> &mut dyn TableWidget {
        self.table.as_mut()
    }

    /// Current dataset in table order
    pub fn rows(&self) -> &[UserRow] {
        self.table.rows()
    }

    pub fn row(&self, id: i64) -> Option<&UserRow> {
        self.table.rows().iter().find(|r| r.id == id)
    }

    /// Markup of one table page
    pub fn render_html(&self, page: usize) -> String {
        render_table(self.table.columns(), self.table.page(page))
    }

    pub async fn dispatch(&mut self, event: UsersEvent) -> ActionResult<()> {
        match event {
            UsersEvent::Refresh => self.refresh().await,
            UsersEvent::Add(form) => self.add(form).await.map(|_| ()),
            UsersEvent::Save { id, form } => self.save_edit(id, form).await,
            UsersEvent::Delete(id) => self.delete(id).await,
            UsersEvent::ToggleFavorite(id) => self.toggle_favorite(id).map(|_| ()),
        }
    }

    /// Fetch, merge with the overlay and reload the table
    ///
    /// On failure the table keeps its previous dataset.
    pub async fn refresh(&mut self) -> ActionResult<()> {
        let _loading = LoaderGuard::new(self.loader.clone());

        let base = match self.source.fetch_users().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(source = self.source.name(), error = %e, "Failed to fetch users");
                self.notifier.error("Failed to fetch users");
                return Err(e.into());
            }
        };

        let patches = self.overlay.get::<UserPatch>();
        let favorites = self.favorites.get();
        let rows: Vec<UserRow> = merge(base, &patches)
            .into_iter()
            .map(|user| {
                let favorite = favorites.contains(&user.id);
                UserRow::from_user(user, favorite)
            })
            .collect();

        tracing::debug!(users = rows.len(), patches = patches.len(), "Rendered users");
        self.table.load(rows);
        Ok(())
    }

    /// Create a user locally and return its synthetic id
    pub async fn add(&mut self, form: UserForm) -> ActionResult<i64> {
        let form = form.trimmed();
        if form.name.is_empty() || form.email.is_empty() {
            return Err(self.reject("Please provide name and email"));
        }

        let id = self.persist(self.overlay.insert_local(form.into_patch(0)))?;
        self.notifier.success("User added (local)");
        self.reload().await;
        Ok(id)
    }

    /// Current displayed values of a user, for the edit form
    pub fn open_edit(&self, id: i64) -> ActionResult<UserForm> {
        match self.row(id) {
            Some(row) => Ok(UserForm::from_row(row)),
            None => Err(self.not_found(id)),
        }
    }

    /// Save the edit form as an overlay patch
    pub async fn save_edit(&mut self, id: i64, form: UserForm) -> ActionResult<()> {
        let form = form.trimmed();
        if form.name.is_empty() || form.email.is_empty() {
            return Err(self.reject("Please provide name and email"));
        }

        self.persist(self.overlay.upsert(id, form.into_patch(id)))?;
        self.notifier.success("User updated (local)");
        self.reload().await;
        Ok(())
    }

    /// Soft-delete a user
    pub async fn delete(&mut self, id: i64) -> ActionResult<()> {
        self.persist(self.overlay.mark_deleted::<UserPatch>(id))?;
        self.notifier.success("User deleted (local)");
        self.reload().await;
        Ok(())
    }

    /// Flip the favorite flag of a user and redraw its row in place
    pub fn toggle_favorite(&mut self, id: i64) -> ActionResult<bool> {
        let favorite = self.persist(self.favorites.toggle(id))?;

        if let Some(row) = self.table.row_mut(id) {
            row.favorite = favorite;
        }

        if favorite {
            self.notifier.success("Added to favorites");
        } else {
            self.notifier.info("Removed from favorites");
        }
        Ok(favorite)
    }

    async fn reload(&mut self) {
        // refresh reports its own failures
        let _ = self.refresh().await;
    }

    fn reject(&self, message: &str) -> ActionError {
        self.notifier.error(message);
        ActionError::Validation(message.to_string())
    }

    fn not_found(&self, id: i64) -> ActionError {
        self.notifier.error("User not found");
        ActionError::NotFound {
            kind: EntityKind::Users,
            id,
        }
    }

    fn persist<T>(&self, result: StorageResult<T>) -> ActionResult<T> {
        result.map_err(|e| {
            tracing::error!(error = %e, "Failed to save local users");
            self.notifier.error("Failed to save local changes");
            ActionError::Storage(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::LOCAL_NAME_PLACEHOLDER;
    use crate::source::FixtureSource;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};
    use crate::view::{DataTable, LoadingIndicator, ToastLevel, ToastLog};

    struct Harness {
        page: UsersPage,
        kv: Arc<MemoryStore>,
        toasts: Arc<ToastLog>,
    }

    async fn harness() -> Harness {
        let kv = Arc::new(MemoryStore::new());
        let toasts = Arc::new(ToastLog::new());

        let mut page = UsersPage::new(
            Arc::new(FixtureSource::new()),
            OverlayStore::new(kv.clone()),
            FavoritesStore::new(kv.clone()),
            toasts.clone(),
            Arc::new(LoadingIndicator::new()),
            Box::new(DataTable::users(8)),
        );
        page.refresh().await.unwrap();

        Harness { page, kv, toasts }
    }

    fn form(name: &str, email: &str, phone: &str, city: &str) -> UserForm {
        UserForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Lock("read-only".to_string()))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Lock("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_refresh_flattens_rows() {
        let h = harness().await;

        assert_eq!(h.page.rows().len(), 5);
        let row = h.page.row(2).unwrap();
        assert_eq!(row.name, "Ahmed Hassan");
        assert_eq!(row.city, "Alexandria");
        assert!(!row.favorite);
    }

    #[tokio::test]
    async fn test_favorite_toggle_twice() {
        let mut h = harness().await;

        assert!(h.page.toggle_favorite(2).unwrap());
        assert!(h.page.row(2).unwrap().favorite);
        assert_eq!(h.toasts.last().unwrap().message, "Added to favorites");

        assert!(!h.page.toggle_favorite(2).unwrap());
        assert!(!h.page.row(2).unwrap().favorite);
        let last = h.toasts.last().unwrap();
        assert_eq!(last.message, "Removed from favorites");
        assert_eq!(last.level, ToastLevel::Info);

        assert_eq!(h.kv.get_item("favorites").unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_favorites_survive_refresh() {
        let mut h = harness().await;
        h.page.toggle_favorite(4).unwrap();

        h.page.refresh().await.unwrap();
        assert!(h.page.row(4).unwrap().favorite);
    }

    #[tokio::test]
    async fn test_edit_city_only() {
        let mut h = harness().await;

        let mut edit = h.page.open_edit(3).unwrap();
        edit.city = "Luxor".to_string();
        h.page.save_edit(3, edit).await.unwrap();

        let row = h.page.row(3).unwrap();
        assert_eq!(row.city, "Luxor");
        assert_eq!(row.name, "Mohamed Samir");
        assert_eq!(row.phone, "+20 111 222 3333");
        assert_eq!(h.toasts.last().unwrap().message, "User updated (local)");
    }

    #[tokio::test]
    async fn test_save_edit_requires_name_and_email() {
        let mut h = harness().await;

        let err = h
            .page
            .save_edit(1, form("", "x@example.com", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert!(h.kv.get_item("users_local").unwrap().is_none());
        assert_eq!(h.page.row(1).unwrap().name, "Youssef Eldesouky");
    }

    #[tokio::test]
    async fn test_open_edit_unknown_user() {
        let h = harness().await;

        assert!(matches!(
            h.page.open_edit(99),
            Err(ActionError::NotFound { id: 99, .. })
        ));
        assert_eq!(h.toasts.last().unwrap().message, "User not found");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let mut h = harness().await;
        h.page.delete(5).await.unwrap();

        assert_eq!(h.page.rows().len(), 4);
        assert!(h.page.row(5).is_none());
        assert_eq!(h.toasts.last().unwrap().message, "User deleted (local)");
    }

    #[tokio::test]
    async fn test_add_local_user() {
        let mut h = harness().await;

        let id = h
            .page
            .add(form(" Mona Adel ", "mona@example.com", "", "Aswan"))
            .await
            .unwrap();
        assert_eq!(id, -1);

        let row = h.page.row(-1).unwrap();
        assert_eq!(row.name, "Mona Adel");
        assert_eq!(row.city, "Aswan");
        assert_eq!(h.page.rows().last().unwrap().id, -1);

        assert!(h.page.add(form("Nameless", "", "", "")).await.is_err());
        assert_eq!(h.page.rows().len(), 6);
    }

    #[tokio::test]
    async fn test_stored_local_user_without_name_gets_placeholder() {
        let h = harness().await;
        h.kv.set_item("users_local", r#"[{"id":-4}]"#).unwrap();

        let mut page = h.page;
        page.refresh().await.unwrap();
        assert_eq!(page.row(-4).unwrap().name, LOCAL_NAME_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(ReadOnlyStore);
        let toasts = Arc::new(ToastLog::new());
        let mut page = UsersPage::new(
            Arc::new(FixtureSource::new()),
            OverlayStore::new(kv.clone()),
            FavoritesStore::new(kv),
            toasts.clone(),
            Arc::new(LoadingIndicator::new()),
            Box::new(DataTable::users(8)),
        );
        page.refresh().await.unwrap();

        let err = page.delete(1).await.unwrap_err();
        assert!(matches!(err, ActionError::Storage(_)));
        assert_eq!(toasts.last().unwrap().message, "Failed to save local changes");
        assert_eq!(page.rows().len(), 5);

        assert!(page.toggle_favorite(1).is_err());
        assert!(!page.row(1).unwrap().favorite);
    }

    #[tokio::test]
    async fn test_dispatch_and_render() {
        let mut h = harness().await;
        h.page.dispatch(UsersEvent::ToggleFavorite(1)).await.unwrap();
        h.page
            .dispatch(UsersEvent::Save {
                id: 2,
                form: form("<i>Ahmed</i>", "ahmed@example.com", "", "Alexandria"),
            })
            .await
            .unwrap();

        let html = h.page.render_html(0);
        assert!(html.contains("<th>Name</th>"));
        assert!(html.contains("&lt;i&gt;Ahmed&lt;/i&gt;"));
        assert!(html.contains("fa-solid fa-star"));
    }

    #[tokio::test]
    async fn test_sort_then_refresh_reloads_dataset() {
        let mut h = harness().await;
        assert!(h.page.table_mut().sort(1, false));
        assert_eq!(h.page.rows()[0].name, "Youssef Eldesouky");
        assert!(!h.page.table_mut().sort(0, true));

        h.page.refresh().await.unwrap();
        assert_eq!(h.page.rows()[0].id, 1);
        assert_eq!(h.page.table().page_count(), 1);
    }
}
