//! Posts Page
//!
//! View-model of the posts page: the merged cards, live search and lazily
//! loaded comments. Every mutating action writes the overlay first and
//! then re-runs fetch + merge + render, so the new view always reflects
//! the write.

use super::loader::{Loader, LoaderGuard};
use super::notify::Notifier;
use super::{ActionError, ActionResult};
use crate::merge::merge;
use crate::model::{Comment, EntityKind, Post, PostPatch};
use crate::overlay::OverlayStore;
use crate::source::DataSource;
use crate::storage::StorageResult;
use std::sync::Arc;

/// Author assigned to locally-created posts
pub const LOCAL_POST_AUTHOR: i64 = 1;

/// One rendered post
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    /// Cleared by search when the card does not match
    pub visible: bool,
    pub comments: CommentsPanel,
}

impl PostCard {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            visible: true,
            comments: CommentsPanel::default(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.post.title.to_lowercase().contains(needle)
            || self.post.body.to_lowercase().contains(needle)
    }
}

/// Expand/collapse state of a card's comments
#[derive(Debug, Clone, Default)]
pub struct CommentsPanel {
    loaded: Option<Vec<Comment>>,
    expanded: bool,
}

/// What the comments panel currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsView<'a> {
    Hidden,
    /// Expanded, but the post has no comments
    Empty,
    List(&'a [Comment]),
}

impl CommentsPanel {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn view(&self) -> CommentsView<'_> {
        match (&self.loaded, self.expanded) {
            (Some(comments), true) if comments.is_empty() => CommentsView::Empty,
            (Some(comments), true) => CommentsView::List(comments),
            _ => CommentsView::Hidden,
        }
    }
}

/// Values shown in the edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Interactions on the posts page
#[derive(Debug, Clone)]
pub enum PostsEvent {
    Refresh,
    Add { title: String, body: String },
    Save(PostForm),
    Delete(i64),
    Search(String),
    ToggleComments(i64),
}

/// Posts page view-model
pub struct PostsPage {
    source: Arc<dyn DataSource>,
    overlay: OverlayStore,
    notifier: Arc<dyn Notifier>,
    loader: Arc<dyn Loader>,
    cards: Vec<PostCard>,
}

impl PostsPage {
    pub fn new(
        source: Arc<dyn DataSource>,
        overlay: OverlayStore,
        notifier: Arc<dyn Notifier>,
        loader: Arc<dyn Loader>,
    ) -> Self {
        Self {
            source,
            overlay,
            notifier,
            loader,
            cards: Vec::new(),
        }
    }

    /// Cards of the last successful render
    pub fn cards(&self) -> &[PostCard] {
        &self.cards
    }

    /// Cards not hidden by the current search
    pub fn visible_cards(&self) -> impl Iterator<Item = &PostCard> {
        self.cards.iter().filter(|c| c.visible)
    }

    pub fn card(&self, id: i64) -> Option<&PostCard> {
        self.cards.iter().find(|c| c.post.id == id)
    }

    /// Markup of the posts container
    pub fn render_html(&self) -> String {
        super::html::render_posts(&self.cards)
    }

    /// Route an interaction to its handler
    pub async fn dispatch(&mut self, event: PostsEvent) -> ActionResult<()> {
        match event {
            PostsEvent::Refresh => self.refresh().await,
            PostsEvent::Add { title, body } => self.add(&title, &body).await.map(|_| ()),
            PostsEvent::Save(form) => self.save_edit(form).await,
            PostsEvent::Delete(id) => self.delete(id).await,
            PostsEvent::Search(query) => {
                self.search(&query);
                Ok(())
            }
            PostsEvent::ToggleComments(id) => self.toggle_comments(id).await.map(|_| ()),
        }
    }

    /// Fetch, merge with the overlay and re-render
    ///
    /// On failure the previous cards are kept.
    pub async fn refresh(&mut self) -> ActionResult<()> {
        let _loading = LoaderGuard::new(self.loader.clone());

        let base = match self.source.fetch_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(source = self.source.name(), error = %e, "Failed to fetch posts");
                self.notifier.error("Failed to fetch posts");
                return Err(e.into());
            }
        };

        let patches = self.overlay.get::<PostPatch>();
        let merged = merge(base, &patches);
        tracing::debug!(posts = merged.len(), patches = patches.len(), "Rendered posts");

        self.cards = merged.into_iter().map(PostCard::new).collect();
        Ok(())
    }

    /// Create a post locally and return its synthetic id
    pub async fn add(&mut self, title: &str, body: &str) -> ActionResult<i64> {
        let (title, body) = (title.trim(), body.trim());
        if title.is_empty() || body.is_empty() {
            return Err(self.reject("Please provide title and body"));
        }

        let id = self.persist(
            self.overlay
                .insert_local(PostPatch::local(0, LOCAL_POST_AUTHOR, title, body)),
        )?;
        self.notifier.success("Post added (local)");
        self.reload().await;
        Ok(id)
    }

    /// Current displayed values of a post, for the edit form
    pub fn open_edit(&self, id: i64) -> ActionResult<PostForm> {
        match self.card(id) {
            Some(card) => Ok(PostForm {
                id,
                title: card.post.title.clone(),
                body: card.post.body.clone(),
            }),
            None => Err(self.not_found(id)),
        }
    }

    /// Save the edit form as an overlay patch
    pub async fn save_edit(&mut self, form: PostForm) -> ActionResult<()> {
        let (title, body) = (form.title.trim(), form.body.trim());
        if title.is_empty() || body.is_empty() {
            return Err(self.reject("Please add title and body"));
        }

        self.persist(
            self.overlay
                .upsert(form.id, PostPatch::edit(form.id, title, body)),
        )?;
        self.notifier.success("Post updated (local)");
        self.reload().await;
        Ok(())
    }

    /// Soft-delete a post
    pub async fn delete(&mut self, id: i64) -> ActionResult<()> {
        self.persist(self.overlay.mark_deleted::<PostPatch>(id))?;
        self.notifier.success("Post deleted (local)");
        self.reload().await;
        Ok(())
    }

    /// Show only cards whose displayed title or body contains `query`
    ///
    /// Case-insensitive; returns the number of visible cards.
    pub fn search(&mut self, query: &str) -> usize {
        let needle = query.trim().to_lowercase();
        let mut visible = 0;
        for card in &mut self.cards {
            card.visible = card.matches(&needle);
            if card.visible {
                visible += 1;
            }
        }
        visible
    }

    /// Expand or collapse the comments of a post
    ///
    /// The first expansion fetches; later toggles reuse what was fetched.
    /// Returns whether the panel is now expanded.
    pub async fn toggle_comments(&mut self, id: i64) -> ActionResult<bool> {
        let Some(idx) = self.cards.iter().position(|c| c.post.id == id) else {
            return Err(self.not_found(id));
        };

        let panel = &self.cards[idx].comments;
        if panel.expanded || panel.loaded.is_some() {
            let panel = &mut self.cards[idx].comments;
            panel.expanded = !panel.expanded;
            return Ok(panel.expanded);
        }

        let comments = {
            let _loading = LoaderGuard::new(self.loader.clone());
            match self.source.fetch_comments(id).await {
                Ok(comments) => comments,
                Err(e) => {
                    tracing::error!(post_id = id, error = %e, "Failed to fetch comments");
                    self.notifier.error("Failed to fetch comments");
                    return Err(e.into());
                }
            }
        };

        let panel = &mut self.cards[idx].comments;
        panel.loaded = Some(comments);
        panel.expanded = true;
        Ok(true)
    }

    async fn reload(&mut self) {
        // failures are already logged and notified by refresh
        let _ = self.refresh().await;
    }

    fn reject(&self, message: &str) -> ActionError {
        self.notifier.error(message);
        ActionError::Validation(message.to_string())
    }

    fn not_found(&self, id: i64) -> ActionError {
        self.notifier.error("Post not found");
        ActionError::NotFound {
            kind: EntityKind::Posts,
            id,
        }
    }

    fn persist<T>(&self, result: StorageResult<T>) -> ActionResult<T> {
        result.map_err(|e| {
            tracing::error!(error = %e, "Failed to save local posts");
            self.notifier.error("Failed to save local changes");
            ActionError::Storage(e)
        })
    }
}
