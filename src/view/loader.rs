//! Loading indicator
//!
//! Pages wrap every fetch in a [`LoaderGuard`], so the indicator is hidden
//! again on every exit path, including early error returns.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Show/hide collaborator for the loading indicator
pub trait Loader: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Loading indicator state
#[derive(Debug, Default)]
pub struct LoadingIndicator {
    visible: AtomicBool,
    shown: AtomicUsize,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// How many times the indicator has been shown
    pub fn times_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

impl Loader for LoadingIndicator {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.visible.store(true, Ordering::SeqCst);
        tracing::trace!("Loader shown");
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
        tracing::trace!("Loader hidden");
    }
}

/// Shows the loader on creation and hides it on drop
pub struct LoaderGuard {
    loader: Arc<dyn Loader>,
}

impl LoaderGuard {
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        loader.show();
        Self { loader }
    }
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.loader.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_hides_on_drop() {
        let indicator = Arc::new(LoadingIndicator::new());

        {
            let _guard = LoaderGuard::new(indicator.clone());
            assert!(indicator.is_visible());
        }

        assert!(!indicator.is_visible());
        assert_eq!(indicator.times_shown(), 1);
    }

    #[test]
    fn test_guard_hides_on_early_return() {
        fn failing(loader: Arc<dyn Loader>) -> Result<(), &'static str> {
            let _guard = LoaderGuard::new(loader);
            Err("fetch failed")
        }

        let indicator = Arc::new(LoadingIndicator::new());
        assert!(failing(indicator.clone()).is_err());
        assert!(!indicator.is_visible());
    }
}
