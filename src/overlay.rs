use std::cell::RefCell;
use std::rc::Rc;

/// The style value that suppresses background scrolling while held.
const LOCKED: &str = "hidden";

#[derive(Debug, Default)]
struct LockState {
    /// Current scroll-affordance style of the page (`overflow` on body).
    style: String,
    /// Value observed when the first guard was taken; restored when the
    /// last one is released.
    saved: Option<String>,
    holds: u32,
}

/// The page-wide scroll-lock, modeled as a counted shared resource. The
/// style is only ever mutated through acquire/release pairs, so one
/// opener's close can never clobber another's lock, and the value saved
/// before the first acquire is restored exactly after the last release.
#[derive(Clone, Debug, Default)]
pub struct ScrollLockHost {
    inner: Rc<RefCell<LockState>>,
}

impl ScrollLockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or overwrite the page's style out-of-band (the embedding layer
    /// owns the actual DOM write; this mirror is what gets saved/restored).
    pub fn set_style(&self, style: impl Into<String>) {
        self.inner.borrow_mut().style = style.into();
    }

    pub fn style(&self) -> String {
        self.inner.borrow().style.clone()
    }

    pub fn is_locked(&self) -> bool {
        self.inner.borrow().holds > 0
    }

    /// Take a hold on the lock. The first hold saves the prior style and
    /// flips it to the locked value; release happens when the returned
    /// guard drops, on every exit path including abrupt teardown.
    pub fn acquire(&self) -> ScrollLockGuard {
        let mut state = self.inner.borrow_mut();
        if state.holds == 0 {
            state.saved = Some(std::mem::replace(&mut state.style, LOCKED.to_string()));
            tracing::debug!("scroll-lock acquired");
        }
        state.holds += 1;
        ScrollLockGuard {
            inner: Rc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    inner: Rc<RefCell<LockState>>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.holds -= 1;
        if state.holds == 0 {
            state.style = state.saved.take().unwrap_or_default();
            tracing::debug!("scroll-lock released");
        }
    }
}

/// Mount/unmount lifecycle for a full-viewport layer. While open it holds a
/// scroll-lock guard; explicit close, backdrop dismissal and teardown all
/// funnel through dropping that guard, so the background scroll state after
/// any close path equals the state before the matching open.
#[derive(Debug)]
pub struct OverlayController {
    host: ScrollLockHost,
    guard: Option<ScrollLockGuard>,
}

impl OverlayController {
    pub fn new(host: ScrollLockHost) -> Self {
        Self { host, guard: None }
    }

    pub fn open(&mut self) {
        if self.guard.is_none() {
            self.guard = Some(self.host.acquire());
        }
    }

    pub fn close(&mut self) {
        self.guard = None;
    }

    /// Backdrop interaction dismisses the overlay the same way `close` does.
    pub fn backdrop_dismiss(&mut self) {
        self.close();
    }

    pub fn is_open(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_round_trips_the_style() {
        let host = ScrollLockHost::new();
        host.set_style("auto");
        let mut overlay = OverlayController::new(host.clone());

        overlay.open();
        assert_eq!(host.style(), "hidden");
        overlay.close();
        assert_eq!(host.style(), "auto");
    }

    #[test]
    fn drop_while_open_releases() {
        let host = ScrollLockHost::new();
        host.set_style("scroll");
        {
            let mut overlay = OverlayController::new(host.clone());
            overlay.open();
            assert!(host.is_locked());
        }
        assert!(!host.is_locked());
        assert_eq!(host.style(), "scroll");
    }

    #[test]
    fn empty_prior_style_restores_to_empty() {
        let host = ScrollLockHost::new();
        let mut overlay = OverlayController::new(host.clone());
        overlay.open();
        overlay.close();
        assert_eq!(host.style(), "");
    }

    #[test]
    fn double_open_and_double_close_are_idempotent() {
        let host = ScrollLockHost::new();
        host.set_style("auto");
        let mut overlay = OverlayController::new(host.clone());
        overlay.open();
        overlay.open();
        overlay.close();
        overlay.close();
        assert_eq!(host.style(), "auto");
        assert!(!host.is_locked());
    }

    #[test]
    fn concurrent_openers_do_not_clobber_each_other() {
        let host = ScrollLockHost::new();
        host.set_style("auto");
        let mut a = OverlayController::new(host.clone());
        let mut b = OverlayController::new(host.clone());

        a.open();
        b.open();
        a.close();
        // b still holds the lock
        assert_eq!(host.style(), "hidden");
        b.close();
        assert_eq!(host.style(), "auto");
    }

    #[test]
    fn backdrop_dismiss_is_a_close_path() {
        let host = ScrollLockHost::new();
        host.set_style("auto");
        let mut overlay = OverlayController::new(host.clone());
        overlay.open();
        overlay.backdrop_dismiss();
        assert_eq!(host.style(), "auto");
    }
}
