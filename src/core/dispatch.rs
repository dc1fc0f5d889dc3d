//! # Dispatcher
//!
//! Glue between a transport and the navigator: load the session's view, apply
//! the action, store the new view, hand back the render.
//!
//! Each session gets its own async mutex, so actions for one reader run one
//! at a time while different readers proceed in parallel. The only shared
//! data is the read-only content store inside the navigator.
//!
//! A session's mutex lives in the map only while someone holds or awaits it.
//! The last holder out removes it, so `end` can never strand a waiter on a
//! mutex that a newcomer no longer sees, and idle sessions cost nothing.
//!
//! Storage failures are logged, never shown: the reader still gets the page
//! they asked for, the step just isn't remembered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::core::action::Action;
use crate::core::navigator::{Navigator, Transition};
use crate::core::session::SessionStore;
use crate::core::state::SessionView;

type LockMap = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

pub struct Dispatcher {
    navigator: Navigator,
    sessions: Arc<dyn SessionStore>,
    locks: LockMap,
}

/// Exclusive access to one session for the duration of an action.
struct SessionTurn<'a> {
    locks: &'a LockMap,
    session_id: &'a str,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionTurn<'_> {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        let lock = Arc::clone(OwnedMutexGuard::mutex(&guard));
        drop(guard);

        // Clones are only handed out under the map lock, so while we hold it
        // a count of 2 (map + `lock`) means nobody else is waiting
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let ours = locks
            .get(self.session_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &lock));
        if ours && Arc::strong_count(&lock) == 2 {
            locks.remove(self.session_id);
        }
    }
}

impl Dispatcher {
    pub fn new(navigator: Navigator, sessions: Arc<dyn SessionStore>) -> Self {
        info!("Dispatcher using {} session store", sessions.name());
        Self {
            navigator,
            sessions,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// First contact: the session starts on the root menu.
    pub async fn start(&self, session_id: &str) -> Transition {
        let _turn = self.turn(session_id).await;

        let transition = self.navigator.show(&SessionView::List);
        self.store_view(session_id, &transition.view).await;
        transition
    }

    /// Re-render wherever the session was left, or start fresh if unknown.
    pub async fn resume(&self, session_id: &str) -> Transition {
        let _turn = self.turn(session_id).await;

        let view = self.load_view(session_id).await.unwrap_or_default();
        let transition = self.navigator.show(&view);
        self.store_view(session_id, &transition.view).await;
        transition
    }

    /// Apply `action` to the session.
    pub async fn dispatch(&self, session_id: &str, action: &Action) -> Transition {
        let _turn = self.turn(session_id).await;

        // A missing session behaves like the root menu, so bio navigation on
        // it lands in the stale-session recovery path
        let view = self.load_view(session_id).await.unwrap_or_default();
        let transition = self.navigator.handle(&view, action);
        self.store_view(session_id, &transition.view).await;
        transition
    }

    /// Decode a button identifier and apply it to the session.
    pub async fn dispatch_callback(&self, session_id: &str, data: &str) -> Transition {
        match Action::decode(data) {
            Ok(action) => self.dispatch(session_id, &action).await,
            Err(e) => {
                let _turn = self.turn(session_id).await;

                let view = self.load_view(session_id).await.unwrap_or_default();
                let transition = self.navigator.handle_callback(&view, data);
                debug!("Session {session_id}: rejected callback ({e})");
                self.store_view(session_id, &transition.view).await;
                transition
            }
        }
    }

    /// Drop everything known about the session.
    pub async fn end(&self, session_id: &str) {
        let _turn = self.turn(session_id).await;
        if let Err(e) = self.sessions.remove(session_id).await {
            warn!("Failed to remove session {session_id}: {e}");
        }
        debug!("Session ended: {session_id}");
    }

    /// Wait until no other action is running for `session_id`.
    async fn turn<'a>(&'a self, session_id: &'a str) -> SessionTurn<'a> {
        let lock = {
            // A poisoned map still holds valid locks
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        SessionTurn {
            locks: &self.locks,
            session_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn tracked_sessions(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn load_view(&self, session_id: &str) -> Option<SessionView> {
        match self.sessions.load(session_id).await {
            Ok(view) => view,
            Err(e) => {
                warn!("Failed to load session {session_id}, starting over: {e}");
                None
            }
        }
    }

    async fn store_view(&self, session_id: &str, view: &SessionView) {
        if let Err(e) = self.sessions.save(session_id, view).await {
            warn!("Failed to save session {session_id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Direction;
    use crate::core::navigator::NavError;
    use crate::core::session::{MemorySessionStore, SessionError};
    use crate::test_support::test_navigator;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(test_navigator(40), Arc::new(MemorySessionStore::new()))
    }

    /// Memory store whose loads take a while and record how many overlap.
    #[derive(Default)]
    struct SlowStore {
        inner: MemorySessionStore,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for SlowStore {
        fn name(&self) -> &str {
            "slow"
        }

        async fn load(&self, id: &str) -> Result<Option<SessionView>, SessionError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(80)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.inner.load(id).await
        }

        async fn save(&self, id: &str, view: &SessionView) -> Result<(), SessionError> {
            self.inner.save(id, view).await
        }

        async fn remove(&self, id: &str) -> Result<(), SessionError> {
            self.inner.remove(id).await
        }
    }

    #[tokio::test]
    async fn test_start_lands_on_list() {
        let d = dispatcher();
        let t = d.start("s1").await;
        assert_eq!(t.view, SessionView::List);
    }

    #[tokio::test]
    async fn test_dispatch_remembers_view() {
        let d = dispatcher();
        d.start("s1").await;
        d.dispatch("s1", &Action::OpenThinker("kant".into())).await;
        let t = d.dispatch("s1", &Action::NavBio(Direction::Next)).await;
        assert_eq!(
            t.view,
            SessionView::Bio {
                thinker_key: "kant".into(),
                page_index: 1
            }
        );

        let t = d.resume("s1").await;
        assert_eq!(
            t.view,
            SessionView::Bio {
                thinker_key: "kant".into(),
                page_index: 1
            }
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let d = dispatcher();
        d.dispatch("a", &Action::OpenThinker("kant".into())).await;
        d.dispatch("b", &Action::OpenAbout).await;

        let a = d.dispatch("a", &Action::NavBio(Direction::Next)).await;
        assert!(a.error.is_none());
        let b = d.dispatch("b", &Action::NavBio(Direction::Next)).await;
        assert_eq!(b.error, Some(NavError::StaleOrMissingSession));
    }

    #[tokio::test]
    async fn test_unknown_session_nav_is_stale() {
        let d = dispatcher();
        let t = d.dispatch("never-seen", &Action::NavBio(Direction::Prev)).await;
        assert_eq!(t.view, SessionView::List);
        assert_eq!(t.error, Some(NavError::StaleOrMissingSession));
    }

    #[tokio::test]
    async fn test_end_forgets_session() {
        let d = dispatcher();
        d.dispatch("s1", &Action::OpenThinker("kant".into())).await;
        d.end("s1").await;
        let t = d.dispatch("s1", &Action::NavBio(Direction::Next)).await;
        assert_eq!(t.error, Some(NavError::StaleOrMissingSession));
    }

    #[tokio::test]
    async fn test_end_does_not_let_actions_overlap() {
        let store = Arc::new(SlowStore::default());
        let d = Arc::new(Dispatcher::new(test_navigator(40), store.clone()));
        let pause = || tokio::time::sleep(Duration::from_millis(15));

        let spawn_open = |d: Arc<Dispatcher>| {
            tokio::spawn(async move { d.dispatch("s1", &Action::OpenAbout).await })
        };

        // First action holds the session while it loads; end and a second
        // action queue behind it
        let first = spawn_open(d.clone());
        pause().await;
        let ended = {
            let d = d.clone();
            tokio::spawn(async move { d.end("s1").await })
        };
        pause().await;
        let queued = spawn_open(d.clone());

        // Arrives after end has finished but while the queued action runs
        tokio::time::sleep(Duration::from_millis(120)).await;
        let late = spawn_open(d.clone());

        first.await.unwrap();
        ended.await.unwrap();
        queued.await.unwrap();
        late.await.unwrap();

        assert_eq!(store.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_idle_sessions_release_their_lock() {
        let d = dispatcher();
        d.start("a").await;
        d.dispatch("b", &Action::OpenAbout).await;
        d.dispatch_callback("c", "nonsense").await;
        assert_eq!(d.tracked_sessions(), 0);

        d.end("a").await;
        assert_eq!(d.tracked_sessions(), 0);
    }

    #[tokio::test]
    async fn test_malformed_callback_resets_to_list() {
        let d = dispatcher();
        d.dispatch_callback("s1", "thinker:kant").await;
        let t = d.dispatch_callback("s1", "thinker:").await;
        assert_eq!(t.view, SessionView::List);
        assert!(matches!(t.error, Some(NavError::MalformedAction(_))));
    }
}
