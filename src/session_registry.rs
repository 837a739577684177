//! Per-session mutual exclusion for hosts serving many conversations.
//!
//! Each live session gets its own lock, so turns of one session are
//! serialized while different sessions run in parallel. The registry-wide
//! map lock is only held to look up, insert or remove a handle, never across
//! a turn or a store read. Store loads are serialized with `close_session`
//! and `evict` by a separate attach lock so a stale copy cannot be reloaded
//! while a session is being dropped.
//!
//! A handle removed from the map is marked detached. A turn that was already
//! running on a closed session finishes but is not written back; callers
//! waiting on an evicted handle retry against a fresh load.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use uuid::Uuid;

use crate::models::{ConversationState, UserProfile};
use crate::pipeline::intake::{DialogueOrchestrator, IntakeError, SessionStore, TurnResult};

struct LiveSession {
    state: Mutex<ConversationState>,
    /// Set once the handle has left the map. Writes to the store happen
    /// under this lock.
    detached: Mutex<bool>,
}

impl LiveSession {
    fn new(state: ConversationState) -> Self {
        Self {
            state: Mutex::new(state),
            detached: Mutex::new(false),
        }
    }

    fn lock_state(&self, id: &str) -> Result<MutexGuard<'_, ConversationState>, IntakeError> {
        self.state
            .lock()
            .map_err(|_| IntakeError::LockPoisoned(id.to_string()))
    }

    fn lock_detached(&self, id: &str) -> Result<MutexGuard<'_, bool>, IntakeError> {
        self.detached
            .lock()
            .map_err(|_| IntakeError::LockPoisoned(id.to_string()))
    }
}

type SessionHandle = Arc<LiveSession>;

pub struct SessionRegistry {
    store: Box<dyn SessionStore>,
    orchestrator: DialogueOrchestrator,
    live: Mutex<HashMap<String, SessionHandle>>,
    attach: Mutex<()>,
}

impl SessionRegistry {
    pub fn new(store: Box<dyn SessionStore>, orchestrator: DialogueOrchestrator) -> Self {
        Self {
            store,
            orchestrator,
            live: Mutex::new(HashMap::new()),
            attach: Mutex::new(()),
        }
    }

    // ── Lifecycle ────────────────────────────────────────

    /// Start a fresh session for `profile` and return its id.
    pub fn create_session(&self, profile: UserProfile) -> Result<String, IntakeError> {
        let id = Uuid::new_v4().to_string();
        let state = ConversationState::with_profile(profile);
        self.store.save(&id, &state)?;
        self.live_map()?
            .insert(id.clone(), Arc::new(LiveSession::new(state)));
        tracing::info!(session_id = %id, "Intake session created");
        Ok(id)
    }

    /// Run one user turn against session `id`.
    ///
    /// A failed store write is logged and the turn result is still returned;
    /// the in-memory state keeps the turn and the next successful write
    /// persists it. Callers must not retry a turn that returned `Ok`.
    pub fn run_turn(&self, id: &str, user_text: &str) -> Result<TurnResult, IntakeError> {
        self.with_session(id, |handle, state| {
            let result = self.orchestrator.run_turn(state, user_text);
            match self.persist(id, handle, state) {
                Ok(true) => Ok(result),
                Ok(false) => Err(IntakeError::SessionNotFound(id.to_string())),
                Err(e) => {
                    tracing::error!(
                        session_id = %id,
                        error = %e,
                        "Session write failed, turn kept in memory"
                    );
                    Ok(result)
                }
            }
        })
    }

    /// Clear history and classification, keep the profile.
    pub fn reset_session(&self, id: &str) -> Result<(), IntakeError> {
        self.with_session(id, |handle, state| {
            state.reset();
            if !self.persist(id, handle, state)? {
                return Err(IntakeError::SessionNotFound(id.to_string()));
            }
            tracing::info!(session_id = %id, "Intake session reset");
            Ok(())
        })
    }

    /// Drop the session from memory and from the store. A turn still running
    /// on it completes without writing the session back.
    pub fn close_session(&self, id: &str) -> Result<bool, IntakeError> {
        let _attach = self.attach_guard()?;
        let handle = self.live_map()?.remove(id);
        let _detached = match &handle {
            Some(live) => {
                let mut detached = live.lock_detached(id)?;
                *detached = true;
                Some(detached)
            }
            None => None,
        };
        let was_stored = self.store.delete(id)?;
        tracing::info!(session_id = %id, "Intake session closed");
        Ok(handle.is_some() || was_stored)
    }

    /// Drop the in-memory copy of an idle session, keeping the stored one.
    /// Returns false when the session is not live or a turn is running.
    pub fn evict(&self, id: &str) -> Result<bool, IntakeError> {
        let _attach = self.attach_guard()?;
        let Some(handle) = self.live_map()?.get(id).cloned() else {
            return Ok(false);
        };
        let state = match handle.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::WouldBlock) => return Ok(false),
            Err(TryLockError::Poisoned(_)) => {
                return Err(IntakeError::LockPoisoned(id.to_string()))
            }
        };

        // Flush first: an earlier write may have failed.
        let mut detached = handle.lock_detached(id)?;
        self.store.save(id, &state)?;
        *detached = true;
        self.live_map()?.remove(id);
        tracing::debug!(session_id = %id, "Session evicted from memory");
        Ok(true)
    }

    /// Evict every idle session. Returns how many were dropped.
    pub fn clear(&self) -> Result<usize, IntakeError> {
        let ids: Vec<String> = self.live_map()?.keys().cloned().collect();
        let mut evicted = 0;
        for id in ids {
            if self.evict(&id)? {
                evicted += 1;
            }
        }
        Ok(evicted)
    }

    // ── Queries ──────────────────────────────────────────

    /// Copy of the session's current state.
    pub fn snapshot(&self, id: &str) -> Result<ConversationState, IntakeError> {
        self.with_session(id, |_, state| Ok(state.clone()))
    }

    /// Number of sessions currently held in memory.
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|m| m.len()).unwrap_or(0)
    }

    // ── Internals ────────────────────────────────────────

    fn live_map(&self) -> Result<MutexGuard<'_, HashMap<String, SessionHandle>>, IntakeError> {
        self.live
            .lock()
            .map_err(|_| IntakeError::LockPoisoned("session registry".to_string()))
    }

    fn attach_guard(&self) -> Result<MutexGuard<'_, ()>, IntakeError> {
        self.attach
            .lock()
            .map_err(|_| IntakeError::LockPoisoned("session attach".to_string()))
    }

    /// Run `f` with the session locked, retrying if the handle was detached
    /// while waiting for the lock.
    fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&LiveSession, &mut ConversationState) -> Result<R, IntakeError>,
    ) -> Result<R, IntakeError> {
        loop {
            let handle = self.handle(id)?;
            let mut state = handle.lock_state(id)?;
            if *handle.lock_detached(id)? {
                continue;
            }
            return f(&*handle, &mut *state);
        }
    }

    /// Write `state` unless the handle was detached. Returns whether it was
    /// written.
    fn persist(
        &self,
        id: &str,
        handle: &LiveSession,
        state: &ConversationState,
    ) -> Result<bool, IntakeError> {
        let detached = handle.lock_detached(id)?;
        if *detached {
            tracing::debug!(session_id = %id, "Session closed mid-turn, not saved");
            return Ok(false);
        }
        self.store.save(id, state)?;
        Ok(true)
    }

    /// Live handle for `id`, loading it from the store on first use.
    fn handle(&self, id: &str) -> Result<SessionHandle, IntakeError> {
        if let Some(handle) = self.live_map()?.get(id) {
            return Ok(Arc::clone(handle));
        }

        let _attach = self.attach_guard()?;
        if let Some(handle) = self.live_map()?.get(id) {
            return Ok(Arc::clone(handle));
        }

        let state = self
            .store
            .load(id)?
            .ok_or_else(|| IntakeError::SessionNotFound(id.to_string()))?;
        let handle = Arc::clone(
            self.live_map()?
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(LiveSession::new(state))),
        );
        tracing::debug!(session_id = %id, "Session loaded from store");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::pipeline::intake::fallback::{FallbackResponder, FixedPicker};
    use crate::pipeline::intake::{
        ExtractionRequest, ExtractionResult, InMemorySessionStore, NarrativeExtractionService,
    };

    /// Extraction that takes long enough for another thread to interleave.
    struct SlowService(Duration);

    impl NarrativeExtractionService for SlowService {
        fn extract(&self, _request: &ExtractionRequest) -> Result<ExtractionResult, IntakeError> {
            thread::sleep(self.0);
            Ok(ExtractionResult::new("Noted."))
        }
    }

    fn slow_registry() -> Arc<SessionRegistry> {
        Arc::new(SessionRegistry::new(
            Box::new(InMemorySessionStore::new()),
            DialogueOrchestrator::new(Box::new(SlowService(Duration::from_millis(300)))),
        ))
    }

    /// In-memory store whose writes can be switched off.
    struct FlakyStore {
        inner: InMemorySessionStore,
        failing: Arc<AtomicBool>,
    }

    impl SessionStore for FlakyStore {
        fn load(&self, id: &str) -> Result<Option<ConversationState>, IntakeError> {
            self.inner.load(id)
        }

        fn save(&self, id: &str, state: &ConversationState) -> Result<(), IntakeError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(IntakeError::Io(std::io::Error::other("disk full")));
            }
            self.inner.save(id, state)
        }

        fn delete(&self, id: &str) -> Result<bool, IntakeError> {
            self.inner.delete(id)
        }

        fn list_ids(&self) -> Result<Vec<String>, IntakeError> {
            self.inner.list_ids()
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            Box::new(InMemorySessionStore::new()),
            DialogueOrchestrator::without_service()
                .with_fallback(FallbackResponder::new(Box::new(FixedPicker(0)))),
        )
    }

    #[test]
    fn turns_are_recorded_and_persisted() {
        let registry = registry();
        let id = registry.create_session(UserProfile::named("Sam")).unwrap();

        let result = registry.run_turn(&id, "hello").unwrap();
        assert!(result.reply.is_some());

        let state = registry.snapshot(&id).unwrap();
        assert_eq!(state.profile.name, "Sam");
        assert_eq!(state.turns.len(), 2);
        assert_eq!(registry.store.load(&id).unwrap(), Some(state));
    }

    #[test]
    fn unknown_session_is_an_error() {
        let registry = registry();
        assert!(matches!(
            registry.run_turn("nope", "hi"),
            Err(IntakeError::SessionNotFound(_))
        ));
    }

    #[test]
    fn stored_session_is_loaded_on_demand() {
        let store = InMemorySessionStore::new();
        let mut state = ConversationState::new();
        state.add_user_turn("from yesterday");
        store.save("old", &state).unwrap();

        let registry = SessionRegistry::new(Box::new(store), DialogueOrchestrator::without_service());
        assert_eq!(registry.live_count(), 0);
        registry.run_turn("old", "back again").unwrap();
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.snapshot("old").unwrap().user_turn_count(), 2);
    }

    #[test]
    fn reset_keeps_profile() {
        let registry = registry();
        let id = registry.create_session(UserProfile::named("Ana")).unwrap();
        registry.run_turn(&id, "hi").unwrap();
        registry.reset_session(&id).unwrap();
        let state = registry.snapshot(&id).unwrap();
        assert!(state.turns.is_empty());
        assert_eq!(state.profile.name, "Ana");
    }

    #[test]
    fn close_removes_everywhere() {
        let registry = registry();
        let id = registry.create_session(UserProfile::default()).unwrap();
        assert!(registry.close_session(&id).unwrap());
        assert!(!registry.close_session(&id).unwrap());
        assert!(registry.snapshot(&id).is_err());
    }

    #[test]
    fn concurrent_turns_on_one_session_are_serialized() {
        let registry = Arc::new(registry());
        let id = registry.create_session(UserProfile::default()).unwrap();

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                thread::spawn(move || registry.run_turn(&id, &format!("message {i}")).unwrap())
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let state = registry.snapshot(&id).unwrap();
        assert_eq!(state.user_turn_count(), 8);
    }

    #[test]
    fn closing_during_a_turn_does_not_write_the_session_back() {
        let registry = slow_registry();
        let id = registry.create_session(UserProfile::default()).unwrap();

        let worker = {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            thread::spawn(move || registry.run_turn(&id, "I feel stressed"))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(registry.close_session(&id).unwrap());

        let outcome = worker.join().unwrap();
        assert!(matches!(outcome, Err(IntakeError::SessionNotFound(_))));
        assert!(registry.store.load(&id).unwrap().is_none());
        assert_eq!(registry.live_count(), 0);
        assert!(registry.snapshot(&id).is_err());
    }

    #[test]
    fn evict_keeps_the_stored_copy() {
        let registry = registry();
        let id = registry.create_session(UserProfile::named("Lee")).unwrap();
        registry.run_turn(&id, "hello").unwrap();

        assert!(registry.evict(&id).unwrap());
        assert_eq!(registry.live_count(), 0);
        assert!(registry.store.load(&id).unwrap().is_some());

        let state = registry.snapshot(&id).unwrap();
        assert_eq!(state.profile.name, "Lee");
        assert_eq!(state.turns.len(), 2);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn evict_unknown_session_is_a_no_op() {
        let registry = registry();
        assert!(!registry.evict("nope").unwrap());
    }

    #[test]
    fn evict_skips_a_session_mid_turn() {
        let registry = slow_registry();
        let id = registry.create_session(UserProfile::default()).unwrap();

        let worker = {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            thread::spawn(move || registry.run_turn(&id, "hello"))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!registry.evict(&id).unwrap());

        assert!(worker.join().unwrap().is_ok());
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.store.load(&id).unwrap().unwrap().turns.len(), 2);
    }

    #[test]
    fn clear_drops_every_idle_session() {
        let registry = registry();
        let ids: Vec<String> = (0..3)
            .map(|_| registry.create_session(UserProfile::default()).unwrap())
            .collect();

        assert_eq!(registry.clear().unwrap(), 3);
        assert_eq!(registry.live_count(), 0);
        for id in &ids {
            assert!(registry.store.load(id).unwrap().is_some());
        }
    }

    #[test]
    fn failed_write_still_returns_the_turn() {
        let failing = Arc::new(AtomicBool::new(false));
        let registry = SessionRegistry::new(
            Box::new(FlakyStore {
                inner: InMemorySessionStore::new(),
                failing: Arc::clone(&failing),
            }),
            DialogueOrchestrator::without_service()
                .with_fallback(FallbackResponder::new(Box::new(FixedPicker(0)))),
        );
        let id = registry.create_session(UserProfile::default()).unwrap();

        failing.store(true, Ordering::SeqCst);
        let result = registry.run_turn(&id, "hello").unwrap();
        assert!(result.reply.is_some());
        assert_eq!(registry.snapshot(&id).unwrap().turns.len(), 2);
        assert!(registry.store.load(&id).unwrap().unwrap().turns.is_empty());

        // Eviction refuses to drop unsaved turns while writes fail.
        assert!(registry.evict(&id).is_err());
        assert_eq!(registry.live_count(), 1);

        failing.store(false, Ordering::SeqCst);
        registry.run_turn(&id, "still here").unwrap();
        assert_eq!(registry.store.load(&id).unwrap().unwrap().turns.len(), 4);
    }
}
