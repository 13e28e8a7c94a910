//! Turn gates decide whether the next turn may run.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Queried once at the start of every turn.
///
/// Implementations may consume state when answering, e.g. a step credit.
pub trait TurnGate: Send + Sync {
    fn is_open(&self) -> bool;
}

/// Always open.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenGate;

impl TurnGate for OpenGate {
    fn is_open(&self) -> bool {
        true
    }
}

/// Pause / single-step gate for interactive debugging.
///
/// While paused, each [`DebugGate::step`] lets exactly one more turn through.
#[derive(Debug, Default)]
pub struct DebugGate {
    paused: AtomicBool,
    credits: AtomicU64,
}

impl DebugGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn paused() -> Self {
        let gate = Self::new();
        gate.pause();
        gate
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resumes and drops any unused step credits.
    pub fn resume(&self) {
        self.credits.store(0, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn step(&self) {
        self.credits.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn pending_steps(&self) -> u64 {
        self.credits.load(Ordering::SeqCst)
    }
}

impl TurnGate for DebugGate {
    fn is_open(&self) -> bool {
        if !self.is_paused() {
            return true;
        }
        self.credits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1))
            .is_ok()
    }
}
