#![forbid(unsafe_code)]

//! Per-binding propagation state machine.
//!
//! A two-way binding has two listeners: control→element and
//! element→control. Each write by one listener fires the other. The guard
//! admits one propagation at a time and drops any propagation that starts
//! while another is in progress.
//!
//! ```text
//!              to_control()               to_element()
//!   Idle ───────────────────▶ PropagatingToControl
//!    │ ▲                              │
//!    │ └──────────── done ────────────┘
//!    │
//!    └─ to_element() ─▶ PropagatingToElement ── done ──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. Only `Idle` admits a propagation.
//! 2. Every admitted propagation returns the guard to `Idle`, even if the
//!    closure unwinds.

use std::cell::Cell;

/// Current direction of a binding's in-flight propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindState {
    #[default]
    Idle,
    PropagatingToControl,
    PropagatingToElement,
}

/// Re-entrancy guard shared by both listeners of one binding.
#[derive(Debug, Default)]
pub struct BindingGuard {
    state: Cell<BindState>,
}

struct Reset<'a>(&'a Cell<BindState>);

impl Drop for Reset<'_> {
    fn drop(&mut self) {
        self.0.set(BindState::Idle);
    }
}

impl BindingGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> BindState {
        self.state.get()
    }

    /// Run an element→control update, unless a propagation is in flight.
    pub fn to_control<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.enter(BindState::PropagatingToControl, f)
    }

    /// Run a control→element update, unless a propagation is in flight.
    pub fn to_element<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.enter(BindState::PropagatingToElement, f)
    }

    fn enter<R>(&self, next: BindState, f: impl FnOnce() -> R) -> Option<R> {
        if self.state.get() != BindState::Idle {
            return None;
        }
        self.state.set(next);
        let _reset = Reset(&self.state);
        Some(f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_admits_and_returns() {
        let guard = BindingGuard::new();
        assert_eq!(guard.to_element(|| 7), Some(7));
        assert_eq!(guard.state(), BindState::Idle);
    }

    #[test]
    fn reentry_in_opposite_direction_is_suppressed() {
        let guard = BindingGuard::new();
        let inner = guard.to_element(|| {
            assert_eq!(guard.state(), BindState::PropagatingToElement);
            guard.to_control(|| "echo")
        });
        assert_eq!(inner, Some(None));
        assert_eq!(guard.state(), BindState::Idle);
    }

    #[test]
    fn reentry_in_same_direction_is_suppressed() {
        let guard = BindingGuard::new();
        let inner = guard.to_control(|| guard.to_control(|| ()));
        assert_eq!(inner, Some(None));
    }

    #[test]
    fn unwinding_restores_idle() {
        let guard = BindingGuard::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            guard.to_control(|| panic!("boom"));
        }));
        assert!(result.is_err());
        assert_eq!(guard.state(), BindState::Idle);
    }
}
