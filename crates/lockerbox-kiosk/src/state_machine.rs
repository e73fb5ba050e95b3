//! Kiosk session state machine.
//!
//! This module tracks which phase of a session the kiosk is in and enforces
//! the legal transitions between phases. It holds no session data; that lives
//! in [`SessionState`](crate::session::SessionState).
//!
//! # States
//!
//! - `Idle`: Waiting for the first key press
//! - `AwaitingCode`: Collecting a tracking code or owner password
//! - `DepositFlow`: Courier photographed, door unlocked, waiting for the parcel
//! - `PickupFlow`: Owner opened the box, waiting for the door to close
//! - `Finalizing`: Session succeeded, confirmation shown, effects queued
//!
//! # Valid Transitions
//!
//! - Idle → AwaitingCode → DepositFlow/PickupFlow → Finalizing → Idle
//! - AwaitingCode → Idle (rejected code or keypad timeout)
//! - DepositFlow → Idle (no parcel detected)
//! - any → Idle via [`StateMachine::reset`] (peripheral error)
//!
//! # Examples
//!
//! ```
//! use lockerbox_kiosk::{KioskState, StateMachine};
//! use std::time::Instant;
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), KioskState::Idle);
//!
//! machine.transition_to(KioskState::AwaitingCode, Instant::now()).unwrap();
//! assert!(machine.transition_to(KioskState::Finalizing, Instant::now()).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use lockerbox_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A full deposit is four transitions, so this covers the last ~16 sessions.
const MAX_HISTORY_SIZE: usize = 64;

/// Phases of a kiosk session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KioskState {
    /// Waiting for the first key press.
    Idle,

    /// Collecting keypad characters until four are buffered.
    AwaitingCode,

    /// Tracking code matched an open item; the courier is depositing it.
    DepositFlow,

    /// Owner password matched; the owner is emptying the box.
    PickupFlow,

    /// Session complete; confirmation shown and mutations queued.
    Finalizing,
}

impl fmt::Display for KioskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            KioskState::Idle => "Idle",
            KioskState::AwaitingCode => "AwaitingCode",
            KioskState::DepositFlow => "DepositFlow",
            KioskState::PickupFlow => "PickupFlow",
            KioskState::Finalizing => "Finalizing",
        };
        write!(f, "{}", state_str)
    }
}

impl KioskState {
    /// Check if transition to target state is valid from this state.
    ///
    /// Forced resets to `Idle` bypass this check.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockerbox_kiosk::KioskState;
    ///
    /// assert!(KioskState::Idle.can_transition_to(&KioskState::AwaitingCode));
    /// assert!(!KioskState::Idle.can_transition_to(&KioskState::DepositFlow));
    /// assert!(!KioskState::PickupFlow.can_transition_to(&KioskState::Idle));
    /// ```
    pub fn can_transition_to(&self, target: &KioskState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (KioskState::Idle, KioskState::AwaitingCode)
            // From AwaitingCode
            | (KioskState::AwaitingCode, KioskState::DepositFlow | KioskState::PickupFlow | KioskState::Idle)
            // From DepositFlow
            | (KioskState::DepositFlow, KioskState::Finalizing | KioskState::Idle)
            // From PickupFlow
            | (KioskState::PickupFlow, KioskState::Finalizing)
            // From Finalizing
            | (KioskState::Finalizing, KioskState::Idle)
        )
    }

    /// Whether the door may be unlocked in this state.
    pub fn is_door_session(&self) -> bool {
        matches!(self, KioskState::DepositFlow | KioskState::PickupFlow)
    }
}

/// Represents a single state transition with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: KioskState,

    /// The state transitioned to.
    pub to: KioskState,

    /// Clock reading when the transition occurred.
    pub at: Instant,

    /// `true` when the transition was a forced reset.
    pub forced: bool,
}

/// State machine for the kiosk session flow.
///
/// Time is supplied by the caller so the controller's injected clock governs
/// every timestamp.
#[derive(Debug)]
pub struct StateMachine {
    /// Current state of the kiosk.
    current_state: KioskState,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: KioskState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> KioskState {
        self.current_state
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the transition is not legal
    /// from the current state. The machine is left unchanged.
    pub fn transition_to(&mut self, new_state: KioskState, now: Instant) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition {
            from: self.current_state,
            to: new_state,
            at: now,
            forced: false,
        };
        self.perform_state_change(transition.clone());
        Ok(transition)
    }

    /// Force the machine back to Idle regardless of current state.
    ///
    /// Used when a peripheral fails mid-session.
    pub fn reset(&mut self, now: Instant) -> StateTransition {
        let transition = StateTransition {
            from: self.current_state,
            to: KioskState::Idle,
            at: now,
            forced: true,
        };
        self.perform_state_change(transition.clone());
        transition
    }

    fn perform_state_change(&mut self, transition: StateTransition) {
        self.current_state = transition.to;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALL: [KioskState; 5] = [
        KioskState::Idle,
        KioskState::AwaitingCode,
        KioskState::DepositFlow,
        KioskState::PickupFlow,
        KioskState::Finalizing,
    ];

    #[test]
    fn test_new_machine_starts_idle() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), KioskState::Idle);
        assert!(machine.history().is_empty());
    }

    #[rstest]
    #[case(KioskState::Idle, KioskState::AwaitingCode)]
    #[case(KioskState::AwaitingCode, KioskState::DepositFlow)]
    #[case(KioskState::AwaitingCode, KioskState::PickupFlow)]
    #[case(KioskState::AwaitingCode, KioskState::Idle)]
    #[case(KioskState::DepositFlow, KioskState::Finalizing)]
    #[case(KioskState::DepositFlow, KioskState::Idle)]
    #[case(KioskState::PickupFlow, KioskState::Finalizing)]
    #[case(KioskState::Finalizing, KioskState::Idle)]
    fn test_valid_transitions(#[case] from: KioskState, #[case] to: KioskState) {
        assert!(from.can_transition_to(&to));
    }

    #[test]
    fn test_transition_count() {
        let valid = ALL
            .iter()
            .flat_map(|from| ALL.iter().map(move |to| (from, to)))
            .filter(|(from, to)| from.can_transition_to(to))
            .count();
        assert_eq!(valid, 8);
    }

    #[test]
    fn test_no_self_transitions() {
        for state in ALL {
            assert!(!state.can_transition_to(&state), "{state} -> {state}");
        }
    }

    #[test]
    fn test_full_deposit_flow() {
        let start = Instant::now();
        let mut machine = StateMachine::new();

        for state in [
            KioskState::AwaitingCode,
            KioskState::DepositFlow,
            KioskState::Finalizing,
            KioskState::Idle,
        ] {
            machine.transition_to(state, start).unwrap();
        }

        assert_eq!(machine.history().len(), 4);
        assert!(machine.history().iter().all(|t| !t.forced));
    }

    #[test]
    fn test_invalid_transition_leaves_state() {
        let now = Instant::now();
        let mut machine = StateMachine::new();

        let err = machine.transition_to(KioskState::Finalizing, now).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition { .. }));
        assert_eq!(machine.current_state(), KioskState::Idle);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_reset_from_pickup() {
        let now = Instant::now();
        let mut machine = StateMachine::new();
        machine.transition_to(KioskState::AwaitingCode, now).unwrap();
        machine.transition_to(KioskState::PickupFlow, now).unwrap();

        let transition = machine.reset(now);
        assert_eq!(transition.from, KioskState::PickupFlow);
        assert!(transition.forced);
        assert_eq!(machine.current_state(), KioskState::Idle);
    }

    #[test]
    fn test_history_is_bounded() {
        let now = Instant::now();
        let mut machine = StateMachine::new();

        for _ in 0..MAX_HISTORY_SIZE {
            machine.transition_to(KioskState::AwaitingCode, now).unwrap();
            machine.transition_to(KioskState::Idle, now).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        let back = machine.history().back().unwrap();
        assert_eq!(back.from, KioskState::AwaitingCode);
        assert_eq!(back.to, KioskState::Idle);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&KioskState::AwaitingCode).unwrap();
        assert_eq!(json, "\"awaiting_code\"");
    }
}
