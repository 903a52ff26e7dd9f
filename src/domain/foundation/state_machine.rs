//! Table-driven lifecycle transitions.
//!
//! A status enum lists its allowed edges once in [`StateMachine::EDGES`];
//! everything else (checks, successor lists, guarded moves) is derived
//! from that table.

use std::fmt;

use thiserror::Error;

/// A move that the status table does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move from {from:?} to {to:?}")]
pub struct InvalidTransition<S: fmt::Debug> {
    pub from: S,
    pub to: S,
}

/// Status enum whose legal moves are an explicit edge list.
///
/// ```ignore
/// impl StateMachine for CompletionStatus {
///     const EDGES: &'static [(Self, Self)] = &[
///         (Incomplete, Completed),
///         (Completed, Incomplete),
///     ];
/// }
///
/// let next = status.advance(CompletionStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + Eq + fmt::Debug + 'static {
    /// Every allowed `(from, to)` pair. Self-loops are never implied.
    const EDGES: &'static [(Self, Self)];

    fn allows(self, to: Self) -> bool {
        Self::EDGES.iter().any(|&(a, b)| a == self && b == to)
    }

    fn successors(self) -> Vec<Self> {
        Self::EDGES
            .iter()
            .filter(|(from, _)| *from == self)
            .map(|&(_, to)| to)
            .collect()
    }

    /// Returns `to` if the edge exists.
    fn advance(self, to: Self) -> Result<Self, InvalidTransition<Self>> {
        if self.allows(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Shut,
        Bricked,
    }

    impl StateMachine for Door {
        const EDGES: &'static [(Self, Self)] = &[
            (Door::Open, Door::Shut),
            (Door::Shut, Door::Open),
            (Door::Shut, Door::Bricked),
        ];
    }

    #[test]
    fn advance_follows_listed_edge() {
        assert_eq!(Door::Open.advance(Door::Shut), Ok(Door::Shut));
    }

    #[test]
    fn advance_rejects_unlisted_edge() {
        let err = Door::Open.advance(Door::Bricked).unwrap_err();
        assert_eq!(err, InvalidTransition { from: Door::Open, to: Door::Bricked });
        assert_eq!(err.to_string(), "cannot move from Open to Bricked");
    }

    #[test]
    fn staying_put_is_not_a_move() {
        assert!(!Door::Shut.allows(Door::Shut));
    }

    #[test]
    fn successors_come_from_the_table() {
        assert_eq!(Door::Shut.successors(), vec![Door::Open, Door::Bricked]);
        assert!(Door::Bricked.is_terminal());
        assert!(!Door::Open.is_terminal());
    }
}
