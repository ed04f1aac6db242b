//! Fatal errors of a pairing run.
//!
//! Anything in here aborts the run before a single match is built. Conditions that only
//! leave some players without a match (no room, no valid split, no rival team) are not
//! errors: they end up in the report's unplaced list and warnings.

use thiserror::Error;

use crate::player::{PlayerId, Relation};

/// Broad family of a [`PairingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad cardinalities, contradictory relations, out-of-range values.
    Validation,
    /// Irreconcilable fixed-court assignments inside a forced group.
    Conflict,
    /// A forced group or a fixed court holds more players than a court can seat.
    Capacity,
}

/// Fatal error returned instead of a report.
///
/// Variants are self-describing through their `Display` message.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairingError {
    #[error("at least one court is required")]
    NoCourts,

    #[error("player id {id} appears more than once in the roster")]
    DuplicatePlayer { id: PlayerId },

    #[error("unknown player id {id}")]
    UnknownPlayer { id: PlayerId },

    #[error("{player} has an invalid level ({level})")]
    InvalidLevel { player: String, level: f64 },

    #[error("{player} is fixed to court {court}, but only {num_courts} court(s) exist")]
    CourtOutOfRange {
        player: String,
        court: usize,
        num_courts: usize,
    },

    #[error("result for court {court} is out of range (1..={num_courts})")]
    ResultCourtOutOfRange { court: usize, num_courts: usize },

    #[error("{player} has {count} '{relation}' entries (at most {max} allowed)")]
    TooManyRelations {
        player: String,
        relation: Relation,
        count: usize,
        max: usize,
    },

    #[error("{player} lists {other} both as '{first}' and '{second}'")]
    ContradictoryRelations {
        player: String,
        other: String,
        first: Relation,
        second: Relation,
    },

    #[error("{first} (court {first_court}) and {second} (court {second_court}) must share a court")]
    FixedCourtConflict {
        first: String,
        first_court: usize,
        second: String,
        second_court: usize,
    },

    #[error("forced group [{members}] has {size} players, a court seats 4")]
    ClusterTooLarge { members: String, size: usize },

    #[error("too many players fixed to court {court}")]
    CourtOverflow { court: usize },
}

impl PairingError {
    /// Family of the error, for callers that only care about the category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PairingError::FixedCourtConflict { .. } => ErrorKind::Conflict,
            PairingError::ClusterTooLarge { .. } | PairingError::CourtOverflow { .. } => {
                ErrorKind::Capacity
            }
            _ => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(PairingError::NoCourts.kind(), ErrorKind::Validation);
        assert_eq!(
            PairingError::CourtOverflow { court: 2 }.kind(),
            ErrorKind::Capacity
        );
        let conflict = PairingError::FixedCourtConflict {
            first: "Ana".into(),
            first_court: 1,
            second: "Bea".into(),
            second_court: 3,
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(
            conflict.to_string(),
            "Ana (court 1) and Bea (court 3) must share a court"
        );
    }

    #[test]
    fn relation_in_message() {
        let err = PairingError::TooManyRelations {
            player: "Ana".into(),
            relation: Relation::MustPartner,
            count: 2,
            max: 1,
        };
        assert_eq!(
            err.to_string(),
            "Ana has 2 'must partner' entries (at most 1 allowed)"
        );
    }
}
