//! Player records as supplied by the caller.
//!
//! A [`PlayerRecord`] is loose on purpose: every attribute except the id and the name is
//! optional, and relation lists may be one-sided or reference unknown ids. The
//! [`normalizer`](crate::normalizer) turns a list of records into a validated
//! [`Roster`](crate::roster::Roster).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-provided player identifier.
pub type PlayerId = u32;

/// Gender, only used for the mixed-team preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Default when unspecified.
    #[default]
    Male,
    /// Female.
    Female,
}

/// Dominant hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Right hand.
    #[default]
    Right,
    /// Left hand.
    Left,
}

/// Preferred side of the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Left side.
    Left,
    /// Right side.
    Right,
    /// No preference. Never clashes with a teammate.
    #[default]
    Either,
}

/// The four relation kinds a player can declare towards another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// Must be teammates.
    MustPartner,
    /// Must be on opposite teams of the same match.
    MustOppose,
    /// Must not be teammates.
    ForbidPartner,
    /// Must not be on opposite teams of the same match.
    ForbidOppose,
}

impl Relation {
    /// All relations, in declaration order.
    pub const ALL: [Relation; 4] = [
        Relation::MustPartner,
        Relation::MustOppose,
        Relation::ForbidPartner,
        Relation::ForbidOppose,
    ];

    /// True for the two mandatory relations.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Relation::MustPartner | Relation::MustOppose)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::MustPartner => "must partner",
            Relation::MustOppose => "must oppose",
            Relation::ForbidPartner => "forbid partner",
            Relation::ForbidOppose => "forbid oppose",
        };
        f.write_str(s)
    }
}

/// Raw player record.
///
/// Missing attributes get defaults during normalization: level `0`, gender male, right hand,
/// position "either", no fixed court. A fixed court of `0` also means "none".
///
/// # Examples
///
/// ```
/// use court_pairing::player::{Gender, PlayerRecord};
///
/// let ana = PlayerRecord::new(1, "Ana")
///     .with_level(4.5)
///     .with_gender(Gender::Female)
///     .with_must_partner([2]);
/// assert_eq!(ana.must_partner, vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Unique id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Skill level, non-negative.
    #[serde(default)]
    pub level: Option<f64>,
    /// Defaults to male.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Defaults to right.
    #[serde(default)]
    pub hand: Option<Hand>,
    /// Defaults to either.
    #[serde(default)]
    pub position: Option<Position>,
    /// 1-based court this player must play on.
    #[serde(default)]
    pub fixed_court: Option<usize>,
    /// At most one id.
    #[serde(default)]
    pub must_partner: Vec<PlayerId>,
    /// At most two ids.
    #[serde(default)]
    pub must_oppose: Vec<PlayerId>,
    /// Players this one must not be teamed with.
    #[serde(default)]
    pub forbid_partner: Vec<PlayerId>,
    /// Players this one must not face.
    #[serde(default)]
    pub forbid_oppose: Vec<PlayerId>,
}

impl PlayerRecord {
    /// A record with only an id and a name; everything else takes its default.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: None,
            gender: None,
            hand: None,
            position: None,
            fixed_court: None,
            must_partner: vec![],
            must_oppose: vec![],
            forbid_partner: vec![],
            forbid_oppose: vec![],
        }
    }

    /// Sets `level`.
    #[must_use]
    pub fn with_level(self, level: f64) -> Self {
        Self {
            level: Some(level),
            ..self
        }
    }

    /// Sets `gender`.
    #[must_use]
    pub fn with_gender(self, gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..self
        }
    }

    /// Sets `hand`.
    #[must_use]
    pub fn with_hand(self, hand: Hand) -> Self {
        Self {
            hand: Some(hand),
            ..self
        }
    }

    /// Sets `position`.
    #[must_use]
    pub fn with_position(self, position: Position) -> Self {
        Self {
            position: Some(position),
            ..self
        }
    }

    /// Sets `fixed_court`.
    #[must_use]
    pub fn with_fixed_court(self, court: usize) -> Self {
        Self {
            fixed_court: Some(court),
            ..self
        }
    }

    /// Sets `must_partner`.
    #[must_use]
    pub fn with_must_partner(self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            must_partner: ids.into_iter().collect(),
            ..self
        }
    }

    /// Sets `must_oppose`.
    #[must_use]
    pub fn with_must_oppose(self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            must_oppose: ids.into_iter().collect(),
            ..self
        }
    }

    /// Sets `forbid_partner`.
    #[must_use]
    pub fn with_forbid_partner(self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            forbid_partner: ids.into_iter().collect(),
            ..self
        }
    }

    /// Sets `forbid_oppose`.
    #[must_use]
    pub fn with_forbid_oppose(self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            forbid_oppose: ids.into_iter().collect(),
            ..self
        }
    }

    /// Ids listed under `relation`.
    pub fn relation(&self, relation: Relation) -> &[PlayerId] {
        match relation {
            Relation::MustPartner => &self.must_partner,
            Relation::MustOppose => &self.must_oppose,
            Relation::ForbidPartner => &self.forbid_partner,
            Relation::ForbidOppose => &self.forbid_oppose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{"id": 7, "name": "Leo", "level": 3.5, "hand": "left", "forbid_oppose": [2]}"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.level, Some(3.5));
        assert_eq!(record.hand, Some(Hand::Left));
        assert_eq!(record.gender, None);
        assert!(record.must_partner.is_empty());
        assert_eq!(record.relation(Relation::ForbidOppose), &[2]);
    }

    #[test]
    fn builder_chain() {
        let record = PlayerRecord::new(1, "Ana")
            .with_position(Position::Left)
            .with_fixed_court(2)
            .with_must_oppose([3, 4]);
        assert_eq!(record.position, Some(Position::Left));
        assert_eq!(record.fixed_court, Some(2));
        assert_eq!(record.relation(Relation::MustOppose), &[3, 4]);
    }

    #[test]
    fn mandatory_relations() {
        assert!(Relation::MustPartner.is_mandatory());
        assert!(!Relation::ForbidOppose.is_mandatory());
    }
}
