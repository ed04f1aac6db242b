//! Normalized player table.
//!
//! Every phase after normalization works on [`PlayerIndex`] values pointing into an immutable
//! [`Roster`]. Courts, teams and matches only ever hold indices, so moving a player around is
//! a matter of exchanging two integers.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    ops::Index,
};

use crate::player::{Gender, Hand, PlayerId, Position, Relation};

/// Stable position of a player in the [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerIndex(pub(crate) usize);

impl PlayerIndex {
    /// Raw index into the roster.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A player with every default filled in and symmetric relation sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Caller id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Skill level.
    pub level: f64,
    /// Gender.
    pub gender: Gender,
    /// Dominant hand.
    pub hand: Hand,
    /// Preferred side.
    pub position: Position,
    /// 1-based court, after propagation along mandatory relations.
    pub fixed_court: Option<usize>,
    pub(crate) must_partner: BTreeSet<PlayerIndex>,
    pub(crate) must_oppose: BTreeSet<PlayerIndex>,
    pub(crate) forbid_partner: BTreeSet<PlayerIndex>,
    pub(crate) forbid_oppose: BTreeSet<PlayerIndex>,
}

impl Player {
    /// Players linked to this one by `relation`.
    pub fn relation(&self, relation: Relation) -> &BTreeSet<PlayerIndex> {
        match relation {
            Relation::MustPartner => &self.must_partner,
            Relation::MustOppose => &self.must_oppose,
            Relation::ForbidPartner => &self.forbid_partner,
            Relation::ForbidOppose => &self.forbid_oppose,
        }
    }

    pub(crate) fn relation_mut(&mut self, relation: Relation) -> &mut BTreeSet<PlayerIndex> {
        match relation {
            Relation::MustPartner => &mut self.must_partner,
            Relation::MustOppose => &mut self.must_oppose,
            Relation::ForbidPartner => &mut self.forbid_partner,
            Relation::ForbidOppose => &mut self.forbid_oppose,
        }
    }

    /// Mandatory partners and opponents together.
    pub fn mandatory(&self) -> impl Iterator<Item = PlayerIndex> + '_ {
        self.must_partner
            .iter()
            .chain(self.must_oppose.iter())
            .copied()
    }

    /// True if the player may neither team up with nor face `other`.
    pub fn vetoes(&self, other: PlayerIndex) -> bool {
        self.forbid_partner.contains(&other) && self.forbid_oppose.contains(&other)
    }
}

/// The validated player table of one pairing run, plus the pool flags derived from it.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    by_id: HashMap<PlayerId, PlayerIndex>,
    num_courts: usize,
    mix_required: bool,
    exact_balance: bool,
}

impl Roster {
    pub(crate) fn new(
        players: Vec<Player>,
        by_id: HashMap<PlayerId, PlayerIndex>,
        num_courts: usize,
        mix_required: bool,
        exact_balance: bool,
    ) -> Self {
        Self {
            players,
            by_id,
            num_courts,
            mix_required,
            exact_balance,
        }
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when the roster holds no player.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of courts available this run.
    pub fn num_courts(&self) -> usize {
        self.num_courts
    }

    /// Teams should mix genders (mixed pool).
    pub fn mix_required(&self) -> bool {
        self.mix_required
    }

    /// Mixed pool with exactly as many men as women.
    pub fn exact_balance(&self) -> bool {
        self.exact_balance
    }

    /// Index of the player with caller id `id`.
    pub fn index_of(&self, id: PlayerId) -> Option<PlayerIndex> {
        self.by_id.get(&id).copied()
    }

    /// All indices, in roster order.
    pub fn indices(&self) -> impl Iterator<Item = PlayerIndex> {
        (0..self.players.len()).map(PlayerIndex)
    }

    /// Players with their index, in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerIndex, &Player)> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, p)| (PlayerIndex(i), p))
    }

    /// Level of `p`.
    pub fn level(&self, p: PlayerIndex) -> f64 {
        self[p].level
    }

    /// Name of `p`.
    pub fn name(&self, p: PlayerIndex) -> &str {
        &self[p].name
    }

    /// Names of `players`, comma separated.
    pub fn names(&self, players: &[PlayerIndex]) -> String {
        players
            .iter()
            .map(|&p| self.name(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True if `a` lists `b` under `relation` (relations are symmetric).
    pub fn related(&self, relation: Relation, a: PlayerIndex, b: PlayerIndex) -> bool {
        self[a].relation(relation).contains(&b)
    }

    /// True if `a` and `b` are both forbidden partners and forbidden opponents.
    pub fn is_veto_pair(&self, a: PlayerIndex, b: PlayerIndex) -> bool {
        self[a].vetoes(b)
    }

    /// True if any of `candidates` has a forbidden relation (partner or opponent) with `p`.
    pub fn has_forbidden_with(&self, p: PlayerIndex, candidates: &[PlayerIndex]) -> bool {
        candidates.iter().any(|&q| {
            self.related(Relation::ForbidPartner, p, q) || self.related(Relation::ForbidOppose, p, q)
        })
    }

    /// Every unordered pair linked by `relation`, each reported once with the lower index first.
    pub fn pairs(&self, relation: Relation) -> Vec<(PlayerIndex, PlayerIndex)> {
        self.iter()
            .flat_map(|(a, player)| {
                player
                    .relation(relation)
                    .iter()
                    .filter(move |&&b| a < b)
                    .map(move |&b| (a, b))
            })
            .collect()
    }

    /// Every unordered veto pair, lower index first.
    pub fn veto_pairs(&self) -> Vec<(PlayerIndex, PlayerIndex)> {
        self.pairs(Relation::ForbidPartner)
            .into_iter()
            .filter(|&(a, b)| self.is_veto_pair(a, b))
            .collect()
    }

    /// Number of men and women among `players`.
    pub fn gender_count(&self, players: &[PlayerIndex]) -> (usize, usize) {
        let men = players
            .iter()
            .filter(|&&p| self[p].gender == Gender::Male)
            .count();
        (men, players.len() - men)
    }
}

impl Index<PlayerIndex> for Roster {
    type Output = Player;

    fn index(&self, index: PlayerIndex) -> &Player {
        &self.players[index.0]
    }
}
