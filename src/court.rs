//! Seating clusters and single players on courts.

use std::collections::BTreeSet;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, instrument, trace};

use crate::{
    cluster::Cluster,
    combinations::combinations,
    constants::{COURT_CAPACITY, RANGE_PENALTY, SCORE_TIE_EPSILON},
    error::PairingError,
    report::Diagnostics,
    roster::{PlayerIndex, Roster},
};

/// One court and the players seated on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Court {
    /// 1-based index.
    pub index: usize,
    /// Seated players, at most [`COURT_CAPACITY`].
    pub players: Vec<PlayerIndex>,
    /// Holds players with a fixed court.
    pub fixed: bool,
}

impl Court {
    /// An empty court.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            players: Vec::with_capacity(COURT_CAPACITY),
            fixed: false,
        }
    }

    /// Seats left.
    pub fn free_seats(&self) -> usize {
        COURT_CAPACITY.saturating_sub(self.players.len())
    }

    /// All seats taken.
    pub fn is_full(&self) -> bool {
        self.players.len() == COURT_CAPACITY
    }
}

/// Output of [`populate_courts`].
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Courts `1..=N`, in order.
    pub courts: Vec<Court>,
    /// Players that fit nowhere.
    pub unplaced: Vec<PlayerIndex>,
}

/// Seats every player.
///
/// 1. Fixed clusters go to their court.
/// 2. Other clusters go to the first court with room, preferring one where no member has a veto
///    relation with an occupant.
/// 3. Fixed courts still short of players are completed from the unclustered pool with the
///    best scoring subset (see [`fill_score`]).
/// 4. Remaining unclustered players are seated one by one like clusters, on courts that are
///    not fixed.
///
/// # Errors
/// [`PairingError::CourtOverflow`] when fixed clusters need more seats than a court has.
#[instrument(skip_all, fields(clusters = clusters.len()))]
pub fn populate_courts<R: Rng + ?Sized>(
    roster: &Roster,
    clusters: &[Cluster],
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Result<Population, PairingError> {
    let mut courts = (1..=roster.num_courts()).map(Court::new).collect::<Vec<_>>();
    let mut unplaced = vec![];

    for cluster in clusters {
        let Some(index) = cluster.fixed_court else {
            continue;
        };
        let court = &mut courts[index - 1];
        if court.free_seats() < cluster.members.len() {
            return Err(PairingError::CourtOverflow { court: index });
        }
        court.players.extend(&cluster.members);
        court.fixed = true;
    }

    for cluster in clusters.iter().filter(|c| c.fixed_court.is_none()) {
        if !seat_first_fit(roster, &mut courts, &cluster.members, false) {
            diagnostics.warn(format!(
                "no court has room for the group {}",
                roster.names(&cluster.members)
            ));
            unplaced.extend(&cluster.members);
        }
    }

    let clustered = clusters
        .iter()
        .flat_map(|c| c.members.iter().copied())
        .collect::<BTreeSet<_>>();
    let mut pool = roster
        .indices()
        .filter(|p| !clustered.contains(p))
        .collect::<Vec<_>>();

    for court in courts.iter_mut().filter(|c| c.fixed && !c.is_full()) {
        let k = court.free_seats().min(pool.len());
        if k == 0 {
            continue;
        }
        match best_fill(roster, court, &pool, k, rng) {
            Some(chosen) => {
                trace!(court = court.index, ?chosen, "completed fixed court");
                pool.retain(|p| !chosen.contains(p));
                court.players.extend(chosen);
            }
            None => diagnostics.warn(format!(
                "court {} could not be completed without breaking a forbidden relation",
                court.index
            )),
        }
    }

    for p in pool {
        if !seat_first_fit(roster, &mut courts, &[p], true) {
            diagnostics.warn(format!("no court has room for {}", roster.name(p)));
            unplaced.push(p);
        }
    }

    debug!(
        seated = roster.len() - unplaced.len(),
        unplaced = unplaced.len()
    );
    Ok(Population { courts, unplaced })
}

/// Score of a court holding `players`: level sum minus a penalty on the level range.
pub fn fill_score(roster: &Roster, players: &[PlayerIndex]) -> f64 {
    let levels = players.iter().map(|&p| roster.level(p));
    let (sum, min, max) = levels.fold(
        (0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), level| (sum + level, min.min(level), max.max(level)),
    );
    if players.is_empty() {
        0.0
    } else {
        sum - RANGE_PENALTY * (max - min)
    }
}

/// Seats `members` on the first court with room, preferring courts without a veto partner.
/// With `skip_fixed`, fixed courts are never chosen.
fn seat_first_fit(
    roster: &Roster,
    courts: &mut [Court],
    members: &[PlayerIndex],
    skip_fixed: bool,
) -> bool {
    let vetoed = |court: &Court| {
        members
            .iter()
            .any(|&p| court.players.iter().any(|&q| roster.is_veto_pair(p, q)))
    };
    let fits = |court: &Court| court.free_seats() >= members.len() && !(skip_fixed && court.fixed);
    let target = courts
        .iter()
        .position(|c| fits(c) && !vetoed(c))
        .or_else(|| courts.iter().position(fits));
    match target {
        Some(i) => {
            courts[i].players.extend(members);
            true
        }
        None => false,
    }
}

/// Candidates within [`SCORE_TIE_EPSILON`] of the best score seen so far.
struct Best {
    score: f64,
    ties: Vec<Vec<PlayerIndex>>,
}

impl Best {
    fn new() -> Self {
        Self {
            score: f64::NEG_INFINITY,
            ties: vec![],
        }
    }

    fn offer(&mut self, score: f64, candidate: &[PlayerIndex]) {
        if score > self.score + SCORE_TIE_EPSILON {
            self.score = score;
            self.ties.clear();
            self.ties.push(candidate.to_vec());
        } else if (score - self.score).abs() <= SCORE_TIE_EPSILON {
            self.ties.push(candidate.to_vec());
        }
    }
}

fn best_fill<R: Rng + ?Sized>(
    roster: &Roster,
    court: &Court,
    pool: &[PlayerIndex],
    k: usize,
    rng: &mut R,
) -> Option<Vec<PlayerIndex>> {
    let want_balance = roster.exact_balance() && court.players.len() + k == COURT_CAPACITY;
    let mut balanced = Best::new();
    let mut any = Best::new();
    let mut seated = court.players.clone();

    for candidate in combinations(pool, k) {
        let clash = candidate.iter().enumerate().any(|(i, &p)| {
            roster.has_forbidden_with(p, &court.players)
                || roster.has_forbidden_with(p, &candidate[i + 1..])
        });
        if clash {
            continue;
        }
        seated.truncate(court.players.len());
        seated.extend(&candidate);
        let score = fill_score(roster, &seated);
        if want_balance && roster.gender_count(&seated) == (2, 2) {
            balanced.offer(score, &candidate);
        }
        any.offer(score, &candidate);
    }

    let best = if balanced.ties.is_empty() {
        any
    } else {
        balanced
    };
    best.ties.choose(rng).cloned()
}
