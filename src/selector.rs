//! Splitting the four players of a court into two teams.
//!
//! Four players can be split in three ways. Each split is checked against the hard relations
//! ([`check_split`]), survivors are ranked by [`split_metric`] (lower is better), and one of
//! the near-optimal ones is picked at random.

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

use crate::{
    configuration::{Configuration, MetricWeights},
    constants::AVERAGE_DIFF_WEIGHT,
    court::Court,
    matches::Match,
    player::{Hand, Position, Relation},
    roster::{PlayerIndex, Roster},
};

/// Positions of the three splits of four players.
const SPLITS: [[[usize; 2]; 2]; 3] = [[[0, 1], [2, 3]], [[0, 2], [1, 3]], [[0, 3], [1, 2]]];

/// Two teams of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Both teams.
    pub teams: [[PlayerIndex; 2]; 2],
}

impl Split {
    /// Match on `court`.
    pub fn into_match(self, court: &Court) -> Match {
        Match::new(
            self.teams.map(|team| team.to_vec()),
            court.fixed.then_some(court.index),
            court.fixed,
        )
    }
}

/// Why a split was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRejection {
    /// Mandatory partners on different teams.
    PartnersSplit,
    /// Mandatory opponents on the same team.
    OpponentsTeamed,
    /// Forbidden partners on the same team.
    ForbiddenPartners,
    /// Forbidden opponents facing each other.
    ForbiddenOpponents,
    /// A team is not mixed and is not a mandatory partnership.
    Unmixed,
}

/// The three splits of `players`.
pub fn candidate_splits(players: [PlayerIndex; 4]) -> [Split; 3] {
    SPLITS.map(|teams| Split {
        teams: teams.map(|team| team.map(|i| players[i])),
    })
}

/// Checks the hard relations, then the mix rule when `mix_rule` is set.
pub fn check_split(roster: &Roster, split: &Split, mix_rule: bool) -> Result<(), SplitRejection> {
    let [a, b] = split.teams;
    for team in [a, b] {
        let [p, q] = team;
        if roster.related(Relation::MustOppose, p, q) {
            return Err(SplitRejection::OpponentsTeamed);
        }
        if roster.related(Relation::ForbidPartner, p, q) {
            return Err(SplitRejection::ForbiddenPartners);
        }
    }
    for p in a {
        for q in b {
            if roster.related(Relation::MustPartner, p, q) {
                return Err(SplitRejection::PartnersSplit);
            }
            if roster.related(Relation::ForbidOppose, p, q) {
                return Err(SplitRejection::ForbiddenOpponents);
            }
        }
    }
    if mix_rule && unmixed_teams(roster, split) > 0 {
        return Err(SplitRejection::Unmixed);
    }
    Ok(())
}

/// Number of teams that are neither mixed nor a mandatory partnership.
fn unmixed_teams(roster: &Roster, split: &Split) -> usize {
    split
        .teams
        .iter()
        .filter(|[p, q]| {
            roster[*p].gender == roster[*q].gender && !roster.related(Relation::MustPartner, *p, *q)
        })
        .count()
}

/// Score of a split, lower is better.
///
/// ```text
/// 2|avgA - avgB| + W1 (|a1 - a2| + |b1 - b2|) + W2 #same-position teams
///     + W3 #left-left teams + W4 mix penalty
/// ```
///
/// The mix penalty only counts in mixed sessions: `0`, `W4 / 2` or `W4` for zero, one or two
/// unmixed teams.
pub fn split_metric(roster: &Roster, split: &Split, weights: &MetricWeights) -> f64 {
    let mut averages = [0.0; 2];
    let mut metric = 0.0;
    for (average, [p, q]) in averages.iter_mut().zip(split.teams) {
        let (lp, lq) = (roster.level(p), roster.level(q));
        *average = (lp + lq) / 2.0;
        metric += weights.partner_diff * (lp - lq).abs();

        let (pp, pq) = (roster[p].position, roster[q].position);
        if pp == pq && pp != Position::Either {
            metric += weights.same_position;
        }
        if roster[p].hand == Hand::Left && roster[q].hand == Hand::Left {
            metric += weights.left_left;
        }
    }
    metric += AVERAGE_DIFF_WEIGHT * (averages[0] - averages[1]).abs();

    if roster.mix_required() {
        metric += match unmixed_teams(roster, split) {
            0 => 0.0,
            1 => 0.5 * weights.gender_mix,
            _ => weights.gender_mix,
        };
    }
    metric
}

/// Picks the split of a full court.
///
/// The mix rule is a hard filter on a court of two men and two women in a mixed session.
/// Returns `None` when the court is not full or no split survives.
pub fn select_split<R: Rng + ?Sized>(
    roster: &Roster,
    court: &Court,
    config: &Configuration,
    rng: &mut R,
) -> Option<Split> {
    let players: [PlayerIndex; 4] = court.players.as_slice().try_into().ok()?;
    let splits = candidate_splits(players);
    let mix_rule = roster.mix_required() && roster.gender_count(&players) == (2, 2);

    let checked = splits.map(|split| (split, check_split(roster, &split, mix_rule)));
    if checked.iter().all(|(_, result)| result.is_err()) {
        debug!(court = court.index, rejections = ?checked.map(|(_, result)| result.err()));
        return None;
    }

    let scored = checked
        .iter()
        .filter(|(_, result)| result.is_ok())
        .map(|(split, _)| (*split, split_metric(roster, split, &config.weights)))
        .collect::<Vec<_>>();
    trace!(court = court.index, ?scored);

    let best = scored
        .iter()
        .map(|(_, metric)| *metric)
        .fold(f64::INFINITY, f64::min);
    let near_optimal = scored
        .iter()
        .filter(|(_, metric)| *metric <= best + config.epsilon)
        .map(|(split, _)| *split)
        .collect::<Vec<_>>();
    near_optimal.choose(rng).copied()
}

/// Arranges a fixed court holding one to three players into an incomplete match.
///
/// The first arrangement (teams of at most two, first player on the first team) that breaks no
/// hard relation wins. Returns `None` for an empty or full court, or when no arrangement works.
pub fn partial_match(roster: &Roster, court: &Court) -> Option<Match> {
    let players = &court.players;
    let n = players.len();
    if n == 0 || n >= 4 {
        return None;
    }
    // bit i set: players[i] on the second team; players[0] always on the first
    (0u32..1 << n)
        .filter(|mask| mask & 1 == 0)
        .filter(|mask| {
            let second = mask.count_ones() as usize;
            second <= 2 && n - second <= 2
        })
        .map(|mask| {
            let mut teams = [vec![], vec![]];
            for (i, &p) in players.iter().enumerate() {
                teams[(mask >> i & 1) as usize].push(p);
            }
            teams
        })
        .find(|teams| arrangement_valid(roster, teams))
        .map(|teams| Match::new(teams, Some(court.index), true))
}

fn arrangement_valid(roster: &Roster, teams: &[Vec<PlayerIndex>; 2]) -> bool {
    let teammates = |p: PlayerIndex, q: PlayerIndex| {
        teams
            .iter()
            .any(|team| team.contains(&p) && team.contains(&q))
    };
    let all = teams.iter().flatten().copied().collect::<Vec<_>>();
    all.iter().enumerate().all(|(i, &p)| {
        all[i + 1..].iter().all(|&q| {
            let together = teammates(p, q);
            !(roster.related(Relation::MustPartner, p, q) && !together
                || roster.related(Relation::MustOppose, p, q) && together
                || roster.related(Relation::ForbidPartner, p, q) && together
                || roster.related(Relation::ForbidOppose, p, q) && !together)
        })
    })
}

/// True if the team is one man and one woman.
pub fn is_mixed(roster: &Roster, team: &[PlayerIndex]) -> bool {
    roster.gender_count(team) == (1, 1)
}
