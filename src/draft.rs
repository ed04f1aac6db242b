//! Pairing the players left over by the per-court selection.
//!
//! Leftover players are first grouped into teams of two, then teams are drafted against each
//! other by level: the strongest remaining team picks the closest-level rival it may face.

use std::collections::BTreeSet;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, instrument};

use crate::{
    matches::Match,
    player::{Gender, Hand, Position, Relation},
    roster::{PlayerIndex, Roster},
};

/// Output of [`draft_pairs`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftOutcome {
    /// New matches, not yet numbered.
    pub matches: Vec<Match>,
    /// Players of teams that found no rival, and players that found no teammate.
    pub leftover: Vec<PlayerIndex>,
}

/// Groups `free` players into teams of two.
///
/// 1. mandatory partnerships;
/// 2. with exact gender balance, shuffled men take the first compatible shuffled woman;
/// 3. everyone else, strongest first, with the next player they may team up with.
///
/// Returns the teams and the players left without a teammate.
pub fn form_teams<R: Rng + ?Sized>(
    roster: &Roster,
    free: &[PlayerIndex],
    rng: &mut R,
) -> (Vec<[PlayerIndex; 2]>, Vec<PlayerIndex>) {
    let mut remaining = free.iter().copied().collect::<BTreeSet<_>>();
    let mut teams = vec![];

    for &p in free {
        if !remaining.contains(&p) {
            continue;
        }
        let partner = roster[p]
            .relation(Relation::MustPartner)
            .iter()
            .copied()
            .find(|q| remaining.contains(q));
        if let Some(q) = partner {
            remaining.remove(&p);
            remaining.remove(&q);
            teams.push([p, q]);
        }
    }

    if roster.exact_balance() {
        let (mut men, mut women): (Vec<_>, Vec<_>) = remaining
            .iter()
            .copied()
            .partition(|&p| roster[p].gender == Gender::Male);
        men.shuffle(rng);
        women.shuffle(rng);
        for man in men {
            if let Some(i) = women.iter().position(|&w| mixed_compatible(roster, man, w)) {
                let woman = women.remove(i);
                remaining.remove(&man);
                remaining.remove(&woman);
                teams.push([man, woman]);
            }
        }
    }

    let mut rest = remaining.into_iter().collect::<Vec<_>>();
    rest.sort_by(|&a, &b| roster.level(b).total_cmp(&roster.level(a)));
    let mut singles = vec![];
    while !rest.is_empty() {
        let p = rest.remove(0);
        let teammate = rest.iter().position(|&q| {
            !roster.related(Relation::ForbidPartner, p, q)
                && !roster.related(Relation::MustOppose, p, q)
        });
        match teammate {
            Some(i) => teams.push([p, rest.remove(i)]),
            None => singles.push(p),
        }
    }
    (teams, singles)
}

/// May `a` and `b` form a man and woman team: not forbidden partners, not two left-handers and
/// not the same explicit position.
fn mixed_compatible(roster: &Roster, a: PlayerIndex, b: PlayerIndex) -> bool {
    let (pa, pb) = (&roster[a], &roster[b]);
    !roster.related(Relation::ForbidPartner, a, b)
        && !(pa.hand == Hand::Left && pb.hand == Hand::Left)
        && !(pa.position == pb.position && pa.position != Position::Either)
}

fn team_sum(roster: &Roster, team: &[PlayerIndex; 2]) -> f64 {
    team.iter().map(|&p| roster.level(p)).sum()
}

/// Forms teams from `free_players`, then drafts them against each other.
///
/// Teams are taken by descending level sum. Each one, as base, faces the unused team with the
/// closest sum among those it may face (no forbidden-opponent relation between any two
/// members); the first one found wins ties. A base without a rival, and a final lone team, go
/// to the leftover list.
#[instrument(skip_all, fields(free = free_players.len()))]
pub fn draft_pairs<R: Rng + ?Sized>(
    roster: &Roster,
    free_players: &[PlayerIndex],
    rng: &mut R,
) -> DraftOutcome {
    let (mut teams, singles) = form_teams(roster, free_players, rng);
    let mut outcome = DraftOutcome {
        leftover: singles,
        ..Default::default()
    };

    teams.sort_by(|a, b| team_sum(roster, b).total_cmp(&team_sum(roster, a)));
    let mut used = vec![false; teams.len()];

    for base in 0..teams.len() {
        if used[base] {
            continue;
        }
        used[base] = true;
        let base_sum = team_sum(roster, &teams[base]);

        let mut rival: Option<(usize, f64)> = None;
        for (j, team) in teams.iter().enumerate() {
            if used[j] || !may_face(roster, &teams[base], team) {
                continue;
            }
            let diff = (base_sum - team_sum(roster, team)).abs();
            if rival.map_or(true, |(_, best)| diff < best) {
                rival = Some((j, diff));
            }
        }

        match rival {
            Some((j, _)) => {
                used[j] = true;
                outcome.matches.push(Match::new(
                    [teams[base].to_vec(), teams[j].to_vec()],
                    None,
                    false,
                ));
            }
            None => outcome.leftover.extend(teams[base]),
        }
    }

    debug!(
        matches = outcome.matches.len(),
        leftover = outcome.leftover.len()
    );
    outcome
}

fn may_face(roster: &Roster, a: &[PlayerIndex; 2], b: &[PlayerIndex; 2]) -> bool {
    a.iter().all(|&p| {
        b.iter()
            .all(|&q| !roster.related(Relation::ForbidOppose, p, q))
    })
}
