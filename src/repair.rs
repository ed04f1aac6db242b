//! Post-hoc local search over the built matches.
//!
//! Selection and draft only see one court or one pool at a time, so a mandatory relation between
//! players seated on different courts can still be broken afterwards. This phase tries bounded
//! exchanges of players (or whole teams) between matches to fix them, then spreads veto pairs
//! to courts an odd distance apart.
//!
//! Every exchange is applied speculatively and kept only if the violations reported by
//! [`find_violations`] afterwards are a strict subset of those before: something gets fixed and
//! nothing new breaks. Players with a fixed court never leave their
//! match. Whatever cannot be fixed is returned and ends up in the report.

use tracing::{debug, instrument, trace};

use crate::{
    configuration::Configuration,
    matches::{seat_of, Match, Seat},
    player::Relation,
    roster::{PlayerIndex, Roster},
};

/// A relation the current matches break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Mandatory partners are not teammates.
    PartnersApart(PlayerIndex, PlayerIndex),
    /// Mandatory opponents do not face each other.
    OpponentsNotFacing(PlayerIndex, PlayerIndex),
    /// Forbidden partners are teammates.
    ForbiddenPartners(PlayerIndex, PlayerIndex),
    /// Forbidden opponents face each other.
    ForbiddenOpponents(PlayerIndex, PlayerIndex),
    /// A veto pair plays on the same court or an even number of courts apart.
    VetoDistance {
        /// The pair.
        players: (PlayerIndex, PlayerIndex),
        /// Their courts.
        courts: (usize, usize),
    },
}

impl ConstraintViolation {
    /// Human-readable description.
    pub fn describe(&self, roster: &Roster) -> String {
        match *self {
            ConstraintViolation::PartnersApart(a, b) => format!(
                "{} and {} must play together but do not",
                roster.name(a),
                roster.name(b)
            ),
            ConstraintViolation::OpponentsNotFacing(a, b) => format!(
                "{} and {} must play against each other but do not",
                roster.name(a),
                roster.name(b)
            ),
            ConstraintViolation::ForbiddenPartners(a, b) => format!(
                "{} and {} must not play together but do",
                roster.name(a),
                roster.name(b)
            ),
            ConstraintViolation::ForbiddenOpponents(a, b) => format!(
                "{} and {} must not play against each other but do",
                roster.name(a),
                roster.name(b)
            ),
            ConstraintViolation::VetoDistance {
                players: (a, b),
                courts: (ca, cb),
            } => format!(
                "{} (court {ca}) and {} (court {cb}) must be an odd number of courts apart",
                roster.name(a),
                roster.name(b)
            ),
        }
    }

    fn is_veto(&self) -> bool {
        matches!(self, ConstraintViolation::VetoDistance { .. })
    }

    /// Same relation broken by the same players. A veto pair is the same breach on any courts.
    fn same_breach(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ConstraintViolation::VetoDistance { players: a, .. },
                ConstraintViolation::VetoDistance { players: b, .. },
            ) => a == b,
            _ => self == other,
        }
    }
}

/// Same court or an even gap.
fn forbidden_distance(a: usize, b: usize) -> bool {
    a.abs_diff(b) % 2 == 0
}

/// Every broken relation among seated players.
///
/// Pairs where a player sits in no match are ignored. Veto distances only count for matches
/// that already have a court.
pub fn find_violations(roster: &Roster, matches: &[Match]) -> Vec<ConstraintViolation> {
    let mut seats: Vec<Option<Seat>> = vec![None; roster.len()];
    for (match_index, m) in matches.iter().enumerate() {
        for (team, members) in m.teams.iter().enumerate() {
            for (slot, &p) in members.iter().enumerate() {
                seats[p.0] = Some(Seat {
                    match_index,
                    team,
                    slot,
                });
            }
        }
    }

    let mut violations = vec![];
    for relation in Relation::ALL {
        for (a, b) in roster.pairs(relation) {
            let (Some(sa), Some(sb)) = (seats[a.0], seats[b.0]) else {
                continue;
            };
            let same_match = sa.match_index == sb.match_index;
            let teammates = same_match && sa.team == sb.team;
            let facing = same_match && sa.team != sb.team;
            let violation = match relation {
                Relation::MustPartner if !teammates => ConstraintViolation::PartnersApart(a, b),
                Relation::MustOppose if !facing => ConstraintViolation::OpponentsNotFacing(a, b),
                Relation::ForbidPartner if teammates => {
                    ConstraintViolation::ForbiddenPartners(a, b)
                }
                Relation::ForbidOppose if facing => ConstraintViolation::ForbiddenOpponents(a, b),
                _ => continue,
            };
            violations.push(violation);
        }
    }

    for (a, b) in roster.veto_pairs() {
        let (Some(sa), Some(sb)) = (seats[a.0], seats[b.0]) else {
            continue;
        };
        let (Some(ca), Some(cb)) = (matches[sa.match_index].court, matches[sb.match_index].court)
        else {
            continue;
        };
        if forbidden_distance(ca, cb) {
            violations.push(ConstraintViolation::VetoDistance {
                players: (a, b),
                courts: (ca, cb),
            });
        }
    }
    violations
}

/// Numbers the matches.
///
/// Fixed matches keep their court. The others take the remaining court indices by descending
/// overall average, so the strongest match plays on the lowest free court. Matches beyond the
/// available courts are removed and returned.
pub fn assign_courts(roster: &Roster, matches: &mut Vec<Match>, num_courts: usize) -> Vec<Match> {
    let taken = matches
        .iter()
        .filter(|m| m.fixed)
        .filter_map(|m| m.court)
        .collect::<Vec<_>>();
    let mut free_courts = (1..=num_courts).filter(|c| !taken.contains(c));

    let mut order = (0..matches.len())
        .filter(|&i| !matches[i].fixed)
        .collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        matches[b]
            .overall_average(roster)
            .total_cmp(&matches[a].overall_average(roster))
    });

    let mut overflow = vec![];
    for i in order {
        matches[i].court = free_courts.next();
        if matches[i].court.is_none() {
            overflow.push(i);
        }
    }
    overflow.sort_unstable();
    let mut removed = overflow
        .into_iter()
        .rev()
        .map(|i| matches.remove(i))
        .collect::<Vec<_>>();
    removed.reverse();
    removed
}

/// A self-inverse change: applying it twice restores the matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    /// Two players exchange seats.
    Players(PlayerIndex, PlayerIndex),
    /// Two teams exchange places, `(match, team)` each.
    Teams((usize, usize), (usize, usize)),
}

/// Every breach in `after` was already in `before`.
fn no_new_breach(before: &[ConstraintViolation], after: &[ConstraintViolation]) -> bool {
    after
        .iter()
        .all(|v| before.iter().any(|old| old.same_breach(v)))
}

/// Working state of one repair run.
struct Search<'a> {
    roster: &'a Roster,
    matches: &'a mut Vec<Match>,
    tolerance: f64,
    violations: Vec<ConstraintViolation>,
}

impl Search<'_> {
    fn seat(&self, p: PlayerIndex) -> Option<Seat> {
        seat_of(&self.matches[..], p)
    }

    fn court_of(&self, p: PlayerIndex) -> Option<usize> {
        self.seat(p)
            .and_then(|seat| self.matches[seat.match_index].court)
    }

    fn is_pinned(&self, p: PlayerIndex) -> bool {
        self.roster[p].fixed_court.is_some()
    }

    fn allowed(&self, change: Change) -> bool {
        match change {
            Change::Players(a, b) => {
                let (Some(sa), Some(sb)) = (self.seat(a), self.seat(b)) else {
                    return false;
                };
                if a == b || (sa.match_index == sb.match_index && sa.team == sb.team) {
                    return false;
                }
                let crosses = sa.match_index != sb.match_index;
                (self.roster.level(a) - self.roster.level(b)).abs() <= self.tolerance
                    && !(crosses && (self.is_pinned(a) || self.is_pinned(b)))
            }
            Change::Teams((ma, ta), (mb, tb)) => {
                if ma == mb {
                    return false;
                }
                let (team_a, team_b) = (&self.matches[ma].teams[ta], &self.matches[mb].teams[tb]);
                let sum = |team: &Vec<PlayerIndex>| -> f64 {
                    team.iter().map(|&p| self.roster.level(p)).sum()
                };
                (sum(team_a) - sum(team_b)).abs() <= 2.0 * self.tolerance
                    && !team_a.iter().chain(team_b).any(|&p| self.is_pinned(p))
            }
        }
    }

    fn apply(&mut self, change: Change) {
        match change {
            Change::Players(a, b) => {
                if let (Some(sa), Some(sb)) = (self.seat(a), self.seat(b)) {
                    self.matches[sa.match_index].teams[sa.team][sa.slot] = b;
                    self.matches[sb.match_index].teams[sb.team][sb.slot] = a;
                }
            }
            Change::Teams((ma, ta), (mb, tb)) => {
                let team_a = std::mem::take(&mut self.matches[ma].teams[ta]);
                let team_b = std::mem::replace(&mut self.matches[mb].teams[tb], team_a);
                self.matches[ma].teams[ta] = team_b;
            }
        }
    }

    /// Applies `change` if allowed and if it fixes something without breaking anything new.
    fn attempt(&mut self, change: Change) -> bool {
        if !self.allowed(change) {
            return false;
        }
        self.apply(change);
        let after = find_violations(self.roster, &self.matches[..]);
        if after.len() < self.violations.len() && no_new_breach(&self.violations, &after) {
            trace!(
                ?change,
                before = self.violations.len(),
                after = after.len(),
                "kept"
            );
            self.violations = after;
            true
        } else {
            self.apply(change);
            false
        }
    }

    /// Tries every change in order, stops at the first kept one.
    fn attempt_any(&mut self, changes: impl IntoIterator<Item = Change>) -> bool {
        changes.into_iter().any(|change| self.attempt(change))
    }

    fn members(&self, match_index: usize, team: usize) -> Vec<PlayerIndex> {
        self.matches[match_index].teams[team].clone()
    }

    /// Brings `a` and `b` onto the same team.
    fn force_partners(&mut self, a: PlayerIndex, b: PlayerIndex) -> bool {
        let (Some(sa), Some(sb)) = (self.seat(a), self.seat(b)) else {
            return false;
        };
        // a replaces one of b's teammates, then b replaces one of a's teammates
        let changes = [(a, sb), (b, sa)]
            .into_iter()
            .flat_map(|(mover, target)| {
                self.members(target.match_index, target.team)
                    .into_iter()
                    .filter(move |&q| q != a && q != b)
                    .map(move |q| Change::Players(mover, q))
            })
            .collect::<Vec<_>>();
        self.attempt_any(changes)
    }

    /// Puts `a` and `b` on opposite teams of one match.
    fn force_opponents(&mut self, a: PlayerIndex, b: PlayerIndex) -> bool {
        let (Some(sa), Some(sb)) = (self.seat(a), self.seat(b)) else {
            return false;
        };
        // a joins the team facing b, then b joins the team facing a
        let mut changes = [(a, sb), (b, sa)]
            .into_iter()
            .flat_map(|(mover, target)| {
                self.members(target.match_index, 1 - target.team)
                    .into_iter()
                    .filter(move |&q| q != a && q != b)
                    .map(move |q| Change::Players(mover, q))
            })
            .collect::<Vec<_>>();
        if sa.match_index != sb.match_index {
            // a's team takes the place of b's rivals, or the other way round
            changes.push(Change::Teams(
                (sa.match_index, sa.team),
                (sb.match_index, 1 - sb.team),
            ));
            changes.push(Change::Teams(
                (sb.match_index, sb.team),
                (sa.match_index, 1 - sa.team),
            ));
        }
        self.attempt_any(changes)
    }

    /// Moves one player of a veto pair to a court at an odd offset, closest first.
    fn spread_veto_pair(&mut self, a: PlayerIndex, ca: usize, b: PlayerIndex, cb: usize) -> bool {
        let movers = if ca > cb {
            [(a, ca), (b, cb)]
        } else {
            [(b, cb), (a, ca)]
        };
        let num_courts = self.roster.num_courts();
        for (mover, from) in movers {
            let targets = (1..num_courts)
                .step_by(2)
                .flat_map(|offset| {
                    [from.checked_add(offset), from.checked_sub(offset)]
                        .into_iter()
                        .flatten()
                })
                .filter(|&court| (1..=num_courts).contains(&court))
                .collect::<Vec<_>>();
            for court in targets {
                let Some(target) = self.matches.iter().position(|m| m.court == Some(court)) else {
                    continue;
                };
                let candidates = self.matches[target]
                    .players()
                    .map(|q| Change::Players(mover, q))
                    .collect::<Vec<_>>();
                if self.attempt_any(candidates) {
                    return true;
                }
            }
        }
        false
    }
}

/// Runs the repair phase on numbered matches and returns what is still broken.
///
/// 1. Up to `repair_passes` passes forcing mandatory partners, then mandatory opponents.
/// 2. One pass moving veto pairs to an odd court distance.
/// 3. Renumbering by descending average, unless it breaks a veto pair that was fine.
#[instrument(skip_all, fields(matches = matches.len()))]
pub fn repair(
    roster: &Roster,
    matches: &mut Vec<Match>,
    config: &Configuration,
) -> Vec<ConstraintViolation> {
    let initial = find_violations(roster, matches);
    let mut search = Search {
        roster,
        matches: &mut *matches,
        tolerance: config.level_tolerance,
        violations: initial.clone(),
    };

    let partners = roster.pairs(Relation::MustPartner);
    let opponents = roster.pairs(Relation::MustOppose);
    for pass in 0..config.repair_passes {
        if search.violations.is_empty() {
            break;
        }
        let mut improved = false;
        for &(a, b) in &partners {
            if !teammates(&search.matches[..], a, b) {
                improved |= search.force_partners(a, b);
            }
        }
        for &(a, b) in &opponents {
            if !facing(&search.matches[..], a, b) {
                improved |= search.force_opponents(a, b);
            }
        }
        trace!(pass, improved, violations = search.violations.len());
        if !improved {
            break;
        }
    }

    for (a, b) in roster.veto_pairs() {
        if let (Some(ca), Some(cb)) = (search.court_of(a), search.court_of(b)) {
            if forbidden_distance(ca, cb) {
                search.spread_veto_pair(a, ca, b, cb);
            }
        }
    }

    renumber(roster, matches);

    let residual = find_violations(roster, matches);
    debug!(initial = initial.len(), residual = residual.len());
    residual
}

/// Final renumbering by average, kept only if it adds no veto-distance violation.
fn renumber(roster: &Roster, matches: &mut Vec<Match>) {
    let vetoes = |matches: &[Match]| {
        find_violations(roster, matches)
            .into_iter()
            .filter(ConstraintViolation::is_veto)
            .collect::<Vec<_>>()
    };
    let mut renumbered = matches.clone();
    let overflow = assign_courts(roster, &mut renumbered, roster.num_courts());
    let before = vetoes(&matches[..]);
    if overflow.is_empty() && no_new_breach(&before, &vetoes(&renumbered[..])) {
        *matches = renumbered;
    }
}

fn teammates(matches: &[Match], a: PlayerIndex, b: PlayerIndex) -> bool {
    match (seat_of(matches, a), seat_of(matches, b)) {
        (Some(sa), Some(sb)) => sa.match_index == sb.match_index && sa.team == sb.team,
        _ => true,
    }
}

fn facing(matches: &[Match], a: PlayerIndex, b: PlayerIndex) -> bool {
    match (seat_of(matches, a), seat_of(matches, b)) {
        (Some(sa), Some(sb)) => sa.match_index == sb.match_index && sa.team != sb.team,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use crate::{normalizer::normalize, player::PlayerRecord, report::Diagnostics};

    use super::*;

    fn roster(records: &[PlayerRecord], num_courts: usize) -> Roster {
        normalize(
            records,
            num_courts,
            &Configuration::new(),
            &mut Diagnostics::new(),
        )
        .unwrap()
    }

    fn leveled(n: u32) -> Vec<PlayerRecord> {
        (0..n)
            .map(|i| PlayerRecord::new(i, format!("P{i}")).with_level(3.0))
            .collect()
    }

    fn team(ids: [usize; 2]) -> Vec<PlayerIndex> {
        ids.map(PlayerIndex).to_vec()
    }

    fn game(a: [usize; 2], b: [usize; 2], court: Option<usize>) -> Match {
        Match::new([team(a), team(b)], court, false)
    }

    #[test]
    fn detects_each_kind() {
        let mut records = leveled(8);
        records[0] = records[0].clone().with_must_partner([4]);
        records[1] = records[1].clone().with_forbid_oppose([2]);
        records[4] = records[4].clone().with_must_oppose([5]);
        records[6] = records[6].clone().with_forbid_partner([7]);
        let roster = roster(&records, 2);
        let matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];
        let violations = find_violations(&roster, &matches);
        assert_eq!(
            violations,
            vec![
                ConstraintViolation::PartnersApart(PlayerIndex(0), PlayerIndex(4)),
                ConstraintViolation::OpponentsNotFacing(PlayerIndex(4), PlayerIndex(5)),
                ConstraintViolation::ForbiddenPartners(PlayerIndex(6), PlayerIndex(7)),
                ConstraintViolation::ForbiddenOpponents(PlayerIndex(1), PlayerIndex(2)),
            ]
        );
        assert_eq!(
            violations[0].describe(&roster),
            "P0 and P4 must play together but do not"
        );
    }

    #[test]
    fn veto_distance() {
        let mut records = leveled(12);
        records[0] = records[0]
            .clone()
            .with_forbid_partner([8])
            .with_forbid_oppose([8]);
        let roster = roster(&records, 3);
        let matches = vec![
            game([0, 1], [2, 3], Some(1)),
            game([4, 5], [6, 7], Some(2)),
            game([8, 9], [10, 11], Some(3)),
        ];
        assert_eq!(
            find_violations(&roster, &matches),
            vec![ConstraintViolation::VetoDistance {
                players: (PlayerIndex(0), PlayerIndex(8)),
                courts: (1, 3),
            }]
        );
    }

    #[test]
    fn courts_by_descending_average() {
        let records = (0..12)
            .map(|i| PlayerRecord::new(i, format!("P{i}")).with_level(i as f64))
            .collect::<Vec<_>>();
        let roster = roster(&records, 3);
        let mut matches = vec![
            game([0, 1], [2, 3], None),
            Match::new([team([8, 9]), team([10, 11])], Some(2), true),
            game([4, 5], [6, 7], None),
        ];
        let overflow = assign_courts(&roster, &mut matches, 3);
        assert!(overflow.is_empty());
        assert_eq!(
            matches.iter().map(|m| m.court).collect::<Vec<_>>(),
            vec![Some(3), Some(2), Some(1)]
        );
    }

    #[test]
    fn extra_matches_overflow() {
        let roster = roster(&leveled(8), 1);
        let mut matches = vec![game([0, 1], [2, 3], None), game([4, 5], [6, 7], None)];
        let overflow = assign_courts(&roster, &mut matches, 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(overflow.len(), 1);
    }

    #[test]
    fn partners_brought_together_across_matches() {
        let mut records = leveled(8);
        records[0] = records[0].clone().with_must_partner([4]);
        let roster = roster(&records, 2);
        let mut matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];
        let residual = repair(&roster, &mut matches, &Configuration::new());
        assert!(residual.is_empty(), "{residual:?}");
        let seat_0 = seat_of(&matches, PlayerIndex(0)).unwrap();
        let seat_4 = seat_of(&matches, PlayerIndex(4)).unwrap();
        assert_eq!(
            (seat_0.match_index, seat_0.team),
            (seat_4.match_index, seat_4.team)
        );
    }

    #[test]
    fn opponents_brought_face_to_face() {
        let mut records = leveled(8);
        records[1] = records[1].clone().with_must_oppose([5]);
        let roster = roster(&records, 2);
        let mut matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];
        let residual = repair(&roster, &mut matches, &Configuration::new());
        assert!(residual.is_empty(), "{residual:?}");
        assert!(facing(&matches, PlayerIndex(1), PlayerIndex(5)));
    }

    #[test]
    fn exchanges_never_break_a_new_relation() {
        let mut records = leveled(8);
        records[0] = records[0].clone().with_must_partner([4]);
        records[5] = records[5]
            .clone()
            .with_must_oppose([2])
            .with_forbid_partner([1]);
        let roster = roster(&records, 2);
        let mut matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];
        assert_eq!(
            find_violations(&roster, &matches),
            vec![
                ConstraintViolation::PartnersApart(PlayerIndex(0), PlayerIndex(4)),
                ConstraintViolation::OpponentsNotFacing(PlayerIndex(2), PlayerIndex(5)),
            ]
        );

        // every swap uniting 0 and 4 also teams 1 with 5, so only the opponents get fixed
        let residual = repair(&roster, &mut matches, &Configuration::new());
        assert_eq!(
            residual,
            vec![ConstraintViolation::PartnersApart(
                PlayerIndex(0),
                PlayerIndex(4)
            )]
        );
        assert!(facing(&matches, PlayerIndex(2), PlayerIndex(5)));
        let seat_1 = seat_of(&matches, PlayerIndex(1)).unwrap();
        let seat_5 = seat_of(&matches, PlayerIndex(5)).unwrap();
        assert_ne!(
            (seat_1.match_index, seat_1.team),
            (seat_5.match_index, seat_5.team)
        );
    }

    #[test]
    fn whole_teams_exchanged_when_single_swaps_are_too_uneven() {
        let levels = [5.0, 1.0, 3.0, 3.0, 3.0, 8.0, 3.5, 3.5];
        let mut records = levels
            .iter()
            .zip(0..)
            .map(|(&level, i)| PlayerRecord::new(i, format!("P{i}")).with_level(level))
            .collect::<Vec<_>>();
        records[1] = records[1].clone().with_must_oppose([5]);
        let roster = roster(&records, 2);
        let mut matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];

        // 1 is 2.5 away from 6 and 7, 5 is 5 away from 2 and 3; the teams [0, 1] and [6, 7]
        // differ by 1 in sum
        let config = Configuration::new().with_level_tolerance(1.0);
        let residual = repair(&roster, &mut matches, &config);
        assert!(residual.is_empty(), "{residual:?}");
        assert!(facing(&matches, PlayerIndex(1), PlayerIndex(5)));
        assert_eq!(matches[0].teams[0], team([6, 7]));
        assert_eq!(matches[1].teams[1], team([0, 1]));
        // the stronger match moved to court 1
        assert_eq!(matches[1].court, Some(1));
        assert_eq!(matches[0].court, Some(2));
    }

    #[test]
    fn level_tolerance_blocks_exchanges() {
        let mut records = (0..8)
            .map(|i| {
                let level = if i < 4 { 9.0 } else { 1.0 };
                PlayerRecord::new(i, format!("P{i}")).with_level(level)
            })
            .collect::<Vec<_>>();
        records[0] = records[0].clone().with_must_partner([4]);
        let roster = roster(&records, 2);
        let mut matches = vec![game([0, 1], [2, 3], Some(1)), game([4, 5], [6, 7], Some(2))];
        let config = Configuration::new().with_level_tolerance(1.0);
        let residual = repair(&roster, &mut matches, &config);
        assert_eq!(
            residual,
            vec![ConstraintViolation::PartnersApart(
                PlayerIndex(0),
                PlayerIndex(4)
            )]
        );
    }

    #[test]
    fn pinned_players_stay() {
        let mut records = leveled(8);
        records[0] = records[0].clone().with_fixed_court(1);
        records[1] = records[1].clone().with_must_partner([4]).with_fixed_court(1);
        let roster = roster(&records, 2);
        // 4 inherits court 1 from 1 during normalization, yet sits on court 2 here
        let mut matches = vec![
            Match::new([team([0, 1]), team([2, 3])], Some(1), true),
            game([4, 5], [6, 7], Some(2)),
        ];
        repair(&roster, &mut matches, &Configuration::new());
        assert_eq!(seat_of(&matches, PlayerIndex(0)).unwrap().match_index, 0);
        assert_eq!(seat_of(&matches, PlayerIndex(1)).unwrap().match_index, 0);
        assert_eq!(seat_of(&matches, PlayerIndex(4)).unwrap().match_index, 1);
    }

    #[test]
    fn veto_pair_spread_to_odd_distance() {
        let mut records = leveled(12);
        records[0] = records[0]
            .clone()
            .with_forbid_partner([8])
            .with_forbid_oppose([8]);
        let roster = roster(&records, 3);
        let mut matches = vec![
            game([0, 1], [2, 3], Some(1)),
            game([4, 5], [6, 7], Some(2)),
            game([8, 9], [10, 11], Some(3)),
        ];
        let residual = repair(&roster, &mut matches, &Configuration::new());
        assert!(residual.is_empty(), "{residual:?}");
        let court_of = |p: usize| {
            let seat = seat_of(&matches, PlayerIndex(p)).unwrap();
            matches[seat.match_index].court.unwrap()
        };
        assert_eq!(court_of(0).abs_diff(court_of(8)) % 2, 1);
    }
}
