//! Matches and their derived statistics.

use serde::Serialize;

use crate::roster::{PlayerIndex, Roster};

/// Two teams facing each other on a court.
///
/// Teams normally hold two players each. Only a fixed court that could not be completed
/// produces shorter teams.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Both teams.
    pub teams: [Vec<PlayerIndex>; 2],
    /// 1-based court, once numbered.
    pub court: Option<usize>,
    /// Built from a court with fixed occupants. Keeps its court through renumbering.
    pub fixed: bool,
}

/// Seat of a player inside a list of matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    /// Match position in the list.
    pub match_index: usize,
    /// 0 or 1.
    pub team: usize,
    /// Position inside the team.
    pub slot: usize,
}

impl Match {
    /// A match between `teams`.
    pub fn new(teams: [Vec<PlayerIndex>; 2], court: Option<usize>, fixed: bool) -> Self {
        Self {
            teams,
            court,
            fixed,
        }
    }

    /// Every player of both teams.
    pub fn players(&self) -> impl Iterator<Item = PlayerIndex> + '_ {
        self.teams.iter().flatten().copied()
    }

    /// Team of `p`, if `p` plays here.
    pub fn team_of(&self, p: PlayerIndex) -> Option<usize> {
        self.teams.iter().position(|team| team.contains(&p))
    }

    /// Both teams have exactly two players.
    pub fn is_complete(&self) -> bool {
        self.teams.iter().all(|team| team.len() == 2)
    }

    /// Mean level over every player of the match, `0` when empty.
    pub fn overall_average(&self, roster: &Roster) -> f64 {
        let (sum, count) = self
            .players()
            .fold((0.0, 0usize), |(sum, count), p| (sum + roster.level(p), count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

/// Finds where `p` sits.
pub fn seat_of(matches: &[Match], p: PlayerIndex) -> Option<Seat> {
    matches.iter().enumerate().find_map(|(match_index, m)| {
        m.teams.iter().enumerate().find_map(|(team, members)| {
            members.iter().position(|&q| q == p).map(|slot| Seat {
                match_index,
                team,
                slot,
            })
        })
    })
}

/// Statistics recomputed from the current team membership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchStats {
    /// Level sum of each team.
    pub totals: [f64; 2],
    /// Level mean of each team, `0` for an empty team.
    pub averages: [f64; 2],
    /// Mean level over the whole match.
    pub overall_average: f64,
    /// |avgA - avgB|, `0` when incomplete.
    pub average_diff: f64,
    /// |sumA - sumB|, `0` when incomplete.
    pub total_diff: f64,
    /// A team does not have exactly two players.
    pub incomplete: bool,
    /// Complete and `average_diff <= tie_threshold`.
    pub tie: bool,
}

impl MatchStats {
    /// Computes the statistics of `m`.
    pub fn compute(roster: &Roster, m: &Match, tie_threshold: f64) -> Self {
        let totals = m
            .teams
            .each_ref()
            .map(|team| team.iter().map(|&p| roster.level(p)).sum::<f64>());
        let mut averages = [0.0; 2];
        for (average, (team, total)) in averages.iter_mut().zip(m.teams.iter().zip(totals)) {
            if !team.is_empty() {
                *average = total / team.len() as f64;
            }
        }
        let incomplete = !m.is_complete();
        let (average_diff, total_diff) = if incomplete {
            (0.0, 0.0)
        } else {
            (
                (averages[0] - averages[1]).abs(),
                (totals[0] - totals[1]).abs(),
            )
        };
        Self {
            totals,
            averages,
            overall_average: m.overall_average(roster),
            average_diff,
            total_diff,
            incomplete,
            tie: !incomplete && average_diff <= tie_threshold,
        }
    }
}
