//! Final report and run diagnostics.
//!
//! The report is recomputed from the final team membership: statistics cached during earlier
//! phases are never reused. It serializes to JSON and also implements [`Display`](fmt::Display)
//! for a plain-text rendering.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::{
    constants::WIDE_GAP_NOTE,
    matches::{Match, MatchStats},
    player::{Gender, Hand, PlayerId, Position},
    repair::ConstraintViolation,
    roster::{Player, PlayerIndex, Roster},
};

/// Non-fatal conditions collected during a run.
///
/// Every message is also emitted as a `tracing` warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    /// No warnings yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Warnings recorded so far, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// One match, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedMatch {
    /// 1-based court.
    pub court: usize,
    /// Player labels of both teams.
    pub teams: [Vec<String>; 2],
    /// Player ids of both teams.
    pub player_ids: [Vec<PlayerId>; 2],
    /// Team level sums, one decimal.
    pub totals: [String; 2],
    /// Team level means, one decimal.
    pub averages: [String; 2],
    /// Difference of the means, one decimal, `?.?` when incomplete.
    pub average_diff: String,
    /// Difference of the sums, one decimal, `?` when incomplete.
    pub total_diff: String,
    /// Complete and balanced within the tie threshold.
    pub tie: bool,
    /// A team does not have two players.
    pub incomplete: bool,
    /// Remarks on the match (left-handed teams, shared positions, wide gap).
    pub notes: Vec<String>,
}

/// Raw numbers behind a [`FormattedMatch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDebug {
    /// 1-based court.
    pub court: usize,
    /// Full statistics.
    #[serde(flatten)]
    pub stats: MatchStats,
}

/// Everything a pairing run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingReport {
    /// Matches ordered by court.
    pub matches: Vec<FormattedMatch>,
    /// Same order as `matches`.
    pub debug: Vec<MatchDebug>,
    /// Names of players in no match, roster order.
    pub unplaced: Vec<String>,
    /// Non-fatal conditions met on the way.
    pub warnings: Vec<String>,
    /// Relations still broken after repair.
    pub violations: Vec<String>,
}

/// `Name (M 4.5, left, right-handed)`.
pub fn player_label(player: &Player) -> String {
    let gender = match player.gender {
        Gender::Male => 'M',
        Gender::Female => 'F',
    };
    let position = match player.position {
        Position::Left => "left",
        Position::Right => "right",
        Position::Either => "either",
    };
    let hand = match player.hand {
        Hand::Right => "right-handed",
        Hand::Left => "left-handed",
    };
    format!(
        "{} ({gender} {:.1}, {position}, {hand})",
        player.name, player.level
    )
}

fn notes(roster: &Roster, m: &Match, stats: &MatchStats) -> Vec<String> {
    let mut notes = vec![];
    for team in m.teams.iter().filter(|team| team.len() == 2) {
        let (a, b) = (&roster[team[0]], &roster[team[1]]);
        if a.hand == Hand::Left && b.hand == Hand::Left {
            notes.push(format!("two left-handed players: {} / {}", a.name, b.name));
        }
        if a.position == b.position && a.position != Position::Either {
            notes.push(format!("same position: {} / {}", a.name, b.name));
        }
    }
    if !stats.incomplete && stats.average_diff > WIDE_GAP_NOTE {
        notes.push(format!("wide level gap ({:.1})", stats.average_diff));
    }
    notes
}

/// Builds the report from the final matches.
pub fn format_report(
    roster: &Roster,
    matches: &[Match],
    violations: &[ConstraintViolation],
    diagnostics: Diagnostics,
    tie_threshold: f64,
) -> PairingReport {
    let mut ordered = matches.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|m| m.court.unwrap_or(usize::MAX));

    let mut formatted = Vec::with_capacity(ordered.len());
    let mut debug = Vec::with_capacity(ordered.len());
    for m in ordered {
        let stats = MatchStats::compute(roster, m, tie_threshold);
        let court = m.court.unwrap_or_default();
        let label_team = |team: &Vec<PlayerIndex>| {
            team.iter()
                .map(|&p| player_label(&roster[p]))
                .collect::<Vec<_>>()
        };
        let (average_diff, total_diff) = if stats.incomplete {
            ("?.?".to_string(), "?".to_string())
        } else {
            (
                format!("{:.1}", stats.average_diff),
                format!("{:.1}", stats.total_diff),
            )
        };
        formatted.push(FormattedMatch {
            court,
            teams: m.teams.each_ref().map(label_team),
            player_ids: m
                .teams
                .each_ref()
                .map(|team| team.iter().map(|&p| roster[p].id).collect()),
            totals: stats.totals.map(|total| format!("{total:.1}")),
            averages: stats.averages.map(|average| format!("{average:.1}")),
            average_diff,
            total_diff,
            tie: stats.tie,
            incomplete: stats.incomplete,
            notes: notes(roster, m, &stats),
        });
        debug.push(MatchDebug { court, stats });
    }

    let mut seated = vec![false; roster.len()];
    for p in matches.iter().flat_map(Match::players) {
        seated[p.index()] = true;
    }
    let unplaced = roster
        .iter()
        .filter(|(p, _)| !seated[p.index()])
        .map(|(_, player)| player.name.clone())
        .collect();

    PairingReport {
        matches: formatted,
        debug,
        unplaced,
        warnings: diagnostics.warnings,
        violations: violations.iter().map(|v| v.describe(roster)).collect(),
    }
}

impl fmt::Display for PairingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.matches {
            let mut flags = vec![];
            if m.tie {
                flags.push("tie");
            }
            if m.incomplete {
                flags.push("incomplete");
            }
            write!(f, "Court {}: diff {}", m.court, m.average_diff)?;
            if !flags.is_empty() {
                write!(f, " [{}]", flags.join(", "))?;
            }
            writeln!(f)?;
            for (team, (total, average)) in m.teams.iter().zip(m.totals.iter().zip(&m.averages)) {
                writeln!(f, "  {} | total {total}, avg {average}", team.join(" + "))?;
            }
            for note in &m.notes {
                writeln!(f, "  note: {note}")?;
            }
        }
        if !self.unplaced.is_empty() {
            writeln!(f, "Unplaced: {}", self.unplaced.join(", "))?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        for violation in &self.violations {
            writeln!(f, "unresolved: {violation}")?;
        }
        Ok(())
    }
}
