//! Ladder ("pozo") progression between rounds.
//!
//! After each round, winners move one court up (toward court 1) and losers one court down
//! (toward the last court). The next round is then paired with everyone pinned to their new
//! court.
//!
//! ```
//! use court_pairing::prelude::*;
//!
//! let records = (1..=4)
//!     .map(|id| PlayerRecord::new(id, format!("P{id}")).with_fixed_court(2))
//!     .collect::<Vec<_>>();
//! let results = vec![RoundResult {
//!     court: 2,
//!     winners: vec![1, 2],
//!     losers: vec![3, 4],
//! }];
//!
//! let mut ladder = Ladder::new(3);
//! let next = ladder.advance_round(&records, &results).unwrap();
//! assert_eq!(next[0].fixed_court, Some(1));
//! assert_eq!(next[3].fixed_court, Some(3));
//! ```

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::PairingError,
    player::{Gender, PlayerId, PlayerRecord},
    report::PairingReport,
};

/// Outcome of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based court the match was played on.
    pub court: usize,
    /// Ids of the winning team.
    pub winners: Vec<PlayerId>,
    /// Ids of the losing team.
    pub losers: Vec<PlayerId>,
}

/// Court movement across rounds.
#[derive(Debug, Clone)]
pub struct Ladder {
    num_courts: usize,
    round: usize,
}

impl Ladder {
    /// A ladder over `num_courts` courts, before its first round.
    pub fn new(num_courts: usize) -> Self {
        Ladder {
            num_courts,
            round: 0,
        }
    }

    /// Rounds advanced so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Returns a copy of `records` with every winner fixed one court up and every loser one
    /// court down, clamped to `1..=num_courts`. Players without a result keep their court.
    ///
    /// # Errors
    /// - [`PairingError::NoCourts`] on a ladder without courts.
    /// - [`PairingError::ResultCourtOutOfRange`] for a result court outside `1..=num_courts`.
    /// - [`PairingError::UnknownPlayer`] for a result id missing from `records`.
    #[instrument(skip_all, fields(round = self.round, results = results.len()))]
    pub fn advance_round(
        &mut self,
        records: &[PlayerRecord],
        results: &[RoundResult],
    ) -> Result<Vec<PlayerRecord>, PairingError> {
        if self.num_courts == 0 {
            return Err(PairingError::NoCourts);
        }
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id, i))
            .collect::<HashMap<_, _>>();

        let mut next = records.to_vec();
        for result in results {
            if !(1..=self.num_courts).contains(&result.court) {
                return Err(PairingError::ResultCourtOutOfRange {
                    court: result.court,
                    num_courts: self.num_courts,
                });
            }
            let up = result.court.saturating_sub(1).max(1);
            let down = (result.court + 1).min(self.num_courts);
            let moves = result
                .winners
                .iter()
                .map(|id| (id, up))
                .chain(result.losers.iter().map(|id| (id, down)));
            for (&id, court) in moves {
                let &i = by_id.get(&id).ok_or(PairingError::UnknownPlayer { id })?;
                next[i].fixed_court = Some(court);
            }
        }

        self.round += 1;
        debug!(round = self.round, "ladder advanced");
        Ok(next)
    }
}

/// Random results for every complete match of `report`, each team winning with even odds.
pub fn simulate_results<R: Rng + ?Sized>(report: &PairingReport, rng: &mut R) -> Vec<RoundResult> {
    report
        .matches
        .iter()
        .filter(|m| !m.incomplete)
        .map(|m| {
            let pick = usize::from(rng.gen_bool(0.5));
            RoundResult {
                court: m.court,
                winners: m.player_ids[pick].clone(),
                losers: m.player_ids[1 - pick].clone(),
            }
        })
        .collect()
}

/// Suggested teams for a court in the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recombination {
    /// Court the result came from.
    pub court: usize,
    /// Winning man with losing woman, then losing man with winning woman.
    pub teams: [[PlayerId; 2]; 2],
}

/// Mixed recombination of each result whose teams are each one man and one woman.
///
/// Other results, and results naming unknown ids, are skipped.
pub fn recombine(records: &[PlayerRecord], results: &[RoundResult]) -> Vec<Recombination> {
    let genders = records
        .iter()
        .map(|record| (record.id, record.gender.unwrap_or_default()))
        .collect::<HashMap<_, _>>();
    let split = |team: &[PlayerId]| -> Option<(PlayerId, PlayerId)> {
        let [a, b] = *team else {
            return None;
        };
        match (genders.get(&a)?, genders.get(&b)?) {
            (Gender::Male, Gender::Female) => Some((a, b)),
            (Gender::Female, Gender::Male) => Some((b, a)),
            _ => None,
        }
    };

    results
        .iter()
        .filter_map(|result| {
            let (man_w, woman_w) = split(&result.winners)?;
            let (man_l, woman_l) = split(&result.losers)?;
            Some(Recombination {
                court: result.court,
                teams: [[man_w, woman_l], [man_l, woman_w]],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::{configuration::Configuration, engine::Pairer};

    use super::*;

    fn records(n: u32) -> Vec<PlayerRecord> {
        (1..=n)
            .map(|i| {
                let gender = if i % 2 == 0 {
                    Gender::Female
                } else {
                    Gender::Male
                };
                PlayerRecord::new(i, format!("P{i}"))
                    .with_gender(gender)
                    .with_level(f64::from(i))
            })
            .collect()
    }

    fn result(court: usize, winners: [PlayerId; 2], losers: [PlayerId; 2]) -> RoundResult {
        RoundResult {
            court,
            winners: winners.to_vec(),
            losers: losers.to_vec(),
        }
    }

    #[test]
    fn winners_up_losers_down_clamped() {
        let mut ladder = Ladder::new(2);
        let results = [result(1, [1, 2], [3, 4]), result(2, [5, 6], [7, 8])];
        let next = ladder.advance_round(&records(8), &results).unwrap();
        let courts = next.iter().map(|r| r.fixed_court).collect::<Vec<_>>();
        assert_eq!(
            courts,
            vec![Some(1), Some(1), Some(2), Some(2), Some(1), Some(1), Some(2), Some(2)]
        );
        assert_eq!(ladder.round(), 1);
    }

    #[test]
    fn untouched_players_keep_their_court() {
        let mut ladder = Ladder::new(3);
        let mut input = records(5);
        input[4] = input[4].clone().with_fixed_court(3);
        let next = ladder
            .advance_round(&input, &[result(2, [1, 2], [3, 4])])
            .unwrap();
        assert_eq!(next[0].fixed_court, Some(1));
        assert_eq!(next[2].fixed_court, Some(3));
        assert_eq!(next[4].fixed_court, Some(3));
        assert_eq!(input[0].fixed_court, None);
    }

    #[test]
    fn invalid_results() {
        let mut ladder = Ladder::new(2);
        assert_eq!(
            ladder
                .advance_round(&records(4), &[result(3, [1, 2], [3, 4])])
                .unwrap_err(),
            PairingError::ResultCourtOutOfRange {
                court: 3,
                num_courts: 2
            }
        );
        assert_eq!(
            ladder
                .advance_round(&records(4), &[result(1, [1, 2], [3, 9])])
                .unwrap_err(),
            PairingError::UnknownPlayer { id: 9 }
        );
        assert_eq!(ladder.round(), 0);
        assert_eq!(
            Ladder::new(0).advance_round(&records(4), &[]).unwrap_err(),
            PairingError::NoCourts
        );
    }

    #[test]
    fn mixed_recombination() {
        let recombined = recombine(&records(8), &[result(1, [2, 1], [3, 4]), result(2, [5, 7], [6, 8])]);
        assert_eq!(
            recombined,
            vec![Recombination {
                court: 1,
                teams: [[1, 4], [3, 2]],
            }]
        );
    }

    #[test]
    fn simulated_results_cover_complete_matches() {
        let pairer = Pairer::new(Configuration::new());
        let report = pairer.pair_seeded(&records(8), 2, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let results = simulate_results(&report, &mut rng);
        assert_eq!(results.len(), 2);
        for (result, m) in results.iter().zip(&report.matches) {
            assert_eq!(result.court, m.court);
            assert_eq!(result.winners.len(), 2);
            assert_eq!(result.losers.len(), 2);
            assert!(m.player_ids.contains(&result.winners));
        }
    }
}
