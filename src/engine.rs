//! Orchestration of a pairing run.
//!
//! [`Pairer`] chains the phases: normalization, clustering, court population, per-court split
//! selection, the draft of leftover players, court numbering, repair and formatting. Fatal
//! errors stop the run before any match is built; everything else becomes a warning in the
//! report.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, trace};

use crate::{
    cluster::build_clusters,
    configuration::Configuration,
    court::populate_courts,
    draft::draft_pairs,
    error::PairingError,
    logger::init_logger,
    normalizer::normalize,
    player::PlayerRecord,
    repair::{assign_courts, repair},
    report::{format_report, Diagnostics, PairingReport},
    roster::Roster,
    selector::{partial_match, select_split},
};

/// Runs pairings with a fixed [`Configuration`].
#[derive(Debug, Clone)]
pub struct Pairer {
    config: Configuration,
}

impl Pairer {
    /// Create a pairer.
    ///
    /// Installs the file logger when the configuration asks for it. A logger that cannot be
    /// installed is reported on stderr and the pairer works without it.
    #[instrument(skip_all)]
    pub fn new(config: Configuration) -> Self {
        if config.log {
            if let Err(e) = init_logger() {
                eprintln!("file logging disabled: {e:#}");
            }
        }
        trace!(?config);
        Pairer { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Pairs `records` on `num_courts` courts, drawing randomness from `rng`.
    ///
    /// # Errors
    /// Any validation, conflict or capacity error found before matches are built.
    #[instrument(skip_all, fields(players = records.len(), num_courts = num_courts))]
    pub fn pair<R: Rng + ?Sized>(
        &self,
        records: &[PlayerRecord],
        num_courts: usize,
        rng: &mut R,
    ) -> Result<PairingReport, PairingError> {
        let mut diagnostics = Diagnostics::new();
        let roster = normalize(records, num_courts, &self.config, &mut diagnostics)?;
        let clusters = build_clusters(&roster)?;
        let population = populate_courts(&roster, &clusters, rng, &mut diagnostics)?;
        info!(
            players = roster.len(),
            clusters = clusters.len(),
            unplaced = population.unplaced.len(),
            "courts populated"
        );

        let mut matches = vec![];
        let mut free = vec![];
        for court in &population.courts {
            if court.players.is_empty() {
                continue;
            }
            if court.is_full() {
                match select_split(&roster, court, &self.config, rng) {
                    Some(split) => matches.push(split.into_match(court)),
                    None if court.fixed => diagnostics.warn(format!(
                        "no valid split on fixed court {} for {}",
                        court.index,
                        roster.names(&court.players)
                    )),
                    None => {
                        diagnostics.warn(format!(
                            "no valid split on court {}, its players join the draft",
                            court.index
                        ));
                        free.extend(&court.players);
                    }
                }
            } else if court.fixed {
                match partial_match(&roster, court) {
                    Some(m) => matches.push(m),
                    None => diagnostics.warn(format!(
                        "players of fixed court {} cannot share a match: {}",
                        court.index,
                        roster.names(&court.players)
                    )),
                }
            } else {
                free.extend(&court.players);
            }
        }
        debug!(selected = matches.len(), free = free.len());

        let drafted = draft_pairs(&roster, &free, rng);
        if !drafted.leftover.is_empty() {
            diagnostics.warn(format!(
                "no match found for {}",
                roster.names(&drafted.leftover)
            ));
        }
        matches.extend(drafted.matches);

        let overflow = assign_courts(&roster, &mut matches, roster.num_courts());
        for m in &overflow {
            let players = m.players().collect::<Vec<_>>();
            diagnostics.warn(format!(
                "not enough courts for the match of {}",
                roster.names(&players)
            ));
        }

        let violations = repair(&roster, &mut matches, &self.config);
        info!(
            matches = matches.len(),
            violations = violations.len(),
            warnings = diagnostics.warnings().len(),
            "pairing done"
        );
        Ok(format_report(
            &roster,
            &matches,
            &violations,
            diagnostics,
            self.config.tie_threshold,
        ))
    }

    /// [`pair`](Self::pair) with a `ChaCha8Rng` seeded from `seed`. The same inputs and seed
    /// give the same report.
    pub fn pair_seeded(
        &self,
        records: &[PlayerRecord],
        num_courts: usize,
        seed: u64,
    ) -> Result<PairingReport, PairingError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.pair(records, num_courts, &mut rng)
    }

    /// Validates `records` without pairing them.
    pub fn validate(
        &self,
        records: &[PlayerRecord],
        num_courts: usize,
    ) -> Result<Roster, PairingError> {
        normalize(records, num_courts, &self.config, &mut Diagnostics::new())
    }
}

/// One-shot pairing. Without a seed, randomness comes from the thread generator.
pub fn generate_pairings(
    records: &[PlayerRecord],
    num_courts: usize,
    config: Configuration,
    seed: Option<u64>,
) -> Result<PairingReport, PairingError> {
    let pairer = Pairer::new(config);
    match seed {
        Some(seed) => pairer.pair_seeded(records, num_courts, seed),
        None => pairer.pair(records, num_courts, &mut rand::thread_rng()),
    }
}

#[cfg(test)]
mod tests {
    use crate::{configuration::PoolType, error::ErrorKind, player::Gender};

    use super::*;

    fn leveled(levels: &[f64]) -> Vec<PlayerRecord> {
        levels
            .iter()
            .enumerate()
            .map(|(i, &level)| PlayerRecord::new(i as u32 + 1, format!("P{}", i + 1)).with_level(level))
            .collect()
    }

    fn open() -> Pairer {
        Pairer::new(Configuration::new().with_pool_type(PoolType::Open))
    }

    #[test]
    fn two_full_courts() {
        let records = leveled(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let report = open().pair_seeded(&records, 2, 3).unwrap();
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].court, 1);
        assert_eq!(report.matches[1].court, 2);
        assert!(report.unplaced.is_empty());
        assert!(report.violations.is_empty());
        for m in &report.matches {
            assert!(!m.incomplete);
            assert_eq!(m.player_ids[0].len(), 2);
            assert_eq!(m.player_ids[1].len(), 2);
        }
    }

    #[test]
    fn stronger_match_on_first_court() {
        let records = leveled(&[1.0, 1.0, 1.0, 1.0, 6.0, 6.0, 6.0, 6.0]);
        let report = open().pair_seeded(&records, 2, 0).unwrap();
        assert_eq!(report.debug[0].stats.overall_average, 6.0);
        assert_eq!(report.debug[1].stats.overall_average, 1.0);
    }

    #[test]
    fn short_courts_go_to_the_draft() {
        // six players on two courts: four on the first, two left for the draft with nobody to face
        let records = leveled(&[3.0, 3.0, 3.0, 3.0, 2.0, 2.0]);
        let report = open().pair_seeded(&records, 2, 0).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.unplaced, vec!["P5".to_string(), "P6".to_string()]);
        assert!(report.warnings.iter().any(|w| w.contains("no match found")));
    }

    #[test]
    fn fatal_errors_stop_the_run() {
        let records = leveled(&[1.0, 2.0]);
        let err = open().pair_seeded(&records, 0, 0).unwrap_err();
        assert_eq!(err, PairingError::NoCourts);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn fixed_partial_court_reported_incomplete() {
        let records = vec![
            PlayerRecord::new(1, "Ana")
                .with_gender(Gender::Female)
                .with_fixed_court(2),
            PlayerRecord::new(2, "Bea")
                .with_gender(Gender::Female)
                .with_fixed_court(2),
        ];
        let report = open().pair_seeded(&records, 2, 0).unwrap();
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].court, 2);
        assert!(report.matches[0].incomplete);
        assert_eq!(report.matches[0].average_diff, "?.?");
    }

    #[test]
    fn generate_with_and_without_seed() {
        let records = leveled(&[1.0, 2.0, 3.0, 4.0]);
        let config = Configuration::new().with_pool_type(PoolType::Open);
        let seeded = generate_pairings(&records, 1, config, Some(9)).unwrap();
        assert_eq!(seeded, generate_pairings(&records, 1, config, Some(9)).unwrap());
        let unseeded = generate_pairings(&records, 1, config, None).unwrap();
        assert_eq!(unseeded.matches.len(), 1);
    }
}
