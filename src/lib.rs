//! # Court Pairing
//!
//! Assigns a roster of padel players to courts and splits every court into two teams of two,
//! balancing levels while honoring hard relations between players.
//!
//! It provides:
//! - Roster validation and symmetric closure of relations (`normalize`)
//! - Court placement of forced groups and fixed-court players (`build_clusters`, `populate_courts`)
//! - Per-court team selection and a level-based draft for leftovers (`select_split`, `draft_pairs`)
//! - A bounded repair pass fixing relations broken across courts (`repair`)
//! - A serializable report, plus ladder progression between rounds ([`tournament`])
//!
//! A run is a pure, synchronous function of the roster, the court count, the
//! [`Configuration`](crate::configuration::Configuration) and a random source. Seeded runs are
//! reproducible.
//!
//! # Relations
//!
//! Every player may declare, toward other players:
//! - `must_partner`: play on the same team (at most one);
//! - `must_oppose`: play on opposite teams of the same match (at most two);
//! - `forbid_partner`: never share a team;
//! - `forbid_oppose`: never face each other. Such pairs are also kept an odd number of courts
//!   apart.
//!
//! Relations are symmetric: declaring one on either side is enough.
//!
//! # Documentation Overview
//!
//! - For running a pairing, see [`Pairer`](crate::engine::Pairer) and
//!   [`generate_pairings`](crate::engine::generate_pairings).
//! - For tuning the weights and tolerances, see
//!   [`Configuration`](crate::configuration::Configuration) and [`constants`].
//! - For what can go wrong, see [`PairingError`](crate::error::PairingError).
//!
//! # Usage Example
//!
//! ```
//! use court_pairing::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = vec![
//!         PlayerRecord::new(1, "Ana").with_gender(Gender::Female).with_level(4.0),
//!         PlayerRecord::new(2, "Bruno").with_level(3.5),
//!         PlayerRecord::new(3, "Carla").with_gender(Gender::Female).with_level(2.5),
//!         PlayerRecord::new(4, "Dario").with_level(3.0).with_must_partner([3]),
//!     ];
//!
//!     let pairer = Pairer::new(Configuration::new());
//!     let report = pairer.pair_seeded(&records, 1, 42)?;
//!
//!     assert_eq!(report.matches.len(), 1);
//!     assert!(report.unplaced.is_empty());
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod cluster;
pub mod combinations;
pub mod configuration;
pub mod constants;
pub mod court;
pub mod draft;
pub mod engine;
pub mod error;
mod logger;
pub mod matches;
pub mod normalizer;
pub mod player;
pub mod repair;
pub mod report;
pub mod roster;
pub mod selector;
pub mod tournament;
pub mod union_find;

/// Commonly used types and functions for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use court_pairing::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration) and
///   [`PoolType`](crate::configuration::PoolType)
/// - [`Pairer`](crate::engine::Pairer) and [`generate_pairings`](crate::engine::generate_pairings)
/// - [`PlayerRecord`](crate::player::PlayerRecord) and its attribute enums
/// - the report and ladder types
pub mod prelude {
    pub use crate::configuration::{Configuration, MetricWeights, PoolType};
    pub use crate::engine::{generate_pairings, Pairer};
    pub use crate::error::{ErrorKind, PairingError};
    pub use crate::player::{Gender, Hand, PlayerId, PlayerRecord, Position, Relation};
    pub use crate::report::{FormattedMatch, PairingReport};
    pub use crate::tournament::{recombine, simulate_results, Ladder, RoundResult};
}
