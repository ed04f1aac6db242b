//! Weights, tolerances and limits used by the pairing phases.
//!
//! Every value here has a matching override in
//! [`Configuration`](crate::configuration::Configuration) where it makes sense to tune it per
//! session; the rest are structural limits of the game itself.

/// Players per court.
pub const COURT_CAPACITY: usize = 4;

/// A player may have at most one mandatory partner.
pub const MAX_MUST_PARTNERS: usize = 1;

/// A player may have at most two mandatory opponents (both members of the rival team).
pub const MAX_MUST_OPPONENTS: usize = 2;

/// Weight of the in-team level gap, summed over both teams.
pub const PARTNER_DIFF_WEIGHT: f64 = 0.5;

/// Penalty per team whose two players share an explicit (non-"either") position.
pub const SAME_POSITION_WEIGHT: f64 = 0.15;

/// Penalty per team made of two left-handed players.
pub const LEFT_LEFT_WEIGHT: f64 = 0.5;

/// Penalty when a mixed session cannot produce mixed teams.
/// One unmixed team costs half of it, two unmixed teams cost all of it.
pub const GENDER_MIX_WEIGHT: f64 = 1.0;

/// Weight of the difference between team averages.
pub const AVERAGE_DIFF_WEIGHT: f64 = 2.0;

/// Splits whose metric is within this margin of the best one are considered equally good.
pub const NEAR_OPTIMAL_EPSILON: f64 = 0.01;

/// A finished match whose average difference is at most this is reported as a tie.
pub const TIE_THRESHOLD: f64 = 0.5;

/// Factor applied to the level range when scoring candidate fills for a fixed court.
pub const RANGE_PENALTY: f64 = 0.5;

/// Fill scores closer than this are treated as equal.
pub const SCORE_TIE_EPSILON: f64 = 1e-6;

/// Largest level gap allowed between two players exchanged by the repair phase.
/// Whole-team exchanges allow twice this on the team sums.
pub const LEVEL_TOLERANCE: f64 = 3.0;

/// Upper bound on forcing passes in the repair phase.
pub const REPAIR_PASSES: usize = 5;

/// Average gap above which a match gets a "wide gap" note in the report.
pub const WIDE_GAP_NOTE: f64 = 1.0;
