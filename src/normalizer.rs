//! Turns raw [`PlayerRecord`]s into a validated [`Roster`].

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, instrument};

use crate::{
    configuration::{Configuration, PoolType},
    constants::{MAX_MUST_OPPONENTS, MAX_MUST_PARTNERS},
    error::PairingError,
    player::{Gender, PlayerRecord, Relation},
    report::Diagnostics,
    roster::{Player, PlayerIndex, Roster},
};

/// Relation kinds that may never share an id.
const EXCLUSIVE: [(Relation, Relation); 3] = [
    (Relation::MustPartner, Relation::ForbidPartner),
    (Relation::MustOppose, Relation::ForbidOppose),
    (Relation::MustPartner, Relation::MustOppose),
];

/// Fills defaults, closes every relation symmetrically, validates cardinalities and
/// contradictions, then propagates fixed courts along mandatory relations.
///
/// Relation entries pointing to an unknown id or to the player itself are dropped and reported
/// as warnings.
///
/// # Errors
/// Any validation or fixed-court conflict aborts the run, see [`PairingError`].
#[instrument(skip_all, fields(players = records.len(), num_courts = num_courts))]
pub fn normalize(
    records: &[PlayerRecord],
    num_courts: usize,
    config: &Configuration,
    diagnostics: &mut Diagnostics,
) -> Result<Roster, PairingError> {
    if num_courts == 0 {
        return Err(PairingError::NoCourts);
    }

    let mut by_id = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if by_id.insert(record.id, PlayerIndex(i)).is_some() {
            return Err(PairingError::DuplicatePlayer { id: record.id });
        }
    }

    let mut players = records
        .iter()
        .map(|record| fill_defaults(record, num_courts))
        .collect::<Result<Vec<_>, _>>()?;

    // symmetric closure
    for (i, record) in records.iter().enumerate() {
        let p = PlayerIndex(i);
        for relation in Relation::ALL {
            for &id in record.relation(relation) {
                match by_id.get(&id) {
                    Some(&q) if q != p => {
                        players[p.0].relation_mut(relation).insert(q);
                        players[q.0].relation_mut(relation).insert(p);
                    }
                    Some(_) => diagnostics.warn(format!(
                        "{} lists themselves as '{relation}', entry ignored",
                        record.name
                    )),
                    None => diagnostics.warn(format!(
                        "{} lists unknown player id {id} as '{relation}', entry ignored",
                        record.name
                    )),
                }
            }
        }
    }

    for player in &players {
        validate(player, &players)?;
    }

    propagate_fixed_courts(&mut players)?;

    let mix_required = config.pool_type == PoolType::Mixed;
    let men = players.iter().filter(|p| p.gender == Gender::Male).count();
    let exact_balance = mix_required && men * 2 == players.len();
    debug!(men, mix_required, exact_balance);

    Ok(Roster::new(
        players,
        by_id,
        num_courts,
        mix_required,
        exact_balance,
    ))
}

fn fill_defaults(record: &PlayerRecord, num_courts: usize) -> Result<Player, PairingError> {
    let level = record.level.unwrap_or(0.0);
    if !level.is_finite() || level < 0.0 {
        return Err(PairingError::InvalidLevel {
            player: record.name.clone(),
            level,
        });
    }
    let fixed_court = match record.fixed_court {
        None | Some(0) => None,
        Some(court) if court > num_courts => {
            return Err(PairingError::CourtOutOfRange {
                player: record.name.clone(),
                court,
                num_courts,
            })
        }
        Some(court) => Some(court),
    };
    Ok(Player {
        id: record.id,
        name: record.name.clone(),
        level,
        gender: record.gender.unwrap_or_default(),
        hand: record.hand.unwrap_or_default(),
        position: record.position.unwrap_or_default(),
        fixed_court,
        must_partner: BTreeSet::new(),
        must_oppose: BTreeSet::new(),
        forbid_partner: BTreeSet::new(),
        forbid_oppose: BTreeSet::new(),
    })
}

fn validate(player: &Player, players: &[Player]) -> Result<(), PairingError> {
    for (relation, max) in [
        (Relation::MustPartner, MAX_MUST_PARTNERS),
        (Relation::MustOppose, MAX_MUST_OPPONENTS),
    ] {
        let count = player.relation(relation).len();
        if count > max {
            return Err(PairingError::TooManyRelations {
                player: player.name.clone(),
                relation,
                count,
                max,
            });
        }
    }

    for (first, second) in EXCLUSIVE {
        if let Some(other) = player
            .relation(first)
            .intersection(player.relation(second))
            .next()
        {
            return Err(PairingError::ContradictoryRelations {
                player: player.name.clone(),
                other: players[other.0].name.clone(),
                first,
                second,
            });
        }
    }
    Ok(())
}

/// Spreads fixed courts across mandatory edges until nothing changes.
fn propagate_fixed_courts(players: &mut [Player]) -> Result<(), PairingError> {
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..players.len() {
            let Some(court) = players[i].fixed_court else {
                continue;
            };
            let linked = players[i].mandatory().collect::<Vec<_>>();
            for q in linked {
                match players[q.0].fixed_court {
                    None => {
                        players[q.0].fixed_court = Some(court);
                        changed = true;
                    }
                    Some(other) if other != court => {
                        return Err(PairingError::FixedCourtConflict {
                            first: players[i].name.clone(),
                            first_court: court,
                            second: players[q.0].name.clone(),
                            second_court: other,
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    fn run(records: &[PlayerRecord], num_courts: usize) -> Result<Roster, PairingError> {
        normalize(
            records,
            num_courts,
            &Configuration::new(),
            &mut Diagnostics::new(),
        )
    }

    #[test]
    fn relations_become_symmetric() {
        let records = vec![
            PlayerRecord::new(1, "Ana").with_must_partner([2]),
            PlayerRecord::new(2, "Bea"),
            PlayerRecord::new(3, "Carla").with_forbid_oppose([1]),
        ];
        let roster = run(&records, 1).unwrap();
        let (a, b, c) = (PlayerIndex(0), PlayerIndex(1), PlayerIndex(2));
        assert!(roster.related(Relation::MustPartner, b, a));
        assert!(roster.related(Relation::ForbidOppose, a, c));
        assert!(!roster.related(Relation::ForbidPartner, a, c));
    }

    #[test]
    fn defaults_are_filled() {
        let roster = run(&[PlayerRecord::new(1, "Ana").with_fixed_court(0)], 2).unwrap();
        let player = &roster[PlayerIndex(0)];
        assert_eq!(player.level, 0.0);
        assert_eq!(player.gender, Gender::Male);
        assert_eq!(player.fixed_court, None);
    }

    #[test]
    fn unknown_and_self_ids_are_dropped() {
        let records = vec![PlayerRecord::new(1, "Ana").with_forbid_partner([1, 42])];
        let mut diagnostics = Diagnostics::new();
        let roster = normalize(&records, 1, &Configuration::new(), &mut diagnostics).unwrap();
        assert!(roster[PlayerIndex(0)].forbid_partner.is_empty());
        assert_eq!(diagnostics.warnings().len(), 2);
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(run(&[], 0).unwrap_err(), PairingError::NoCourts);

        let dup = [PlayerRecord::new(1, "Ana"), PlayerRecord::new(1, "Bea")];
        assert_eq!(
            run(&dup, 1).unwrap_err(),
            PairingError::DuplicatePlayer { id: 1 }
        );

        let negative = [PlayerRecord::new(1, "Ana").with_level(-1.0)];
        assert!(matches!(
            run(&negative, 1),
            Err(PairingError::InvalidLevel { .. })
        ));

        let far = [PlayerRecord::new(1, "Ana").with_fixed_court(3)];
        assert!(matches!(
            run(&far, 2),
            Err(PairingError::CourtOutOfRange { court: 3, .. })
        ));
    }

    #[test]
    fn cardinality_checked_after_closure() {
        // Ana ends up with two partners once Carla's entry is mirrored
        let records = vec![
            PlayerRecord::new(1, "Ana").with_must_partner([2]),
            PlayerRecord::new(2, "Bea"),
            PlayerRecord::new(3, "Carla").with_must_partner([1]),
        ];
        let err = run(&records, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            err,
            PairingError::TooManyRelations {
                relation: Relation::MustPartner,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn contradictions_rejected() {
        let records = vec![
            PlayerRecord::new(1, "Ana").with_must_oppose([2]),
            PlayerRecord::new(2, "Bea").with_forbid_oppose([1]),
        ];
        assert!(matches!(
            run(&records, 1),
            Err(PairingError::ContradictoryRelations {
                first: Relation::MustOppose,
                second: Relation::ForbidOppose,
                ..
            })
        ));
    }

    #[test]
    fn fixed_court_propagates_along_chain() {
        let records = vec![
            PlayerRecord::new(1, "Ana").with_fixed_court(2).with_must_partner([2]),
            PlayerRecord::new(2, "Bea").with_must_oppose([3]),
            PlayerRecord::new(3, "Carla"),
        ];
        let roster = run(&records, 2).unwrap();
        for p in roster.indices() {
            assert_eq!(roster[p].fixed_court, Some(2));
        }
    }

    #[test]
    fn fixed_court_conflict() {
        let records = vec![
            PlayerRecord::new(1, "Ana").with_fixed_court(1).with_must_partner([2]),
            PlayerRecord::new(2, "Bea").with_fixed_court(2),
        ];
        let err = run(&records, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn balance_flags() {
        let records = vec![
            PlayerRecord::new(1, "Ana").with_gender(Gender::Female),
            PlayerRecord::new(2, "Bruno"),
        ];
        let roster = run(&records, 1).unwrap();
        assert!(roster.mix_required());
        assert!(roster.exact_balance());

        let open = normalize(
            &records,
            1,
            &Configuration::new().with_pool_type(PoolType::Open),
            &mut Diagnostics::new(),
        )
        .unwrap();
        assert!(!open.mix_required());
        assert!(!open.exact_balance());
    }
}
