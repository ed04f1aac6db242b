//! Atomic placement units: players tied by mandatory relations or pinned to a court.

use tracing::{debug, instrument};

use crate::{
    constants::COURT_CAPACITY,
    error::PairingError,
    roster::{PlayerIndex, Roster},
    union_find::UnionFind,
};

/// Players that must be seated on the same court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Members, ascending.
    pub members: Vec<PlayerIndex>,
    /// Court every member is pinned to, if any.
    pub fixed_court: Option<usize>,
}

/// Groups the roster along must-partner and must-oppose edges.
///
/// Connected components of two or more players become clusters, as do lone players with a fixed
/// court. Clusters come out ordered by their smallest member.
///
/// # Errors
/// [`PairingError::FixedCourtConflict`] when a component joins two different fixed courts,
/// [`PairingError::ClusterTooLarge`] when a component does not fit on one court.
#[instrument(skip_all)]
pub fn build_clusters(roster: &Roster) -> Result<Vec<Cluster>, PairingError> {
    let mut uf = UnionFind::new(roster.len());
    // fixed court (and the player holding it) of each root
    let mut pinned: Vec<Option<(usize, PlayerIndex)>> = roster
        .iter()
        .map(|(p, player)| player.fixed_court.map(|court| (court, p)))
        .collect();

    for (p, player) in roster.iter() {
        for q in player.mandatory().filter(|&q| p < q) {
            let Some((kept, absorbed)) = uf.union(p.0, q.0) else {
                continue;
            };
            pinned[kept] = match (pinned[kept], pinned[absorbed]) {
                (Some((a, holder_a)), Some((b, holder_b))) if a != b => {
                    return Err(PairingError::FixedCourtConflict {
                        first: roster.name(holder_a).to_string(),
                        first_court: a,
                        second: roster.name(holder_b).to_string(),
                        second_court: b,
                    })
                }
                (Some(a), _) => Some(a),
                (None, b) => b,
            };
        }
    }

    let mut clusters = vec![];
    for group in uf.groups() {
        let root = uf.find(group[0]);
        let fixed_court = pinned[root].map(|(court, _)| court);
        if group.len() < 2 && fixed_court.is_none() {
            continue;
        }
        let members = group.into_iter().map(PlayerIndex).collect::<Vec<_>>();
        if members.len() > COURT_CAPACITY {
            return Err(PairingError::ClusterTooLarge {
                members: roster.names(&members),
                size: members.len(),
            });
        }
        clusters.push(Cluster {
            members,
            fixed_court,
        });
    }
    debug!(clusters = clusters.len());
    Ok(clusters)
}
