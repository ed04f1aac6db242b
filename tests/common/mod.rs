use court_pairing::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[allow(dead_code)]
pub fn init_test_logger() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_test_writer()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Men named `P<id>` with the given levels, ids from 1.
#[allow(dead_code)]
pub fn leveled(levels: &[f64]) -> Vec<PlayerRecord> {
    levels
        .iter()
        .zip(1..)
        .map(|(&level, id)| PlayerRecord::new(id, format!("P{id}")).with_level(level))
        .collect()
}

#[allow(dead_code)]
pub fn open() -> Pairer {
    Pairer::new(Configuration::new().with_pool_type(PoolType::Open))
}

/// Both teams of every match, as sorted id lists.
#[allow(dead_code)]
pub fn teams(report: &PairingReport) -> Vec<[Vec<PlayerId>; 2]> {
    report
        .matches
        .iter()
        .map(|m| {
            m.player_ids.clone().map(|mut team| {
                team.sort();
                team
            })
        })
        .collect()
}

#[allow(dead_code)]
pub fn teammates(report: &PairingReport, a: PlayerId, b: PlayerId) -> bool {
    report
        .matches
        .iter()
        .flat_map(|m| m.player_ids.iter())
        .any(|team| team.contains(&a) && team.contains(&b))
}

#[allow(dead_code)]
pub fn facing(report: &PairingReport, a: PlayerId, b: PlayerId) -> bool {
    report.matches.iter().any(|m| {
        let [first, second] = &m.player_ids;
        first.contains(&a) && second.contains(&b) || first.contains(&b) && second.contains(&a)
    })
}
