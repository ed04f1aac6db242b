use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use court_pairing::prelude::*;
use serde::de::DeserializeOwned;

fn cli() -> Command {
    Command::new("court-pairing")
        .about("Pairs players on courts and moves them along a ladder")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("pair")
                .about("Builds the matches of a session")
                .arg(
                    arg!(<ROSTER> "Path to a json array of players")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--courts <COURTS> "Number of courts")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--pool [POOL] "Pool type: mixed or open (default from PAIRING_POOL_TYPE)")
                        .value_parser(clap::value_parser!(PoolType)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible pairing")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"tie-threshold" [TIE_THRESHOLD] "Largest average difference reported as a tie")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(arg!(--json "Print the report as json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("advance")
                .about("Moves winners up and losers down one court")
                .arg(
                    arg!(<ROSTER> "Path to a json array of players")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<RESULTS> "Path to a json array of round results")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--courts <COURTS> "Number of courts")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("pair", sub_m)) => pair(sub_m),
        Some(("advance", sub_m)) => advance(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(m: &'a ArgMatches, name: &str) -> Result<&'a T> {
    m.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument {name}"))
}

fn read_json<T: DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid json in {}", path.display()))
}

fn pair(m: &ArgMatches) -> Result<()> {
    let records: Vec<PlayerRecord> = read_json(required(m, "ROSTER")?)?;
    let courts = *required::<usize>(m, "courts")?;

    let mut config = Configuration::from_env();
    if let Some(&pool) = m.get_one::<PoolType>("pool") {
        config = config.with_pool_type(pool);
    }
    if let Some(&threshold) = m.get_one::<f64>("tie-threshold") {
        config = config.with_tie_threshold(threshold);
    }
    let seed = m.get_one::<u64>("seed").copied();

    let report = generate_pairings(&records, courts, config, seed).context("pairing failed")?;
    if m.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn advance(m: &ArgMatches) -> Result<()> {
    let records: Vec<PlayerRecord> = read_json(required(m, "ROSTER")?)?;
    let results: Vec<RoundResult> = read_json(required(m, "RESULTS")?)?;
    let courts = *required::<usize>(m, "courts")?;

    let next = Ladder::new(courts)
        .advance_round(&records, &results)
        .context("could not advance the ladder")?;
    println!("{}", serde_json::to_string_pretty(&next)?);
    Ok(())
}
