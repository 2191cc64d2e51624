//! `ponedit`: edit OLT device profiles
//!
//! Works on a device snapshot file (JSON or YAML). Every mutation goes
//! through a profile transaction, so referenced profiles are never edited in
//! place and unreadable input never reaches the device.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pon_engine::{EngineConfig, EngineError, LogFormat, ProfileEngine};
use pon_schema::ProfileKind;
use pon_store::SnapshotStore;
use tracing::{debug, error};

use crate::commands::ModifyOptions;

fn kind_arg() -> Arg {
    Arg::new("kind")
        .required(true)
        .value_parser(value_parser!(ProfileKind))
        .help("Profile kind: flow, vlan, security, onu-flow, onu-tcont, onu-vlan, igmp, onu-igmp, service")
}

fn name_arg() -> Arg {
    Arg::new("name").required(true).help("Profile name")
}

fn cli() -> Command {
    Command::new("ponedit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit OLT device profiles safely")
        .subcommand_required(true)
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Device snapshot file (.json, .yaml)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (TOML)"),
        )
        .arg(
            Arg::new("log-filter")
                .long("log-filter")
                .global(true)
                .help("Log filter directive, e.g. debug or pon_engine=trace"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(Command::new("list").about("List profiles of a kind").arg(kind_arg()))
        .subcommand(Command::new("show").about("Show one profile").arg(kind_arg()).arg(name_arg()))
        .subcommand(
            Command::new("usage")
                .about("Show what references a profile")
                .arg(kind_arg())
                .arg(name_arg()),
        )
        .subcommand(
            Command::new("modify")
                .about("Edit a profile and commit it")
                .arg(kind_arg())
                .arg(name_arg())
                .arg(
                    Arg::new("set")
                        .long("set")
                        .action(ArgAction::Append)
                        .value_parser(commands::parse_assignment)
                        .help("Field=value; repeatable, applied in order"),
                )
                .arg(
                    Arg::new("copy-as")
                        .long("copy-as")
                        .help("New name, assigned before editing; required for profiles in use"),
                )
                .arg(Arg::new("commit-as").long("commit-as").help("Name to commit under"))
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the resulting device body instead of committing"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an unused profile")
                .arg(kind_arg())
                .arg(name_arg()),
        )
        .subcommand(Command::new("fields").about("Describe a kind's editable fields").arg(kind_arg()))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<EngineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(filter) = matches.get_one::<String>("log-filter") {
        config = config.with_log_filter(filter.clone());
    }
    if matches.get_flag("json-logs") {
        config = config.with_log_format(LogFormat::Json);
    }
    Ok(config)
}

fn open_engine(matches: &ArgMatches, config: EngineConfig) -> anyhow::Result<ProfileEngine<SnapshotStore>> {
    let path = matches
        .get_one::<PathBuf>("store")
        .context("--store <FILE> is required for this command")?;
    let store = SnapshotStore::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(ProfileEngine::new(store).with_config(config))
}

fn kind(args: &ArgMatches) -> anyhow::Result<ProfileKind> {
    args.get_one::<ProfileKind>("kind").copied().context("missing profile kind")
}

fn name(args: &ArgMatches) -> anyhow::Result<&str> {
    args.get_one::<String>("name").map(String::as_str).context("missing profile name")
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(matches)?;
    logging::init(&config.log_filter, config.log_format)?;
    let mut out = std::io::stdout().lock();
    if let Some((command, _)) = matches.subcommand() {
        debug!(command, "running");
    }

    match matches.subcommand() {
        Some(("fields", args)) => commands::fields(kind(args)?, &mut out),
        Some(("list", args)) => commands::list(&open_engine(matches, config)?, kind(args)?, &mut out),
        Some(("show", args)) => commands::show(&open_engine(matches, config)?, kind(args)?, name(args)?, &mut out),
        Some(("usage", args)) => commands::usage(&open_engine(matches, config)?, kind(args)?, name(args)?, &mut out),
        Some(("delete", args)) => commands::delete(&open_engine(matches, config)?, kind(args)?, name(args)?, &mut out),
        Some(("modify", args)) => {
            let options = ModifyOptions {
                sets: args
                    .get_many::<(String, String)>("set")
                    .map(|sets| sets.cloned().collect())
                    .unwrap_or_default(),
                copy_as: args.get_one::<String>("copy-as").cloned(),
                commit_as: args.get_one::<String>("commit-as").cloned(),
                dry_run: args.get_flag("dry-run"),
            };
            commands::modify(&open_engine(matches, config)?, kind(args)?, name(args)?, &options, &mut out)
        }
        _ => Ok(()),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<EngineError>() {
                Some(loss @ EngineError::PartialCommitLoss { body, .. }) => {
                    let body = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                    error!(error = %loss, "commit lost the profile");
                    eprintln!("{loss}");
                    eprintln!("restore manually with this body:\n{body}");
                    ExitCode::from(3)
                }
                Some(engine) if engine.is_recoverable() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn modify_collects_repeated_sets() {
        let matches = cli()
            .try_get_matches_from([
                "ponedit", "--store", "olt.json", "modify", "flow", "default", "--set", "UsCdr=64", "--set",
                "DsQueuingPriority=9", "--dry-run",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(kind(args).unwrap(), ProfileKind::Flow);
        let sets: Vec<(String, String)> = args.get_many::<(String, String)>("set").unwrap().cloned().collect();
        assert_eq!(sets[1], ("DsQueuingPriority".to_string(), "9".to_string()));
        assert!(args.get_flag("dry-run"));
        assert_eq!(
            matches.get_one::<PathBuf>("store").unwrap(),
            &PathBuf::from("olt.json")
        );
    }

    #[test]
    fn unknown_kind_is_a_usage_error() {
        assert!(cli().try_get_matches_from(["ponedit", "list", "bogus"]).is_err());
    }
}
