// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use leadgen_app::{AppCommand, AppState};
use leadgen_store::{AuthSession, SqliteStore};
use leadgen_testkit::LeadFaker;
use runtime::CliRuntime;
use std::env;
use std::path::PathBuf;

const DEMO_SEED: u64 = 42;
const DEMO_SESSIONS: usize = 4;
const DEMO_LEADS_PER_SESSION: usize = 6;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `leadgen --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let log_path = logging::init(&config)?;
    tracing::info!(
        config = %options.config_path.display(),
        db = %db_path.display(),
        log = %log_path.display(),
        demo = options.demo,
        "starting leadgen"
    );

    let store = SqliteStore::open(&db_path).with_context(|| {
        format!(
            "open session database {} -- if this path is wrong, set [storage].db_path or LEADGEN_DB_PATH",
            db_path.display()
        )
    })?;
    let mut session = AuthSession::restore(store).context("restore saved session")?;

    if options.logout {
        session.logout().context("clear saved session")?;
        println!("signed out");
        return Ok(());
    }

    let assistant = config.assistant().with_context(|| {
        format!(
            "invalid [assist] config in {}; fix the delay values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let mut state = AppState {
        section: config.start_section(),
        sort: config.sort_spec(),
        ..AppState::default()
    };
    if options.demo {
        LeadFaker::new(DEMO_SEED)
            .seed_workspace(&mut state.workspace, DEMO_SESSIONS, DEMO_LEADS_PER_SESSION)
            .context("seed demo workspace")?;
    }
    if session.is_authenticated() {
        state.dispatch(AppCommand::SignedIn);
    } else if let Some(path) = config.start_path() {
        state.dispatch(AppCommand::GoToPath(path.to_owned()));
    }

    let mut runtime = CliRuntime::new(session, assistant, config.sender_profile());
    let result = leadgen_tui::run_app(&mut state, &mut runtime);
    tracing::info!(ok = result.is_ok(), "leadgen exited");
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    logout: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        logout: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--logout" => {
                options.logout = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("leadgen");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved session database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo leads (in-memory session)");
    println!("  --check                  Validate config + session database, then exit");
    println!("  --logout                 Clear the saved session and exit");
    println!("  --help                   Show this help");
}
