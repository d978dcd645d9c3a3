//! Playkit CLI
//!
//! Entry point for the `playkit` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use playkit::config::{default_project_config_path, default_user_config_path, LogLevel, Settings};
use playkit::import::PlayKit;
use playkit::trace::Tee;
use playkit::{
    load_playkit, validate_active_overlays, EffectiveConfig, GatePolicy, RecordingObserver, ResolutionSource,
    ResolveError, Resolver, Role, Tree, TracingObserver,
};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;

#[derive(Parser)]
#[command(name = "playkit")]
#[command(about = "Resolve play kit entities for a campaign's overlays", version)]
struct Cli {
    /// Force debug logging (RUST_LOG still wins when set)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Project config file (default: ./playkit.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Whether fragments with no required overlays apply: never or always
    #[arg(long, global = true)]
    empty_gate: Option<GatePolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a play kit and validate every definition
    Check {
        /// Play kit directory (default: from config)
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate an ad-hoc set of active overlays
    Validate {
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,

        /// Overlay ids, in activation order
        overlays: Vec<String>,
    },

    /// Resolve one entity for a campaign
    Resolve {
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        /// Campaign id
        #[arg(long)]
        campaign: String,

        /// Entity id (e.g. npc-bran)
        entity: String,

        /// Viewer role: dm or player (default: from config)
        #[arg(long)]
        role: Option<Role>,

        #[arg(long)]
        json: bool,

        /// Print the resolution steps after the result
        #[arg(long)]
        trace: bool,
    },

    /// List campaigns and their active overlays
    Campaigns {
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let project_config = cli.config.clone().unwrap_or_else(default_project_config_path);
    let user_config = default_user_config_path();
    let cli_layer = cli_overrides(&cli);
    let config = match EffectiveConfig::build(user_config.as_deref(), Some(&project_config), cli_layer) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };
    let settings = match config.settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    init_logging(settings.log_level, cli.verbose);

    let request_id = Ulid::new().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);
    let _guard = span.enter();

    let code = match cli.command {
        Commands::Check { dir, json } => run_check(&settings, dir, json),
        Commands::Validate { dir, json, overlays } => run_validate(&settings, dir, json, overlays),
        Commands::Resolve {
            dir,
            campaign,
            entity,
            role,
            json,
            trace,
        } => run_resolve(&settings, dir, &campaign, &entity, role, json, trace),
        Commands::Campaigns { dir, json } => run_campaigns(&settings, dir, json),
        Commands::Config => run_config(config.with_request_id(request_id)),
    };

    tracing::debug!(exit_code = code, "done");
    process::exit(code);
}

/// Flags that override config files, as a config layer
fn cli_overrides(cli: &Cli) -> Option<Tree> {
    cli.empty_gate
        .map(|policy| Tree::from(json!({"fragments": {"empty_gate": policy.as_str()}})))
}

fn init_logging(level: LogLevel, verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::from_level(level.as_tracing_level())
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load(settings: &Settings, dir: Option<PathBuf>) -> Result<PlayKit, i32> {
    let dir = dir.unwrap_or_else(|| settings.playkit_dir.clone());
    load_playkit(&dir).map_err(|e| {
        eprintln!("Error loading play kit: {}", e);
        if let playkit::ImportError::Catalog(err) = &e {
            for problem in err.problems() {
                eprintln!("  - {}", problem);
            }
        }
        EXIT_FAILURE
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> i32 {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            EXIT_FAILURE
        }
    }
}

fn run_check(settings: &Settings, dir: Option<PathBuf>, json: bool) -> i32 {
    let playkit = match load(settings, dir) {
        Ok(p) => p,
        Err(code) => return code,
    };

    if json {
        return print_json(&playkit.summary(), settings.pretty);
    }

    let summary = playkit.summary();
    println!("Play kit valid: {}", summary.root.display());
    println!();
    println!("  Overlays:  {}", summary.overlays);
    println!("  Entities:  {}", summary.entities);
    println!("  Campaigns: {}", summary.campaigns);
    println!("  Overrides: {}", summary.overrides);
    println!("  Files:     {}", summary.files.len());
    EXIT_OK
}

fn run_validate(settings: &Settings, dir: Option<PathBuf>, json: bool, overlays: Vec<String>) -> i32 {
    let playkit = match load(settings, dir) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let result = validate_active_overlays(&overlays, playkit.catalog.overlays());
    let code = if result.accepted { EXIT_OK } else { EXIT_FAILURE };

    if json {
        let printed = print_json(&result, settings.pretty);
        return if printed == EXIT_OK { code } else { printed };
    }

    println!("{}", result.explain(&overlays));
    code
}

fn run_resolve(
    settings: &Settings,
    dir: Option<PathBuf>,
    campaign: &str,
    entity: &str,
    role: Option<Role>,
    json: bool,
    trace: bool,
) -> i32 {
    let playkit = match load(settings, dir) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let role = role.unwrap_or(settings.default_role);
    let recorder = RecordingObserver::new();
    let observer = Tee(&TracingObserver, &recorder);
    let resolver = Resolver::new(&playkit.catalog)
        .with_gate_policy(settings.empty_gate)
        .with_observer(&observer);

    let code = match resolver.resolve(entity, campaign, role) {
        Ok(resolved) => {
            if json {
                print_json(&resolved, settings.pretty)
            } else {
                print_json(&resolved.data, settings.pretty)
            }
        }
        Err(e) => report_resolve_error(&e),
    };

    if trace {
        eprintln!();
        eprintln!("Resolution trace:");
        eprintln!("{}", recorder.render());
    }
    code
}

fn report_resolve_error(err: &ResolveError) -> i32 {
    tracing::debug!(error = %err, "resolution failed");
    eprintln!("{}", err.user_message());
    if err.is_not_found() {
        EXIT_NOT_FOUND
    } else {
        eprintln!("  {}", err);
        EXIT_FAILURE
    }
}

fn run_campaigns(settings: &Settings, dir: Option<PathBuf>, json: bool) -> i32 {
    let playkit = match load(settings, dir) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let campaigns: Vec<_> = playkit.catalog.campaigns().collect();
    if json {
        return print_json(&campaigns, settings.pretty);
    }

    if campaigns.is_empty() {
        println!("No campaigns defined.");
        return EXIT_OK;
    }

    for campaign in campaigns {
        let overlays = if campaign.active_overlays.is_empty() {
            "(none)".to_string()
        } else {
            campaign.active_overlays.join(", ")
        };
        println!("{}  {}", campaign.id, campaign.name);
        println!("    overlays: {}", overlays);
        for entity in playkit.catalog.entities() {
            let kinds: Vec<String> = playkit
                .catalog
                .overrides(&campaign.id, &entity.entity_id)
                .iter()
                .map(|o| o.override_type.to_string())
                .collect();
            if !kinds.is_empty() {
                println!("    {}: {}", entity.entity_id, kinds.join(", "));
            }
        }
    }
    EXIT_OK
}

fn run_config(config: EffectiveConfig) -> i32 {
    match config.to_json() {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            EXIT_FAILURE
        }
    }
}
