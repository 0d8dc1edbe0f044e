use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskol::config::{self, CliOverrides};
use taskol::links::SymlinkLinker;
use taskol::{logging, output, refresh};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; called exactly once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "taskol")]
#[command(about = "Keep a directory of shortcuts to in-progress task folders")]
#[command(long_about = "\
Keep a directory of shortcuts to in-progress task folders

Every project folder under --target is scanned for task folders (t_*), and a
shortcut to each task is created in --link. Existing shortcuts in --link are
deleted first, so the directory always mirrors the current tree.

Layout:

  work/                              # --target
  ├── ABC_新製品/                     # project: abbreviation ABC, name 新製品
  │   ├── t_20230105_Design_Review/  # task dated 2023-01-05
  │   ├── t_FinalReview/             # undated task
  │   └── #t_parked/                 # ignored (see --ignores)
  └── !archive/                      # ignored project

Link names follow --format. Placeholders:
  :pabb:  :pname:  :tname:  :tdate:  :tdate-:  :tdate年月日:

Run 'taskol gen-config' to generate a documented taskol.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Root directory holding the project folders
    #[arg(long, global = true)]
    target: Option<String>,

    /// Directory receiving the shortcuts
    #[arg(long, global = true)]
    link: Option<String>,

    /// Link name template
    #[arg(long, global = true)]
    format: Option<String>,

    /// Skip folders and links whose name starts with any of these characters
    #[arg(long, global = true)]
    ignores: Option<String>,

    /// Link file extension
    #[arg(long, global = true)]
    extension: Option<String>,

    /// Log extra detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Delete existing shortcuts and create one per task (default)
    Refresh,
    /// Show the shortcuts a refresh would create, without touching anything
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration and show the resolved settings
    Check,
    /// Print a stock taskol.toml with all options documented
    GenConfig,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            target: self.target.clone(),
            link: self.link.clone(),
            format: self.format.clone(),
            ignores: self.ignores.clone(),
            extension: self.extension.clone(),
            log_level: self.verbose.then(|| "debug".to_string()),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let load = || -> Result<config::TaskolConfig, config::ConfigError> {
        let raw = config::load_raw_config(&cli.config)?;
        let cfg = config::resolve_config(raw, &cli.overrides())?;
        logging::init(&cfg.logging);
        tracing::debug!(config = %cli.config.display(), "configuration resolved");
        Ok(cfg)
    };

    match cli.command.as_ref().unwrap_or(&Command::Refresh) {
        Command::Refresh => {
            let cfg = load()?;
            let (plan, report) = refresh::refresh(&cfg, &SymlinkLinker)?;
            output::print_plan(&plan);
            println!();
            output::print_report(&report);
        }
        Command::Plan { json } => {
            let cfg = load()?;
            let plan = refresh::plan(&cfg)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Command::Check => {
            let cfg = load()?;
            cfg.validate()?;
            let template = cfg.template()?;
            output::print_check(&cfg, &template);
            refresh::Layout::from_config(&cfg).check()?;
            println!("==> Configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
