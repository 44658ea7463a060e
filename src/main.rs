use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser as ClapParser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use raven_menu::app::{self, DashboardOptions};
use raven_menu::catalog::{self, Action, ActionItem};
use raven_menu::config::{self, AppConfig};
use raven_menu::theme;

const NOT_A_TERMINAL: &str = "This program requires a terminal interface.";

#[derive(ClapParser, Debug)]
#[command(
    name = "raven-menu",
    version,
    about = "Terminal dashboard: browse administrative actions and run them by name"
)]
struct Cli {
    /// Catalog file (TOML/YAML/JSON) to use instead of the built-in actions
    #[arg(long, value_name = "MENU_FILE")]
    menu: Option<PathBuf>,

    /// Config file (TOML/YAML/JSON); defaults to ~/.raven/config.*
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Color theme: dark or light
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the catalog and exit without opening the dashboard
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Validate the catalog and config, then exit
    #[arg(long, default_value_t = false, conflicts_with = "list")]
    check: bool,
}

fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let is_json = matches!(
        std::env::var("RAVEN_LOG_FORMAT").ok().as_deref(),
        Some("json" | "JSON")
    );
    let file = log_file.and_then(|p| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(p)
            .map_err(|e| eprintln!("raven-menu: cannot open log file {}: {e}", p.display()))
            .ok()
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match (file, is_json) {
        (Some(f), true) => builder.with_writer(Mutex::new(f)).json().init(),
        (Some(f), false) => builder.with_writer(Mutex::new(f)).with_ansi(false).init(),
        (None, true) => builder.with_writer(io::stderr).json().init(),
        (None, false) => builder
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .init(),
    }
}

fn main() {
    let code = match cli_main() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "raven-menu error");
            eprintln!("raven-menu: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

fn cli_main() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    let log_file = std::env::var_os("RAVEN_LOG_FILE")
        .map(PathBuf::from)
        .or_else(|| cfg.log_file.clone());
    init_tracing(log_file.as_deref());

    let menu_path = cli.menu.clone().or_else(|| cfg.menu.clone());
    if cli.check {
        return Ok(check(menu_path.as_deref(), &cfg));
    }
    for w in config::validate_app_config(&cfg) {
        warn!("{w}");
    }

    let catalog = match &menu_path {
        Some(p) => catalog::load_catalog_file(p)?,
        None => catalog::load(),
    };
    info!(
        entries = catalog.len(),
        source = %menu_path.as_deref().map_or("built-in".into(), |p| p.display().to_string()),
        "catalog loaded"
    );

    if cli.list {
        print_catalog(&catalog);
        return Ok(0);
    }

    // Nothing below may run without a terminal: no mode changes happen before this.
    if !io::stdin().is_terminal() {
        error!("standard input is not a terminal");
        eprintln!("{NOT_A_TERMINAL}");
        return Ok(1);
    }

    let theme_name = cli.theme.as_deref().or(cfg.theme.as_deref());
    let options = DashboardOptions {
        title: cfg.title().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ready_message: cfg.ready_message().to_string(),
        theme: theme::load_theme(theme_name, cfg.theme_overrides.as_ref()),
    };
    app::run_interactive(&catalog, options, cfg.shell.as_deref())?;
    Ok(0)
}

fn describe(action: &Action) -> String {
    match action {
        Action::External(cmd) => cmd.clone(),
        Action::ShowHelp => "[built-in] help".to_string(),
        Action::ShowSystemInfo => "[built-in] system information".to_string(),
        Action::Quit => "[built-in] quit".to_string(),
    }
}

fn print_catalog(items: &[ActionItem]) {
    for (i, item) in items.iter().enumerate() {
        println!("{:>2}. {:<28} {}", i + 1, item.title, describe(&item.action));
    }
}

fn check(menu: Option<&Path>, cfg: &AppConfig) -> i32 {
    let mut issues: Vec<String> = Vec::new();
    match menu {
        Some(p) => match catalog::parse_catalog_file(p) {
            Ok(file) => issues.extend(catalog::validate_entries(&file.items)),
            Err(e) => issues.push(format!("{e:#}")),
        },
        None => issues.extend(catalog::validate_catalog(&catalog::load())),
    }
    for w in config::validate_app_config(cfg) {
        println!("warning: {w}");
    }
    for i in &issues {
        println!("error: {i}");
    }
    if issues.is_empty() {
        println!("ok");
        0
    } else {
        1
    }
}
