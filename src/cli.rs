//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::synthetic_adapter::SyntheticAdapter;
use crate::domain::dashboard::Dashboard;
use crate::domain::date_range::{DateRange, parse_date};
use crate::domain::error::DashboardError;
use crate::domain::settings::{DashboardSettings, SourceKind};
use crate::domain::symbol::normalize_symbol;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Stock price dashboard", version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that renders a dashboard.
#[derive(Args, Debug, Clone, Default)]
pub struct DashboardArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub symbol: Option<String>,
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Last day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub quantity: Option<f64>,
    /// csv, sqlite or synthetic
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dashboard to stdout
    Show {
        #[command(flatten)]
        args: DashboardArgs,
    },
    /// Write the dashboard as a standalone HTML file
    Report {
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        args: DashboardArgs,
    },
    /// List symbols known to the data source, with their date coverage
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        source: Option<String>,
    },
    /// Load a CSV file into the SQLite price store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Show { args } | Command::Report { args, .. } => args.config.as_deref(),
            Command::ListSymbols { config, .. } => config.as_deref(),
            Command::Import { config, .. } | Command::Serve { config } => Some(config.as_path()),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.command.config_path()) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let configured_level = config.get_string("logging", "level");
    logging::init(&logging::level_for(cli.verbose, configured_level.as_deref()));

    let result = match cli.command {
        Command::Show { args } => run_show(&config, &args),
        Command::Report { output, args } => run_report(&config, &args, &output),
        Command::ListSymbols { source, .. } => run_list_symbols(&config, source.as_deref()),
        Command::Import { symbol, file, .. } => run_import(&config, &symbol, &file),
        Command::Serve { .. } => run_serve(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(err: DashboardError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

/// Loads the INI file at `path`; no path means built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, DashboardError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn parse_source(raw: &str) -> Result<SourceKind, DashboardError> {
    SourceKind::parse(raw).ok_or_else(|| DashboardError::ConfigInvalid {
        section: "cli".into(),
        key: "source".into(),
        reason: format!("unknown source '{raw}' (expected csv, sqlite or synthetic)"),
    })
}

/// Config file settings with command-line overrides applied.
pub fn resolve_settings(
    config: &dyn ConfigPort,
    args: &DashboardArgs,
) -> Result<DashboardSettings, DashboardError> {
    let mut settings = DashboardSettings::from_config(config)?;

    if let Some(raw) = args.symbol.as_deref() {
        settings.symbol = normalize_symbol(raw)?;
    }
    if let Some(raw) = args.source.as_deref() {
        settings.source = parse_source(raw)?;
    }
    Ok(settings)
}

pub fn resolve_range(
    args: &DashboardArgs,
    settings: &DashboardSettings,
    today: NaiveDate,
) -> Result<DateRange, DashboardError> {
    let start = args.start.as_deref().map(parse_date).transpose()?;
    let end = args.end.as_deref().map(parse_date).transpose()?;
    DateRange::resolve(start, end, today, settings.lookback_weeks)
}

pub fn build_data_port(
    config: &dyn ConfigPort,
    source: SourceKind,
) -> Result<Box<dyn DataPort + Send + Sync>, DashboardError> {
    info!(source = source.as_str(), "opening data source");
    match source {
        SourceKind::Csv => {
            let data_dir = config.get_string_or("csv", "data_dir", DEFAULT_DATA_DIR);
            Ok(Box::new(CsvAdapter::new(PathBuf::from(data_dir))))
        }
        SourceKind::Synthetic => Ok(Box::new(SyntheticAdapter::from_config(config)?)),
        #[cfg(feature = "sqlite")]
        SourceKind::Sqlite => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;

            let adapter = SqliteAdapter::from_config(config)?;
            adapter.initialize_schema()?;
            Ok(Box::new(adapter))
        }
        #[cfg(not(feature = "sqlite"))]
        SourceKind::Sqlite => Err(DashboardError::ConfigInvalid {
            section: "dashboard".into(),
            key: "source".into(),
            reason: "sqlite feature is required for the sqlite source".into(),
        }),
    }
}

/// Resolves settings, range and source, then loads one dashboard.
pub fn build_dashboard(
    config: &dyn ConfigPort,
    args: &DashboardArgs,
    today: NaiveDate,
) -> Result<Dashboard, DashboardError> {
    let settings = resolve_settings(config, args)?;
    let range = resolve_range(args, &settings, today)?;
    let quantity = args.quantity.unwrap_or(settings.default_quantity);
    let data_port = build_data_port(config, settings.source)?;

    info!(symbol = %settings.symbol, %range, quantity, "building dashboard");
    Ok(Dashboard::load(
        data_port.as_ref(),
        &settings.symbol,
        range,
        Some(quantity),
    ))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run_show(config: &dyn ConfigPort, args: &DashboardArgs) -> Result<(), DashboardError> {
    let dashboard = build_dashboard(config, args, today())?;
    print!("{}", dashboard.view());
    Ok(())
}

fn run_report(
    config: &dyn ConfigPort,
    args: &DashboardArgs,
    output: &Path,
) -> Result<(), DashboardError> {
    let dashboard = build_dashboard(config, args, today())?;
    HtmlReportAdapter::new().write(&dashboard, output)?;
    eprintln!("Report written to {}", output.display());
    Ok(())
}

fn run_list_symbols(config: &dyn ConfigPort, source: Option<&str>) -> Result<(), DashboardError> {
    let source = match source {
        Some(raw) => parse_source(raw)?,
        None => DashboardSettings::from_config(config)?.source,
    };
    let data_port = build_data_port(config, source)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {} source", source.as_str());
        return Ok(());
    }

    for symbol in &symbols {
        match data_port.get_data_range(symbol)? {
            Some((first, last, count)) => println!("{symbol}: {count} bars, {first} to {last}"),
            None => println!("{symbol}: no data"),
        }
    }
    eprintln!("{} symbols found", symbols.len());
    Ok(())
}

fn run_import(config: &dyn ConfigPort, symbol: &str, file: &Path) -> Result<(), DashboardError> {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::csv_adapter::read_bars;
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let symbol = normalize_symbol(symbol)?;
        let bars = read_bars(file)?;
        let store = SqliteAdapter::from_config(config)?;
        store.initialize_schema()?;
        let written = store.insert_bars(&symbol, &bars)?;

        info!(%symbol, file = %file.display(), written, "import complete");
        println!("Imported {written} bars for {symbol}");
        Ok(())
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config, symbol, file);
        Err(DashboardError::ConfigInvalid {
            section: "cli".into(),
            key: "import".into(),
            reason: "sqlite feature is required for import".into(),
        })
    }
}

fn run_serve(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let settings = DashboardSettings::from_config(config)?;
        let data_port: Arc<dyn DataPort + Send + Sync> =
            Arc::from(build_data_port(config, settings.source)?);

        let listen = config.get_string_or("web", "listen", DEFAULT_LISTEN);
        let addr: SocketAddr = listen.parse().map_err(|_| DashboardError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: format!("'{listen}' is not a socket address"),
        })?;

        let router = build_router(AppState::new(data_port, settings));

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "web server listening");
            eprintln!("Starting web server on {addr}");
            axum::serve(listener, router).await
        })?;
        Ok(())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config;
        Err(DashboardError::ConfigInvalid {
            section: "cli".into(),
            key: "serve".into(),
            reason: "web feature is required for serve".into(),
        })
    }
}
