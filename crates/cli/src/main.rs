mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coin_dashboard_core::models::command::{Command, Outcome};
use coin_dashboard_core::models::filter::FilterState;
use coin_dashboard_core::models::preferences::Theme;
use coin_dashboard_core::models::settings::DashboardSettings;
use coin_dashboard_core::models::sort::SortColumn;
use coin_dashboard_core::storage::file::FileBackend;
use coin_dashboard_core::Dashboard;

use terminal::{Screen, SparklineBackend, TableSink};

/// Width of the 7d sparkline column, in characters.
const SPARKLINE_WIDTH: usize = 24;

/// Crypto market table in the terminal.
///
/// Preferences (currency, theme, favorites) persist between runs in the
/// preference file.
#[derive(Debug, Parser)]
#[command(name = "coin-dashboard", version)]
struct Args {
    /// Settings file (JSON); missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preference file
    #[arg(long, default_value = ".coin-dashboard/preferences.json")]
    prefs: PathBuf,

    /// Switch the quote currency (persisted), e.g. eur
    #[arg(long)]
    currency: Option<String>,

    /// Switch the theme (persisted): dark or light
    #[arg(long)]
    theme: Option<String>,

    /// Toggle an asset id in favorites (persisted); repeatable
    #[arg(long = "star", value_name = "ID")]
    star: Vec<String>,

    /// Case-insensitive search on name, symbol and id
    #[arg(long, default_value = "")]
    search: String,

    /// Only show favorites
    #[arg(long)]
    favorites_only: bool,

    /// Header clicks, in order (rank, name, price, change, volume, market_cap);
    /// repeat a column to cycle ascending → descending → unsorted
    #[arg(long = "sort", value_name = "COLUMN")]
    sort: Vec<String>,

    /// Print the detail link of a visible asset
    #[arg(long, value_name = "ID")]
    open: Option<String>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<DashboardSettings> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            DashboardSettings::from_json(&raw)
                .with_context(|| format!("parsing settings from {}", path.display()))
        }
        None => Ok(DashboardSettings::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = load_settings(args.config.as_ref())?;
    let backend = FileBackend::open(&args.prefs)
        .with_context(|| format!("opening preferences at {}", args.prefs.display()))?;

    let screen = Screen::shared();
    let mut dashboard = Dashboard::with_coingecko(
        settings,
        Box::new(backend),
        Box::new(TableSink::new(screen.clone())),
        Box::new(SparklineBackend::new(screen.clone(), SPARKLINE_WIDTH)),
    )?;

    if let Some(theme) = &args.theme {
        let theme = Theme::parse(theme)
            .with_context(|| format!("unknown theme '{theme}', expected dark or light"))?;
        dashboard.dispatch(Command::SetTheme(theme)).await?;
    }

    let loaded = match &args.currency {
        Some(code) => dashboard.dispatch(Command::SetCurrency(code.clone())).await?,
        None => dashboard.start().await,
    };
    match &loaded {
        Outcome::Refreshed { assets } => info!(assets, "market data loaded"),
        Outcome::RefreshFailed { reason } => warn!(%reason, "market data unavailable"),
        _ => {}
    }

    for id in &args.star {
        dashboard.dispatch(Command::ToggleFavorite(id.clone())).await?;
    }

    dashboard
        .dispatch(Command::SetFilter(FilterState::new(
            args.search.clone(),
            args.favorites_only,
        )))
        .await?;

    for key in &args.sort {
        let column = SortColumn::from_key(key)
            .with_context(|| format!("unknown sort column '{key}'"))?;
        dashboard.dispatch(Command::SetSort(column)).await?;
    }

    print!("{}", screen.borrow().draw());
    if let Outcome::RefreshFailed { reason } = &loaded {
        eprintln!("refresh failed: {reason}");
    }

    if let Some(id) = &args.open {
        if let Outcome::Navigate { url } = dashboard.dispatch(Command::ActivateRow(id.clone())).await? {
            println!("{url}");
        }
    }

    dashboard.shutdown();
    Ok(())
}
