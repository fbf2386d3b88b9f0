//! Boardshelf CLI - browse a board game collection from the terminal

mod browse;
mod client;
mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use boardshelf_core::{
    CatalogSession, FacetKind, FilterField, FilterState, FilterStore, MultiField, SortColumn, SortDirection, ViewMode,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{HttpCatalogApi, HttpConfig};

#[derive(Parser)]
#[command(name = "boardshelf-cli")]
#[command(author, version, about = "Boardshelf board game collection browser", long_about = None)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long, env = "BOARDSHELF_API_BASE", default_value = "http://127.0.0.1:8000", global = true)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List facet values ranked by how many games use them
    Facets {
        /// Only this facet (mechanics, categories, designers, artists, publishers)
        #[arg(short, long)]
        kind: Option<FacetKind>,

        /// Show at most this many values per facet
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },

    /// Query games and print them
    Games(GamesArgs),

    /// Re-import the collection from the upstream game database
    Refresh {
        /// Collection owner; the server default is used when omitted
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Interactive shell for filtering and sorting
    Browse,
}

#[derive(Args)]
struct GamesArgs {
    /// Mechanic to require (repeatable)
    #[arg(short, long = "mechanic")]
    mechanics: Vec<String>,

    /// Category to require (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    #[arg(long = "designer")]
    designers: Vec<String>,

    #[arg(long = "artist")]
    artists: Vec<String>,

    #[arg(long = "publisher")]
    publishers: Vec<String>,

    #[arg(long)]
    year_min: Option<u32>,

    #[arg(long)]
    year_max: Option<u32>,

    /// Player count the game must support
    #[arg(short, long)]
    players: Option<u32>,

    /// Longest playing time in minutes
    #[arg(long)]
    time_max: Option<u32>,

    #[arg(long)]
    weight_min: Option<f64>,

    #[arg(long)]
    weight_max: Option<f64>,

    #[arg(long)]
    rating_min: Option<f64>,

    /// Free text matched against game names
    #[arg(short, long)]
    search: Option<String>,

    /// Sort column (list view only)
    #[arg(long)]
    sort: Option<SortColumn>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// tile or list
    #[arg(long, default_value = "tile")]
    view: ViewMode,
}

impl GamesArgs {
    /// Apply the flags through the filter store, as a user would in the browser
    fn into_store(self) -> Result<FilterStore> {
        let mut store = FilterStore::new();
        for mechanic in &self.mechanics {
            store.toggle_mechanic(mechanic);
        }
        store.set_multi(MultiField::Categories, self.categories);
        store.set_multi(MultiField::Designers, self.designers);
        store.set_multi(MultiField::Artists, self.artists);
        store.set_multi(MultiField::Publishers, self.publishers);

        let scalars = [
            (FilterField::YearMin, self.year_min.map(|v| v.to_string())),
            (FilterField::YearMax, self.year_max.map(|v| v.to_string())),
            (FilterField::Players, self.players.map(|v| v.to_string())),
            (FilterField::TimeMax, self.time_max.map(|v| v.to_string())),
            (FilterField::WeightMin, self.weight_min.map(|v| v.to_string())),
            (FilterField::WeightMax, self.weight_max.map(|v| v.to_string())),
            (FilterField::RatingMin, self.rating_min.map(|v| v.to_string())),
            (FilterField::Search, self.search),
        ];
        for (field, value) in scalars {
            if let Some(value) = value {
                store.set(field, &value)?;
            }
        }

        let direction = if self.desc { SortDirection::Desc } else { SortDirection::Asc };
        store.set_sort(self.sort, direction);
        store.set_view_mode(self.view);
        Ok(store)
    }
}

pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,boardshelf_core=info,boardshelf_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api = HttpCatalogApi::new(HttpConfig {
        base_url: cli.api_base,
        timeout: Duration::from_secs(cli.timeout_secs),
    })
    .context("Failed to create HTTP client")?;
    let session = CatalogSession::new(api);

    match cli.command {
        Commands::Facets { kind, limit } => cmd_facets(&session, kind, limit).await?,
        Commands::Games(args) => cmd_games(&session, args).await?,
        Commands::Refresh { username } => cmd_refresh(&session, username).await?,
        Commands::Browse => {
            let mut store = FilterStore::new();
            browse::run(&session, &mut store).await?;
        }
    }

    Ok(())
}

async fn cmd_facets(session: &CatalogSession<HttpCatalogApi>, kind: Option<FacetKind>, limit: usize) -> Result<()> {
    let catalog = session
        .load_facets()
        .await
        .context("Failed to load facets")?;
    println!("{}", output::facets(&catalog, kind, limit));
    Ok(())
}

async fn cmd_games(session: &CatalogSession<HttpCatalogApi>, args: GamesArgs) -> Result<()> {
    let store = args.into_store()?;
    let outcome = session.query(store.snapshot()).await;
    if let Some(e) = outcome.error() {
        if !e.is_malformed() {
            anyhow::bail!("Games query failed: {}", e);
        }
        eprintln!("Warning: {}", e.user_message());
    }

    let filters = output::summary(store.snapshot());
    println!("{}\n", filters);
    println!("{}", output::view(&session.render(store.snapshot())));
    Ok(())
}

async fn cmd_refresh(session: &CatalogSession<HttpCatalogApi>, username: Option<String>) -> Result<()> {
    let pb = spinner("Refreshing collection...");
    let result = session.refresh(username.as_deref(), FilterState::default).await;
    pb.finish_and_clear();

    let report = result.context("Refresh failed")?;
    match session.api().last_refresh() {
        Some(summary) => println!(
            "Refreshed collection for {}: {} of {} games loaded{}",
            summary.username,
            summary.total_hydrated,
            summary.total_in_collection,
            if summary.cached { " (cached)" } else { "" }
        ),
        None => println!("Refresh complete"),
    }
    if let Some(e) = report.facets_error {
        println!("Warning: facets could not be reloaded: {}", e);
    }
    println!("{} game(s) in the collection", session.results().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardshelf_core::{serialize, to_query_string};

    #[test]
    fn test_flags_go_through_store() {
        let cli = Cli::try_parse_from([
            "boardshelf-cli",
            "games",
            "--mechanic",
            "Worker Placement",
            "--year-min",
            "2010",
            "--sort",
            "year",
            "--desc",
            "--view",
            "list",
        ])
        .unwrap();
        let Commands::Games(args) = cli.command else {
            panic!("expected games");
        };

        let store = args.into_store().unwrap();
        let state = store.snapshot();
        assert_eq!(to_query_string(&serialize(state)), "mechanics=Worker+Placement&year_min=2010");
        assert_eq!(state.sort_column(), Some(SortColumn::Year));
        assert_eq!(state.sort_direction(), SortDirection::Desc);
        assert_eq!(state.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_facet_kind_flag() {
        let cli = Cli::try_parse_from(["boardshelf-cli", "facets", "--kind", "designers"]).unwrap();
        assert!(matches!(cli.command, Commands::Facets { kind: Some(FacetKind::Designers), limit: 25 }));
    }
}
