use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{debug, info};

use coursedeck::app::bookmarks::BookmarkProvider;
use coursedeck::app::catalog::Catalog;
use coursedeck::app::listing::{CourseQuery, render_table, select_courses};
use coursedeck::infra::config::Config;
use coursedeck::infra::kv::{JsonFileStore, KeyValueStore};
use coursedeck::infra::logging;
use coursedeck::ui::app::UiApp;

#[derive(Debug, Parser)]
#[command(name = "coursedeck", version, about = "Browse and study courses from the terminal")]
struct Cli {
    /// Extra config file layered above the user and workspace config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive browser (default).
    Tui,
    /// Print the catalog as a table.
    Courses {
        /// Category id, e.g. `ui-ux`.
        #[arg(long)]
        category: Option<String>,
        /// Only list bookmarked courses.
        #[arg(long)]
        bookmarked: bool,
        /// Case-insensitive match on title or category.
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a shell completion script.
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_with_extra(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config),
        Command::Courses {
            category,
            bookmarked,
            search,
        } => {
            logging::init_stderr(&config.logging.level)?;
            let query = CourseQuery {
                category,
                bookmarked_only: bookmarked,
                search,
            };
            print_courses(&config, &query)
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "coursedeck", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    Catalog::load(config.catalog.path.as_deref()).context("failed to load course catalog")
}

fn run_tui(config: Config) -> Result<()> {
    let data_dir = config.data_dir();
    let log_path = logging::init_file(&config.logging.level, &data_dir)?;
    info!(log = %log_path.display(), "starting coursedeck");

    let catalog = load_catalog(&config)?;
    let store: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&data_dir)
            .with_context(|| format!("failed to open data directory {}", data_dir.display()))?,
    );
    UiApp::new(config, catalog, store)?.run()
}

fn print_courses(config: &Config, query: &CourseQuery) -> Result<()> {
    let catalog = load_catalog(config)?;
    let provider = if config.defaults.seed_bookmarks {
        BookmarkProvider::new(catalog.bookmark_seed())
    } else {
        BookmarkProvider::empty()
    };
    let snapshot = provider.handle().snapshot()?;
    let courses = select_courses(&catalog, &snapshot, query)?;
    debug!(count = courses.len(), ?query, "listing courses");
    print!("{}", render_table(&courses, &snapshot));
    Ok(())
}
