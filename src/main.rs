use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hubindex::catalog::{CATEGORIES, PluginCatalog};
use hubindex::index::{License, build_index_from_reader, stats::show_stats};
use hubindex::output::{print_detail, print_summaries};
use hubindex::query::SortBy;
use hubindex::search::{PageOptions, PluginFilters, PluginSearch};
use hubindex::utils::AppConfig;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hubindex")]
#[command(about = "Build and query a static plugin search index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index artifact from a JSON array of records on stdin
    Build {
        /// Artifact to write
        output: PathBuf,

        /// Hide the progress spinner
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search an index artifact
    Search {
        /// Search terms (empty lists everything)
        #[arg(trailing_var_arg = true)]
        term: Vec<String>,

        /// Artifact file or URL (defaults to the configured location)
        #[arg(short, long)]
        index: Option<String>,

        /// Only plugins in any of these categories
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// open-source or closed-source
        #[arg(long)]
        license: Option<String>,

        /// Highest supported API major version
        #[arg(long, allow_negative_numbers = true)]
        api_major: Option<i64>,

        /// downloads, stars, updated or newest
        #[arg(short, long, default_value = "downloads")]
        sort: String,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,

        /// 1-based result page
        #[arg(short, long)]
        page: Option<usize>,

        /// Results per page
        #[arg(long, default_value_t = 20)]
        per_page: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Show artifact statistics
    Stats {
        /// Artifact to inspect
        artifact: PathBuf,
    },
    /// Look up full plugin records by id or bare name
    Lookup {
        /// owner/name, or just name
        id: String,

        /// Directory of <owner>/<name>.json records
        #[arg(long)]
        catalog: PathBuf,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known categories
    Categories,
}

fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { output, quiet } => {
            let summary = build_index_from_reader(io::stdin().lock(), &output, quiet)
                .with_context(|| format!("Failed to build {}", output.display()))?;
            println!("Indexed {} documents", summary.documents);
        }
        Commands::Search {
            term,
            index,
            categories,
            license,
            api_major,
            sort,
            limit,
            page,
            per_page,
            json,
            no_color,
        } => {
            let mut config = AppConfig::load()?;
            if let Some(location) = index {
                config.artifact_url = location;
                config.artifact_path = String::new();
            }
            let limit = limit.or_else(|| page.is_none().then_some(config.default_limit));

            let search = PluginSearch::from_config(&config);
            let filters = PluginFilters {
                query: Some(term.join(" ")),
                categories: Some(categories),
                api_major,
                license: license.as_deref().map(License::parse),
            };
            let options = PageOptions {
                sort: SortBy::parse(&sort),
                limit,
                page,
                per_page,
            };

            let summaries = search.search(&filters, &options).await;
            if let Some(e) = search.search_error() {
                bail!("Search failed: {}", e);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                let total = search.get_total_count(&filters).await?;
                print_summaries(&summaries, total, !no_color && io::stdout().is_terminal())?;
            }
        }
        Commands::Stats { artifact } => {
            show_stats(&artifact)?;
        }
        Commands::Lookup { id, catalog, json } => {
            let catalog = PluginCatalog::from_dir(&catalog)
                .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;

            let ids: Vec<String> = catalog
                .find_ids_by_name(&id)
                .into_iter()
                .filter(|candidate| catalog.get(candidate).is_ok())
                .collect();
            if ids.is_empty() {
                bail!("Plugin not found: {}", id);
            }

            for id in ids {
                if json {
                    println!("{}", serde_json::to_string_pretty(catalog.get(&id)?)?);
                } else {
                    print_detail(&catalog.detail(&id)?, io::stdout().is_terminal())?;
                }
            }
        }
        Commands::Categories => {
            for category in CATEGORIES {
                println!("{:18} {:18} {}", category.id, category.name, category.description);
            }
        }
    }

    Ok(())
}
