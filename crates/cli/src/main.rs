use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use recruit_client::{load_catalog, BundleSource, HttpSource, RecruitmentSource, SyncOrigin};
use recruit_engine::{RecruitSession, TagCatalog, TagFinder, Visibility};
use recruit_model::{Tag, TagId};
use recruit_protocol::SetupPayload;
use recruit_server::{Database, ServerConfig};
use recruit_store::{LocalStore, Preferences};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::render::{listing_text, tag_listing, Presenter, QueryReport, SelectedName};

mod config;
mod render;

#[derive(Parser)]
#[command(name = "recruit")]
#[command(about = "Find which operators a set of recruitment tags can yield", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (default: ./recruit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data API base URL (overrides RECRUIT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read tags and operators from a bundle file instead of the API
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Local cache directory (overrides RECRUIT_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Locale for tag and operator names: en|zh|ja (overrides RECRUIT_LOCALE)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tag catalog by category
    Tags(TagsArgs),

    /// Resolve the sections produced by a tag selection
    Query(QueryArgs),

    /// Refresh the local tag and operator cache
    Sync(SyncArgs),

    /// Serve the data API over HTTP
    Serve(ServeArgs),

    /// Load a setup payload into the SQLite database
    Setup(SetupArgs),
}

#[derive(Args)]
struct TagsArgs {
    /// Only tags whose name starts with this prefix (case-insensitive)
    #[arg(long)]
    prefix: Option<String>,

    /// Step the highlighted hit forward this many times, wrapping around
    #[arg(long, default_value_t = 0, requires = "prefix")]
    next: usize,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// Tag id to select; repeat for more (at most five are kept)
    #[arg(long = "tag", required = true)]
    tags: Vec<TagId>,

    /// Hide sections containing tier 2-3 operators
    #[arg(long)]
    hide_common: bool,

    /// Hide sections made only of tier 1 operators
    #[arg(long)]
    hide_lowest: bool,

    /// Store the visibility flags as the new defaults
    #[arg(long)]
    remember: bool,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SyncArgs {
    /// Store the published data even when the cache looks current
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Args)]
struct SetupArgs {
    /// JSON payload: { tags: { data }, recruitment_list: { data } }
    #[arg(long)]
    file: PathBuf,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let json_output = match &cli.command {
        Commands::Tags(args) => args.json,
        Commands::Query(args) => args.json,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Tags(args) => run_tags(args, &config, cli.data).await?,
        Commands::Query(args) => run_query(args, &config, cli.data).await?,
        Commands::Sync(args) => run_sync(args, &config, cli.data).await?,
        Commands::Serve(args) => run_serve(args, &config).await?,
        Commands::Setup(args) => run_setup(args, &config).await?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(url) = &cli.api_url {
        config.api = config.api.with_base_url(url.as_str());
    }
    if let Some(locale) = &cli.locale {
        config.engine.locale = locale.clone();
    }
    if let Some(dir) = &cli.cache_dir {
        config.store = config.store.with_dir(dir);
    }
    config.validate()?;
    Ok(config)
}

fn open_source(config: &AppConfig, data: Option<PathBuf>) -> Result<Box<dyn RecruitmentSource>> {
    Ok(match data {
        Some(path) => Box::new(BundleSource::new(path)),
        None => Box::new(HttpSource::new(&config.api)?),
    })
}

async fn catalog_tags(
    source: &dyn RecruitmentSource,
    store: &LocalStore,
) -> Result<Vec<Tag>> {
    let sync = load_catalog(source, store, false)
        .await
        .with_context(|| format!("Failed to load the tag catalog from {}", source.describe()))?;
    if sync.origin == SyncOrigin::CachedFallback {
        log::warn!("Using cached tags; {} is unavailable", source.describe());
    }
    Ok(sync.tags)
}

async fn run_tags(args: TagsArgs, config: &AppConfig, data: Option<PathBuf>) -> Result<()> {
    let source = open_source(config, data)?;
    let store = LocalStore::new(&config.store)?;
    let catalog = TagCatalog::new(catalog_tags(source.as_ref(), &store).await?);
    let locale = config.engine.locale.as_str();
    let classified = catalog.classify(locale);

    let mut finder = TagFinder::new();
    let hits = args.prefix.as_deref().map(|prefix| {
        finder.search(prefix, &classified, locale);
        for _ in 0..args.next {
            finder.advance();
        }
        log::debug!("{} hit(s) for '{}'", finder.hits().len(), finder.query());
        finder.hits().to_vec()
    });
    let listing = tag_listing(&classified, locale, hits.as_deref(), finder.active());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else if listing.is_empty() {
        println!("No tags found.");
    } else {
        print!("{}", listing_text(&listing));
    }
    Ok(())
}

async fn run_query(args: QueryArgs, config: &AppConfig, data: Option<PathBuf>) -> Result<()> {
    let source = open_source(config, data)?;
    let store = LocalStore::new(&config.store)?;
    let tags = catalog_tags(source.as_ref(), &store).await?;
    let mut session = RecruitSession::new(TagCatalog::new(tags), config.engine.clone())?;

    let mut prefs = store.preferences().await?;
    if args.remember {
        prefs = Preferences {
            hide_rarity_common: args.hide_common,
            hide_only_rarity_lowest: args.hide_lowest,
        };
        store.save_preferences(&prefs).await?;
    }
    let visibility = Visibility {
        hide_rarity_common: prefs.hide_rarity_common || args.hide_common,
        hide_only_rarity_lowest: prefs.hide_only_rarity_lowest || args.hide_lowest,
    };

    let mut presenter = Presenter::default();
    for id in &args.tags {
        session
            .toggle_and_refresh(*id, source.as_ref(), &mut presenter)
            .await
            .with_context(|| format!("Cannot select tag {id}"))?;
    }
    log::debug!(
        "{} render(s), {} resolution(s)",
        presenter.frames,
        session.resolutions()
    );
    if !presenter.rolled_back.is_empty() {
        log::warn!("Deselected after fetch failure: {:?}", presenter.rolled_back);
    }

    let locale = config.engine.locale.as_str();
    let selected = session
        .selection()
        .ids()
        .into_iter()
        .map(|id| SelectedName {
            id,
            name: session.catalog().name(id, locale),
        })
        .collect();
    let report = QueryReport::new(selected, &presenter, visibility);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text(locale));
    }
    Ok(())
}

async fn run_sync(args: SyncArgs, config: &AppConfig, data: Option<PathBuf>) -> Result<()> {
    let source = open_source(config, data)?;
    let store = LocalStore::new(&config.store)?;
    let sync = load_catalog(source.as_ref(), &store, args.force).await?;
    match sync.origin {
        SyncOrigin::Refreshed => println!(
            "Stored {} tags and {} operators from {}",
            sync.stored_tags,
            sync.stored_operators,
            source.describe()
        ),
        SyncOrigin::UpToDate => println!("Cache is up to date ({} tags)", sync.tags.len()),
        SyncOrigin::CachedFallback => {
            bail!("{} is unavailable; cache left unchanged", source.describe())
        }
        SyncOrigin::TagsEndpoint => println!(
            "Bundle unavailable; stored {} tags from {}",
            sync.stored_tags,
            source.describe()
        ),
    }
    Ok(())
}

async fn run_serve(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let server = ServerConfig {
        bind: args.bind.unwrap_or_else(|| config.server.bind.clone()),
        db_path: args.db.unwrap_or_else(|| config.server.db_path.clone()),
    };
    println!("Serving recruitment data API on http://{}", server.bind);
    recruit_server::serve(&server).await
}

async fn run_setup(args: SetupArgs, config: &AppConfig) -> Result<()> {
    let raw = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let payload: SetupPayload = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid setup payload in {}", args.file.display()))?;

    let db = Database::new(args.db.unwrap_or_else(|| config.server.db_path.clone()));
    let report = tokio::task::spawn_blocking(move || {
        db.init()?;
        let mut conn = db.connect()?;
        recruit_server::apply_setup(&mut conn, &payload)
    })
    .await
    .context("setup task")??;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
