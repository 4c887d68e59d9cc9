use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scripture_core::{Book, EmergencyCategory, Scripture, canon};
use scripture_db::StoreConfig;
use scripture_sqlite::{
    ImportResult, ScriptureStore, StoreStatus, describe_tables, detect, open_source,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SEARCH_LIMIT: usize = 20;

#[derive(Debug, Parser)]
#[command(name = "scripture")]
#[command(about = "Build, repair, and query the local scripture store")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// YAML store configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Canonical store path (overrides the config).
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Bundled corpus path (overrides the config).
    #[arg(long, global = true)]
    asset: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the store and report its health.
    Status,
    /// Re-run the import pipeline from the bundled corpus.
    Repair,
    /// Drop the store and rebuild it from a fresh copy of the corpus.
    Reload,
    /// Show which tables of a source database would be imported.
    Detect(SourceArgs),
    /// Import from an explicit source database.
    Import(SourceArgs),
    /// Replace the store contents with the built-in fallback data.
    Seed,
    /// List the 66 books.
    Books,
    /// Chapter count of a book (name or id).
    Chapters(ChaptersArgs),
    /// Look up a single verse.
    Verse(VerseArgs),
    /// Print a whole chapter.
    Chapter(ChapterArgs),
    /// Look up a textual reference such as "John 3:16".
    Ref(RefArgs),
    /// Case-insensitive text search.
    Search(SearchArgs),
    /// A random verse.
    Random,
    /// Today's verse.
    Daily,
    /// A verse for a category (temptation, anxiety, depression, guidance, comfort).
    Emergency(EmergencyArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Source SQLite database.
    #[arg(long)]
    source: PathBuf,
}

#[derive(Debug, Args)]
struct ChaptersArgs {
    book: String,
}

#[derive(Debug, Args)]
struct VerseArgs {
    book: String,
    chapter: i64,
    verse: i64,
}

#[derive(Debug, Args)]
struct ChapterArgs {
    book: String,
    chapter: i64,
}

#[derive(Debug, Args)]
struct RefArgs {
    reference: String,
}

#[derive(Debug, Args)]
struct SearchArgs {
    text: String,
    /// Maximum number of results.
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: usize,
}

#[derive(Debug, Args)]
struct EmergencyArgs {
    category: String,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    status: StoreStatus,
    diagnostic: String,
    book_count: u64,
    verse_count: u64,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = load_config(&cli.global).and_then(|config| run(cli.command, config, cli.global.json));

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &GlobalArgs) -> Result<StoreConfig, String> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => StoreConfig::default(),
    };

    if let Some(store) = &args.store {
        // Keep the materialized copy beside the store.
        if let (Some(dir), Some(name)) = (store.parent(), config.asset.local_path.file_name()) {
            config.asset.local_path = dir.join(name);
        }
        config.store_path = store.clone();
    }
    if let Some(asset) = &args.asset {
        config.asset.bundled_path = asset.clone();
    }
    Ok(config)
}

fn run(command: Command, config: StoreConfig, json: bool) -> Result<(), String> {
    match command {
        Command::Status => run_status(config, json),
        Command::Repair => {
            let store = ScriptureStore::new(config);
            report_import(store.repair(), json)
        }
        Command::Reload => {
            let store = ScriptureStore::new(config);
            report_import(store.force_reload(), json)
        }
        Command::Detect(args) => run_detect(args, json),
        Command::Import(args) => {
            let store = ScriptureStore::new(config);
            report_import(store.import_from(&args.source), json)
        }
        Command::Seed => {
            let store = ScriptureStore::new(config);
            report_import(store.seed(), json)
        }
        Command::Books => run_books(config, json),
        Command::Chapters(args) => run_chapters(args, config, json),
        Command::Verse(args) => {
            let store = open_ready(config)?;
            let verse = store.get_verse(&args.book, args.chapter, args.verse);
            print_verses(&store, verse.into_iter().collect(), json)
        }
        Command::Chapter(args) => {
            let store = open_ready(config)?;
            let verses = store.get_chapter(&args.book, args.chapter);
            print_verses(&store, verses, json)
        }
        Command::Ref(args) => {
            let store = open_ready(config)?;
            let verse = store
                .get_verse_by_reference(&args.reference)
                .map_err(|err| err.to_string())?;
            print_verses(&store, verse.into_iter().collect(), json)
        }
        Command::Search(args) => {
            let store = open_ready(config)?;
            let verses = store.search(&args.text, args.limit);
            print_verses(&store, verses, json)
        }
        Command::Random => {
            let store = open_ready(config)?;
            let verse = store.get_random_verse();
            print_verses(&store, verse.into_iter().collect(), json)
        }
        Command::Daily => {
            let store = open_ready(config)?;
            let verse = store.get_daily_scripture();
            print_verses(&store, verse.into_iter().collect(), json)
        }
        Command::Emergency(args) => {
            let category = args
                .category
                .parse::<EmergencyCategory>()
                .map_err(|err| err.to_string())?;
            let store = open_ready(config)?;
            let verse = store.get_emergency_scripture(category);
            print_verses(&store, verse.into_iter().collect(), json)
        }
    }
}

fn open_ready(config: StoreConfig) -> Result<ScriptureStore, String> {
    let store = ScriptureStore::open(config);
    let status = store.status();
    if status.status != StoreStatus::Ready {
        return Err(format!("Store is {}: {}", status.status, status.diagnostic));
    }
    Ok(store)
}

fn run_status(config: StoreConfig, json: bool) -> Result<(), String> {
    let store = ScriptureStore::open(config);
    let snapshot = store.status();
    let health = store.health();
    let report = StatusReport {
        status: snapshot.status,
        diagnostic: snapshot.diagnostic,
        book_count: health.book_count,
        verse_count: health.verse_count,
    };

    if json {
        return print_json(&report);
    }
    println!("Store Status:");
    println!("  Path: {}", store.config().store_path.display());
    println!("  Status: {}", report.status);
    println!("  Books: {}", report.book_count);
    println!("  Verses: {}", report.verse_count);
    println!("  {}", report.diagnostic);
    Ok(())
}

fn run_detect(args: SourceArgs, json: bool) -> Result<(), String> {
    let source = open_source(&args.source)
        .map_err(|err| format!("Failed to open source '{}': {err}", args.source.display()))?;
    let schema = detect(&source);
    let tables = describe_tables(&source).map_err(|err| err.to_string())?;

    if json {
        return print_json(&serde_json::json!({ "schema": schema, "tables": tables }));
    }
    println!("Detection:");
    println!("  Strategy: {}", schema.strategy);
    println!("  Books table: {}", schema.books_table.as_deref().unwrap_or("-"));
    println!("  Verses table: {}", schema.verses_table.as_deref().unwrap_or("-"));
    println!("  Translation: {}", schema.translation_tag.as_deref().unwrap_or("-"));
    println!("\nTables:");
    for table in &tables {
        println!("  {} ({} rows): {}", table.name, table.row_count, table.columns.join(", "));
    }
    Ok(())
}

fn report_import(result: scripture_sqlite::Result<ImportResult>, json: bool) -> Result<(), String> {
    let result = result.map_err(|err| err.to_string())?;
    if json {
        return print_json(&result);
    }
    println!("Import complete:");
    println!("  Books imported: {}", result.books_imported);
    println!("  Verses imported: {}", result.verses_imported);
    println!("  Schema: {}", result.schema.strategy);
    if result.degraded {
        println!("  Using built-in fallback data");
    }
    if result.interrupted {
        println!("  Interrupted before completion");
    }
    if let Some(reason) = &result.partial_failure {
        println!("  Stopped early: {reason}");
    }
    Ok(())
}

fn run_books(config: StoreConfig, json: bool) -> Result<(), String> {
    let store = ScriptureStore::open(config);
    let books: Vec<Book> = store.get_all_books();
    if json {
        return print_json(&books);
    }
    for book in &books {
        println!("{:>2}  {}", book.id, book.name);
    }
    Ok(())
}

fn run_chapters(args: ChaptersArgs, config: StoreConfig, json: bool) -> Result<(), String> {
    let book_id = args
        .book
        .parse::<i64>()
        .ok()
        .or_else(|| canon::book_id(&args.book))
        .filter(|id| canon::book_name(*id).is_some())
        .ok_or_else(|| format!("Unknown book '{}'", args.book))?;

    let store = ScriptureStore::open(config);
    let count = store.get_chapter_count(book_id);
    if json {
        return print_json(&serde_json::json!({ "book_id": book_id, "chapters": count }));
    }
    println!("{count}");
    Ok(())
}

fn print_verses(store: &ScriptureStore, verses: Vec<Scripture>, json: bool) -> Result<(), String> {
    if json {
        return print_json(&verses);
    }
    for verse in &verses {
        if verse.placeholder {
            println!("{verse} [placeholder]");
        } else {
            println!("{verse}");
        }
    }
    if verses.is_empty() {
        eprintln!("No verses found. {}", store.status().diagnostic);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize output: {err}"))?;
    println!("{json}");
    Ok(())
}
