//! Command-line admin panel for portfolio content.
//!
//! # Responsibility
//! - Parse commands and map them onto `AdminSession` operations.
//! - Print collections as JSON and surface advisory errors on stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use portfolio_core::{
    default_log_level, init_logging, new_item_id, AdminSession, CollectionKind, ContactSubmission,
    ContentItem, DataMode, HttpApiClient, MessageStatus, OfflineApi, OpOutcome, PortfolioConfig,
    RemoteApi, SeedSources, SqliteLocalStorage,
};
use serde_json::Value;
use std::path::PathBuf;

type Session = AdminSession<SqliteLocalStorage, Box<dyn RemoteApi>>;

#[derive(Debug, Parser)]
#[command(
    name = "portfolio",
    version,
    about = "Manage portfolio content locally or through the site API"
)]
struct Cli {
    /// API root, e.g. https://example.com (overrides PORTFOLIO_API_BASE)
    #[arg(long, global = true)]
    api: Option<String>,
    /// Local storage database (overrides PORTFOLIO_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory with `{collection}.json` seed files
    #[arg(long, global = true)]
    static_dir: Option<PathBuf>,
    /// Never contact the API; live-mode calls fail and fall back locally
    #[arg(long, global = true)]
    offline: bool,
    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Admin(AdminCommand),
    /// Read-only site endpoints and the contact inbox
    #[command(subcommand)]
    Site(SiteCommand),
}

/// Commands that operate on the local admin session.
#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Show mode and per-collection status
    Status,
    /// Print a collection as JSON
    List { collection: CollectionKind },
    /// Create a record from a JSON object (id generated when missing)
    Add { collection: CollectionKind, json: String },
    /// Replace a record by id (prepended when unknown)
    Update { collection: CollectionKind, json: String },
    /// Create or update depending on whether the id is known
    Save { collection: CollectionKind, json: String },
    /// Remove a record by id
    Remove { collection: CollectionKind, id: String },
    /// Replace a collection with the contents of a JSON file (local only)
    Import { collection: CollectionKind, file: PathBuf },
    /// Show or change the data mode
    Mode { mode: Option<ModeArg> },
}

#[derive(Debug, Subcommand)]
enum SiteCommand {
    /// Featured projects or blog posts
    Featured { collection: String },
    /// One blog post by slug
    Post { slug: String },
    /// Submit the public contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// List contact messages
    Messages,
    /// Set a contact message status (new, read, replied)
    Mark { id: String, status: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Mock,
    Live,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        portfolio_core::core_version()
    );

    match cli.command {
        Command::Site(command) => run_site(&config, command),
        Command::Admin(command) => {
            let mut session = open_session(&config, cli.offline)?;
            run_admin(&mut session, command)
        }
    }
}

fn build_config(cli: &Cli) -> Result<PortfolioConfig> {
    let mut config = PortfolioConfig::from_env()?;
    if let Some(api) = &cli.api {
        config = config.with_api_base_url(api.as_str());
    }
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(dir) = &cli.static_dir {
        config.static_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn open_session(config: &PortfolioConfig, offline: bool) -> Result<Session> {
    let storage = SqliteLocalStorage::open(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let api: Box<dyn RemoteApi> = if offline {
        Box::new(OfflineApi)
    } else {
        Box::new(HttpApiClient::from_config(config)?)
    };
    Ok(AdminSession::open(storage, api, SeedSources::from_config(config)))
}

fn run_admin(session: &mut Session, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Status => {
            println!("mode: {}", session.mode());
            for status in session.statuses() {
                let source = status
                    .source
                    .map(|source| source.to_string())
                    .unwrap_or_else(|| "api".to_string());
                println!(
                    "{:<11} {:>3} items  source={:<14} {}",
                    status.kind.key(),
                    status.items,
                    source,
                    status.error.unwrap_or_default()
                );
            }
        }
        AdminCommand::List { collection } => print_json(&session.value(collection).to_json())?,
        AdminCommand::Add { collection, json } => {
            let mut record = parse_record(&json)?;
            if record.id().is_none() && collection != CollectionKind::Settings {
                record.set("id", Value::String(new_item_id()));
            }
            if collection == CollectionKind::Posts {
                record.ensure_slug();
            }
            report(session.create(collection, record)?);
        }
        AdminCommand::Update { collection, json } => {
            report(session.update(collection, parse_record(&json)?)?)
        }
        AdminCommand::Save { collection, json } => {
            report(session.save(collection, parse_record(&json)?)?)
        }
        AdminCommand::Remove { collection, id } => report(session.remove(collection, &id)?),
        AdminCommand::Import { collection, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let raw: Value = serde_json::from_str(&text)
                .with_context(|| format!("`{}` is not valid JSON", file.display()))?;
            session.replace(collection, raw);
            println!("{} items in {}", session.value(collection).len(), collection);
        }
        AdminCommand::Mode { mode } => {
            match mode {
                Some(ModeArg::Mock) => {
                    session.set_mode(DataMode::Mock)?;
                }
                Some(ModeArg::Live) => {
                    session.set_mode(DataMode::Live)?;
                }
                Some(ModeArg::Toggle) => {
                    session.toggle_mode()?;
                }
                None => {}
            }
            println!("mode: {}", session.mode());
        }
    }
    Ok(())
}

fn run_site(config: &PortfolioConfig, command: SiteCommand) -> Result<()> {
    let client = HttpApiClient::from_config(config)?;
    match command {
        SiteCommand::Featured { collection } => print_items(&client.featured(&collection)?)?,
        SiteCommand::Post { slug } => print_json(&client.blog_post_by_slug(&slug)?.into_value())?,
        SiteCommand::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let id = client.submit_contact(&ContactSubmission {
                name,
                email,
                subject,
                message,
            })?;
            println!("submitted{}", id.map(|id| format!(" ({id})")).unwrap_or_default());
        }
        SiteCommand::Messages => print_items(&client.messages()?)?,
        SiteCommand::Mark { id, status } => {
            let Some(status) = MessageStatus::parse(&status) else {
                bail!("unknown status `{status}`; expected new|read|replied");
            };
            client.update_message_status(&id, status)?;
            println!("{id}: {}", status.as_str());
        }
    }
    Ok(())
}

fn parse_record(json: &str) -> Result<ContentItem> {
    let value: Value = serde_json::from_str(json).context("record is not valid JSON")?;
    match ContentItem::from_value(value) {
        Some(record) => Ok(record),
        None => bail!("record must be a JSON object"),
    }
}

fn report(outcome: OpOutcome) {
    match outcome {
        OpOutcome::Applied => println!("ok"),
        OpOutcome::AppliedLocally { error } => eprintln!("warning: {error}"),
        OpOutcome::RolledBack { error } => eprintln!("rolled back: {error}"),
        OpOutcome::Cancelled => eprintln!("cancelled"),
    }
}

fn print_items(items: &[ContentItem]) -> Result<()> {
    let values = items.iter().cloned().map(ContentItem::into_value).collect();
    print_json(&Value::Array(values))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
