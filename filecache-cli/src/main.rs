//! filecache CLI
//!
//! Command-line access to a filecache store directory.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filecache_core::{StoreConfig, ENV_DIR};
use filecache_store::{FileStore, Freshness, Ttl};

/// filecache - filesystem-backed key-value cache
#[derive(Parser)]
#[command(name = "filecache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base directory of the store (absolute)
    #[arg(short, long, global = true, env = ENV_DIR)]
    dir: Option<PathBuf>,

    /// Store values as raw files instead of JSON
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value (parsed as JSON, otherwise stored as a string)
    Put {
        /// Entry id
        id: String,
        /// Value to store
        value: String,
    },

    /// Print an entry if it exists and is fresh
    Get {
        /// Entry id
        id: String,
        /// Maximum age, e.g. 1h, 30m, 500ms
        #[arg(short, long)]
        ttl: Option<String>,
    },

    /// Report whether an entry is fresh, expired, or absent
    Has {
        /// Entry id
        id: String,
        /// Maximum age, e.g. 1h, 30m, 500ms
        #[arg(short, long)]
        ttl: Option<String>,
    },

    /// List entry ids
    List,

    /// Delete an entry
    Remove {
        /// Entry id
        id: String,
    },

    /// Delete every entry in the store
    Clear,

    /// Print an entry's size and modification time
    Size {
        /// Entry id
        id: String,
    },

    /// Run a put/get round trip against the store
    SelfTest,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "filecache=debug,info"
    } else {
        "filecache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.dir {
        config.base_dir = dir;
    }
    if cli.raw {
        config.encode_json = false;
    }
    debug!(?config, "Loaded configuration");

    let store = FileStore::with_options(&config.base_dir, config.options())
        .with_context(|| format!("Failed to open store at {}", config.base_dir.display()))?;
    let default_ttl = config.default_ttl();
    let ttl_or_default = |ttl: Option<String>| ttl.map(Ttl::from).or_else(|| default_ttl.clone());

    match cli.command {
        Commands::Put { id, value } => cmd_put(&store, &id, &value).await,
        Commands::Get { id, ttl } => cmd_get(&store, &id, ttl_or_default(ttl)).await,
        Commands::Has { id, ttl } => cmd_has(&store, &id, ttl_or_default(ttl)).await,
        Commands::List => cmd_list(&store).await,
        Commands::Remove { id } => cmd_remove(&store, &id).await,
        Commands::Clear => cmd_clear(&store).await,
        Commands::Size { id } => cmd_size(&store, &id).await,
        Commands::SelfTest => cmd_self_test(&store).await,
    }
}

/// Store a value
async fn cmd_put(store: &FileStore, id: &str, value: &str) -> Result<()> {
    let stored = if store.options().encode_json {
        let parsed: Value =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        store.put(id, &parsed).await
    } else {
        store.put_raw(id, value).await
    };
    stored.with_context(|| format!("Failed to store '{}'", id))?;

    println!("{} {}", "✅ Stored:".green(), store.resolve(id).display());
    Ok(())
}

/// Print a fresh entry
async fn cmd_get(store: &FileStore, id: &str, ttl: Option<Ttl>) -> Result<()> {
    if store.options().encode_json {
        match store.get_json(id, ttl).await.with_context(|| format!("Failed to read '{}'", id))? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => println!("{}", "(miss)".yellow()),
        }
    } else {
        match store.get_raw(id, ttl).await.with_context(|| format!("Failed to read '{}'", id))? {
            Some(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
            None => println!("{}", "(miss)".yellow()),
        }
    }
    Ok(())
}

/// Report freshness
async fn cmd_has(store: &FileStore, id: &str, ttl: Option<Ttl>) -> Result<()> {
    let state = store.has(id, ttl).await.with_context(|| format!("Failed to check '{}'", id))?;
    let label = match state {
        Freshness::Fresh => state.to_string().green(),
        Freshness::Expired => state.to_string().yellow(),
        Freshness::Absent => state.to_string().red(),
    };
    println!("{} {}", id.bold(), label);
    Ok(())
}

/// List entry ids
async fn cmd_list(store: &FileStore) -> Result<()> {
    let ids = store.list().await.context("Failed to list store")?;
    if ids.is_empty() {
        println!("{}", "Store is empty.".dimmed());
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

/// Delete one entry
async fn cmd_remove(store: &FileStore, id: &str) -> Result<()> {
    store.remove(id).await.with_context(|| format!("Failed to remove '{}'", id))?;
    println!("{} {}", "🗑  Removed:".green(), id);
    Ok(())
}

/// Delete every entry
async fn cmd_clear(store: &FileStore) -> Result<()> {
    let count = store.list().await.context("Failed to list store")?.len();
    store.clear().await.context("Failed to clear store")?;
    println!("{} {} entries", "🧹 Cleared".green(), count);
    Ok(())
}

/// Print size and modification time
async fn cmd_size(store: &FileStore, id: &str) -> Result<()> {
    let Some(size) = store.size_of(id).await else {
        bail!("No entry '{}' in {}", id, store.base().display());
    };
    println!("{} {} bytes", id.bold(), size);
    if let Some(modified) = store.modified(id).await? {
        let modified: DateTime<Local> = modified.into();
        println!("   {} {}", "Modified:".dimmed(), modified.to_rfc3339());
    }
    Ok(())
}

/// Put/get round trip against the store
async fn cmd_self_test(store: &FileStore) -> Result<()> {
    println!("{} {}", "🔎 Self-test in:".cyan().bold(), store.base().display());

    let expected = json!({ "foo": 42 });
    store.put("foo", &expected).await?;

    let r = store.get_json("foo", None).await?;
    println!("   get foo      → {}", display(&r));
    let r2 = store.get_json("foo2", None).await?;
    println!("   get foo2     → {}", display(&r2));
    let r3 = store.get_json("foo", Some("1h".into())).await?;
    println!("   get foo (1h) → {}", display(&r3));

    if r.as_ref() != Some(&expected) || r2.is_some() || r3.as_ref() != Some(&expected) {
        bail!("self-test failed");
    }
    println!("\n{}", "✅ Self-test passed".green().bold());
    Ok(())
}

fn display(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}
