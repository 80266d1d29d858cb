use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use reel::app::App;
use reel::config::Config;
use reel::player::SimulatedPlayer;
use reel::shorts::{builtin_catalog, load_catalog, Catalog, ShortsFeed};
use reel::storage::{Database, DatabaseError};
use reel::ui;
use reel::util::format_count;

/// Get the config directory path (~/.config/reel/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("reel");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "reel", about = "Terminal short-video feed with keyword filtering")]
struct Args {
    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Load the video catalog from a JSON file instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Use this config file instead of ~/.config/reel/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the feed under the saved keyword selection and exit
    #[arg(long)]
    list: bool,
}

/// Resolve the catalog: command line, then config, then built-in.
///
/// A relative path from the config file is taken from `config_dir`.
fn resolve_catalog(cli: Option<&Path>, config: &Config, config_dir: &Path) -> Result<Catalog> {
    let path = cli
        .map(Path::to_path_buf)
        .or_else(|| config.catalog_path_in(config_dir));
    match path.as_deref() {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Ok(builtin_catalog()),
    }
}

fn print_feed(feed: &ShortsFeed) {
    let committed = feed.selection().committed();
    if committed.is_empty() {
        println!("All videos ({})", feed.visible().len());
    } else {
        let keywords: Vec<&str> = committed.iter().map(String::as_str).collect();
        println!(
            "{} of {} videos matching: {}",
            feed.visible().len(),
            feed.catalog().len(),
            keywords.join(", ")
        );
    }
    for item in feed.visible().iter() {
        println!(
            "  {:<6} {:>5}  {}  @{}  ♥ {}  [{}]",
            item.id,
            item.duration,
            item.title,
            item.author,
            format_count(item.likes),
            item.keywords.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let catalog_base = config_path.parent().unwrap_or(config_dir.as_path());
    let catalog = resolve_catalog(args.catalog.as_deref(), &config, catalog_base)?;
    if catalog.is_empty() {
        eprintln!("Warning: The video catalog is empty");
    }

    let db_path = config_dir.join("reel.db");

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of reel appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let mut feed = ShortsFeed::load(&db, catalog, config.feed_settings()).await;

    if args.list {
        print_feed(&feed);
        return Ok(());
    }

    let mut player = SimulatedPlayer::new(config.autoplay_policy);
    feed.start(&mut player);

    let mut app = App::new(db, feed, player, &config);

    // Run the TUI
    ui::run(&mut app).await?;

    println!("Goodbye!");
    Ok(())
}
