use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use restaurant_catalog::{
    count_rows, insert_dishes, insert_restaurants, load_dishes_csv, load_restaurants_csv,
    setup_database, ImportSummary,
};

/// Provision the SQLite catalog served by catalog-server
#[derive(Parser, Debug)]
#[command(name = "catalog", version)]
struct Cli {
    /// SQLite database file
    #[arg(short = 'd', long, global = true, default_value = "database.sqlite", env = "CATALOG_DATABASE")]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the restaurants and dishes tables
    Init,

    /// Load CSV files into the catalog, skipping ids already present
    Import {
        /// CSV with headers id,name,cuisine,isVeg,hasOutdoorSeating,isLuxury,rating
        #[arg(long)]
        restaurants: Option<PathBuf>,

        /// CSV with headers id,name,isVeg,price
        #[arg(long)]
        dishes: Option<PathBuf>,
    },

    /// Print row counts
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => run_init(&cli.database),
        Command::Import { restaurants, dishes } => {
            run_import(&cli.database, restaurants.as_deref(), dishes.as_deref())
        }
        Command::Stats => run_stats(&cli.database),
    }
}

fn run_init(db_path: &Path) -> Result<()> {
    println!("🔧 Setting up catalog database...");

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    setup_database(&conn)?;

    println!("✓ Tables ready in {} (WAL mode)", db_path.display());
    Ok(())
}

fn report(label: &str, summary: ImportSummary) {
    println!("✓ {}: {} inserted", label, summary.inserted);
    if summary.duplicates > 0 {
        println!("  skipped {} existing ids", summary.duplicates);
    }
}

fn run_import(db_path: &Path, restaurants: Option<&Path>, dishes: Option<&Path>) -> Result<()> {
    if restaurants.is_none() && dishes.is_none() {
        anyhow::bail!("nothing to import: pass --restaurants and/or --dishes");
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    setup_database(&conn)?;

    if let Some(path) = restaurants {
        println!("📂 Loading {}...", path.display());
        let rows = load_restaurants_csv(path)?;
        report("Restaurants", insert_restaurants(&conn, &rows)?);
    }

    if let Some(path) = dishes {
        println!("📂 Loading {}...", path.display());
        let rows = load_dishes_csv(path)?;
        report("Dishes", insert_dishes(&conn, &rows)?);
    }

    run_stats(db_path)
}

fn run_stats(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        eprintln!("❌ Database not found at {}", db_path.display());
        eprintln!("   Run: catalog init");
        std::process::exit(1);
    }

    let conn = Connection::open(db_path)?;
    let counts = count_rows(&conn)?;

    println!("🔍 {}", db_path.display());
    println!("   restaurants: {}", counts.restaurants);
    println!("   dishes:      {}", counts.dishes);
    Ok(())
}
