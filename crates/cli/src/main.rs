use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::load_dataset;
use dataset_store::{DatasetStore, ItemId, UserId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

/// genre-lens - queries over a user/item/interaction dataset
#[derive(Parser)]
#[command(name = "genre-lens")]
#[command(about = "Genre filtering and gender-balanced sampling over a loaded dataset", long_about = None)]
struct Cli {
    /// Path to the dataset directory (MovieLens-100k layout)
    #[arg(short, long, default_value = "data/ml-100k")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restrict the interaction matrix to items matching a genre query
    Filter {
        /// Comma-separated genre names (e.g. Action,Comedy)
        #[arg(long, value_delimiter = ',')]
        genres: Vec<String>,

        /// Keep only items matching exactly one of the queried genres
        #[arg(long)]
        exclusive: bool,

        /// Emit the full subset (ids and submatrix) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the genres of an item
    Item {
        /// Item ID to display (dense, 0-based)
        #[arg(long)]
        item_id: ItemId,
    },

    /// Show a user's gender and interaction history
    User {
        /// User ID to display (dense, 0-based)
        #[arg(long)]
        user_id: UserId,
    },

    /// Draw a gender-balanced user sample, optionally genre-restricted
    Sample {
        /// Comma-separated genre names to restrict candidates first
        #[arg(long, value_delimiter = ',')]
        genres: Vec<String>,

        /// Use exclusive genre matching for the restriction
        #[arg(long)]
        exclusive: bool,

        /// Users to draw per gender
        #[arg(long, default_value = "5")]
        count: usize,

        /// Seed for reproducible draws; omitted means OS randomness
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = load_dataset(&cli.data_dir).context("Failed to load dataset")?;
    let (n_users, n_items, n_genres) = store.counts();
    println!(
        "{} Loaded {} users, {} items, {} genres in {:?}",
        "✓".green(),
        n_users,
        n_items,
        n_genres,
        start.elapsed()
    );

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Filter {
            genres,
            exclusive,
            json,
        } => handle_filter(&store, &genres, exclusive, json)?,
        Commands::Item { item_id } => handle_item(&store, item_id)?,
        Commands::User { user_id } => handle_user(&store, user_id)?,
        Commands::Sample {
            genres,
            exclusive,
            count,
            seed,
        } => handle_sample(&store, &genres, exclusive, count, seed)?,
    }

    Ok(())
}

/// Handle the 'filter' command
fn handle_filter(store: &DatasetStore, genres: &[String], exclusive: bool, json: bool) -> Result<()> {
    let names: Vec<&str> = genres.iter().map(String::as_str).collect();
    let subset = store.filter_by_genre(&names, exclusive)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subset)?);
        return Ok(());
    }

    let mode = if exclusive { "exclusive" } else { "inclusive" };
    println!(
        "{}",
        format!("Filter {:?} ({})", genres, mode).bold().blue()
    );
    println!(
        "{}Matching items: {}",
        "• ".green(),
        subset.item_ids.len()
    );
    println!(
        "{}Users with at least one match: {}",
        "• ".green(),
        subset.user_ids.len()
    );

    let cells = subset.interactions.rows() * subset.interactions.cols();
    let filled = (0..subset.interactions.rows())
        .flat_map(|row| (0..subset.interactions.cols()).map(move |col| (row, col)))
        .filter(|&(row, col)| subset.interactions.get(row, col))
        .count();
    if cells > 0 {
        println!(
            "{}Submatrix: {}×{}, {} interactions ({:.2}% dense)",
            "• ".cyan(),
            subset.interactions.rows(),
            subset.interactions.cols(),
            filled,
            100.0 * filled as f64 / cells as f64
        );
    } else {
        println!("{}Submatrix: 0×0", "• ".cyan());
    }

    print!("Item ids:");
    for item_id in subset.item_ids.iter().take(20) {
        print!(" {}", item_id);
    }
    if subset.item_ids.len() > 20 {
        print!(" … ({} more)", subset.item_ids.len() - 20);
    }
    println!();
    Ok(())
}

/// Handle the 'item' command
fn handle_item(store: &DatasetStore, item_id: ItemId) -> Result<()> {
    let genres = store.genres_of(item_id)?;

    println!("{}", format!("Item ID: {}", item_id).bold().blue());
    let names: Vec<&str> = genres
        .ids()
        .filter_map(|id| store.genre_mapping().name_of(id))
        .collect();
    if names.is_empty() {
        println!("{}Genres: (none)", "• ".green());
    } else {
        println!("{}Genres: {}", "• ".green(), names.join(", "));
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(store: &DatasetStore, user_id: UserId) -> Result<()> {
    let gender = store.gender_of(user_id)?;
    let seen = store.seen_items_of(user_id)?;

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Gender: {:?}", "• ".green(), gender);
    println!("{}Items interacted with: {}", "• ".cyan(), seen.len());

    print!("Item ids:");
    for item_id in seen.iter().take(20) {
        print!(" {}", item_id);
    }
    if seen.len() > 20 {
        print!(" … ({} more)", seen.len() - 20);
    }
    println!();
    Ok(())
}

/// Handle the 'sample' command
fn handle_sample(
    store: &DatasetStore,
    genres: &[String],
    exclusive: bool,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    // Genre restriction first, if requested; otherwise every user is
    // a candidate
    let candidates: Vec<UserId> = if genres.is_empty() {
        (0..store.n_users()).collect()
    } else {
        let names: Vec<&str> = genres.iter().map(String::as_str).collect();
        store.filter_by_genre(&names, exclusive)?.user_ids
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (males, females) = store.sample_balanced_by_gender(&candidates, count, &mut rng)?;

    println!(
        "{}",
        format!(
            "Balanced sample of {} per gender from {} candidates",
            count,
            candidates.len()
        )
        .bold()
        .blue()
    );
    println!(
        "{}Male:   {}",
        "• ".green(),
        males
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "{}Female: {}",
        "• ".green(),
        females
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
