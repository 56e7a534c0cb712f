// src/main.rs
//
// Command-line front end: one command per invocation, each one loading the
// library through the persistence gateway first.

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

use animanga::{
    AppError, AppState, CategoryFilter, ConfigArgs, ErrorResponse, LibraryController,
    LibraryStatistics, MediaCategory, MediaInput, MediaRecord, MediaStatus, StorageMode,
};

#[derive(Debug, Parser)]
#[command(name = "animanga", version, about = "Track anime and manga progress")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the collection, newest changes first
    List {
        #[arg(long)]
        category: Option<MediaCategory>,
        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a new title
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Edit a title; only the given fields change
    Edit {
        /// Record id, or a unique prefix of it
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Add one watched episode or read chapter
    Progress { id: String },
    /// Delete a title
    Remove { id: String },
    /// Show collection statistics
    Stats,
    /// Ask the AI for titles similar to your favourites
    Recommend,
}

#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    category: Option<MediaCategory>,
    #[arg(long)]
    status: Option<MediaStatus>,
    /// Episodes watched or chapters read
    #[arg(long)]
    progress: Option<u32>,
    /// Total episodes or chapters (0 = unknown)
    #[arg(long)]
    total: Option<u32>,
    /// 0 to 10 in steps of 0.5
    #[arg(long)]
    rating: Option<f64>,
    #[arg(long)]
    cover: Option<String>,
    /// Repeat for several genres
    #[arg(long = "genre")]
    genres: Vec<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    link: Option<String>,
    /// Fill genres, description and total from the AI before saving
    #[arg(long)]
    enrich: bool,
}

impl FormArgs {
    fn apply_to(self, input: &mut MediaInput) {
        if let Some(category) = self.category {
            input.category = category;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
        if let Some(progress) = self.progress {
            input.current_progress = progress;
        }
        if let Some(total) = self.total {
            input.total_progress = Some(total);
        }
        if let Some(rating) = self.rating {
            input.rating = rating;
        }
        if self.cover.is_some() {
            input.cover_image_url = self.cover;
        }
        if !self.genres.is_empty() {
            input.genres = Some(self.genres);
        }
        if self.description.is_some() {
            input.description = self.description;
        }
        if self.link.is_some() {
            input.external_link = self.link;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let config = cli
        .config
        .into_config()
        .context("failed to resolve configuration")?;
    debug!("configuration: remote={:?} db={}", config.remote_url, config.database_path.display());

    let state = AppState::from_config(&config).context("failed to open storage")?;
    let mut controller = LibraryController::new(state.gateway.clone());

    if let Err(e) = controller.load().await {
        bail!(
            "Failed to load library ({}). Run the command again to retry.",
            ErrorResponse::from_app_error(&e)
        );
    }

    match cli.command {
        Command::List { category, search } => {
            controller.set_category_filter(category.map_or(CategoryFilter::All, CategoryFilter::Only));
            controller.set_search(search.unwrap_or_default());

            let visible = controller.visible();
            if visible.is_empty() {
                println!("No titles yet.");
            }
            for record in visible {
                println!("{}", render_record(record));
            }
        }

        Command::Add { title, form } => {
            let enrich = form.enrich;
            let mut input = MediaInput::new(title, MediaCategory::Anime);
            form.apply_to(&mut input);
            if enrich {
                enrich_input(&state, &mut input).await;
            }

            let record = controller.add_or_edit(input, None).await.map_err(user_error)?;
            println!("Added {}", render_record(&record));
        }

        Command::Edit { id, title, form } => {
            let id = resolve_id(&controller, &id)?;
            let existing = controller.get(&id).ok_or_else(|| user_error(AppError::NotFound))?;

            let enrich = form.enrich;
            let mut input = MediaInput::from_record(existing);
            if let Some(title) = title {
                input.title = title;
            }
            form.apply_to(&mut input);
            if enrich {
                enrich_input(&state, &mut input).await;
            }

            let record = controller
                .add_or_edit(input, Some(id.as_str()))
                .await
                .map_err(user_error)?;
            println!("Updated {}", render_record(&record));
        }

        Command::Progress { id } => {
            let id = resolve_id(&controller, &id)?;
            let record = controller.increment_progress(&id).await.map_err(user_error)?;
            println!("{}", render_record(&record));
        }

        Command::Remove { id } => {
            let id = resolve_id(&controller, &id)?;
            controller.remove(&id).await.map_err(user_error)?;
            println!("Removed {}", id);
        }

        Command::Stats => print_statistics(&controller.statistics()),

        Command::Recommend => {
            let recommendations = state.enricher.recommend(controller.items()).await;
            if recommendations.is_empty() {
                println!("No recommendations available.");
            }
            for rec in recommendations {
                println!("{} ({}) [{}]\n  {}", rec.title, rec.category, rec.genres.join(", "), rec.reason);
            }
        }
    }

    if controller.storage_mode() == StorageMode::LocalFallback && config.remote_url.is_some() {
        eprintln!("Remote store unreachable: changes are saved on this device only.");
    }

    Ok(())
}

async fn enrich_input(state: &AppState, input: &mut MediaInput) {
    match state.enricher.enrich(&input.title, input.category).await {
        Some(enrichment) => {
            info!("applied AI enrichment to '{}'", input.title);
            input.apply_enrichment(&enrichment);
        }
        None => eprintln!("No AI enrichment available for '{}'.", input.title),
    }
}

/// Exact id, or the single id starting with `prefix`
fn resolve_id(controller: &LibraryController, prefix: &str) -> anyhow::Result<String> {
    if controller.get(prefix).is_some() {
        return Ok(prefix.to_string());
    }

    let matches: Vec<&str> = controller
        .items()
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| id.starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(user_error(AppError::NotFound)),
        _ => bail!("id prefix '{}' matches {} titles", prefix, matches.len()),
    }
}

fn user_error(err: AppError) -> anyhow::Error {
    anyhow!(ErrorResponse::from_app_error(&err).to_string())
}

fn render_record(record: &MediaRecord) -> String {
    let total = record
        .known_total()
        .map_or_else(|| "?".to_string(), |t| t.to_string());
    let short_id: String = record.id.chars().take(8).collect();
    let done = if record.is_complete() { " (complete)" } else { "" };

    format!(
        "[{}] {} | {} | {} | {}/{} {}s | rating {}{}",
        short_id,
        record.title,
        record.category,
        record.status,
        record.current_progress,
        total,
        record.category.progress_unit(),
        record.rating,
        done
    )
}

fn print_statistics(stats: &LibraryStatistics) {
    if stats.is_empty() {
        println!("No data yet. Start tracking to see statistics.");
        return;
    }

    println!("Titles:         {}", stats.total_titles);
    println!("Total progress: {}", stats.total_progress);
    println!("Average rating: {:.1}", stats.average_rating);

    println!("\nBy status:");
    for (status, count) in &stats.by_status {
        println!("  {:<10} {}", status.to_string(), count);
    }

    println!("\nBy category:");
    for (category, count) in &stats.by_category {
        println!("  {:<10} {}", category.to_string(), count);
    }

    println!("\nRating distribution:");
    for bucket in &stats.rating_distribution {
        println!("  {:>2} {}", bucket.rating, "#".repeat(bucket.count));
    }
}
