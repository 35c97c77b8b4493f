//! LeafScan - plant disease diagnosis from leaf photos
//!
//! Command-line front-end over the inference service client, the disease
//! catalog and the on-device favorites store.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use shared::{disease_info, lookup_exact, Crop, DiagnosisReport, ImageRef, PredictionRequest};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use leafscan_client::{AppError, AppResult, AppState, Config};

#[derive(Parser)]
#[command(name = "leafscan")]
#[command(about = "Diagnose cassava, maize and tomato leaf diseases from a photo")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the inference service is up
    Health,
    /// Show which crop models the service has loaded
    Models,
    /// Diagnose a leaf image
    Predict(PredictArgs),
    /// Show symptoms and treatment for a disease
    Info {
        crop: Crop,
        /// Machine label (gray_leaf_spot) or display label ("Gray Leaf Spot")
        label: String,
    },
    /// Manage saved results
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
    /// Manage the first-run onboarding flag
    Onboarding {
        #[command(subcommand)]
        command: OnboardingCommand,
    },
}

#[derive(Args)]
struct PredictArgs {
    /// Leaf image, a local path or file:// URI
    image: String,
    /// Crop model to use
    #[arg(long, required_unless_present = "auto", conflicts_with = "auto")]
    crop: Option<Crop>,
    /// Run every crop model and keep the most confident answer
    #[arg(long)]
    auto: bool,
    /// Add the result to saved results
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand)]
enum SavedCommand {
    /// List saved results, newest first
    List {
        #[arg(long)]
        crop: Option<Crop>,
    },
    /// Search saved results by crop or disease name
    Search { query: String },
    /// Remove a saved result by id
    Remove { id: Uuid },
    /// Remove every saved result
    Clear,
}

#[derive(Subcommand)]
enum OnboardingCommand {
    Status,
    Complete,
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leafscan=info,leafscan_client=info".into());
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::debug!("Environment: {}", config.environment);

    let state = AppState::new(config)?;

    // Ctrl-C cancels an in-flight upload
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if let Err(err) = run(cli.command, &state, cli.json, &cancel).await {
        tracing::error!("Error: {:?}", err);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&err.detail())?);
        } else {
            eprintln!("{}", err.user_message());
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    command: Commands,
    state: &AppState,
    json: bool,
    cancel: &CancellationToken,
) -> AppResult<()> {
    match command {
        Commands::Health => {
            let health = state.diagnosis.detector().check_health().await?;
            emit(json, &health, || {
                let mut text = format!(
                    "Service is {} ({} model(s) loaded: {})",
                    health.status,
                    health.models_loaded,
                    health.available_crops.join(", ")
                );
                if let Some(version) = &health.version {
                    text.push_str(&format!("\nVersion {}", version));
                }
                text
            })
        }
        Commands::Models => {
            let status = state.diagnosis.detector().model_status().await?;
            emit(json, &status, || {
                status
                    .crops()
                    .map(|crop| {
                        let loaded = if status.is_loaded(crop) { "loaded" } else { "not loaded" };
                        format!("{:<8} {}", crop, loaded)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Predict(args) => predict(args, state, json, cancel).await,
        Commands::Info { crop, label } => {
            let info = disease_info(crop, &label);
            if lookup_exact(crop, &shared::format_disease_label(&label)).is_none() {
                tracing::warn!("No entry for {} / {}, showing healthy record", crop, label);
            }
            emit(json, info, || {
                let mut text = format!(
                    "Severity: {}\nAffected: {}\n\nSymptoms:\n",
                    info.severity, info.affected_area
                );
                for s in info.symptoms {
                    text.push_str(&format!("  - {}\n", s));
                }
                text.push_str("\nRecommendations:\n");
                for r in info.recommendations {
                    text.push_str(&format!("  - {}\n", r));
                }
                text
            })
        }
        Commands::Saved { command } => saved(command, state, json).await,
        Commands::Onboarding { command } => {
            let onboarding = &state.onboarding;
            match command {
                OnboardingCommand::Status => {}
                OnboardingCommand::Complete => onboarding.mark_complete().await?,
                OnboardingCommand::Reset => onboarding.reset().await?,
            }
            let complete = onboarding.is_complete().await?;
            emit(json, &serde_json::json!({ "complete": complete }), || {
                let text = if complete { "Onboarding complete" } else { "Onboarding not complete" };
                text.to_string()
            })
        }
    }
}

async fn predict(
    args: PredictArgs,
    state: &AppState,
    json: bool,
    cancel: &CancellationToken,
) -> AppResult<()> {
    let image = ImageRef::new(args.image);

    let report = match args.crop {
        Some(crop) if !args.auto => {
            state
                .diagnosis
                .diagnose(&PredictionRequest::new(crop, image.clone()), cancel)
                .await?
        }
        _ => state.diagnosis.diagnose_auto(&image, cancel).await?,
    };

    let saved = if args.save {
        Some(state.diagnosis.save(&report, &image).await?)
    } else {
        None
    };

    if json {
        let body = serde_json::json!({ "report": report, "saved": saved });
        return emit(true, &body, String::new);
    }

    println!("{}", render_report(&report));
    if let Some(saved) = saved {
        println!("\nSaved as {}", saved.id);
    }
    Ok(())
}

async fn saved(command: SavedCommand, state: &AppState, json: bool) -> AppResult<()> {
    let favorites = &state.favorites;
    let results = match command {
        SavedCommand::List { crop: Some(crop) } => favorites.by_crop(crop).await?,
        SavedCommand::List { crop: None } => favorites.list().await?,
        SavedCommand::Search { query } => favorites.search(&query).await?,
        SavedCommand::Remove { id } => {
            let removed = favorites.remove(id).await?;
            return emit(json, &removed, || format!("Removed {}", removed.id));
        }
        SavedCommand::Clear => {
            let count = favorites.clear().await?;
            return emit(json, &serde_json::json!({ "removed": count }), || {
                format!("Removed {} saved result(s)", count)
            });
        }
    };

    emit(json, &results, || {
        if results.is_empty() {
            return "No saved results".to_string();
        }
        results
            .iter()
            .map(|r| {
                format!(
                    "{}  {:<8} {:<28} {:>6.2}%  {}",
                    r.id,
                    r.prediction.crop,
                    r.prediction.label,
                    r.prediction.confidence,
                    r.saved_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn render_report(report: &DiagnosisReport) -> String {
    let p = &report.prediction;
    let mut text = format!(
        "{} - {} ({:.2}% confidence, {})\n\nProbabilities:\n",
        p.crop.display_name(),
        p.label,
        p.confidence,
        p.status
    );
    for row in &report.ranked {
        let marker = if row.predicted { "*" } else { " " };
        text.push_str(&format!("{} {:<28} {:>6.2}%\n", marker, row.label, row.percent));
    }

    text.push_str(&format!("\nSeverity: {}\n", report.info.severity));
    if report.info_fallback {
        text.push_str("(no specific guidance for this result, showing general care)\n");
    }
    text.push_str("Recommendations:\n");
    for r in report.info.recommendations {
        text.push_str(&format!("  - {}\n", r));
    }
    text
}

/// Print `value` as JSON or the text produced by `render`
fn emit<T, F>(json: bool, value: &T, render: F) -> AppResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::Internal(format!("Failed to serialize output: {}", e)))?;
        println!("{}", body);
    } else {
        println!("{}", render());
    }
    Ok(())
}
