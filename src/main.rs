use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use authtriage::config::ScoringConfig;
use authtriage::ingest;
use authtriage::model::UserHistory;
use authtriage::score::engine::{score_history, select_anomalies};

#[derive(Parser)]
#[command(
    name = "authtriage",
    about = "Sequential login anomaly scoring for authentication telemetry",
    version,
    long_about = None
)]
struct Cli {
    /// Optional TOML file overriding scoring penalties and thresholds
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the scoring API server over a telemetry snapshot
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,

        /// JSON file of login events
        #[arg(long, default_value = "data/logins.json")]
        events: String,
    },

    /// Score one user's login history and list flagged events
    Score {
        /// JSON file of login events
        #[arg(long)]
        events: String,

        /// User id to score
        #[arg(long)]
        user: String,

        /// Override the anomaly display threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Show every scored event, not only those above the threshold
        #[arg(long)]
        all: bool,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print a user's behavioral baseline summary
    Baseline {
        /// JSON file of login events
        #[arg(long)]
        events: String,

        /// User id to profile
        #[arg(long)]
        user: String,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Compare two users' baselines side by side
    Compare {
        /// JSON file of login events
        #[arg(long)]
        events: String,

        /// First user id
        #[arg(long)]
        user: String,

        /// Second user id
        #[arg(long = "with")]
        other: String,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// List user ids present in a telemetry snapshot
    Users {
        /// JSON file of login events
        #[arg(long)]
        events: String,
    },
}

fn load_history(events_path: &str, user: &str) -> Result<UserHistory> {
    let events = ingest::load_events(events_path)?;
    let mut histories = ingest::group_by_user(events);
    match histories.remove(user) {
        Some(h) => Ok(h),
        None => bail!("no login events for user '{}' in {}", user, events_path),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => ScoringConfig::load(path),
        None => ScoringConfig::default(),
    };

    match cli.command {
        Commands::Serve { bind, events } => {
            tracing::info!(%bind, "Starting authtriage server");
            authtriage::serve(&bind, &events, config).await?;
        }
        Commands::Score {
            events,
            user,
            threshold,
            all,
            json,
        } => {
            let history = load_history(&events, &user)?;
            let threshold = threshold.unwrap_or(config.threshold);
            let results = score_history(&history, &config)?;
            let shown = if all {
                results.clone()
            } else {
                select_anomalies(&results, threshold)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!(
                    "\nAnomaly report for {} ({} events scored, threshold {})",
                    user,
                    results.len(),
                    threshold
                );
                if shown.is_empty() {
                    println!("No events above threshold.");
                } else {
                    println!(
                        "{:<20} | {:<14} | {:<5} | {:<6} | Reasons",
                        "Timestamp", "City", "Score", "Tier"
                    );
                    println!(
                        "{:-<20}-|-{:-<14}-|-{:-<5}-|-{:-<6}-|-{:-<30}",
                        "", "", "", "", ""
                    );
                    for r in &shown {
                        println!(
                            "{:<20} | {:<14} | {:<5.2} | {:<6} | {}",
                            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            r.city,
                            r.score,
                            format!("{:?}", r.tier).to_lowercase(),
                            r.reason()
                        );
                    }
                }
                println!();
            }
        }
        Commands::Baseline { events, user, json } => {
            let history = load_history(&events, &user)?;
            let summary = authtriage::score::baseline::compute_summary(&history)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("\nBaseline profile for {}", summary.user_id);
                println!("{:<20} : {}", "Total logins", summary.total_logins);
                println!("{:<20} : {}", "Most used device", summary.modal_device);
                println!("{:<20} : {}", "Most used method", summary.modal_method);
                println!("{:<20} : {}", "Preferred channel", summary.modal_channel);
                println!("{:<20} : {}", "Top city", summary.modal_city);
                println!("{:<20} : {}", "Common OS/browser", summary.modal_os_browser);
                println!("{:<20} : {:02}:00 UTC", "Typical login hour", summary.modal_hour);
                println!("\nLogin hours:");
                for (hour, count) in &summary.hour_histogram {
                    println!("  {:02}:00 | {}", hour, "#".repeat(*count));
                }
                println!();
            }
        }
        Commands::Compare {
            events,
            user,
            other,
            json,
        } => {
            let raw = ingest::load_events(&events)?;
            let mut histories = ingest::group_by_user(raw);
            let Some(left) = histories.remove(&user) else {
                bail!("no login events for user '{}' in {}", user, events);
            };
            let Some(right) = histories.remove(&other) else {
                bail!("no login events for user '{}' in {}", other, events);
            };
            let cmp = authtriage::score::baseline::compare_users(&left, &right)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cmp)?);
            } else {
                println!("\nComparison: {} vs {}", cmp.left.user_id, cmp.right.user_id);
                println!(
                    "{:<18} | {:<14} | {:<14}",
                    "", cmp.left.user_id, cmp.right.user_id
                );
                println!("{:-<18}-|-{:-<14}-|-{:-<14}", "", "", "");
                println!(
                    "{:<18} | {:<14} | {:<14}",
                    "Login count", cmp.left.total_logins, cmp.right.total_logins
                );
                println!(
                    "{:<18} | {:<14} | {:<14}",
                    "Device type", cmp.left.modal_device, cmp.right.modal_device
                );
                println!(
                    "{:<18} | {:<14} | {:<14}",
                    "Top channel", cmp.left.modal_channel, cmp.right.modal_channel
                );
                println!(
                    "{:<18} | {:<14} | {:<14}",
                    "Top login hour",
                    format!("{:02}:00", cmp.left.modal_hour),
                    format!("{:02}:00", cmp.right.modal_hour)
                );
                println!();
            }
        }
        Commands::Users { events } => {
            let events = ingest::load_events(&events)?;
            let histories = ingest::group_by_user(events);
            let ids = ingest::user_ids(&histories);
            if ids.is_empty() {
                println!("No users found.");
            } else {
                println!("{:<10} | Logins", "User");
                println!("{:-<10}-|-{:-<7}", "", "");
                for id in ids {
                    println!("{:<10} | {}", id, histories[&id].len());
                }
            }
        }
    }

    Ok(())
}
