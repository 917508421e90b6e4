use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use ingestra::config::{resolve_db_path, AnalysisParams, DEMO_BUSINESS_NAME, DEMO_POSTAL_CODE};
use ingestra::orchestrator::{run_report, ReportOutcome};
use ingestra::store;
use ingestra::BusinessQuery;

/// Ingestra - review authenticity analytics per business
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database path (overrides INGESTRA_DB environment variable)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the reviews of one business
    Analyze {
        /// Postal code of the business
        #[arg(long, default_value = DEMO_POSTAL_CODE)]
        zip: String,

        /// Exact business name
        #[arg(long, default_value = DEMO_BUSINESS_NAME)]
        name: String,

        /// Directory for the JSON chart bundle (skipped when absent)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Create the schema and insert the demo businesses and reviews
    SeedDemo,
    /// Import businesses from a CSV export (business_id,name,postal_code)
    ImportBusinesses { csv: PathBuf },
    /// Import labeled reviews from CSV (business_id,review,stars,authenticity_label)
    ImportReviews { csv: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    let db_path = resolve_db_path(args.db.as_deref());
    debug!("Database path resolved - {}", db_path.display());

    // Scoped connection: opened here, dropped when main returns.
    let mut conn = store::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;

    match args.command {
        Command::Analyze { zip, name, out } => {
            let query = BusinessQuery {
                postal_code: zip,
                name,
            };
            match run_report(&conn, &query, &AnalysisParams::default(), out.as_deref())? {
                ReportOutcome::BusinessNotFound { postal_code, name } => {
                    warn!("Business not found - postal_code={}, name={}", postal_code, name);
                    anyhow::bail!(
                        "Business not found: {} / {}\nTry: {} / {} (run `ingestra seed-demo` first)",
                        postal_code,
                        name,
                        DEMO_POSTAL_CODE,
                        DEMO_BUSINESS_NAME
                    );
                }
                ReportOutcome::Analyzed {
                    report,
                    review_count,
                    written,
                    ..
                } => {
                    if review_count == 0 {
                        warn!("Business found but it has no reviews");
                    }
                    println!("{}", report);
                    for path in written {
                        println!("wrote {}", path.display());
                    }
                }
            }
        }
        Command::SeedDemo => {
            let summary = store::seed_demo(&mut conn)?;
            println!(
                "Demo database ready at {} (businesses={}, new reviews={})",
                db_path.display(),
                summary.businesses,
                summary.reviews
            );
        }
        Command::ImportBusinesses { csv } => {
            let n = store::import_businesses_csv(&mut conn, &csv)
                .with_context(|| format!("importing businesses from {}", csv.display()))?;
            info!("Imported businesses - rows={}", n);
            println!("Imported {} businesses", n);
        }
        Command::ImportReviews { csv } => {
            let n = store::import_reviews_csv(&mut conn, &csv)
                .with_context(|| format!("importing reviews from {}", csv.display()))?;
            info!("Imported reviews - rows={}", n);
            println!("Imported {} reviews", n);
        }
    }

    Ok(())
}
