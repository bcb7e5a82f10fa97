use clap::{Parser, Subcommand};
use std::path::PathBuf;
use time::{OffsetDateTime, macros::format_description};
use tracing_subscriber::EnvFilter;

use minewatch::config::{Settings, load_settings};
use minewatch::core::dashboard::{format_area, format_growth};
use minewatch::core::{ApiClient, DashboardInput, JobRunner, Slot, UploadTracker, render};
use minewatch::{Channel, VIOLATION_THRESHOLD_KM2};

#[derive(Parser)]
#[command(name = "minewatch")]
#[command(about = "Track legal and no-go mining activity from satellite analysis jobs")]
struct Cli {
    /// Analysis backend base URL (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the desktop dashboard
    #[cfg(feature = "gui")]
    Gui,

    /// Run an analysis job and print the dashboard for one period
    Analyze {
        /// GeoJSON with the legal mine boundary
        #[arg(long, value_name = "FILE")]
        legal: PathBuf,

        /// GeoJSON with the no-go zone
        #[arg(long, value_name = "FILE")]
        nogo: PathBuf,

        /// Period to show (defaults to the most recent one)
        #[arg(long)]
        index: Option<usize>,

        /// Channel for the KPIs: legal or nogo
        #[arg(long, default_value = "legal")]
        tab: Channel,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minewatch=info")),
        )
        .init();

    let args = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(base_url) = args.base_url {
        settings.api.base_url = base_url;
    }

    match args.command {
        Some(Command::Analyze {
            legal,
            nogo,
            index,
            tab,
            verbose,
        }) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(analyze(settings, legal, nogo, index, tab, verbose))
        }
        #[cfg(feature = "gui")]
        Some(Command::Gui) | None => launch_gui(settings),
        #[cfg(not(feature = "gui"))]
        None => anyhow::bail!("built without the `gui` feature; use `minewatch analyze`"),
    }
}

#[cfg(feature = "gui")]
fn launch_gui(settings: Settings) -> anyhow::Result<()> {
    let client = ApiClient::new(&settings.api.base_url, settings.api.request_timeout())?;
    tracing::info!("Using analysis backend at {}", client.base_url());
    minewatch::gui::run(minewatch::gui::AppState::new(settings.api, client))?;
    Ok(())
}

async fn analyze(
    settings: Settings,
    legal: PathBuf,
    nogo: PathBuf,
    index: Option<usize>,
    tab: Channel,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut uploads = UploadTracker::new();
    uploads.load_path(Slot::Legal, &legal).await?;
    uploads.load_path(Slot::NoGo, &nogo).await?;
    let Some((legal_doc, nogo_doc)) = uploads.documents() else {
        anyhow::bail!("both documents are required");
    };

    let client = ApiClient::new(&settings.api.base_url, settings.api.request_timeout())?;
    println!("Submitting analysis to {}", client.base_url());
    let mut runner = JobRunner::new(client, settings.api.base_url.clone(), &settings.api);

    let mut last_reported = -1.0;
    let results = runner
        .run(legal_doc, nogo_doc, |progress| {
            if verbose && progress != last_reported {
                println!("  progress: {:.0}%", progress);
                last_reported = progress;
            }
        })
        .await?;

    let Some(last) = results.last_index() else {
        println!("The analysis returned no periods.");
        return Ok(());
    };
    let index = index.unwrap_or(last);
    let input = DashboardInput::from_results(&results, tab);
    let Some(view) = render(&input, index) else {
        anyhow::bail!("period {} is out of range (0..={})", index, last);
    };

    let generated = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))?;

    println!("\n=== Minewatch Report ({}) ===", generated);
    if let (Some(start), Some(end)) = (&results.window.analysis_start, &results.window.analysis_end) {
        println!("Analysis window: {} to {}", start, end);
    }
    if let Some(zone) = results.selected_zone_name() {
        println!("No-go zone: {} ({} reported)", zone, results.zones.len());
    }
    println!("Period: {} ({}/{})", view.date, index + 1, last + 1);
    println!("View: {}", tab.label());
    println!("  {}: {}", view.kpis.area_title, format_area(view.kpis.current_area));
    println!("  {}: {}", view.kpis.growth_title, format_growth(view.kpis.growth_pct));
    println!("  Predicted next period: {}", format_area(view.kpis.prediction));
    println!("  Status: {}", view.status());

    println!("\nAudit log (threshold {} km²):", VIOLATION_THRESHOLD_KM2);
    if let Some(date) = &view.first_breach {
        println!("  First breach recorded: {}", date);
    }
    for entry in &view.audit_log {
        println!(
            "  LOG_ID: {}  {}  {:<18}  {}",
            entry.log_id,
            entry.date,
            entry.title(),
            format_area(entry.excavation_km2)
        );
    }

    if verbose {
        println!("\nQuantified maps:");
        for entry in &results.quantified_maps {
            println!(
                "  {}  {}",
                entry.date,
                entry.src.as_deref().unwrap_or("(no image)")
            );
        }
    }

    Ok(())
}
