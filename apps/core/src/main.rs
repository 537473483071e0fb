// AgriPilot+ Data Hub entry point
// Uploads the files given on the command line, analyses them and prints the
// dashboard figures. `ask <question>` queries the assistant instead; a bare
// `ask` prints its greeting.
// Results go to stdout as JSON, logs to stderr.

use agripilot_core::actors::assistant::ASSISTANT_GREETING;
use agripilot_core::config::{HubConfig, UploaderConfig};
use agripilot_core::data::summaries::{
    all_tags, upcoming_actions, CropSummary, FinancingSummary, LivestockSummary,
};
use agripilot_core::models::SourceFile;
use agripilot_core::notify::TracingNotifier;
use agripilot_core::telemetry::{self, LogFormat};
use agripilot_core::DataHub;
use serde_json::json;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing("agripilot-core", LogFormat::from_env())?;

    let config = HubConfig::from_env()?;
    let hub = DataHub::with_fixtures(config, Arc::new(TracingNotifier))?;

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    if args.first().and_then(|a| a.to_str()) == Some("ask") {
        let question: Vec<String> = args[1..].iter().map(|a| a.to_string_lossy().into_owned()).collect();
        if question.is_empty() {
            println!("{}", json!({ "greeting": ASSISTANT_GREETING }));
            return Ok(());
        }
        let reply = hub.ask(question.join(" ")).await?;
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    print_dashboard(&hub).await?;

    let paths: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
    if paths.is_empty() {
        info!("No files given, nothing to upload");
        return Ok(());
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        match SourceFile::from_path(path).await {
            Ok(file) => sources.push(file),
            Err(e) => error!("Cannot read {:?}: {}", path, e),
        }
    }

    // Everything named on the command line is one batch.
    let mut uploader = hub.uploader_with(UploaderConfig {
        multiple: true,
        ..hub.config().uploader.clone()
    })?;
    let report = uploader.process_files(sources).await;

    for file in &report.uploaded {
        let view = hub.analyze(file).await;
        let route = view.analysis().map(|analysis| hub.integrate(file, analysis));
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "file": file,
                "analysis": view,
                "route": route,
            }))?
        );
    }

    for rejection in &report.rejections {
        println!("{}", rejection.message());
    }

    if let Some(failure) = report.failure {
        anyhow::bail!("Upload batch aborted: {}", failure);
    }
    Ok(())
}

async fn print_dashboard(hub: &DataHub) -> anyhow::Result<()> {
    let repository = hub.repository();
    let today = chrono::Local::now().date_naive();

    let crops = repository.crops().await?;
    let livestock = repository.livestock().await?;
    let financing = repository.financing_opportunities().await?;
    let documents = repository.documents().await?;

    let dashboard = json!({
        "stats": repository.dashboard_stats().await?,
        "recent_activity": repository.recent_activity().await?,
        "crops": CropSummary::from_crops(&crops),
        "livestock": LivestockSummary::from_groups(&livestock),
        "upcoming_actions": upcoming_actions(&livestock, today),
        "financing": FinancingSummary::from_opportunities(&financing),
        "document_tags": all_tags(&documents),
    });
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
