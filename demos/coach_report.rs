use anyhow::Context;
use bmc_coach::{BmcCoach, CoachConfig, CoachingEvent, OpenAiClient, ReportOptions};
use dotenv::dotenv;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .context("usage: coach_report <canvas.docx|canvas.pdf|canvas.txt> [output_dir]")?,
    );
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let config = CoachConfig::from_env()?;
    println!("🧭 Coaching with model {}", config.model);

    let mut options = ReportOptions::default();
    if let Ok(coach_name) = std::env::var("BMC_COACH_NAME") {
        options = options.with_coach_name(coach_name);
    }
    if let Ok(logo) = std::env::var("BMC_COACH_LOGO") {
        options = options.with_logo(logo);
    }

    let coach = BmcCoach::new(OpenAiClient::new(config)?);

    let (tx, mut rx) = mpsc::channel(16);
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                CoachingEvent::Starting => println!("📄 Preparing submission..."),
                CoachingEvent::RequestingFeedback { empty_blocks } => {
                    println!("🤖 Requesting feedback ({} empty blocks)...", empty_blocks)
                }
                CoachingEvent::NormalizingResponse => println!("🧹 Normalizing response..."),
                CoachingEvent::EnforcingMissingBlocks => {
                    println!("🔒 Enforcing missing-block placeholders...")
                }
                CoachingEvent::Success => println!("✅ Feedback ready"),
                CoachingEvent::Failed { reason } => eprintln!("❌ {}", reason),
            }
        }
    });

    let data = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let submission = bmc_coach::read_submission(file_name, &data)?;
    let rendered = coach.coach_and_render(submission, &options, Some(tx)).await;
    progress.await?;
    let rendered = rendered?;

    for warning in &rendered.warnings {
        eprintln!("⚠️  {}", warning);
    }
    let path = rendered.write_to(&output_dir)?;
    println!("💾 Report written to {}", path.display());

    Ok(())
}
