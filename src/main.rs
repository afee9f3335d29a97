use std::process::ExitCode;

use feedback_lib::{init_tracing, AppConfig, FeedbackDesk, FeedbackResult};

/// Config file read from the working directory unless a path is given
const DEFAULT_CONFIG_PATH: &str = "feedback-config.json";

fn run() -> FeedbackResult<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&path)?;
    init_tracing(config.min_log_level());

    let desk = FeedbackDesk::new(config)?;

    match desk.session().check_auth()? {
        Some(user) => tracing::info!("Restored session for {}", user.email),
        None => tracing::info!("No stored session"),
    }

    let published = desk.questions().list_published()?;
    tracing::info!("{} published question(s)", published.len());

    let summary = desk.analytics().compute_summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    for bucket in desk.analytics().rating_distribution()? {
        println!("{:>8}: {}", bucket.label, bucket.count);
    }

    let yes_no = desk.analytics().yes_no_distribution()?;
    println!("     Yes: {}\n      No: {}", yes_no.yes, yes_no.no);

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
