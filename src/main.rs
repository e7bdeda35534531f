use clap::Parser;
use face_fortune::presentation::{render_html, render_text, ScreenBody};
use face_fortune::utils::{logger, validation::Validate};
use face_fortune::{
    AnalysisClient, AppError, CliConfig, GeminiClient, Session, UploadDisposition, UploadFile,
    ViewState,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json {
        logger::init_report_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting face-fortune");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if !config.has_credential() {
        tracing::warn!("No API key found in API_KEY / GEMINI_API_KEY or the config file");
    }

    let gemini = GeminiClient::from_config(&config).map_err(AppError::from)?;
    let client = AnalysisClient::new(gemini).with_temperature(config.temperature);
    let mut session = Session::new(client);

    if let Some(dir) = &cli.html_output {
        face_fortune::utils::validation::validate_output_dir("html_output", dir)?;
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut failures = 0usize;

    for path in &cli.images {
        let file = UploadFile::from_path(path);

        match session.select_file(file) {
            UploadDisposition::Started(ticket) => {
                tracing::debug!("Waiting for upload {}", ticket);
            }
            UploadDisposition::Ignored => {
                tracing::warn!("Skipping '{}': not an image", path.display());
                continue;
            }
            UploadDisposition::Busy => {
                tracing::warn!("Skipping '{}': another analysis is still running", path.display());
                continue;
            }
        }

        let cancelled = tokio::select! {
            _ = session.settle() => false,
            _ = tokio::signal::ctrl_c() => true,
        };
        if cancelled {
            session.cancel();
            eprintln!("已取消");
            break;
        }

        let screen = session.screen();
        if screen.error.is_some() {
            failures += 1;
        }

        if cli.json {
            println!("{}", json_report(path, session.state())?);
        } else {
            println!("{}", render_text(&screen));
        }

        if let Some(dir) = &cli.html_output {
            if matches!(screen.body, ScreenBody::Result(_)) || screen.error.is_some() {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("reading");
                let target = Path::new(dir).join(format!("{}.html", stem));
                tokio::fs::write(&target, render_html(&screen)).await?;
                tracing::info!("📁 HTML saved to: {}", target.display());
            }
        }

        session.reset();
    }

    if failures > 0 {
        tracing::error!("❌ {} of {} readings failed", failures, cli.images.len());
        std::process::exit(2);
    }

    Ok(())
}

fn json_report(path: &Path, state: &ViewState) -> Result<String, AppError> {
    let report = match state {
        ViewState::Result {
            data, analyzed_at, ..
        } => serde_json::json!({
            "image": path.display().to_string(),
            "analyzedAt": analyzed_at,
            "result": data,
        }),
        _ => serde_json::json!({
            "image": path.display().to_string(),
            "error": state.error(),
        }),
    };
    Ok(serde_json::to_string(&report)?)
}
