use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_core::{
    dispatch, load_settings, session::COVER_INPUT_ID, CoverUpload, FileTokenStore,
    HttpPortfolioApi, PortfolioCommand, PortfolioEvent, PortfolioSession, SectionCatalog,
    Severity,
};
use shared::domain::UserId;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Opens a portfolio builder session, runs a command script against it and
/// prints the resulting snapshot as JSON.
#[derive(Parser, Debug)]
struct Args {
    /// Portfolio to view; defaults to the signed-in user.
    #[arg(long)]
    target_user: Option<String>,
    /// Script command such as `toggle:Skills`, `edit:education` or `close`.
    #[arg(long = "command", short = 'c')]
    commands: Vec<String>,
    /// Image to post as the cover photo.
    #[arg(long)]
    cover: Option<PathBuf>,
}

async fn read_cover(path: &PathBuf) -> Result<CoverUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read cover image {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(CoverUpload {
        filename,
        mime_type,
        bytes,
    })
}

fn log_event(event: PortfolioEvent) {
    match event {
        PortfolioEvent::Notice(notice) => match notice.severity() {
            Severity::Error => error!(context = ?notice.context(), "{}", notice.message()),
            Severity::Warning => warn!(context = ?notice.context(), "{}", notice.message()),
            _ => info!(context = ?notice.context(), "{}", notice.message()),
        },
        PortfolioEvent::Redirect { path } => info!(%path, "redirect requested"),
        other => info!(event = ?other, "session event"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let commands = args
        .commands
        .iter()
        .map(|raw| raw.parse::<PortfolioCommand>())
        .collect::<Result<Vec<_>, _>>()?;

    let settings = load_settings();
    info!(api = %settings.api_base_url, auth = %settings.auth_base_url, "loaded settings");
    let api = HttpPortfolioApi::from_settings(&settings)?;
    let tokens = FileTokenStore::new(settings.token_file.clone(), settings.token_key.clone());
    let session = PortfolioSession::new(
        Arc::new(api),
        Arc::new(tokens),
        &settings,
        SectionCatalog::standard(),
    );

    let mut events = session.subscribe_events();
    let logger = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let _editors = session.register_standard_editors().await?;
    if let Err(err) = session
        .start_session(args.target_user.map(UserId::new))
        .await
    {
        warn!(error = %err, "session started without remote data");
    }

    for command in commands {
        let name = command.name();
        if let Err(err) = dispatch(&session, command).await {
            warn!(command = name, error = %err, "command failed");
        }
    }

    if let Some(path) = &args.cover {
        let upload = read_cover(path).await?;
        if let Err(err) = session.handle_upload_cover(COVER_INPUT_ID, upload).await {
            warn!(error = %err, "cover upload failed");
        }
    }

    let snapshot = session.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    session.shutdown();
    drop(session);
    let _ = logger.await;
    Ok(())
}
