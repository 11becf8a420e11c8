#![warn(clippy::pedantic)]

mod script;
mod settings;

use std::sync::Arc;

use anyhow::Result as AnyResult;
use nazori_core::{
    session::DrawingSession,
    store::{self, FsStore, SharedStore},
};

async fn run(settings: &settings::Settings, scripts: Vec<std::path::PathBuf>) -> AnyResult<()> {
    let data_dir = settings.data_dir();
    let store = store::global(move || async move {
        let store: SharedStore = Arc::new(FsStore::open(data_dir).await?);
        Ok(store)
    })
    .await?;

    let mut session = DrawingSession::open(store, settings.session_config()).await?;
    if let Some(e) = session.take_error() {
        log::warn!("Opened with problems: {e}");
    }
    log::info!(
        "Drawing {:?}, {} drawings in profile",
        session.drawings().current_drawing_id(),
        session.drawings().drawings().len()
    );

    let mut frames = tokio::time::interval(settings.frame_interval());
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    if scripts.is_empty() {
        log::info!("No scripts given, nothing to draw.");
    }
    // Did at least one script run to completion? No scripts is a success.
    let mut had_success = scripts.is_empty();
    for path in scripts {
        let script = match script::Script::load(&path) {
            Ok(script) => script,
            Err(e) => {
                log::error!("failed to read script {path:?}: {e:#}");
                continue;
            }
        };
        match script.run(&mut session, &mut frames).await {
            Ok(()) => had_success = true,
            Err(e) => log::error!("script {path:?} failed: {e:#}"),
        }
    }
    if !had_success {
        log::warn!("Every script failed.");
    }

    session.unmount();
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let settings = settings::Settings::get();
    if let Err(e) = settings.save() {
        log::warn!("Failed to save settings:\n{e:?}");
    };

    // Args are a simple list of script paths, replayed in order.
    let scripts: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(settings, scripts))
}
