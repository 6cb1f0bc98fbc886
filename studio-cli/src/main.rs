//! # Saorsa Studio CLI
//!
//! Replays editor command scripts against a composition.

use anyhow::Context;
use clap::Parser;
use studio_cli::{page_summary, parse_script, replay, CliArgs, CliConfig, Source, Task};
use studio_core::Editor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio_core=debug,studio_cli=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);

    let script_path = match &config.task {
        Task::Replay(path) => path,
        Task::ListProjects => {
            let storage = config.storage()?;
            let ids = storage.list()?;
            tracing::info!("{} projects in {}", ids.len(), storage.data_dir().display());
            for id in ids {
                println!("{id}");
            }
            return Ok(());
        }
        Task::DeleteProject(id) => {
            let storage = config.storage()?;
            storage.delete(id)?;
            tracing::info!("Deleted project {id} from {}", storage.data_dir().display());
            return Ok(());
        }
    };

    let editor_config = config.editor_config()?;

    tracing::info!(
        "Editor config: {}x{} at {} px/s",
        editor_config.default_width,
        editor_config.default_height,
        editor_config.pixels_per_second
    );

    let mut editor = match config.load_state()? {
        Some(state) => Editor::with_state(state, editor_config),
        None => Editor::new(editor_config),
    };

    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let commands = parse_script(&script)?;
    let applied = replay(&mut editor, commands)?;
    tracing::info!("Applied {applied} commands (version {})", editor.store().version());

    let snapshot = editor.snapshot();
    for line in page_summary(&snapshot) {
        tracing::info!("{line}");
    }

    let json = snapshot.to_json()?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing snapshot {}", path.display()))?;
            tracing::info!("Wrote snapshot to {}", path.display());
        }
        None => println!("{json}"),
    }

    if let Source::Project(id) = &config.source {
        let path = config.storage()?.save(id, &snapshot)?;
        tracing::info!("Saved project {id} to {}", path.display());
    }

    Ok(())
}
