//! # Saorsa Studio CLI
//!
//! Command-line host for the studio editor core.
//!
//! Loads a composition, replays a JSON command script through the editor
//! and writes the resulting snapshot.
//!
//! ## Usage
//!
//! ```bash
//! studio --script edits.json --input poster.json --output out.json
//! ```
//!
//! ## With a project directory:
//!
//! ```bash
//! studio --script edits.json --project reel-01 --project-dir ./projects
//! studio --list-projects --project-dir ./projects
//! studio --delete-project reel-01 --project-dir ./projects
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved run configuration and its `Task`
//! - `ProjectStorage` - File-backed project persistence
//! - `replay` - Drives `studio_core::Editor` from a command list

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod storage;

pub use storage::{ProjectStorage, StorageError};

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use studio_core::{CanvasState, Command, Editor, EditorConfig};

/// Command-line arguments for studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "studio")]
#[command(about = "Replay editor command scripts against a Saorsa Studio composition")]
#[command(version)]
#[command(group(
    ArgGroup::new("task")
        .required(true)
        .args(["script", "list_projects", "delete_project"]),
))]
pub struct CliArgs {
    /// JSON file holding an array of editor commands
    #[arg(long, env = "STUDIO_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Print the project ids in the project directory and exit
    #[arg(long)]
    pub list_projects: bool,

    /// Delete a project from the project directory and exit
    #[arg(long, value_name = "ID")]
    pub delete_project: Option<String>,

    /// Composition JSON to start from
    #[arg(long, env = "STUDIO_INPUT", conflicts_with = "project")]
    pub input: Option<PathBuf>,

    /// Project id to load from and save back to the project directory
    #[arg(long, env = "STUDIO_PROJECT")]
    pub project: Option<String>,

    /// Directory holding project files
    #[arg(long, env = "STUDIO_PROJECT_DIR", default_value = "projects")]
    pub project_dir: PathBuf,

    /// Where to write the final snapshot (stdout when absent)
    #[arg(long, env = "STUDIO_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Editor configuration JSON
    #[arg(long, env = "STUDIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Timeline scale override
    #[arg(long, env = "STUDIO_PIXELS_PER_SECOND")]
    pub pixels_per_second: Option<f64>,

    /// Width of a new canvas
    #[arg(long, env = "STUDIO_WIDTH")]
    pub width: Option<u32>,

    /// Height of a new canvas
    #[arg(long, env = "STUDIO_HEIGHT")]
    pub height: Option<u32>,
}

/// What a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Replay the command script at this path.
    Replay(PathBuf),
    /// Print the stored project ids.
    ListProjects,
    /// Remove a stored project.
    DeleteProject(String),
}

/// Where the initial composition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A fresh canvas sized from the editor configuration.
    Blank,
    /// A composition JSON file.
    File(PathBuf),
    /// A project in the project directory.
    Project(String),
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// What to do.
    pub task: Task,
    /// Initial composition.
    pub source: Source,
    /// Project directory.
    pub project_dir: PathBuf,
    /// Snapshot destination; stdout when `None`.
    pub output: Option<PathBuf>,
    /// Editor configuration file to layer overrides onto.
    pub config_file: Option<PathBuf>,
    /// Timeline scale override.
    pub pixels_per_second: Option<f64>,
    /// Canvas width override.
    pub width: Option<u32>,
    /// Canvas height override.
    pub height: Option<u32>,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let source = match (args.project, args.input) {
            (Some(project), _) => Source::Project(project),
            (None, Some(path)) => Source::File(path),
            (None, None) => Source::Blank,
        };
        let task = match (args.script, args.delete_project) {
            (Some(script), _) => Task::Replay(script),
            (None, Some(id)) => Task::DeleteProject(id),
            (None, None) => Task::ListProjects,
        };
        Self {
            task,
            source,
            project_dir: args.project_dir,
            output: args.output,
            config_file: args.config,
            pixels_per_second: args.pixels_per_second,
            width: args.width,
            height: args.height,
        }
    }
}

impl CliConfig {
    /// Build the editor configuration: file values first, flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn editor_config(&self) -> anyhow::Result<EditorConfig> {
        let mut config = match &self.config_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                EditorConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => EditorConfig::default(),
        };
        if let Some(pps) = self.pixels_per_second {
            config.pixels_per_second = pps;
        }
        if let Some(width) = self.width {
            config.default_width = width;
        }
        if let Some(height) = self.height {
            config.default_height = height;
        }
        Ok(config)
    }

    /// Open the project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn storage(&self) -> anyhow::Result<ProjectStorage> {
        ProjectStorage::open(&self.project_dir)
            .with_context(|| format!("opening project dir {}", self.project_dir.display()))
    }

    /// Load the initial composition, or `None` for a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or project cannot be loaded.
    pub fn load_state(&self) -> anyhow::Result<Option<CanvasState>> {
        match &self.source {
            Source::Blank => Ok(None),
            Source::File(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading composition {}", path.display()))?;
                let state = CanvasState::from_json(&json)
                    .with_context(|| format!("parsing composition {}", path.display()))?;
                Ok(Some(state))
            }
            Source::Project(id) => {
                let storage = self.storage()?;
                if storage.exists(id) {
                    Ok(Some(storage.load(id)?))
                } else {
                    tracing::info!("Project {id} not found; starting blank");
                    Ok(None)
                }
            }
        }
    }
}

/// Parse a command script.
///
/// # Errors
///
/// Returns an error if the JSON is not an array of commands.
pub fn parse_script(json: &str) -> anyhow::Result<Vec<Command>> {
    serde_json::from_str(json).context("parsing command script")
}

/// Replay `commands` through `editor`, stopping at the first rejected one.
///
/// Returns the number of commands applied.
///
/// # Errors
///
/// Returns an error naming the index of the rejected command.
pub fn replay(editor: &mut Editor, commands: Vec<Command>) -> anyhow::Result<usize> {
    let total = commands.len();
    let applied = editor
        .apply_all(commands)
        .map_err(|(index, e)| anyhow::anyhow!("command {index} of {total} failed: {e}"))?;
    if !editor.is_idle() {
        tracing::warn!("Script left a session open; ending it");
        editor.end();
    }
    Ok(applied)
}

/// One line per page: index, element count and timeline length.
#[must_use]
pub fn page_summary(state: &CanvasState) -> Vec<String> {
    state
        .pages()
        .enumerate()
        .map(|(index, page)| {
            format!(
                "page {index}: {} elements, timeline {:.2}s",
                page.len(),
                page.timeline_end()
            )
        })
        .collect()
}
