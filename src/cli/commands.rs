//! Command dispatch
//!
//! Acts as the renderer for the core: loads the blueprint, replays gestures
//! through a `ViewSession` and prints the outline or the computed geometry.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, Gesture, OutlineRow, Target, ViewSession};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, ViewArgs};
use crate::cli::output::{self, display_name};
use crate::cli::CliResult;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Layout, LayoutNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    match &cli.command {
        Some(Commands::Check { file }) => {
            let container = load_container(&project_dir)?;
            check(&container, &project_dir, file.as_deref())
        }
        Some(Commands::Tree(view)) => {
            let container = load_container(&project_dir)?;
            tree(&container, &project_dir, view)
        }
        Some(Commands::Layout { view, format }) => {
            let container = load_container(&project_dir)?;
            layout(&container, &project_dir, view, *format)
        }
        Some(Commands::Config { command }) => config(command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?),
    }
}

fn load_container(project_dir: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(project_dir))?;
    Ok(ServiceContainer::new(settings))
}

fn blueprint_path(container: &ServiceContainer, project_dir: &Path, file: Option<&Path>) -> PathBuf {
    match file {
        Some(f) => f.to_path_buf(),
        None => container.settings.blueprint_path(project_dir),
    }
}

#[instrument(skip(container))]
fn check(container: &ServiceContainer, project_dir: &Path, file: Option<&Path>) -> CliResult<()> {
    let path = blueprint_path(container, project_dir, file);
    let blueprint = container.loader().load(&path)?;
    output::success(&format!(
        "{}: {} layers, {} sections, {} components",
        path.display(),
        blueprint.layers.len(),
        blueprint.section_count(),
        blueprint.component_count()
    ));
    Ok(())
}

/// Load leniently and replay the requested gestures.
///
/// A blueprint that fails to load is shown as empty, with a warning.
/// Returns the resolved path alongside the session.
fn open_session(
    container: &ServiceContainer,
    project_dir: &Path,
    view: &ViewArgs,
) -> (PathBuf, ViewSession) {
    let path = blueprint_path(container, project_dir, view.file.as_deref());
    let (blueprint, err) = container.loader().load_or_empty(&path);
    if let Some(e) = err {
        output::warning(&format!("{e}; showing an empty blueprint"));
    }

    let mut session = ViewSession::new(blueprint, container.engine());
    if view.all {
        session.handle(&Gesture::ExpandAll);
    }
    for gesture in &view.gestures {
        session.handle(gesture);
    }
    debug!("open_session: {} gestures applied", view.gestures.len());
    (path, session)
}

#[instrument(skip(container))]
fn tree(container: &ServiceContainer, project_dir: &Path, view: &ViewArgs) -> CliResult<()> {
    let (path, session) = open_session(container, project_dir, view);
    output::info(&outline_tree(path.display().to_string(), &session.outline()));
    Ok(())
}

#[instrument(skip(container))]
fn layout(
    container: &ServiceContainer,
    project_dir: &Path,
    view: &ViewArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let (_, session) = open_session(container, project_dir, view);
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(session.layout()).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize layout".to_string(),
                    source: Box::new(e),
                }
            })?;
            output::info(&json);
        }
        OutputFormat::Table => print_layout(session.layout()),
    }
    Ok(())
}

fn config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}{}", path.display(), exists_marker(&path))),
                None => output::info("global: (no config directory)"),
            }
            let local = local_config_path(project_dir);
            output::info(&format!("local:  {}{}", local.display(), exists_marker(&local)));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn exists_marker(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (not found)"
    }
}

/// Render outline rows as a terminal tree under `root`.
pub fn outline_tree(root: String, rows: &[OutlineRow]) -> Tree<String> {
    let mut tree = Tree::new(root);
    let mut layer: Option<Tree<String>> = None;
    let mut section: Option<Tree<String>> = None;

    for row in rows {
        let label = outline_label(row);
        match row.target {
            Target::Layer(_) => {
                attach(&mut layer, section.take());
                if let Some(done) = layer.take() {
                    tree.push(done);
                }
                layer = Some(Tree::new(label));
            }
            Target::Section { .. } => {
                attach(&mut layer, section.take());
                section = Some(Tree::new(label));
            }
            Target::Component { .. } => {
                if let Some(s) = section.as_mut() {
                    s.push(Tree::new(label));
                }
            }
        }
    }
    attach(&mut layer, section.take());
    if let Some(done) = layer.take() {
        tree.push(done);
    }
    tree
}

fn attach(parent: &mut Option<Tree<String>>, child: Option<Tree<String>>) {
    if let (Some(p), Some(c)) = (parent.as_mut(), child) {
        p.push(c);
    }
}

fn outline_label(row: &OutlineRow) -> String {
    let name = display_name(row.target.name());
    let marker = match (&row.target, row.open) {
        (Target::Component { .. }, true) => "●",
        (Target::Component { .. }, false) => "○",
        (_, true) => "▾",
        (_, false) => "▸",
    };
    if !row.open && row.children > 0 {
        format!("{marker} {name} ({})", row.children)
    } else {
        format!("{marker} {name}")
    }
}

fn print_layout(layout: &Layout) {
    if layout.is_empty() {
        output::info("(nothing expanded)");
        return;
    }
    output::header(&format!("{} visible nodes", layout.nodes.len()));
    for node in &layout.nodes {
        output::detail(&layout_row(node));
    }
}

fn layout_row(node: &LayoutNode) -> String {
    let indent = "  ".repeat(node.depth as usize);
    format!(
        "{indent}{} [{}] x={:.1} y={:.1} w={:.1} h={:.1}",
        node.id,
        display_name(&node.label),
        node.position.x,
        node.position.y,
        node.size.width,
        node.size.height
    )
}
