//! Command loader - Discovers command definitions from a directory tree
//!
//! Layout: `<root>/<category>/<command>.yaml`. Only immediate subdirectories
//! of the root are scanned, and only files directly inside them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::definition::CommandDefinition;
use crate::application::errors::ConfigError;
use crate::domain::entities::{Command, CommandRegistry};

const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Command loader
pub struct CommandLoader {
    root: PathBuf,
}

impl CommandLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every definition under the root into a registry
    pub fn load(root: impl Into<PathBuf>) -> CommandRegistry {
        let mut builder = CommandRegistry::builder();
        builder.extend(Self::new(root).load_all());
        builder.build()
    }

    /// Load a single definition file
    pub fn load_command(&self, path: impl AsRef<Path>) -> Result<Arc<dyn Command>, ConfigError> {
        let command = CommandDefinition::from_file(path)?.into_command()?;
        Ok(Arc::new(command))
    }

    /// Load all definitions. Malformed files are skipped with a warning.
    pub fn load_all(&self) -> Vec<Arc<dyn Command>> {
        let mut commands = Vec::new();

        if !self.root.is_dir() {
            tracing::warn!("Command directory does not exist: {}", self.root.display());
            return commands;
        }

        for category in sorted_entries(&self.root) {
            if !category.is_dir() {
                continue;
            }

            for path in sorted_entries(&category) {
                if !path.is_file() || !has_definition_extension(&path) {
                    continue;
                }

                match self.load_command(&path) {
                    Ok(command) => {
                        tracing::debug!("Loaded command {} from {}", command.name(), path.display());
                        commands.push(command);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping command at {}: {}", path.display(), e);
                    }
                }
            }
        }

        commands
    }
}

/// Non-hidden directory entries in name order
fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                tracing::warn!("Failed to read directory entry: {}", e);
                None
            }
        })
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.'))
        })
        .collect();
    paths.sort();
    paths
}

fn has_definition_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e))
}
