//! Configuration loading.
//!
//! Settings live in `settings.json` under the platform config
//! directory (e.g. `~/.config/termbase/` on Linux). A missing file
//! means defaults; an unreadable file means defaults plus a warning.
//! Configuration problems never prevent startup.

mod settings;

pub use settings::{EnrichmentSettings, ServerSettings, Settings, StorageSettings};

use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "termbase")
}

/// Location of the settings file, if a home directory is resolvable.
pub fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Default location of the term store file.
pub fn default_data_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("terms.json"))
        .unwrap_or_else(|| PathBuf::from("data/terms.json"))
}

/// Loads settings from disk, falling back to defaults.
///
/// A `PORT` environment variable overrides the configured port, so the
/// usual container conventions keep working.
pub fn load() -> Settings {
    let mut settings: Settings = settings_file()
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(contents) => Some((path, contents)),
            Err(_) => None,
        })
        .and_then(|(path, contents)| match serde_json::from_str(&contents) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings file unreadable, using defaults");
                None
            }
        })
        .unwrap_or_default();

    if let Ok(port) = std::env::var("PORT") {
        match port.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring non-numeric PORT override"),
        }
    }

    settings
}
