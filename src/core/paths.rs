//! Where cotizador keeps its files.
//!
//! | What               | Linux default                               |
//! |--------------------|---------------------------------------------|
//! | company profile    | `~/.config/cotizador/company.json`          |
//! | TUI log            | `~/.cache/cotizador/cotizador.log`          |
//! | saved quotations   | `~/.local/share/cotizador/quotations/`      |
//! | exported documents | `~/.local/share/cotizador/exports/`         |

use std::path::PathBuf;

use directories::ProjectDirs;

/// Binary and directory name.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

const QUALIFIER: &str = "mx";
const ORGANIZATION: &str = "materiales";

/// Company profile file name inside the config directory.
pub const COMPANY_FILE: &str = "company.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APP_NAME)
}

pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

pub fn company_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join(COMPANY_FILE))
}

pub fn log_file() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().join(format!("{APP_NAME}.log")))
}

/// Saved quotations. Tests point this at a temp dir with `TEST_DATA_DIR`.
pub fn quotations_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Ok(p) = std::env::var("TEST_DATA_DIR") {
        return Some(PathBuf::from(p));
    }
    project_dirs().map(|d| d.data_dir().join("quotations"))
}

/// Default destination for exported documents.
pub fn exports_dir() -> Option<PathBuf> {
    #[cfg(test)]
    if let Ok(p) = std::env::var("TEST_DATA_DIR") {
        return Some(PathBuf::from(p).join("exports"));
    }
    project_dirs().map(|d| d.data_dir().join("exports"))
}
