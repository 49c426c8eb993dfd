//! API key resolution from the process environment and an optional `.env` file.

use std::env;
use std::path::{Path, PathBuf};

/// Recognized variables, highest priority first.
pub const API_KEY_VARS: [&str; 3] = ["AMBEE_API_KEY", "AMBEE_KEY", "API_KEY"];

const DOTENV_FILE: &str = ".env";

/// Load `.env` (if any) into the environment, then resolve the API key.
///
/// Returns an empty string when no recognized variable is set.
pub fn load_api_key() -> String {
    if let Some(path) = dotenv_path() {
        load_dotenv(&path);
    }

    resolve_api_key(|name| env::var(name).ok())
}

/// Resolve the key through `lookup`: the first non-empty candidate wins.
pub fn resolve_api_key<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .find(|value| !value.is_empty())
        .map(|value| clean_secret(&value))
        .unwrap_or_default()
}

/// Strip surrounding whitespace, then surrounding `"` and `'` characters.
pub fn clean_secret(raw: &str) -> String {
    raw.trim().trim_matches('"').trim_matches('\'').to_string()
}

/// Load variables from `path` without overriding ones already set.
/// A missing or unreadable file is not an error.
pub fn load_dotenv(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
            false
        }
    }
}

/// `.env` next to the executable, falling back to the working directory.
fn dotenv_path() -> Option<PathBuf> {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DOTENV_FILE)));

    beside_exe
        .filter(|p| p.is_file())
        .or_else(|| Some(PathBuf::from(DOTENV_FILE)).filter(|p| p.is_file()))
}
