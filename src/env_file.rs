//! `.env` file loading. Values already in the process environment win.

use std::path::{Path, PathBuf};

/// Parse `KEY=VALUE` lines.
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty key
/// are skipped. A leading `export ` is ignored and surrounding quotes are
/// stripped from values.
#[must_use]
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    for raw_line in contents.lines() {
        let mut line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("export ") {
            line = stripped.trim();
        }
        let Some((key, value)) = line.split_once('=') else { continue };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        vars.push((key.to_string(), value.to_string()));
    }
    vars
}

/// Load `path` into the process environment without overriding existing keys.
///
/// A missing file is not an error. Returns how many keys were applied.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_env_file(path: &Path) -> std::io::Result<usize> {
    if !path.is_file() {
        return Ok(0);
    }
    let contents = std::fs::read_to_string(path)?;
    let mut applied = 0;
    for (key, value) in parse_env_file(&contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied += 1;
        }
    }
    Ok(applied)
}

/// Locate the `.env` file to load:
/// 1. Explicit path (from `--env-file`)
/// 2. `.env` next to the executable
/// 3. `.env` in the current directory
#[must_use]
pub fn discover_env_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
    let in_cwd = std::env::current_dir().ok().map(|dir| dir.join(".env"));

    beside_exe.into_iter().chain(in_cwd).find(|p| p.is_file())
}
