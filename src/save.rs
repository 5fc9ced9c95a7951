//! Persistence adapter: derives a safe filename from a payload's
//! display name and writes the artifact into the current working
//! directory. Never reads anything back.

use crate::error::SaveError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix for plain blueprint exports.
pub const TOML_SUFFIX: &str = ".toml";
/// Suffix for frozen (depsolved) blueprint exports.
pub const FROZEN_TOML_SUFFIX: &str = ".frozen.toml";

/// Derive a safe filename: spaces become hyphens, any directory
/// component is stripped, and degenerate results (`.`, `..`, `/`) are
/// rejected before the suffix is appended.
pub fn artifact_filename(display_name: &str, suffix: &str) -> Result<String, SaveError> {
    let cleaned = display_name.replace(' ', "-");
    let base = Path::new(&cleaned)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SaveError::InvalidName(display_name.to_string()))?;
    if base == "." || base == ".." || base == "/" {
        return Err(SaveError::InvalidName(display_name.to_string()));
    }
    Ok(format!("{}{}", base, suffix))
}

/// Write `content` to `<sanitized-name><suffix>` in the current working
/// directory, creating or truncating the file with owner-only
/// permissions. Returns the filename that was written.
pub fn save_artifact(
    display_name: &str,
    suffix: &str,
    content: &[u8],
) -> Result<PathBuf, SaveError> {
    let filename = artifact_filename(display_name, suffix)?;
    write_bytes(Path::new(&filename), content)?;
    Ok(PathBuf::from(filename))
}

fn write_bytes(path: &Path, content: &[u8]) -> Result<(), SaveError> {
    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let io_err = |source| SaveError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(content).map_err(io_err)
}
