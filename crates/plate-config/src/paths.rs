//! Platform-specific preset directories.
//!
//! - **User presets**: `~/.config/plate/presets/` (Linux),
//!   `~/Library/Application Support/plate/presets/` (macOS),
//!   `%APPDATA%\plate\presets\` (Windows)
//! - **System presets**: `/usr/share/plate/presets/` (Linux),
//!   `/Library/Application Support/plate/presets/` (macOS)
//!
//! # Example
//!
//! ```rust,no_run
//! use plate_config::paths;
//!
//! println!("User presets: {:?}", paths::user_presets_dir());
//!
//! if let Some(path) = paths::find_preset("my_hall") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "plate";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific presets directory.
///
/// Falls back to `./plate/presets` if the config directory cannot be
/// determined.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Returns the system-wide presets directory. Usually read-only.
pub fn system_presets_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support")
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
}

/// Find a preset file by name.
///
/// Searches in order:
/// 1. `name` as a path to an existing file
/// 2. User presets directory
/// 3. System presets directory
///
/// A `.toml` extension is added when missing.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &[user_presets_dir(), system_presets_dir()])
}

fn find_preset_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };

    dirs.iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Ensure the user presets directory exists and return it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List preset files in the user and system directories, user first.
///
/// Unreadable or missing directories contribute nothing.
pub fn list_all_presets() -> Vec<PathBuf> {
    let mut presets = list_presets_in_dir(&user_presets_dir());
    presets.extend(list_presets_in_dir(&system_presets_dir()));
    presets
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use plate_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/big_hall.toml"));
/// assert_eq!(name, Some("big_hall".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
