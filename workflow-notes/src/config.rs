use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Root directory of the notes vault
    pub const VAULT_DIR: &str = "WORKFLOW_VAULT_DIR";
    /// Explicit settings file location; defaults to a file inside the vault.
    pub const SETTINGS_PATH: &str = "WORKFLOW_SETTINGS_PATH";
    /// Command used to open notes (e.g. "code" or "vim"). Unset = no editor.
    pub const EDITOR: &str = "WORKFLOW_EDITOR";
}

/// Default values
pub mod defaults {
    pub const VAULT_DIR: &str = ".";
    pub const SETTINGS_DIR: &str = ".workflow";
    pub const SETTINGS_FILE: &str = "settings.ron";
}

/// Get the vault root directory
pub fn vault_dir() -> PathBuf {
    env::var(env_vars::VAULT_DIR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(defaults::VAULT_DIR))
}

/// Get the settings file path (`<vault>/.workflow/settings.ron` unless overridden)
pub fn settings_path(vault: &Path) -> PathBuf {
    match env::var(env_vars::SETTINGS_PATH) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => default_settings_path(vault),
    }
}

pub fn default_settings_path(vault: &Path) -> PathBuf {
    vault
        .join(defaults::SETTINGS_DIR)
        .join(defaults::SETTINGS_FILE)
}

/// Editor command for "open in editor", if configured
pub fn editor_command() -> Option<String> {
    env::var(env_vars::EDITOR)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_path_is_inside_vault() {
        assert_eq!(
            default_settings_path(Path::new("/notes")),
            PathBuf::from("/notes/.workflow/settings.ron")
        );
    }
}
