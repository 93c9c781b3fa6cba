//! Locally persisted preferences: display name and theme. Read once at
//! startup, written on change; anything unreadable falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Light/dark choice carried alongside the name. Pure display preference,
/// never sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

pub fn load_prefs(path: &Path) -> Preferences {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Preferences>(&content) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!("failed to parse prefs file {}: {}", path.display(), err);
                Preferences::default()
            }
        },
        Err(err) => {
            tracing::info!("prefs file {} not read ({}); using defaults", path.display(), err);
            Preferences::default()
        }
    }
}

pub fn save_prefs(path: &Path, prefs: &Preferences) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(prefs)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn theme_toggle_flips_both_ways() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let td = TempDir::new().expect("tempdir");
        let prefs = load_prefs(&td.path().join("nope.json"));
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn saved_prefs_load_back() {
        let td = TempDir::new().expect("tempdir");
        let path = td.path().join("nested").join("prefs.json");
        let prefs = Preferences { username: Some("Ana".into()), theme: Theme::Dark };
        save_prefs(&path, &prefs).expect("save");
        assert_eq!(load_prefs(&path), prefs);
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let td = TempDir::new().expect("tempdir");
        let path = td.path().join("prefs.json");
        fs::write(&path, "{not json").expect("write");
        assert_eq!(load_prefs(&path), Preferences::default());
    }
}
