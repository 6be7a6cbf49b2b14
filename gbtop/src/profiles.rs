//! Connection profiles: JSON mapping of profile name -> { url, tls_ca, export_dir }
//! Stored under XDG config dir: $XDG_CONFIG_HOME/gbtop/profiles.json (fallback ~/.config/gbtop/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("gbtop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gbtop")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// Missing or unreadable files load as empty.
pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed profiles file");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (maybe saved by the caller).
    Direct(ProfileEntry),
    /// Loaded from an existing profile entry.
    Loaded(ProfileEntry),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

#[derive(Debug, Default)]
pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
    pub export_dir: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.url, self.profile_name) {
            // URL given -> direct
            (Some(url), _) => ResolveProfile::Direct(ProfileEntry {
                url,
                tls_ca: self.tls_ca,
                export_dir: self.export_dir,
            }),
            // Only profile name given -> try load; CLI flags override stored values
            (None, Some(name)) => match pf.profiles.get(&name) {
                Some(entry) => ResolveProfile::Loaded(ProfileEntry {
                    url: entry.url.clone(),
                    tls_ca: self.tls_ca.or_else(|| entry.tls_ca.clone()),
                    export_dir: self.export_dir.or_else(|| entry.export_dir.clone()),
                }),
                None => ResolveProfile::PromptCreate(name),
            },
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}
