use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use serde_json::Value;

use crate::{
    error::AppError,
    output,
    profile::{Profile, ProfileStore},
    validation::{validate_alias_format, validate_email, validate_user},
};

/// Directory under the user's config dir holding the profiles file
const APP_CONFIG_DIR: &str = "gitswitch";
/// Profiles file name
const PROFILES_FILE: &str = "profiles.json";

/// Gets the path to the profiles file, `<config dir>/gitswitch/profiles.json`
pub fn default_profiles_path() -> Result<PathBuf, AppError> {
    let config_dir = dirs::config_dir().ok_or(AppError::ConfigDirNotFound)?;
    Ok(config_dir.join(APP_CONFIG_DIR).join(PROFILES_FILE))
}

/// Handle on the profiles file and its lock file
#[derive(Debug, Clone)]
pub struct ProfileFile {
    path: PathBuf,
}

impl ProfileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Profiles file in the per-user config directory
    pub fn default_location() -> Result<Self, AppError> {
        Ok(Self::new(default_profiles_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Loads the store, degrading to an empty one on any problem
    pub fn load(&self) -> ProfileStore {
        load(&self.path)
    }

    /// Writes the whole store
    pub fn save(&self, store: &ProfileStore) -> Result<(), AppError> {
        save(&self.path, store)
    }

    /// Runs a load-modify-save cycle while holding an exclusive lock.
    ///
    /// Nothing is written when `modify` fails.
    pub fn update<F>(&self, modify: F) -> Result<ProfileStore, AppError>
    where
        F: FnOnce(ProfileStore) -> Result<ProfileStore, AppError>,
    {
        let _lock = StoreLock::acquire(&self.lock_path())?;
        let updated = modify(self.load())?;
        self.save(&updated)?;
        Ok(updated)
    }
}

/// Exclusive lock held for the duration of one update, released on drop
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn acquire(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Loads user profiles from the JSON file.
///
/// A missing or blank file is an empty store. An unreadable or unparsable file
/// prints a warning and is also an empty store.
pub fn load(path: &Path) -> ProfileStore {
    match try_load(path) {
        Ok(store) => store,
        Err(e) => {
            output::warn(&format!("{e}; starting with no profiles"));
            ProfileStore::new()
        }
    }
}

/// Strict loader behind [`load`]. Individual malformed entries are dropped with
/// a warning; only whole-file problems are errors.
fn try_load(path: &Path) -> Result<ProfileStore, AppError> {
    if !path.exists() {
        return Ok(ProfileStore::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| AppError::ConfigLoad(format!("{}: {e}", path.display())))?;
    if contents.trim().is_empty() {
        return Ok(ProfileStore::new());
    }

    let document: Value = serde_json::from_str(&contents)
        .map_err(|e| AppError::ConfigLoad(format!("{}: {e}", path.display())))?;
    let Value::Object(entries) = document else {
        return Err(AppError::ConfigLoad(format!(
            "{}: expected a JSON object of profiles",
            path.display()
        )));
    };

    let mut store = ProfileStore::new();
    for (alias, value) in entries {
        match parse_entry(&alias, value) {
            Ok(profile) => store.insert_loaded(alias, profile),
            Err(reason) => output::warn(&format!("skipping stored profile '{alias}': {reason}")),
        }
    }
    Ok(store)
}

fn parse_entry(alias: &str, value: Value) -> Result<Profile, String> {
    validate_alias_format(alias).map_err(|e| e.to_string())?;
    let profile: Profile = serde_json::from_value(value).map_err(|e| e.to_string())?;
    validate_user(&profile.user).map_err(|e| e.to_string())?;
    validate_email(&profile.email).map_err(|e| e.to_string())?;
    Ok(profile)
}

/// Saves user profiles to the JSON file, creating the directory on first use.
///
/// The content goes to a sibling temp file which is then renamed over the
/// target, so readers never observe a half-written file.
pub fn save(path: &Path, store: &ProfileStore) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(store)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
