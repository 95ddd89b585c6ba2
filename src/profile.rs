use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    validation::{validate_alias, validate_email, validate_user},
};

/// A Git identity stored under an alias
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Git username (user.name)
    pub user: String,
    /// Git email address (user.email)
    pub email: String,
}

/// Alias to profile mapping, persisted as one JSON object.
///
/// Keys are kept sorted so listings and numbered selection are reproducible.
/// Alias lookup is case-sensitive.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new store containing `alias`, or an error if the input is
    /// invalid or the alias is taken. The receiver is consumed so callers
    /// always continue with the returned snapshot.
    pub fn add(mut self, alias: &str, user: &str, email: &str) -> Result<Self, AppError> {
        let alias = alias.trim();
        let user = user.trim();
        let email = email.trim();

        validate_alias(alias, &self)?;
        validate_user(user)?;
        validate_email(email)?;

        self.profiles.insert(
            alias.to_string(),
            Profile {
                user: user.to_string(),
                email: email.to_string(),
            },
        );
        Ok(self)
    }

    /// Inserts an already validated entry, used by the loader
    pub(crate) fn insert_loaded(&mut self, alias: String, profile: Profile) {
        self.profiles.insert(alias, profile);
    }

    pub fn get(&self, alias: &str) -> Option<&Profile> {
        self.profiles.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.profiles.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Entries in alias order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles
            .iter()
            .map(|(alias, profile)| (alias.as_str(), profile))
    }

    /// Resolves a 1-based menu number to the entry at that sorted position
    pub fn select(&self, choice: usize) -> Result<(&str, &Profile), AppError> {
        if choice == 0 || choice > self.len() {
            return Err(AppError::InvalidInput(format!(
                "choose a number between 1 and {}",
                self.len()
            )));
        }
        self.iter()
            .nth(choice - 1)
            .ok_or_else(|| AppError::InvalidInput(format!("no profile numbered {choice}")))
    }
}

/// Parses a typed menu number and checks it against the store
pub fn parse_selection(input: &str, store: &ProfileStore) -> Result<usize, AppError> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a number", input.trim())))?;
    store.select(choice)?;
    Ok(choice)
}
