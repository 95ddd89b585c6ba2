pub mod cli;
pub mod credentials;
pub mod error;
pub mod git;
pub mod identity;
pub mod menu;
pub mod output;
pub mod process;
pub mod profile;
pub mod storage;
pub mod validation;

pub use error::AppError;
pub use profile::{Profile, ProfileStore};

#[cfg(test)]
pub mod test_utils;
