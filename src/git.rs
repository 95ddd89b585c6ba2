use crate::{
    error::AppError,
    process::{CommandOutput, CommandRunner},
};

/// Git program name
pub const GIT: &str = "git";
/// Git config key for the author name
pub const USER_NAME_KEY: &str = "user.name";
/// Git config key for the author email
pub const USER_EMAIL_KEY: &str = "user.email";
/// Git config key for the credential helper
pub const CREDENTIAL_HELPER_KEY: &str = "credential.helper";

/// `git config --unset` exits with 5 when the key is not present
const CONFIG_KEY_NOT_SET: i32 = 5;

/// Thin wrapper over the `git` command line
#[derive(Debug)]
pub struct Git<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Git<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.runner.run(GIT, args)
    }

    /// Checks that git is installed, returning its version string
    pub fn version(&self) -> Result<String, AppError> {
        let missing = |detail: String| {
            AppError::MissingDependency(format!(
                "git is required but could not be run ({detail}); install git and make sure it is on your PATH"
            ))
        };
        let output = self.run(&["--version"]).map_err(|e| missing(e.to_string()))?;
        let output = output.check(GIT).map_err(|e| missing(e.to_string()))?;
        Ok(output.stdout.trim().to_string())
    }

    /// Executes Git global config get command, `None` when the key is unset
    ///
    /// # Arguments
    /// * `key` - Git config key (user.name or user.email)
    pub fn get_global(&self, key: &str) -> Result<Option<String>, AppError> {
        let output = self.run(&["config", "--global", "--get", key])?;
        if output.code == Some(1) && output.stderr.trim().is_empty() {
            return Ok(None);
        }
        let value = output.check(GIT)?.stdout.trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }

    /// Executes a Git global config set command
    ///
    /// # Arguments
    /// * `key` - Git config key to set (user.name or user.email)
    /// * `value` - Value to set for key (username or email)
    pub fn set_global(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.run(&["config", "--global", key, value])?.check(GIT)?;
        Ok(())
    }

    /// Removes every global value of `key`. Returns `false` if nothing was set.
    pub fn unset_global(&self, key: &str) -> Result<bool, AppError> {
        let output = self.run(&["config", "--global", "--unset-all", key])?;
        if output.code == Some(CONFIG_KEY_NOT_SET) {
            return Ok(false);
        }
        output.check(GIT)?;
        Ok(true)
    }

    /// Lists the heads of a remote repository, discarding the output
    pub fn ls_remote(&self, url: &str) -> Result<(), AppError> {
        self.run(&["ls-remote", "--heads", url])?.check(GIT)?;
        Ok(())
    }
}
