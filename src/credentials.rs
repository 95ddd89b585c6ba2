//! Clears cached credentials for a hosting service and provokes a fresh login.
//!
//! The OS credential store is reached through the `cmdkey` command line tool.
//! Every failure is collected and reported; none of them stop the sequence.

use crate::{
    error::AppError,
    git::Git,
    output,
    process::CommandRunner,
};

/// Credential store command line tool
pub const CMDKEY: &str = "cmdkey";
/// `cmdkey /delete` output when the identifier is unknown
const CMDKEY_NOT_FOUND: &str = "element not found";

/// Naming conventions and probe repository for one hosting service
#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub name: &'static str,
    /// Lowercase substrings identifying the service's stored credentials
    pub patterns: &'static [&'static str],
    /// Identifiers written by older credential helpers
    pub legacy_targets: &'static [&'static str],
    /// Repository probed with `git ls-remote` to trigger authentication
    pub probe_url: &'static str,
}

impl Service {
    /// Case-insensitive match of a stored identifier against the patterns
    pub fn matches(&self, target: &str) -> bool {
        let target = target.to_lowercase();
        self.patterns.iter().any(|pattern| target.contains(pattern))
    }
}

pub const GITHUB: Service = Service {
    name: "GitHub",
    patterns: &["github"],
    legacy_targets: &[
        "git:https://github.com",
        "LegacyGeneric:target=git:https://github.com",
        "GitHub - https://api.github.com/",
        "gh:github.com:",
    ],
    probe_url: "https://github.com/git/git.git",
};

/// Access to the OS credential store
pub trait CredentialStore {
    /// Identifiers of every stored generic credential
    fn list_credentials(&self) -> Result<Vec<String>, AppError>;
    /// Deletes the credential with exactly this identifier.
    /// `Ok(false)` when no such credential exists.
    fn delete_credential(&self, target: &str) -> Result<bool, AppError>;
}

/// Windows credential store via `cmdkey`
#[derive(Debug)]
pub struct CmdKey<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> CmdKey<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner + ?Sized> CredentialStore for CmdKey<'_, R> {
    fn list_credentials(&self) -> Result<Vec<String>, AppError> {
        let output = self.runner.run(CMDKEY, &["/list"])?.check(CMDKEY)?;
        Ok(parse_targets(&output.stdout))
    }

    fn delete_credential(&self, target: &str) -> Result<bool, AppError> {
        let arg = format!("/delete:{target}");
        let output = self.runner.run(CMDKEY, &[arg.as_str()])?;
        if !output.success()
            && [&output.stdout, &output.stderr]
                .iter()
                .any(|text| text.to_lowercase().contains(CMDKEY_NOT_FOUND))
        {
            return Ok(false);
        }
        output.check(CMDKEY)?;
        Ok(true)
    }
}

/// Extracts the values of `Target: <value>` lines from `cmdkey /list` output
pub fn parse_targets(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Target:"))
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .map(str::to_string)
        .collect()
}

/// What [`clear_and_reauth`] did
#[derive(Debug)]
pub struct InvalidationReport {
    pub service: &'static str,
    /// Set when the store could not be enumerated
    pub list_error: Option<AppError>,
    pub deleted: Vec<String>,
    pub failed: Vec<(String, AppError)>,
    pub legacy_deleted: Vec<String>,
    pub probe: Result<(), AppError>,
}

impl InvalidationReport {
    /// Prints a summary, one warning per failure
    pub fn print(&self) {
        if let Some(e) = &self.list_error {
            output::warn(&format!("could not list stored credentials: {e}"));
        }
        for (target, e) in &self.failed {
            output::warn(&format!("could not delete credential '{target}': {e}"));
        }

        let removed = self.deleted.len() + self.legacy_deleted.len();
        if removed == 0 {
            output::dim(&format!("no cached {} credentials found", self.service));
        } else {
            output::ok(&format!("removed {removed} cached {} credential(s)", self.service));
            for target in self.deleted.iter().chain(&self.legacy_deleted) {
                output::dim(target);
            }
        }

        match &self.probe {
            Ok(()) => output::ok(&format!("reached {}; sign in if your browser asks", self.service)),
            Err(e) => {
                output::warn(&format!("re-authentication probe failed: {e}"));
                output::info("run a git network command (e.g. `git fetch`) to sign in again");
            }
        }
    }
}

/// Deletes every cached credential for `service`, then probes the service so
/// the next sign-in happens now rather than on the user's next push.
pub fn clear_and_reauth<S, R>(store: &S, git: &Git<'_, R>, service: &Service) -> InvalidationReport
where
    S: CredentialStore + ?Sized,
    R: CommandRunner + ?Sized,
{
    let mut report = InvalidationReport {
        service: service.name,
        list_error: None,
        deleted: Vec::new(),
        failed: Vec::new(),
        legacy_deleted: Vec::new(),
        probe: Ok(()),
    };

    let matching: Vec<String> = match store.list_credentials() {
        Ok(targets) => targets
            .into_iter()
            .filter(|target| service.matches(target))
            .collect(),
        Err(e) => {
            report.list_error = Some(e);
            Vec::new()
        }
    };

    for target in matching {
        match store.delete_credential(&target) {
            Ok(true) => report.deleted.push(target),
            Ok(false) => {}
            Err(e) => report.failed.push((target, e)),
        }
    }

    for legacy in service.legacy_targets {
        let attempted = report
            .deleted
            .iter()
            .chain(report.failed.iter().map(|(target, _)| target))
            .any(|target| target == legacy);
        if attempted {
            continue;
        }
        match store.delete_credential(legacy) {
            Ok(true) => report.legacy_deleted.push(legacy.to_string()),
            Ok(false) => {}
            Err(e) => report.failed.push((legacy.to_string(), e)),
        }
    }

    report.probe = git.ls_remote(service.probe_url);
    report
}
