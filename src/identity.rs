//! Applies a stored profile as the global Git identity.
//!
//! Every step is best-effort: a failure is recorded in the [`ApplyReport`] and
//! the remaining steps still run. Re-running converges on the requested state.

use crate::{
    error::AppError,
    git::{CREDENTIAL_HELPER_KEY, Git, USER_EMAIL_KEY, USER_NAME_KEY},
    output,
    process::CommandRunner,
    profile::Profile,
};

/// Credential helper provided by Git Credential Manager
pub const CREDENTIAL_MANAGER_HELPER: &str = "manager";

/// Outcome of one step of [`apply`]
#[derive(Debug)]
pub struct StepResult {
    pub description: String,
    pub outcome: Result<(), AppError>,
}

impl StepResult {
    fn new(description: impl Into<String>, outcome: Result<(), AppError>) -> Self {
        Self {
            description: description.into(),
            outcome,
        }
    }
}

/// Per-step results of applying an identity
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub steps: Vec<StepResult>,
}

impl ApplyReport {
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|step| step.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|step| step.outcome.is_err())
    }

    /// Prints one status line per step
    pub fn print(&self) {
        for step in &self.steps {
            match &step.outcome {
                Ok(()) => output::ok(&step.description),
                Err(e) => output::warn(&format!("{}: {e}", step.description)),
            }
        }
    }
}

/// Unsets, then sets, the global user name and email and points the
/// credential helper at the credential manager.
pub fn apply<R: CommandRunner + ?Sized>(git: &Git<'_, R>, profile: &Profile) -> ApplyReport {
    let mut report = ApplyReport::default();

    for key in [USER_NAME_KEY, USER_EMAIL_KEY] {
        let outcome = git.unset_global(key).map(|_| ());
        report
            .steps
            .push(StepResult::new(format!("cleared global {key}"), outcome));
    }

    report.steps.push(StepResult::new(
        format!("set global {USER_NAME_KEY} to '{}'", profile.user),
        git.set_global(USER_NAME_KEY, &profile.user),
    ));
    report.steps.push(StepResult::new(
        format!("set global {USER_EMAIL_KEY} to '{}'", profile.email),
        git.set_global(USER_EMAIL_KEY, &profile.email),
    ));
    report.steps.push(StepResult::new(
        format!("set {CREDENTIAL_HELPER_KEY} to '{CREDENTIAL_MANAGER_HELPER}'"),
        git.set_global(CREDENTIAL_HELPER_KEY, CREDENTIAL_MANAGER_HELPER),
    ));

    report
}
