//! Test doubles shared across test modules
//!
//! `FakeRunner` stands in for `git` and `cmdkey`, keeping an in-memory global
//! git config so identity changes can be asserted on. `FakeCredentialStore`
//! and `ScriptedPrompter` replace the credential store and the terminal.

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    io,
};

use inquire::InquireError;

use crate::{
    credentials::{CMDKEY, CredentialStore, parse_targets},
    error::AppError,
    git::GIT,
    menu::Prompter,
    process::{CommandOutput, CommandRunner},
    validation::LineSource,
};

const EMPTY_CMDKEY_LISTING: &str = "\nCurrently stored credentials:\n\n* NONE *\n";

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

fn not_found(program: &str) -> AppError {
    AppError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{program}: program not found"),
    ))
}

/// Scripted `git` / `cmdkey` that records every invocation
pub struct FakeRunner {
    calls: RefCell<Vec<(String, Vec<String>)>>,
    globals: RefCell<BTreeMap<String, String>>,
    git_installed: bool,
    cmdkey_listing: Option<String>,
    fail_unset: bool,
    fail_probe: bool,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            globals: RefCell::new(BTreeMap::new()),
            git_installed: true,
            cmdkey_listing: Some(EMPTY_CMDKEY_LISTING.to_string()),
            fail_unset: false,
            fail_probe: false,
        }
    }

    pub fn without_git(mut self) -> Self {
        self.git_installed = false;
        self
    }

    pub fn without_cmdkey(mut self) -> Self {
        self.cmdkey_listing = None;
        self
    }

    pub fn with_cmdkey_listing(mut self, listing: &str) -> Self {
        self.cmdkey_listing = Some(listing.to_string());
        self
    }

    pub fn with_global(self, key: &str, value: &str) -> Self {
        self.globals
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn failing_unset(mut self) -> Self {
        self.fail_unset = true;
        self
    }

    pub fn failing_probe(mut self) -> Self {
        self.fail_probe = true;
        self
    }

    pub fn global(&self, key: &str) -> Option<String> {
        self.globals.borrow().get(key).cloned()
    }

    pub fn invoked(&self, program: &str, args: &[&str]) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|(p, a)| p == program && a.iter().map(String::as_str).eq(args.iter().copied()))
    }

    pub fn calls_to(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(p, _)| p == program)
            .count()
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput, AppError> {
        if !self.git_installed {
            return Err(not_found(GIT));
        }
        let mut globals = self.globals.borrow_mut();
        let output = match args {
            ["--version"] => exit(0, "git version 2.45.0\n", ""),
            ["config", "--global", "--get", key] => match globals.get(*key) {
                Some(value) => exit(0, &format!("{value}\n"), ""),
                None => exit(1, "", ""),
            },
            ["config", "--global", "--unset-all", _] if self.fail_unset => {
                exit(255, "", "error: could not lock config file")
            }
            ["config", "--global", "--unset-all", key] => match globals.remove(*key) {
                Some(_) => exit(0, "", ""),
                None => exit(5, "", ""),
            },
            ["config", "--global", key, value] => {
                globals.insert(key.to_string(), value.to_string());
                exit(0, "", "")
            }
            ["ls-remote", ..] if self.fail_probe => {
                exit(128, "", "fatal: could not read Username for 'https://github.com'")
            }
            ["ls-remote", ..] => exit(0, "", ""),
            _ => exit(129, "", "usage: git ..."),
        };
        Ok(output)
    }

    fn cmdkey(&self, args: &[&str]) -> Result<CommandOutput, AppError> {
        let listing = self.cmdkey_listing.as_deref().ok_or_else(|| not_found(CMDKEY))?;
        let output = match args {
            ["/list"] => exit(0, listing, ""),
            [arg] => match arg.strip_prefix("/delete:") {
                Some(target) if parse_targets(listing).iter().any(|t| t == target) => {
                    exit(0, "\nCMDKEY: Credential deleted successfully.\n", "")
                }
                Some(_) => exit(1, "\nCMDKEY: Element not found.\n", ""),
                None => exit(1, "The command line parameters are incorrect.", ""),
            },
            _ => exit(1, "The command line parameters are incorrect.", ""),
        };
        Ok(output)
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        match program {
            GIT => self.git(args),
            CMDKEY => self.cmdkey(args),
            other => Err(not_found(other)),
        }
    }
}

/// In-memory credential store
pub struct FakeCredentialStore {
    stored: RefCell<Vec<String>>,
    listed: bool,
    refused: Vec<String>,
}

impl FakeCredentialStore {
    pub fn new<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            stored: RefCell::new(targets.into_iter().map(Into::into).collect()),
            listed: true,
            refused: Vec::new(),
        }
    }

    /// Entries that can be deleted but do not show up in the listing
    pub fn unlisted<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            listed: false,
            ..Self::new(targets)
        }
    }

    /// Makes deletion of `target` fail
    pub fn refusing(mut self, target: &str) -> Self {
        self.refused.push(target.to_string());
        self
    }

    pub fn remaining(&self) -> Vec<String> {
        self.stored.borrow().clone()
    }
}

impl CredentialStore for FakeCredentialStore {
    fn list_credentials(&self) -> Result<Vec<String>, AppError> {
        if self.listed {
            Ok(self.stored.borrow().clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn delete_credential(&self, target: &str) -> Result<bool, AppError> {
        if self.refused.iter().any(|t| t == target) {
            return Err(AppError::CommandFailed {
                program: CMDKEY.to_string(),
                detail: "Access is denied.".to_string(),
            });
        }
        let mut stored = self.stored.borrow_mut();
        match stored.iter().position(|t| t == target) {
            Some(index) => {
                stored.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

enum Answer {
    Line(String),
    Choice(usize),
    Confirm(bool),
    Cancel,
    Interrupt,
}

/// Prompter answering from a queue; panics if asked something unexpected
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, line: &str) -> Self {
        self.answers.push_back(Answer::Line(line.to_string()));
        self
    }

    pub fn lines<'s>(self, lines: impl IntoIterator<Item = &'s str>) -> Self {
        lines.into_iter().fold(self, Self::line)
    }

    pub fn choose(mut self, index: usize) -> Self {
        self.answers.push_back(Answer::Choice(index));
        self
    }

    pub fn confirm(mut self, yes: bool) -> Self {
        self.answers.push_back(Answer::Confirm(yes));
        self
    }

    /// Escape at the next prompt
    pub fn cancel(mut self) -> Self {
        self.answers.push_back(Answer::Cancel);
        self
    }

    /// Ctrl-C at the next prompt
    pub fn interrupt(mut self) -> Self {
        self.answers.push_back(Answer::Interrupt);
        self
    }

    pub fn is_drained(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt_message: &str) -> Result<Answer, AppError> {
        match self.answers.pop_front() {
            Some(Answer::Cancel) => Err(InquireError::OperationCanceled.into()),
            Some(Answer::Interrupt) => Err(InquireError::OperationInterrupted.into()),
            Some(answer) => Ok(answer),
            None => panic!("unexpected prompt: {prompt_message}"),
        }
    }
}

impl LineSource for ScriptedPrompter {
    fn read_line(&mut self, prompt_message: &str) -> Result<String, AppError> {
        match self.next(prompt_message)? {
            Answer::Line(line) => Ok(line),
            _ => panic!("expected a text answer for: {prompt_message}"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, message: &str, options: &[&str]) -> Result<usize, AppError> {
        match self.next(message)? {
            Answer::Choice(index) if index < options.len() => Ok(index),
            _ => panic!("expected a choice among {options:?} for: {message}"),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool, AppError> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            _ => panic!("expected a confirmation for: {message}"),
        }
    }
}
