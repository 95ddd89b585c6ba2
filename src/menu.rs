use std::{thread, time::Duration};

use inquire::{Confirm, Select, Text};

use crate::{
    credentials::{self, CmdKey, CredentialStore, GITHUB, Service},
    error::AppError,
    git::{Git, USER_EMAIL_KEY, USER_NAME_KEY},
    identity, output,
    process::CommandRunner,
    profile::{ProfileStore, parse_selection},
    storage::ProfileFile,
    validation::{LineSource, prompt_until_valid, validate_alias, validate_email, validate_user},
};

/// Pause after the switch summary so it can be read before the tool exits
const SUMMARY_PAUSE: Duration = Duration::from_millis(800);

/// Interactive questions asked by the menu
pub trait Prompter: LineSource {
    /// Returns the index of the chosen option
    fn choose(&mut self, message: &str, options: &[&str]) -> Result<usize, AppError>;
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, AppError>;
}

/// Terminal prompts backed by `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl LineSource for InquirePrompter {
    fn read_line(&mut self, prompt_message: &str) -> Result<String, AppError> {
        Ok(Text::new(prompt_message).prompt()?)
    }
}

impl Prompter for InquirePrompter {
    fn choose(&mut self, message: &str, options: &[&str]) -> Result<usize, AppError> {
        let selected = Select::new(message, options.to_vec()).raw_prompt()?;
        Ok(selected.index)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, AppError> {
        Ok(Confirm::new(message).with_default(default).prompt()?)
    }
}

/// Menu states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Adding,
    Selecting,
    Exit,
}

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    Add,
    Switch,
    Exit,
}

impl MainAction {
    pub const ALL: [MainAction; 3] = [MainAction::Add, MainAction::Switch, MainAction::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MainAction::Add => "add a profile",
            MainAction::Switch => "switch profile",
            MainAction::Exit => "exit",
        }
    }
}

/// Next state plus the store snapshot it continues with
pub type Transition = (MenuState, ProfileStore);

/// One interactive run: the profiles file plus the external collaborators
pub struct Session<'a, R: CommandRunner + ?Sized, C: CredentialStore + ?Sized> {
    file: ProfileFile,
    runner: &'a R,
    credentials: &'a C,
    service: Service,
    pause: Duration,
}

impl<'a, R: CommandRunner + ?Sized, C: CredentialStore + ?Sized> Session<'a, R, C> {
    pub fn new(file: ProfileFile, runner: &'a R, credentials: &'a C) -> Self {
        Self {
            file,
            runner,
            credentials,
            service: GITHUB,
            pause: SUMMARY_PAUSE,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs the menu until the user exits.
    ///
    /// Escape at a prompt returns to the main menu and Ctrl-C exits. Other
    /// prompt failures (e.g. no terminal) are returned.
    pub fn run<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<(), AppError> {
        let mut state = MenuState::MainMenu;
        let mut store = self.file.load();

        while state != MenuState::Exit {
            match self.step(prompter, state, &store) {
                Ok((next, updated)) => {
                    state = next;
                    store = updated;
                }
                Err(e) if e.is_interrupted() => state = MenuState::Exit,
                Err(e) if e.is_canceled() => state = MenuState::MainMenu,
                Err(e) => return Err(e),
            }
        }

        output::info("bye");
        Ok(())
    }

    /// Performs a single state's work and decides where to go next
    pub fn step<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
        state: MenuState,
        store: &ProfileStore,
    ) -> Result<Transition, AppError> {
        match state {
            MenuState::MainMenu => self.main_menu(prompter, store),
            MenuState::Adding => self.add_profile(prompter, store),
            MenuState::Selecting => self.select_profile(prompter, store),
            MenuState::Exit => Ok((MenuState::Exit, store.clone())),
        }
    }

    fn main_menu<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
        store: &ProfileStore,
    ) -> Result<Transition, AppError> {
        self.show_current_identity();

        let labels: Vec<&str> = MainAction::ALL.iter().map(|a| a.label()).collect();
        let index = prompter.choose(&output::prompt_label("select action"), &labels)?;
        let next = match MainAction::ALL.get(index) {
            Some(MainAction::Add) => MenuState::Adding,
            Some(MainAction::Switch) => MenuState::Selecting,
            Some(MainAction::Exit) => MenuState::Exit,
            None => {
                output::warn("unknown action");
                MenuState::MainMenu
            }
        };
        Ok((next, store.clone()))
    }

    fn show_current_identity(&self) {
        let git = Git::new(self.runner);
        let name = git.get_global(USER_NAME_KEY).ok().flatten();
        let email = git.get_global(USER_EMAIL_KEY).ok().flatten();
        match (name, email) {
            (Some(name), Some(email)) => output::dim(&format!("current identity: {name} <{email}>")),
            _ => output::dim("current identity: not set"),
        }
    }

    fn add_profile<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
        store: &ProfileStore,
    ) -> Result<Transition, AppError> {
        let alias = prompt_until_valid(prompter, &output::prompt_label("enter alias:"), |input| {
            validate_alias(input, store)
        })?;
        let user = prompt_until_valid(
            prompter,
            &output::prompt_label("enter git username:"),
            validate_user,
        )?;
        let email = prompt_until_valid(
            prompter,
            &output::prompt_label("enter git email:"),
            validate_email,
        )?;

        let store = match self.file.update(|current| current.add(&alias, &user, &email)) {
            Ok(updated) => {
                output::ok(&format!("saved profile '{alias}'"));
                updated
            }
            Err(e @ (AppError::DuplicateAlias(_) | AppError::InvalidInput(_))) => {
                output::warn(&e.to_string());
                store.clone()
            }
            Err(e) => {
                output::err(&format!("could not save profiles to {}: {e}", self.file.path().display()));
                return Ok((MenuState::MainMenu, store.clone()));
            }
        };

        let again = match prompter.confirm(&output::prompt_label("add another profile?"), false) {
            Ok(again) => again,
            Err(e) if e.is_canceled() => false,
            Err(e) => return Err(e),
        };
        let next = if again {
            MenuState::Adding
        } else {
            MenuState::MainMenu
        };
        Ok((next, store))
    }

    fn select_profile<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
        store: &ProfileStore,
    ) -> Result<Transition, AppError> {
        if store.is_empty() {
            output::warn("no profiles saved yet");
            output::info("choose 'add a profile' to create one first");
            return Ok((MenuState::MainMenu, store.clone()));
        }

        for (number, (alias, profile)) in store.iter().enumerate() {
            output::info(&format!("{}. {alias}  {} <{}>", number + 1, profile.user, profile.email));
        }
        let input = prompter.read_line(&output::prompt_label("profile number:"))?;

        let choice = match parse_selection(&input, store) {
            Ok(choice) => choice,
            Err(e) => {
                output::warn(&e.to_string());
                return Ok((MenuState::MainMenu, store.clone()));
            }
        };
        let (alias, profile) = store.select(choice)?;

        output::info(&format!("switching to '{alias}'"));
        let git = Git::new(self.runner);
        identity::apply(&git, profile).print();
        credentials::clear_and_reauth(self.credentials, &git, &self.service).print();
        output::ok(&format!("now using {} <{}>", profile.user, profile.email));
        thread::sleep(self.pause);

        Ok((MenuState::Exit, store.clone()))
    }
}

/// Checks for git, then runs the interactive menu against the real
/// credential store. `locate` is only called once git is known to work.
pub fn run_app<R, P, L>(runner: &R, prompter: &mut P, locate: L) -> Result<(), AppError>
where
    R: CommandRunner + ?Sized,
    P: Prompter + ?Sized,
    L: FnOnce() -> Result<ProfileFile, AppError>,
{
    let version = Git::new(runner).version()?;
    output::dim(&version);

    let file = locate()?;
    let cmdkey = CmdKey::new(runner);
    Session::new(file, runner, &cmdkey).run(prompter)
}
