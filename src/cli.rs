use clap::Parser;

/// Switch the global Git identity between saved profiles.
///
/// Runs an interactive menu: add a profile, or switch to one. Switching sets
/// the global user.name / user.email, clears cached GitHub credentials and
/// probes GitHub so you are asked to sign in again.
#[derive(Parser, Debug)]
#[command(name = "gitswitch", version, about, long_about)]
pub struct Cli {}
