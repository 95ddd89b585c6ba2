use std::process::ExitCode;

use clap::Parser;

use gitswitch::{
    cli::Cli,
    menu::{InquirePrompter, run_app},
    output,
    process::SystemRunner,
    storage::ProfileFile,
};

fn main() -> ExitCode {
    Cli::parse();

    match run_app(&SystemRunner, &mut InquirePrompter, ProfileFile::default_location) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::err(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
