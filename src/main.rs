use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    match chat_ledger::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
