//! Notes - in-memory folders and notes from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = notes_store::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
