use std::process::ExitCode;

fn main() -> ExitCode {
    royal_cli::run()
}
