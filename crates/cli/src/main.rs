use std::process::ExitCode;

fn main() -> ExitCode {
    leadflow_cli::run()
}
