use std::process::ExitCode;

fn main() -> ExitCode {
    streamring::app::startup::startup()
}
