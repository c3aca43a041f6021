use std::process::ExitCode;

fn main() -> ExitCode {
    trellis_cli::run()
}
