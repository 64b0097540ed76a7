use std::process::ExitCode;

fn main() -> ExitCode {
    cxhook_cli::run()
}
