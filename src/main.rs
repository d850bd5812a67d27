//! Binary entrypoint that starts the triage bot gateway.

use std::process::ExitCode;

use triage_bot::start_triage_bot;

fn main() -> ExitCode {
    start_triage_bot::run()
}
