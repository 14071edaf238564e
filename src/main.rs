//! animatecss - Command-line tool generating utility CSS from animate.css

use std::process::ExitCode;

use animatecss::cli;

fn main() -> ExitCode {
    cli::run()
}
