use clap::Parser;
use tickpilot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
