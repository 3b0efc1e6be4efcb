use std::process::ExitCode;

use bugrepro::Config;
use clap::Parser;
use tracing::error;

fn main() -> ExitCode {
    let config = Config::parse();
    bugrepro::init_logging();

    match bugrepro::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
