mod cli;

use pneuro_core::logging;

fn main() {
    // Initialize logging as early as possible.
    logging::init_logging();

    // Parse CLI and dispatch.
    if let Err(err) = cli::run_from_args() {
        eprintln!("pneuro error: {:#}", err);
        std::process::exit(1);
    }
}
