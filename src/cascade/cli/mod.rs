//! # CLI Layer
//!
//! The demo binary: a service manager whose commands are resolved by cascade.
//! This is the only place that reads the process environment for settings and
//! installs the log subscriber; [`cascade::App::main`] handles exit codes.

mod commands;
mod setup;

use cascade::Settings;

pub fn run() -> ! {
    setup::init_logging();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    setup::build_app(settings).main()
}
