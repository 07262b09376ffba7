use std::process::ExitCode;

use studio::Studio;
use utilities::config::Config;
use utilities::logchamp;
use utilities::studio_state::StudioState;

mod apis;
mod commands;
mod hooks;
mod studio;
mod utilities;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logchamp::init(config.log_file.as_deref()) {
        eprintln!("could not set up logging: {err}");
        return ExitCode::FAILURE;
    }

    let state = match StudioState::new(&config) {
        Ok(state) => state,
        Err(err) => {
            log::error!("{err}");
            logchamp::flush();
            return ExitCode::FAILURE;
        }
    };

    let mut studio = Studio::new(state);

    studio.add_command(Box::new(commands::start::Start));
    studio.add_command(Box::new(commands::chat::Chat));
    studio.add_command(Box::new(commands::history::History));
    studio.add_command(Box::new(commands::game::Game));
    studio.add_command(Box::new(commands::image::Image));
    studio.add_command(Box::new(commands::audio::Audio));
    studio.add_command(Box::new(commands::video::Video));
    studio.add_command(Box::new(commands::save::Save));
    studio.add_command(Box::new(commands::health::Health));

    let result = studio.run().await;
    logchamp::flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("console failed: {err}");
            ExitCode::FAILURE
        }
    }
}
