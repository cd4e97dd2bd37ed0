use pitchcraft_core::config::{AppConfig, LoadOptions};
use pitchcraft_core::StateStore;
use pitchcraft_store::JsonFileStore;

use super::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("reset", "config_validation", error.to_string(), 2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "reset",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    let store = JsonFileStore::new(config.storage.state_path.clone());
    match runtime.block_on(store.clear()) {
        Ok(()) => CommandResult::success(
            "reset",
            format!("saved state at `{}` discarded", config.storage.state_path.display()),
        ),
        Err(error) => CommandResult::failure("reset", "state_clear", error.to_string(), 4),
    }
}
