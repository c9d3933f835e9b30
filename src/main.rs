// SPDX-License-Identifier: MPL-2.0
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clipsight::app::{self, paths, Flags};

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    let flags = Flags {
        model: args.opt_value_from_str("--model").unwrap_or(None),
        file_path: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    };

    if let Err(e) = clipsight::logging::init(&paths::logs_dir()) {
        eprintln!("logging setup failed: {e}");
    }
    log::info!("clipsight {} starting", env!("CARGO_PKG_VERSION"));

    app::run(flags)
}
