// SPDX-License-Identifier: MPL-2.0
//! Log setup: console output plus a per-run file under `logs/`.
//!
//! Files are named `clipsight_<timestamp>.log` so runs never clobber each
//! other. The file sink records everything down to debug level while the
//! console stays at info, which keeps terminal output readable without
//! losing detail for bug reports.

use std::path::Path;

/// Initializes the global logger. Must be called once, before any `log`
/// macro fires.
pub fn init(logs_dir: &Path) -> Result<(), fern::InitError> {
    std::fs::create_dir_all(logs_dir)?;

    let file_name = format!(
        "clipsight_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let log_path = logs_dir.join(file_name);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        // The GUI stack is chatty at debug level; keep it to warnings.
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .level_for("naga", log::LevelFilter::Warn)
        .level_for("iced_wgpu", log::LevelFilter::Warn)
        .level_for("cosmic_text", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Info)
        .chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Info)
                .chain(std::io::stdout()),
        )
        .chain(fern::log_file(&log_path)?)
        .apply()?;

    log::info!("log file: {}", log_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_missing_logs_dir() {
        let dir = tempdir().expect("failed to create temp dir");
        let logs = dir.path().join("nested").join("logs");

        // The global logger can only be installed once per process; a second
        // call from another test would fail, so only assert directory setup.
        let _ = init(&logs);
        assert!(logs.exists());
    }
}
