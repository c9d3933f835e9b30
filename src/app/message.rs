// SPDX-License-Identifier: MPL-2.0
//! Top-level message and launch flags.

use crate::ui::{main_screen, settings_screen};
use crate::worker::WorkerEvent;
use std::path::PathBuf;

/// Command line arguments forwarded by `main`.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// A video to load at startup.
    pub file_path: Option<String>,
    /// Model override. Adopted as the session model, so it is written to
    /// `settings.json` along with the other settings on the next save.
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Main(main_screen::Message),
    SettingsScreen(settings_screen::Message),
    Worker(WorkerEvent),
    FileDropped(PathBuf),
    FileHovered,
    FilesHoveredLeft,
    VideoPicked(Option<PathBuf>),
    OutputDirPicked(Option<PathBuf>),
    InputDirPicked(Option<PathBuf>),
    WindowCloseRequested(iced::window::Id),
}
