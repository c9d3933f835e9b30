// SPDX-License-Identifier: MPL-2.0
//! Application state and the Iced run loop.

pub mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::config::models::{self, ModelInfo};
use crate::config::Settings;
use crate::ui::{main_screen, settings_screen};
use iced::{window, Task, Theme};

const WINDOW_DEFAULT_WIDTH: f32 = 860.0;
const WINDOW_DEFAULT_HEIGHT: f32 = 720.0;
const MIN_WINDOW_WIDTH: f32 = 640.0;
const MIN_WINDOW_HEIGHT: f32 = 520.0;

/// Which screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Settings,
}

pub struct App {
    pub settings: Settings,
    pub models: Vec<ModelInfo>,
    pub screen: Screen,
    pub main: main_screen::State,
    /// Present only while the settings screen is open.
    pub settings_screen: Option<settings_screen::State>,
}

fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        // Close requests are handled in update so settings get saved first.
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy the Fn trait bound
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce).
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let mut settings = crate::config::load();
        let models = models::load_catalog(&paths::models_file());
        if !models.iter().any(|m| m.name == settings.gemini.model) {
            let fallback = models::default_model(&models);
            log::warn!(
                "model {} is not in the catalog, using {}",
                settings.gemini.model,
                fallback
            );
            settings.gemini.model = fallback;
        }

        // The command line override wins even when uncatalogued.
        if let Some(model) = flags.model {
            log::info!("model overridden from the command line: {model}");
            settings.gemini.model = model;
        }

        let main = main_screen::State::with_saved_prompt(&settings.ui.last_prompt);

        let mut app = App {
            settings,
            models,
            screen: Screen::Main,
            main,
            settings_screen: None,
        };

        if let Some(path) = flags.file_path {
            app.load_video(path.into());
        }

        (app, Task::none())
    }

    fn title(&self) -> String {
        "ClipSight".to_string()
    }

    fn theme(&self) -> Theme {
        <Theme as iced::theme::Base>::default(iced::theme::Mode::default())
    }

    fn subscription(&self) -> iced::Subscription<Message> {
        subscription::subscription()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(self, message)
    }

    fn view(&self) -> iced::Element<'_, Message> {
        view::view(self)
    }

    /// Validates a video and either selects it or surfaces the problem.
    pub(crate) fn load_video(&mut self, path: std::path::PathBuf) {
        if self.main.is_running() {
            log::warn!("ignoring {} while a job is running", path.display());
            return;
        }
        match crate::media::validate_mp4(&path) {
            Ok(()) => {
                log::info!("selected {}", path.display());
                let size_mb = crate::media::file_size_mb(&path).ok();
                self.main.set_video(path, size_mb);
            }
            Err(e) => {
                log::warn!("rejected {}: {e}", path.display());
                self.main.job = main_screen::JobDisplay::Failed {
                    reason: e.to_string(),
                };
            }
        }
    }

    /// The model catalog entry for the configured model, if listed.
    pub(crate) fn selected_model(&self) -> Option<ModelInfo> {
        self.models
            .iter()
            .find(|m| m.name == self.settings.gemini.model)
            .cloned()
    }

    pub(crate) fn persist_settings(&self) {
        if let Err(e) = crate::config::save(&self.settings) {
            log::error!("could not save settings: {e}");
        }
    }
}
