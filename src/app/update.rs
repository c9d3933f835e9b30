// SPDX-License-Identifier: MPL-2.0
//! Message handling for the application.

use super::{App, Message, Screen};
use crate::prompts::PromptTemplate;
use crate::ui::{main_screen, settings_screen};
use crate::worker::{self, AnalysisRequest};
use iced::futures::StreamExt;
use iced::Task;
use std::path::PathBuf;

pub fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::Main(msg) => handle_main(app, msg),
        Message::SettingsScreen(msg) => handle_settings(app, msg),
        Message::Worker(event) => {
            app.main.apply_worker_event(event);
            Task::none()
        }
        Message::FileDropped(path) => {
            app.main.hovering = false;
            app.load_video(path);
            Task::none()
        }
        Message::FileHovered => {
            app.main.hovering = true;
            Task::none()
        }
        Message::FilesHoveredLeft => {
            app.main.hovering = false;
            Task::none()
        }
        Message::VideoPicked(Some(path)) => {
            // Remember where the user browsed so the next dialog opens there.
            if let Some(parent) = path.parent() {
                app.settings.file.input_directory = parent.to_path_buf();
                app.persist_settings();
            }
            app.load_video(path);
            Task::none()
        }
        Message::VideoPicked(None) => Task::none(),
        Message::OutputDirPicked(picked) => {
            if let (Some(path), Some(state)) = (picked, app.settings_screen.as_mut()) {
                state.set_output_dir(path);
            }
            Task::none()
        }
        Message::InputDirPicked(picked) => {
            if let (Some(path), Some(state)) = (picked, app.settings_screen.as_mut()) {
                state.set_input_dir(path);
            }
            Task::none()
        }
        Message::WindowCloseRequested(id) => {
            save_session(app);
            iced::window::close(id)
        }
    }
}

fn handle_main(app: &mut App, msg: main_screen::Message) -> Task<Message> {
    let event = main_screen::update(&mut app.main, msg, &app.settings.ui.custom_prompt);
    match event {
        main_screen::Event::None => Task::none(),
        main_screen::Event::BrowseVideo => pick_video(app.settings.file.input_directory.clone()),
        main_screen::Event::Analyze => start_analysis(app),
        main_screen::Event::ModelSelected(name) => {
            app.settings.gemini.model = name;
            app.persist_settings();
            Task::none()
        }
        main_screen::Event::OpenSettings => {
            app.settings_screen = Some(settings_screen::State::new(&app.settings));
            app.screen = Screen::Settings;
            Task::none()
        }
    }
}

fn handle_settings(app: &mut App, msg: settings_screen::Message) -> Task<Message> {
    let Some(state) = app.settings_screen.as_mut() else {
        return Task::none();
    };

    match settings_screen::update(state, msg) {
        settings_screen::Event::None => Task::none(),
        settings_screen::Event::PickOutputDir => {
            pick_folder(app.settings.file.output_directory.clone(), Message::OutputDirPicked)
        }
        settings_screen::Event::PickInputDir => {
            pick_folder(app.settings.file.input_directory.clone(), Message::InputDirPicked)
        }
        settings_screen::Event::Saved(settings) => {
            app.settings = settings;
            app.persist_settings();
            app.settings_screen = None;
            app.screen = Screen::Main;
            Task::none()
        }
        settings_screen::Event::Cancelled => {
            app.settings_screen = None;
            app.screen = Screen::Main;
            Task::none()
        }
    }
}

fn start_analysis(app: &mut App) -> Task<Message> {
    if app.main.is_running() {
        return Task::none();
    }
    let Some(video_path) = app.main.video_path.clone() else {
        return Task::none();
    };
    let prompt = app.main.prompt_text();

    save_session(app);

    let Some(request) =
        AnalysisRequest::from_settings(&app.settings, video_path, prompt)
    else {
        app.main.job = main_screen::JobDisplay::Failed {
            reason: crate::error::ApiError::MissingKey.to_string(),
        };
        return Task::none();
    };

    log::info!(
        "starting analysis of {} with {}",
        request.video_path.display(),
        request.model
    );
    let receiver = worker::spawn(request);
    Task::stream(receiver.map(Message::Worker))
}

/// Persists the prompt editor content and the custom prompt slot.
fn save_session(app: &mut App) {
    app.settings.ui.last_prompt = app.main.prompt_text();
    if app.main.template == PromptTemplate::Custom {
        app.settings.ui.custom_prompt = app.settings.ui.last_prompt.clone();
    }
    app.persist_settings();
}

fn pick_video(start_dir: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new()
                .set_title("Choose a video")
                .add_filter("MP4 video", &["mp4"]);
            if start_dir.is_dir() {
                dialog = dialog.set_directory(&start_dir);
            }
            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        Message::VideoPicked,
    )
}

fn pick_folder(start_dir: PathBuf, on_picked: fn(Option<PathBuf>) -> Message) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().set_title("Choose a folder");
            if start_dir.is_dir() {
                dialog = dialog.set_directory(&start_dir);
            }
            dialog.pick_folder().await.map(|h| h.path().to_path_buf())
        },
        on_picked,
    )
}
