// SPDX-License-Identifier: MPL-2.0
//! The settings screen.
//!
//! Edits are held in a draft and written back to the live settings on
//! "Save". The max file size field is validated as text so the user can
//! clear it while typing without the value snapping around.

use crate::config::{self, Settings};
use crate::config::models::ModelInfo;
use crate::ui::style::{self, spacing, typography};
use iced::widget::{
    button, checkbox, pick_list, scrollable, text, text_input, Column, Row, Text,
};
use iced::{Element, Length, Theme};
use std::path::PathBuf;

pub struct State {
    draft: Settings,
    max_size_input: String,
    /// Validation message for the size field, if any.
    size_error: Option<String>,
}

impl State {
    pub fn new(settings: &Settings) -> Self {
        State {
            draft: settings.clone(),
            max_size_input: settings.file.max_file_size_mb.to_string(),
            size_error: None,
        }
    }

    pub fn set_output_dir(&mut self, path: PathBuf) {
        self.draft.file.output_directory = path;
    }

    pub fn set_input_dir(&mut self, path: PathBuf) {
        self.draft.file.input_directory = path;
    }

    fn validate_size(&mut self) -> Option<u32> {
        match self.max_size_input.trim().parse::<u32>() {
            Ok(value)
                if (config::MIN_FILE_SIZE_MB..=config::MAX_FILE_SIZE_MB).contains(&value) =>
            {
                self.size_error = None;
                Some(value)
            }
            _ => {
                self.size_error = Some(format!(
                    "Size must be between {} and {} MB",
                    config::MIN_FILE_SIZE_MB,
                    config::MAX_FILE_SIZE_MB
                ));
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    ApiKeyChanged(String),
    ModelSelected(ModelInfo),
    StreamToggled(bool),
    BomToggled(bool),
    AutoCompressToggled(bool),
    GenerateTitleToggled(bool),
    MaxSizeChanged(String),
    PickOutputDir,
    PickInputDir,
    Save,
    Cancel,
}

/// Events propagated to the application.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    PickOutputDir,
    PickInputDir,
    /// The draft was saved; the application should persist and leave.
    Saved(Settings),
    Cancelled,
}

pub fn update(state: &mut State, message: Message) -> Event {
    match message {
        Message::ApiKeyChanged(key) => {
            state.draft.gemini.api_key = if key.trim().is_empty() {
                None
            } else {
                Some(key)
            };
            Event::None
        }
        Message::ModelSelected(model) => {
            state.draft.gemini.model = model.name;
            Event::None
        }
        Message::StreamToggled(value) => {
            state.draft.gemini.stream_response = value;
            Event::None
        }
        Message::BomToggled(value) => {
            state.draft.file.use_bom = value;
            Event::None
        }
        Message::AutoCompressToggled(value) => {
            state.draft.file.auto_compress = value;
            Event::None
        }
        Message::GenerateTitleToggled(value) => {
            state.draft.file.generate_title = value;
            Event::None
        }
        Message::MaxSizeChanged(value) => {
            state.max_size_input = value;
            state.validate_size();
            Event::None
        }
        Message::PickOutputDir => Event::PickOutputDir,
        Message::PickInputDir => Event::PickInputDir,
        Message::Save => match state.validate_size() {
            Some(size) => {
                state.draft.file.max_file_size_mb = size;
                Event::Saved(state.draft.clone())
            }
            None => Event::None,
        },
        Message::Cancel => Event::Cancelled,
    }
}

pub struct ViewContext<'a> {
    pub models: &'a [ModelInfo],
}

pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Element<'a, Message> {
    let selected_model = ctx
        .models
        .iter()
        .find(|m| m.name == state.draft.gemini.model)
        .cloned();

    let api_section = section(
        "Gemini API",
        Column::new()
            .push(labeled(
                "API key",
                text_input("from GEMINI_API_KEY when empty", api_key_value(&state.draft))
                    .on_input(Message::ApiKeyChanged)
                    .secure(true)
                    .width(Length::Fixed(360.0))
                    .into(),
            ))
            .push(labeled(
                "Model",
                pick_list(
                    ctx.models.to_vec(),
                    selected_model,
                    Message::ModelSelected,
                )
                .into(),
            ))
            .push(
                checkbox(state.draft.gemini.stream_response)
                    .label("Stream the response while it is generated")
                    .on_toggle(Message::StreamToggled),
            )
            .spacing(spacing::SM),
    );

    let mut size_column = Column::new()
        .push(labeled(
            "Max upload size (MB)",
            text_input("500", &state.max_size_input)
                .on_input(Message::MaxSizeChanged)
                .width(Length::Fixed(100.0))
                .into(),
        ))
        .spacing(spacing::XS);
    if let Some(error) = &state.size_error {
        size_column = size_column.push(
            text(error.clone())
                .size(typography::BODY_SM)
                .style(|_: &Theme| iced::widget::text::Style {
                    color: Some(style::error_text_color()),
                }),
        );
    }

    let files_section = section(
        "Files",
        Column::new()
            .push(size_column)
            .push(
                checkbox(state.draft.file.auto_compress)
                    .label("Compress oversized videos with ffmpeg before upload")
                    .on_toggle(Message::AutoCompressToggled),
            )
            .push(labeled(
                "Output folder",
                dir_row(&state.draft.file.output_directory, Message::PickOutputDir),
            ))
            .push(labeled(
                "Browse start folder",
                dir_row(&state.draft.file.input_directory, Message::PickInputDir),
            ))
            .push(
                checkbox(state.draft.file.use_bom)
                    .label("Write a UTF-8 BOM in result files")
                    .on_toggle(Message::BomToggled),
            )
            .push(
                checkbox(state.draft.file.generate_title)
                    .label("Rename results after a model-suggested title")
                    .on_toggle(Message::GenerateTitleToggled),
            )
            .spacing(spacing::SM),
    );

    let buttons = Row::new()
        .push(button(Text::new("Save")).on_press(Message::Save))
        .push(button(Text::new("Cancel")).on_press(Message::Cancel))
        .spacing(spacing::SM);

    scrollable(
        Column::new()
            .push(Text::new("Settings").size(typography::TITLE))
            .push(api_section)
            .push(files_section)
            .push(buttons)
            .spacing(spacing::LG)
            .padding(spacing::LG)
            .width(Length::Fill),
    )
    .into()
}

fn api_key_value(draft: &Settings) -> &str {
    draft.gemini.api_key.as_deref().unwrap_or("")
}

fn section<'a>(title: &'a str, body: Column<'a, Message>) -> Element<'a, Message> {
    Column::new()
        .push(Text::new(title).size(typography::BODY_LG))
        .push(body)
        .spacing(spacing::SM)
        .into()
}

fn labeled<'a>(label: &'a str, widget: Element<'a, Message>) -> Element<'a, Message> {
    Row::new()
        .push(
            Text::new(label)
                .size(typography::BODY)
                .width(Length::Fixed(180.0)),
        )
        .push(widget)
        .spacing(spacing::SM)
        .align_y(iced::Alignment::Center)
        .into()
}

fn dir_row(path: &std::path::Path, on_pick: Message) -> Element<'_, Message> {
    Row::new()
        .push(
            text(path.display().to_string())
                .size(typography::BODY_SM)
                .style(|_: &Theme| iced::widget::text::Style {
                    color: Some(style::muted_text_color()),
                }),
        )
        .push(button(Text::new("Change...")).on_press(on_pick))
        .spacing(spacing::SM)
        .align_y(iced::Alignment::Center)
        .into()
}
