// SPDX-License-Identifier: MPL-2.0
//! The main screen: drop zone, prompt editor, job progress, and the
//! analysis result.

use crate::config::models::ModelInfo;
use crate::prompts::PromptTemplate;
use crate::ui::style::{self, spacing, typography};
use crate::worker::{JobStage, WorkerEvent};
use iced::widget::{
    button, container, pick_list, progress_bar, scrollable, text, text_editor, Column, Row, Text,
};
use iced::{Element, Length, Theme};
use std::path::PathBuf;

/// What the job area of the screen currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JobDisplay {
    #[default]
    Idle,
    Running {
        stage_label: String,
        progress: f32,
    },
    Done {
        output_path: PathBuf,
    },
    Failed {
        reason: String,
    },
}

pub struct State {
    pub video_path: Option<PathBuf>,
    /// Size of the selected video, captured when it is chosen.
    pub video_size_mb: Option<f64>,
    /// True while a file drag hovers over the window.
    pub hovering: bool,
    pub prompt: text_editor::Content,
    pub template: PromptTemplate,
    pub job: JobDisplay,
    pub result: String,
}

impl Default for State {
    fn default() -> Self {
        State {
            video_path: None,
            video_size_mb: None,
            hovering: false,
            prompt: text_editor::Content::with_text(
                PromptTemplate::default().text().unwrap_or(""),
            ),
            template: PromptTemplate::default(),
            job: JobDisplay::Idle,
            result: String::new(),
        }
    }
}

impl State {
    /// Restores the prompt saved at last shutdown.
    pub fn with_saved_prompt(last_prompt: &str) -> Self {
        let mut state = State::default();
        if !last_prompt.trim().is_empty() {
            state.prompt = text_editor::Content::with_text(last_prompt);
            state.template = PromptTemplate::Custom;
        }
        state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.job, JobDisplay::Running { .. })
    }

    pub fn prompt_text(&self) -> String {
        self.prompt.text()
    }

    pub fn set_video(&mut self, path: PathBuf, size_mb: Option<f64>) {
        self.video_path = Some(path);
        self.video_size_mb = size_mb;
        if !self.is_running() {
            self.job = JobDisplay::Idle;
        }
    }

    /// Folds a worker event into the display state.
    pub fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Stage(stage) => {
                if matches!(stage, JobStage::Analyzing) {
                    self.result.clear();
                }
                self.job = JobDisplay::Running {
                    stage_label: stage.to_string(),
                    progress: stage.progress(),
                };
            }
            WorkerEvent::Chunk(chunk) => {
                self.result.push_str(&chunk);
            }
            WorkerEvent::Completed { output_path, text } => {
                self.result = text;
                self.job = JobDisplay::Done { output_path };
            }
            WorkerEvent::Failed(reason) => {
                self.job = JobDisplay::Failed { reason };
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    PromptEdited(text_editor::Action),
    TemplateSelected(PromptTemplate),
    ModelSelected(ModelInfo),
    BrowseVideo,
    ClearVideo,
    Analyze,
    OpenSettings,
}

/// Events propagated to the application.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    BrowseVideo,
    Analyze,
    ModelSelected(String),
    OpenSettings,
}

pub fn update(state: &mut State, message: Message, custom_prompt: &str) -> Event {
    match message {
        Message::PromptEdited(action) => {
            state.prompt.perform(action);
            Event::None
        }
        Message::TemplateSelected(template) => {
            state.template = template;
            let text = match template.text() {
                Some(builtin) => builtin,
                None => custom_prompt,
            };
            state.prompt = text_editor::Content::with_text(text);
            Event::None
        }
        Message::ModelSelected(model) => Event::ModelSelected(model.name),
        Message::BrowseVideo => Event::BrowseVideo,
        Message::ClearVideo => {
            state.video_path = None;
            state.video_size_mb = None;
            Event::None
        }
        Message::Analyze => Event::Analyze,
        Message::OpenSettings => Event::OpenSettings,
    }
}

/// Contextual data needed to render the main screen.
pub struct ViewContext<'a> {
    pub models: &'a [ModelInfo],
    pub selected_model: Option<ModelInfo>,
    pub has_api_key: bool,
}

pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Element<'a, Message> {
    let header = Row::new()
        .push(Text::new("ClipSight").size(typography::TITLE))
        .push(iced::widget::space::horizontal())
        .push(button(Text::new("Settings")).on_press(Message::OpenSettings))
        .align_y(iced::Alignment::Center)
        .width(Length::Fill);

    let mut content = Column::new()
        .push(header)
        .push(drop_zone(state))
        .push(controls_row(state, &ctx))
        .push(prompt_editor(state))
        .push(job_row(state, &ctx))
        .spacing(spacing::MD)
        .padding(spacing::LG)
        .width(Length::Fill)
        .height(Length::Fill);

    if !state.result.is_empty() {
        content = content.push(result_pane(state));
    }

    content.into()
}

fn drop_zone(state: &State) -> Element<'_, Message> {
    let label: Element<'_, Message> = match &state.video_path {
        Some(path) => {
            let mut name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            if let Some(mb) = state.video_size_mb {
                name = format!("{name} ({mb:.1} MB)");
            }
            Column::new()
                .push(Text::new(name).size(typography::BODY_LG))
                .push(
                    button(Text::new("Remove").size(typography::BODY_SM))
                        .on_press(Message::ClearVideo)
                        .style(button::text),
                )
                .spacing(spacing::XS)
                .align_x(iced::Alignment::Center)
                .into()
        }
        None => Column::new()
            .push(Text::new("Drop an MP4 file here").size(typography::BODY_LG))
            .push(
                text("or")
                    .size(typography::BODY_SM)
                    .style(|_: &Theme| iced::widget::text::Style {
                        color: Some(style::muted_text_color()),
                    }),
            )
            .push(button(Text::new("Browse...")).on_press(Message::BrowseVideo))
            .spacing(spacing::XS)
            .align_x(iced::Alignment::Center)
            .into(),
    };

    container(label)
        .style(style::drop_zone(state.hovering))
        .width(Length::Fill)
        .height(Length::Fixed(140.0))
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}

fn controls_row<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    Row::new()
        .push(Text::new("Prompt").size(typography::BODY))
        .push(pick_list(
            PromptTemplate::ALL,
            Some(state.template),
            Message::TemplateSelected,
        ))
        .push(iced::widget::space::horizontal())
        .push(Text::new("Model").size(typography::BODY))
        .push(pick_list(
            ctx.models.to_vec(),
            ctx.selected_model.clone(),
            Message::ModelSelected,
        ))
        .spacing(spacing::SM)
        .align_y(iced::Alignment::Center)
        .into()
}

fn prompt_editor(state: &State) -> Element<'_, Message> {
    text_editor(&state.prompt)
        .placeholder("What should the model look for in this video?")
        .on_action(Message::PromptEdited)
        .height(Length::Fixed(120.0))
        .into()
}

fn job_row<'a>(state: &'a State, ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let can_start = !state.is_running()
        && state.video_path.is_some()
        && !state.prompt_text().trim().is_empty()
        && ctx.has_api_key;

    let mut analyze = button(Text::new("Analyze").size(typography::BODY_LG)).padding(spacing::SM);
    if can_start {
        analyze = analyze.on_press(Message::Analyze);
    }

    let mut row = Row::new()
        .push(analyze)
        .spacing(spacing::MD)
        .align_y(iced::Alignment::Center)
        .width(Length::Fill);

    match &state.job {
        JobDisplay::Idle => {
            if !ctx.has_api_key {
                row = row.push(
                    text("No API key configured. Set one in Settings or GEMINI_API_KEY.")
                        .size(typography::BODY_SM)
                        .style(|_: &Theme| iced::widget::text::Style {
                            color: Some(style::error_text_color()),
                        }),
                );
            }
        }
        JobDisplay::Running {
            stage_label,
            progress,
        } => {
            row = row
                .push(progress_bar(0.0..=100.0, *progress))
                .push(text(stage_label.clone()).size(typography::BODY_SM));
        }
        JobDisplay::Done { output_path } => {
            row = row.push(
                text(format!("Saved to {}", output_path.display()))
                    .size(typography::BODY_SM)
                    .style(|_: &Theme| iced::widget::text::Style {
                        color: Some(style::success_text_color()),
                    }),
            );
        }
        JobDisplay::Failed { reason } => {
            row = row.push(
                text(reason.clone())
                    .size(typography::BODY_SM)
                    .style(|_: &Theme| iced::widget::text::Style {
                        color: Some(style::error_text_color()),
                    }),
            );
        }
    }

    row.into()
}

fn result_pane(state: &State) -> Element<'_, Message> {
    container(scrollable(
        container(text(state.result.as_str()).size(typography::BODY)).padding(spacing::SM),
    ))
    .style(style::result_pane)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_is_meeting_minutes_template() {
        let state = State::default();
        assert_eq!(state.template, PromptTemplate::MeetingMinutes);
        assert!(state.prompt_text().contains("minutes"));
    }

    #[test]
    fn saved_prompt_switches_to_custom() {
        let state = State::with_saved_prompt("my own prompt");
        assert_eq!(state.template, PromptTemplate::Custom);
        assert_eq!(state.prompt_text().trim(), "my own prompt");
    }

    #[test]
    fn template_selection_replaces_prompt() {
        let mut state = State::default();
        let event = update(
            &mut state,
            Message::TemplateSelected(PromptTemplate::SceneBreakdown),
            "",
        );
        assert!(matches!(event, Event::None));
        assert!(state.prompt_text().contains("scene"));
    }

    #[test]
    fn custom_template_loads_saved_slot() {
        let mut state = State::default();
        update(
            &mut state,
            Message::TemplateSelected(PromptTemplate::Custom),
            "remembered text",
        );
        assert_eq!(state.prompt_text().trim(), "remembered text");
    }

    #[test]
    fn worker_events_drive_job_display() {
        let mut state = State::default();
        state.apply_worker_event(WorkerEvent::Stage(JobStage::Uploading));
        assert!(state.is_running());

        state.apply_worker_event(WorkerEvent::Chunk("partial ".into()));
        state.apply_worker_event(WorkerEvent::Chunk("text".into()));
        assert_eq!(state.result, "partial text");

        state.apply_worker_event(WorkerEvent::Completed {
            output_path: PathBuf::from("out.txt"),
            text: "full text".into(),
        });
        assert!(!state.is_running());
        assert_eq!(state.result, "full text");
    }

    #[test]
    fn failure_keeps_partial_result() {
        let mut state = State::default();
        state.apply_worker_event(WorkerEvent::Stage(JobStage::Analyzing));
        state.apply_worker_event(WorkerEvent::Chunk("partial".into()));
        state.apply_worker_event(WorkerEvent::Failed("network error".into()));
        assert_eq!(state.result, "partial");
        assert!(matches!(state.job, JobDisplay::Failed { .. }));
    }
}
