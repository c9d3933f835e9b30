// SPDX-License-Identifier: MPL-2.0
//! The background analysis job.
//!
//! One video runs through validation, optional compression, upload,
//! remote processing, generation, and result writing. The job runs on
//! the tokio runtime and reports back to the UI through a channel of
//! [`WorkerEvent`]s which the application turns into a `Task::stream`.

use crate::config::Settings;
use crate::error::{ApiError, Error, FfmpegError, Result};
use crate::infrastructure::{ffmpeg, gemini};
use crate::media;
use crate::output;
use iced::futures::channel::mpsc;
use iced::futures::SinkExt;
use std::fmt;
use std::path::PathBuf;

/// Everything a job needs, captured at launch so later settings edits
/// cannot affect a run in flight.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub video_path: PathBuf,
    pub prompt: String,
    pub api_key: String,
    pub model: String,
    pub stream_response: bool,
    pub output_dir: PathBuf,
    pub use_bom: bool,
    pub max_file_size_mb: u32,
    pub auto_compress: bool,
    pub generate_title: bool,
}

impl AnalysisRequest {
    /// Builds a request from the current settings, or `None` when no
    /// API key is available anywhere.
    pub fn from_settings(
        settings: &Settings,
        video_path: PathBuf,
        prompt: String,
    ) -> Option<Self> {
        let api_key = settings.resolve_api_key()?;
        Some(AnalysisRequest {
            video_path,
            prompt,
            api_key,
            model: settings.gemini.model.clone(),
            stream_response: settings.gemini.stream_response,
            output_dir: settings.file.output_directory.clone(),
            use_bom: settings.file.use_bom,
            max_file_size_mb: settings.file.max_file_size_mb,
            auto_compress: settings.file.auto_compress,
            generate_title: settings.file.generate_title,
        })
    }
}

/// Where in the pipeline a running job currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Validating,
    Compressing { crf: u32 },
    Uploading,
    WaitingRemote,
    Analyzing,
    Saving,
}

impl JobStage {
    /// Rough overall progress for the progress bar, in percent.
    pub fn progress(&self) -> f32 {
        match self {
            JobStage::Validating => 5.0,
            JobStage::Compressing { .. } => 15.0,
            JobStage::Uploading => 35.0,
            JobStage::WaitingRemote => 50.0,
            JobStage::Analyzing => 60.0,
            JobStage::Saving => 95.0,
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Validating => write!(f, "Checking the video file..."),
            JobStage::Compressing { crf } => {
                write!(f, "Compressing (quality pass crf {crf})...")
            }
            JobStage::Uploading => write!(f, "Uploading to Gemini..."),
            JobStage::WaitingRemote => write!(f, "Waiting for remote processing..."),
            JobStage::Analyzing => write!(f, "Analyzing the video..."),
            JobStage::Saving => write!(f, "Saving the result..."),
        }
    }
}

/// Progress reports a job sends to the UI.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Stage(JobStage),
    /// A streamed fragment of the response text.
    Chunk(String),
    Completed {
        output_path: PathBuf,
        text: String,
    },
    Failed(String),
}

/// Launches an analysis job and returns the event receiver. The stream
/// ends after a terminal `Completed` or `Failed` event.
pub fn spawn(request: AnalysisRequest) -> mpsc::Receiver<WorkerEvent> {
    let (tx, rx) = mpsc::channel::<WorkerEvent>(100);

    tokio::spawn(async move {
        let mut tx = tx;
        let terminal = match run(&request, &mut tx).await {
            Ok((output_path, text)) => WorkerEvent::Completed { output_path, text },
            Err(e) => {
                log::error!("analysis of {} failed: {e}", request.video_path.display());
                WorkerEvent::Failed(e.to_string())
            }
        };
        // Progress events may be dropped under backpressure, the
        // terminal event must not be.
        let _ = tx.send(terminal).await;
    });

    rx
}

async fn run(
    request: &AnalysisRequest,
    tx: &mut mpsc::Sender<WorkerEvent>,
) -> Result<(PathBuf, String)> {
    let mut events = tx.clone();
    let mut report = move |event: WorkerEvent| {
        let _ = events.try_send(event);
    };

    report(WorkerEvent::Stage(JobStage::Validating));
    media::validate_mp4(&request.video_path)?;

    // A compressed copy is temporary and removed once the job ends.
    let mut compressed: Option<PathBuf> = None;
    let upload_path = if media::within_size_limit(&request.video_path, request.max_file_size_mb)? {
        request.video_path.clone()
    } else if request.auto_compress {
        let ffmpeg_bin = ffmpeg::locate_ffmpeg().ok_or(Error::Ffmpeg(FfmpegError::NotFound))?;
        let mut on_attempt = tx.clone();
        let path = ffmpeg::compress_to_target(
            &ffmpeg_bin,
            &request.video_path,
            request.max_file_size_mb,
            move |crf| {
                let _ = on_attempt.try_send(WorkerEvent::Stage(JobStage::Compressing { crf }));
            },
        )
        .await?;
        compressed = Some(path.clone());
        path
    } else {
        return Err(Error::Video(format!(
            "{} exceeds the {} MB limit and automatic compression is off",
            request.video_path.display(),
            request.max_file_size_mb
        )));
    };

    let client = gemini::GeminiClient::new(&request.api_key);
    let result = analyze(request, &client, &upload_path, &mut report).await;

    if let Some(path) = compressed {
        if let Err(e) = std::fs::remove_file(&path) {
            log::warn!("could not remove temporary file {}: {e}", path.display());
        }
    }

    result
}

async fn analyze(
    request: &AnalysisRequest,
    client: &gemini::GeminiClient,
    upload_path: &std::path::Path,
    report: &mut impl FnMut(WorkerEvent),
) -> Result<(PathBuf, String)> {
    report(WorkerEvent::Stage(JobStage::Uploading));
    let uploaded = client.upload_video(upload_path).await?;
    let remote_name = uploaded.name.clone();

    let outcome = generate(request, client, uploaded, report).await;

    // Remote uploads auto-expire, but tidy up eagerly on both paths.
    client.delete_file(&remote_name).await;

    outcome
}

async fn generate(
    request: &AnalysisRequest,
    client: &gemini::GeminiClient,
    uploaded: gemini::model::FileResource,
    report: &mut impl FnMut(WorkerEvent),
) -> Result<(PathBuf, String)> {
    report(WorkerEvent::Stage(JobStage::WaitingRemote));
    let active = client.wait_until_active(&uploaded).await?;

    report(WorkerEvent::Stage(JobStage::Analyzing));
    let text = if request.stream_response {
        client
            .generate_streaming(&request.model, &request.prompt, &active, |chunk| {
                report(WorkerEvent::Chunk(chunk.to_string()));
            })
            .await?
    } else {
        client
            .generate(&request.model, &request.prompt, &active)
            .await?
    };

    report(WorkerEvent::Stage(JobStage::Saving));
    let mut output_path = output::output_path_for(&request.video_path, &request.output_dir);
    output::write_text(&output_path, &text, request.use_bom)?;

    if request.generate_title {
        match suggest_title(client, &request.model, &text).await {
            Some(title) => match output::apply_title(&output_path, &title) {
                Ok(renamed) => output_path = renamed,
                Err(e) => log::warn!("could not rename result: {e}"),
            },
            None => log::debug!("no usable title suggestion, keeping original name"),
        }
    }

    Ok((output_path, text))
}

/// Asks the model for a short title. Title generation is best effort;
/// any failure just leaves the timestamped name in place.
async fn suggest_title(
    client: &gemini::GeminiClient,
    model: &str,
    analysis: &str,
) -> Option<String> {
    let prompt = gemini::title::title_prompt(analysis);
    match client.generate_text(model, &prompt).await {
        Ok(reply) => gemini::title::extract_title(&reply),
        Err(Error::Api(ApiError::EmptyResponse)) => None,
        Err(e) => {
            log::warn!("title request failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            video_path: PathBuf::from("clip.mp4"),
            prompt: "describe".into(),
            api_key: "key".into(),
            model: "gemini-2.5-flash".into(),
            stream_response: true,
            output_dir: PathBuf::from("out"),
            use_bom: true,
            max_file_size_mb: 500,
            auto_compress: true,
            generate_title: true,
        }
    }

    #[test]
    fn stage_progress_is_monotonic() {
        let stages = [
            JobStage::Validating,
            JobStage::Compressing { crf: 28 },
            JobStage::Uploading,
            JobStage::WaitingRemote,
            JobStage::Analyzing,
            JobStage::Saving,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0].progress() < pair[1].progress());
        }
    }

    #[test]
    fn from_settings_requires_api_key() {
        let mut settings = Settings::default();
        settings.gemini.api_key = None;
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GOOGLE_API_KEY");
        assert!(AnalysisRequest::from_settings(
            &settings,
            PathBuf::from("clip.mp4"),
            "prompt".into()
        )
        .is_none());

        settings.gemini.api_key = Some("abc".into());
        let built = AnalysisRequest::from_settings(
            &settings,
            PathBuf::from("clip.mp4"),
            "prompt".into(),
        )
        .unwrap();
        assert_eq!(built.api_key, "abc");
        assert_eq!(built.model, settings.gemini.model);
    }

    #[test]
    fn request_captures_settings_snapshot() {
        let r = request();
        assert!(r.stream_response);
        assert_eq!(r.max_file_size_mb, 500);
    }
}
