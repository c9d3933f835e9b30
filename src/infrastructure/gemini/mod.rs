// SPDX-License-Identifier: MPL-2.0
//! Minimal Gemini v1beta client covering what the analysis pipeline
//! needs: resumable file upload, file state polling, content generation
//! (buffered and streamed) and file cleanup.

pub mod model;
pub mod title;

use crate::error::{ApiError, Error, Result};
use futures_util::StreamExt;
use model::{
    Content, ErrorBody, FileResource, FileState, GenerateContentRequest, GenerationConfig,
    GenerationResponse, Part, UploadResponse,
};
use rand::Rng;
use std::path::Path;
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const VIDEO_MIME: &str = "video/mp4";

/// Transient request retries.
const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// File processing poll loop. Large uploads can sit in PROCESSING for
/// minutes, so the window is generous: 120 polls, starting 5 s apart
/// and backing off to the retry delay cap.
const POLL_ATTEMPTS: u32 = 120;
const POLL_INITIAL_DELAY: Duration = Duration::from_secs(5);

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiClient {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Uploads a video through the resumable upload endpoint and returns
    /// the file resource. The returned file is usually still PROCESSING;
    /// call [`wait_until_active`] before using it in a request.
    ///
    /// [`wait_until_active`]: GeminiClient::wait_until_active
    pub async fn upload_video(&self, path: &Path) -> Result<FileResource> {
        let size = tokio::fs::metadata(path).await?.len();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());

        log::info!("uploading {display_name} ({size} bytes) to the Files API");

        // The resumable session is single-shot, so a transient failure at
        // either step restarts the upload from a fresh start request.
        let mut delay = INITIAL_RETRY_DELAY;
        for attempt in 0..=MAX_RETRIES {
            match self.try_upload(path, &display_name, size).await {
                Ok(file) => {
                    log::info!("upload accepted as {}", file.name);
                    return Ok(file);
                }
                Err(e) if attempt == MAX_RETRIES || !is_retryable_error(&e) => {
                    return Err(e);
                }
                Err(e) => {
                    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
                    let wait = delay.min(MAX_RETRY_DELAY) + jitter;
                    log::warn!(
                        "upload failed ({e}), retry {} of {MAX_RETRIES} in {:.1}s",
                        attempt + 1,
                        wait.as_secs_f32()
                    );
                    tokio::time::sleep(wait).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }

        unreachable!("upload retry loop always returns");
    }

    async fn try_upload(&self, path: &Path, display_name: &str, size: u64) -> Result<FileResource> {
        let start_url = format!("{}upload/v1beta/files?key={}", BASE_URL, self.api_key);
        let metadata = serde_json::json!({ "file": { "display_name": display_name } });

        let start = self
            .http
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size)
            .header("X-Goog-Upload-Header-Content-Type", VIDEO_MIME)
            .json(&metadata)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let start = Self::check_status(start).await?;
        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::InvalidResponse("upload start response missing upload url".into())
            })?
            .to_string();

        // Streamed body so the video never sits in memory in full. The
        // file is reopened here on every retry attempt.
        let video = tokio::fs::File::open(path).await?;
        let finalize = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(reqwest::Body::from(video))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let finalize = Self::check_status(finalize).await?;
        let uploaded: UploadResponse = finalize
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(uploaded.file)
    }

    pub async fn get_file(&self, name: &str) -> Result<FileResource> {
        let url = format!("{}v1beta/{}?key={}", BASE_URL, name, self.api_key);
        let response = self
            .with_retry(|| self.http.get(&url).send())
            .await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()).into())
    }

    /// Polls the uploaded file until it becomes ACTIVE. Fails if the
    /// remote processing reports FAILED or the poll window runs out.
    pub async fn wait_until_active(&self, file: &FileResource) -> Result<FileResource> {
        let mut current = file.clone();
        let mut delay = POLL_INITIAL_DELAY;
        for attempt in 0..POLL_ATTEMPTS {
            match current.state {
                Some(FileState::Active) => return Ok(current),
                Some(FileState::Failed) => {
                    let message = current
                        .error
                        .and_then(|status| status.message)
                        .unwrap_or_else(|| "remote processing failed".to_string());
                    return Err(ApiError::FileProcessingFailed(message).into());
                }
                _ => {}
            }

            if attempt % 6 == 0 {
                log::debug!(
                    "waiting for {} to become active (attempt {})",
                    current.name,
                    attempt + 1
                );
            }
            let jitter =
                Duration::from_millis(rand::thread_rng().gen_range(0..=delay.as_millis() as u64 / 10));
            delay = next_poll_delay(delay, jitter);
            tokio::time::sleep(delay).await;
            current = self.get_file(&current.name).await?;
        }

        Err(ApiError::FileNotReady(current.name).into())
    }

    /// One-shot generation: the full response text in a single call.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        file: &FileResource,
    ) -> Result<String> {
        let url = format!(
            "{}v1beta/models/{}:generateContent?key={}",
            BASE_URL,
            normalize_model(model),
            self.api_key
        );
        let request = Self::build_request(prompt, file)?;

        let response = self
            .with_retry(|| self.http.post(&url).json(&request).send())
            .await?;
        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let text = parsed.text();
        if text.is_empty() {
            return Err(ApiError::EmptyResponse.into());
        }
        Ok(text)
    }

    /// Streaming generation over server-sent events. Each decoded text
    /// chunk is handed to `on_chunk`; the full concatenated text is
    /// returned at the end.
    pub async fn generate_streaming<F>(
        &self,
        model: &str,
        prompt: &str,
        file: &FileResource,
        mut on_chunk: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let url = format!(
            "{}v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            BASE_URL,
            normalize_model(model),
            self.api_key
        );
        let request = Self::build_request(prompt, file)?;

        let response = self
            .with_retry(|| self.http.post(&url).json(&request).send())
            .await?;

        let mut full = String::new();
        let mut buffer = String::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ApiError::Transport(e.to_string()))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim_end_matches('\r').to_string();
                buffer.drain(..=newline);

                let Some(payload) = line.strip_prefix("data: ") else {
                    continue;
                };
                if payload == "[DONE]" {
                    continue;
                }
                let event: GenerationResponse = serde_json::from_str(payload)
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
                let text = event.text();
                if !text.is_empty() {
                    on_chunk(&text);
                    full.push_str(&text);
                }
            }
        }

        if full.is_empty() {
            return Err(ApiError::EmptyResponse.into());
        }
        Ok(full)
    }

    /// Short text-only generation, used for title suggestions.
    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}v1beta/models/{}:generateContent?key={}",
            BASE_URL,
            normalize_model(model),
            self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.4),
                top_p: Some(0.95),
                max_output_tokens: Some(256),
            }),
        };

        let response = self
            .with_retry(|| self.http.post(&url).json(&request).send())
            .await?;
        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text())
    }

    /// Deletes an uploaded file. Failures are logged, not propagated;
    /// the Files API expires uploads on its own after 48 hours.
    pub async fn delete_file(&self, name: &str) {
        let url = format!("{}v1beta/{}?key={}", BASE_URL, name, self.api_key);
        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {
                log::debug!("deleted remote file {name}");
            }
            Ok(response) => {
                log::warn!("could not delete {name}: HTTP {}", response.status());
            }
            Err(e) => {
                log::warn!("could not delete {name}: {e}");
            }
        }
    }

    fn build_request(prompt: &str, file: &FileResource) -> Result<GenerateContentRequest> {
        let uri = file
            .uri
            .clone()
            .ok_or_else(|| ApiError::InvalidResponse("uploaded file has no uri".to_string()))?;
        let mime = file
            .mime_type
            .clone()
            .unwrap_or_else(|| VIDEO_MIME.to_string());

        Ok(GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part::file(mime, uri), Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig::default()),
        })
    }

    /// Sends a request, retrying transport errors and retryable HTTP
    /// statuses with exponential backoff plus jitter.
    async fn with_retry<F, Fut>(&self, mut send: F) -> Result<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
    {
        let mut delay = INITIAL_RETRY_DELAY;

        for attempt in 0..=MAX_RETRIES {
            let reason = match send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt == MAX_RETRIES || !is_retryable_status(status) {
                        return Self::check_status(response).await;
                    }
                    format!("HTTP {status}")
                }
                Err(e) if attempt == MAX_RETRIES => {
                    return Err(ApiError::Transport(e.to_string()).into());
                }
                Err(e) => e.to_string(),
            };

            let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
            let wait = delay.min(MAX_RETRY_DELAY) + jitter;
            log::warn!(
                "request failed ({reason}), retry {} of {MAX_RETRIES} in {:.1}s",
                attempt + 1,
                wait.as_secs_f32()
            );
            tokio::time::sleep(wait).await;
            delay = (delay * 2).min(MAX_RETRY_DELAY);
        }

        unreachable!("retry loop always returns");
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error)
            .and_then(|detail| detail.message)
            .unwrap_or(body);
        Err(Error::Api(ApiError::Status {
            code: status.as_u16(),
            message,
        }))
    }
}

fn is_retryable_status(code: u16) -> bool {
    matches!(code, 408 | 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Api(ApiError::Transport(_)) => true,
        Error::Api(ApiError::Status { code, .. }) => is_retryable_status(*code),
        _ => false,
    }
}

/// Doubles the poll delay, adds the jitter and caps the result.
fn next_poll_delay(delay: Duration, jitter: Duration) -> Duration {
    (delay * 2 + jitter).min(MAX_RETRY_DELAY)
}

/// Accepts model names with or without the `models/` prefix.
fn normalize_model(model: &str) -> &str {
    model.trim_start_matches("models/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_prefix() {
        assert_eq!(normalize_model("models/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(normalize_model("gemini-2.5-pro"), "gemini-2.5-pro");
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn upload_retries_transport_and_server_errors_only() {
        assert!(is_retryable_error(&Error::Api(ApiError::Transport(
            "connection reset".into()
        ))));
        assert!(is_retryable_error(&Error::Api(ApiError::Status {
            code: 503,
            message: "overloaded".into(),
        })));
        assert!(!is_retryable_error(&Error::Api(ApiError::Status {
            code: 403,
            message: "forbidden".into(),
        })));
        assert!(!is_retryable_error(&Error::Io("file vanished".into())));
    }

    #[test]
    fn poll_delay_doubles_with_jitter_up_to_the_cap() {
        let first = next_poll_delay(Duration::from_secs(1), Duration::from_millis(100));
        assert_eq!(first, Duration::from_millis(2100));

        let capped = next_poll_delay(POLL_INITIAL_DELAY, Duration::from_millis(500));
        assert_eq!(capped, MAX_RETRY_DELAY);
    }

    #[test]
    fn build_request_needs_uri() {
        let file = FileResource {
            name: "files/abc".into(),
            uri: None,
            mime_type: None,
            state: None,
            error: None,
        };
        assert!(GeminiClient::build_request("prompt", &file).is_err());
    }

    #[test]
    fn build_request_puts_file_before_prompt() {
        let file = FileResource {
            name: "files/abc".into(),
            uri: Some("https://example.invalid/files/abc".into()),
            mime_type: Some("video/mp4".into()),
            state: Some(FileState::Active),
            error: None,
        };
        let request = GeminiClient::build_request("describe", &file).unwrap();
        let parts = &request.contents[0].parts;
        assert!(parts[0].file_data.is_some());
        assert_eq!(parts[1].text.as_deref(), Some("describe"));
    }
}
