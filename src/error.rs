// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Api(ApiError),
    Video(String),
    Ffmpeg(FfmpegError),
    Output(String),
}

/// Specific error types for Gemini API interactions. Kept separate from the
/// top-level enum so the worker can distinguish remote failures from local
/// ones when building user-facing status messages.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// No API key was found in the settings or the environment.
    MissingKey,

    /// The HTTP layer failed before a response arrived.
    Transport(String),

    /// The API answered with a non-success status code.
    Status { code: u16, message: String },

    /// A response body could not be decoded.
    InvalidResponse(String),

    /// The uploaded file never reached the ACTIVE state.
    FileNotReady(String),

    /// The remote file processing ended in the FAILED state.
    FileProcessingFailed(String),

    /// The response contained no usable text.
    EmptyResponse,
}

/// Errors from the external encoder step.
#[derive(Debug, Clone)]
pub enum FfmpegError {
    /// No ffmpeg binary was found on the system PATH.
    NotFound,

    /// The encoder ran but exited with a failure.
    EncodeFailed(String),

    /// The CRF ladder was exhausted without reaching the target size.
    TargetNotReached { target_mb: u32 },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingKey => {
                write!(f, "No Gemini API key configured (settings or GEMINI_API_KEY)")
            }
            ApiError::Transport(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Status { code, message } => {
                write!(f, "API returned HTTP {}: {}", code, message)
            }
            ApiError::InvalidResponse(msg) => write!(f, "Unreadable API response: {}", msg),
            ApiError::FileNotReady(name) => {
                write!(f, "Remote file {} did not become ready in time", name)
            }
            ApiError::FileProcessingFailed(name) => {
                write!(f, "Remote processing of {} failed", name)
            }
            ApiError::EmptyResponse => write!(f, "The model returned no text"),
        }
    }
}

impl fmt::Display for FfmpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfmpegError::NotFound => write!(f, "ffmpeg was not found on PATH"),
            FfmpegError::EncodeFailed(msg) => write!(f, "ffmpeg failed: {}", msg),
            FfmpegError::TargetNotReached { target_mb } => {
                write!(f, "Could not compress below {} MB", target_mb)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Api(e) => write!(f, "API Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
            Error::Ffmpeg(e) => write!(f, "Encoder Error: {}", e),
            Error::Output(e) => write!(f, "Output Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for ApiError {}
impl std::error::Error for FfmpegError {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(ApiError::Transport(err.to_string()))
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<FfmpegError> for Error {
    fn from(err: FfmpegError) -> Self {
        Error::Ffmpeg(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
