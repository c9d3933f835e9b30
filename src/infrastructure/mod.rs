// SPDX-License-Identifier: MPL-2.0
//! External service integrations: the Gemini API and the ffmpeg binary.

pub mod ffmpeg;
pub mod gemini;
