// SPDX-License-Identifier: MPL-2.0
//! `clipsight` is a desktop companion for analyzing videos with Google
//! Gemini, built with the Iced GUI framework.
//!
//! Drop an MP4 on the window, pick or write a prompt, and the analysis
//! result lands as a text file in the output directory. Oversized inputs
//! can be re-encoded through an external ffmpeg before upload.

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod media;
pub mod output;
pub mod prompts;
pub mod ui;
pub mod worker;
