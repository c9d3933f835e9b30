// SPDX-License-Identifier: MPL-2.0
//! Optional ffmpeg re-encode for videos over the upload size limit.
//!
//! Compression walks a CRF ladder from light to heavy until the output
//! fits under the target size. Every pass is a full re-encode, so on a
//! multi-gigabyte clip this can take a while; callers report each pass
//! to the UI through the `on_attempt` callback.

use crate::error::{FfmpegError, Result};
use crate::media;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const CRF_START: u32 = 28;
const CRF_END: u32 = 34;
const CRF_STEP: u32 = 2;

/// Finds the ffmpeg binary on PATH, or next to the running executable.
pub fn locate_ffmpeg() -> Option<PathBuf> {
    let name = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let local = dir.join(name);
            if local.is_file() {
                return Some(local);
            }
        }
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// The output path for a compressed copy of `input`, never clobbering
/// an existing file.
fn compressed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "video".to_string());
    let candidate = input.with_file_name(format!("{stem}_compressed.mp4"));
    crate::output::unique_path(candidate)
}

/// Re-encodes `input` until it fits under `target_mb`, returning the
/// path of the compressed copy. `on_attempt` receives the CRF value of
/// each pass as it starts.
pub async fn compress_to_target(
    ffmpeg: &Path,
    input: &Path,
    target_mb: u32,
    mut on_attempt: impl FnMut(u32),
) -> Result<PathBuf> {
    let output = compressed_path(input);

    let mut crf = CRF_START;
    loop {
        on_attempt(crf);
        log::info!(
            "compressing {} with crf {} (target {} MB)",
            input.display(),
            crf,
            target_mb
        );

        run_encode(ffmpeg, input, &output, crf).await?;

        let size = media::file_size_mb(&output)?;
        if size <= target_mb as f64 {
            log::info!("compressed to {:.1} MB at crf {}", size, crf);
            return Ok(output);
        }
        log::info!("crf {} landed at {:.1} MB, still over target", crf, size);

        if crf >= CRF_END {
            let _ = std::fs::remove_file(&output);
            return Err(FfmpegError::TargetNotReached { target_mb }.into());
        }
        crf += CRF_STEP;
    }
}

async fn run_encode(ffmpeg: &Path, input: &Path, output: &Path, crf: u32) -> Result<()> {
    let status = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-vcodec", "libx264"])
        .args(["-crf", &crf.to_string()])
        .args(["-preset", "medium"])
        .args(["-movflags", "+faststart"])
        .args(["-acodec", "aac"])
        .args(["-b:a", "128k"])
        .arg(output)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|e| FfmpegError::EncodeFailed(e.to_string()))?;

    if !status.success() {
        let _ = std::fs::remove_file(output);
        return Err(FfmpegError::EncodeFailed(format!(
            "ffmpeg exited with {status} for crf {crf}"
        ))
        .into());
    }
    Ok(())
}
