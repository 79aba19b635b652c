//! FFmpeg process management and abstraction.
//!
//! [`FfmpegSpawner`] and [`FfmpegProcess`] decouple the pipeline from the
//! concrete ffmpeg-sidecar process handling, so tests can substitute mock
//! implementations that record commands and fabricate results.

use crate::error::{command_failed_error, command_start_error, command_wait_error, CoreResult};

use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::process::ExitStatus;

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an [`FfmpegProcess`].
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing [`FfmpegProcess`].
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (event iterator)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete implementation of [`FfmpegSpawner`] using ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

/// Spawns an ffmpeg command, drains its events, and checks its exit status.
///
/// Error-level log events are collected and attached to the failure so the
/// caller sees ffmpeg's own diagnostic text, not just a status code.
pub fn run_ffmpeg<S: FfmpegSpawner>(
    spawner: &S,
    mut cmd: FfmpegCommand,
    context: &str,
) -> CoreResult<()> {
    {
        let args: Vec<_> = cmd
            .as_inner()
            .get_args()
            .map(|arg| arg.to_string_lossy())
            .collect();
        log::debug!("Running ffmpeg ({}) with args: {:?}", context, args);
    }

    let mut process = spawner.spawn(cmd)?;

    let mut error_lines: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                log::warn!("[{}] {}", context, msg);
                error_lines.push(msg);
            }
            FfmpegEvent::Error(msg) => {
                log::warn!("[{}] {}", context, msg);
                error_lines.push(msg);
            }
            FfmpegEvent::Log(LogLevel::Warning, msg) => {
                log::debug!("[{}] {}", context, msg);
            }
            FfmpegEvent::Progress(progress) => {
                log::debug!("[{}] progress: time={}", context, progress.time);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        return Err(command_failed_error(
            format!("ffmpeg ({context})"),
            status,
            error_lines.join("\n"),
        ));
    }
    Ok(())
}
