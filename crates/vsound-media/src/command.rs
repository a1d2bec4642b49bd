//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{ExtractionError, ExtractionResult};

/// Output target that streams to the runner's stdout pipe.
pub const STDOUT_PIPE: &str = "pipe:1";

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output target (file path or pipe)
    output: String,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
}

impl FfmpegCommand {
    fn new(input: impl AsRef<Path>, output: impl Into<String>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.into(),
            input_args: Vec::new(),
            output_args: Vec::new(),
        }
    }

    /// Command that decodes the single frame at `seconds` as packed RGB24 on stdout.
    ///
    /// The seek goes before `-i`, so FFmpeg jumps to the nearest keyframe and
    /// decodes forward to the exact timestamp.
    pub fn frame_grab(input: impl AsRef<Path>, seconds: f64) -> Self {
        Self::new(input, STDOUT_PIPE)
            .seek(seconds)
            .single_frame()
            .raw_rgb24()
    }

    fn input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek before input. Full precision, so distinct sample points stay distinct.
    fn seek(self, seconds: f64) -> Self {
        self.input_args(["-ss".to_string(), seconds.to_string()])
    }

    fn single_frame(self) -> Self {
        self.output_args(["-frames:v", "1"])
    }

    /// Unencoded packed RGB24, no container.
    fn raw_rgb24(self) -> Self {
        self.output_args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24"])
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-nostdin".to_string(),
            "-v".to_string(),
            "error".to_string(),
        ];

        args.extend(self.input_args.iter().cloned());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.iter().cloned());

        args.push(self.output.clone());

        args
    }
}

/// Runner for FFmpeg commands with a per-invocation timeout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Timeout
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run a command and collect everything it writes to stdout.
    ///
    /// The child is killed if the timeout elapses.
    pub async fn capture_stdout(&self, cmd: &FfmpegCommand) -> ExtractionResult<Vec<u8>> {
        let ffmpeg = check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut command = Command::new(ffmpeg);
        command.args(&args);
        let output = output_with_timeout(&mut command, self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ExtractionError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                (!stderr.is_empty()).then_some(stderr),
                output.status.code(),
            ));
        }

        Ok(output.stdout)
    }
}

/// Spawn `command` with piped output and wait for it to exit.
///
/// The child is killed when `timeout` elapses first.
pub(crate) async fn output_with_timeout(
    command: &mut Command,
    timeout: Option<Duration>,
) -> ExtractionResult<Output> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    match timeout {
        Some(timeout) => match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => {
                warn!(
                    program = ?command.as_std().get_program(),
                    "Process timed out after {:?}, killing it",
                    timeout
                );
                Err(ExtractionError::Timeout(timeout.as_secs()))
            }
        },
        None => Ok(child.wait_with_output().await?),
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> ExtractionResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| ExtractionError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> ExtractionResult<PathBuf> {
    which::which("ffprobe").map_err(|_| ExtractionError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsound_models::sample_timestamps;

    fn seek_arg(args: &[String]) -> f64 {
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        args[ss + 1].parse().unwrap()
    }

    #[test]
    fn test_frame_grab_args() {
        let args = FfmpegCommand::frame_grab("clip.mp4", 10.0 / 6.0).build_args();

        assert!(!args.iter().any(|a| a == "-y"));
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < input, "seek must precede the input for fast seeking");
        assert_eq!(seek_arg(&args), 10.0 / 6.0);
        assert_eq!(args[input + 1], "clip.mp4");

        assert!(args.windows(2).any(|w| w == ["-frames:v", "1"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "rgb24"]));
        assert!(args.windows(2).any(|w| w == ["-f", "rawvideo"]));
        assert_eq!(args.last().map(String::as_str), Some(STDOUT_PIPE));
    }

    #[test]
    fn test_short_clip_seeks_stay_distinct_and_inside() {
        for duration in [0.002, 0.01, 0.5] {
            let seeks: Vec<f64> = sample_timestamps(duration, 5)
                .into_iter()
                .map(|t| seek_arg(&FfmpegCommand::frame_grab("clip.mp4", t).build_args()))
                .collect();

            assert_eq!(seeks.len(), 5);
            assert!(seeks.iter().all(|&t| t > 0.0 && t < duration), "{seeks:?}");
            assert!(seeks.windows(2).all(|w| w[0] < w[1]), "{seeks:?}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_process_is_killed_on_timeout() {
        let mut command = Command::new("sleep");
        command.arg("30");

        let started = std::time::Instant::now();
        let err = output_with_timeout(&mut command, Some(Duration::from_millis(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_collected_within_timeout() {
        let mut command = Command::new("echo");
        command.arg("frame");

        let output = output_with_timeout(&mut command, Some(Duration::from_secs(10)))
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"frame\n");
    }
}
