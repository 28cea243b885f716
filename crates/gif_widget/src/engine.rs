use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::{process::Command, sync::OnceCell};
use tracing::{debug, info};

use crate::error::{WidgetError, WidgetResult};

pub const GIF_FPS: u32 = 10;
pub const GIF_WIDTH: u32 = 320;

/// Arguments for a looping GIF at [`GIF_FPS`] frames per second, scaled to
/// [`GIF_WIDTH`] pixels wide with lanczos resampling.
pub fn gif_args(input: &str, output: &str) -> Vec<String> {
    vec![
        "-i".into(),
        input.into(),
        "-vf".into(),
        format!("fps={GIF_FPS},scale={GIF_WIDTH}:-1:flags=lanczos"),
        "-loop".into(),
        "0".into(),
        output.into(),
    ]
}

/// A media converter with its own scratch filesystem and a command-style entry
/// point.
#[async_trait]
pub trait TranscodingEngine: Send + Sync {
    /// Loads the engine. Safe to call repeatedly and concurrently; only the
    /// first call does any work.
    async fn ensure_loaded(&self) -> WidgetResult<()>;
    fn is_loaded(&self) -> bool;
    async fn write_file(&self, name: &str, bytes: &[u8]) -> WidgetResult<()>;
    async fn run(&self, args: &[String]) -> WidgetResult<()>;
    async fn read_file(&self, name: &str) -> WidgetResult<Vec<u8>>;
    async fn remove_file(&self, name: &str) -> WidgetResult<()>;
}

/// Runs the `ffmpeg` binary inside a private working directory.
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    work_dir: PathBuf,
    loaded: OnceCell<()>,
}

impl FfmpegEngine {
    pub fn new(ffmpeg_path: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            work_dir: work_dir.into(),
            loaded: OnceCell::new(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn scratch_path(&self, name: &str) -> WidgetResult<PathBuf> {
        if self.loaded.get().is_none() {
            return Err(WidgetError::EngineNotLoaded);
        }
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(WidgetError::InvalidFileName(name.to_string()));
        }
        Ok(self.work_dir.join(name))
    }

    async fn load(&self) -> WidgetResult<()> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                WidgetError::Transcode(format!(
                    "ffmpeg spawn error ({}): {e}",
                    self.ffmpeg_path.display()
                ))
            })?;
        if !output.status.success() {
            return Err(WidgetError::Transcode(format!(
                "ffmpeg -version exited with {}",
                output.status
            )));
        }
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let banner = String::from_utf8_lossy(&output.stdout);
        info!(
            version = banner.lines().next().unwrap_or_default(),
            work_dir = %self.work_dir.display(),
            "transcoding engine loaded"
        );
        Ok(())
    }
}

#[async_trait]
impl TranscodingEngine for FfmpegEngine {
    async fn ensure_loaded(&self) -> WidgetResult<()> {
        self.loaded.get_or_try_init(|| self.load()).await?;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> WidgetResult<()> {
        let path = self.scratch_path(name)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(file = name, bytes = bytes.len(), "staged file");
        Ok(())
    }

    async fn run(&self, args: &[String]) -> WidgetResult<()> {
        if !self.is_loaded() {
            return Err(WidgetError::EngineNotLoaded);
        }
        debug!(?args, "running ffmpeg");
        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| WidgetError::Transcode(format!("ffmpeg spawn error: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr.lines().last().unwrap_or_default();
            return Err(WidgetError::Transcode(format!(
                "ffmpeg exited with {}: {tail}",
                output.status
            )));
        }
        Ok(())
    }

    async fn read_file(&self, name: &str) -> WidgetResult<Vec<u8>> {
        let path = self.scratch_path(name)?;
        Ok(tokio::fs::read(&path).await?)
    }

    async fn remove_file(&self, name: &str) -> WidgetResult<()> {
        let path = self.scratch_path(name)?;
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
