use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    config::WidgetSettings,
    engine::{gif_args, FfmpegEngine, TranscodingEngine},
    error::{WidgetError, WidgetResult},
    object_url::{Blob, ObjectUrlStore, GIF_MIME},
    phrase_api::{HttpPhraseSource, PhraseSource},
    view::WidgetView,
};

pub const PHRASE_REQUIRED_ALERT: &str = "Please enter a phrase.";
pub const CONVERSION_FAILED_ALERT: &str = "Could not fetch or convert video. Please try again.";

/// Owns the handles one widget instance works with. Build it once and share it;
/// separate clicks run independent pipelines.
pub struct WidgetController {
    source: Arc<dyn PhraseSource>,
    engine: Arc<dyn TranscodingEngine>,
    urls: Arc<ObjectUrlStore>,
    view: Arc<dyn WidgetView>,
}

impl WidgetController {
    pub fn new(
        source: Arc<dyn PhraseSource>,
        engine: Arc<dyn TranscodingEngine>,
        urls: Arc<ObjectUrlStore>,
        view: Arc<dyn WidgetView>,
    ) -> Self {
        Self {
            source,
            engine,
            urls,
            view,
        }
    }

    /// HTTP phrase source and ffmpeg engine configured from `settings`.
    pub fn from_settings(
        settings: &WidgetSettings,
        urls: Arc<ObjectUrlStore>,
        view: Arc<dyn WidgetView>,
    ) -> WidgetResult<Self> {
        let source = HttpPhraseSource::new(&settings.api_url)?;
        let engine = FfmpegEngine::new(&settings.ffmpeg_path, &settings.work_dir);
        Ok(Self::new(Arc::new(source), Arc::new(engine), urls, view))
    }

    pub fn object_urls(&self) -> &Arc<ObjectUrlStore> {
        &self.urls
    }

    /// Search-button handler. Every failure ends in exactly one alert; the
    /// error is also returned so callers can inspect it.
    pub async fn on_search_click(&self, raw_input: &str) -> WidgetResult<String> {
        let phrase = raw_input.trim();
        if phrase.is_empty() {
            self.view.alert(PHRASE_REQUIRED_ALERT);
            return Err(WidgetError::EmptyPhrase);
        }

        match self.fetch_and_convert(phrase).await {
            Ok(gif_url) => Ok(gif_url),
            Err(error) => {
                error!(%error, phrase, "could not fetch or convert video");
                self.view.alert(CONVERSION_FAILED_ALERT);
                Err(error)
            }
        }
    }

    async fn fetch_and_convert(&self, phrase: &str) -> WidgetResult<String> {
        let video_url = self.source.lookup_video_url(phrase).await?;
        self.engine.ensure_loaded().await?;
        let video = self.source.fetch_video(&video_url).await?;

        let token = Uuid::new_v4().simple();
        let input = format!("input-{token}.mp4");
        let output = format!("output-{token}.gif");

        let transcoded = async {
            self.engine.write_file(&input, &video).await?;
            self.engine.run(&gif_args(&input, &output)).await?;
            self.engine.read_file(&output).await
        }
        .await;
        self.remove_scratch(&[input.as_str(), output.as_str()]).await;
        let gif = transcoded?;

        let gif_bytes = gif.len();
        let gif_url = self.urls.create_object_url(Blob::new(GIF_MIME, gif));
        self.view.set_gif_source(&gif_url);
        self.view.show_gif();
        self.view.hide_video();
        info!(phrase, %video_url, gif_bytes, "gif ready");
        Ok(gif_url)
    }

    /// Runs whether or not the transcode succeeded; names never staged are skipped.
    async fn remove_scratch(&self, names: &[&str]) {
        for name in names {
            match self.engine.remove_file(name).await {
                Ok(()) => {}
                Err(WidgetError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => warn!(file = %name, %error, "failed to remove scratch file"),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
