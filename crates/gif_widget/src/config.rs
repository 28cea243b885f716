use std::path::PathBuf;

use crate::phrase_api::DEFAULT_PHRASE_API_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub api_url: String,
    pub ffmpeg_path: PathBuf,
    pub work_dir: PathBuf,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PHRASE_API_URL.into(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            work_dir: std::env::temp_dir().join("signgif"),
        }
    }
}

impl WidgetSettings {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(v) = env("SIGNGIF_API_URL") {
            settings.api_url = v;
        }
        if let Some(v) = env("FFMPEG_PATH") {
            settings.ffmpeg_path = v.into();
        }
        if let Some(v) = env("SIGNGIF_WORK_DIR") {
            settings.work_dir = v.into();
        }
        settings
    }
}
