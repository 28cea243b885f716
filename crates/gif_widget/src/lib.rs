//! Phrase to looping GIF: look a phrase up on a remote API, download the video
//! it points at, and transcode it with an injected engine.
//!
//! Every collaborator is an explicit handle owned by [`WidgetController`]; there
//! is no module-level state.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod object_url;
pub mod phrase_api;
pub mod view;

pub use config::WidgetSettings;
pub use controller::{WidgetController, CONVERSION_FAILED_ALERT, PHRASE_REQUIRED_ALERT};
pub use engine::{gif_args, FfmpegEngine, TranscodingEngine};
pub use error::{WidgetError, WidgetResult};
pub use object_url::{Blob, ObjectUrlStore, GIF_MIME};
pub use phrase_api::{HttpPhraseSource, PhraseLookupResponse, PhraseSource};
pub use view::WidgetView;
