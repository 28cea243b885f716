/// The surface the widget draws on: a GIF element, a video element, and a
/// user-facing alert.
pub trait WidgetView: Send + Sync {
    fn alert(&self, message: &str);
    fn set_gif_source(&self, src: &str);
    fn show_gif(&self);
    fn hide_video(&self);
}
