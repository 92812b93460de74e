use crate::timer::LapTimer;

/// UI-side session state. Owned by the event loop thread only; every call
/// into the timer happens sequentially from key dispatch or the redraw tick.
pub struct UiState {
    pub tab: usize,
    pub timer: LapTimer,
    /// Feedback line for save/export/lap messages.
    pub info: String,
    /// Set after the first start; splits "fresh" from "stopped" styling and
    /// status text.
    pub started_once: bool,
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            timer: LapTimer::new(),
            info: String::new(),
            started_once: false,
            last_exported_path: None,
        }
    }
}
