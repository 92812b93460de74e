use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use crate::export;
use crate::model::SessionConfig;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Session name to stamp on an export: the configured one, or a generated
/// `Session_<timestamp>` fallback.
fn resolve_session_name(cfg: &SessionConfig, saved_at: OffsetDateTime) -> String {
    cfg.session_name
        .clone()
        .unwrap_or_else(|| format!("Session_{}", crate::format::file_stamp(saved_at)))
}

pub(super) fn export_dir(cfg: &SessionConfig) -> PathBuf {
    cfg.output_dir
        .clone()
        .unwrap_or_else(export::default_export_dir)
}

/// Write the session CSV to its default location and return the path.
fn save_session_csv(state: &UiState, cfg: &SessionConfig) -> Result<PathBuf> {
    let saved_at = OffsetDateTime::now_utc().to_offset(cfg.utc_offset);
    let name = resolve_session_name(cfg, saved_at);
    let dir = export_dir(cfg);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(export::default_file_name(&name, saved_at, "csv"));
    export::export_csv(
        &path,
        &name,
        state.timer.laps(),
        state.timer.current_elapsed(),
        saved_at,
    )?;
    Ok(path)
}

/// Write the JSON projection next to where the CSV would go.
fn save_session_json(state: &UiState, cfg: &SessionConfig) -> Result<PathBuf> {
    let saved_at = OffsetDateTime::now_utc().to_offset(cfg.utc_offset);
    let name = resolve_session_name(cfg, saved_at);
    let dir = export_dir(cfg);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(export::default_file_name(&name, saved_at, "json"));
    let projection = export::build_export(
        &name,
        state.timer.laps(),
        state.timer.current_elapsed(),
        saved_at,
    );
    export::export_json(&path, &projection)?;
    Ok(path)
}

/// Save the session CSV and surface the result on the info line.
pub fn save_and_show_path(state: &mut UiState, cfg: &SessionConfig) {
    match save_session_csv(state, cfg) {
        Ok(path) => {
            state.last_exported_path = Some(path.to_string_lossy().to_string());
            state.info = format!("Saved: {} (press 'y' to copy path)", path.display());
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

/// Export the session JSON and surface the result on the info line.
pub fn export_json_and_show_path(state: &mut UiState, cfg: &SessionConfig) {
    match save_session_json(state, cfg) {
        Ok(path) => {
            state.last_exported_path = Some(path.to_string_lossy().to_string());
            state.info = format!("Exported JSON: {} (press 'y' to copy path)", path.display());
        }
        Err(e) => {
            state.info = format!("JSON export failed: {e:#}");
        }
    }
}

/// Initialize the clipboard manager thread if not already initialized.
/// Clipboard writes go through a dedicated thread that keeps each instance
/// alive long enough for clipboard managers to read it on Linux.
fn clipboard_sender() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("failed to initialize clipboard manager"))
}

/// Queue a clipboard write without blocking the event loop.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    clipboard_sender()?
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("clipboard manager channel closed"))?;
    Ok(())
}
