use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::progress::ProgressState;
use crate::ui::theme::ThemeState;

pub const PROGRESS_KEY: &str = "docker-tutorial-progress";
pub const THEME_KEY: &str = "docker-tutorial-theme";

/// Version written into every stored envelope.
pub const STATE_VERSION: u32 = 0;

pub const EXPORT_VERSION: u32 = 1;

/// On-disk shape of every store record: `{"state": ..., "version": N}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// Portable backup of everything the stores persist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub docktutor_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub progress: ProgressState,
    pub theme: ThemeState,
}
