use crate::domain::{DeadlinePolicy, DeleteMode, QuadrantLabels};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Default number of entries each undo stack keeps
pub const DEFAULT_UNDO_DEPTH: usize = 50;

/// The local user; only `id` is used, as the owner of every task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: None,
        }
    }
}

/// Settings stored in meta.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Absent until the first run writes one
    pub user: Option<UserProfile>,
    pub quadrant_labels: QuadrantLabels,
    pub delete_mode: DeleteMode,
    pub undo_depth: usize,
    /// Show tasks without a deadline as "1 day left"
    pub legacy_no_deadline_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: None,
            quadrant_labels: QuadrantLabels::default(),
            delete_mode: DeleteMode::default(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            legacy_no_deadline_fallback: true,
        }
    }
}

impl Settings {
    pub fn deadline_policy(&self) -> DeadlinePolicy {
        DeadlinePolicy {
            legacy_no_deadline_fallback: self.legacy_no_deadline_fallback,
        }
    }

    /// Owner id of the local user, empty before one is generated
    pub fn owner_id(&self) -> &str {
        self.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default()
    }
}

/// Load settings from meta.json, defaults when the file is missing
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to meta.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

/// Load settings, generating and saving a user profile on first run
pub fn load_or_init_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let mut settings = load_settings(path)?;
    if settings.user.is_none() {
        let user = UserProfile::generate();
        log::info!("created local user {}", user.id);
        settings.user = Some(user);
        save_settings(path, &settings)?;
    }
    Ok(settings)
}
