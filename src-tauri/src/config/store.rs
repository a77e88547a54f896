//! Configuration file resolution.
//!
//! Walks an ordered list of candidate directories and, per directory, tries
//! to load the file, seed it from the embedded template, or write generated
//! defaults, stopping at the first success. Never fails outward: the worst
//! case is normalized in-memory defaults. Existing files are never
//! overwritten, whatever their content.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_embed::Embed;

use super::app_config::{AppConfig, CONFIG_FILE_NAME};

/// Overrides the primary candidate directory (normally the executable's).
pub const CONFIG_DIR_ENV: &str = "BEAMER_VIEWER_CONFIG_DIR";

/// Directory name under the per-user config root.
const APP_DIR_NAME: &str = "beamer-viewer";

#[derive(Embed)]
#[folder = "resources/"]
struct TemplateAssets;

/// Resolve the configuration, creating a file if possible.
///
/// Returns the normalized configuration together with the path it was read
/// from (or the last path that was attempted, when every candidate failed).
pub fn load_or_create() -> (AppConfig, PathBuf) {
    let template = TemplateAssets::get(CONFIG_FILE_NAME).map(|f| f.data);
    resolve(&candidate_dirs(), template.as_deref())
}

/// The cascade over explicit candidates, with the template injected so the
/// terminal steps stay testable.
fn resolve(candidates: &[PathBuf], template: Option<&[u8]>) -> (AppConfig, PathBuf) {
    let mut last_path = PathBuf::new();

    for dir in candidates {
        let path = dir.join(CONFIG_FILE_NAME);
        last_path = path.clone();

        if let Some(cfg) = try_load(&path) {
            return (cfg.normalize(), path);
        }

        if !path.exists() {
            if try_extract_template(&path, template) {
                if let Some(cfg) = try_load(&path) {
                    return (cfg.normalize(), path);
                }
            }
        }

        if !path.exists() {
            if let Some(cfg) = try_write_defaults(&path) {
                return (cfg, path);
            }
        }

        // A malformed file, or an unwritable directory: fall through to the
        // next candidate.
    }

    tracing::warn!("no configuration location usable, continuing with in-memory defaults");
    (AppConfig::default().normalize(), last_path)
}

/// Candidate directories in resolution order: the executable's directory
/// (or the env override), then the per-user config directory.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        candidates.push(PathBuf::from(dir));
    } else {
        candidates.push(exe_dir());
    }

    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join(APP_DIR_NAME));
    }

    candidates
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn try_load(path: &Path) -> Option<AppConfig> {
    if !path.exists() {
        return None;
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), "configuration unreadable: {e}");
            return None;
        }
    };
    match AppConfig::from_json(&raw) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "configuration loaded");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "configuration unusable: {e}");
            None
        }
    }
}

/// Materialize the embedded template at `path`. Refuses to touch an
/// existing file; `create_new` keeps the check race-free.
fn try_extract_template(path: &Path, template: Option<&[u8]>) -> bool {
    if path.exists() {
        return true;
    }
    let Some(bytes) = template else {
        tracing::debug!("no embedded configuration template");
        return false;
    };
    if !ensure_parent(path) {
        return false;
    }
    match write_new(path, bytes) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "configuration template extracted");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "template extraction failed: {e}");
            false
        }
    }
}

/// Write generated defaults to `path`. Only a successful write counts; the
/// caller moves on to the next candidate otherwise.
fn try_write_defaults(path: &Path) -> Option<AppConfig> {
    let cfg = AppConfig::default().normalize();
    let json = match serde_json::to_string_pretty(&cfg) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("default configuration serialization failed: {e}");
            return None;
        }
    };
    if !ensure_parent(path) {
        return None;
    }
    match write_new(path, json.as_bytes()) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "default configuration written");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "default configuration write failed: {e}");
            None
        }
    }
}

fn ensure_parent(path: &Path) -> bool {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent).is_ok(),
        None => false,
    }
}

fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs_of(tmp: &[&tempfile::TempDir]) -> Vec<PathBuf> {
        tmp.iter().map(|d| d.path().to_path_buf()).collect()
    }

    #[test]
    fn defaults_written_when_nothing_exists() {
        let primary = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();

        let (cfg, path) = resolve(&dirs_of(&[&primary, &fallback]), None);

        assert_eq!(cfg.refresh_ms, 60_000);
        assert_eq!(cfg.widget_width, 520);
        assert_eq!(path, primary.path().join(CONFIG_FILE_NAME));
        // The generated user id was persisted along with the defaults.
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(&cfg.user_id));
        assert!(!fallback.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn template_is_extracted_then_loaded() {
        let primary = tempfile::tempdir().unwrap();
        let template: &[u8] = br#"{"refreshMs": 1000, "widgetWidth": 400}"#;

        let (cfg, path) = resolve(&dirs_of(&[&primary]), Some(template));

        // Loaded from the extracted template and normalized.
        assert_eq!(cfg.refresh_ms, 15_000);
        assert_eq!(cfg.widget_width, 400);
        // The file keeps the raw template content; normalization is in-memory.
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, template);
    }

    #[test]
    fn existing_file_wins_over_template_and_is_not_rewritten() {
        let primary = tempfile::tempdir().unwrap();
        let path = primary.path().join(CONFIG_FILE_NAME);
        let existing = r#"{"refreshMs": 20000}"#;
        std::fs::write(&path, existing).unwrap();

        let template: &[u8] = br#"{"refreshMs": 90000}"#;
        let (cfg, resolved) = resolve(&dirs_of(&[&primary]), Some(template));

        assert_eq!(cfg.refresh_ms, 20_000);
        assert_eq!(resolved, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), existing);
    }

    #[test]
    fn malformed_file_is_skipped_and_never_overwritten() {
        let primary = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        let broken = primary.path().join(CONFIG_FILE_NAME);
        std::fs::write(&broken, "{{not json").unwrap();

        let (cfg, path) = resolve(&dirs_of(&[&primary, &fallback]), None);

        assert_eq!(path, fallback.path().join(CONFIG_FILE_NAME));
        assert_eq!(cfg.refresh_ms, 60_000);
        // The malformed file is untouched.
        assert_eq!(std::fs::read_to_string(&broken).unwrap(), "{{not json");
    }

    #[test]
    fn wrong_typed_field_falls_through_like_malformed_content() {
        let primary = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        std::fs::write(
            primary.path().join(CONFIG_FILE_NAME),
            r#"{"refreshMs": "fast"}"#,
        )
        .unwrap();

        let (_, path) = resolve(&dirs_of(&[&primary, &fallback]), None);
        assert_eq!(path, fallback.path().join(CONFIG_FILE_NAME));
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_primary_falls_back_to_next_candidate() {
        use std::os::unix::fs::PermissionsExt;

        let primary = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        std::fs::set_permissions(primary.path(), std::fs::Permissions::from_mode(0o555)).unwrap();

        let (cfg, path) = resolve(&dirs_of(&[&primary, &fallback]), None);

        assert_eq!(path, fallback.path().join(CONFIG_FILE_NAME));
        assert_eq!(cfg.widget_width, 520);
        assert!(path.exists());

        std::fs::set_permissions(primary.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn every_candidate_failing_still_yields_usable_defaults() {
        use std::os::unix::fs::PermissionsExt;

        let primary = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        for dir in [&primary, &fallback] {
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
        }

        let (cfg, path) = resolve(&dirs_of(&[&primary, &fallback]), None);

        // Last attempted path, no file, but the config is fully normalized.
        assert_eq!(path, fallback.path().join(CONFIG_FILE_NAME));
        assert!(!path.exists());
        assert_eq!(cfg.refresh_ms, 60_000);
        assert!(cfg.user_id.starts_with("local-"));

        for dir in [&primary, &fallback] {
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolved_config_always_satisfies_every_bound() {
        let primary = tempfile::tempdir().unwrap();
        std::fs::write(
            primary.path().join(CONFIG_FILE_NAME),
            r#"{
                "productId": " ",
                "refreshMs": -5,
                "widgetWidth": 0,
                "manualCloseCooldownMs": 500000,
                "pulseMinIntervalMs": -1,
                "urgentFocusUnreadDelta": 99,
                "focusStealCooldownMs": 700000
            }"#,
        )
        .unwrap();

        let (cfg, _) = resolve(&dirs_of(&[&primary]), None);

        assert_eq!(cfg.product_id, crate::config::app_config::DEFAULT_PRODUCT_ID);
        assert_eq!(cfg.refresh_ms, 15_000);
        assert_eq!(cfg.widget_width, 520);
        assert_eq!(cfg.manual_close_cooldown_ms, 120_000);
        assert_eq!(cfg.pulse_min_interval_ms, 0);
        assert_eq!(cfg.urgent_focus_unread_delta, 50);
        assert_eq!(cfg.focus_steal_cooldown_ms, 600_000);
    }
}
