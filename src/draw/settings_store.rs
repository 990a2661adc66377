use crate::draw::settings::SketchSettings;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "sketch_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads settings from `path` (or the file next to the executable) and applies
/// environment overrides.
pub fn load(path: Option<&Path>) -> Result<SketchSettings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => resolve_settings_path()?,
    };
    let mut settings = load_from_path(&path)?;
    settings.apply_env_overrides();
    Ok(settings)
}

pub fn save(path: &Path, settings: &SketchSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings parent folder {}", parent.display()))?;
    }

    let mut sanitized = settings.clone();
    sanitized.sanitize();
    let json = serde_json::to_string_pretty(&sanitized).context("serialize sketch settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write settings file {}", path.display()))
}

fn load_from_path(path: &Path) -> Result<SketchSettings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(SketchSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(SketchSettings::default());
    }

    let mut loaded: SketchSettings = serde_json::from_str(&content)
        .with_context(|| format!("deserialize settings file {}", path.display()))?;
    loaded.sanitize();
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::model::Color;

    #[test]
    fn settings_path_is_resolved_next_to_executable() {
        let exe = Path::new("/tmp/sketch/bin/sketch_calc");
        let path = settings_path_from_exe_path(exe).expect("path");
        assert_eq!(path, Path::new("/tmp/sketch/bin").join(SETTINGS_FILE_NAME));
    }

    #[test]
    fn missing_and_empty_files_yield_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        assert_eq!(
            load_from_path(&path).expect("missing"),
            SketchSettings::default()
        );

        std::fs::write(&path, "  \n").expect("write empty");
        assert_eq!(
            load_from_path(&path).expect("empty"),
            SketchSettings::default()
        );
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let mut settings = SketchSettings::default();
        settings.line_width = 6;
        settings.stroke_color = Color::rgb(250, 176, 5);
        settings.reveal_delay_ms = 250;

        save(&path, &settings).expect("save");
        assert_eq!(load_from_path(&path).expect("load"), settings);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write");
        let err = load_from_path(&path).expect_err("malformed");
        assert!(format!("{err:#}").contains(SETTINGS_FILE_NAME));
    }
}
