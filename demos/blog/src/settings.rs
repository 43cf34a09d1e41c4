//! Settings loading for the blog.
//!
//! A config file is optional. TOML and JSON are chosen by extension and
//! `VIEWCRAFT_*` environment variables override either.

use std::path::Path;

use viewcraft_core::settings_loader;
use viewcraft_core::{Settings, ViewcraftResult};

/// Loads settings from `path` if given, else from the environment alone.
pub fn load_settings(path: Option<&Path>) -> ViewcraftResult<Settings> {
    let Some(path) = path else {
        return Ok(settings_loader::from_env());
    };
    let mut settings = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => settings_loader::from_json_file(path)?,
        _ => settings_loader::from_toml_file(path)?,
    };
    settings_loader::apply_env_overrides(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_per_page = 4\nsearch_param = \"search\"").unwrap();
        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.default_per_page, 4);
        assert_eq!(settings.search_param, "search");
        assert_eq!(settings.page_param, "page");
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"visible_pages": 3}}"#).unwrap();
        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.visible_pages, 3);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_settings(Some(Path::new("/nonexistent/blog.toml"))).is_err());
    }
}
