use std::fs;
use std::path::PathBuf;

use crate::cfg::AppSettings;

fn config_dir(name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hradmin-settings-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    for (file, content) in files {
        fs::write(dir.join(file), content).unwrap();
    }
    dir
}

#[test]
fn test_defaults_are_valid() {
    let settings = AppSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.reports.max_preview_rows, 500);
}

#[test]
fn test_files_layer_in_order() {
    let dir = config_dir(
        "layers",
        &[
            ("configs.default.toml", "[reports]\nmax_preview_rows = 25\n\n[integrations]\nconnection_test_delay_ms = 0\n"),
            ("configs.staging.toml", "[reports]\ndefault_seed = \"staging\"\n"),
            ("configs.local.toml", "[reports]\nmax_preview_rows = 10\n"),
        ],
    );

    let settings = AppSettings::load_from(&dir, "staging").unwrap();

    assert_eq!(settings.reports.max_preview_rows, 10);
    assert_eq!(settings.reports.default_seed, "staging");
    assert_eq!(settings.integrations.connection_test_delay_ms, 0);
    assert_eq!(settings.database.max_connections, 5);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_files_for_other_environments_are_ignored() {
    let dir = config_dir("other-env", &[("configs.staging.toml", "[reports]\ndefault_seed = \"staging\"\n")]);

    let settings = AppSettings::load_from(&dir, "development").unwrap();

    assert_eq!(settings.reports.default_seed, "preview");
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_unusable_values_are_rejected() {
    let dir = config_dir("invalid", &[("configs.default.toml", "[reports]\nmax_preview_rows = 0\n")]);

    let error = AppSettings::load_from(&dir, "production").unwrap_err();

    assert!(error.to_string().contains("max_preview_rows"));
    fs::remove_dir_all(dir).ok();
}
