//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a test-writer subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .try_init();
}

pub const CUSTOM_BLOOD_TEST: &str = r#"{
    "_info": {"name": "Custom blood panel"},
    "hemoglobin": {
        "name_ru": "Гемоглобин",
        "male": [
            {"age_min": 18, "age_max": 150, "min": 140, "max": 180, "unit": "g/L"}
        ]
    }
}"#;

/// A directory holding `files` as `(name, content)` pairs.
pub fn reference_dir(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, content) in files {
        write(tmp.path(), name, content);
    }
    tmp
}

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}
