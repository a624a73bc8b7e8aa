// Copyright (c) 2026 rezky_nightky

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_PATH_ENV: &str = "RAINSTORM_LOG";
const DEFAULT_FILTER: &str = "rainstorm=info";

/// Installs a file-backed subscriber when `RAINSTORM_LOG` names a path.
///
/// The screen belongs to the animation, so nothing is ever logged to the
/// terminal. Returns the path in use, if any.
pub fn init_from_env() -> std::io::Result<Option<String>> {
    let Some(path) = std::env::var_os(LOG_PATH_ENV) else {
        return Ok(None);
    };
    if path.is_empty() {
        return Ok(None);
    }
    let path = Path::new(&path);
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(path.display().to_string()))
}
