//! Display theme (light/dark) used to pick toolbar icon variants.
//!
//! The theme is set by `colorScheme` messages from pages and, optionally, by a
//! best-effort native query at startup. The query runs on its own task and
//! applies its answer whenever it arrives; failure keeps the default theme.

use std::process::Stdio;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::{THEME_PROBE_ARGS, THEME_PROBE_PROGRAM, THEME_PROBE_TIMEOUT};
use crate::error_handling::{EventStats, FailureKind, ThemeProbeError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Theme shared between the event handler and the startup probe task.
#[derive(Debug, Clone, Default)]
pub struct SharedTheme(Arc<RwLock<Theme>>);

impl SharedTheme {
    pub fn get(&self) -> Theme {
        // A poisoned lock still holds a valid Theme
        match self.0.read() {
            Ok(theme) => *theme,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Stores `theme`; returns whether it changed.
    pub fn set(&self, theme: Theme) -> bool {
        let mut guard = match self.0.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let changed = *guard != theme;
        *guard = theme;
        changed
    }
}

/// Asks the OS for its appearance setting.
pub async fn probe_system_theme() -> Result<Theme, ThemeProbeError> {
    probe_theme_with(THEME_PROBE_PROGRAM, THEME_PROBE_ARGS, THEME_PROBE_TIMEOUT).await
}

/// Runs `program` and reads `Dark` from its stdout.
///
/// A non-zero exit means the setting is unset, which is light mode.
pub async fn probe_theme_with(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Theme, ThemeProbeError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| ThemeProbeError::Timeout(timeout))??;

    if !output.status.success() {
        return Ok(Theme::Light);
    }
    let answer = String::from_utf8_lossy(&output.stdout);
    Ok(Theme::from_is_dark(answer.trim().eq_ignore_ascii_case("dark")))
}

/// Spawns the startup probe. Errors are logged and counted, never propagated.
pub fn spawn_theme_probe(theme: SharedTheme, stats: Arc<EventStats>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match probe_system_theme().await {
            Ok(probed) => {
                log::debug!("System theme: {}", probed.as_str());
                theme.set(probed);
            }
            Err(e) => {
                log::debug!("Theme probe failed, keeping {}: {e}", theme.get().as_str());
                stats.increment_failure(FailureKind::ThemeProbeFailed);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_theme_defaults_to_light() {
        let theme = SharedTheme::default();
        assert_eq!(theme.get(), Theme::Light);
        assert!(theme.set(Theme::Dark));
        assert!(!theme.set(Theme::Dark));
        assert_eq!(theme.clone().get(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_probe_reads_dark_from_stdout() {
        let theme = probe_theme_with("echo", &["Dark"], Duration::from_secs(5))
            .await
            .expect("echo should run");
        assert_eq!(theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_probe_non_zero_exit_means_light() {
        let theme = probe_theme_with("false", &[], Duration::from_secs(5))
            .await
            .expect("false should run");
        assert_eq!(theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_probe_missing_program_is_an_error() {
        let result =
            probe_theme_with("cdn-cache-status-no-such-program", &[], Duration::from_secs(5))
                .await;
        assert!(matches!(result, Err(ThemeProbeError::Spawn(_))));
    }
}
