//! cdn_cache_status library: CDN fingerprinting and per-tab cache status tracking
//!
//! This library classifies HTTP responses by CDN provider and normalized cache
//! status (`HIT`, `MISS`, `EXPIRED`, ...) and tracks, per browser tab, which
//! response is the main-document response: navigation start clears the tab,
//! the first main-frame response classifies it, navigation complete either
//! refreshes the final URL or flags that no response was observed.
//!
//! # Example
//!
//! ```
//! use cdn_cache_status::{classify, CacheStatus, CdnId, HeaderSet};
//!
//! let headers = HeaderSet::from_pairs([("CF-Cache-Status", "expired"), ("CF-Ray", "1-FRA")]);
//! let classification = classify(&headers);
//! assert_eq!(classification.cdn, Some(CdnId::Cloudflare));
//! assert_eq!(classification.status, Some(CacheStatus::Expired));
//! ```
//!
//! The `run_replay` entry point feeds a JSON-lines stream of browser events
//! through a [`BackgroundService`] and requires a Tokio runtime.

pub mod badge;
pub mod config;
pub mod display;
mod error_handling;
pub mod events;
pub mod fingerprint;
pub mod initialization;
pub mod observer;
pub mod service;
pub mod session;
pub mod theme;

// Re-export public API
pub use badge::{apply_badge, BadgeScope, BadgeSink, BadgeState, IconKind, LogBadgeSink};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    BadgeError, ChannelError, EventError, EventKind, EventStats, FailureKind,
    InitializationError, ThemeProbeError,
};
pub use events::{InboundEvent, MessageReply, RequestType, RuntimeMessage};
pub use fingerprint::{
    cdn_display_name, classify, detect_cdn, parse_cache_status, CacheStatus, CdnId, CdnRule,
    Classification, Detector, HeaderSet, StatusParser, StatusRule, CDN_RULES,
};
pub use observer::{ObserverHub, ObserverMessage, SubscriptionId};
pub use run::{replay, run_replay, ReplayReport};
pub use service::{BackgroundService, EventOutcome, Subscription};
pub use session::{
    FrameId, PendingNavigation, PerformanceMetrics, SessionRegistry, TabId, TabSession, TabState,
    Transition, WindowId, MAIN_FRAME_ID,
};
pub use theme::{SharedTheme, Theme};

// Internal run module (contains the replay driver)
mod run {
    use std::collections::HashMap;
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::{info, warn};
    use serde::Serialize;
    use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

    use crate::badge::LogBadgeSink;
    use crate::config::Config;
    use crate::error_handling::{log_event_statistics, EventStats, FailureKind};
    use crate::events::{InboundEvent, MessageReply};
    use crate::observer::ObserverMessage;
    use crate::service::{BackgroundService, EventOutcome, Subscription};
    use crate::session::TabId;
    use crate::theme::{spawn_theme_probe, SharedTheme};

    /// Results of a replay run.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ReplayReport {
        /// Events decoded and handled
        pub events: usize,
        /// Lines that were not valid events
        pub malformed: usize,
        /// Tabs holding a session when the stream ended
        pub sessions: usize,
        /// Observer updates written to the output
        pub pushes: usize,
    }

    /// One line of replay output.
    #[derive(Serialize)]
    #[serde(untagged)]
    enum OutputLine<'a> {
        Reply(&'a MessageReply),
        Push(PushLine<'a>),
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct PushLine<'a> {
        tab_id: TabId,
        #[serde(flatten)]
        message: &'a ObserverMessage,
    }

    /// Replays the event stream named by `config.file` (`-` for stdin) and
    /// writes replies and observer updates to stdout, one JSON object per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or read, or stdout cannot
    /// be written. Malformed event lines are logged and counted, never fatal.
    pub async fn run_replay(config: Config) -> Result<ReplayReport> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = if config.file.as_os_str() == "-" {
            info!("Reading events from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        } else {
            let file = tokio::fs::File::open(&config.file)
                .await
                .with_context(|| format!("Failed to open {}", config.file.display()))?;
            info!("Reading events from {}", config.file.display());
            Box::new(BufReader::new(file))
        };

        let mut stdout = tokio::io::stdout();
        replay(&config, reader, &mut stdout).await
    }

    /// Replays events from `reader`, writing output lines to `out`.
    pub async fn replay<R, W>(config: &Config, reader: R, out: &mut W) -> Result<ReplayReport>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let stats = Arc::new(EventStats::new());
        let theme = SharedTheme::default();
        let probe = config
            .probe_theme
            .then(|| spawn_theme_probe(theme.clone(), Arc::clone(&stats)));

        let mut service = BackgroundService::new(
            Box::new(LogBadgeSink::new(config.per_tab_badges)),
            config.per_tab_badges,
            theme,
            Arc::clone(&stats),
        );
        let mut subscriptions: HashMap<TabId, Subscription> = HashMap::new();
        let mut report = ReplayReport::default();

        let mut lines = reader.lines();
        let mut line_number = 0;
        while let Some(line) = lines.next_line().await.context("Failed to read event")? {
            line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = match InboundEvent::from_json_line(line, line_number) {
                Ok(event) => event,
                Err(e) => {
                    warn!("{e}");
                    stats.increment_failure(FailureKind::MalformedEvent);
                    report.malformed += 1;
                    continue;
                }
            };
            report.events += 1;

            let disconnected = match &event {
                InboundEvent::Disconnect { tab_id } | InboundEvent::TabClosed { tab_id } => {
                    Some(*tab_id)
                }
                _ => None,
            };

            match service.handle_event(event) {
                Some(EventOutcome::Reply(reply)) => {
                    write_line(out, &OutputLine::Reply(&reply)).await?;
                }
                Some(EventOutcome::Subscribed(subscription)) => {
                    subscriptions.insert(subscription.tab_id, subscription);
                }
                None => {}
            }

            report.pushes += drain_pushes(&mut subscriptions, out).await?;
            if let Some(tab_id) = disconnected {
                subscriptions.remove(&tab_id);
            }
        }

        if let Some(probe) = probe {
            probe.abort();
        }
        out.flush().await.context("Failed to flush output")?;

        report.sessions = service.registry().len();
        info!(
            "Replayed {} event{} ({} malformed), {} tab{} with data",
            report.events,
            if report.events == 1 { "" } else { "s" },
            report.malformed,
            report.sessions,
            if report.sessions == 1 { "" } else { "s" }
        );
        log_event_statistics(&stats);
        service.shutdown();

        Ok(report)
    }

    async fn drain_pushes<W>(
        subscriptions: &mut HashMap<TabId, Subscription>,
        out: &mut W,
    ) -> Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0;
        let mut tabs: Vec<TabId> = subscriptions.keys().copied().collect();
        tabs.sort_unstable();
        for tab_id in tabs {
            let Some(subscription) = subscriptions.get_mut(&tab_id) else {
                continue;
            };
            while let Ok(message) = subscription.receiver.try_recv() {
                let line = OutputLine::Push(PushLine {
                    tab_id,
                    message: &message,
                });
                write_line(out, &line).await?;
                written += 1;
            }
        }
        Ok(written)
    }

    async fn write_line<W>(out: &mut W, line: &OutputLine<'_>) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut json = serde_json::to_string(line).context("Failed to encode output line")?;
        json.push('\n');
        out.write_all(json.as_bytes())
            .await
            .context("Failed to write output")
    }
}
