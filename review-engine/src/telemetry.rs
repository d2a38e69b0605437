//! Library-scoped tracing layer for review-engine.
//!
//! `review_diff` and every per-file plan run inside a span; the layer prints
//! one `close` line per span with its busy/idle time, so a slow file shows
//! up without extra timing code.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "review_engine";

/// RFC3339 UTC timer via `chrono`, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Compact fmt layer on stdout that renders only events from this crate.
///
/// Compose it in the binary next to the global subscriber; other crates'
/// events are left to their own layers.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    layer_to(io::stdout, io::stdout().is_terminal())
}

/// Same layer over any writer.
pub fn layer_to<S, W>(writer: W, ansi: bool) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let only_this_crate = filter::filter_fn(|meta| meta.target().starts_with(TARGET_PREFIX));

    fmt::layer()
        .with_writer(writer)
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_ansi(ansi)
        .with_span_events(FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate)
}

/// `review_engine=<level>` directive.
pub fn level_directive(level: Level) -> Result<Directive, ParseError> {
    format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase()).parse()
}

/// `RUST_LOG` (or `default`) plus a per-crate level for review-engine.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match level_directive(level) {
        Ok(d) => base.add_directive(d),
        Err(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    use crate::budget::ApproxTokenCounter;
    use crate::config::ReviewOptions;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn review_run_closes_timed_spans() {
        let out = Captured::default();
        let subscriber = tracing_subscriber::registry().with(layer_to(out.clone(), false));
        tracing::subscriber::with_default(subscriber, || {
            crate::review_diff(
                "@@ -1 +1 @@\n-a\n+b\n",
                &ReviewOptions::default(),
                &ApproxTokenCounter,
                "",
            );
            tracing::info!(target: "other_crate", "not ours");
        });

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("review_diff"), "{text}");
        assert!(text.contains("plan_file_review"), "{text}");
        assert!(text.contains("time.busy"), "{text}");
        assert!(!text.contains("not ours"), "{text}");
    }

    #[test]
    fn directive_targets_this_crate() {
        let d = level_directive(Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "review_engine=debug");
    }
}
