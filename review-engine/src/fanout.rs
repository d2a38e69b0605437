//! Bounded-concurrency fan-out over independent units (files).
//!
//! - At most `limit` units run at once; the rest wait in submission order.
//! - Each unit's failure (error or panic) is captured in its own outcome and
//!   never cancels siblings.
//! - Outcomes come back in submission order.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::errors::Error;

/// Result of one fanned-out unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome<T> {
    Done(T),
    Failed { label: String, error: String },
}

impl<T> UnitOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            UnitOutcome::Done(v) => Some(v),
            UnitOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UnitOutcome::Failed { .. })
    }
}

/// Run labelled units with at most `limit` in flight.
pub async fn run_bounded<I, Fut, T, E>(limit: usize, units: I) -> Vec<UnitOutcome<T>>
where
    I: IntoIterator<Item = (String, Fut)>,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let sem = Arc::new(Semaphore::new(limit.max(1)));
    let mut handles = Vec::new();

    for (label, fut) in units {
        // Permits are taken here, in order, so queued units start FIFO.
        // The semaphore is local and never closed.
        let Ok(permit) = sem.clone().acquire_owned().await else {
            break;
        };
        let handle = tokio::spawn(async move {
            let _permit = permit;
            fut.await.map_err(|e| e.to_string())
        });
        handles.push((label, handle));
    }

    let mut out = Vec::with_capacity(handles.len());
    for (label, handle) in handles {
        let outcome = match handle.await {
            Ok(Ok(v)) => UnitOutcome::Done(v),
            Ok(Err(error)) => {
                warn!("fanout: {} failed: {}", label, error);
                UnitOutcome::Failed { label, error }
            }
            Err(join) => {
                let error = Error::from(join).to_string();
                warn!("fanout: {} aborted: {}", label, error);
                UnitOutcome::Failed { label, error }
            }
        };
        out.push(outcome);
    }

    debug!(
        "fanout: {} units, {} failed",
        out.len(),
        out.iter().filter(|o| o.is_failed()).count()
    );
    out
}
