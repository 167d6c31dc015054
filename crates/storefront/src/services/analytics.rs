//! Background activity sink.
//!
//! Handlers record activity (page views, searches, served rates) by
//! pushing events onto a bounded channel and moving on; a single worker
//! task drains the channel, writes each event to the structured log, and
//! maintains the counters behind the stats endpoint. The request path is
//! never coupled to the sink: a saturated queue drops the event with a
//! warning rather than waiting.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::rates::RateSource;

/// An activity event flowing into the sink.
#[derive(Debug, Clone)]
pub enum ActivityEvent {
    /// A client-reported event from `POST /api/analytics/log`.
    Client {
        event_type: String,
        details: Option<serde_json::Value>,
        ip: Option<String>,
    },
    /// A gold-rates response was served.
    RateServed { source: RateSource },
    /// A catalog search ran.
    Search {
        query: Option<String>,
        results: usize,
    },
}

/// Counter snapshot served by `GET /api/analytics/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_views: u64,
    pub unique_visitors: u64,
}

#[derive(Default)]
struct Counters {
    total_events: u64,
    total_views: u64,
    rates_served: u64,
    searches: u64,
    visitors: HashSet<String>,
}

/// Handle to the activity sink. Cheaply cloneable.
#[derive(Clone)]
pub struct ActivitySink {
    tx: mpsc::Sender<ActivityEvent>,
    counters: Arc<RwLock<Counters>>,
}

impl ActivitySink {
    /// Create the sink and spawn its worker task on the current runtime.
    #[must_use]
    pub fn spawn(capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ActivityEvent>(capacity);
        let counters = Arc::new(RwLock::new(Counters::default()));

        let worker_counters = Arc::clone(&counters);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                log_event(&event);
                if let Ok(mut counters) = worker_counters.write() {
                    apply(&mut counters, &event);
                }
            }
            tracing::debug!("activity sink worker stopped");
        });

        Self { tx, counters }
    }

    /// Queue an event without waiting.
    ///
    /// Dropping on a full queue is deliberate: activity logging must never
    /// slow down or fail a request.
    pub fn dispatch(&self, event: ActivityEvent) {
        if let Err(err) = self.tx.try_send(event) {
            tracing::warn!(error = %err, "activity sink full, dropping event");
        }
    }

    /// Snapshot of the public counters.
    #[must_use]
    pub fn stats(&self) -> ActivityStats {
        self.counters.read().map_or_else(
            |_| ActivityStats::default(),
            |counters| ActivityStats {
                total_views: counters.total_views,
                unique_visitors: counters.visitors.len() as u64,
            },
        )
    }
}

fn log_event(event: &ActivityEvent) {
    match event {
        ActivityEvent::Client {
            event_type,
            details,
            ip,
        } => {
            tracing::info!(
                event_type = %event_type,
                details = ?details,
                ip = ?ip,
                "client activity"
            );
        }
        ActivityEvent::RateServed { source } => {
            tracing::info!(source = ?source, "gold rates served");
        }
        ActivityEvent::Search { query, results } => {
            tracing::info!(query = ?query, results, "catalog search");
        }
    }
}

fn apply(counters: &mut Counters, event: &ActivityEvent) {
    counters.total_events += 1;
    match event {
        ActivityEvent::Client { ip, .. } => {
            counters.total_views += 1;
            if let Some(ip) = ip {
                counters.visitors.insert(ip.clone());
            }
        }
        ActivityEvent::RateServed { .. } => counters.rates_served += 1,
        ActivityEvent::Search { .. } => counters.searches += 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client_event(ip: &str) -> ActivityEvent {
        ActivityEvent::Client {
            event_type: "page_view".to_string(),
            details: None,
            ip: Some(ip.to_string()),
        }
    }

    #[test]
    fn test_counters_track_views_and_unique_visitors() {
        let mut counters = Counters::default();
        apply(&mut counters, &client_event("10.0.0.1"));
        apply(&mut counters, &client_event("10.0.0.1"));
        apply(&mut counters, &client_event("10.0.0.2"));
        apply(
            &mut counters,
            &ActivityEvent::Search {
                query: Some("bangle".to_string()),
                results: 1,
            },
        );

        assert_eq!(counters.total_events, 4);
        assert_eq!(counters.total_views, 3);
        assert_eq!(counters.visitors.len(), 2);
        assert_eq!(counters.searches, 1);
        assert_eq!(counters.rates_served, 0);
    }

    #[test]
    fn test_client_event_without_ip_counts_as_view() {
        let mut counters = Counters::default();
        apply(
            &mut counters,
            &ActivityEvent::Client {
                event_type: "add_to_wishlist".to_string(),
                details: None,
                ip: None,
            },
        );
        assert_eq!(counters.total_views, 1);
        assert!(counters.visitors.is_empty());
    }

    #[tokio::test]
    async fn test_sink_aggregates_dispatched_events() {
        let sink = ActivitySink::spawn(16);
        sink.dispatch(client_event("10.0.0.1"));
        sink.dispatch(client_event("10.0.0.2"));
        sink.dispatch(ActivityEvent::RateServed {
            source: RateSource::FallbackMock,
        });

        // Give the worker task a moment to drain the channel
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let stats = sink.stats();
        assert_eq!(stats.total_views, 2);
        assert_eq!(stats.unique_visitors, 2);
    }

    #[test]
    fn test_stats_serializes_camel_case() {
        let stats = ActivityStats {
            total_views: 7,
            unique_visitors: 3,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalViews"], 7);
        assert_eq!(json["uniqueVisitors"], 3);
    }
}
