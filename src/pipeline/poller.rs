//! Timer-driven polling loop.
//!
//! Fetches the document on a fixed interval and re-runs the normalizer only
//! when the document actually changed: a cheap `lastUpdate` comparison where
//! both documents carry the field, deep JSON equality otherwise. A failed
//! fetch keeps the previous model and records a user-visible error; the loop
//! simply waits for the next tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::kpi;
use crate::normalizer;
use crate::pipeline::source::DocumentSource;
use crate::pipeline::state::AppState;
use crate::storage::{PreferenceStore, HIDDEN_WELLS_KEY};
use crate::types::{NormalizedModel, RawDocument};

/// Polls a [`DocumentSource`] and keeps [`AppState`] current.
pub struct Poller {
    source: Box<dyn DocumentSource>,
    interval: Duration,
    state: Arc<RwLock<AppState>>,
    prefs: Arc<dyn PreferenceStore>,
    /// Document from the last successful fetch, for change detection.
    last_document: Option<Value>,
}

impl Poller {
    pub fn new(
        source: Box<dyn DocumentSource>,
        interval: Duration,
        state: Arc<RwLock<AppState>>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            source,
            interval,
            state,
            prefs,
            last_document: None,
        }
    }

    /// Run until cancelled. The first fetch happens immediately; subsequent
    /// fetches follow the configured interval.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            source = self.source.source_name(),
            location = %self.source.location(),
            interval_secs = self.interval.as_secs(),
            "Poller started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("Poller stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }
    }

    /// One poll cycle. Errors never abort the loop.
    pub async fn poll_once(&mut self) {
        self.state.write().await.fetches += 1;

        let document = match self.source.fetch().await {
            Ok(document) => document,
            Err(error) => {
                self.record_error(&error).await;
                return;
            }
        };

        if !self.document_changed(&document) {
            debug!("Document unchanged — skipping refresh");
            return;
        }

        if let Err(error) = self.refresh(document).await {
            self.record_error(&error).await;
        }
    }

    /// Compare against the previously fetched document. `lastUpdate` is a
    /// monotonically-changing export timestamp, so a string comparison is
    /// enough when both sides carry it.
    fn document_changed(&self, document: &Value) -> bool {
        let Some(previous) = &self.last_document else {
            return true;
        };
        match (previous.get("lastUpdate"), document.get("lastUpdate")) {
            (Some(a), Some(b)) if a.is_string() && b.is_string() => a != b,
            _ => previous != document,
        }
    }

    async fn refresh(&mut self, document: Value) -> Result<()> {
        let raw: RawDocument =
            serde_json::from_value(document.clone()).context("Document shape is unusable")?;

        let model = normalizer::normalize(&raw);
        let summary = kpi::compute(&model);

        // Hidden-well preferences referencing wells that no longer exist
        // would otherwise accumulate across exports.
        if let Err(error) = self.prune_hidden_wells(&model) {
            warn!(error = %error, "Failed to prune hidden well preferences");
        }

        self.last_document = Some(document);

        let mut state = self.state.write().await;
        state.refreshes += 1;
        state.last_error = None;
        state.last_refresh = Some(Utc::now());
        info!(
            wells = model.wells.len(),
            stages = model.stage_count(),
            stock_items = model.stock.len(),
            "Dashboard model refreshed"
        );
        state.model = Some(model);
        state.kpi = Some(summary);
        Ok(())
    }

    fn prune_hidden_wells(
        &self,
        model: &NormalizedModel,
    ) -> Result<(), crate::storage::PreferenceError> {
        let hidden = self.prefs.load(HIDDEN_WELLS_KEY)?;
        let kept: Vec<String> = hidden
            .iter()
            .filter(|name| model.wells.iter().any(|well| &well.name == *name))
            .cloned()
            .collect();
        if kept.len() != hidden.len() {
            debug!(
                removed = hidden.len() - kept.len(),
                "Pruned hidden-well names absent from the current export"
            );
            self.prefs.save(HIDDEN_WELLS_KEY, &kept)?;
        }
        Ok(())
    }

    async fn record_error(&self, error: &anyhow::Error) {
        warn!(error = %error, "Data fetch failed — keeping previous model");
        let mut state = self.state.write().await;
        state.fetch_errors += 1;
        state.last_error = Some(format!("{error:#}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPrefs;
    use serde_json::json;

    /// Yields a scripted sequence of fetch results.
    struct ScriptedSource {
        results: std::vec::IntoIter<Result<Value>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<Value>>) -> Self {
            Self {
                results: results.into_iter(),
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentSource for ScriptedSource {
        async fn fetch(&mut self) -> Result<Value> {
            self.results
                .next()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }

        fn source_name(&self) -> &str {
            "scripted"
        }

        fn location(&self) -> String {
            "test".to_string()
        }
    }

    fn make_poller(results: Vec<Result<Value>>) -> (Poller, Arc<RwLock<AppState>>) {
        let state = Arc::new(RwLock::new(AppState::default()));
        let poller = Poller::new(
            Box::new(ScriptedSource::new(results)),
            Duration::from_secs(60),
            state.clone(),
            Arc::new(InMemoryPrefs::new()),
        );
        (poller, state)
    }

    fn sample_document(last_update: &str) -> Value {
        json!({
            "items": [
                {"FechaFracPozo1": "Lca-3001(h)"},
                {},
                {"Fila": "1", "TPNPozo1": 2500, "FechaFracPozo1": 44927}
            ],
            "stock": [],
            "lastUpdate": last_update
        })
    }

    #[tokio::test]
    async fn test_first_poll_populates_state() {
        let (mut poller, state) = make_poller(vec![Ok(sample_document("t1"))]);
        poller.poll_once().await;

        let state = state.read().await;
        assert_eq!(state.fetches, 1);
        assert_eq!(state.refreshes, 1);
        assert!(state.last_error.is_none());
        let model = state.model.as_ref().unwrap();
        assert_eq!(model.wells[0].name, "Lca-3001(h)");
        assert_eq!(model.stage_count(), 6);
        assert!(state.kpi.is_some());
    }

    #[tokio::test]
    async fn test_unchanged_document_skips_refresh() {
        let (mut poller, state) = make_poller(vec![
            Ok(sample_document("t1")),
            Ok(sample_document("t1")),
        ]);
        poller.poll_once().await;
        poller.poll_once().await;

        let state = state.read().await;
        assert_eq!(state.fetches, 2);
        assert_eq!(state.refreshes, 1);
    }

    #[tokio::test]
    async fn test_last_update_change_triggers_refresh() {
        let (mut poller, state) = make_poller(vec![
            Ok(sample_document("t1")),
            Ok(sample_document("t2")),
        ]);
        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(state.read().await.refreshes, 2);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_model() {
        let (mut poller, state) = make_poller(vec![
            Ok(sample_document("t1")),
            Err(anyhow::anyhow!("connection refused")),
        ]);
        poller.poll_once().await;
        poller.poll_once().await;

        let state = state.read().await;
        assert_eq!(state.fetch_errors, 1);
        assert!(state.model.is_some());
        assert!(state
            .last_error
            .as_ref()
            .is_some_and(|e| e.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_error_cleared_on_next_refresh() {
        let (mut poller, state) = make_poller(vec![
            Err(anyhow::anyhow!("boom")),
            Ok(sample_document("t1")),
        ]);
        poller.poll_once().await;
        assert!(state.read().await.last_error.is_some());

        poller.poll_once().await;
        let state = state.read().await;
        assert!(state.last_error.is_none());
        assert!(state.model.is_some());
    }

    #[tokio::test]
    async fn test_stale_hidden_wells_pruned_on_refresh() {
        let prefs = Arc::new(InMemoryPrefs::new());
        prefs
            .save(
                HIDDEN_WELLS_KEY,
                &["Lca-3001(h)".to_string(), "Gone-Well".to_string()],
            )
            .unwrap();

        let state = Arc::new(RwLock::new(AppState::default()));
        let mut poller = Poller::new(
            Box::new(ScriptedSource::new(vec![Ok(sample_document("t1"))])),
            Duration::from_secs(60),
            state,
            prefs.clone(),
        );
        poller.poll_once().await;

        assert_eq!(prefs.load(HIDDEN_WELLS_KEY).unwrap(), vec!["Lca-3001(h)"]);
    }
}
