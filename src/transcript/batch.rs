//! Concurrent transcript retrieval for several videos.
//!
//! Every input gets exactly one entry in the resulting [`TranscriptBatch`]: a fetched
//! transcript, or a failure carrying the reason. One task is spawned per input with no
//! concurrency cap, so callers are expected to pass small batches (a page of videos).

use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{TranscriptOutcome, TranscriptSource};
use crate::resolver::resolve_video_input;

/// Transcripts keyed by video id (or by the raw input when no id could be derived)
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptBatch {
    entries: HashMap<String, TranscriptOutcome>,
}

impl TranscriptBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TranscriptOutcome> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TranscriptOutcome)> {
        self.entries.iter()
    }

    /// Entries whose fetch failed
    pub fn failures(&self) -> impl Iterator<Item = (&String, &TranscriptOutcome)> {
        self.entries.iter().filter(|(_, outcome)| outcome.is_failure())
    }

    /// Whether every input has an entry, under its video id or its raw form
    pub fn covers<S: AsRef<str>>(&self, inputs: &[S]) -> bool {
        inputs.iter().all(|input| {
            let input = input.as_ref();
            let key = resolve_video_input(input).unwrap_or_else(|_| input.to_string());
            self.entries.contains_key(&key)
        })
    }

    fn insert(&mut self, key: String, outcome: TranscriptOutcome) {
        self.entries.insert(key, outcome);
    }
}

impl IntoIterator for TranscriptBatch {
    type Item = (String, TranscriptOutcome);
    type IntoIter = std::collections::hash_map::IntoIter<String, TranscriptOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

enum Unit {
    Running(JoinHandle<TranscriptOutcome>),
    Rejected(TranscriptOutcome),
}

/// Fetch transcripts for all inputs concurrently and wait for every one to finish.
///
/// Inputs may be video URLs or bare ids. No join timeout is applied; each individual
/// request is bounded by the source's own timeout.
pub async fn fetch_all<S: AsRef<str>>(source: Arc<dyn TranscriptSource>, inputs: &[S]) -> TranscriptBatch {
    let units: Vec<(String, Unit)> = inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            match resolve_video_input(input) {
                Ok(video_id) => {
                    let source = Arc::clone(&source);
                    let task_id = video_id.clone();
                    let handle = tokio::spawn(async move { source.fetch(&task_id).await });
                    (video_id, Unit::Running(handle))
                }
                Err(err) => {
                    tracing::warn!("Skipping transcript fetch for {}: {}", input, err);
                    (input.to_string(), Unit::Rejected(TranscriptOutcome::failed(err.to_string())))
                }
            }
        })
        .collect();

    tracing::info!("Fetching {} transcripts concurrently", units.len());

    let finished = join_all(units.into_iter().map(|(key, unit)| async move {
        let outcome = match unit {
            Unit::Running(handle) => handle.await.unwrap_or_else(|err| {
                tracing::warn!("Transcript task for {} did not complete: {}", key, err);
                TranscriptOutcome::failed(format!("transcript task did not complete: {}", err))
            }),
            Unit::Rejected(outcome) => outcome,
        };
        (key, outcome)
    }))
    .await;

    let mut batch = TranscriptBatch::default();
    for (key, outcome) in finished {
        batch.insert(key, outcome);
    }

    tracing::info!(
        "Transcript batch complete: {} entries, {} failed",
        batch.len(),
        batch.failures().count()
    );
    batch
}
