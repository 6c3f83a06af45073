//! Rolling per-subject conversation transcripts.
//!
//! Each subject (typically a patient reference) owns one plain-text blob at
//! `{namespace}/{subject}.txt`. Appends load the whole transcript, add one
//! formatted entry, trim the oldest content past the character cap and
//! overwrite the blob.
//!
//! The log is best effort. `load` and `append` never fail: errors are logged
//! and turned into an empty transcript or a dropped entry, so a storage
//! outage cannot break the chat exchange being recorded. The `try_*`
//! variants expose the underlying `Result` for callers that care.

mod entry;
mod error;
mod lock;
mod trim;

pub use entry::{
    ENTRY_DELIMITER, HistoryEntry, ParsedEntry, REQUESTER_LABEL, RESPONDER_LABEL,
    TIMESTAMP_FORMAT, parse_transcript,
};
pub use error::{HistoryError, Result};
pub use lock::{SubjectGuard, SubjectLocks};
pub use trim::trim_transcript;

use crate::config::HistoryConfig;
use carelog_traits::{BlobStore, UploadOptions};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

const TRANSCRIPT_EXTENSION: &str = ".txt";
const TRANSCRIPT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Source of entry timestamps, in local wall-clock time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

fn local_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Result of a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppendOutcome {
    /// Transcript length after the append, in characters
    pub length: usize,
    /// Whether older content was dropped to honor the cap
    pub trimmed: bool,
}

#[derive(Clone)]
pub struct RollingHistoryLog {
    store: Arc<dyn BlobStore>,
    config: HistoryConfig,
    clock: Clock,
    locks: Arc<SubjectLocks>,
}

impl std::fmt::Debug for RollingHistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingHistoryLog")
            .field("config", &self.config)
            .field("active_locks", &self.locks.active())
            .finish_non_exhaustive()
    }
}

impl RollingHistoryLog {
    pub fn new(store: Arc<dyn BlobStore>, config: HistoryConfig) -> Self {
        Self {
            store,
            config,
            clock: local_clock(),
            locks: Arc::new(SubjectLocks::new()),
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Blob path for a subject: `{namespace}/{subject}.txt`.
    pub fn storage_path(&self, subject: &str) -> Result<String> {
        validate_subject(subject)?;
        Ok(format!(
            "{}/{}{}",
            self.config.namespace, subject, TRANSCRIPT_EXTENSION
        ))
    }

    /// Read the transcript, treating a missing blob as empty.
    pub async fn try_load(&self, subject: &str) -> Result<String> {
        let path = self.storage_path(subject)?;
        self.read_transcript(&path).await
    }

    /// Read the transcript. Any failure yields an empty string.
    pub async fn load(&self, subject: &str) -> String {
        match self.try_load(subject).await {
            Ok(text) => text,
            Err(e) => {
                warn!(subject, error = %e, "Failed to load AI history");
                String::new()
            }
        }
    }

    /// Append one exchange, enforcing the size cap.
    ///
    /// A read failure other than a missing blob aborts the append instead of
    /// overwriting the stored transcript with the new entry alone.
    pub async fn try_append(
        &self,
        subject: &str,
        requester: &str,
        responder: &str,
    ) -> Result<AppendOutcome> {
        let path = self.storage_path(subject)?;
        let _guard = if self.config.serialize_appends {
            Some(self.locks.acquire(subject).await)
        } else {
            None
        };

        let mut transcript = self.read_transcript(&path).await?;
        let entry = HistoryEntry::new((self.clock)(), requester, responder);
        transcript.push_str(&entry.format());

        let capped = trim_transcript(&transcript, self.config.max_length);
        let trimmed = capped.len() != transcript.len();
        let outcome = AppendOutcome {
            length: capped.chars().count(),
            trimmed,
        };

        self.store
            .upload(
                &self.config.bucket,
                &path,
                capped.as_bytes(),
                UploadOptions::upsert().with_content_type(TRANSCRIPT_CONTENT_TYPE),
            )
            .await?;

        debug!(
            subject,
            path = %path,
            length = outcome.length,
            trimmed,
            "Appended AI history entry"
        );
        Ok(outcome)
    }

    /// Append one exchange. Failures are logged and swallowed.
    pub async fn append(&self, subject: &str, requester: &str, responder: &str) {
        if let Err(e) = self.try_append(subject, requester, responder).await {
            error!(subject, error = %e, "Failed to save AI history");
        }
    }

    /// Parsed view of a subject's transcript.
    pub async fn entries(&self, subject: &str) -> Result<Vec<ParsedEntry>> {
        let text = self.try_load(subject).await?;
        Ok(parse_transcript(&text))
    }

    /// Subjects that currently have a transcript blob, sorted.
    pub async fn subjects(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.config.namespace);
        let paths = self.store.list(&self.config.bucket, &prefix).await?;
        Ok(paths
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter_map(|name| name.strip_suffix(TRANSCRIPT_EXTENSION))
            .filter(|name| !name.contains('/'))
            .map(str::to_string)
            .collect())
    }

    async fn read_transcript(&self, path: &str) -> Result<String> {
        match self.store.download(&self.config.bucket, path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.is_not_found() => {
                debug!(path, "No AI history yet");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() || subject.contains('/') || subject.contains('\\') {
        return Err(HistoryError::InvalidSubject(subject.to_string()));
    }
    Ok(())
}
