//! Summary of one reconciliation pass.

use tracing::info;

/// What a run saw and did. Ids are destination-calendar event ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub destination_seen: usize,
    pub source_seen: usize,
    /// Distinct destination events recognized as placeholders before any writes
    pub pre_existing: usize,
    /// Placeholders kept because they still match a source event
    pub updated: Vec<String>,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    /// Unmatched source events rejected by the eligibility filter
    pub ignored: usize,
}

impl RunReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }

    /// Emit the run summary to the log.
    pub fn log(&self) {
        info!(
            destination_seen = self.destination_seen,
            source_seen = self.source_seen,
            pre_existing = self.pre_existing,
            unchanged = self.updated.len(),
            created = self.created.len(),
            deleted = self.deleted.len(),
            ignored = self.ignored,
            "Sync complete"
        );
    }
}
