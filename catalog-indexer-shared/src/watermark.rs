//! Watermark type for checkpointed change detection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The modification-time boundary below which all catalog changes are
/// considered already synchronized.
///
/// A watermark is monotonically non-decreasing across committed cycles: it is
/// loaded at cycle start, a candidate is staged while the cycle runs, and the
/// candidate is committed only after every downstream write succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Watermark(pub DateTime<Utc>);

impl Watermark {
    /// The watermark used when no checkpoint has ever been committed.
    ///
    /// Everything in the catalog is newer than this, so a first run performs
    /// a full sync.
    pub fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    /// Capture the current time as a candidate watermark.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// The underlying timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.0
    }

    /// Serialize to the RFC 3339 form stored in the checkpoint backing store.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Parse from the stored RFC 3339 form.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc)))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}
