//! Driven port for the operation audit trail.
//!
//! The audit trail records mutating operations for traceability. It is kept
//! apart from diagnostic logging and recording is fire-and-forget: adapters
//! swallow their own failures.

use std::fmt;

use crate::domain::TraceId;

/// Kind of mutation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// Existing records were modified.
    Update,
    /// Records were deleted.
    Remove,
}

impl OperationType {
    /// Stable tag written to the audit trail.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the audited operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The operation completed.
    Succeeded,
    /// The operation failed with the given result code.
    Failed { code: i32 },
}

/// One audit trail record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Feature area, e.g. `message`.
    pub module: &'static str,
    pub operation: OperationType,
    pub method: String,
    pub path: String,
    pub remote_addr: String,
    pub outcome: AuditOutcome,
    pub trace_id: Option<TraceId>,
}

/// Sink for audit entries.
#[cfg_attr(test, mockall::automock)]
pub trait AuditLog: Send + Sync {
    /// Record `entry`. Must not fail or block for long.
    fn record(&self, entry: AuditEntry);
}
