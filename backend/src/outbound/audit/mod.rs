//! Audit trail adapter emitting structured `tracing` events.
//!
//! Entries go to the `audit` target so deployments can route them apart from
//! diagnostic logs with an `EnvFilter` directive such as `audit=info`.

use tracing::info;

use crate::domain::ports::{AuditEntry, AuditLog, AuditOutcome};

/// Target every audit event is emitted under.
pub const AUDIT_TARGET: &str = "audit";

/// [`AuditLog`] writing one `info` event per entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, entry: AuditEntry) {
        let AuditEntry {
            module,
            operation,
            method,
            path,
            remote_addr,
            outcome,
            trace_id,
        } = entry;
        let (succeeded, code) = match outcome {
            AuditOutcome::Succeeded => (true, None),
            AuditOutcome::Failed { code } => (false, Some(code)),
        };
        let trace_id = trace_id.map(|id| id.to_string());
        info!(
            target: AUDIT_TARGET,
            module,
            operation = operation.as_str(),
            method = %method,
            path = %path,
            remote_addr = %remote_addr,
            succeeded,
            code,
            trace_id = trace_id.as_deref(),
            "operation audited"
        );
    }
}
