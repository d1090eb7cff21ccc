//! Stable diagnostic codes for rejected registry calls.
//!
//! Log consumers key alerts on the `code` field, so the strings returned by
//! `DiagCode::as_str` must not change once released.

use crate::error::Error;
use crate::node::Pnid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagCode {
    AddInvalidPnid,
    AddPnidInUse,
    AddInvalidName,
    RemoveInvalidPnid,
    RemoveNotFound,
    SpareInvalidTargets,
    SpareConflict,
    SpareNotFound,
    ConfigRejected,
}

impl DiagCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagCode::AddInvalidPnid => "pnode.add.invalid_pnid",
            DiagCode::AddPnidInUse => "pnode.add.pnid_in_use",
            DiagCode::AddInvalidName => "pnode.add.invalid_name",
            DiagCode::RemoveInvalidPnid => "pnode.remove.invalid_pnid",
            DiagCode::RemoveNotFound => "pnode.remove.not_found",
            DiagCode::SpareInvalidTargets => "pnode.spare.invalid_targets",
            DiagCode::SpareConflict => "pnode.spare.conflict",
            DiagCode::SpareNotFound => "pnode.spare.not_found",
            DiagCode::ConfigRejected => "pnode.config.rejected",
        }
    }
}

impl std::fmt::Display for DiagCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit the diagnostic for a rejected call. Notification only.
pub(crate) fn report(code: DiagCode, pnid: Option<Pnid>, name: Option<&str>, err: &Error) {
    if err.is_configuration_bug() {
        tracing::error!(code = code.as_str(), pnid = ?pnid, name = ?name, error = %err, "configuration bug rejected");
    } else {
        tracing::error!(code = code.as_str(), pnid = ?pnid, name = ?name, error = %err, "registry call rejected");
    }
}
