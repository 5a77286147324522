//! Read-only aggregations for managers and compliance reviewers.

mod compliance;
mod dashboard;

pub use compliance::{ComplianceReporter, ComplianceSnapshot};
pub use dashboard::{ActivityMetrics, FunnelMetrics, ManagerDashboardBuilder, ManagerDashboardSnapshot};
