use std::{collections::HashMap, sync::RwLock};

use crate::models::StoredReport;

/// Process-lifetime report store. Write-once/read-many keyed by generated id,
/// a stand-in for a durable database: contents are lost on restart.
pub struct InMemoryReports {
    reports: RwLock<HashMap<String, StoredReport>>,
}

impl InMemoryReports {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts unconditionally. Ids are generated, so collisions are not
    /// defended against; a duplicate id overwrites.
    pub fn store_report(&self, report: StoredReport) {
        let mut reports = self
            .reports
            .write()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on reports: {}", e));
        tracing::info!("Storing report id={}", report.id);
        reports.insert(report.id.clone(), report);
        tracing::debug!("Reports in memory: {}", reports.len());
    }

    pub fn get_report(&self, id: &str) -> Option<StoredReport> {
        let reports = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on reports: {}", e));
        reports.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.reports
            .read()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on reports: {}", e))
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryReports {
    fn default() -> Self {
        Self::new()
    }
}
