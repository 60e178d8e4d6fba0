use std::sync::Arc;

use crate::config::Config;
use crate::reports_memory::InMemoryReports;
use crate::services::assessor::Assessor;
use crate::services::image_store::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reports: Arc<InMemoryReports>,
    pub assessor: Arc<dyn Assessor>,
    pub image_store: Arc<ImageStore>,
    pub http: reqwest::Client,
}
