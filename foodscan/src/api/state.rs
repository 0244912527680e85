use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::llm::VisionModel;
use crate::services::{AnalysisService, RetrievalService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub model: Arc<dyn VisionModel>,
    pub retrieval: RetrievalService,
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<dyn DatabaseBackend>,
        model: Arc<dyn VisionModel>,
    ) -> Self {
        let config = Arc::new(config);
        let retrieval = RetrievalService::new(db.clone(), config.retrieval.context_limit);
        let analysis = AnalysisService::new(model.clone(), retrieval.clone());

        Self {
            config,
            db,
            model,
            retrieval,
            analysis,
        }
    }
}
