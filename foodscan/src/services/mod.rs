mod analysis;
mod retrieval;

pub use analysis::AnalysisService;
pub use retrieval::RetrievalService;
