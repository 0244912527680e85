mod analyses;

pub use analyses::AnalysisRepository;
