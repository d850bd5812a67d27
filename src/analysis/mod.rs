//! Client side of the external symptom-analysis service.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{AnalysisFuture, HttpSymptomAnalyzer, SymptomAnalyzer};
pub use config::{AnalysisConfig, DEFAULT_ANALYSIS_ENDPOINT};
pub use error::{AnalysisError, AnalysisResult};
pub use types::{AnalysisRequest, AnalysisResponse, SuggestedSpecialties};
