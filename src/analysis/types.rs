//! Wire types exchanged with the symptom-analysis service.

use serde::{Deserialize, Serialize};

/// Request body sent to the analysis endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    /// Combined user utterance.
    pub message: &'a str,
}

/// Structured answer returned by the analysis endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Symptoms recognised in the utterance, in service order.
    pub extracted_symptoms: Vec<String>,
    /// Specialty or specialties the service recommends, if any.
    #[serde(default)]
    pub suggested_specialties: Option<SuggestedSpecialties>,
}

impl AnalysisResponse {
    /// Build a response from symptom names and an optional single specialty.
    #[must_use]
    pub fn new<S: Into<String>>(
        symptoms: impl IntoIterator<Item = S>,
        specialty: Option<&str>,
    ) -> Self {
        Self {
            extracted_symptoms: symptoms.into_iter().map(Into::into).collect(),
            suggested_specialties: specialty.map(|s| SuggestedSpecialties::One(s.to_string())),
        }
    }
}

/// The service has shipped both a plain string and a list here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuggestedSpecialties {
    /// A single specialty name.
    One(String),
    /// Ranked list of specialty names.
    Many(Vec<String>),
}

impl SuggestedSpecialties {
    /// Non-blank specialty names, trimmed.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}
