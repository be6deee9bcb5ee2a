//! Lead-generation request and result types.

use serde::{Deserialize, Serialize};

use crate::error::{AidaError, Result};

/// Number of leads the panel can request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum LeadCount {
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl LeadCount {
    /// All selectable counts, in display order.
    pub const ALL: [LeadCount; 4] = [
        LeadCount::Five,
        LeadCount::Ten,
        LeadCount::Twenty,
        LeadCount::Fifty,
    ];

    pub fn value(&self) -> u32 {
        match self {
            LeadCount::Five => 5,
            LeadCount::Ten => 10,
            LeadCount::Twenty => 20,
            LeadCount::Fifty => 50,
        }
    }
}

impl From<LeadCount> for u32 {
    fn from(count: LeadCount) -> Self {
        count.value()
    }
}

impl TryFrom<u32> for LeadCount {
    type Error = AidaError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            5 => Ok(LeadCount::Five),
            10 => Ok(LeadCount::Ten),
            20 => Ok(LeadCount::Twenty),
            50 => Ok(LeadCount::Fifty),
            other => Err(AidaError::validation(format!(
                "Unsupported lead count: {other} (expected 5, 10, 20 or 50)"
            ))),
        }
    }
}

/// Arguments of the `create_leads` procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    pub business_type: String,
    pub location: String,
    pub count: LeadCount,
}

impl LeadRequest {
    /// Builds a request from raw form values.
    ///
    /// Both text fields are trimmed and must be non-empty.
    pub fn new(business_type: &str, location: &str, count: LeadCount) -> Result<Self> {
        let business_type = business_type.trim();
        let location = location.trim();
        if business_type.is_empty() || location.is_empty() {
            return Err(AidaError::validation(
                "Please fill in both business type and location.",
            ));
        }
        Ok(Self {
            business_type: business_type.to_string(),
            location: location.to_string(),
            count,
        })
    }
}

/// Result payload returned by the lead endpoint.
///
/// The agent server reports `created_count` either at the top level or
/// nested one level deeper under `result`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCreationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<LeadCreationResult>>,
}

impl LeadCreationResult {
    /// The reported count, falling back to what was requested.
    pub fn created_or(&self, requested: LeadCount) -> u32 {
        self.created_count
            .filter(|count| *count > 0)
            .or_else(|| {
                self.result
                    .as_ref()
                    .and_then(|nested| nested.created_count)
                    .filter(|count| *count > 0)
            })
            .unwrap_or_else(|| requested.value())
    }
}
