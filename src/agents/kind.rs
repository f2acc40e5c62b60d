//! Request kinds: which drafting task the user asked for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The request named a task that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request type: {0}")]
pub struct InvalidRequestError(pub String);

/// Task selector for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Summary,
    Appeal,
    Review,
    Lawsuit,
    LawsuitResponse,
    ContractAnalysis,
    /// Free-form question about the whole document.
    Chat,
}

impl RequestKind {
    pub const ALL: [RequestKind; 7] = [
        RequestKind::Summary,
        RequestKind::Appeal,
        RequestKind::Review,
        RequestKind::Lawsuit,
        RequestKind::LawsuitResponse,
        RequestKind::ContractAnalysis,
        RequestKind::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Summary => "summary",
            RequestKind::Appeal => "appeal",
            RequestKind::Review => "review",
            RequestKind::Lawsuit => "lawsuit",
            RequestKind::LawsuitResponse => "lawsuit_response",
            RequestKind::ContractAnalysis => "contract_analysis",
            RequestKind::Chat => "chat",
        }
    }

    /// Human-facing name, used in artifact titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            RequestKind::Summary => "Summary",
            RequestKind::Appeal => "Appeal",
            RequestKind::Review => "Review",
            RequestKind::Lawsuit => "Lawsuit",
            RequestKind::LawsuitResponse => "Lawsuit Response",
            RequestKind::ContractAnalysis => "Contract Analysis",
            RequestKind::Chat => "Chat Response",
        }
    }

    /// Leading text of the failure description for this kind.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            RequestKind::Summary => "Error generating summary",
            RequestKind::Appeal => "Error generating appeal",
            RequestKind::Review => "Error generating review",
            RequestKind::Lawsuit => "Error generating lawsuit",
            RequestKind::LawsuitResponse => "Error generating lawsuit response",
            RequestKind::ContractAnalysis => "Error analyzing contract",
            RequestKind::Chat => "Error answering question",
        }
    }

    /// Chat answers the whole document in one call instead of per chunk.
    pub fn is_chat(&self) -> bool {
        matches!(self, RequestKind::Chat)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = InvalidRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| InvalidRequestError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in RequestKind::ALL {
            assert_eq!(kind.as_str().parse::<RequestKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_dashes() {
        assert_eq!(
            "Lawsuit-Response".parse::<RequestKind>().unwrap(),
            RequestKind::LawsuitResponse
        );
        assert_eq!(
            " CONTRACT_ANALYSIS ".parse::<RequestKind>().unwrap(),
            RequestKind::ContractAnalysis
        );
    }

    #[test]
    fn test_unknown_kind() {
        let err = "translation".parse::<RequestKind>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid request type: translation");
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&RequestKind::LawsuitResponse).unwrap();
        assert_eq!(json, "\"lawsuit_response\"");
    }
}
