//! JSON shape of an operation result, as handed back to bridge callers.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::{Stage, SyncError};

/// Success or structured failure of one replace call.
///
/// ```json
/// {"status": "success", "blocks": [...]}
/// {"status": "error", "stage": "PartialArchiveFailure", "detail": "...", "archivedCount": 1}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success {
        blocks: Vec<Block>,
    },
    Error {
        stage: Stage,
        detail: String,
        #[serde(
            rename = "archivedCount",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        archived_count: Option<usize>,
    },
}

impl Outcome {
    pub fn from_result(result: Result<Vec<Block>, SyncError>) -> Self {
        match result {
            Ok(blocks) => Outcome::Success { blocks },
            Err(error) => Outcome::from(&error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

impl From<&SyncError> for Outcome {
    fn from(error: &SyncError) -> Self {
        Outcome::Error {
            stage: error.stage(),
            detail: error.to_string(),
            archived_count: error.archived_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteError;

    #[test]
    fn success_shape() {
        let outcome = Outcome::from_result(Ok(vec![Block::heading2("T").with_remote_id("n1")]));
        assert!(outcome.is_success());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({
                "status": "success",
                "blocks": [{"kind": "heading_2", "text": "T", "remoteId": "n1"}]
            })
        );
    }

    #[test]
    fn partial_archive_shape_has_count() {
        let outcome = Outcome::from_result(Err(SyncError::PartialArchiveFailure {
            archived: vec!["a".to_string()],
            remaining: vec!["b".to_string(), "c".to_string()],
            source: RemoteError::status(500, "boom"),
        }));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["stage"], "PartialArchiveFailure");
        assert_eq!(json["archivedCount"], 1);
        assert!(json["detail"].as_str().unwrap().contains("boom"));
    }

    #[test]
    fn missing_parameter_shape_has_no_count() {
        let outcome = Outcome::from_result(Err(SyncError::MissingParameter { name: "rawText" }));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["stage"], "MissingParameter");
        assert!(json.get("archivedCount").is_none());
        assert!(!outcome.is_success());
    }

    #[test]
    fn parses_back_from_json() {
        let outcome: Outcome = serde_json::from_value(serde_json::json!({
            "status": "error",
            "stage": "AppendFailed",
            "detail": "append failed",
            "archivedCount": 2
        }))
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::Error {
                stage: Stage::AppendFailed,
                detail: "append failed".to_string(),
                archived_count: Some(2),
            }
        );
    }
}
