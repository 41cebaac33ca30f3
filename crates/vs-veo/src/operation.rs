use serde::{Deserialize, Serialize};

/// A long-running generation operation as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Resource name, e.g. `models/veo-3.1-fast-generate-preview/operations/abc123`.
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Operation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A finished operation carrying one generated video.
    pub fn completed(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: None,
            response: Some(OperationResponse {
                generate_video_response: Some(GenerateVideoResponse {
                    generated_samples: vec![GeneratedSample {
                        video: Some(VideoFile { uri: Some(uri.into()) }),
                    }],
                }),
            }),
        }
    }

    /// URI of the first generated video, if the operation produced one.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_pending_operation() {
        let op: Operation = serde_json::from_str(r#"{"name":"models/m/operations/1"}"#).unwrap();
        assert!(!op.done);
        assert_eq!(op.video_uri(), None);
    }

    #[test]
    fn test_parses_finished_operation() {
        let json = r#"{
            "name": "models/m/operations/1",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://files.example/v1/files/abc:download?alt=media"}}
                    ]
                }
            }
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();

        assert!(op.done);
        assert_eq!(op.video_uri(), Some("https://files.example/v1/files/abc:download?alt=media"));
    }

    #[test]
    fn test_finished_without_samples_has_no_uri() {
        let json = r#"{"name":"n","done":true,"response":{"generateVideoResponse":{}}}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.video_uri(), None);

        let mut op = Operation::completed("n", "");
        assert_eq!(op.video_uri(), None);
        op.response = None;
        assert_eq!(op.video_uri(), None);
    }

    #[test]
    fn test_parses_failed_operation() {
        let json = r#"{"name":"n","done":true,"error":{"code":3,"message":"blocked"}}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(
            op.error,
            Some(OperationStatus {
                code: 3,
                message: "blocked".into()
            })
        );
    }
}
