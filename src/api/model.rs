use crate::solver::Challenge;
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "acme.cert-manager.io/v1alpha1";
pub const KIND: &str = "ChallengePayload";

/// The envelope cert-manager posts to a DNS-01 webhook, and the webhook answers with.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeAction {
    Present,
    CleanUp,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[serde(default)]
    pub uid: String,
    pub action: ChallengeAction,
    #[serde(rename = "type", default)]
    pub challenge_type: String,
    #[serde(default)]
    pub dns_name: String,
    pub key: String,
    #[serde(default)]
    pub resource_namespace: String,
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    pub resolved_zone: String,
    #[serde(default)]
    pub allow_ambient_credentials: bool,
    /// Per-issuer solver config. This solver takes its configuration from the environment,
    /// so the value is accepted and ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub uid: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

/// Subset of a Kubernetes `metav1.Status` describing a failed challenge operation.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseStatus {
    pub status: String,
    pub message: String,
}

impl From<&ChallengeRequest> for Challenge {
    fn from(request: &ChallengeRequest) -> Self {
        Challenge {
            resolved_fqdn: request.resolved_fqdn.clone(),
            resolved_zone: request.resolved_zone.clone(),
            key: request.key.clone(),
        }
    }
}

impl ChallengePayload {
    /// Build the reply to a request with the given `uid` from the solver's outcome.
    pub(super) fn reply<E: std::fmt::Display>(uid: String, result: Result<(), E>) -> Self {
        let response = match result {
            Ok(()) => ChallengeResponse {
                uid,
                success: true,
                status: None,
            },
            Err(err) => ChallengeResponse {
                uid,
                success: false,
                status: Some(ResponseStatus {
                    status: "Failure".to_string(),
                    message: err.to_string(),
                }),
            },
        };
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            request: None,
            response: Some(response),
        }
    }
}
