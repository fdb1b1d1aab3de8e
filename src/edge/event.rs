//! Edge invocation event shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::edge::headers::EdgeHeaders;

/// Event delivered to the origin-request hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EdgeRecord>,
}

impl EdgeEvent {
    /// Build an event holding a single record.
    pub fn single(request: InboundRequest, config: DistributionConfig) -> Self {
        Self {
            records: vec![EdgeRecord {
                cf: CfPayload { config, request },
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub cf: CfPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfPayload {
    #[serde(default)]
    pub config: DistributionConfig,
    pub request: InboundRequest,
}

/// Distribution context, used only for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionConfig {
    #[serde(default)]
    pub distribution_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// One HTTP request observed at the edge.
///
/// Fields the enricher does not touch (method, query string, body, origin...)
/// are carried in `extra` so the request is forwarded as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundRequest {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub headers: EdgeHeaders,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundRequest {
    pub fn new(uri: impl Into<String>, headers: EdgeHeaders) -> Self {
        Self {
            uri: uri.into(),
            headers,
            extra: Map::new(),
        }
    }
}
