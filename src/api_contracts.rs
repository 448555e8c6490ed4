//! Wire types shared with the reporting platform.
//!
//! Every platform service answers with the same envelope. The success
//! output of an upload call is this envelope re-encoded verbatim, so the
//! caller sees exactly `{"code", "msg", "data"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope returned by every platform service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub code: i64,
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}
