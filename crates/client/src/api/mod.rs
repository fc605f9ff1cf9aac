//! Request and response envelopes for the robot's command dispatcher
//!
//! Every command published over the driver's data channel is a small
//! JSON object selecting a numeric `api_id`, optionally carrying a
//! `parameter` object. Responses come back with a status header and an
//! optional payload that is itself a JSON-encoded *string* and must be
//! decoded a second time.
//!
//! # Overview
//!
//! - [`ApiRequest`] - command envelope (`{"api_id": n, "parameter": {…}}`)
//! - [`ApiResponse`] - response envelope with [`ResponseStatus`]
//! - [`topics`] - data-channel topic names per onboard service
//! - [`sport`] - sport-service command table and named action subsets
//! - [`motion`] - motion switcher modes and command ids
//! - [`vui`] - volume / brightness / lighting command ids and colors

pub mod motion;
pub mod sport;
pub mod topics;
pub mod vui;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Status code the dispatcher uses for an accepted command
pub const STATUS_OK: i32 = 0;

/// Command envelope published to an onboard service topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Numeric command identifier understood by the dispatcher
    pub api_id: u32,

    /// Command parameters; omitted entirely for bare commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Value>,
}

impl ApiRequest {
    /// A command with no parameters (`{"api_id": n}`)
    pub fn bare(api_id: u32) -> Self {
        Self {
            api_id,
            parameter: None,
        }
    }

    /// A command carrying a parameter object
    pub fn with_parameter(api_id: u32, parameter: Value) -> Self {
        Self {
            api_id,
            parameter: Some(parameter),
        }
    }
}

/// Response envelope returned by the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Response header with the dispatch status
    pub header: ResponseHeader,

    /// JSON-encoded payload string; present only on query commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Header of a dispatcher response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseHeader {
    /// Dispatch status
    pub status: ResponseStatus,
}

/// Dispatch status carried in every response header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// 0 for an accepted command, non-zero otherwise
    pub code: i32,
}

impl ApiResponse {
    /// An accepted response with no payload
    pub fn accepted() -> Self {
        Self {
            header: ResponseHeader {
                status: ResponseStatus { code: STATUS_OK },
            },
            data: None,
        }
    }

    /// An accepted response whose payload is the JSON encoding of `data`
    pub fn with_data<T: Serialize>(data: &T) -> Result<Self> {
        Ok(Self {
            header: ResponseHeader {
                status: ResponseStatus { code: STATUS_OK },
            },
            data: Some(serde_json::to_string(data)?),
        })
    }

    /// A rejected response with the given status code
    pub fn rejected(code: i32) -> Self {
        Self {
            header: ResponseHeader {
                status: ResponseStatus { code },
            },
            data: None,
        }
    }

    /// Whether the dispatcher accepted the command
    pub fn is_ok(&self) -> bool {
        self.header.status.code == STATUS_OK
    }

    /// Decode the doubly-encoded payload string
    ///
    /// Query responses carry their payload as a JSON string inside the
    /// envelope, so it has to be parsed a second time.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.data.as_deref().ok_or_else(|| {
            Error::Transport("response carried no data payload".to_string())
        })?;
        Ok(serde_json::from_str(raw)?)
    }
}
