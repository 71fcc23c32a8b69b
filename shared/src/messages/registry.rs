//! Registry wire envelopes
//!
//! Every registry response is wrapped as `{code, message, data}`, with
//! `data: null` on misses and failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::descriptor::{Protocol, ServiceDescriptor, ToolDescriptor};

pub const MSG_SUCCESS: &str = "success";
pub const MSG_NOT_FOUND: &str = "MCP server not found";
pub const MSG_TOOLS_UPDATED: &str = "Tools updated successfully";
pub const MSG_INTERNAL: &str = "Registry internal error";

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(MSG_SUCCESS, data)
    }

    pub fn with_message(message: &str, data: T) -> Self {
        Self {
            code: 200,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn not_found() -> Self {
        Self::failure(404, MSG_NOT_FOUND)
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

/// Listing projection of a descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSummary {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub protocol: Protocol,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<&ServiceDescriptor> for DescriptorSummary {
    fn from(descriptor: &ServiceDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            enabled: descriptor.enabled,
            protocol: descriptor.protocol,
            create_time: descriptor.create_time,
            update_time: descriptor.update_time,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub page_items: Vec<DescriptorSummary>,
    pub total_count: usize,
    pub page_no: u32,
    pub page_size: u32,
}

/// 1-based pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_no: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_NO: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Build a request, substituting defaults for zero values
    pub fn new(page_no: u32, page_size: u32) -> Self {
        Self {
            page_no: if page_no == 0 { Self::DEFAULT_PAGE_NO } else { page_no },
            page_size: if page_size == 0 { Self::DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    /// Build a request from raw query strings. Absent, non-numeric and
    /// non-positive values fall back to the defaults instead of failing.
    pub fn from_raw(page_no: Option<&str>, page_size: Option<&str>) -> Self {
        Self {
            page_no: parse_positive(page_no).unwrap_or(Self::DEFAULT_PAGE_NO),
            page_size: parse_positive(page_size).unwrap_or(Self::DEFAULT_PAGE_SIZE),
        }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page_no as usize).saturating_sub(1).saturating_mul(self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_NO, Self::DEFAULT_PAGE_SIZE)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
}

/// Body of a tools-update notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsUpdateRequest {
    pub mcp_name: String,
    #[serde(default)]
    pub tools: Option<Vec<ToolDescriptor>>,
}

/// Acknowledgment of a tools-update notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsUpdateAck {
    pub mcp_name: String,
    pub tools_count: usize,
}
