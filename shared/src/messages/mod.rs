//! Wire message types shared by the registry and its clients
//!
//! - `registry`: response envelopes, listing pages and tools-update payloads

pub mod registry;

pub use registry::{
    ApiResponse, DescriptorSummary, PageData, PageRequest, ToolsUpdateAck, ToolsUpdateRequest,
    MSG_INTERNAL, MSG_NOT_FOUND, MSG_SUCCESS, MSG_TOOLS_UPDATED,
};
