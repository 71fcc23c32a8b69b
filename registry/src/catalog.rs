//! Descriptor catalog
//!
//! An insertion-ordered, name-indexed collection of service descriptors. The
//! catalog is plain owned data; sharing and locking are the store's concern.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use shared::{
    DescriptorSummary, PageData, PageRequest, ServiceDescriptor, SharedError, SharedResult,
    ToolDescriptor,
};

use crate::error::CatalogError;

/// Outcome of a tools update on an existing descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolsUpdate {
    pub tools_count: usize,
    /// False when the stored tools already matched and nothing was written
    pub changed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<ServiceDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, validating each descriptor and rejecting duplicate names.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ServiceDescriptor>) -> SharedResult<Self> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, descriptor: ServiceDescriptor) -> SharedResult<()> {
        descriptor.validate()?;
        if self.index.contains_key(&descriptor.name) {
            return Err(SharedError::DuplicateName { name: descriptor.name });
        }
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One page of summaries. Pages past the end are empty, and
    /// `total_count` is always the full catalog size.
    pub fn list(&self, page: PageRequest) -> PageData {
        let start = page.offset().min(self.entries.len());
        let end = start.saturating_add(page.page_size as usize).min(self.entries.len());

        PageData {
            page_items: self.entries[start..end].iter().map(DescriptorSummary::from).collect(),
            total_count: self.entries.len(),
            page_no: page.page_no,
            page_size: page.page_size,
        }
    }

    /// Exact, case-sensitive lookup
    pub fn get_by_name(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Case-insensitive substring search over name and description, in
    /// insertion order. An empty keyword matches everything.
    pub fn search(&self, keyword: &str) -> Vec<ServiceDescriptor> {
        let needle = keyword.to_lowercase();
        self.entries
            .iter()
            .filter(|descriptor| descriptor.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Replace the tool metadata of an existing descriptor.
    ///
    /// Writing the same tools twice leaves the descriptor untouched, including
    /// `update_time`.
    pub fn update_tools(
        &mut self,
        name: &str,
        tools: Vec<ToolDescriptor>,
        now: DateTime<Utc>,
    ) -> Result<ToolsUpdate, CatalogError> {
        let position = *self
            .index
            .get(name)
            .ok_or_else(|| CatalogError::NotFound { name: name.to_string() })?;
        let descriptor = &mut self.entries[position];
        let tools_count = tools.len();

        if descriptor.tools == tools {
            return Ok(ToolsUpdate { tools_count, changed: false });
        }

        descriptor.tools = tools;
        descriptor.update_time = now;
        Ok(ToolsUpdate { tools_count, changed: true })
    }
}
