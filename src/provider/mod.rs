//! Provider layer
//!
//! Host-facing side of the crate: declared schemas, resource state and
//! the handlers that map each resource type onto SDK calls.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute declarations and config validation
//! - [`data`] - [`ResourceData`], the id plus attribute map
//! - [`handler`] - [`ResourceHandler`] trait and its generic implementations
//! - [`registry`] - Type names mapped to handlers

pub mod data;
pub mod handler;
pub mod registry;
pub mod schema;

pub use data::ResourceData;
pub use handler::{DataSourceHandler, ProviderContext, ResourceHandler};
pub use schema::{AttrType, Attribute, Diagnostic, Schema};

use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Configured provider with every registered type
pub struct Provider {
    ctx: ProviderContext,
    resources: registry::Resources,
    data_sources: registry::DataSources,
}

impl Provider {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            ctx,
            resources: registry::resources(),
            data_sources: registry::data_sources(),
        }
    }

    /// Build clients for every service from the configuration
    pub fn configure(config: &Config) -> Result<Self> {
        let clients = config.service_clients()?;
        tracing::info!(
            "Provider configured for region {} ({} services)",
            config.effective_region(),
            clients.len()
        );
        Ok(Self::new(ProviderContext::new(clients, config.wait_opts())))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn ResourceHandler> {
        self.resources
            .get(type_name)
            .map(|h| h.as_ref())
            .with_context(|| format!("Unknown resource type: {}", type_name))
    }

    pub fn data_source(&self, type_name: &str) -> Result<&dyn DataSourceHandler> {
        self.data_sources
            .get(type_name)
            .map(|h| h.as_ref())
            .with_context(|| format!("Unknown data source: {}", type_name))
    }

    pub async fn create(&self, type_name: &str, attributes: Map<String, Value>) -> Result<ResourceData> {
        let handler = self.resource(type_name)?;
        let mut data = ResourceData::new(attributes);
        handler.create(&self.ctx, &mut data).await?;
        Ok(data)
    }

    /// Current state of `id`; `None` when the resource is gone
    ///
    /// `attributes` only needs to carry parent ids of nested types.
    pub async fn read(
        &self,
        type_name: &str,
        id: &str,
        attributes: Map<String, Value>,
    ) -> Result<Option<ResourceData>> {
        let handler = self.resource(type_name)?;
        let mut data = ResourceData::new(attributes);
        data.set_id(id);
        handler.read(&self.ctx, &mut data).await?;
        Ok(data.id.is_some().then_some(data))
    }

    /// Apply `changes` on top of the current configuration of `id`
    pub async fn update(&self, type_name: &str, id: &str, changes: Map<String, Value>) -> Result<ResourceData> {
        let handler = self.resource(type_name)?;
        let schema = handler.schema();

        // the read must reflect the API only; the parent id just locates it
        let mut locators = Map::new();
        if let Some(parent) = handler.parent_attribute() {
            if let Some(value) = changes.get(parent) {
                locators.insert(parent.to_string(), value.clone());
            }
        }
        let prior = self
            .read(type_name, id, locators)
            .await?
            .with_context(|| format!("{} {} does not exist", type_name, id))?;

        let mut planned = ResourceData::new(Map::new());
        planned.set_id(id);
        for attr in schema.attributes.iter().filter(|a| a.configurable()) {
            if let Some(value) = prior.get(attr.name) {
                planned.set(attr.name, value.clone());
            }
        }
        planned.merge(changes);

        handler.update(&self.ctx, &prior, &mut planned).await?;
        Ok(planned)
    }

    pub async fn delete(&self, type_name: &str, id: &str, attributes: Map<String, Value>) -> Result<()> {
        let handler = self.resource(type_name)?;
        let mut data = ResourceData::new(attributes);
        data.set_id(id);
        handler.delete(&self.ctx, &mut data).await
    }

    pub async fn list(&self, type_name: &str, filters: &Map<String, Value>) -> Result<Vec<ResourceData>> {
        self.resource(type_name)?.list(&self.ctx, filters).await
    }

    pub async fn read_data_source(&self, type_name: &str, config: Map<String, Value>) -> Result<ResourceData> {
        let handler = self.data_source(type_name)?;
        handler.read(&self.ctx, &ResourceData::new(config)).await
    }
}
