//! Resource handlers
//!
//! [`ResourceHandler`] is the callback surface a host drives for one resource
//! type. [`CrudResource`] implements it once for every type that has a
//! [`ApiResource`] descriptor plus create/update/list option structs, and
//! [`ListDataSource`] does the same for lookups.

use super::data::ResourceData;
use super::schema::{Diagnostic, Schema};
use crate::ecl::client::{Service, ServiceClient};
use crate::resource::{waiter, ApiResource, Crud, WaitOpts};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Configured clients and polling budget shared by all handlers
#[derive(Clone)]
pub struct ProviderContext {
    clients: BTreeMap<Service, ServiceClient>,
    wait: WaitOpts,
}

impl ProviderContext {
    pub fn new(clients: BTreeMap<Service, ServiceClient>, wait: WaitOpts) -> Self {
        Self { clients, wait }
    }

    pub fn client(&self, service: Service) -> Result<&ServiceClient> {
        self.clients
            .get(&service)
            .with_context(|| format!("No client configured for the {} service", service))
    }

    pub fn wait_opts(&self) -> WaitOpts {
        self.wait
    }
}

/// CRUD callbacks for one resource type
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn schema(&self) -> Schema;

    /// Create from `data.attributes`, then set the id and computed attributes
    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    /// Refresh attributes; clears the id when the resource no longer exists
    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    async fn update(&self, ctx: &ProviderContext, prior: &ResourceData, data: &mut ResourceData) -> Result<()>;

    async fn delete(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    async fn list(&self, ctx: &ProviderContext, filters: &Map<String, Value>) -> Result<Vec<ResourceData>>;

    /// Attribute carrying the parent id of a nested type
    fn parent_attribute(&self) -> Option<&'static str> {
        None
    }
}

/// Read-only lookup returning exactly one object
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    fn schema(&self) -> Schema;

    async fn read(&self, ctx: &ProviderContext, config: &ResourceData) -> Result<ResourceData>;
}

/// Collection nested under a parent resource, e.g. `zones/<zone_id>/recordsets`
#[derive(Debug, Clone, Copy)]
pub struct Parent {
    pub path: &'static str,
    /// Attribute holding the parent id
    pub attribute: &'static str,
}

/// Fail with every diagnostic at once
pub fn ensure_valid(schema: &Schema, attributes: &Map<String, Value>) -> Result<()> {
    report(schema.validate(attributes))
}

fn report(diags: Vec<Diagnostic>) -> Result<()> {
    if diags.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = diags.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration: {}", messages.join("; "))
}

/// Configurable, non-null attributes
fn configured(schema: &Schema, attributes: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|(k, v)| !v.is_null() && schema.attribute(k).is_some_and(|a| a.configurable()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn decode_opts<O: DeserializeOwned>(attributes: Map<String, Value>) -> Result<O> {
    serde_json::from_value(Value::Object(attributes)).context("Attributes do not match the API request shape")
}

fn to_data<T: ApiResource>(schema: &Schema, resource: &T) -> Result<ResourceData> {
    let value = serde_json::to_value(resource)?;
    let mut data = ResourceData::new(schema.project(&value));
    data.set_id(resource.id());
    Ok(data)
}

/// Generic handler over `T` with list filters `L`, create opts `C` and update opts `U`
pub struct CrudResource<T, L, C, U> {
    schema: fn() -> Schema,
    parent: Option<Parent>,
    ready_status: Option<&'static str>,
    wait_for_delete: bool,
    updatable: bool,
    _marker: PhantomData<fn() -> (T, L, C, U)>,
}

impl<T, L, C, U> CrudResource<T, L, C, U> {
    pub fn new(schema: fn() -> Schema) -> Self {
        Self {
            schema,
            parent: None,
            ready_status: None,
            wait_for_delete: false,
            updatable: true,
            _marker: PhantomData,
        }
    }

    pub fn nested(mut self, path: &'static str, attribute: &'static str) -> Self {
        self.parent = Some(Parent { path, attribute });
        self
    }

    /// Block after create and update until the status reads `status`
    pub fn wait_until(mut self, status: &'static str) -> Self {
        self.ready_status = Some(status);
        self
    }

    /// Block after delete until the API answers 404
    pub fn wait_for_delete(mut self) -> Self {
        self.wait_for_delete = true;
        self
    }

    /// Any change requires replacement
    pub fn immutable(mut self) -> Self {
        self.updatable = false;
        self
    }
}

impl<T, L, C, U> CrudResource<T, L, C, U>
where
    T: ApiResource,
{
    fn crud<'a>(&self, client: &'a ServiceClient, attributes: &Map<String, Value>) -> Result<Crud<'a, T>> {
        let Some(parent) = self.parent else {
            return Ok(Crud::new(client));
        };
        let parent_id = attributes
            .get(parent.attribute)
            .and_then(Value::as_str)
            .with_context(|| format!("Attribute {} is required", parent.attribute))?;
        Ok(Crud::nested(client, &[parent.path, parent_id]))
    }

    async fn wait_ready(&self, ctx: &ProviderContext, crud: &Crud<'_, T>, id: &str) -> Result<()> {
        let Some(target) = self.ready_status else {
            return Ok(());
        };
        tracing::debug!("Waiting for {} {} to become {}", T::DESCRIPTOR.path, id, target);
        waiter::wait_for_status(ctx.wait_opts(), target, || crud.status_of(id))
            .await
            .with_context(|| format!("Error waiting for {} {} to become {}", T::DESCRIPTOR.path, id, target))
    }
}

#[async_trait]
impl<T, L, C, U> ResourceHandler for CrudResource<T, L, C, U>
where
    T: ApiResource,
    L: DeserializeOwned + Serialize + Send + Sync + 'static,
    C: DeserializeOwned + Serialize + Send + Sync + 'static,
    U: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    fn schema(&self) -> Schema {
        (self.schema)()
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let schema = self.schema();
        ensure_valid(&schema, &data.attributes)?;

        let kind = T::DESCRIPTOR.path;
        let client = ctx.client(T::DESCRIPTOR.service)?;
        let crud = self.crud(client, &data.attributes)?;
        let opts: C = decode_opts(configured(&schema, &data.attributes))?;

        let created = crud
            .create(&opts)
            .await
            .with_context(|| format!("Error creating {}", kind))?;
        let id = created.id().to_string();
        data.set_id(id.clone());
        tracing::info!("Created {} {}", kind, id);

        self.wait_ready(ctx, &crud, &id).await?;
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let kind = T::DESCRIPTOR.path;
        let id = data
            .id()
            .with_context(|| format!("Cannot read {} without an id", kind))?
            .to_string();
        let client = ctx.client(T::DESCRIPTOR.service)?;
        let crud = self.crud(client, &data.attributes)?;

        match crud.get(&id).await {
            Ok(resource) => {
                let fresh = to_data(&self.schema(), &resource)?;
                data.merge(fresh.attributes);
                Ok(())
            },
            Err(err) if err.is_not_found() => {
                tracing::warn!("{} {} not found, removing from state", kind, id);
                data.clear_id();
                Ok(())
            },
            Err(err) => Err(err).with_context(|| format!("Error retrieving {} {}", kind, id)),
        }
    }

    async fn update(&self, ctx: &ProviderContext, prior: &ResourceData, data: &mut ResourceData) -> Result<()> {
        let schema = self.schema();
        report(schema.validate_update(&prior.attributes, &data.attributes))?;

        let kind = T::DESCRIPTOR.path;
        let id = data
            .id()
            .or(prior.id())
            .with_context(|| format!("Cannot update {} without an id", kind))?
            .to_string();
        data.set_id(id.clone());

        let changed = schema.changed_attributes(&prior.attributes, &data.attributes);
        if let Some(attr) = changed.iter().find(|a| a.force_new) {
            bail!("Changing {} of {} {} requires replacing it", attr.name, kind, id);
        }
        if changed.is_empty() {
            tracing::debug!("{} {} has no changes", kind, id);
            return self.read(ctx, data).await;
        }
        if !self.updatable {
            bail!("{} cannot be updated in place", kind);
        }

        let names: Vec<&str> = changed.iter().map(|a| a.name).collect();
        let opts: U = decode_opts(data.subset(&names))?;

        let client = ctx.client(T::DESCRIPTOR.service)?;
        let crud = self.crud(client, &data.attributes)?;
        crud.update(&id, &opts)
            .await
            .with_context(|| format!("Error updating {} {}", kind, id))?;
        tracing::info!("Updated {} {}: {}", kind, id, names.join(", "));

        self.wait_ready(ctx, &crud, &id).await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let kind = T::DESCRIPTOR.path;
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let client = ctx.client(T::DESCRIPTOR.service)?;
        let crud = self.crud(client, &data.attributes)?;

        match crud.delete(&id).await {
            Ok(()) => {},
            Err(err) if err.is_not_found() => {
                tracing::warn!("{} {} already deleted", kind, id);
                data.clear_id();
                return Ok(());
            },
            Err(err) => return Err(err).with_context(|| format!("Error deleting {} {}", kind, id)),
        }

        if self.wait_for_delete {
            waiter::wait_for_deletion(ctx.wait_opts(), || crud.status_of(&id))
                .await
                .with_context(|| format!("Error waiting for {} {} to be deleted", kind, id))?;
        }

        tracing::info!("Deleted {} {}", kind, id);
        data.clear_id();
        Ok(())
    }

    async fn list(&self, ctx: &ProviderContext, filters: &Map<String, Value>) -> Result<Vec<ResourceData>> {
        let schema = self.schema();
        let client = ctx.client(T::DESCRIPTOR.service)?;
        let crud = self.crud(client, filters)?;

        let mut query = filters.clone();
        if let Some(parent) = self.parent {
            query.remove(parent.attribute);
        }
        let opts: L = serde_json::from_value(Value::Object(query)).context("Invalid list filters")?;

        let items = crud
            .list_all(&opts)
            .await
            .with_context(|| format!("Error listing {}", T::DESCRIPTOR.path))?;
        items.iter().map(|item| to_data(&schema, item)).collect()
    }

    fn parent_attribute(&self) -> Option<&'static str> {
        self.parent.map(|p| p.attribute)
    }
}

/// Data source resolving filters to a single object of type `T`
///
/// Filters that map onto `L` go to the server as query parameters; every
/// configured attribute is also compared client-side.
pub struct ListDataSource<T, L> {
    schema: fn() -> Schema,
    _marker: PhantomData<fn() -> (T, L)>,
}

impl<T, L> ListDataSource<T, L> {
    pub fn new(schema: fn() -> Schema) -> Self {
        Self {
            schema,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T, L> DataSourceHandler for ListDataSource<T, L>
where
    T: ApiResource,
    L: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    fn schema(&self) -> Schema {
        (self.schema)()
    }

    async fn read(&self, ctx: &ProviderContext, config: &ResourceData) -> Result<ResourceData> {
        let schema = self.schema();
        ensure_valid(&schema, &config.attributes)?;

        let filters = configured(&schema, &config.attributes);
        let opts: L = decode_opts(filters.clone())?;
        let client = ctx.client(T::DESCRIPTOR.service)?;
        let items = Crud::<T>::new(client)
            .list_all(&opts)
            .await
            .with_context(|| format!("Error listing {}", T::DESCRIPTOR.path))?;

        let mut matches = Vec::new();
        for item in &items {
            let value = serde_json::to_value(item)?;
            let keep = filters
                .iter()
                .all(|(k, want)| value.get(k).map_or(true, |got| got == want));
            if keep {
                matches.push(item);
            }
        }

        match matches.as_slice() {
            [] => bail!("Your query returned no results. Please change your search criteria and try again."),
            [item] => {
                tracing::debug!("Found {} {}", T::DESCRIPTOR.path, item.id());
                let mut data = to_data(&schema, *item)?;
                for (k, v) in filters {
                    data.attributes.entry(k).or_insert(v);
                }
                Ok(data)
            },
            _ => bail!("Your query returned more than one result. Please try a more specific search criteria."),
        }
    }
}
