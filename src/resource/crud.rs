//! Generic CRUD over one resource type
//!
//! Every resource type is described by a constant [`ResourceDescriptor`]
//! (path, envelope keys, paging, verbs, OkCodes) and a serde struct
//! implementing [`ApiResource`]. [`Crud`] composes URL building, query
//! encoding, the request and the extraction for all of them.

use super::extract::{Envelope, Extractor};
use super::pagination::{Pager, Paging, ResourcePage};
use crate::ecl::client::{Service, ServiceClient};
use crate::ecl::http::RequestOpts;
use crate::ecl::query::with_query;
use crate::ecl::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Verb used for updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Put,
    Patch,
}

impl UpdateVerb {
    fn method(self) -> Method {
        match self {
            UpdateVerb::Put => Method::PUT,
            UpdateVerb::Patch => Method::PATCH,
        }
    }
}

/// URL and payload shape of one resource type
#[derive(Debug, Clone, Copy)]
pub struct ResourceDescriptor {
    pub service: Service,
    /// Collection path segment, e.g. `public_ips`
    pub path: &'static str,
    pub singular: Envelope,
    pub plural: &'static str,
    /// Key wrapping each list item, if any
    pub list_item: Option<&'static str>,
    /// Appended to the collection path for lists, e.g. `detail`
    pub list_suffix: Option<&'static str>,
    pub paging: Paging,
    pub update_verb: UpdateVerb,
    pub create_ok: Option<&'static [u16]>,
    pub update_ok: Option<&'static [u16]>,
    pub delete_ok: Option<&'static [u16]>,
}

impl ResourceDescriptor {
    pub const fn new(
        service: Service,
        path: &'static str,
        singular: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            service,
            path,
            singular: Envelope::Key(singular),
            plural,
            list_item: None,
            list_suffix: None,
            paging: Paging::Single,
            update_verb: UpdateVerb::Put,
            create_ok: None,
            update_ok: None,
            delete_ok: None,
        }
    }

    /// Single objects are returned and sent without an envelope
    pub const fn root_objects(mut self) -> Self {
        self.singular = Envelope::Root;
        self
    }

    pub const fn list_item(mut self, key: &'static str) -> Self {
        self.list_item = Some(key);
        self
    }

    pub const fn list_suffix(mut self, suffix: &'static str) -> Self {
        self.list_suffix = Some(suffix);
        self
    }

    pub const fn paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub const fn update_verb(mut self, verb: UpdateVerb) -> Self {
        self.update_verb = verb;
        self
    }

    pub const fn create_ok(mut self, codes: &'static [u16]) -> Self {
        self.create_ok = Some(codes);
        self
    }

    pub const fn update_ok(mut self, codes: &'static [u16]) -> Self {
        self.update_ok = Some(codes);
        self
    }

    pub const fn delete_ok(mut self, codes: &'static [u16]) -> Self {
        self.delete_ok = Some(codes);
        self
    }

    /// Wrap a request body in the singular envelope key
    fn wrap(&self, body: Value) -> Value {
        match self.singular {
            Envelope::Key(key) => {
                let mut map = Map::new();
                map.insert(key.to_string(), body);
                Value::Object(map)
            },
            Envelope::Root => body,
        }
    }
}

/// A serde struct bound to its descriptor
pub trait ApiResource: DeserializeOwned + Serialize + Send + Sync + 'static {
    const DESCRIPTOR: ResourceDescriptor;

    fn id(&self) -> &str;

    /// Lifecycle status as reported by the API
    fn status(&self) -> Option<&str> {
        None
    }
}

/// CRUD calls for `T` against one service client
pub struct Crud<'a, T> {
    client: &'a ServiceClient,
    parent: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: ApiResource> Crud<'a, T> {
    pub fn new(client: &'a ServiceClient) -> Self {
        Self {
            client,
            parent: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// CRUD on a collection nested under a parent, e.g. `zones/<id>/recordsets`
    pub fn nested(client: &'a ServiceClient, parent: &[&str]) -> Self {
        Self {
            client,
            parent: parent.iter().map(|p| urlencoding::encode(p).into_owned()).collect(),
            _marker: PhantomData,
        }
    }

    fn collection_parts(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = self.parent.iter().map(String::as_str).collect();
        parts.push(T::DESCRIPTOR.path);
        parts
    }

    /// `<base>/<path>[/<list suffix>]`
    pub fn list_url(&self) -> String {
        let mut parts = self.collection_parts();
        if let Some(suffix) = T::DESCRIPTOR.list_suffix {
            parts.push(suffix);
        }
        self.client.service_url(&parts)
    }

    /// `<base>/<path>` for creates
    pub fn create_url(&self) -> String {
        self.client.service_url(&self.collection_parts())
    }

    /// `<base>/<path>/<id>`
    pub fn resource_url(&self, id: &str) -> String {
        let id = urlencoding::encode(id);
        let mut parts = self.collection_parts();
        parts.push(id.as_ref());
        self.client.service_url(&parts)
    }

    /// Lazy pager over the collection, filtered by `opts`
    pub fn list<O: Serialize + ?Sized>(&self, opts: &O) -> Result<Pager<ResourcePage>> {
        let url = with_query(&self.list_url(), opts)?;
        let descriptor = T::DESCRIPTOR;
        Ok(Pager::new(self.client.clone(), url, move |url, body| {
            ResourcePage::new(url, body, descriptor.plural, descriptor.paging)
                .with_item_key(descriptor.list_item)
        }))
    }

    /// Every item of every page
    pub async fn list_all<O: Serialize + ?Sized>(&self, opts: &O) -> Result<Vec<T>> {
        self.list(opts)?.all_items().await
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        let response = self.client.get(&self.resource_url(id), RequestOpts::new()).await?;
        Extractor::from_response(response).extract(T::DESCRIPTOR.singular)
    }

    pub async fn create<B: Serialize + ?Sized>(&self, opts: &B) -> Result<T> {
        let body = T::DESCRIPTOR.wrap(encode(opts)?);
        let mut request = RequestOpts::new().json(body);
        if let Some(codes) = T::DESCRIPTOR.create_ok {
            request = request.ok_codes(codes);
        }

        let response = self.client.post(&self.create_url(), request).await?;
        Extractor::from_response(response).extract(T::DESCRIPTOR.singular)
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, opts: &B) -> Result<T> {
        let body = T::DESCRIPTOR.wrap(encode(opts)?);
        let mut request = RequestOpts::new().json(body);
        if let Some(codes) = T::DESCRIPTOR.update_ok {
            request = request.ok_codes(codes);
        }

        let method = T::DESCRIPTOR.update_verb.method();
        let response = self
            .client
            .request(method, &self.resource_url(id), request)
            .await?;
        Extractor::from_response(response).extract(T::DESCRIPTOR.singular)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut request = RequestOpts::new();
        if let Some(codes) = T::DESCRIPTOR.delete_ok {
            request = request.ok_codes(codes);
        }
        self.client.delete(&self.resource_url(id), request).await?;
        Ok(())
    }

    /// Current status of `id`, for polling
    pub async fn status_of(&self, id: &str) -> Result<String> {
        let resource = self.get(id).await?;
        Ok(resource.status().unwrap_or_default().to_string())
    }
}

fn encode<B: Serialize + ?Sized>(opts: &B) -> Result<Value> {
    serde_json::to_value(opts).map_err(|e| Error::Encode(e.to_string()))
}
