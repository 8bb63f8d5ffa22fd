//! Pagination
//!
//! A [`Pager`] turns a first-page URL into a lazy, forward-only stream of
//! pages. Each page says whether it is empty and where the next one lives;
//! the stream ends on an empty page, a missing next link, or the first error.

use super::extract::{lookup_path, Extractor};
use crate::ecl::client::ServiceClient;
use crate::ecl::http::RequestOpts;
use crate::ecl::{Error, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// One page of list results
pub trait Page: Send + 'static {
    fn is_empty(&self) -> Result<bool>;

    /// Absolute or relative URL of the following page, `None` on the last page
    fn next_page_url(&self) -> Result<Option<String>>;
}

/// How a resource's list responses point at the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// `{"<key>": [{"href": "...", "rel": "next"}]}`
    RelLinks(&'static str),
    /// A dotted path to the next URL, e.g. `links.next`
    NextField(&'static str),
    /// The API returns everything in one response
    Single,
}

/// A page of a resource collection
#[derive(Debug, Clone)]
pub struct ResourcePage {
    url: String,
    body: Extractor,
    items_key: &'static str,
    item_key: Option<&'static str>,
    paging: Paging,
}

impl ResourcePage {
    pub fn new(url: String, body: Extractor, items_key: &'static str, paging: Paging) -> Self {
        Self {
            url,
            body,
            items_key,
            item_key: None,
            paging,
        }
    }

    /// Items are each wrapped once more: `[{"<key>": {...}}]`
    pub fn with_item_key(mut self, key: Option<&'static str>) -> Self {
        self.item_key = key;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode this page's items
    pub fn extract<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let Some(item_key) = self.item_key else {
            return self.body.extract_key(self.items_key);
        };

        let items: Vec<Value> = self.body.extract_key(self.items_key)?;
        items
            .into_iter()
            .map(|mut item| -> Result<T> {
                let inner = item
                    .as_object_mut()
                    .and_then(|map| map.remove(item_key))
                    .ok_or_else(|| Error::MissingEnvelopeKey {
                        key: item_key.to_string(),
                    })?;
                Ok(serde_json::from_value(inner)?)
            })
            .collect()
    }
}

impl Page for ResourcePage {
    fn is_empty(&self) -> Result<bool> {
        let items: Vec<Value> = self.body.extract_key(self.items_key)?;
        Ok(items.is_empty())
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let body = match self.paging {
            Paging::Single => return Ok(None),
            _ => self.body.body()?,
        };

        let next = match self.paging {
            Paging::RelLinks(key) => body
                .get(key)
                .and_then(Value::as_array)
                .and_then(|links| {
                    links
                        .iter()
                        .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
                })
                .and_then(|link| link.get("href"))
                .and_then(Value::as_str),
            Paging::NextField(path) => lookup_path(&body, path).and_then(Value::as_str),
            Paging::Single => None,
        };

        Ok(next.filter(|url| !url.is_empty()).map(str::to_string))
    }
}

type PageFactory<P> = Arc<dyn Fn(String, Extractor) -> P + Send + Sync>;

/// Lazy page sequence rooted at one URL
pub struct Pager<P> {
    client: ServiceClient,
    initial_url: String,
    create_page: PageFactory<P>,
}

enum Cursor {
    Next(String),
    Done,
}

impl<P: Page> Pager<P> {
    pub fn new<F>(client: ServiceClient, initial_url: String, create_page: F) -> Self
    where
        F: Fn(String, Extractor) -> P + Send + Sync + 'static,
    {
        Self {
            client,
            initial_url,
            create_page: Arc::new(create_page),
        }
    }

    /// Stream of non-empty pages, fetched on demand
    pub fn into_stream(self) -> BoxStream<'static, Result<P>> {
        let client = self.client;
        let create_page = self.create_page;

        stream::try_unfold(Cursor::Next(self.initial_url), move |cursor| {
            fetch_page(client.clone(), create_page.clone(), cursor)
        })
        .boxed()
    }

    /// Drain every page into memory
    pub async fn all_pages(self) -> Result<Vec<P>> {
        self.into_stream().try_collect().await
    }

    /// Visit pages in order until `handler` returns `false`
    pub async fn each_page<F>(self, mut handler: F) -> Result<()>
    where
        F: FnMut(&P) -> Result<bool>,
    {
        let mut pages = self.into_stream();
        while let Some(page) = pages.try_next().await? {
            if !handler(&page)? {
                break;
            }
        }
        Ok(())
    }
}

impl Pager<ResourcePage> {
    /// Fetch every page and concatenate their items in order
    pub async fn all_items<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for page in self.all_pages().await? {
            items.extend(page.extract::<T>()?);
        }
        Ok(items)
    }
}

async fn fetch_page<P: Page>(
    client: ServiceClient,
    create_page: PageFactory<P>,
    cursor: Cursor,
) -> Result<Option<(P, Cursor)>> {
    let url = match cursor {
        Cursor::Next(url) => url,
        Cursor::Done => return Ok(None),
    };

    let response = client.get(&url, RequestOpts::new()).await?;
    let page = create_page(url.clone(), Extractor::from_response(response));

    if page.is_empty()? {
        tracing::debug!("Empty page at {}, stopping", url);
        return Ok(None);
    }

    let cursor = match page.next_page_url()? {
        Some(next) => {
            let next = resolve(&url, &next)?;
            if next == url {
                tracing::warn!("Next link repeats current page {}, stopping", url);
                Cursor::Done
            } else {
                Cursor::Next(next)
            }
        },
        None => Cursor::Done,
    };

    Ok(Some((page, cursor)))
}

fn resolve(current: &str, next: &str) -> Result<String> {
    Ok(Url::parse(current)?.join(next)?.to_string())
}
