//! Resource schemas
//!
//! Each resource and data source declares its attributes: type, whether the
//! user must, may or cannot set them, and whether changing them forces a
//! replacement. Configurations are validated against the schema before any
//! API call is made.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    String,
    Int,
    Bool,
    List,
    Map,
    Object,
}

impl AttrType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            AttrType::String => value.is_string(),
            AttrType::Int => value.is_i64() || value.is_u64(),
            AttrType::Bool => value.is_boolean(),
            AttrType::List => value.is_array(),
            AttrType::Map | AttrType::Object => value.is_object(),
        }
    }
}

/// One declared attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttrType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    const fn base(name: &'static str, kind: AttrType) -> Self {
        Self {
            name,
            kind,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            description: "",
        }
    }

    /// Must be set by the user
    pub const fn required(name: &'static str, kind: AttrType) -> Self {
        let mut attr = Self::base(name, kind);
        attr.required = true;
        attr
    }

    /// May be set by the user
    pub const fn optional(name: &'static str, kind: AttrType) -> Self {
        let mut attr = Self::base(name, kind);
        attr.optional = true;
        attr
    }

    /// Set by the API only
    pub const fn computed(name: &'static str, kind: AttrType) -> Self {
        let mut attr = Self::base(name, kind);
        attr.computed = true;
        attr
    }

    /// May be set; the API fills it in otherwise
    pub const fn optional_computed(name: &'static str, kind: AttrType) -> Self {
        let mut attr = Self::base(name, kind);
        attr.optional = true;
        attr.computed = true;
        attr
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Whether a user may put this attribute in a configuration
    pub fn configurable(&self) -> bool {
        self.required || self.optional
    }
}

/// Attributes of one resource type
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self {
            description,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Problems with a user configuration, empty when it is valid
    pub fn validate(&self, config: &Map<String, Value>) -> Vec<Diagnostic> {
        self.check(config, |_| true)
    }

    /// Problems with a planned update of `prior`
    ///
    /// Write-only attributes (image refs, passwords) are never returned by
    /// the API, so a required attribute missing from `prior` may stay unset.
    pub fn validate_update(&self, prior: &Map<String, Value>, planned: &Map<String, Value>) -> Vec<Diagnostic> {
        self.check(planned, |name| prior.contains_key(name))
    }

    fn check(&self, config: &Map<String, Value>, must_be_set: impl Fn(&str) -> bool) -> Vec<Diagnostic> {
        let mut diags = Vec::new();

        for attr in self.attributes.iter().filter(|a| a.required && must_be_set(a.name)) {
            if config.get(attr.name).map_or(true, Value::is_null) {
                diags.push(Diagnostic::new(attr.name, "required attribute is missing"));
            }
        }

        for (name, value) in config {
            if value.is_null() {
                continue;
            }
            match self.attribute(name) {
                None => diags.push(Diagnostic::new(name, "unknown attribute")),
                Some(attr) if !attr.configurable() => {
                    diags.push(Diagnostic::new(name, "attribute is computed and cannot be set"))
                },
                Some(attr) if !attr.kind.accepts(value) => diags.push(Diagnostic::new(
                    name,
                    &format!("expected {:?}, got {}", attr.kind, value),
                )),
                Some(_) => {},
            }
        }

        diags
    }

    /// Configurable attributes whose value differs between two attribute maps
    pub fn changed_attributes(&self, prior: &Map<String, Value>, planned: &Map<String, Value>) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.configurable())
            .filter(|a| {
                let Some(new) = planned.get(a.name) else {
                    return false;
                };
                prior.get(a.name).unwrap_or(&Value::Null) != new
            })
            .collect()
    }

    /// Typed value for a `key=value` argument
    ///
    /// Declared attributes follow their [`AttrType`]; undeclared keys (list
    /// options such as `limit`) become numbers or booleans when they parse
    /// as one. Anything else stays a string.
    pub fn coerce(&self, name: &str, raw: &str) -> Value {
        let parsed = serde_json::from_str::<Value>(raw).ok();
        let typed = match self.attribute(name).map(|a| a.kind) {
            Some(AttrType::String) => None,
            Some(kind) => parsed.filter(|v| kind.accepts(v)),
            None => parsed.filter(|v| v.is_number() || v.is_boolean()),
        };
        typed.unwrap_or_else(|| Value::String(raw.to_string()))
    }

    /// Copy only the attributes this schema declares
    pub fn project(&self, value: &Value) -> Map<String, Value> {
        let mut out = Map::new();
        if let Some(map) = value.as_object() {
            for attr in &self.attributes {
                if let Some(v) = map.get(attr.name) {
                    out.insert(attr.name.to_string(), v.clone());
                }
            }
        }
        out
    }
}

/// A validation problem tied to one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub attribute: String,
    pub summary: String,
}

impl Diagnostic {
    pub fn new(attribute: &str, summary: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            summary: summary.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attribute, self.summary)
    }
}
