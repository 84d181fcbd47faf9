//! Declarative descriptors for the data sources and resources of a provider.
//!
//! A [`Catalog`] is read-only configuration: it is loaded once per run and
//! handed to the generator explicitly.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const BUILTIN_DATA_SOURCES: &str = include_str!("../catalog/data_sources.json");
const BUILTIN_RESOURCES: &str = include_str!("../catalog/resources.json");

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    Required,
    Computed,
    Optional,
    ComputedOptional,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Int,
    Bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requiredness: Requiredness,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub plan_modifiers: Vec<String>,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int,
    Bool,
    SetOfPrimitive { element: Primitive },
    SetNested { attributes: Vec<Attribute> },
    Object { attributes: Vec<Attribute> },
}

impl AttributeKind {
    /// Descriptor spelling of the kind, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Int => "int",
            AttributeKind::Bool => "bool",
            AttributeKind::SetOfPrimitive { .. } => "set_of_primitive",
            AttributeKind::SetNested { .. } => "set_nested",
            AttributeKind::Object { .. } => "object",
        }
    }
}

impl Attribute {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            AttributeKind::String | AttributeKind::Int | AttributeKind::Bool
        )
    }

    /// Child attributes of nested kinds, `None` for everything else.
    pub fn children(&self) -> Option<&[Attribute]> {
        match &self.kind {
            AttributeKind::SetNested { attributes } | AttributeKind::Object { attributes } => {
                Some(attributes)
            }
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PaginateHooks {
    pub read_init_loop: Option<String>,
    pub read_pre_iterate: Option<String>,
    pub read_post_iterate: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimpleApi {
    pub model: String,
    pub read_method: String,
    #[serde(default)]
    pub read_request_attributes: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaginateApi {
    pub model: String,
    pub read_method: String,
    #[serde(default)]
    pub read_request_attributes: Vec<String>,
    #[serde(default)]
    pub results_attribute: Option<String>,
    #[serde(default)]
    pub limit_attribute: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub hooks: PaginateHooks,
}

fn default_page_size() -> u64 {
    100
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DataSourceApi {
    Simple(SimpleApi),
    Paginate(PaginateApi),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataSource {
    pub name: String,
    pub description: String,
    pub api: DataSourceApi,
    pub attributes: Vec<Attribute>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceApi {
    pub model: String,
    pub create_method: String,
    #[serde(default)]
    pub create_request_attributes: Vec<String>,
    pub read_method: String,
    #[serde(default)]
    pub read_request_attributes: Vec<String>,
    #[serde(default)]
    pub update_method: Option<String>,
    #[serde(default)]
    pub update_request_attributes: Vec<String>,
    #[serde(default)]
    pub delete_method: Option<String>,
    #[serde(default)]
    pub delete_request_attributes: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub description: String,
    pub api: ResourceApi,
    #[serde(default)]
    pub import_key_attributes: Vec<String>,
    pub attributes: Vec<Attribute>,
}

/// Borrowed view over either kind of entity.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    DataSource(&'a DataSource),
    Resource(&'a Resource),
}

impl<'a> Entity<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Entity::DataSource(d) => &d.name,
            Entity::Resource(r) => &r.name,
        }
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        match self {
            Entity::DataSource(d) => &d.attributes,
            Entity::Resource(r) => &r.attributes,
        }
    }

    /// Human readable label used in logs and errors, e.g. `data source "users"`.
    pub fn label(&self) -> String {
        match self {
            Entity::DataSource(d) => format!("data source \"{}\"", d.name),
            Entity::Resource(r) => format!("resource \"{}\"", r.name),
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Entity::DataSource(d) => format!("data_source_{}.go", d.name),
            Entity::Resource(r) => format!("resource_{}.go", r.name),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Catalog {
    /// The descriptors compiled into the generator.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            data_sources: serde_json::from_str(BUILTIN_DATA_SOURCES)?,
            resources: serde_json::from_str(BUILTIN_RESOURCES)?,
        })
    }

    /// Data sources first, then resources, each in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        self.data_sources
            .iter()
            .map(Entity::DataSource)
            .chain(self.resources.iter().map(Entity::Resource))
    }
}

pub fn read_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| crate::error::Error::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
