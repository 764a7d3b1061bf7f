//! The resource graph being built.
//!
//! A [`Stack`] is an append-only list of declared resources. Every
//! declaration is checked against what is already declared, so a reference
//! can only point backwards and the engine's dependency ordering stays sound.

mod tags;

pub use tags::AutoTags;

use crate::error::{Error, Result};
use crate::models::{Resource, ResourceKind, ResourceOptions, ResourceRef};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Matches `${logical-name.attribute}` references inside property strings.
/// The attribute is whatever follows the last dot, so names may contain dots.
static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_reference_regex() -> &'static Regex {
    REFERENCE_REGEX
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\.([A-Za-z]+)\}").expect("Invalid Regex"))
}

/// Logical names referenced anywhere inside `value`.
pub fn references(value: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect_references(value, &mut found);
    found
}

fn collect_references(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            for cap in get_reference_regex().captures_iter(s) {
                found.insert(cap[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, found)),
        Value::Object(map) => map.values().for_each(|v| collect_references(v, found)),
        _ => {}
    }
}

/// Declared resources plus the stack-wide options stamped onto each of them.
#[derive(Debug, Clone)]
pub struct Stack {
    protect_resources: bool,
    auto_tags: AutoTags,
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
}

impl Stack {
    /// `auto_tags` already carry the project and stack names.
    pub fn new(protect_resources: bool, auto_tags: AutoTags) -> Self {
        Stack {
            protect_resources,
            auto_tags,
            resources: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn protect_resources(&self) -> bool {
        self.protect_resources
    }

    /// Declare a resource.
    ///
    /// `properties` must be a JSON object. Taggable kinds get the auto tags
    /// plus `Name` when `name_tag` is given; protection comes from the stack.
    pub fn declare(
        &mut self,
        kind: ResourceKind,
        name: String,
        name_tag: Option<String>,
        properties: Value,
    ) -> Result<ResourceRef> {
        if self.index.contains_key(&name) {
            return Err(Error::DuplicateResource(name));
        }
        let mut properties: Map<String, Value> = match properties {
            Value::Object(map) => map,
            other => {
                return Err(Error::declaration(format!(
                    "properties of '{name}' must be an object, got {other}"
                )))
            }
        };

        if let Some(reference) = references(&Value::Object(properties.clone()))
            .into_iter()
            .find(|r| !self.index.contains_key(r))
        {
            return Err(Error::UnresolvedReference {
                resource: name,
                reference,
            });
        }

        if kind.taggable() {
            let tags = self.auto_tags.apply(name_tag.as_deref());
            properties.insert("tags".to_string(), serde_json::to_value(tags)?);
        } else if name_tag.is_some() {
            return Err(Error::declaration(format!(
                "'{name}' is a {} and cannot carry tags",
                kind.type_token()
            )));
        }

        log::debug!("declare {} {name}", kind.type_token());
        self.index.insert(name.clone(), self.resources.len());
        self.resources.push(Resource {
            name: name.clone(),
            kind,
            properties,
            options: ResourceOptions {
                protect: self.protect_resources,
            },
        });
        Ok(ResourceRef::new(name, kind))
    }

    /// Resources in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Logical names the named resource depends on.
    pub fn dependencies(&self, name: &str) -> BTreeSet<String> {
        self.get(name)
            .map(|r| references(&Value::Object(r.properties.clone())))
            .unwrap_or_default()
    }

    /// The `resources` section of the document, keyed by logical name.
    pub fn to_resources_value(&self) -> Result<Value> {
        let mut map = Map::new();
        for resource in &self.resources {
            map.insert(resource.name.clone(), serde_json::to_value(resource)?);
        }
        Ok(Value::Object(map))
    }
}
