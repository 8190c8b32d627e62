//! Resource model.
//!
//! Resources are the rows of the timeline: machines, lines, crews.
//! They are immutable for the lifetime of a view and keyed by their
//! external id, which is what operations reference.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A resource that operations can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Database identifier (used by the mutation collaborator).
    pub id: i64,
    /// External identifier. Operations reference this, not `id`.
    pub external_id: String,
    /// Human-readable name.
    pub name: String,
    /// Resource classification.
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<i64>,
}

/// Resource type classification.
///
/// Serialized as a plain string; unknown strings round-trip through
/// [`ResourceType::Custom`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    /// Machine or production line.
    #[default]
    Equipment,
    /// Operator or crew.
    Labor,
    /// Tooling, fixture, mold.
    Tool,
    /// Domain-specific type.
    Custom(String),
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "" | "equipment" => ResourceType::Equipment,
            "labor" => ResourceType::Labor,
            "tool" => ResourceType::Tool,
            _ => ResourceType::Custom(value),
        }
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Equipment => f.write_str("Equipment"),
            ResourceType::Labor => f.write_str("Labor"),
            ResourceType::Tool => f.write_str("Tool"),
            ResourceType::Custom(s) => f.write_str(s),
        }
    }
}

impl Resource {
    /// Creates a new equipment resource.
    pub fn new(id: i64, external_id: impl Into<String>) -> Self {
        Self {
            id,
            external_id: external_id.into(),
            name: String::new(),
            resource_type: ResourceType::Equipment,
            description: None,
            plant_id: None,
        }
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the resource type.
    pub fn with_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the owning plant.
    pub fn with_plant(mut self, plant_id: i64) -> Self {
        self.plant_id = Some(plant_id);
        self
    }

    /// Name shown in the label pane, falling back to the external id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.external_id
        } else {
            &self.name
        }
    }
}

/// Display names with duplicates disambiguated: `Mixer`, `Mixer (2)`, ...
///
/// Returned in the same order as `resources`, and all distinct: a suffix
/// that collides with a name already emitted is skipped. Ids are never
/// touched.
pub fn disambiguated_names(resources: &[Resource]) -> Vec<String> {
    let mut emitted: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    resources
        .iter()
        .map(|r| {
            let base = r.label();
            let mut name = base.to_string();
            if emitted.contains(&name) {
                let n = next_suffix.entry(base).or_insert(2);
                loop {
                    name = format!("{base} ({n})");
                    *n += 1;
                    if !emitted.contains(&name) {
                        break;
                    }
                }
            }
            emitted.insert(name.clone());
            name
        })
        .collect()
}
