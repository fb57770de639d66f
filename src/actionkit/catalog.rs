//! Action catalog — typed view of the descriptors ActionKit returns.
//!
//! The remote catalog is loosely typed JSON. Deserialization here only
//! checks shape; type kinds are judged later by the schema translator so an
//! unknown kind surfaces as an explicit error instead of a parse failure.

use serde::Deserialize;
use serde_json::{Map, Value};

// =============================================================================
// Parameter spec
// =============================================================================

/// One declared property of an action's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    /// Raw `type` value. `None` when the property declares no type.
    pub declared_type: Option<Value>,
    pub description: Option<String>,
}

impl PropertySpec {
    /// The declared type as text, for diagnostics.
    pub fn declared_type_name(&self) -> String {
        match &self.declared_type {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "type", default)]
    declared_type: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

/// An action's parameter definition: ordered properties plus the required set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawParameterSpec")]
pub struct ParameterSpec {
    pub properties: Vec<PropertySpec>,
    pub required: Vec<String>,
}

impl ParameterSpec {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// Explicit nulls are read as absent.
#[derive(Deserialize)]
struct RawParameterSpec {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    required: Option<Vec<String>>,
}

impl TryFrom<RawParameterSpec> for ParameterSpec {
    type Error = serde_json::Error;

    fn try_from(raw: RawParameterSpec) -> Result<Self, Self::Error> {
        let properties = raw
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| {
                let prop: RawProperty = serde_json::from_value(value)?;
                Ok(PropertySpec {
                    name,
                    declared_type: prop.declared_type,
                    description: prop.description,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            properties,
            required: raw.required.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Action descriptor
// =============================================================================

/// A single remotely executable action.
///
/// Accepts both the wrapped form ActionKit serves
/// (`{"type": "function", "function": {...}}`) and a flat
/// `{"name", "description", "parameters"}` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDescriptor")]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSpec,
}

#[derive(Deserialize)]
struct FunctionSpec {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ParameterSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Wrapped { function: FunctionSpec },
    Flat(FunctionSpec),
}

impl From<RawDescriptor> for ActionDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let spec = match raw {
            RawDescriptor::Wrapped { function } => function,
            RawDescriptor::Flat(spec) => spec,
        };
        Self {
            name: spec.name,
            description: spec.description.unwrap_or_default(),
            parameters: spec.parameters.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Actions grouped under one integration (e.g. `slack`).
#[derive(Debug, Clone, PartialEq)]
pub struct Integration {
    pub name: String,
    pub actions: Vec<ActionDescriptor>,
}

/// Every action available to the subject, in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Catalog {
    integrations: Vec<Integration>,
}

impl TryFrom<Map<String, Value>> for Catalog {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let integrations = map
            .into_iter()
            .map(|(name, actions)| {
                Ok(Integration {
                    name,
                    actions: serde_json::from_value(actions)?,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(Self { integrations })
    }
}

impl Catalog {
    pub fn new(integrations: Vec<Integration>) -> Self {
        Self { integrations }
    }

    pub fn integrations(&self) -> &[Integration] {
        &self.integrations
    }

    /// All `(integration, action)` pairs in catalog order.
    pub fn actions(&self) -> impl Iterator<Item = (&str, &ActionDescriptor)> {
        self.integrations
            .iter()
            .flat_map(|i| i.actions.iter().map(move |a| (i.name.as_str(), a)))
    }

    pub fn action_count(&self) -> usize {
        self.integrations.iter().map(|i| i.actions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.action_count() == 0
    }
}

/// Envelope of the catalog endpoint: `{"body": {<integration>: [...]}}`.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub body: Catalog,
}
