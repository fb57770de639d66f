//! Schema translation — action parameter specs to validated tool schemas.
//!
//! Every declared property maps onto a closed set of kinds. Anything outside
//! that set is an explicit `UnsupportedType` error, never a silent omission.

use serde_json::{Map, Value};

use crate::actionkit::catalog::{ActionDescriptor, PropertySpec};
use crate::types::{Error, Result, SchemaConfig, StringLengthMode};

// =============================================================================
// Parameter kinds
// =============================================================================

/// Declared kind of an action property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    StringArray,
    /// Passed over the wire as an opaque string, not validated structurally.
    Object,
}

impl ParamKind {
    /// Map a declared JSON `type` onto a kind. `None` for anything unsupported.
    pub fn from_declared(declared: Option<&Value>) -> Option<Self> {
        match declared?.as_str()? {
            "string" => Some(ParamKind::String),
            "boolean" => Some(ParamKind::Boolean),
            "array" => Some(ParamKind::StringArray),
            "object" => Some(ParamKind::Object),
            _ => None,
        }
    }
}

// =============================================================================
// Parameter types
// =============================================================================

/// Length constraint on text parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimit {
    pub chars: usize,
    pub mode: StringLengthMode,
}

impl LengthLimit {
    fn check(&self, s: &str) -> std::result::Result<(), String> {
        let len = s.chars().count();
        match self.mode {
            StringLengthMode::Max if len > self.chars => Err(format!(
                "expected at most {} characters, got {}",
                self.chars, len
            )),
            StringLengthMode::Exact if len != self.chars => Err(format!(
                "expected exactly {} characters, got {}",
                self.chars, len
            )),
            _ => Ok(()),
        }
    }
}

/// Validation rule for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Text(LengthLimit),
    Bool,
    StringList,
    /// Accepts `null` (and absence) in addition to the inner type.
    Nullable(Box<ParamType>),
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ParamType::Text(limit) => match value.as_str() {
                Some(s) => limit.check(s),
                None => Err(format!("expected string, got {}", value_type_name(value))),
            },
            ParamType::Bool => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("expected boolean, got {}", value_type_name(value)))
                }
            }
            ParamType::StringList => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| format!("expected array, got {}", value_type_name(value)))?;
                for (i, item) in arr.iter().enumerate() {
                    if !item.is_string() {
                        return Err(format!(
                            "expected string at index {}, got {}",
                            i,
                            value_type_name(item)
                        ));
                    }
                }
                Ok(())
            }
            ParamType::Nullable(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }

    /// JSON Schema fragment for this type.
    pub fn to_json_schema(&self) -> Value {
        let (base, nullable) = match self {
            ParamType::Nullable(inner) => (inner.as_ref(), true),
            other => (other, false),
        };
        let type_name = match base {
            ParamType::Text(_) => "string",
            ParamType::Bool => "boolean",
            ParamType::StringList => "array",
            ParamType::Nullable(_) => return base.to_json_schema(),
        };

        let mut schema = Map::new();
        let json_type = if nullable {
            serde_json::json!([type_name, "null"])
        } else {
            Value::from(type_name)
        };
        schema.insert("type".to_string(), json_type);

        match base {
            ParamType::Text(limit) => {
                if limit.mode == StringLengthMode::Exact {
                    schema.insert("minLength".to_string(), Value::from(limit.chars));
                }
                schema.insert("maxLength".to_string(), Value::from(limit.chars));
            }
            ParamType::StringList => {
                schema.insert("items".to_string(), serde_json::json!({ "type": "string" }));
            }
            ParamType::Bool | ParamType::Nullable(_) => {}
        }

        Value::Object(schema)
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single translated parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    pub kind: ParamKind,
    pub param_type: ParamType,
    pub description: Option<String>,
}

impl ParamDef {
    pub fn is_required(&self) -> bool {
        !matches!(self.param_type, ParamType::Nullable(_))
    }
}

// =============================================================================
// Tool schema
// =============================================================================

/// Validated-input contract of one tool. Immutable after translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSchema {
    params: Vec<ParamDef>,
}

impl ToolSchema {
    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Collect every violation in `arguments` (empty = valid).
    pub fn errors(&self, arguments: &Map<String, Value>) -> Vec<String> {
        let mut errors = Vec::new();

        for param in &self.params {
            match arguments.get(&param.name) {
                None if param.is_required() => {
                    errors.push(format!("Missing required parameter: {}", param.name));
                }
                None => {}
                Some(value) => {
                    if let Err(e) = param.param_type.validate(value) {
                        errors.push(format!("Parameter '{}': {}", param.name, e));
                    }
                }
            }
        }

        errors
    }

    /// Validate call arguments and return the parameters to forward.
    ///
    /// `null` counts as an empty argument object. Keys the schema does not
    /// declare are dropped; declared values pass through unchanged.
    pub fn validate(&self, arguments: &Value) -> Result<Map<String, Value>> {
        let empty = Map::new();
        let map = match arguments {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(Error::validation(format!(
                    "Parameters must be a JSON object, got {}",
                    value_type_name(other)
                )))
            }
        };

        let errors = self.errors(map);
        if !errors.is_empty() {
            return Err(Error::validation(errors.join("; ")));
        }

        let mut validated = Map::new();
        for (key, value) in map {
            if self.get(key).is_some() {
                validated.insert(key.clone(), value.clone());
            } else {
                tracing::debug!(parameter = %key, "Dropping undeclared parameter");
            }
        }
        Ok(validated)
    }

    /// JSON Schema object describing the tool input.
    pub fn to_input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut schema = param.param_type.to_json_schema();
            if let (Some(map), Some(description)) = (schema.as_object_mut(), &param.description) {
                map.insert("description".to_string(), Value::from(description.as_str()));
            }
            properties.insert(param.name.clone(), schema);
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}

// =============================================================================
// Translator
// =============================================================================

/// Turns action descriptors into tool schemas.
#[derive(Debug, Clone)]
pub struct SchemaTranslator {
    text_limit: LengthLimit,
}

impl Default for SchemaTranslator {
    fn default() -> Self {
        Self::new(&SchemaConfig::default())
    }
}

impl SchemaTranslator {
    pub fn new(config: &SchemaConfig) -> Self {
        Self {
            text_limit: LengthLimit {
                chars: config.string_max_len,
                mode: config.string_length_mode,
            },
        }
    }

    /// Translate one descriptor. Fails on the first unsupported property or on
    /// a required entry naming an undeclared property.
    pub fn translate(&self, descriptor: &ActionDescriptor) -> Result<ToolSchema> {
        let spec = &descriptor.parameters;

        if let Some(missing) = spec.required.iter().find(|r| spec.property(r).is_none()) {
            return Err(Error::validation(format!(
                "action '{}' requires undeclared property '{}'",
                descriptor.name, missing
            )));
        }

        let params = spec
            .properties
            .iter()
            .map(|prop| self.translate_property(descriptor, prop, spec.is_required(&prop.name)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ToolSchema { params })
    }

    fn translate_property(
        &self,
        descriptor: &ActionDescriptor,
        prop: &PropertySpec,
        required: bool,
    ) -> Result<ParamDef> {
        let kind = ParamKind::from_declared(prop.declared_type.as_ref()).ok_or_else(|| {
            Error::unsupported_type(&descriptor.name, &prop.name, prop.declared_type_name())
        })?;

        let base = match kind {
            ParamKind::String | ParamKind::Object => ParamType::Text(self.text_limit),
            ParamKind::Boolean => ParamType::Bool,
            ParamKind::StringArray => ParamType::StringList,
        };
        let param_type = if required {
            base
        } else {
            ParamType::Nullable(Box::new(base))
        };

        Ok(ParamDef {
            name: prop.name.clone(),
            kind,
            param_type,
            description: prop.description.clone(),
        })
    }
}

/// Translate with the default rules.
pub fn translate(descriptor: &ActionDescriptor) -> Result<ToolSchema> {
    SchemaTranslator::default().translate(descriptor)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn descriptor(value: Value) -> ActionDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn a_b_descriptor() -> ActionDescriptor {
        descriptor(json!({
            "name": "demo",
            "parameters": {
                "properties": {
                    "a": { "type": "string" },
                    "b": { "type": "boolean" },
                },
                "required": ["a"],
            },
        }))
    }

    #[test]
    fn test_round_trip_required_and_optional() {
        let schema = translate(&a_b_descriptor()).unwrap();

        assert!(schema.validate(&json!({"a": "x"})).is_ok());
        assert!(schema.validate(&json!({"a": "x", "b": null})).is_ok());
        assert!(schema.validate(&json!({"a": "x", "b": true})).is_ok());
        assert!(schema.validate(&json!({})).is_err());
        assert!(schema.validate(&json!({"a": 123})).is_err());
    }

    #[test]
    fn test_required_rejects_null() {
        let schema = translate(&a_b_descriptor()).unwrap();
        let err = schema.validate(&json!({"a": null})).unwrap_err();
        assert!(err.to_string().contains("expected string, got null"));
    }

    #[test]
    fn test_kinds_map_to_rules() {
        let schema = translate(&descriptor(json!({
            "name": "kinds",
            "parameters": {
                "properties": {
                    "text": { "type": "string" },
                    "payload": { "type": "object" },
                    "flag": { "type": "boolean" },
                    "tags": { "type": "array" },
                },
                "required": ["text", "payload", "flag", "tags"],
            },
        })))
        .unwrap();

        let limit = LengthLimit { chars: 255, mode: StringLengthMode::Max };
        let types: Vec<(&str, ParamKind, &ParamType)> = schema
            .params()
            .iter()
            .map(|p| (p.name.as_str(), p.kind, &p.param_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("text", ParamKind::String, &ParamType::Text(limit)),
                ("payload", ParamKind::Object, &ParamType::Text(limit)),
                ("flag", ParamKind::Boolean, &ParamType::Bool),
                ("tags", ParamKind::StringArray, &ParamType::StringList),
            ]
        );
    }

    #[test]
    fn test_object_kind_is_opaque_string() {
        let schema = translate(&descriptor(json!({
            "name": "create_record",
            "parameters": {
                "properties": { "fields": { "type": "object" } },
                "required": ["fields"],
            },
        })))
        .unwrap();

        assert!(schema.validate(&json!({"fields": "{\"Name\":\"Ada\"}"})).is_ok());
        assert!(schema.validate(&json!({"fields": {"Name": "Ada"}})).is_err());
    }

    #[test]
    fn test_string_array_items_must_be_strings() {
        let schema = translate(&descriptor(json!({
            "name": "tag",
            "parameters": {
                "properties": { "tags": { "type": "array" } },
                "required": ["tags"],
            },
        })))
        .unwrap();

        assert!(schema.validate(&json!({"tags": []})).is_ok());
        assert!(schema.validate(&json!({"tags": ["a", "b"]})).is_ok());
        let err = schema.validate(&json!({"tags": ["a", 2]})).unwrap_err();
        assert!(err.to_string().contains("expected string at index 1, got number"));
    }

    #[test]
    fn test_unsupported_type_is_explicit() {
        let err = translate(&descriptor(json!({
            "name": "create_task",
            "parameters": {
                "properties": {
                    "title": { "type": "string" },
                    "priority": { "type": "integer" },
                },
            },
        })))
        .unwrap_err();

        match err {
            Error::UnsupportedType { action, property, declared } => {
                assert_eq!(action, "create_task");
                assert_eq!(property, "priority");
                assert_eq!(declared, "integer");
            }
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_type_is_unsupported() {
        let err = translate(&descriptor(json!({
            "name": "untyped",
            "parameters": { "properties": { "x": {} } },
        })))
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }

    #[test]
    fn test_required_must_reference_declared_property() {
        let err = translate(&descriptor(json!({
            "name": "broken",
            "parameters": {
                "properties": { "a": { "type": "string" } },
                "required": ["a", "ghost"],
            },
        })))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_length_limit_modes() {
        let long = "x".repeat(256);
        let exact = "x".repeat(255);
        let schema = translate(&a_b_descriptor()).unwrap();
        assert!(schema.validate(&json!({"a": exact})).is_ok());
        assert!(schema.validate(&json!({"a": long})).is_err());

        let strict = SchemaTranslator::new(&SchemaConfig {
            string_max_len: 255,
            string_length_mode: StringLengthMode::Exact,
        })
        .translate(&a_b_descriptor())
        .unwrap();
        assert!(strict.validate(&json!({"a": exact})).is_ok());
        let err = strict.validate(&json!({"a": "x"})).unwrap_err();
        assert!(err.to_string().contains("expected exactly 255 characters, got 1"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let schema = translate(&a_b_descriptor()).unwrap();
        let errors = schema.errors(json!({"b": "yes"}).as_object().unwrap());
        assert_eq!(
            errors,
            vec![
                "Missing required parameter: a".to_string(),
                "Parameter 'b': expected boolean, got string".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_strips_undeclared_and_keeps_values() {
        let schema = translate(&a_b_descriptor()).unwrap();
        let validated = schema
            .validate(&json!({"a": "x", "b": null, "extra": 1}))
            .unwrap();
        assert_eq!(Value::Object(validated), json!({"a": "x", "b": null}));
    }

    #[test]
    fn test_validate_rejects_non_object_and_accepts_null() {
        let schema = translate(&descriptor(json!({ "name": "no_params" }))).unwrap();
        assert!(schema.validate(&Value::Null).unwrap().is_empty());
        assert!(matches!(
            schema.validate(&json!(["a"])),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_input_schema_rendering() {
        let schema = translate(&descriptor(json!({
            "name": "send_message",
            "parameters": {
                "properties": {
                    "channel": { "type": "string", "description": "Channel id" },
                    "urgent": { "type": "boolean" },
                    "cc": { "type": "array" },
                },
                "required": ["channel"],
            },
        })))
        .unwrap();

        assert_eq!(
            schema.to_input_schema(),
            json!({
                "type": "object",
                "properties": {
                    "channel": { "type": "string", "maxLength": 255, "description": "Channel id" },
                    "urgent": { "type": ["boolean", "null"] },
                    "cc": { "type": ["array", "null"], "items": { "type": "string" } },
                },
                "required": ["channel"],
            })
        );
    }

    #[test]
    fn test_translation_is_idempotent() {
        let d = a_b_descriptor();
        assert_eq!(translate(&d).unwrap(), translate(&d).unwrap());
    }

    proptest! {
        #[test]
        fn prop_required_string_accepts_short_text(s in "[a-zA-Z0-9 ]{0,255}") {
            let schema = translate(&a_b_descriptor()).unwrap();
            let input = json!({"a": s});
            prop_assert!(schema.validate(&input).is_ok());
        }

        #[test]
        fn prop_required_string_cannot_be_omitted(b in proptest::option::of(any::<bool>())) {
            let schema = translate(&a_b_descriptor()).unwrap();
            let input = json!({"b": b});
            prop_assert!(schema.validate(&input).is_err());
        }

        #[test]
        fn prop_optional_bool_accepts_null_absent_or_bool(b in proptest::option::of(any::<bool>()), omit in any::<bool>()) {
            let schema = translate(&a_b_descriptor()).unwrap();
            let args = if omit { json!({"a": "x"}) } else { json!({"a": "x", "b": b}) };
            prop_assert!(schema.validate(&args).is_ok());
        }
    }
}
