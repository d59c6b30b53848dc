//! Typed data model: class declarations and the serializer that validates
//! `$class`-tagged JSON against them.

use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved field carrying the class tag on every modeled object.
pub const CLASS_FIELD: &str = "$class";

/// Primitive field types a class may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Long,
    Double,
    Boolean,
}

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            // JSON has one number type; a Long must be integral, a Double
            // accepts any number (5 and 5.0 are the same Double).
            FieldType::Long => value.is_i64() || value.is_u64(),
            FieldType::Double => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Long => "Long",
            FieldType::Double => "Double",
            FieldType::Boolean => "Boolean",
        }
    }
}

/// Field name -> type for one class.
pub type ClassDef = BTreeMap<String, FieldType>;

/// The template's model: which classes exist, and which of them are the
/// clause data class and the contract state class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Fully-qualified name of the clause data class.
    pub data: String,
    /// Fully-qualified name of the contract state class.
    pub state: String,
    /// All class declarations, keyed by fully-qualified name.
    pub classes: BTreeMap<String, ClassDef>,
}

impl Model {
    pub fn class(&self, name: &str) -> Result<&ClassDef> {
        self.classes
            .get(name)
            .ok_or_else(|| TemplateError::Model(format!("class '{name}' is not declared")))
    }
}

/// Validates `$class`-tagged JSON values against the model.
pub struct Serializer<'t> {
    model: &'t Model,
}

impl<'t> Serializer<'t> {
    pub fn new(model: &'t Model) -> Self {
        Self { model }
    }

    /// Check that `value` is a well-formed instance of `class_name`:
    /// matching `$class` tag, every declared field present with the right
    /// JSON type, no undeclared fields. Returns the validated value.
    pub fn validate(&self, value: &Value, class_name: &str) -> Result<Value> {
        let def = self.model.class(class_name)?;
        let obj = value.as_object().ok_or_else(|| {
            TemplateError::Schema(format!("expected an object for class '{class_name}'"))
        })?;
        match obj.get(CLASS_FIELD).and_then(Value::as_str) {
            Some(tag) if tag == class_name => {}
            Some(tag) => {
                return Err(TemplateError::Schema(format!(
                    "expected class '{class_name}', got '{tag}'"
                )))
            }
            None => {
                return Err(TemplateError::Schema(format!(
                    "missing '{CLASS_FIELD}' tag (expected '{class_name}')"
                )))
            }
        }
        for (field, ty) in def {
            let field_value = obj.get(field).ok_or_else(|| {
                TemplateError::Schema(format!("class '{class_name}': missing field '{field}'"))
            })?;
            if !ty.matches(field_value) {
                return Err(TemplateError::Schema(format!(
                    "class '{class_name}': field '{field}' is not a {}",
                    ty.name()
                )));
            }
        }
        for key in obj.keys() {
            if key != CLASS_FIELD && !def.contains_key(key) {
                return Err(TemplateError::Schema(format!(
                    "class '{class_name}': unknown field '{key}'"
                )));
            }
        }
        Ok(value.clone())
    }
}
