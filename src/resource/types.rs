use crate::error::ConfigurationError;
use crate::settings::SettingsPatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Marker attached to a type, field or method
///
/// `values` holds arbitrary YAML/JSON; [`Marker::values`] flattens it into
/// primitive key/value pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Marker name (e.g. `CrudResource`, `Relation`, `ManyToMany`)
    pub name: String,
    /// Raw marker values
    #[serde(default, rename = "values")]
    pub raw: serde_json::Map<String, Value>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: serde_json::Map::new(),
        }
    }

    /// Builder used by tests and programmatic catalogs
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw.insert(key.into(), value.into());
        self
    }

    /// Flattened, primitive view of the marker values
    pub fn values(&self, location: impl Into<String>) -> MarkerValues {
        let mut flat = BTreeMap::new();
        flatten_into(&mut flat, None, &self.raw);
        MarkerValues {
            location: location.into(),
            values: flat,
        }
    }
}

fn flatten_into(
    out: &mut BTreeMap<String, String>,
    prefix: Option<&str>,
    map: &serde_json::Map<String, Value>,
) {
    for (key, value) in map {
        let key = match prefix {
            Some(prefix) => format!("{prefix}/{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(out, Some(&key), inner),
            Value::Null => {}
            other => {
                out.insert(key, primitive_text(other));
            }
        }
    }
}

fn primitive_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(primitive_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Primitive key/value pairs resolved from one marker
///
/// Nested maps use `outer/inner` keys; arrays are joined with `,`.
/// An empty string counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerValues {
    location: String,
    values: BTreeMap<String, String>,
}

impl MarkerValues {
    /// Member the values were read from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Non-empty text value for `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`, in order
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Boolean value with a default
    pub fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigurationError> {
        match self.text(key) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(self.invalid(key, raw)),
            },
        }
    }

    /// Comma-separated list value
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.text(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Error for a value that could not be interpreted
    pub fn invalid(&self, key: &str, value: &str) -> ConfigurationError {
        ConfigurationError::InvalidMarkerValue {
            location: self.location.clone(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over every flattened pair
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Declared field of a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    /// Type expression, e.g. `i32`, `shop.CustomerDao`, `List<shop.ProductEntity>`
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

/// Declared method of a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

/// Declared type with its members, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully qualified id, `.` or `::` separated
    pub id: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            markers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Member whose markers are being inspected
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Type(&'a TypeDecl),
    Field(&'a TypeDecl, &'a FieldDecl),
    Method(&'a TypeDecl, &'a MethodDecl),
}

impl<'a> Member<'a> {
    /// Markers declared directly on the member
    pub fn markers(&self) -> &'a [Marker] {
        match self {
            Member::Type(ty) => &ty.markers,
            Member::Field(_, field) => &field.markers,
            Member::Method(_, method) => &method.markers,
        }
    }

    /// `type`, `type#field` or `type#method()`
    pub fn location(&self) -> String {
        match self {
            Member::Type(ty) => ty.id.clone(),
            Member::Field(ty, field) => format!("{}#{}", ty.id, field.name),
            Member::Method(ty, method) => format!("{}#{}()", ty.id, method.name),
        }
    }
}

/// First marker named `name`
pub fn find_marker<'a>(markers: &'a [Marker], name: &str) -> Option<&'a Marker> {
    markers.iter().find(|m| m.name == name)
}

/// Whether any marker named `name` is present
pub fn has_marker(markers: &[Marker], name: &str) -> bool {
    find_marker(markers, name).is_some()
}

/// A resource catalog: declared types plus optional settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Human title, slugified for output naming
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsPatch>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_values() {
        let marker: Marker = serde_json::from_value(json!({
            "name": "CrudResource",
            "values": {
                "value": "/orders",
                "withRelations": false,
                "dtoConfig": { "list": "shop.OrderListDto", "request": "" },
                "methods": ["GET", "POST"],
                "pageSize": 50,
                "unset": null
            }
        }))
        .unwrap();
        let values = marker.values("shop.OrderController");
        assert_eq!(values.text("value"), Some("/orders"));
        assert_eq!(values.text("dtoConfig/list"), Some("shop.OrderListDto"));
        assert_eq!(values.text("dtoConfig/request"), None);
        assert_eq!(values.text("unset"), None);
        assert_eq!(values.text("pageSize"), Some("50"));
        assert_eq!(values.list("methods"), vec!["GET", "POST"]);
        assert!(!values.flag("withRelations", true).unwrap());
        assert_eq!(values.location(), "shop.OrderController");
    }

    #[test]
    fn flag_rejects_garbage() {
        let values = Marker::new("CrudResource")
            .with("withRelations", "sometimes")
            .values("x");
        let err = values.flag("withRelations", true).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidMarkerValue { .. }));
    }

    #[test]
    fn first_of_respects_order() {
        let values = Marker::new("CrudResource")
            .with("dto", "shop.OrderDto")
            .values("x");
        assert_eq!(values.first_of(&["dtoConfig/value", "dto"]), Some("shop.OrderDto"));
    }

    #[test]
    fn member_locations() {
        let mut ty = TypeDecl::new("shop.OrderModel");
        ty.fields.push(FieldDecl {
            name: "products".into(),
            ty: "List<shop.ProductEntity>".into(),
            markers: vec![Marker::new("ManyToMany")],
        });
        let field = &ty.fields[0];
        assert_eq!(Member::Field(&ty, field).location(), "shop.OrderModel#products");
        assert!(has_marker(Member::Field(&ty, field).markers(), "ManyToMany"));
        assert!(ty.field("products").is_some());
    }
}
