//! Declarative field schema and document validation.

use serde_json::Value;

use exposer_core::{Document, FieldViolation, ModelError, ModelResult};

/// JSON kind a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Any,
}

impl FieldKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            // i64 range only.
            FieldKind::Integer => value.is_i64(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Any => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        }
    }

    /// Interpret a query-string value as this kind.
    ///
    /// Falls back to the raw string when it does not parse, so a filter on a
    /// numeric field with a non-numeric value simply matches nothing.
    pub fn coerce(self, raw: &str) -> Value {
        let parsed = match self {
            FieldKind::Number => raw.parse::<f64>().ok().and_then(|n| serde_json::Number::from_f64(n).map(Value::Number)),
            FieldKind::Integer => raw.parse::<i64>().ok().map(Value::from),
            FieldKind::Boolean => raw.parse::<bool>().ok().map(Value::Bool),
            _ => None,
        };
        parsed.unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
            default: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of fields a model persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.unique)
    }

    /// Normalize `document` in place and check it against the schema.
    ///
    /// Unknown keys are dropped, `null` unsets optional fields, defaults fill
    /// missing fields. Every violation is collected before failing.
    pub fn validate(&self, document: &mut Document) -> ModelResult<()> {
        document.retain(|key, _| self.has_field(key));

        let mut violations = Vec::new();
        for spec in &self.fields {
            let present = document.get(spec.name).is_some_and(|v| !v.is_null());
            if !present {
                document.remove(spec.name);
                match (&spec.default, spec.required) {
                    (Some(default), _) => {
                        document.insert(spec.name.to_string(), default.clone());
                    }
                    (None, true) => violations.push(FieldViolation::new(
                        spec.name,
                        format!("field `{}` is required", spec.name),
                        Value::Null,
                    )),
                    (None, false) => {}
                }
                continue;
            }

            if let Some(value) = document.get(spec.name) {
                if !spec.kind.accepts(value) {
                    violations.push(FieldViolation::new(
                        spec.name,
                        format!("field `{}` must be of type {}", spec.name, spec.kind.name()),
                        value.clone(),
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ModelError::validation(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field(FieldSpec::string("title").required())
            .field(FieldSpec::integer("priority").default_value(0))
            .field(FieldSpec::boolean("published").default_value(false))
            .field(FieldSpec::string("notes"))
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn fills_defaults_and_drops_unknown_keys() {
        let mut d = doc(json!({"title": "Hello", "rogue": 1}));
        schema().validate(&mut d).unwrap();
        assert_eq!(Value::Object(d), json!({"title": "Hello", "priority": 0, "published": false}));
    }

    #[test]
    fn null_unsets_optional_field() {
        let mut d = doc(json!({"title": "Hello", "notes": null}));
        schema().validate(&mut d).unwrap();
        assert!(!d.contains_key("notes"));
    }

    #[test]
    fn collects_every_violation() {
        let mut d = doc(json!({"priority": "high", "published": "yes"}));
        let err = schema().validate(&mut d).unwrap_err();
        let ModelError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "priority", "published"]);
        assert_eq!(violations[1].value, json!("high"));
        assert_eq!(violations[0].value, Value::Null);
    }

    #[test]
    fn integer_kind_rejects_fractions() {
        assert!(!FieldKind::Integer.accepts(&json!(1.5)));
        assert!(FieldKind::Integer.accepts(&json!(-3)));
        assert!(FieldKind::Number.accepts(&json!(1.5)));
    }

    #[test]
    fn integer_kind_rejects_values_beyond_i64() {
        assert!(FieldKind::Integer.accepts(&json!(i64::MAX)));
        assert!(!FieldKind::Integer.accepts(&json!(u64::MAX)));
        assert!(!FieldKind::Integer.accepts(&json!(9_223_372_036_854_775_808u64)));

        let mut d = doc(json!({"title": "Big", "priority": u64::MAX}));
        let err = schema().validate(&mut d).unwrap_err();
        let ModelError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "priority");
        assert_eq!(violations[0].value, json!(u64::MAX));
    }

    #[test]
    fn coerce_follows_kind() {
        assert_eq!(FieldKind::Boolean.coerce("true"), json!(true));
        assert_eq!(FieldKind::Integer.coerce("42"), json!(42));
        assert_eq!(FieldKind::Integer.coerce("x"), json!("x"));
        assert_eq!(FieldKind::String.coerce("42"), json!("42"));
    }

    proptest! {
        #[test]
        fn any_string_title_validates(title in ".{1,40}", priority in any::<i32>()) {
            let mut d = doc(json!({"title": title, "priority": priority}));
            prop_assert!(schema().validate(&mut d).is_ok());
            prop_assert_eq!(d.len(), 3);
        }
    }
}
