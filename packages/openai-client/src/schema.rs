//! Strict JSON schema generation for structured outputs.
//!
//! Schemas come from `schemars` and are rewritten into the subset accepted by
//! strict `json_schema` response formats:
//! 1. no `$ref`: every definition is inlined and `definitions`/`$schema` dropped
//! 2. single-entry `allOf` wrappers (emitted for documented fields) are flattened
//! 3. every object has `additionalProperties: false` and lists ALL of its
//!    properties in `required`, nullable ones included

use schemars::{schema_for, JsonSchema};
use serde_json::{Map, Value};

/// Inlining stops here so recursive types cannot loop forever.
const MAX_INLINE_DEPTH: usize = 32;

/// Types usable as a structured output target.
///
/// Blanket-implemented for every `JsonSchema` type.
pub trait StructuredOutput: JsonSchema {
    /// Strict schema for this type.
    fn openai_schema() -> Value {
        let root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        strict_schema(root)
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema> StructuredOutput for T {}

/// Rewrite a schemars root schema into strict form.
pub fn strict_schema(mut root: Value) -> Value {
    let definitions = match &mut root {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions")
        }
        _ => None,
    };

    if let Some(Value::Object(defs)) = definitions {
        inline_refs(&mut root, &defs, 0);
    }
    flatten_all_of(&mut root);
    close_objects(&mut root);
    root
}

fn inline_refs(value: &mut Value, defs: &Map<String, Value>, depth: usize) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| defs.get(name));

            if let (Some(def), true) = (target, depth < MAX_INLINE_DEPTH) {
                let mut inlined = def.clone();
                // Keep sibling keywords such as "description" next to the ref.
                if let Value::Object(inlined_map) = &mut inlined {
                    for (k, v) in map.iter().filter(|(k, _)| k.as_str() != "$ref") {
                        inlined_map.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                }
                *value = inlined;
                inline_refs(value, defs, depth + 1);
                return;
            }

            for v in map.values_mut() {
                inline_refs(v, defs, depth);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, defs, depth);
            }
        }
        _ => {}
    }
}

fn flatten_all_of(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let single = matches!(map.get("allOf"), Some(Value::Array(parts)) if parts.len() == 1);
            if single {
                if let Some(Value::Array(mut parts)) = map.remove("allOf") {
                    if let Some(Value::Object(inner)) = parts.pop() {
                        for (k, v) in inner {
                            map.entry(k).or_insert(v);
                        }
                    }
                }
            }
            for v in map.values_mut() {
                flatten_all_of(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(flatten_all_of),
        _ => {}
    }
}

fn close_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let is_object = match map.get("type") {
                Some(Value::String(t)) => t == "object",
                Some(Value::Array(ts)) => ts.iter().any(|t| t == "object"),
                _ => false,
            };
            if is_object {
                map.insert("additionalProperties".into(), Value::Bool(false));
                let keys: Option<Vec<Value>> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect());
                if let Some(keys) = keys {
                    map.insert("required".into(), Value::Array(keys));
                }
            }
            for v in map.values_mut() {
                close_objects(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(close_objects),
        _ => {}
    }
}
