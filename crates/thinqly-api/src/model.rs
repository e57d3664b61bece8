// Model schema interpreter
//
// Each device model publishes a machine-readable schema describing its
// control/monitor fields. The schema's type tag drives everything:
// enums, bit-packed flags, numeric ranges, cross-reference tables, and
// string comments. The tag set is closed by design so callers can match
// exhaustively; an unknown tag is a schema/decoder mismatch and fails
// loudly.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::Error;

/// A typed field descriptor from the model schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    /// Bit-packed flags: start bit -> (code -> label) map.
    Bit {
        options: HashMap<u32, HashMap<String, String>>,
    },
    /// Enumerated values: code -> label map.
    Enum { options: HashMap<String, String> },
    /// Numeric range with step.
    Range { min: f64, max: f64, step: f64 },
    /// Cross-reference into a named table elsewhere in the schema
    /// (course/program descriptions and the like).
    Reference { reference: Map<String, Value> },
    /// Free-form string field carrying only a schema comment.
    StringComment { comment: String },
}

/// One token of the binary control-buffer template: either a literal
/// byte or a named placeholder to fill from device status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlToken {
    Literal(u8),
    Field(String),
}

/// The schema interpreter for one device model.
///
/// Immutable server-side artifact; clients cache these per schema URL
/// for the process lifetime.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    data: Value,
}

impl ModelInfo {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// The raw schema document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Look up a field's typed descriptor.
    ///
    /// `Ok(None)` when the schema declares no such field (or a string
    /// field without a comment); [`Error::UnsupportedType`] when the
    /// field exists but carries a type tag outside the closed set --
    /// never silently ignored.
    pub fn value(&self, name: &str) -> Result<Option<ValueSpec>, Error> {
        let Some(field) = self.data.get("Value").and_then(|v| v.get(name)) else {
            return Ok(None);
        };
        let type_tag = field.get("type").and_then(Value::as_str).unwrap_or_default();

        match type_tag.to_ascii_lowercase().as_str() {
            "enum" => Ok(Some(ValueSpec::Enum {
                options: string_map(field.get("option")),
            })),

            "range" => {
                let option = field.get("option").unwrap_or(&Value::Null);
                let bound = |key: &str| {
                    as_f64_lenient(option.get(key)).ok_or_else(|| Error::Schema {
                        message: format!("range field `{name}` is missing `{key}`"),
                    })
                };
                Ok(Some(ValueSpec::Range {
                    min: bound("min")?,
                    max: bound("max")?,
                    step: as_f64_lenient(option.get("step")).unwrap_or(1.0),
                }))
            }

            "bit" => {
                let mut options = HashMap::new();
                for entry in iter_entries(field.get("option")) {
                    let startbit = as_u64_lenient(entry.get("startbit")).ok_or_else(|| {
                        Error::Schema {
                            message: format!("bit field `{name}` has an entry without `startbit`"),
                        }
                    })?;
                    options.insert(
                        u32::try_from(startbit).map_err(|_| Error::Schema {
                            message: format!("bit field `{name}` startbit {startbit} out of range"),
                        })?,
                        string_map(entry.get("values")),
                    );
                }
                Ok(Some(ValueSpec::Bit { options }))
            }

            "reference" => {
                // The option list names a top-level table in this schema.
                let target = field
                    .get("option")
                    .and_then(|o| o.get(0))
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::Schema {
                        message: format!("reference field `{name}` names no target table"),
                    })?;
                let reference = self
                    .data
                    .get(target)
                    .and_then(Value::as_object)
                    .cloned()
                    .ok_or_else(|| Error::Schema {
                        message: format!(
                            "reference field `{name}` targets `{target}` which is not in the schema"
                        ),
                    })?;
                Ok(Some(ValueSpec::Reference { reference }))
            }

            "string" => Ok(field
                .get("_comment")
                .and_then(Value::as_str)
                .map(|comment| ValueSpec::StringComment {
                    comment: comment.to_owned(),
                })),

            _ => Err(Error::UnsupportedType(type_tag.to_owned())),
        }
    }

    /// The schema-declared default for a field, if any.
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.data.get("Value")?.get(name)?.get("default")
    }

    /// Label for an enum code. Unknown codes yield `None` -- firmware
    /// grows new codes faster than schemas document them.
    pub fn enum_name(&self, field: &str, code: &str) -> Result<Option<String>, Error> {
        match self.value(field)? {
            Some(ValueSpec::Enum { options }) => Ok(options.get(code).cloned()),
            Some(_) => Err(Error::Schema {
                message: format!("field `{field}` is not an enum"),
            }),
            None => Ok(None),
        }
    }

    /// Code for an enum label (the inverse of [`enum_name`](Self::enum_name)).
    pub fn enum_value(&self, field: &str, label: &str) -> Result<Option<String>, Error> {
        match self.value(field)? {
            Some(ValueSpec::Enum { options }) => Ok(options
                .into_iter()
                .find(|(_, l)| l == label)
                .map(|(code, _)| code)),
            Some(_) => Err(Error::Schema {
                message: format!("field `{field}` is not an enum"),
            }),
            None => Ok(None),
        }
    }

    /// Comment string of a reference-table row, or `None` when the code
    /// has no row.
    pub fn reference_name(&self, field: &str, code: &str) -> Result<Option<String>, Error> {
        match self.value(field)? {
            Some(ValueSpec::Reference { reference }) => Ok(reference
                .get(code)
                .and_then(|row| row.get("_comment"))
                .and_then(Value::as_str)
                .map(str::to_owned)),
            Some(_) => Err(Error::Schema {
                message: format!("field `{field}` is not a reference"),
            }),
            None => Ok(None),
        }
    }

    /// Whether monitor payloads for this model are fixed-layout binary
    /// (as opposed to JSON).
    pub fn is_binary_monitor(&self) -> bool {
        self.data
            .pointer("/Monitoring/type")
            .and_then(Value::as_str)
            == Some("BINARY(BYTE)")
    }

    /// Decode a raw monitor payload into a flat field map.
    ///
    /// Pure function of schema + input: the same bytes always decode to
    /// the same map.
    pub fn decode_monitor(&self, raw: &[u8]) -> Result<Map<String, Value>, Error> {
        if self.is_binary_monitor() {
            self.decode_monitor_binary(raw)
        } else {
            Self::decode_monitor_json(raw)
        }
    }

    fn decode_monitor_json(raw: &[u8]) -> Result<Map<String, Value>, Error> {
        let value: Value = serde_json::from_slice(raw).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::from_utf8_lossy(raw).into_owned(),
        })?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::Deserialization {
                message: "monitor payload is not a JSON object".into(),
                body: other.to_string(),
            }),
        }
    }

    /// Walk the declared byte layout, big-endian-accumulating each
    /// field's `[startByte, startByte + length)` range. Fields may
    /// overlap and may span arbitrary byte widths.
    fn decode_monitor_binary(&self, raw: &[u8]) -> Result<Map<String, Value>, Error> {
        let protocol = self
            .data
            .pointer("/Monitoring/protocol")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Schema {
                message: "binary monitoring declared without a `protocol` layout".into(),
            })?;

        let mut decoded = Map::new();
        for item in protocol {
            let name = item
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::Schema {
                    message: "monitoring layout entry has no field name".into(),
                })?;
            let start = layout_index(item, "startByte", name)?;
            let length = layout_index(item, "length", name)?;
            let end = start.checked_add(length).ok_or_else(|| Error::Schema {
                message: format!("monitoring layout for `{name}` overflows"),
            })?;

            let bytes = raw.get(start..end).ok_or_else(|| Error::Schema {
                message: format!(
                    "field `{name}` spans bytes {start}..{end} beyond the {}-byte payload",
                    raw.len()
                ),
            })?;

            let mut acc: u128 = 0;
            for &byte in bytes {
                acc = (acc << 8) | u128::from(byte);
            }
            decoded.insert(name.to_owned(), Value::String(acc.to_string()));
        }
        Ok(decoded)
    }

    /// Whether control writes for this model are fixed-layout binary.
    pub fn is_binary_control(&self) -> bool {
        self.data
            .pointer("/ControlWifi/type")
            .and_then(Value::as_str)
            == Some("BINARY(BYTE)")
    }

    /// Parse the ordered control-buffer template: literal byte values
    /// pass through, `"{{Field}}"` strings become named placeholders.
    pub fn binary_control_template(&self) -> Result<Vec<ControlToken>, Error> {
        let data = self
            .data
            .pointer("/ControlWifi/action/SetControl/data")
            .ok_or_else(|| Error::Schema {
                message: "model declares no control-buffer template".into(),
            })?;
        let items = data.as_array().ok_or_else(|| Error::Schema {
            message: "control-buffer template is not a list".into(),
        })?;

        items.iter().map(parse_control_token).collect()
    }

    /// Build a raw control buffer from the template.
    ///
    /// The protocol requires resending the entire control vector with
    /// one field changed: each placeholder takes the caller's override
    /// when it names `changed`, and the current-status value otherwise.
    pub fn build_control_buffer(
        &self,
        current_status: &Map<String, Value>,
        changed: Option<(&str, u8)>,
    ) -> Result<Vec<u8>, Error> {
        self.binary_control_template()?
            .into_iter()
            .map(|token| match token {
                ControlToken::Literal(byte) => Ok(byte),
                ControlToken::Field(name) => {
                    if let Some((field, value)) = changed {
                        if field == name {
                            return Ok(value);
                        }
                    }
                    let raw = current_status.get(&name).ok_or_else(|| Error::Schema {
                        message: format!(
                            "control template references `{name}` which is missing from the current status"
                        ),
                    })?;
                    let n = as_u64_lenient(Some(raw)).ok_or_else(|| Error::Schema {
                        message: format!("status field `{name}` is not numeric"),
                    })?;
                    u8::try_from(n).map_err(|_| Error::Schema {
                        message: format!("status field `{name}` value {n} does not fit in one byte"),
                    })
                }
            })
            .collect()
    }
}

// ── Schema value coercion ────────────────────────────────────────────
// Schemas are hand-authored by the vendor: numbers show up both as JSON
// numbers and as decimal strings, and option containers as both lists
// and maps. Coerce leniently on read, fail loudly on real mismatches.

fn as_u64_lenient(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64_lenient(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Collapse a `{code: label}` object into an owned string map, with
/// non-string labels stringified.
fn string_map(value: Option<&Value>) -> HashMap<String, String> {
    let Some(Value::Object(map)) = value else {
        return HashMap::new();
    };
    map.iter()
        .map(|(k, v)| {
            let label = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), label)
        })
        .collect()
}

/// Iterate option entries whether the schema wrote them as a list or a map.
fn iter_entries(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn layout_index(item: &Value, key: &str, field: &str) -> Result<usize, Error> {
    let n = as_u64_lenient(item.get(key)).ok_or_else(|| Error::Schema {
        message: format!("monitoring layout for `{field}` is missing `{key}`"),
    })?;
    usize::try_from(n).map_err(|_| Error::Schema {
        message: format!("monitoring layout for `{field}` has an unusable `{key}`"),
    })
}

fn parse_control_token(token: &Value) -> Result<ControlToken, Error> {
    match token {
        Value::Number(_) => {
            let n = as_u64_lenient(Some(token)).ok_or_else(|| Error::Schema {
                message: format!("control template literal `{token}` is not a byte"),
            })?;
            u8::try_from(n)
                .map(ControlToken::Literal)
                .map_err(|_| Error::Schema {
                    message: format!("control template literal {n} does not fit in one byte"),
                })
        }
        Value::String(s) => {
            if let Some(name) = s.strip_prefix("{{").and_then(|s| s.strip_suffix("}}")) {
                Ok(ControlToken::Field(name.to_owned()))
            } else if let Ok(n) = s.trim().parse::<u8>() {
                Ok(ControlToken::Literal(n))
            } else {
                Err(Error::Schema {
                    message: format!("unrecognized control template token `{s}`"),
                })
            }
        }
        other => Err(Error::Schema {
            message: format!("unrecognized control template token `{other}`"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> ModelInfo {
        ModelInfo::new(json!({
            "Value": {
                "Operation": {
                    "type": "Enum",
                    "default": "0",
                    "option": { "0": "@operation_off", "1": "@operation_on" },
                },
                "WindStrength": {
                    "type": "enum",
                    "option": { "2": "@low", "4": "@mid", "6": "@high" },
                },
                "TempCfg": {
                    "type": "Range",
                    "option": { "min": 18, "max": 30 },
                },
                "Option1": {
                    "type": "Bit",
                    "option": [
                        { "startbit": 0, "length": 1,
                          "values": { "0": "@child_lock_off", "1": "@child_lock_on" } },
                        { "startbit": 2, "length": 1,
                          "values": { "0": "@buzzer_off", "1": "@buzzer_on" } },
                    ],
                },
                "Course": {
                    "type": "Reference",
                    "option": ["Course"],
                },
                "Alias": {
                    "type": "String",
                    "_comment": "user-assigned name",
                },
                "Mystery": {
                    "type": "Hologram",
                },
            },
            "Course": {
                "1": { "_comment": "Cotton", "courseType": "Course" },
                "2": { "_comment": "Quick Wash", "courseType": "Course" },
            },
            "Monitoring": {
                "type": "BINARY(BYTE)",
                "protocol": [
                    { "startByte": 0, "length": 1, "value": "Operation" },
                    { "startByte": 1, "length": 2, "value": "Remain" },
                    { "startByte": 1, "length": 1, "value": "RemainHigh" },
                ],
            },
            "ControlWifi": {
                "type": "BINARY(BYTE)",
                "action": {
                    "SetControl": {
                        "cmd": "Control",
                        "cmdOpt": "Set",
                        "data": [1, "{{A}}", "{{B}}", 255],
                    },
                },
            },
        }))
    }

    // Every (code, label) pair must survive a round trip through both
    // lookup directions.
    #[test]
    fn enum_lookup_is_bidirectional() {
        let m = model();
        for (code, label) in [("0", "@operation_off"), ("1", "@operation_on")] {
            assert_eq!(m.enum_name("Operation", code).unwrap().as_deref(), Some(label));
            assert_eq!(m.enum_value("Operation", label).unwrap().as_deref(), Some(code));
        }
    }

    #[test]
    fn enum_lookup_of_unknown_code_is_none() {
        let m = model();
        assert_eq!(m.enum_name("Operation", "42").unwrap(), None);
        assert_eq!(m.enum_value("Operation", "@no_such_label").unwrap(), None);
    }

    #[test]
    fn type_tags_match_case_insensitively() {
        let m = model();
        assert!(matches!(
            m.value("WindStrength").unwrap(),
            Some(ValueSpec::Enum { .. })
        ));
    }

    #[test]
    fn range_step_defaults_to_one() {
        let m = model();
        assert_eq!(
            m.value("TempCfg").unwrap(),
            Some(ValueSpec::Range { min: 18.0, max: 30.0, step: 1.0 })
        );
    }

    #[test]
    fn bit_options_key_on_start_bit() {
        let m = model();
        let Some(ValueSpec::Bit { options }) = m.value("Option1").unwrap() else {
            panic!("expected a bit field");
        };
        assert_eq!(options[&0]["1"], "@child_lock_on");
        assert_eq!(options[&2]["0"], "@buzzer_off");
    }

    #[test]
    fn reference_rows_resolve_to_comments() {
        let m = model();
        assert_eq!(
            m.reference_name("Course", "2").unwrap().as_deref(),
            Some("Quick Wash")
        );
        assert_eq!(m.reference_name("Course", "99").unwrap(), None);
    }

    #[test]
    fn string_field_yields_its_comment() {
        let m = model();
        assert_eq!(
            m.value("Alias").unwrap(),
            Some(ValueSpec::StringComment { comment: "user-assigned name".into() })
        );
    }

    #[test]
    fn unknown_type_tag_is_fatal() {
        let err = model().value("Mystery").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(tag) if tag == "Hologram"));
    }

    #[test]
    fn absent_field_is_none() {
        assert_eq!(model().value("NoSuchField").unwrap(), None);
    }

    #[test]
    fn default_value_reads_the_declared_default() {
        assert_eq!(model().default_value("Operation"), Some(&json!("0")));
    }

    #[test]
    fn binary_decode_accumulates_big_endian() {
        let m = model();
        let decoded = m.decode_monitor(&[0x01, 0x02, 0x03]).unwrap();

        assert_eq!(decoded["Operation"], "1");
        // 0x02 0x03 accumulated big-endian = 515
        assert_eq!(decoded["Remain"], "515");
        // Overlapping single-byte field over the same range
        assert_eq!(decoded["RemainHigh"], "2");
    }

    #[test]
    fn binary_decode_is_deterministic() {
        let m = model();
        let raw = [0x00, 0xFF, 0x10];
        assert_eq!(m.decode_monitor(&raw).unwrap(), m.decode_monitor(&raw).unwrap());
    }

    #[test]
    fn binary_decode_rejects_short_payloads() {
        let err = model().decode_monitor(&[0x01]).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn json_decode_parses_utf8_payloads() {
        let m = ModelInfo::new(json!({ "Monitoring": { "type": "JSON" } }));
        let decoded = m.decode_monitor(br#"{"TempCur": 23}"#).unwrap();
        assert_eq!(decoded["TempCur"], 23);
    }

    #[test]
    fn control_buffer_substitutes_override_and_status() {
        let m = model();
        let mut status = Map::new();
        status.insert("A".into(), json!("5"));
        status.insert("B".into(), json!("7"));

        let buffer = m.build_control_buffer(&status, Some(("B", 9))).unwrap();
        assert_eq!(buffer, vec![1, 5, 9, 255]);
    }

    #[test]
    fn control_buffer_without_override_uses_status() {
        let m = model();
        let mut status = Map::new();
        status.insert("A".into(), json!(5));
        status.insert("B".into(), json!(7));

        let buffer = m.build_control_buffer(&status, None).unwrap();
        assert_eq!(buffer, vec![1, 5, 7, 255]);
    }

    #[test]
    fn control_buffer_missing_status_field_is_schema_error() {
        let m = model();
        let err = m.build_control_buffer(&Map::new(), None).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }
}
