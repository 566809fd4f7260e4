use foundation::time::{Time, TimeBounds};
use foundation::value::Value;
use serde_json::{Map, Value as JsonValue};

/// A named column holding one scalar value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub values: Vec<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tabular dataset as delivered by the dashboard host: ordered named fields
/// with a uniform row count, plus the host's overall time bounds.
///
/// Row `i` across all fields is one logical record.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    fields: Vec<Field>,
    time_bounds: TimeBounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    RowCountMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    NotAFrameObject,
    MissingTimeBounds,
    InvalidField { index: usize, reason: String },
    InvalidCell { field: String, row: usize },
    Json(String),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::RowCountMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} has {actual} rows, expected {expected}"
            ),
            FrameError::NotAFrameObject => write!(f, "expected a frame object"),
            FrameError::MissingTimeBounds => write!(f, "frame missing timeBounds"),
            FrameError::InvalidField { index, reason } => {
                write!(f, "invalid field at index {index}: {reason}")
            }
            FrameError::InvalidCell { field, row } => {
                write!(f, "field {field} has an unsupported cell at row {row}")
            }
            FrameError::Json(msg) => write!(f, "JSON parse error: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl Frame {
    /// Builds a frame, enforcing the uniform row count invariant.
    pub fn new(fields: Vec<Field>, time_bounds: TimeBounds) -> Result<Self, FrameError> {
        if let Some(first) = fields.first() {
            let expected = first.len();
            for field in &fields[1..] {
                if field.len() != expected {
                    return Err(FrameError::RowCountMismatch {
                        field: field.name.clone(),
                        expected,
                        actual: field.len(),
                    });
                }
            }
        }
        Ok(Self {
            fields,
            time_bounds,
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn time_bounds(&self) -> TimeBounds {
        self.time_bounds
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    /// Lookup by configured name. Absence is an expected outcome, not an
    /// error; callers propagate it as "no data available".
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, FrameError> {
        let value: JsonValue =
            serde_json::from_str(payload).map_err(|e| FrameError::Json(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Decodes the host's dataset object:
    /// `{ "timeBounds": { "min": ms, "max": ms },
    ///    "fields": [ { "name": ..., "values": [...] }, ... ] }`.
    pub fn from_json_value(value: &JsonValue) -> Result<Self, FrameError> {
        let obj = value.as_object().ok_or(FrameError::NotAFrameObject)?;

        let bounds_obj = obj
            .get("timeBounds")
            .and_then(|v| v.as_object())
            .ok_or(FrameError::MissingTimeBounds)?;
        let min = bounds_obj
            .get("min")
            .and_then(|v| v.as_i64())
            .ok_or(FrameError::MissingTimeBounds)?;
        let max = bounds_obj
            .get("max")
            .and_then(|v| v.as_i64())
            .ok_or(FrameError::MissingTimeBounds)?;

        let fields_val = obj
            .get("fields")
            .and_then(|v| v.as_array())
            .ok_or(FrameError::NotAFrameObject)?;

        let mut fields = Vec::with_capacity(fields_val.len());
        for (index, field_val) in fields_val.iter().enumerate() {
            let field_obj = field_val.as_object().ok_or(FrameError::InvalidField {
                index,
                reason: "field must be an object".to_string(),
            })?;
            let name = field_obj
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or(FrameError::InvalidField {
                    index,
                    reason: "field missing name".to_string(),
                })?;
            let values_val = field_obj
                .get("values")
                .and_then(|v| v.as_array())
                .ok_or(FrameError::InvalidField {
                    index,
                    reason: "field missing values array".to_string(),
                })?;

            let mut values = Vec::with_capacity(values_val.len());
            for (row, cell) in values_val.iter().enumerate() {
                values.push(decode_cell(cell).ok_or(FrameError::InvalidCell {
                    field: name.to_string(),
                    row,
                })?);
            }
            fields.push(Field::new(name, values));
        }

        Self::new(fields, TimeBounds::new(Time(min), Time(max)))
    }

    /// Round-trip exporter, used for content fingerprinting downstream.
    pub fn to_json_value(&self) -> JsonValue {
        let mut root = Map::new();

        let mut bounds = Map::new();
        bounds.insert("min".to_string(), JsonValue::from(self.time_bounds.min.0));
        bounds.insert("max".to_string(), JsonValue::from(self.time_bounds.max.0));
        root.insert("timeBounds".to_string(), JsonValue::Object(bounds));

        let mut fields: Vec<JsonValue> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let mut fobj = Map::new();
            fobj.insert("name".to_string(), JsonValue::String(field.name.clone()));
            fobj.insert(
                "values".to_string(),
                JsonValue::Array(field.values.iter().map(encode_cell).collect()),
            );
            fields.push(JsonValue::Object(fobj));
        }
        root.insert("fields".to_string(), JsonValue::Array(fields));

        JsonValue::Object(root)
    }
}

fn decode_cell(cell: &JsonValue) -> Option<Value> {
    match cell {
        JsonValue::String(s) => Some(Value::Str(s.clone())),
        JsonValue::Number(n) => n.as_f64().map(Value::Num),
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Null => Some(Value::Null),
        _ => None,
    }
}

fn encode_cell(cell: &Value) -> JsonValue {
    match cell {
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Num(n) => JsonValue::from(*n),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
    }
}
