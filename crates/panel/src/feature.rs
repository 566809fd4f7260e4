use chrono::{DateTime, SecondsFormat, Utc};
use foundation::time::Time;
use foundation::value::Value;
use frame::Frame;
use geometry::model::Geometry;
use serde_json::{Map, Value as JsonValue};

use crate::options::{GeometrySelection, PanelOptions};
use crate::rows::RowSelection;
use crate::time_domain::cell_time;

/// One resolved geometry joined back to its source row's columns.
///
/// Properties are ordered: the reformatted time value first (under the
/// configured time column name), then every other column in dataset order.
/// The time column's raw cell and, for the WKT strategy, the WKT source
/// column are excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Vec<(String, Value)>,
}

impl Feature {
    pub fn to_geojson_value(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("type".to_string(), JsonValue::String("Feature".to_string()));
        obj.insert("geometry".to_string(), self.geometry.to_geojson_value());

        let mut props = Map::new();
        for (name, value) in &self.properties {
            props.insert(name.clone(), encode_property(value));
        }
        obj.insert("properties".to_string(), JsonValue::Object(props));
        JsonValue::Object(obj)
    }
}

fn encode_property(value: &Value) -> JsonValue {
    match value {
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Num(n) => JsonValue::from(*n),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    TimeFieldMissing(String),
    GeometryCountMismatch { selected: usize, resolved: usize },
}

impl std::fmt::Display for AssembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssembleError::TimeFieldMissing(name) => {
                write!(f, "time field {name} disappeared during assembly")
            }
            AssembleError::GeometryCountMismatch { selected, resolved } => write!(
                f,
                "resolver produced {resolved} geometries for {selected} selected rows"
            ),
        }
    }
}

impl std::error::Error for AssembleError {}

/// Formats a time cell for display in the property bag. The popup shows
/// properties verbatim, so the raw epoch number is replaced by an RFC 3339
/// timestamp here. Gap cells keep their readable-text rendering.
fn format_time_cell(cell: &Value) -> Value {
    match cell_time(cell) {
        Some(t) => Value::Str(format_time(t)),
        None => Value::Str(cell.to_string()),
    }
}

pub fn format_time(t: Time) -> String {
    match DateTime::<Utc>::from_timestamp_millis(t.0) {
        Some(utc) => utc.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => t.0.to_string(), // outside chrono's representable range
    }
}

/// Joins resolved geometries back to their source rows.
///
/// Walks the selection and the geometry sequence in lockstep; the two were
/// produced from the same `RowSelection` value, and a length mismatch is a
/// fatal error rather than a silent row drop.
pub fn assemble(
    frame: &Frame,
    options: &PanelOptions,
    rows: &RowSelection,
    geometries: Vec<Geometry>,
) -> Result<Vec<Feature>, AssembleError> {
    if geometries.len() != rows.len() {
        return Err(AssembleError::GeometryCountMismatch {
            selected: rows.len(),
            resolved: geometries.len(),
        });
    }
    let time_name = options.time_column_name.as_str();
    let time_field = frame
        .field(time_name)
        .ok_or_else(|| AssembleError::TimeFieldMissing(time_name.to_string()))?;

    let skip_field = |name: &str| {
        name == time_name
            || (options.selection == GeometrySelection::Wkt && name == options.wkt_column_name)
    };

    let mut features = Vec::with_capacity(rows.len());
    for (&row, geometry) in rows.indices().iter().zip(geometries) {
        let mut properties = Vec::with_capacity(frame.fields().len());
        properties.push((
            time_name.to_string(),
            format_time_cell(&time_field.values[row]),
        ));
        for field in frame.fields() {
            if skip_field(&field.name) {
                continue;
            }
            properties.push((field.name.clone(), field.values[row].clone()));
        }
        features.push(Feature {
            geometry,
            properties,
        });
    }
    Ok(features)
}
