use frame::Frame;
use geometry::model::{GeoPoint, Geometry};
use geometry::wkt::{WktParseError, WktParser};

use crate::rows::RowSelection;

/// Fatal resolution failure: the whole recomputation is abandoned and the
/// map keeps its last good state. A partial or garbled geometry set is
/// worse than a stale one, so there is no per-row skip.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    Wkt { row: usize, source: WktParseError },
    NonTextCell { field: String, row: usize },
    NonNumericCell { field: String, row: usize },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Wkt { row, source } => {
                write!(f, "malformed WKT at row {row}: {source}")
            }
            ResolveError::NonTextCell { field, row } => {
                write!(f, "field {field} has a non-text cell at row {row}")
            }
            ResolveError::NonNumericCell { field, row } => {
                write!(f, "field {field} has a non-numeric cell at row {row}")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Wkt { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses the WKT column for every selected row, in ascending row order.
///
/// `Ok(None)` when the configured column does not exist.
pub fn resolve_wkt(
    frame: &Frame,
    wkt_field: &str,
    rows: &RowSelection,
    parser: &dyn WktParser,
) -> Result<Option<Vec<Geometry>>, ResolveError> {
    let Some(field) = frame.field(wkt_field) else {
        return Ok(None);
    };

    let mut geometries = Vec::with_capacity(rows.len());
    for &row in rows.indices() {
        let text = field.values[row]
            .as_str()
            .ok_or_else(|| ResolveError::NonTextCell {
                field: wkt_field.to_string(),
                row,
            })?;
        let geometry = parser
            .parse(text)
            .map_err(|source| ResolveError::Wkt { row, source })?;
        geometries.push(geometry);
    }
    Ok(Some(geometries))
}

/// Builds one point per selected row from the latitude and longitude
/// columns, longitude first.
///
/// `Ok(None)` when either configured column does not exist.
pub fn resolve_geo_coordinates(
    frame: &Frame,
    latitude_field: &str,
    longitude_field: &str,
    rows: &RowSelection,
) -> Result<Option<Vec<Geometry>>, ResolveError> {
    let (Some(lat), Some(lon)) = (frame.field(latitude_field), frame.field(longitude_field))
    else {
        return Ok(None);
    };

    let numeric = |field: &frame::Field, name: &str, row: usize| {
        field.values[row]
            .as_f64()
            .ok_or_else(|| ResolveError::NonNumericCell {
                field: name.to_string(),
                row,
            })
    };

    let mut geometries = Vec::with_capacity(rows.len());
    for &row in rows.indices() {
        let lat_deg = numeric(lat, latitude_field, row)?;
        let lon_deg = numeric(lon, longitude_field, row)?;
        geometries.push(Geometry::Point(GeoPoint::new(lon_deg, lat_deg)));
    }
    Ok(Some(geometries))
}
