use serde_json::{Map, Value};

/// Longitude-first coordinate pair, per the GeoJSON interchange convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Encodes as a GeoJSON geometry object.
    pub fn to_geojson_value(&self) -> Value {
        let coordinates = match self {
            Geometry::Point(p) => point_coords(p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ring_coords(ps),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Value::Array(lines.iter().map(|l| ring_coords(l)).collect())
            }
            Geometry::MultiPolygon(polys) => Value::Array(
                polys
                    .iter()
                    .map(|poly| Value::Array(poly.iter().map(|r| ring_coords(r)).collect()))
                    .collect(),
            ),
        };

        let mut obj = Map::new();
        obj.insert(
            "type".to_string(),
            Value::String(self.type_name().to_string()),
        );
        obj.insert("coordinates".to_string(), coordinates);
        Value::Object(obj)
    }
}

fn point_coords(p: &GeoPoint) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn ring_coords(ps: &[GeoPoint]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}
