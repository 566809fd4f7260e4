use serde_json::{Map, Value as JsonValue, json};

use crate::feature::Feature;
use crate::options::{GeometrySelection, PanelOptions};

pub const SOURCE_ID: &str = "wkt-data";
pub const LINE_LAYER_ID: &str = "wkt-data-line";
pub const CIRCLE_LAYER_ID: &str = "wkt-data-circle";

/// All layer ids the panel may ever register, in registration order. The
/// surface sync removes exactly these before applying a new payload.
pub const ALL_LAYER_IDS: [&str; 2] = [LINE_LAYER_ID, CIRCLE_LAYER_ID];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Line,
    Circle,
}

/// One named visual rendering rule bound to the feature source, in the map
/// collaborator's model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub id: &'static str,
    pub kind: LayerKind,
}

impl LayerDescriptor {
    pub fn line() -> Self {
        Self {
            id: LINE_LAYER_ID,
            kind: LayerKind::Line,
        }
    }

    pub fn circle() -> Self {
        Self {
            id: CIRCLE_LAYER_ID,
            kind: LayerKind::Circle,
        }
    }

    /// Encodes the layer as the map collaborator's JSON shape, with the
    /// `app:clickable` marker consumed by input routing.
    pub fn to_json_value(&self) -> JsonValue {
        let (kind, paint) = match self.kind {
            LayerKind::Line => ("line", json!({ "line-width": 3, "line-color": "red" })),
            LayerKind::Circle => (
                "circle",
                json!({ "circle-radius": 3, "circle-color": "red" }),
            ),
        };
        json!({
            "id": self.id,
            "source": SOURCE_ID,
            "type": kind,
            "minzoom": 0,
            "maxzoom": 24,
            "metadata": { "app:clickable": true },
            "paint": paint,
        })
    }
}

/// The full description handed to the map collaborator: one GeoJSON source
/// carrying all current features, plus the layers that render it.
///
/// Absence of a payload ("unavailable" upstream) means "remove everything
/// from the map"; a payload with zero features means "render empty".
#[derive(Debug, Clone, PartialEq)]
pub struct MapPayload {
    pub features: Vec<Feature>,
    pub layers: Vec<LayerDescriptor>,
}

impl MapPayload {
    /// The GeoJSON source descriptor, all features as one batch.
    pub fn source_json(&self) -> JsonValue {
        let features: Vec<JsonValue> =
            self.features.iter().map(Feature::to_geojson_value).collect();
        json!({
            "type": "geojson",
            "tolerance": 0,
            "data": {
                "type": "FeatureCollection",
                "features": features,
            },
        })
    }

    pub fn to_json_value(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert("source".to_string(), self.source_json());
        obj.insert(
            "layers".to_string(),
            JsonValue::Array(
                self.layers
                    .iter()
                    .map(LayerDescriptor::to_json_value)
                    .collect(),
            ),
        );
        JsonValue::Object(obj)
    }
}

/// Builds the map payload from assembled features and display toggles.
///
/// Line rendering is only offered for the WKT strategy; geo-coordinate data
/// is point-only, so the toggle is ignored there. `None` in, `None` out.
pub fn build_payload(
    features: Option<Vec<Feature>>,
    options: &PanelOptions,
) -> Option<MapPayload> {
    let features = features?;

    let mut layers = Vec::new();
    if options.show_lines && options.selection == GeometrySelection::Wkt {
        layers.push(LayerDescriptor::line());
    }
    if options.show_circles {
        layers.push(LayerDescriptor::circle());
    }

    Some(MapPayload { features, layers })
}

#[cfg(test)]
mod tests {
    use super::{
        CIRCLE_LAYER_ID, LINE_LAYER_ID, LayerDescriptor, LayerKind, build_payload,
    };
    use crate::feature::Feature;
    use crate::options::{GeometrySelection, PanelOptions};
    use foundation::value::Value;
    use geometry::model::{GeoPoint, Geometry};
    use serde_json::json;

    fn one_feature() -> Vec<Feature> {
        vec![Feature {
            geometry: Geometry::Point(GeoPoint::new(1.0, 2.0)),
            properties: vec![("name".to_string(), Value::from("a"))],
        }]
    }

    fn options(selection: GeometrySelection, lines: bool, circles: bool) -> PanelOptions {
        let mut options = PanelOptions::default();
        options.selection = selection;
        options.show_lines = lines;
        options.show_circles = circles;
        options
    }

    #[test]
    fn wkt_with_both_toggles_gets_line_then_circle() {
        let payload =
            build_payload(Some(one_feature()), &options(GeometrySelection::Wkt, true, true))
                .unwrap();
        let ids: Vec<&str> = payload.layers.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LINE_LAYER_ID, CIRCLE_LAYER_ID]);
    }

    #[test]
    fn geo_coordinate_suppresses_the_line_layer() {
        let payload = build_payload(
            Some(one_feature()),
            &options(GeometrySelection::GeoCoordinate, true, true),
        )
        .unwrap();
        let ids: Vec<&str> = payload.layers.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![CIRCLE_LAYER_ID]);
    }

    #[test]
    fn toggles_off_means_no_layers_but_still_a_payload() {
        let payload =
            build_payload(Some(one_feature()), &options(GeometrySelection::Wkt, false, false))
                .unwrap();
        assert!(payload.layers.is_empty());
        assert_eq!(payload.features.len(), 1);
    }

    #[test]
    fn unavailable_features_mean_no_payload() {
        assert_eq!(
            build_payload(None, &options(GeometrySelection::Wkt, true, true)),
            None
        );
    }

    #[test]
    fn empty_features_mean_an_empty_payload_not_no_payload() {
        let payload =
            build_payload(Some(vec![]), &options(GeometrySelection::Wkt, true, true)).unwrap();
        assert!(payload.features.is_empty());
        assert_eq!(payload.layers.len(), 2);
    }

    #[test]
    fn layer_json_carries_the_clickable_marker_and_paint() {
        assert_eq!(
            LayerDescriptor::circle().to_json_value(),
            json!({
                "id": "wkt-data-circle",
                "source": "wkt-data",
                "type": "circle",
                "minzoom": 0,
                "maxzoom": 24,
                "metadata": { "app:clickable": true },
                "paint": { "circle-radius": 3, "circle-color": "red" },
            })
        );
        assert_eq!(LayerDescriptor::line().kind, LayerKind::Line);
    }

    #[test]
    fn source_json_wraps_features_in_a_collection() {
        let payload =
            build_payload(Some(one_feature()), &options(GeometrySelection::Wkt, true, true))
                .unwrap();
        let source = payload.source_json();
        assert_eq!(source["type"], "geojson");
        assert_eq!(source["tolerance"], 0);
        assert_eq!(source["data"]["type"], "FeatureCollection");
        assert_eq!(source["data"]["features"].as_array().unwrap().len(), 1);
    }
}
