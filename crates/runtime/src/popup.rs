use panel::feature::Feature;

/// View model for the popup collaborator.
///
/// `key` is unique within one controller lifetime; the UI uses it to force
/// a remount when a new popup replaces an open one.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub key: u64,
    pub lng_lat: (f64, f64),
    pub properties: Vec<(String, String)>,
}

impl Popup {
    pub fn from_feature(key: u64, lng_lat: (f64, f64), feature: &Feature) -> Self {
        let properties = feature
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        Self {
            key,
            lng_lat,
            properties,
        }
    }

    /// An empty bag is allowed; the UI shows a "no properties" placeholder.
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Popup;
    use foundation::value::Value;
    use geometry::model::{GeoPoint, Geometry};
    use panel::feature::Feature;

    #[test]
    fn renders_properties_as_readable_text() {
        let feature = Feature {
            geometry: Geometry::Point(GeoPoint::new(1.0, 2.0)),
            properties: vec![
                ("count".to_string(), Value::Num(3.0)),
                ("active".to_string(), Value::Bool(true)),
                ("note".to_string(), Value::Null),
            ],
        };
        let popup = Popup::from_feature(7, (1.0, 2.0), &feature);
        assert_eq!(popup.key, 7);
        assert_eq!(
            popup.properties,
            vec![
                ("count".to_string(), "3".to_string()),
                ("active".to_string(), "true".to_string()),
                ("note".to_string(), "null".to_string()),
            ]
        );
        assert!(popup.has_properties());
    }
}
