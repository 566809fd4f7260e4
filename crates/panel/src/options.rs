use serde::{Deserialize, Serialize};

/// Base map style used when the host does not configure one: an OSM raster
/// style embedded as a data URL, so the panel renders without any setup.
pub const DEFAULT_STYLE_URL: &str = "data:application/json;charset=utf-8;base64,eyJ2ZXJzaW9uIjo4LCJzb3VyY2VzIjp7Im9zbSI6eyJ0eXBlIjoicmFzdGVyIiwidGlsZXMiOlsiaHR0cHM6Ly9hLnRpbGUub3BlbnN0cmVldG1hcC5vcmcve3p9L3t4fS97eX0ucG5nIiwiaHR0cHM6Ly9iLnRpbGUub3BlbnN0cmVldG1hcC5vcmcve3p9L3t4fS97eX0ucG5nIiwiaHR0cHM6Ly9jLnRpbGUub3BlbnN0cmVldG1hcC5vcmcve3p9L3t4fS97eX0ucG5nIl0sInRpbGVTaXplIjoyNTZ9fSwibGF5ZXJzIjpbeyJ0eXBlIjoicmFzdGVyIiwiaWQiOiJvc20iLCJzb3VyY2UiOiJvc20ifV0sImF0dHJpYnV0aW9uIjoiqSBPcGVuU3RyZWV0TWFwIGNvbnRyaWJ1dG9ycyJ9";

/// How geometry is pulled out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometrySelection {
    /// Parse a WKT text column, one literal per row.
    Wkt,
    /// Combine a latitude and a longitude column into points.
    GeoCoordinate,
}

/// Which shape of time filter the panel applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeOption {
    /// Filter rows inside a [start, end] range.
    TimeRange,
    /// Filter rows matching one exact instant.
    Snapshots,
}

/// Panel configuration, stored by the host under kebab-case keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PanelOptions {
    pub style_url: String,
    pub time_column_name: String,
    pub selection: GeometrySelection,
    pub wkt_column_name: String,
    pub latitude_column_name: String,
    pub longitude_column_name: String,
    pub time_option: TimeOption,
    pub show_circles: bool,
    pub show_lines: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            time_column_name: "time".to_string(),
            selection: GeometrySelection::Wkt,
            wkt_column_name: "wkt".to_string(),
            latitude_column_name: "lat".to_string(),
            longitude_column_name: "lon".to_string(),
            time_option: TimeOption::TimeRange,
            show_circles: true,
            show_lines: true,
        }
    }
}
