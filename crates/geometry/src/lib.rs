pub mod model;
pub mod wkt;

pub use model::*;
pub use wkt::{StandardWkt, WktParseError, WktParser, parse_wkt};
