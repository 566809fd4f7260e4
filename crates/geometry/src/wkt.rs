use crate::model::{GeoPoint, Geometry};

/// Pluggable well-known-text parsing capability.
///
/// The pipeline only depends on this trait, so resolver logic stays testable
/// with a scripted parser and the concrete backend can be swapped.
pub trait WktParser {
    fn parse(&self, text: &str) -> Result<Geometry, WktParseError>;
}

/// The built-in parser: 2D WKT for the six standard geometry types.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardWkt;

impl WktParser for StandardWkt {
    fn parse(&self, text: &str) -> Result<Geometry, WktParseError> {
        parse_wkt(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WktParseError {
    UnexpectedEnd,
    UnexpectedInput { at: usize, found: String },
    InvalidNumber { at: usize, text: String },
    TrailingInput { at: usize },
    UnsupportedType(String),
    UnsupportedDimension(String),
    EmptyPoint,
}

impl std::fmt::Display for WktParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WktParseError::UnexpectedEnd => write!(f, "unexpected end of WKT input"),
            WktParseError::UnexpectedInput { at, found } => {
                write!(f, "unexpected input at offset {at}: {found:?}")
            }
            WktParseError::InvalidNumber { at, text } => {
                write!(f, "invalid number at offset {at}: {text:?}")
            }
            WktParseError::TrailingInput { at } => {
                write!(f, "trailing input after geometry at offset {at}")
            }
            WktParseError::UnsupportedType(ty) => write!(f, "unsupported WKT type: {ty}"),
            WktParseError::UnsupportedDimension(dim) => {
                write!(f, "unsupported WKT dimension marker: {dim}")
            }
            WktParseError::EmptyPoint => write!(f, "POINT EMPTY has no coordinates"),
        }
    }
}

impl std::error::Error for WktParseError {}

/// Parses one 2D WKT geometry literal.
///
/// Accepted: POINT, MULTIPOINT (bare or parenthesized members), LINESTRING,
/// MULTILINESTRING, POLYGON, MULTIPOLYGON, case-insensitive, with EMPTY
/// collections. Z/M/ZM dimension markers are rejected.
pub fn parse_wkt(text: &str) -> Result<Geometry, WktParseError> {
    let mut scan = Scanner::new(text);
    let keyword = scan.keyword()?;
    scan.reject_dimension_marker()?;

    let geometry = match keyword.as_str() {
        "POINT" => {
            if scan.take_empty() {
                return Err(WktParseError::EmptyPoint);
            }
            scan.expect('(')?;
            let p = scan.point()?;
            scan.expect(')')?;
            Geometry::Point(p)
        }
        "MULTIPOINT" => Geometry::MultiPoint(scan.multipoint_body()?),
        "LINESTRING" => Geometry::LineString(scan.empty_or(Scanner::ring_body)?),
        "MULTILINESTRING" => Geometry::MultiLineString(scan.empty_or(Scanner::rings_body)?),
        "POLYGON" => Geometry::Polygon(scan.empty_or(Scanner::rings_body)?),
        "MULTIPOLYGON" => Geometry::MultiPolygon(scan.empty_or(Scanner::polygons_body)?),
        other => return Err(WktParseError::UnsupportedType(other.to_string())),
    };

    scan.finish()?;
    Ok(geometry)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    /// Reads an ASCII-alphabetic word, uppercased.
    fn keyword(&mut self) -> Result<String, WktParseError> {
        self.skip_ws();
        let word: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if word.is_empty() {
            return match self.rest().chars().next() {
                None => Err(WktParseError::UnexpectedEnd),
                Some(c) => Err(WktParseError::UnexpectedInput {
                    at: self.pos,
                    found: c.to_string(),
                }),
            };
        }
        self.pos += word.len();
        Ok(word.to_ascii_uppercase())
    }

    /// A Z/M/ZM word between the type keyword and the body is a 3D/measured
    /// literal; those are not representable on the map.
    fn reject_dimension_marker(&mut self) -> Result<(), WktParseError> {
        self.skip_ws();
        let word: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        match word.to_ascii_uppercase().as_str() {
            "Z" | "M" | "ZM" => Err(WktParseError::UnsupportedDimension(word)),
            _ => Ok(()),
        }
    }

    fn take_empty(&mut self) -> bool {
        self.skip_ws();
        let word: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if word.to_ascii_uppercase() == "EMPTY" {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn empty_or<T: Default>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, WktParseError>,
    ) -> Result<T, WktParseError> {
        if self.take_empty() {
            Ok(T::default())
        } else {
            body(self)
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), WktParseError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(WktParseError::UnexpectedInput {
                at: self.pos,
                found: c.to_string(),
            }),
            None => Err(WktParseError::UnexpectedEnd),
        }
    }

    fn take_comma(&mut self) -> bool {
        if self.peek() == Some(',') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<f64, WktParseError> {
        self.skip_ws();
        let start = self.pos;
        let text: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
            .collect();
        if text.is_empty() {
            return match self.rest().chars().next() {
                None => Err(WktParseError::UnexpectedEnd),
                Some(c) => Err(WktParseError::UnexpectedInput {
                    at: start,
                    found: c.to_string(),
                }),
            };
        }
        self.pos += text.len();
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(WktParseError::InvalidNumber { at: start, text })
    }

    /// `lon lat` pair, longitude first as WKT coordinates are x y.
    fn point(&mut self) -> Result<GeoPoint, WktParseError> {
        let lon = self.number()?;
        let lat = self.number()?;
        Ok(GeoPoint::new(lon, lat))
    }

    /// `( p, p, ... )` where each `p` is `x y`.
    fn ring_body(&mut self) -> Result<Vec<GeoPoint>, WktParseError> {
        self.expect('(')?;
        let mut points = vec![self.point()?];
        while self.take_comma() {
            points.push(self.point()?);
        }
        self.expect(')')?;
        Ok(points)
    }

    /// MULTIPOINT members may be bare pairs or individually parenthesized.
    fn multipoint_body(&mut self) -> Result<Vec<GeoPoint>, WktParseError> {
        if self.take_empty() {
            return Ok(Vec::new());
        }
        self.expect('(')?;
        let mut points = vec![self.multipoint_member()?];
        while self.take_comma() {
            points.push(self.multipoint_member()?);
        }
        self.expect(')')?;
        Ok(points)
    }

    fn multipoint_member(&mut self) -> Result<GeoPoint, WktParseError> {
        if self.peek() == Some('(') {
            self.pos += 1;
            let p = self.point()?;
            self.expect(')')?;
            Ok(p)
        } else {
            self.point()
        }
    }

    /// `( ring, ring, ... )`.
    fn rings_body(&mut self) -> Result<Vec<Vec<GeoPoint>>, WktParseError> {
        self.expect('(')?;
        let mut rings = vec![self.ring_body()?];
        while self.take_comma() {
            rings.push(self.ring_body()?);
        }
        self.expect(')')?;
        Ok(rings)
    }

    /// `( polygon-body, polygon-body, ... )`.
    fn polygons_body(&mut self) -> Result<Vec<Vec<Vec<GeoPoint>>>, WktParseError> {
        self.expect('(')?;
        let mut polys = vec![self.rings_body()?];
        while self.take_comma() {
            polys.push(self.rings_body()?);
        }
        self.expect(')')?;
        Ok(polys)
    }

    fn finish(&mut self) -> Result<(), WktParseError> {
        self.skip_ws();
        if self.pos < self.src.len() {
            return Err(WktParseError::TrailingInput { at: self.pos });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{WktParseError, parse_wkt};
    use crate::model::{GeoPoint, Geometry};

    fn p(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat)
    }

    #[test]
    fn parses_point() {
        assert_eq!(
            parse_wkt("POINT (4.9 52.37)"),
            Ok(Geometry::Point(p(4.9, 52.37)))
        );
    }

    #[test]
    fn keyword_is_case_insensitive() {
        assert_eq!(
            parse_wkt("point(-1 -2)"),
            Ok(Geometry::Point(p(-1.0, -2.0)))
        );
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(
            parse_wkt("POINT (1e1 -2.5E-1)"),
            Ok(Geometry::Point(p(10.0, -0.25)))
        );
    }

    #[test]
    fn parses_linestring() {
        assert_eq!(
            parse_wkt("LINESTRING (0 0, 1 1, 2 0)"),
            Ok(Geometry::LineString(vec![
                p(0.0, 0.0),
                p(1.0, 1.0),
                p(2.0, 0.0)
            ]))
        );
    }

    #[test]
    fn parses_multipoint_in_both_member_forms() {
        let expected = Ok(Geometry::MultiPoint(vec![p(1.0, 2.0), p(3.0, 4.0)]));
        assert_eq!(parse_wkt("MULTIPOINT ((1 2), (3 4))"), expected);
        assert_eq!(
            parse_wkt("MULTIPOINT (1 2, 3 4)"),
            Ok(Geometry::MultiPoint(vec![p(1.0, 2.0), p(3.0, 4.0)]))
        );
    }

    #[test]
    fn parses_polygon_with_hole() {
        let got = parse_wkt(
            "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 1))",
        )
        .unwrap();
        match got {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[1].len(), 4);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn parses_multilinestring_and_multipolygon() {
        assert_eq!(
            parse_wkt("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))"),
            Ok(Geometry::MultiLineString(vec![
                vec![p(0.0, 0.0), p(1.0, 1.0)],
                vec![p(2.0, 2.0), p(3.0, 3.0)],
            ]))
        );
        assert_eq!(
            parse_wkt("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))"),
            Ok(Geometry::MultiPolygon(vec![vec![vec![
                p(0.0, 0.0),
                p(1.0, 0.0),
                p(1.0, 1.0),
                p(0.0, 0.0),
            ]]]))
        );
    }

    #[test]
    fn empty_collections_parse_as_empty() {
        assert_eq!(parse_wkt("MULTIPOINT EMPTY"), Ok(Geometry::MultiPoint(vec![])));
        assert_eq!(parse_wkt("POLYGON EMPTY"), Ok(Geometry::Polygon(vec![])));
        assert_eq!(parse_wkt("POINT EMPTY"), Err(WktParseError::EmptyPoint));
    }

    #[test]
    fn rejects_dimension_markers() {
        assert_eq!(
            parse_wkt("POINT Z (1 2 3)"),
            Err(WktParseError::UnsupportedDimension("Z".to_string()))
        );
        assert_eq!(
            parse_wkt("LINESTRING ZM (1 2 3 4, 5 6 7 8)"),
            Err(WktParseError::UnsupportedDimension("ZM".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(matches!(
            parse_wkt("POINT (1)"),
            Err(WktParseError::UnexpectedInput { .. })
        ));
        assert!(matches!(
            parse_wkt("POINT (1 2"),
            Err(WktParseError::UnexpectedEnd)
        ));
        assert!(matches!(
            parse_wkt("POINT (a b)"),
            Err(WktParseError::UnexpectedInput { .. })
        ));
        assert!(matches!(
            parse_wkt("CIRCLE (1 2)"),
            Err(WktParseError::UnsupportedType(_))
        ));
        assert!(matches!(
            parse_wkt("POINT (1 2) garbage"),
            Err(WktParseError::TrailingInput { .. })
        ));
        assert!(matches!(
            parse_wkt(""),
            Err(WktParseError::UnexpectedEnd)
        ));
    }

    #[test]
    fn rejects_numbers_that_do_not_parse() {
        assert!(matches!(
            parse_wkt("POINT (1.2.3 4)"),
            Err(WktParseError::InvalidNumber { .. })
        ));
    }
}
