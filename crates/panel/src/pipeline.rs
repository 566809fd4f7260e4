use frame::Frame;
use geometry::wkt::{StandardWkt, WktParser};

use crate::feature::{AssembleError, assemble};
use crate::options::{GeometrySelection, PanelOptions};
use crate::payload::{MapPayload, build_payload};
use crate::resolve::{ResolveError, resolve_geo_coordinates, resolve_wkt};
use crate::rows::RowSelection;
use crate::time_domain::time_domain;
use crate::time_select::{TimeSelection, reconcile};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Resolve(ResolveError),
    Assemble(AssembleError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Resolve(e) => write!(f, "geometry resolution failed: {e}"),
            PipelineError::Assemble(e) => write!(f, "feature assembly failed: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Resolve(e) => Some(e),
            PipelineError::Assemble(e) => Some(e),
        }
    }
}

impl From<ResolveError> for PipelineError {
    fn from(e: ResolveError) -> Self {
        PipelineError::Resolve(e)
    }
}

impl From<AssembleError> for PipelineError {
    fn from(e: AssembleError) -> Self {
        PipelineError::Assemble(e)
    }
}

struct Memo {
    fingerprint: String,
    payload: Option<MapPayload>,
}

/// Runs the four stages in dependency order: time domain, effective time,
/// geometry/features, map payload.
///
/// The result is memoized on a content fingerprint of the three inputs, so
/// redundant events skip the WKT re-parse, the dominant cost on large
/// datasets. Only successful recomputations are memoized; a failure leaves
/// the previous memo in place.
pub struct Pipeline {
    parser: Box<dyn WktParser>,
    memo: Option<Memo>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_parser(Box::new(StandardWkt))
    }

    pub fn with_parser(parser: Box<dyn WktParser>) -> Self {
        Self { parser, memo: None }
    }

    /// `Ok(None)` is the "unavailable" outcome: render nothing, remove any
    /// previously applied map state. `Err` means the caller must keep the
    /// last good state untouched.
    pub fn recompute(
        &mut self,
        frame: &Frame,
        options: &PanelOptions,
        selection: &TimeSelection,
    ) -> Result<Option<MapPayload>, PipelineError> {
        let fingerprint = fingerprint(frame, options, selection);
        if let Some(memo) = &self.memo {
            if memo.fingerprint == fingerprint {
                return Ok(memo.payload.clone());
            }
        }

        let payload = self.compute(frame, options, selection)?;
        self.memo = Some(Memo {
            fingerprint,
            payload: payload.clone(),
        });
        Ok(payload)
    }

    fn compute(
        &self,
        frame: &Frame,
        options: &PanelOptions,
        selection: &TimeSelection,
    ) -> Result<Option<MapPayload>, PipelineError> {
        let domain = time_domain(frame, &options.time_column_name);
        let Some(effective) = reconcile(frame, domain.as_ref(), options.time_option, selection)
        else {
            return Ok(None);
        };
        let Some(rows) = RowSelection::select(frame, &options.time_column_name, &effective)
        else {
            return Ok(None);
        };

        let geometries = match options.selection {
            GeometrySelection::Wkt => {
                resolve_wkt(frame, &options.wkt_column_name, &rows, self.parser.as_ref())?
            }
            GeometrySelection::GeoCoordinate => resolve_geo_coordinates(
                frame,
                &options.latitude_column_name,
                &options.longitude_column_name,
                &rows,
            )?,
        };
        let Some(geometries) = geometries else {
            return Ok(None);
        };

        let features = assemble(frame, options, &rows, geometries)?;
        Ok(build_payload(Some(features), options))
    }
}

/// Content fingerprint over the canonical JSON encodings of the inputs.
fn fingerprint(frame: &Frame, options: &PanelOptions, selection: &TimeSelection) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(frame.to_json_value().to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(
        serde_json::to_string(options)
            .unwrap_or_default()
            .as_bytes(),
    );
    hasher.update(b"|");
    match selection.snapshot {
        Some(t) => {
            hasher.update(b"s");
            hasher.update(&t.0.to_le_bytes());
        }
        None => {
            hasher.update(b"-");
        }
    }
    match selection.range {
        Some((start, end)) => {
            hasher.update(b"r");
            hasher.update(&start.0.to_le_bytes());
            hasher.update(&end.0.to_le_bytes());
        }
        None => {
            hasher.update(b"-");
        }
    }
    hasher.finalize().to_hex().to_string()
}
