use panel::payload::{ALL_LAYER_IDS, MapPayload, SOURCE_ID};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// Input events the panel subscribes to per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    HoverEnter,
    HoverLeave,
    Click,
}

pub const CLICKABLE_EVENTS: [SurfaceEvent; 3] = [
    SurfaceEvent::HoverEnter,
    SurfaceEvent::HoverLeave,
    SurfaceEvent::Click,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    DuplicateSource(String),
    DuplicateLayer(String),
    UnknownSource(String),
    Backend(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::DuplicateSource(id) => write!(f, "source {id} already registered"),
            SurfaceError::DuplicateLayer(id) => write!(f, "layer {id} already registered"),
            SurfaceError::UnknownSource(id) => write!(f, "layer references unknown source {id}"),
            SurfaceError::Backend(msg) => write!(f, "map backend error: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The map-rendering collaborator boundary.
///
/// Removal of an already-absent id is `Ok(false)`, not an error: rapid
/// successive updates make that race expected.
pub trait MapSurface {
    fn add_source(&mut self, id: &str, source: &JsonValue) -> Result<(), SurfaceError>;
    fn remove_source(&mut self, id: &str) -> Result<bool, SurfaceError>;
    fn add_layer(&mut self, id: &str, layer: &JsonValue) -> Result<(), SurfaceError>;
    fn remove_layer(&mut self, id: &str) -> Result<bool, SurfaceError>;
    fn bind_events(&mut self, layer_id: &str, events: &[SurfaceEvent]) -> Result<(), SurfaceError>;
}

/// Applies a payload to the surface with the remove-then-add cycle.
///
/// Layers go first on removal (they reference the source) and last on
/// addition. Running the removal half unconditionally guarantees no
/// duplicate-id registration and no stale layers when the data changes
/// shape; `None` payload means remove and stop there.
pub fn sync(surface: &mut dyn MapSurface, payload: Option<&MapPayload>) -> Result<(), SurfaceError> {
    for layer_id in ALL_LAYER_IDS {
        surface.remove_layer(layer_id)?;
    }
    surface.remove_source(SOURCE_ID)?;

    let Some(payload) = payload else {
        return Ok(());
    };

    surface.add_source(SOURCE_ID, &payload.source_json())?;
    for layer in &payload.layers {
        surface.add_layer(layer.id, &layer.to_json_value())?;
        surface.bind_events(layer.id, &CLICKABLE_EVENTS)?;
    }
    Ok(())
}

/// Recorded surface operation, for protocol assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    AddSource(String),
    RemoveSource(String),
    AddLayer(String),
    RemoveLayer(String),
    BindEvents(String, Vec<SurfaceEvent>),
}

/// Test double: tracks registered ids, enforces the duplicate-id rules a
/// real map backend applies, and records every operation in call order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    sources: BTreeSet<String>,
    layers: BTreeSet<String>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains(id)
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.contains(id)
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(String::as_str).collect()
    }
}

impl MapSurface for RecordingSurface {
    fn add_source(&mut self, id: &str, _source: &JsonValue) -> Result<(), SurfaceError> {
        if !self.sources.insert(id.to_string()) {
            return Err(SurfaceError::DuplicateSource(id.to_string()));
        }
        self.ops.push(SurfaceOp::AddSource(id.to_string()));
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<bool, SurfaceError> {
        let removed = self.sources.remove(id);
        self.ops.push(SurfaceOp::RemoveSource(id.to_string()));
        Ok(removed)
    }

    fn add_layer(&mut self, id: &str, layer: &JsonValue) -> Result<(), SurfaceError> {
        let source = layer
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if !self.sources.contains(source) {
            return Err(SurfaceError::UnknownSource(source.to_string()));
        }
        if !self.layers.insert(id.to_string()) {
            return Err(SurfaceError::DuplicateLayer(id.to_string()));
        }
        self.ops.push(SurfaceOp::AddLayer(id.to_string()));
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<bool, SurfaceError> {
        let removed = self.layers.remove(id);
        self.ops.push(SurfaceOp::RemoveLayer(id.to_string()));
        Ok(removed)
    }

    fn bind_events(
        &mut self,
        layer_id: &str,
        events: &[SurfaceEvent],
    ) -> Result<(), SurfaceError> {
        self.ops
            .push(SurfaceOp::BindEvents(layer_id.to_string(), events.to_vec()));
        Ok(())
    }
}
