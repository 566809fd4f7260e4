use foundation::time::Time;
use frame::Frame;
use panel::options::{PanelOptions, TimeOption};
use panel::payload::MapPayload;
use panel::pipeline::Pipeline;
use panel::time_domain::{TimeDomain, time_domain};
use panel::time_select::{EffectiveTime, TimeSelection, reconcile};
use surface::{MapSurface, SurfaceError, sync};
use tracing::{debug, warn};

use crate::popup::Popup;
use crate::slider::{SliderModel, closest_value};

/// A discrete user interaction with the time slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderChange {
    /// Raw single-handle position; snapped to the nearest domain value.
    Snapshot(Time),
    /// Two-handle range, as positioned.
    Range(Time, Time),
}

/// Glue between host events and the recompute/sync cycle.
///
/// Owns the single map-surface protocol: every event entry point runs the
/// pipeline and applies the result. A failed recomputation is logged and
/// swallowed, leaving the previously applied payload and the map untouched;
/// the panel never crashes and never clears a valid display over bad data.
pub struct PanelController {
    frame: Option<Frame>,
    options: PanelOptions,
    selection: TimeSelection,
    pipeline: Pipeline,
    applied: Option<MapPayload>,
    next_popup_key: u64,
    popup: Option<Popup>,
}

impl PanelController {
    pub fn new(options: PanelOptions) -> Self {
        Self {
            frame: None,
            options,
            selection: TimeSelection::default(),
            pipeline: Pipeline::new(),
            applied: None,
            next_popup_key: 0,
            popup: None,
        }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn applied_payload(&self) -> Option<&MapPayload> {
        self.applied.as_ref()
    }

    /// A new dataset arrived from the host.
    pub fn set_frame(
        &mut self,
        frame: Frame,
        surface: &mut dyn MapSurface,
    ) -> Result<(), SurfaceError> {
        self.frame = Some(frame);
        self.refresh(surface)
    }

    /// The panel was reconfigured. Selection slots survive; reconciliation
    /// decides whether they still apply.
    pub fn set_options(
        &mut self,
        options: PanelOptions,
        surface: &mut dyn MapSurface,
    ) -> Result<(), SurfaceError> {
        self.options = options;
        self.refresh(surface)
    }

    /// The user moved the time control.
    pub fn slider_changed(
        &mut self,
        change: SliderChange,
        surface: &mut dyn MapSurface,
    ) -> Result<(), SurfaceError> {
        match change {
            SliderChange::Snapshot(raw) => {
                self.selection.snapshot = self
                    .time_domain()
                    .and_then(|d| closest_value(raw, d.values()));
            }
            SliderChange::Range(start, end) => {
                self.selection.range = Some((start, end));
            }
        }
        self.refresh(surface)
    }

    fn refresh(&mut self, surface: &mut dyn MapSurface) -> Result<(), SurfaceError> {
        let Some(frame) = &self.frame else {
            sync(surface, None)?;
            self.applied = None;
            return Ok(());
        };
        match self.pipeline.recompute(frame, &self.options, &self.selection) {
            Ok(payload) => {
                if payload != self.applied {
                    sync(surface, payload.as_ref())?;
                    debug!(
                        features = payload.as_ref().map_or(0, |p| p.features.len()),
                        layers = payload.as_ref().map_or(0, |p| p.layers.len()),
                        "applied map payload"
                    );
                    self.applied = payload;
                }
                Ok(())
            }
            Err(e) => {
                warn!("recompute failed, keeping last applied payload: {e}");
                Ok(())
            }
        }
    }

    pub fn time_domain(&self) -> Option<TimeDomain> {
        let frame = self.frame.as_ref()?;
        time_domain(frame, &self.options.time_column_name)
    }

    pub fn effective_time(&self) -> Option<EffectiveTime> {
        let frame = self.frame.as_ref()?;
        let domain = time_domain(frame, &self.options.time_column_name);
        reconcile(frame, domain.as_ref(), self.options.time_option, &self.selection)
    }

    pub fn slider_model(&self) -> Option<SliderModel> {
        let frame = self.frame.as_ref()?;
        let bounds = frame.time_bounds();
        let domain = match self.options.time_option {
            TimeOption::Snapshots => self
                .time_domain()
                .map_or_else(Vec::new, |d| d.values().to_vec()),
            TimeOption::TimeRange => Vec::new(),
        };
        Some(SliderModel {
            min: bounds.min,
            max: bounds.max,
            mode: self.options.time_option,
            domain,
        })
    }

    /// A click event from the input-routing collaborator, carrying the layer
    /// it hit, the click coordinates, and the resolved feature index in the
    /// applied payload. A click that resolved to no feature closes the popup.
    pub fn layer_clicked(
        &mut self,
        layer_id: &str,
        lng_lat: (f64, f64),
        feature_index: Option<usize>,
    ) -> Option<&Popup> {
        let feature = feature_index
            .and_then(|index| self.applied.as_ref().and_then(|p| p.features.get(index)));
        match feature {
            Some(feature) => {
                let key = self.next_popup_key;
                let popup = Popup::from_feature(key, lng_lat, feature);
                self.next_popup_key += 1;
                debug!(layer_id, key, "opening popup");
                self.popup = Some(popup);
            }
            None => {
                self.popup = None;
            }
        }
        self.popup.as_ref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn popup_closed(&mut self) {
        self.popup = None;
    }
}
