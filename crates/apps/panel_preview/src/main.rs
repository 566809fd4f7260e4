//! Host simulation for the geo panel: loads a dataset, runs the pipeline,
//! applies the result to a recording surface, and prints the payload.
//!
//! Usage: `panel_preview [dataset.json]`. Without an argument the embedded
//! demo dataset is used. `PANEL_OPTIONS` may point at a panel options JSON
//! file (kebab-case keys, as the host stores them).

use std::env;
use std::fs;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use foundation::time::Time;
use frame::Frame;
use panel::feature::format_time;
use panel::options::PanelOptions;
use panel::time_select::EffectiveTime;
use runtime::{relative_label, PanelController};
use surface::RecordingSurface;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEMO_DATASET: &str = include_str!("../assets/demo.json");

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let dataset = match env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).map_err(|e| format!("cannot read {path}: {e}"))?
        }
        None => DEMO_DATASET.to_string(),
    };
    let frame = Frame::from_json_str(&dataset).map_err(|e| format!("invalid dataset: {e}"))?;
    info!(
        rows = frame.row_count(),
        fields = frame.fields().len(),
        "dataset loaded"
    );

    let options = match env::var("PANEL_OPTIONS") {
        Ok(path) => {
            let text =
                fs::read_to_string(&path).map_err(|e| format!("cannot read {path}: {e}"))?;
            serde_json::from_str(&text).map_err(|e| format!("invalid options: {e}"))?
        }
        Err(_) => PanelOptions::default(),
    };

    let mut surface = RecordingSurface::new();
    let mut controller = PanelController::new(options);
    controller
        .set_frame(frame, &mut surface)
        .map_err(|e| format!("surface sync failed: {e}"))?;

    if let Some(model) = controller.slider_model() {
        info!(
            min = model.min.millis(),
            max = model.max.millis(),
            domain_values = model.domain.len(),
            "slider model"
        );
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| Time(d.as_millis() as i64))
        .unwrap_or(Time(0));
    match controller.effective_time() {
        Some(EffectiveTime::Snapshot(t)) => {
            info!("effective time: {} ({})", format_time(t), relative_label(t, now));
        }
        Some(EffectiveTime::Range { start, end }) => {
            info!(
                "effective range: {} .. {}",
                format_time(start),
                format_time(end)
            );
        }
        None => info!("no effective time (nothing selectable)"),
    }

    for op in surface.ops() {
        info!("surface op: {op:?}");
    }

    match controller.applied_payload() {
        Some(payload) => {
            let text = serde_json::to_string_pretty(&payload.to_json_value())
                .map_err(|e| format!("cannot serialize payload: {e}"))?;
            println!("{text}");
        }
        None => println!("no payload (nothing to render)"),
    }
    Ok(())
}
