use foundation::time::TimeBounds;
use frame::Frame;

use crate::time_domain::cell_time;
use crate::time_select::EffectiveTime;

/// Materialized row filter: the ascending indices of rows whose time cell
/// matches the effective time value.
///
/// Built once per recomputation and shared by the geometry resolver and the
/// feature assembler, so both stages see the identical selection and stay
/// index-aligned by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection {
    indices: Vec<usize>,
}

impl RowSelection {
    /// `None` when the time field does not exist.
    pub fn select(frame: &Frame, time_field: &str, effective: &EffectiveTime) -> Option<Self> {
        let field = frame.field(time_field)?;

        let mut indices = Vec::new();
        for (index, cell) in field.values.iter().enumerate() {
            let Some(t) = cell_time(cell) else {
                continue; // gap cell, never matches
            };
            let selected = match *effective {
                EffectiveTime::Snapshot(at) => t == at,
                EffectiveTime::Range { start, end } => TimeBounds::new(start, end).contains(t),
            };
            if selected {
                indices.push(index);
            }
        }
        Some(Self { indices })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RowSelection;
    use crate::time_select::EffectiveTime;
    use foundation::time::{Time, TimeBounds};
    use foundation::value::Value;
    use frame::{Field, Frame};

    fn frame_with_times(cells: Vec<Value>) -> Frame {
        Frame::new(
            vec![Field::new("time", cells)],
            TimeBounds::new(Time(0), Time(100)),
        )
        .unwrap()
    }

    #[test]
    fn snapshot_matches_exact_instants_only() {
        let frame = frame_with_times(vec![
            Value::from(10i64),
            Value::from(20i64),
            Value::from(10i64),
        ]);
        let rows =
            RowSelection::select(&frame, "time", &EffectiveTime::Snapshot(Time(10))).unwrap();
        assert_eq!(rows.indices(), &[0, 2]);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let frame = frame_with_times(vec![
            Value::from(5i64),
            Value::from(10i64),
            Value::from(20i64),
            Value::from(25i64),
        ]);
        let rows = RowSelection::select(
            &frame,
            "time",
            &EffectiveTime::Range {
                start: Time(10),
                end: Time(20),
            },
        )
        .unwrap();
        assert_eq!(rows.indices(), &[1, 2]);
    }

    #[test]
    fn gap_cells_never_match() {
        let frame = frame_with_times(vec![Value::Null, Value::from(10i64), Value::from("x")]);
        let rows = RowSelection::select(
            &frame,
            "time",
            &EffectiveTime::Range {
                start: Time(0),
                end: Time(100),
            },
        )
        .unwrap();
        assert_eq!(rows.indices(), &[1]);
    }

    #[test]
    fn missing_time_field_is_unavailable() {
        let frame = frame_with_times(vec![Value::from(1i64)]);
        assert_eq!(
            RowSelection::select(&frame, "other", &EffectiveTime::Snapshot(Time(1))),
            None
        );
    }
}
