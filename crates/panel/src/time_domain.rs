use foundation::time::Time;
use foundation::value::Value;
use frame::Frame;

/// Distinct time values of a frame's time column, in first-seen order.
///
/// Accumulation order is part of the contract: the reconciler's snapshot
/// fallback picks the first value, so the order must be reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDomain {
    values: Vec<Time>,
}

impl TimeDomain {
    pub fn values(&self) -> &[Time] {
        &self.values
    }

    pub fn first(&self) -> Option<Time> {
        self.values.first().copied()
    }

    pub fn contains(&self, t: Time) -> bool {
        self.values.contains(&t)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads a time cell. Non-numeric and non-finite cells are gaps: they never
/// enter the domain and never match a filter.
pub(crate) fn cell_time(value: &Value) -> Option<Time> {
    value.as_f64().map(|n| Time(n as i64))
}

/// Derives the time domain, or `None` when the frame has no rows or the
/// named field does not exist.
pub fn time_domain(frame: &Frame, time_field: &str) -> Option<TimeDomain> {
    if frame.row_count() == 0 {
        return None;
    }
    let field = frame.field(time_field)?;

    let mut values: Vec<Time> = Vec::new();
    for cell in &field.values {
        if let Some(t) = cell_time(cell) {
            if !values.contains(&t) {
                values.push(t);
            }
        }
    }
    Some(TimeDomain { values })
}
