/// Time primitives.
///
/// Instants are epoch milliseconds, the unit the dashboard host delivers.
/// Integer representation keeps equality, ordering, and domain membership
/// exact, which the snapshot filter depends on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub i64); // epoch milliseconds

impl Time {
    pub fn millis(&self) -> i64 {
        self.0
    }
}

/// Overall [min, max] instants a dataset may contain, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeBounds {
    pub min: Time,
    pub max: Time,
}

impl TimeBounds {
    pub fn new(min: Time, max: Time) -> Self {
        Self { min, max }
    }

    pub fn instant(t: Time) -> Self {
        Self { min: t, max: t }
    }

    pub fn contains(&self, t: Time) -> bool {
        t >= self.min && t <= self.max
    }

    pub fn duration_millis(&self) -> i64 {
        (self.max.0 - self.min.0).max(0)
    }
}
