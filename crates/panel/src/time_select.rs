use foundation::time::Time;
use frame::Frame;

use crate::options::TimeOption;
use crate::time_domain::TimeDomain;

/// The user's last explicit choices, one independent slot per mode.
///
/// Slots survive mode reconfiguration; only the configured mode's slot is
/// consulted. A slot is never validated at entry, only at reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSelection {
    pub snapshot: Option<Time>,
    pub range: Option<(Time, Time)>,
}

/// The authoritative time filter driving all downstream stages.
///
/// One tagged union with two cases, decided by the configured mode.
/// Consumers branch on the variant they received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveTime {
    Snapshot(Time),
    Range { start: Time, end: Time },
}

/// Reconciles domain, bounds, mode, and the user's selection into the
/// effective time value. Total and pure: no memory beyond the inputs.
///
/// Snapshot mode: a selection still present in the domain passes through;
/// anything else (no selection, or a selection the data refresh removed)
/// silently falls back to the first domain value. `None` when the frame is
/// empty or the domain is unavailable.
///
/// Range mode: a selection with start <= end and both endpoints inside the
/// frame's overall time bounds passes through; anything else falls back to
/// the full bounds.
pub fn reconcile(
    frame: &Frame,
    domain: Option<&TimeDomain>,
    mode: TimeOption,
    selection: &TimeSelection,
) -> Option<EffectiveTime> {
    match mode {
        TimeOption::Snapshots => {
            if frame.row_count() == 0 {
                return None;
            }
            let domain = domain?;
            if let Some(chosen) = selection.snapshot {
                if domain.contains(chosen) {
                    return Some(EffectiveTime::Snapshot(chosen));
                }
            }
            domain.first().map(EffectiveTime::Snapshot)
        }
        TimeOption::TimeRange => {
            let bounds = frame.time_bounds();
            if let Some((start, end)) = selection.range {
                if start <= end && bounds.contains(start) && bounds.contains(end) {
                    return Some(EffectiveTime::Range { start, end });
                }
            }
            Some(EffectiveTime::Range {
                start: bounds.min,
                end: bounds.max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectiveTime, TimeSelection, reconcile};
    use crate::options::TimeOption;
    use crate::time_domain::time_domain;
    use foundation::time::{Time, TimeBounds};
    use foundation::value::Value;
    use frame::{Field, Frame};

    fn frame_with_times(millis: &[i64]) -> Frame {
        Frame::new(
            vec![Field::new(
                "time",
                millis.iter().map(|&m| Value::from(m)).collect(),
            )],
            TimeBounds::new(Time(0), Time(100)),
        )
        .unwrap()
    }

    fn snapshot_of(millis: i64) -> TimeSelection {
        TimeSelection {
            snapshot: Some(Time(millis)),
            range: None,
        }
    }

    #[test]
    fn snapshot_keeps_a_selection_present_in_the_domain() {
        let frame = frame_with_times(&[5, 10, 15]);
        let domain = time_domain(&frame, "time");
        let got = reconcile(
            &frame,
            domain.as_ref(),
            TimeOption::Snapshots,
            &snapshot_of(10),
        );
        assert_eq!(got, Some(EffectiveTime::Snapshot(Time(10))));
    }

    #[test]
    fn snapshot_falls_back_to_first_domain_value_when_stale() {
        // The selection of 10 was valid before a refresh replaced the data.
        let frame = frame_with_times(&[1, 2, 3]);
        let domain = time_domain(&frame, "time");
        let got = reconcile(
            &frame,
            domain.as_ref(),
            TimeOption::Snapshots,
            &snapshot_of(10),
        );
        assert_eq!(got, Some(EffectiveTime::Snapshot(Time(1))));
    }

    #[test]
    fn snapshot_falls_back_when_nothing_is_selected() {
        let frame = frame_with_times(&[7, 8]);
        let domain = time_domain(&frame, "time");
        let got = reconcile(
            &frame,
            domain.as_ref(),
            TimeOption::Snapshots,
            &TimeSelection::default(),
        );
        assert_eq!(got, Some(EffectiveTime::Snapshot(Time(7))));
    }

    #[test]
    fn snapshot_is_unavailable_without_rows_or_domain() {
        let empty = frame_with_times(&[]);
        assert_eq!(
            reconcile(&empty, None, TimeOption::Snapshots, &snapshot_of(1)),
            None
        );

        let frame = frame_with_times(&[1]);
        assert_eq!(
            reconcile(&frame, None, TimeOption::Snapshots, &snapshot_of(1)),
            None
        );
    }

    #[test]
    fn range_passes_through_a_selection_inside_bounds() {
        let frame = frame_with_times(&[1, 2]);
        let selection = TimeSelection {
            snapshot: None,
            range: Some((Time(10), Time(90))),
        };
        let got = reconcile(&frame, None, TimeOption::TimeRange, &selection);
        assert_eq!(
            got,
            Some(EffectiveTime::Range {
                start: Time(10),
                end: Time(90),
            })
        );
    }

    #[test]
    fn range_falls_back_to_full_bounds_when_out_of_bounds() {
        let frame = frame_with_times(&[1, 2]);
        let selection = TimeSelection {
            snapshot: None,
            range: Some((Time(150), Time(200))),
        };
        let got = reconcile(&frame, None, TimeOption::TimeRange, &selection);
        assert_eq!(
            got,
            Some(EffectiveTime::Range {
                start: Time(0),
                end: Time(100),
            })
        );
    }

    #[test]
    fn range_treats_an_inverted_selection_as_invalid() {
        let frame = frame_with_times(&[1, 2]);
        let selection = TimeSelection {
            snapshot: None,
            range: Some((Time(90), Time(10))),
        };
        let got = reconcile(&frame, None, TimeOption::TimeRange, &selection);
        assert_eq!(
            got,
            Some(EffectiveTime::Range {
                start: Time(0),
                end: Time(100),
            })
        );
    }

    #[test]
    fn mode_alone_decides_the_output_case() {
        let frame = frame_with_times(&[5]);
        let domain = time_domain(&frame, "time");
        let selection = TimeSelection {
            snapshot: Some(Time(5)),
            range: Some((Time(1), Time(99))),
        };
        assert!(matches!(
            reconcile(&frame, domain.as_ref(), TimeOption::Snapshots, &selection),
            Some(EffectiveTime::Snapshot(_))
        ));
        assert!(matches!(
            reconcile(&frame, domain.as_ref(), TimeOption::TimeRange, &selection),
            Some(EffectiveTime::Range { .. })
        ));
    }
}
