use foundation::time::Time;
use panel::options::TimeOption;

/// What the time-slider collaborator needs to render itself: the overall
/// bounds for the track, the mode (one handle vs. two), and the domain
/// values a snapshot handle may land on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderModel {
    pub min: Time,
    pub max: Time,
    pub mode: TimeOption,
    pub domain: Vec<Time>,
}

/// Snaps a raw slider position to the nearest domain value. Ties keep the
/// earlier value, matching scan order.
pub fn closest_value(target: Time, values: &[Time]) -> Option<Time> {
    let mut iter = values.iter().copied();
    let mut closest = iter.next()?;
    for candidate in iter {
        if (candidate.0 - target.0).abs() < (closest.0 - target.0).abs() {
            closest = candidate;
        }
    }
    Some(closest)
}

/// Relative label for slider tooltips and the effective-time caption,
/// e.g. "5 minutes ago" or "in an hour".
pub fn relative_label(t: Time, now: Time) -> String {
    let delta_ms = now.0 - t.0;
    let past = delta_ms >= 0;
    let secs = delta_ms.unsigned_abs() / 1000;
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    let phrase = if secs < 60 {
        "a few seconds".to_string()
    } else if minutes == 1 {
        "a minute".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes")
    } else if hours == 1 {
        "an hour".to_string()
    } else if hours < 24 {
        format!("{hours} hours")
    } else if days == 1 {
        "a day".to_string()
    } else if days < 30 {
        format!("{days} days")
    } else if months == 1 {
        "a month".to_string()
    } else if days < 365 {
        format!("{months} months")
    } else if years == 1 {
        "a year".to_string()
    } else {
        format!("{years} years")
    };

    if past {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}
