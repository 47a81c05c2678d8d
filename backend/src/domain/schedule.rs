//! Dose-schedule normalization.
//!
//! Every write path runs medication schedules through [`normalize_dose_times`]
//! so that `dose_times.len() == times_per_day` always holds.
//!
//! Fallback rules are asymmetric on purpose and load-bearing for
//! compatibility: a candidate that is present but fails validation falls
//! back to the hardcoded default, while a missing candidate repeats the
//! previously resolved time.

use once_cell::sync::Lazy;
use regex::Regex;

/// The time a dose resolves to when nothing usable was supplied.
pub const DEFAULT_DOSE_TIME: &str = "08:00";

static DOSE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

/// Strict `HH:MM` check, 00:00 through 23:59. No trimming, no leniency.
pub fn is_valid_dose_time(candidate: &str) -> bool {
    DOSE_TIME_RE.is_match(candidate)
}

/// Coerce a requested dose count to a positive integer, defaulting to 1
/// when absent or non-positive.
pub fn coerce_times_per_day(count: Option<i64>) -> u32 {
    match count {
        Some(n) if n > 0 => n as u32,
        _ => 1,
    }
}

/// Produce exactly `count` validated `HH:MM` times from a candidate list.
///
/// For each index: a valid candidate is taken as-is; an invalid candidate
/// falls back to [`DEFAULT_DOSE_TIME`] (not the previous value); a missing
/// candidate repeats the previously resolved time, with index 0 bottoming
/// out at the default.
pub fn normalize_dose_times(count: u32, candidates: &[String]) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let time = match candidates.get(i) {
            Some(c) if is_valid_dose_time(c) => c.clone(),
            Some(_) => DEFAULT_DOSE_TIME.to_string(),
            None => resolved
                .last()
                .cloned()
                .unwrap_or_else(|| DEFAULT_DOSE_TIME.to_string()),
        };
        resolved.push(time);
    }
    resolved
}

/// Normalize a single optional time: valid input is kept, anything else
/// resolves to [`DEFAULT_DOSE_TIME`].
pub fn normalize_single_time(candidate: Option<&str>) -> String {
    match candidate {
        Some(c) if is_valid_dose_time(c) => c.to_string(),
        _ => DEFAULT_DOSE_TIME.to_string(),
    }
}
