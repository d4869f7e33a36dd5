//! Availability
//!
//! Pure interval arithmetic over a snapshot of blocking rental ranges.
//! All ranges are half-open `[start, end)`, so a booking ending exactly
//! when another starts is not a conflict; back-to-back rentals are
//! legitimate. Callers obtain the snapshot from the store inside the
//! same atomic unit that inserts or accepts a rental.

use jiff::Timestamp;

use crate::errors::InvalidRangeError;

/// Half-open overlap law: `[a, b)` and `[c, d)` overlap iff
/// `a < d && c < b`.
#[must_use]
pub fn intervals_overlap(first: (Timestamp, Timestamp), second: (Timestamp, Timestamp)) -> bool {
    first.0 < second.1 && second.0 < first.1
}

/// Check that `end` comes strictly after `start`.
///
/// # Errors
///
/// Returns [`InvalidRangeError`] otherwise; an inverted range is an
/// error, never a `false` availability answer.
pub fn validate_range(start: Timestamp, end: Timestamp) -> Result<(), InvalidRangeError> {
    if end > start {
        Ok(())
    } else {
        Err(InvalidRangeError { start, end })
    }
}

/// Whether `[start, end)` is free of every blocking interval.
///
/// A listing with no blocking rentals is trivially available.
///
/// # Errors
///
/// Returns [`InvalidRangeError`] if `end` is not strictly after `start`.
pub fn is_range_available(
    blocking: &[(Timestamp, Timestamp)],
    start: Timestamp,
    end: Timestamp,
) -> Result<bool, InvalidRangeError> {
    validate_range(start, end)?;

    Ok(!blocking
        .iter()
        .any(|&interval| intervals_overlap((start, end), interval)))
}

/// Whether the single instant `date` is free.
///
/// The date is treated as the one-instant range `[date, date]`: it is
/// taken iff some blocking interval contains it, i.e.
/// `start <= date < end`.
#[must_use]
pub fn is_date_available(blocking: &[(Timestamp, Timestamp)], date: Timestamp) -> bool {
    !blocking
        .iter()
        .any(|&(start, end)| start <= date && date < end)
}
