//! Elapsed-time formatting for progress logs.

use std::time::Duration;

/// Formats a duration in the compact style used by the progress log.
///
/// Sub-second values are shown in milliseconds, values under a minute in
/// seconds with one decimal, and longer values as `Xm Ys` or `Xh Ym`. The
/// trailing component is dropped when it is less than one unit.
pub fn format_duration(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    if seconds < 1.0 {
        return format!("{:.1}ms", seconds * 1000.0);
    }
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let whole = elapsed.as_secs();
    if whole < 3600 {
        let (minutes, rest) = (whole / 60, whole % 60);
        if rest == 0 {
            format!("{minutes}m")
        } else {
            format!("{minutes}m {rest}s")
        }
    } else {
        let (hours, rest) = (whole / 3600, whole % 3600);
        if rest == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {}m", rest / 60)
        }
    }
}
