//! Time display helpers
//!
//! Both helpers accept whatever the media backend reports, including NaN
//! before metadata arrives, and never produce NaN themselves.

/// Format seconds as `mm:ss`
///
/// Minutes are not wrapped at an hour, so 75 minutes renders as `75:00`.
/// Unknown, negative and zero inputs render as `00:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// `part / whole` as a percentage clamped to `0..=100`
///
/// Returns `0.0` when `whole` is unknown, zero or non-finite, or when `part`
/// is NaN.
pub fn ratio_percent(part: f64, whole: Option<f64>) -> f64 {
    let Some(whole) = whole.filter(|w| w.is_finite() && *w > 0.0) else {
        return 0.0;
    };

    let percent = part / whole * 100.0;
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
