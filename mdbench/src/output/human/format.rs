use std::time::Duration;

pub(crate) fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "0.00".to_string()
    }
}

/// Rounds to microseconds before handing off to humantime, so costs read
/// `1ms 234us` instead of carrying nanosecond noise.
pub(crate) fn format_cost(d: Duration) -> String {
    let rounded = Duration::from_micros(u64::try_from(d.as_micros()).unwrap_or(u64::MAX));
    if rounded.is_zero() {
        return "0us".to_string();
    }
    humantime::format_duration(rounded).to_string()
}

pub(crate) fn format_count(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
