//! Parsing and formatting of link lifetimes such as `"90s"` or `"1h30m"`.

use chrono::TimeDelta;

use crate::error::AppError;

/// Parse a duration made of `<number><unit>` pairs.
///
/// Units: `ms`, `s`, `m`, `h`, `d`. A leading `-` negates the whole value,
/// which lets callers decide how to treat non-positive lifetimes.
pub fn parse_ttl(input: &str) -> Result<TimeDelta, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("TTL must not be empty"));
    }

    let (negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }

    let mut total = TimeDelta::zero();
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(AppError::invalid_input(format!("Invalid TTL '{input}'")));
        }
        let value: i64 = rest[..digits]
            .parse()
            .map_err(|_| AppError::invalid_input(format!("TTL value too large in '{input}'")))?;
        rest = &rest[digits..];

        let unit_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let part = match unit {
            "ms" => TimeDelta::try_milliseconds(value),
            "s" => TimeDelta::try_seconds(value),
            "m" => TimeDelta::try_minutes(value),
            "h" => TimeDelta::try_hours(value),
            "d" => TimeDelta::try_days(value),
            "" => {
                return Err(AppError::invalid_input(format!(
                    "Missing unit in TTL '{input}'"
                )));
            }
            other => {
                return Err(AppError::invalid_input(format!(
                    "Unknown TTL unit '{other}' in '{input}'"
                )));
            }
        }
        .ok_or_else(|| AppError::invalid_input(format!("TTL out of range: '{input}'")))?;

        total = total
            .checked_add(&part)
            .ok_or_else(|| AppError::invalid_input(format!("TTL out of range: '{input}'")))?;
    }

    Ok(if negative { -total } else { total })
}

/// Format a duration as `1h2m3s`, dropping leading zero units.
///
/// Negative durations are clamped to `0s`.
pub fn format_ttl(ttl: TimeDelta) -> String {
    let secs = ttl.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m{s}s"),
        _ => format!("{h}h{m}m{s}s"),
    }
}
