//! Human-readable byte sizes
//!
//! Parsing of size arguments such as `500MB`, `5g` or `1.5 KiB`, and the
//! reverse formatting used by the table output. All units are binary
//! (1 KB = 1024 bytes).

use crate::errors::{FindError, FindResult};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;
const PB: u64 = TB * 1024;

const UNITS: &[(&[&str], u64)] = &[
    (&["", "b"], 1),
    (&["k", "kb", "kib"], KB),
    (&["m", "mb", "mib"], MB),
    (&["g", "gb", "gib"], GB),
    (&["t", "tb", "tib"], TB),
    (&["p", "pb", "pib"], PB),
];

fn invalid(input: &str, reason: impl Into<String>) -> FindError {
    FindError::InvalidSize {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Parse a size string into a byte count.
///
/// Accepts an integer or decimal number followed by an optional,
/// case-insensitive unit (`B`, `K`/`KB`/`KiB`, `M`, `G`, `T`, `P` and their
/// long forms). Whitespace between number and unit is allowed. Fractional
/// byte counts round down.
pub fn parse_size(input: &str) -> FindResult<u64> {
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid(input, "empty size"));
    }
    if s.starts_with('-') {
        return Err(invalid(input, "size cannot be negative"));
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    if !number.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(input, "missing numeric value"));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| invalid(input, format!("'{number}' is not a number")))?;

    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = UNITS
        .iter()
        .find(|(names, _)| names.contains(&unit.as_str()))
        .map(|(_, m)| *m)
        .ok_or_else(|| {
            invalid(
                input,
                format!("unknown unit '{unit}' (use B, K/KB/KiB, M/MB/MiB, G/GB/GiB, T/TB/TiB, P/PB/PiB)"),
            )
        })?;

    let bytes = (value * multiplier as f64).floor();
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(invalid(input, "size is too large"));
    }
    Ok(bytes as u64)
}

/// Format a byte count for humans: `512B`, `1.5KB`, `3.0GB`.
pub fn human_size(bytes: u64) -> String {
    const LABELS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    if bytes < KB {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < LABELS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{value:.1}{}", LABELS[idx])
}
