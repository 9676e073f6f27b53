//! Token accounting scraped from the Copilot CLI's usage summary.
//!
//! At the end of a non-interactive run the CLI prints one line per model,
//! e.g. `claude-sonnet-4.5  17.5k in, 312 out, 12k cached`. A line counts as
//! a summary when it is nothing but comma-separated `<n> in|out|cached`
//! fields, optionally led by a model name. Fields may appear in any order or
//! be missing. Counts may carry a `k` (thousand) or `m` (million) suffix and
//! a decimal fraction.

use crate::types::TokenUsage;
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static USAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\S+\s+)?\d+(?:\.\d+)?[km]?\s+(?:in|out|cached)(?:\s*,\s*\d+(?:\.\d+)?[km]?\s+(?:in|out|cached))*\s*$",
    )
    .expect("usage line pattern is valid")
});

#[allow(clippy::expect_used)]
static USAGE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)([km])?\s+(in|out|cached)\b")
        .expect("usage field pattern is valid")
});

/// Sums the usage of every summary line in `output`.
///
/// Output without a summary yields all-zero usage.
#[must_use]
pub fn parse_usage(output: &str) -> TokenUsage {
    output
        .lines()
        .filter(|line| is_usage_line(line))
        .flat_map(|line| USAGE_FIELD.captures_iter(line))
        .fold(TokenUsage::default(), |mut acc, caps| {
            let count = scale(&caps[1], caps.get(2).map(|m| m.as_str())).unwrap_or(0);
            let slot = match caps[3].to_ascii_lowercase().as_str() {
                "in" => &mut acc.input,
                "out" => &mut acc.output,
                _ => &mut acc.cached,
            };
            *slot = slot.saturating_add(count);
            acc
        })
}

/// Whether `line` is a usage summary line.
#[must_use]
pub fn is_usage_line(line: &str) -> bool {
    USAGE_LINE.is_match(line)
}

/// Parses a single count such as `500`, `17.5k` or `1.5m`.
#[must_use]
pub fn parse_token_count(text: &str) -> Option<u64> {
    let text = text.trim();
    let (number, suffix) = match text.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&text[..idx], Some(&text[idx..])),
        _ => (text, None),
    };
    scale(number, suffix)
}

/// Applies the suffix multiplier using integer arithmetic so `17.5k` is
/// exactly 17500.
fn scale(number: &str, suffix: Option<&str>) -> Option<u64> {
    let multiplier: u64 = match suffix.map(str::to_ascii_lowercase).as_deref() {
        None => 1,
        Some("k") => 1_000,
        Some("m") => 1_000_000,
        Some(_) => return None,
    };

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let mut total = whole.parse::<u64>().ok()?.checked_mul(multiplier)?;

    let mut unit = multiplier;
    for digit in fraction.chars() {
        unit /= 10;
        if unit == 0 {
            break;
        }
        total = total.checked_add(u64::from(digit.to_digit(10)?) * unit)?;
    }

    Some(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_summary_line() {
        let usage = parse_usage("model-x 1000 in, 500 out, 200 cached\nTask completed");
        assert_eq!(
            usage,
            TokenUsage {
                input: 1000,
                output: 500,
                cached: 200
            }
        );
    }

    #[test]
    fn applies_suffix_multipliers() {
        assert_eq!(parse_token_count("17.5k"), Some(17_500));
        assert_eq!(parse_token_count("1.5m"), Some(1_500_000));
        assert_eq!(parse_token_count("2K"), Some(2_000));
        assert_eq!(parse_token_count("42"), Some(42));
        assert_eq!(parse_token_count("3x"), None);

        assert_eq!(parse_usage("17.5k in").input, 17_500);
        assert_eq!(parse_usage("1.5m in").input, 1_500_000);
        assert_eq!(parse_usage("2k out").output, 2_000);
        assert_eq!(parse_usage("0.5m cached").cached, 500_000);

        let usage = parse_usage("gpt-5 17.5k in, 1.5m out, 2.25k cached");
        assert_eq!(usage.input, 17_500);
        assert_eq!(usage.output, 1_500_000);
        assert_eq!(usage.cached, 2_250);
    }

    #[test]
    fn sums_lines_for_multiple_models() {
        let output = "Usage by model:\n  gpt-5 1k in, 100 out\n  claude-sonnet-4.5 2k in, 50 out, 10 cached\n";
        let usage = parse_usage(output);
        assert_eq!(usage.input, 3_000);
        assert_eq!(usage.output, 150);
        assert_eq!(usage.cached, 10);
    }

    #[test]
    fn fields_in_any_order_or_partial() {
        let usage = parse_usage("model-x 500 out, 17.5k in");
        assert_eq!(usage.input, 17_500);
        assert_eq!(usage.output, 500);

        assert_eq!(parse_usage("model-x 1.5m in\nok").input, 1_500_000);
    }

    #[test]
    fn no_summary_means_zero() {
        assert_eq!(parse_usage("I found 3 in the list."), TokenUsage::default());
        assert!(!is_usage_line("I found 3 in the list."));
        assert!(is_usage_line("model-x 1000 in, 500 out, 200 cached"));
        assert!(is_usage_line("17.5k in"));
        assert!(!is_usage_line("Tests: 3 in suite, 2 out of date"));
    }
}
