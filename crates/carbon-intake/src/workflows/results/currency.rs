use std::sync::OnceLock;

use regex::Regex;

/// Separator used when re-joining a formatted range.
pub const EN_DASH: char = '–';

fn leading_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*\+?(\d+(?:\.\d*)?(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
            .expect("number prefix regex")
    })
}

/// Parse the numeric prefix of a range side, ignoring anything after it (`"250.00 "` → 250).
fn parse_amount(raw: &str) -> Option<f64> {
    leading_number()
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Format an amount as Brazilian reais without spacing, e.g. `R$30.000,00`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R${grouped},{fraction:02}")
}

/// Reformat an upstream range such as `R$250.00–R$750.00` (ASCII hyphen also accepted) into
/// pt-BR currency notation joined by an en-dash.
///
/// A range with only one parseable side formats that side alone; input with no parseable side
/// is returned unchanged. A missing value renders as `-`.
pub fn format_brl_range(range: Option<&str>) -> String {
    let Some(range) = range.filter(|raw| !raw.is_empty()) else {
        return "-".to_string();
    };

    let stripped = range.replace("R$", "");
    let mut sides = stripped.split(['–', '-']);
    let min = sides.next().and_then(parse_amount);
    let max = sides.next().and_then(parse_amount);

    match (min, max) {
        (Some(min), Some(max)) => format!("{}{EN_DASH}{}", format_brl(min), format_brl(max)),
        (Some(single), None) | (None, Some(single)) => format_brl(single),
        (None, None) => range.to_string(),
    }
}
