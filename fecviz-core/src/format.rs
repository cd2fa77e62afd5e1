use crate::scale::round_half_up;
use std::fmt;

const SI_SYMBOLS: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Label drawn on a bar: small counts as-is, larger ones SI-abbreviated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountLabel {
    Raw(u64),
    Si(String),
}

impl fmt::Display for CountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountLabel::Raw(n) => write!(f, "{n}"),
            CountLabel::Si(s) => f.write_str(s),
        }
    }
}

pub fn format_bin_count(count: u64) -> CountLabel {
    if count < 100 {
        return CountLabel::Raw(count);
    }
    CountLabel::Si(si_format(count as f64, 3))
}

/// SI-prefixed number with `precision` significant digits: `1000 -> "1.00k"`, `12345 -> "12.3k"`.
pub fn si_format(value: f64, precision: i32) -> String {
    let (exp, symbol) = si_prefix(value, precision);
    let scaled = if exp != 0 { value / 10f64.powi(exp) } else { value };
    let rounded = round_to(scaled, rounding_digits(scaled.abs(), precision));
    let decimals = (precision - int_digits(rounded.abs())).clamp(0, 20) as usize;
    format!("{rounded:.decimals$}{symbol}")
}

/// Dollar amount with an SI prefix, as used on the axis: `$50`, `$1k`, `$1M`.
pub fn si_currency(value: f64, precision: i32) -> String {
    let body = si_format(value.abs(), precision);
    if value < 0.0 {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

fn si_prefix(value: f64, precision: i32) -> (i32, &'static str) {
    let mut v = value.abs();
    if v == 0.0 || !v.is_finite() {
        return (0, "");
    }
    v = round_to(v, rounding_digits(v, precision));
    let magnitude = 1 + (1e-12 + v.log10()).floor() as i32;
    let exp = ((magnitude - 1) as f64 / 3.0).floor() as i32 * 3;
    let exp = exp.clamp(-24, 24);
    (exp, SI_SYMBOLS[((exp + 24) / 3) as usize])
}

// decimal places that keep `precision` significant digits
fn rounding_digits(x: f64, precision: i32) -> i32 {
    if x == 0.0 {
        return precision - 1;
    }
    precision - x.log10().ceil() as i32
}

// digits left of the decimal point, counting exact powers of ten as one more
fn int_digits(x: f64) -> i32 {
    if x == 0.0 {
        return 1;
    }
    (x.log10() + 1e-12).floor() as i32 + 1
}

fn round_to(x: f64, digits: i32) -> f64 {
    if digits == 0 {
        return round_half_up(x);
    }
    let m = 10f64.powi(digits);
    round_half_up(x * m) / m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn small_counts_raw() { assert_eq!(format_bin_count(50), CountLabel::Raw(50)); }
    #[test] fn zero_raw() { assert_eq!(format_bin_count(0).to_string(), "0"); }
    #[test] fn ninety_nine_raw() { assert_eq!(format_bin_count(99).to_string(), "99"); }
    #[test] fn hundred() { assert_eq!(format_bin_count(100), CountLabel::Si("100".into())); }
    #[test] fn hundred_fifty() { assert_eq!(format_bin_count(150).to_string(), "150"); }
    #[test] fn thousand() { assert_eq!(format_bin_count(1000).to_string(), "1.00k"); }
    #[test] fn twelve_thousand() { assert_eq!(format_bin_count(12345).to_string(), "12.3k"); }
    #[test] fn rounds_up_into_next_prefix() { assert_eq!(format_bin_count(999_999).to_string(), "1.00M"); }
    #[test] fn millions() { assert_eq!(format_bin_count(2_500_000).to_string(), "2.50M"); }

    #[test]
    fn axis_labels() {
        let labels: Vec<String> = [50.0, 200.0, 500.0, 1000.0, 10000.0, 50000.0, 100000.0, 1000000.0]
            .iter()
            .map(|&v| si_currency(v, 1))
            .collect();
        assert_eq!(labels, vec!["$50", "$200", "$500", "$1k", "$10k", "$50k", "$100k", "$1M"]);
    }

    #[test]
    fn sub_unit_values_use_small_prefixes() {
        assert_eq!(si_format(0.005, 1), "5m");
        assert_eq!(si_format(0.0, 3), "0.00");
    }
}
