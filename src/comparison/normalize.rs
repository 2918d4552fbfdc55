//! Unit normalization for free-text specification values.
//!
//! Every family lower-cases its input, drops commas and whitespace, then runs
//! its unit patterns in a fixed order. Each pattern that matches overwrites the
//! value found by the ones before it, so the order below is significant.
//! Nothing here fails: text without a recognized unit yields
//! `normalized_value: None`.

use crate::comparison::models::NormalizedSpec;
use regex_lite::Regex;
use std::sync::LazyLock;

/// Unit patterns. Lookaheads are not supported, so patterns that must not be
/// followed by some text are checked with a reject suffix in [`capture`].
mod patterns {
    use super::*;

    pub static MILLIMETER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)mm").unwrap());
    pub static CENTIMETER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)cm").unwrap());
    pub static INCH: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"([\d.]+)(?:in|inch|インチ|")"#).unwrap());
    pub static METER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d.]+)m").unwrap());

    pub static GRAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d.]+)g").unwrap());
    pub static KILOGRAM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)kg").unwrap());
    pub static POUND: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)(?:lb|lbs|ポンド)").unwrap());
    pub static OUNCE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)(?:oz|オンス)").unwrap());

    pub static WATT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d.]+)w").unwrap());
    pub static KILOWATT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)kw").unwrap());
    pub static MILLIWATT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)mw").unwrap());

    pub static GIGABYTE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)gb").unwrap());
    pub static TERABYTE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)tb").unwrap());
    pub static MEGABYTE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)mb").unwrap());

    pub static DIMENSIONS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d+)x(\d+)").unwrap());
    pub static SCAN_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)p").unwrap());

    pub static HERTZ: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d.]+)hz").unwrap());

    pub static GIGABIT_PER_SEC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)gbps").unwrap());
    pub static MEGABIT_PER_SEC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([\d.]+)mbps").unwrap());
}

/// Lower-cases the text and strips commas and whitespace.
fn clean(value: &str) -> String {
    value.to_lowercase().chars().filter(|c| *c != ',' && !c.is_whitespace()).collect()
}

/// Parses the longest valid decimal prefix of a `[\d.]+` capture.
///
/// "1.2.3" reads as 1.2; a capture without any digit (".") is unknown.
fn parse_leading_float(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in text.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns the number captured by the first match of `re` whose unit is not
/// immediately followed by `reject`.
fn capture(re: &Regex, text: &str, reject: Option<&str>) -> Option<f64> {
    let caps = re.captures_iter(text).find(|caps| match (reject, caps.get(0)) {
        (Some(suffix), Some(whole)) => !text[whole.end()..].starts_with(suffix),
        _ => true,
    })?;

    caps.get(1).and_then(|m| parse_leading_float(m.as_str()))
}

/// Builds the result; an overflowed or undefined value is unknown.
fn spec(raw: &str, normalized_value: Option<f64>, unit: &str) -> NormalizedSpec {
    NormalizedSpec {
        raw_value: raw.to_string(),
        normalized_value: normalized_value.filter(|v| v.is_finite()),
        unit: unit.to_string(),
    }
}

/// Normalizes a length to millimeters.
///
/// Order: mm, cm (×10), inch (×25.4), bare m (×1000). The bare-meter pattern
/// is skipped whenever a millimeter value was found, and never matches an "m"
/// followed by another "m", so "10mm" is not read as ten meters.
pub fn normalize_size(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    let mm = capture(&patterns::MILLIMETER, &cleaned, None);
    if mm.is_some() {
        result = mm;
    }
    if let Some(cm) = capture(&patterns::CENTIMETER, &cleaned, None) {
        result = Some(cm * 10.0);
    }
    if let Some(inch) = capture(&patterns::INCH, &cleaned, None) {
        result = Some(inch * 25.4);
    }
    if mm.is_none() {
        if let Some(m) = capture(&patterns::METER, &cleaned, Some("m")) {
            result = Some(m * 1000.0);
        }
    }

    spec(value, result, "mm")
}

/// Normalizes a mass to grams.
///
/// Order: g (not "gram"), kg (×1000), lb (×453.592), oz (×28.3495).
pub fn normalize_weight(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    if let Some(g) = capture(&patterns::GRAM, &cleaned, Some("ram")) {
        result = Some(g);
    }
    if let Some(kg) = capture(&patterns::KILOGRAM, &cleaned, None) {
        result = Some(kg * 1000.0);
    }
    if let Some(lb) = capture(&patterns::POUND, &cleaned, None) {
        result = Some(lb * 453.592);
    }
    if let Some(oz) = capture(&patterns::OUNCE, &cleaned, None) {
        result = Some(oz * 28.3495);
    }

    spec(value, result, "g")
}

/// Normalizes power draw to watts.
///
/// Order: W (not "Wh"), kW (×1000), mW (÷1000).
pub fn normalize_power(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    if let Some(w) = capture(&patterns::WATT, &cleaned, Some("h")) {
        result = Some(w);
    }
    if let Some(kw) = capture(&patterns::KILOWATT, &cleaned, None) {
        result = Some(kw * 1000.0);
    }
    if let Some(mw) = capture(&patterns::MILLIWATT, &cleaned, None) {
        result = Some(mw / 1000.0);
    }

    spec(value, result, "W")
}

/// Normalizes storage capacity to megabytes with binary multipliers.
///
/// Order: GB (×1024), TB (×1024²), MB.
pub fn normalize_capacity(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    if let Some(gb) = capture(&patterns::GIGABYTE, &cleaned, None) {
        result = Some(gb * 1024.0);
    }
    if let Some(tb) = capture(&patterns::TERABYTE, &cleaned, None) {
        result = Some(tb * 1024.0 * 1024.0);
    }
    if let Some(mb) = capture(&patterns::MEGABYTE, &cleaned, None) {
        result = Some(mb);
    }

    spec(value, result, "MB")
}

/// Normalizes a display resolution to a pixel count.
///
/// "WIDTHxHEIGHT" is multiplied out. A "{height}p" shorthand overrides it and
/// is approximated as `height * height * 16 / 9`, assuming a 16:9 panel. This
/// is not an exact pixel count for other aspect ratios.
pub fn normalize_resolution(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    if let Some(caps) = patterns::DIMENSIONS.captures(&cleaned) {
        let width = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
        let height = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        if let (Some(width), Some(height)) = (width, height) {
            result = Some(width * height);
        }
    }
    if let Some(height) = capture(&patterns::SCAN_LINES, &cleaned, None) {
        result = Some(height * (height * 16.0 / 9.0));
    }

    spec(value, result, "pixels")
}

/// Normalizes a refresh rate to hertz.
pub fn normalize_refresh_rate(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let result = capture(&patterns::HERTZ, &cleaned, None);

    spec(value, result, "Hz")
}

/// Normalizes a transfer speed to megabits per second.
///
/// Order: Gbps (×1000), Mbps.
pub fn normalize_speed(value: &str) -> NormalizedSpec {
    let cleaned = clean(value);
    let mut result = None;

    if let Some(gbps) = capture(&patterns::GIGABIT_PER_SEC, &cleaned, None) {
        result = Some(gbps * 1000.0);
    }
    if let Some(mbps) = capture(&patterns::MEGABIT_PER_SEC, &cleaned, None) {
        result = Some(mbps);
    }

    spec(value, result, "Mbps")
}
