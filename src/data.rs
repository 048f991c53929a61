// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types

/// Text size used when the size field holds no usable number
pub const DEFAULT_SIZE: f64 = 100.0;

/// Parameters of a single render
///
/// These are reconstructed from the form immediately before each render.
///
/// Note: `filled`, `fill`, `stroke` and `stroke_width` are carried through
/// the pipeline but the exports currently use fixed presentation values
/// (see [`crate::render::KeychainConfig`]).
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParameters {
    /// Text to outline
    pub text: String,
    /// Size in drawing units per Em
    pub size: f64,
    /// Filled toggle
    pub filled: bool,
    /// Fill colour, as entered
    pub fill: String,
    /// Stroke colour, as entered
    pub stroke: String,
    /// Stroke width, as entered (e.g. `0.25mm`)
    pub stroke_width: String,
}

impl Default for RenderParameters {
    fn default() -> Self {
        RenderParameters {
            text: String::new(),
            size: DEFAULT_SIZE,
            filled: false,
            fill: String::new(),
            stroke: String::new(),
            stroke_width: String::new(),
        }
    }
}

/// Resolve the effective size from the text of the size field
///
/// Three tiers are tried in order:
///
/// 1.  a strict read of the whole field as a number (as a numeric input
///     element would report it)
/// 2.  a lenient read of the leading numeral, tolerating trailing junk and
///     partially typed input such as `"10."`
/// 3.  [`DEFAULT_SIZE`]
///
/// A tier yielding zero falls through to the next.
pub fn effective_size(input: &str) -> f64 {
    parse_strict(input)
        .filter(|x| *x != 0.0)
        .or_else(|| parse_leading(input).filter(|x| *x != 0.0))
        .unwrap_or(DEFAULT_SIZE)
}

fn digits(b: &[u8], start: usize) -> usize {
    b.get(start..)
        .map(|tail| tail.iter().take_while(|c| c.is_ascii_digit()).count())
        .unwrap_or(0)
}

/// Parse a complete valid floating-point number
///
/// Accepts `-?(D+|D*.D+)([eE][+-]?D+)?` and nothing else: no surrounding
/// whitespace, no leading `+`, no trailing `.`.
pub fn parse_strict(s: &str) -> Option<f64> {
    let b = s.as_bytes();
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    let int = digits(b, i);
    i += int;
    let mut frac = 0;
    if b.get(i) == Some(&b'.') {
        frac = digits(b, i + 1);
        if frac == 0 {
            return None;
        }
        i += 1 + frac;
    }
    if int == 0 && frac == 0 {
        return None;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp = digits(b, j);
        if exp == 0 {
            return None;
        }
        i = j + exp;
    }
    if i != b.len() {
        return None;
    }
    s.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Parse the longest numeric prefix, after leading whitespace
///
/// Returns `None` when no digit is found.
pub fn parse_leading(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int = digits(b, i);
    i += int;
    let mut frac = 0;
    if b.get(i) == Some(&b'.') {
        frac = digits(b, i + 1);
        if frac > 0 {
            i += 1 + frac;
        }
    }
    if int == 0 && frac == 0 {
        return None;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp = digits(b, j);
        if exp > 0 {
            i = j + exp;
        }
    }
    s[..i].parse::<f64>().ok().filter(|x| x.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn size_fallback() {
        assert_eq!(effective_size(""), 100.0);
        assert_eq!(effective_size("abc"), 100.0);
        assert_eq!(effective_size("10."), 10.0);
        assert_eq!(effective_size("45"), 45.0);
        assert_eq!(effective_size("0"), 100.0);
        assert_eq!(effective_size("12px"), 12.0);
        assert_eq!(effective_size(" 7.5"), 7.5);
    }

    #[test]
    fn strict() {
        assert_eq!(parse_strict("1.5e2"), Some(150.0));
        assert_eq!(parse_strict(".5"), Some(0.5));
        assert_eq!(parse_strict("-3"), Some(-3.0));
        assert_eq!(parse_strict("10."), None);
        assert_eq!(parse_strict("+3"), None);
        assert_eq!(parse_strict(" 3"), None);
        assert_eq!(parse_strict("1e"), None);
        assert_eq!(parse_strict("inf"), None);
        assert_eq!(parse_strict("-"), None);
    }

    #[test]
    fn leading() {
        assert_eq!(parse_leading("10."), Some(10.0));
        assert_eq!(parse_leading("+2x"), Some(2.0));
        assert_eq!(parse_leading("1e"), Some(1.0));
        assert_eq!(parse_leading("3e2mm"), Some(300.0));
        assert_eq!(parse_leading(".25mm"), Some(0.25));
        assert_eq!(parse_leading("."), None);
        assert_eq!(parse_leading("x1"), None);
    }
}
