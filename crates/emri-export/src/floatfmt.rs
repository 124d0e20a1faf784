use std::fmt::{self, Display};
use std::str::FromStr;

use emri_core::{EmriError, ErrorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Exp,
    Fixed,
    General,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

/// A single printf float conversion (`%[flags][width][.prec](e|E|f|F|g|G)`)
/// with optional literal text around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatFormat {
    source: String,
    prefix: String,
    suffix: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
    upper: bool,
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self {
            source: "%.10g".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            flags: Flags::default(),
            width: None,
            precision: Some(10),
            conversion: Conversion::General,
            upper: false,
        }
    }
}

fn format_error(spec: &str, message: &str) -> EmriError {
    EmriError::Config(
        ErrorInfo::new("float-format", message)
            .with_context("format", spec)
            .with_hint("use a single float conversion such as %.10g, %.6e or %.3f"),
    )
}

fn unescape_literal(text: &str) -> String {
    text.replace("%%", "%")
}

fn find_conversion_start(spec: &str) -> Option<usize> {
    let bytes = spec.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            if bytes.get(idx + 1) == Some(&b'%') {
                idx += 2;
                continue;
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}

impl FromStr for FloatFormat {
    type Err = EmriError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let start =
            find_conversion_start(spec).ok_or_else(|| format_error(spec, "no % conversion"))?;
        let mut chars = spec[start + 1..].char_indices().peekable();
        let mut flags = Flags::default();
        while let Some(&(_, ch)) = chars.peek() {
            match ch {
                '-' => flags.left = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                '0' => flags.zero = true,
                '#' => flags.alternate = true,
                _ => break,
            }
            chars.next();
        }
        let mut width = String::new();
        while let Some(&(_, ch)) = chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            width.push(ch);
            chars.next();
        }
        let mut precision = None;
        if let Some(&(_, '.')) = chars.peek() {
            chars.next();
            let mut digits = String::new();
            while let Some(&(_, ch)) = chars.peek() {
                if !ch.is_ascii_digit() {
                    break;
                }
                digits.push(ch);
                chars.next();
            }
            precision = Some(digits.parse().unwrap_or(0));
        }
        while let Some(&(_, 'l' | 'L' | 'h')) = chars.peek() {
            chars.next();
        }
        let (offset, conversion_char) = chars
            .next()
            .ok_or_else(|| format_error(spec, "missing conversion character"))?;
        let (conversion, upper) = match conversion_char {
            'e' => (Conversion::Exp, false),
            'E' => (Conversion::Exp, true),
            'f' => (Conversion::Fixed, false),
            'F' => (Conversion::Fixed, true),
            'g' => (Conversion::General, false),
            'G' => (Conversion::General, true),
            _ => return Err(format_error(spec, "only e, f and g conversions format floats")),
        };
        let rest = &spec[start + 1 + offset + conversion_char.len_utf8()..];
        if find_conversion_start(rest).is_some() {
            return Err(format_error(spec, "exactly one conversion is allowed"));
        }
        Ok(Self {
            source: spec.to_string(),
            prefix: unescape_literal(&spec[..start]),
            suffix: unescape_literal(rest),
            flags,
            width: if width.is_empty() {
                None
            } else {
                width.parse().ok()
            },
            precision,
            conversion,
            upper,
        })
    }
}

impl Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_exponent(formatted: &str) -> (&str, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

fn c_exponent(mantissa: &str, exponent: i32, upper: bool) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

fn strip_fraction_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

impl FloatFormat {
    /// The format string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn body(&self, magnitude: f64) -> String {
        let precision = self.precision.unwrap_or(6);
        let alternate = self.flags.alternate;
        match self.conversion {
            Conversion::Fixed => {
                let mut out = format!("{magnitude:.precision$}");
                if alternate && precision == 0 {
                    out.push('.');
                }
                out
            }
            Conversion::Exp => {
                let formatted = format!("{magnitude:.precision$e}");
                let (mantissa, exponent) = split_exponent(&formatted);
                let mut mantissa = mantissa.to_string();
                if alternate && precision == 0 {
                    mantissa.push('.');
                }
                c_exponent(&mantissa, exponent, self.upper)
            }
            Conversion::General => {
                let significant = precision.max(1);
                let exponent = if magnitude == 0.0 {
                    0
                } else {
                    let probe = format!("{magnitude:.prec$e}", prec = significant - 1);
                    split_exponent(&probe).1
                };
                if exponent >= -4 && i64::from(exponent) < significant as i64 {
                    let decimals = (significant as i64 - 1 - i64::from(exponent)).max(0) as usize;
                    let fixed = format!("{magnitude:.decimals$}");
                    if alternate {
                        if decimals == 0 {
                            format!("{fixed}.")
                        } else {
                            fixed
                        }
                    } else {
                        strip_fraction_zeros(&fixed).to_string()
                    }
                } else {
                    let formatted = format!("{magnitude:.prec$e}", prec = significant - 1);
                    let (mantissa, exponent) = split_exponent(&formatted);
                    let mantissa = if alternate {
                        mantissa.to_string()
                    } else {
                        strip_fraction_zeros(mantissa).to_string()
                    };
                    c_exponent(&mantissa, exponent, self.upper)
                }
            }
        }
    }

    /// Formats one value the way C `printf` (and numpy's `savetxt`) would.
    pub fn format(&self, value: f64) -> String {
        let sign = if value.is_nan() {
            ""
        } else if value.is_sign_negative() {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };
        let body = if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            "inf".to_string()
        } else {
            self.body(value.abs())
        };
        let body = if self.upper {
            body.to_uppercase()
        } else {
            body
        };
        let mut field = format!("{sign}{body}");
        if let Some(width) = self.width {
            let len = field.chars().count();
            if len < width {
                let pad = width - len;
                if self.flags.left {
                    field.push_str(&" ".repeat(pad));
                } else if self.flags.zero && value.is_finite() {
                    field = format!("{sign}{}{body}", "0".repeat(pad));
                } else {
                    field = format!("{}{field}", " ".repeat(pad));
                }
            }
        }
        format!("{}{field}{}", self.prefix, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: f64) -> String {
        spec.parse::<FloatFormat>().unwrap().format(value)
    }

    #[test]
    fn default_matches_percent_ten_g() {
        let default = FloatFormat::default();
        assert_eq!(default, "%.10g".parse().unwrap());
        assert_eq!(default.format(0.1), "0.1");
        assert_eq!(default.format(1.0 / 3.0), "0.3333333333");
        assert_eq!(default.format(1e-5), "1e-05");
        assert_eq!(default.format(123456789012.0), "1.23456789e+11");
        assert_eq!(default.format(100.0), "100");
        assert_eq!(default.format(0.0), "0");
        assert_eq!(default.format(-2.5), "-2.5");
    }

    #[test]
    fn exponent_and_fixed_conversions() {
        assert_eq!(fmt("%.3e", 12345.678), "1.235e+04");
        assert_eq!(fmt("%E", 0.5), "5.000000E-01");
        assert_eq!(fmt("%.2f", 1.5), "1.50");
        assert_eq!(fmt("%.0f", 7.0), "7");
        assert_eq!(fmt("%g", 1e6), "1e+06");
        assert_eq!(fmt("%G", 1e-10), "1E-10");
        assert_eq!(fmt("%#.3g", 1.0), "1.00");
        assert_eq!(fmt("%.16g", 0.1), "0.1");
        assert_eq!(fmt("%.17g", 0.1), "0.10000000000000001");
    }

    #[test]
    fn width_flags_and_literals() {
        assert_eq!(fmt("%8.3f", 3.14159), "   3.142");
        assert_eq!(fmt("%-8.2f|", 3.14159), "3.14    |");
        assert_eq!(fmt("%08.2f", -3.14159), "-0003.14");
        assert_eq!(fmt("%+.1f", 2.0), "+2.0");
        assert_eq!(fmt("x=%.1f%%", 2.0), "x=2.0%");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(fmt("%.10g", f64::NAN), "nan");
        assert_eq!(fmt("%.10g", f64::NEG_INFINITY), "-inf");
        assert_eq!(fmt("%E", f64::INFINITY), "INF");
    }

    #[test]
    fn rejects_non_float_conversions() {
        assert!("%d".parse::<FloatFormat>().is_err());
        assert!("plain".parse::<FloatFormat>().is_err());
        assert!("%f %f".parse::<FloatFormat>().is_err());
    }
}
