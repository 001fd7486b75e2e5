//! Display templates and escaping for cell values.
//!
//! A template holds literal text and a single positional slot `{0}`:
//!
//! | Slot | Meaning |
//! |------|---------|
//! | `{0}` | the value's display form |
//! | `{0,8}` / `{0,-8}` | right / left aligned in 8 columns |
//! | `{0:F2}` | fixed point, 2 decimals |
//! | `{0:N2}` | fixed point with thousands separators |
//! | `{0:D4}` | integer zero-padded to 4 digits |
//! | `{0:%d %b %Y}` | date rendered with a strftime pattern |
//!
//! `{{` and `}}` produce literal braces. Number specs only apply to numbers
//! and strftime specs only to dates; other values ignore the spec.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GridError, Result};
use crate::value::{Number, Value};

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{(\d+)(?:,\s*(-?\d+))?(?::([^{}]*))?\}|[{}]")
        .unwrap_or_else(|e| panic!("template token pattern is invalid: {e}"))
});

const MAX_PRECISION: usize = 99;

/// Renders `value` through `template`.
///
/// ```
/// use gridshape::{format, Value};
///
/// let text = format::apply("{0:N1} km", &Value::from(12345.67f64)).unwrap();
/// assert_eq!(text, "12,345.7 km");
/// ```
pub fn apply(template: &str, value: &Value<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 8);
    let mut last = 0;

    for caps in TOKEN.captures_iter(template) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..token.start()]);
        last = token.end();

        match token.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            "{" | "}" => {
                return Err(GridError::invalid_format(
                    template,
                    format!("unbalanced brace at offset {}", token.start()),
                ))
            }
            _ => {
                let index = caps.get(1).map_or("", |m| m.as_str());
                if index.parse::<usize>().ok() != Some(0) {
                    return Err(GridError::invalid_format(
                        template,
                        format!("argument index {index} is out of range"),
                    ));
                }

                let text = render(template, value, caps.get(3).map(|m| m.as_str()))?;
                match caps.get(2) {
                    Some(width) => {
                        let width: i64 = width.as_str().parse().map_err(|_| {
                            GridError::invalid_format(template, "alignment is out of range")
                        })?;
                        align(&mut out, &text, width);
                    }
                    None => out.push_str(&text),
                }
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// HTML-escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn align(out: &mut String, text: &str, width: i64) {
    let pad = usize::try_from(width.unsigned_abs())
        .unwrap_or(usize::MAX)
        .saturating_sub(text.chars().count());
    if width < 0 {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(pad));
    } else {
        out.extend(std::iter::repeat(' ').take(pad));
        out.push_str(text);
    }
}

fn render(template: &str, value: &Value<'_>, spec: Option<&str>) -> Result<String> {
    let spec = match spec {
        Some(spec) if !spec.is_empty() => spec,
        _ => return Ok(value.to_string()),
    };

    match value {
        Value::Number(n) => render_number(template, *n, spec),
        Value::Date(d) => render_date(template, d, spec),
        other => Ok(other.to_string()),
    }
}

fn render_number(template: &str, n: Number, spec: &str) -> Result<String> {
    let mut chars = spec.chars();
    let kind = chars.next().map(|c| c.to_ascii_uppercase());
    let digits = chars.as_str();

    let precision = if digits.is_empty() {
        None
    } else {
        match digits.parse::<usize>() {
            Ok(p) if p <= MAX_PRECISION => Some(p),
            _ => {
                return Err(GridError::invalid_format(
                    template,
                    format!("invalid precision in `{spec}`"),
                ))
            }
        }
    };

    match kind {
        Some('F') => Ok(format!("{:.*}", precision.unwrap_or(2), n.to_f64())),
        Some('N') => Ok(group_thousands(&format!(
            "{:.*}",
            precision.unwrap_or(2),
            n.to_f64()
        ))),
        Some('D') => {
            let width = precision.unwrap_or(0);
            match n {
                Number::I64(i) if i < 0 => Ok(format!("-{:0width$}", i.unsigned_abs())),
                Number::I64(i) => Ok(format!("{i:0width$}")),
                Number::U64(u) => Ok(format!("{u:0width$}")),
                Number::F64(_) => Err(GridError::invalid_format(
                    template,
                    "`D` requires an integer value",
                )),
            }
        }
        _ => Err(GridError::invalid_format(
            template,
            format!("unknown number format `{spec}`"),
        )),
    }
}

fn render_date(template: &str, date: &NaiveDateTime, spec: &str) -> Result<String> {
    if StrftimeItems::new(spec).any(|item| matches!(item, Item::Error)) {
        return Err(GridError::invalid_format(
            template,
            format!("invalid date format `{spec}`"),
        ));
    }
    Ok(date.format(spec).to_string())
}

/// Inserts `,` every three digits of the integer part of a fixed-point
/// rendering such as `-1234567.50`.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
