//! Tick label formatting.
//!
//! Supports the subset of d3-format specifiers chart configs use: an optional `,` grouping flag,
//! an optional `.N` precision and a type of `f`, `%`, `d`, or none.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Fixed,
    Percent,
    Integer,
    /// No type letter: shortest representation, rounded to the precision when given.
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    group: bool,
    precision: Option<usize>,
    kind: Kind,
}

impl NumberFormat {
    /// Parses a specifier such as `,.2f`, `.0%`, `d` or `,`. Returns `None` for anything else.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut rest = spec.trim();
        let group = match rest.strip_prefix(',') {
            Some(r) => {
                rest = r;
                true
            }
            None => false,
        };
        let mut precision = None;
        if let Some(r) = rest.strip_prefix('.') {
            let digits: String = r.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return None;
            }
            precision = Some(digits.parse::<usize>().ok()?.min(20));
            rest = &r[digits.len()..];
        }
        let kind = match rest {
            "" => Kind::General,
            "f" => Kind::Fixed,
            "%" => Kind::Percent,
            "d" => Kind::Integer,
            _ => return None,
        };
        Some(Self {
            group,
            precision,
            kind,
        })
    }

    /// The default linear tick format: grouped fixed-point with just enough decimals for `step`.
    pub fn for_tick_step(step: f64) -> Self {
        Self {
            group: true,
            precision: Some(precision_fixed(step)),
            kind: Kind::Fixed,
        }
    }

    pub fn format(&self, v: f64) -> String {
        if !v.is_finite() {
            return if v.is_nan() {
                "NaN".to_string()
            } else if v > 0.0 {
                "Infinity".to_string()
            } else {
                "-Infinity".to_string()
            };
        }
        let (body, suffix) = match self.kind {
            Kind::Fixed => (fixed(v, self.precision.unwrap_or(6)), ""),
            Kind::Percent => (fixed(v * 100.0, self.precision.unwrap_or(6)), "%"),
            Kind::Integer => (fixed(v.round(), 0), ""),
            Kind::General => match self.precision {
                Some(p) => (trim_fraction(fixed(v, p)), ""),
                None => (js_number(v), ""),
            },
        };
        let body = if self.group { group_thousands(&body) } else { body };
        format!("{body}{suffix}")
    }
}

/// Number of decimals needed so ticks spaced `step` apart stay distinct (d3 `precisionFixed`).
pub fn precision_fixed(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    // Decimal exponent as printed, which avoids log10 rounding just below powers of ten.
    let printed = format!("{step:e}");
    let exponent = printed
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    if exponent >= 0 {
        0
    } else {
        exponent.unsigned_abs() as usize
    }
}

/// Labels for linear ticks, honoring an optional axis `format` hint.
pub fn tick_labels(ticks: &[f64], step: f64, hint: Option<&str>) -> Vec<String> {
    let format = match hint.filter(|h| !h.trim().is_empty()) {
        Some(h) => NumberFormat::parse(h).unwrap_or_else(|| {
            tracing::debug!(format = %h, "unsupported tick format, using default");
            NumberFormat::for_tick_step(step)
        }),
        None => NumberFormat::for_tick_step(step),
    };
    ticks.iter().map(|v| format.format(*v)).collect()
}

fn fixed(v: f64, precision: usize) -> String {
    let s = format!("{v:.precision$}");
    // `-0.00` reads as zero.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

fn js_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", s),
    };
    let (int, frac) = match rest.find(['.', 'e']) {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3);
    out.push_str(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(frac);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_format_groups_and_uses_step_precision() {
        assert_eq!(
            tick_labels(&[0.0, 500.0, 1000.0], 500.0, None),
            vec!["0", "500", "1,000"]
        );
        assert_eq!(tick_labels(&[0.0, 0.5], 0.1, None), vec!["0.0", "0.5"]);
        assert_eq!(tick_labels(&[-0.0], 1.0, None), vec!["0"]);
    }

    #[test]
    fn hints_override_default() {
        assert_eq!(tick_labels(&[0.25], 0.05, Some(".0%")), vec!["25%"]);
        assert_eq!(tick_labels(&[1234.5], 1.0, Some(",.1f")), vec!["1,234.5"]);
        assert_eq!(tick_labels(&[2.6], 1.0, Some("d")), vec!["3"]);
        assert_eq!(tick_labels(&[1500.0], 1.0, Some(",")), vec!["1,500"]);
        assert_eq!(tick_labels(&[1.0], 1.0, Some("$.2s")), vec!["1"]);
    }

    #[test]
    fn parse_rejects_unknown_types() {
        assert!(NumberFormat::parse("x").is_none());
        assert!(NumberFormat::parse(".f").is_none());
        assert!(NumberFormat::parse(".3").is_some());
    }
}
