use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Brazilian-formatted monetary string into a `Decimal`.
///
/// Handles `R$`, `$`, `%`, regular/non-breaking spaces, accounting
/// parentheses and trailing minus signs. When both `,` and `.` appear,
/// the right-most of the two is taken as the decimal separator and the
/// other is stripped as a thousands separator. A lone comma followed by
/// exactly one or two digits is a decimal separator; otherwise it is a
/// thousands separator. Unparseable input degrades to zero — a single
/// malformed cell must never interrupt an import.
pub fn parse_amount(raw: &str) -> Decimal {
    let s = raw.trim();
    if s.is_empty() {
        return Decimal::ZERO;
    }

    let (parens, s) = if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let mut t: String = s
        .replace("R$", "")
        .replace("r$", "")
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ' ' | '\u{a0}'))
        .collect();

    let trailing_minus = t.ends_with('-');
    if trailing_minus {
        t.pop();
    }
    if let Some(rest) = t.strip_prefix('+') {
        t = rest.to_string();
    }

    let normalized = normalize_separators(&t);
    let mut dec = match Decimal::from_str(&normalized) {
        Ok(d) => d,
        Err(_) => return Decimal::ZERO,
    };

    if parens || trailing_minus {
        dec = -dec.abs();
    }
    dec
}

fn normalize_separators(t: &str) -> String {
    let last_comma = t.rfind(',');
    let last_dot = t.rfind('.');

    match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            if c > d {
                // Brazilian: 1.234,56
                t.replace('.', "").replace(',', ".")
            } else {
                // Anglo: 1,234.56
                t.replace(',', "")
            }
        }
        (Some(c), None) => {
            let tail = &t[c + 1..];
            let single = t.matches(',').count() == 1;
            if single && (1..=2).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit())
            {
                t.replace(',', ".")
            } else {
                t.replace(',', "")
            }
        }
        (None, Some(_)) => {
            // Multiple periods can only be thousands grouping (1.234.567).
            if t.matches('.').count() > 1 {
                t.replace('.', "")
            } else {
                t.to_string()
            }
        }
        (None, None) => t.to_string(),
    }
}

/// Pass-through for natively numeric cells; non-finite values become zero.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Format a value the way Brazilian bank exports display it: `R$ 1.234,56`,
/// with a leading minus for debits. `parse_amount(format_brl(x))` returns
/// `x` rounded to two decimal places.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let s = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*b as char);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ── parse_amount ──────────────────────────────────────────────────────────

    #[test]
    fn parse_brazilian_thousands() {
        assert_eq!(parse_amount("1.234,56"), dec("1234.56"));
        assert_eq!(parse_amount("-34.654,96"), dec("-34654.96"));
    }

    #[test]
    fn parse_anglo_thousands() {
        assert_eq!(parse_amount("1,234.56"), dec("1234.56"));
    }

    #[test]
    fn parse_lone_comma_as_decimal() {
        assert_eq!(parse_amount("12,5"), dec("12.5"));
        assert_eq!(parse_amount("12,50"), dec("12.50"));
    }

    #[test]
    fn parse_lone_comma_as_thousands() {
        // Three digits after a single comma: grouping, not decimals.
        assert_eq!(parse_amount("1,234"), dec("1234"));
    }

    #[test]
    fn parse_currency_symbol_and_nbsp() {
        assert_eq!(parse_amount("R$ 1.500,00"), dec("1500.00"));
        assert_eq!(parse_amount("R$\u{a0}99,90"), dec("99.90"));
    }

    #[test]
    fn parse_trailing_minus() {
        assert_eq!(parse_amount("250,00-"), dec("-250.00"));
    }

    #[test]
    fn parse_accounting_parens() {
        assert_eq!(parse_amount("(75,25)"), dec("-75.25"));
    }

    #[test]
    fn parse_grouped_without_decimals() {
        assert_eq!(parse_amount("1.234.567"), dec("1234567"));
    }

    #[test]
    fn parse_empty_and_garbage_yield_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
    }

    #[test]
    fn amount_from_f64_non_finite_is_zero() {
        assert_eq!(amount_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(amount_from_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(amount_from_f64(12.5), dec("12.5"));
    }

    // ── format_brl ────────────────────────────────────────────────────────────

    #[test]
    fn format_groups_thousands() {
        assert_eq!(format_brl(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(format_brl(dec("1234567.89")), "R$ 1.234.567,89");
    }

    #[test]
    fn format_small_values() {
        assert_eq!(format_brl(dec("0.01")), "R$ 0,01");
        assert_eq!(format_brl(dec("999")), "R$ 999,00");
    }

    #[test]
    fn format_negative() {
        assert_eq!(format_brl(dec("-34654.96")), "-R$ 34.654,96");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["1234.56", "-34654.96", "0.01", "1000000", "-0.5"] {
            let value = dec(raw);
            assert_eq!(parse_amount(&format_brl(value)), value.round_dp(2));
        }
    }
}
