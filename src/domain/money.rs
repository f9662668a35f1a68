use thiserror::Error;

/// Money is represented as integer cents, so every amount is already rounded to 2 decimals.
/// For EUR/USD, 1 unit = 100 cents, so €50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents, rounding half away from zero past the second decimal.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "0.125" -> 13
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let mut decimals = decimal_str.bytes().map(|b| i64::from(b - b'0'));
    let tenths = decimals.next().unwrap_or(0);
    let hundredths = decimals.next().unwrap_or(0);
    let round_up = decimals.next().is_some_and(|digit| digit >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or(ParseCentsError::Overflow)?;

    Ok(if negative { -cents } else { cents })
}

/// Convert a floating-point amount into cents, rounding half away from zero.
/// Returns `None` for NaN, infinities and values outside the `Cents` range.
pub fn cents_from_f64(amount: f64) -> Option<Cents> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Divide a cashflow across `quantity` units, rounding half away from zero to the cent.
pub fn per_unit_cents(cashflow: Cents, quantity: i64) -> Cents {
    assert!(quantity > 0, "Quantity must be positive");
    let magnitude = (cashflow.unsigned_abs() as u128 * 2 + quantity as u128) / (quantity as u128 * 2);
    let magnitude = magnitude as Cents;
    if cashflow < 0 { -magnitude } else { magnitude }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("amount is too large")]
    Overflow,
}
