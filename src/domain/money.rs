use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Stock quantities are integer thousandths of a unit, so fractional weights
/// and volumes (KG, LT) stay exact. 2.5 kg = 2500 thousandths.
pub type Quantity = i64;

/// Thousandths per whole unit of stock.
pub const QUANTITY_SCALE: i64 = 1000;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format a quantity for display. Whole quantities print without a decimal
/// part; fractional ones keep three places.
/// Example: 4000 -> "4", 2500 -> "2.500"
pub fn format_quantity(quantity: Quantity) -> String {
    let units = quantity / QUANTITY_SCALE;
    let remainder = quantity % QUANTITY_SCALE;
    if remainder == 0 {
        format!("{}", units)
    } else {
        format!("{}.{:03}", units, remainder)
    }
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseAmountError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let scaled = parse_scaled(input.trim_start_matches('-'), 2)?;
    Ok(if negative { -scaled } else { scaled })
}

/// Parse a decimal string into a stock quantity (thousandths).
/// Quantities are never negative.
/// Example: "4" -> 4000, "2.5" -> 2500, "0.125" -> 125
pub fn parse_quantity(input: &str) -> Result<Quantity, ParseAmountError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParseAmountError::Negative);
    }
    parse_scaled(input, 3)
}

/// Shared fixed-point parser: splits on the decimal point and scales the
/// decimal part to `decimals` digits, padding or truncating as needed.
fn parse_scaled(input: &str, decimals: u32) -> Result<i64, ParseAmountError> {
    let scale = 10i64.pow(decimals);

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole units
            let units: i64 = parts[0]
                .parse()
                .map_err(|_| ParseAmountError::InvalidFormat)?;
            Ok(units * scale)
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?
            };

            // Pad or truncate the decimal part to `decimals` digits
            let decimal_str = parts[1];
            let fraction: i64 = if decimal_str.is_empty() {
                0
            } else if decimal_str.len() <= decimals as usize {
                let parsed: i64 = decimal_str
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?;
                parsed * 10i64.pow(decimals - decimal_str.len() as u32)
            } else {
                // More decimal places than the scale holds - truncate
                decimal_str[..decimals as usize]
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?
            };

            Ok(units * scale + fraction)
        }
        _ => Err(ParseAmountError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    Negative,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::Negative => write!(f, "amount must not be negative"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(100), "1.00");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(4000), "4");
        assert_eq!(format_quantity(2500), "2.500");
        assert_eq!(format_quantity(125), "0.125");
        assert_eq!(format_quantity(0), "0");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("0.01"), Ok(1));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("4"), Ok(4000));
        assert_eq!(parse_quantity("2.5"), Ok(2500));
        assert_eq!(parse_quantity("0.125"), Ok(125));
        assert_eq!(parse_quantity("10.1234"), Ok(10123)); // Truncates
        assert_eq!(parse_quantity("-1"), Err(ParseAmountError::Negative));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_cents("abc").is_err());
        assert!(parse_cents("12.34.56").is_err());
        assert!(parse_quantity("1,5").is_err());
    }
}
