//! Decimal rounding helpers used when snapping a bbox to grid cells.
//!
//! Covering ranges round the snapped bbox edges to the number of decimals
//! found in the grid spacing. The rounding reproduces `Number.toFixed`
//! exactly so that index windows (and the tile caches keyed on them) agree
//! with map clients that compute the same windows.

/// Number of digits after the decimal point in the shortest round-trip
/// representation of `value`, or `None` when it has no fractional part.
pub fn decimal_digits(value: f64) -> Option<usize> {
    let repr = value.to_string();
    repr.split_once('.').map(|(_, fraction)| fraction.len())
}

/// Rounding precision for the x and y axes derived from the grid spacing.
///
/// When `dx` has a fractional part, each axis uses its own digit count;
/// otherwise both fall back to two decimals.
pub fn axis_precision(dx: f64, dy: f64) -> (usize, usize) {
    match decimal_digits(dx) {
        Some(x_digits) => (x_digits, decimal_digits(dy).unwrap_or(0)),
        None => (2, 2),
    }
}

/// Round to `digits` decimals using the exact binary value of `value`,
/// with ties going away from zero.
pub fn to_fixed(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }

    // Every f64 has a terminating decimal expansion of at most 1074
    // fractional digits, so this string is exact.
    let exact = format!("{:.1074}", value.abs());
    let Some((int_part, frac_part)) = exact.split_once('.') else {
        return value;
    };

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .map(|b| b - b'0')
        .collect();
    let round_up = frac_part
        .as_bytes()
        .get(digits)
        .map_or(false, |next| *next >= b'5');

    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, 1);
        }
    }

    let split = kept.len() - digits;
    let mut text = String::with_capacity(kept.len() + 2);
    if value.is_sign_negative() {
        text.push('-');
    }
    text.extend(kept[..split].iter().map(|d| char::from(b'0' + d)));
    if digits > 0 {
        text.push('.');
        text.extend(kept[split..].iter().map(|d| char::from(b'0' + d)));
    }
    text.parse().unwrap_or(value)
}
