//! Significant-figure formatting for human-readable reports.

/// Format `value` with `digits` significant figures, `%g` style.
///
/// Fixed notation is used when the decimal exponent lies in `[-4, digits)`,
/// scientific notation otherwise; trailing zeros are removed in both cases.
///
/// ```
/// use pf_core::sig;
/// assert_eq!(sig(298.15, 5), "298.15");
/// assert_eq!(sig(101325.0, 6), "101325");
/// assert_eq!(sig(0.6666666, 3), "0.667");
/// assert_eq!(sig(1.5e6, 3), "1.5e+06");
/// ```
pub fn sig(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    // Round first so the exponent reflects carries (e.g. 9.999 -> 10.0).
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(&mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
