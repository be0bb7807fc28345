use crate::error::{Error, Result};

/// Pads `text` on the left with repetitions of `pad` up to `length` characters.
///
/// Text that is already `length` characters or longer is returned unchanged.
/// An empty `pad` is rejected.
///
/// # Examples
/// ```
/// use vista::helpers::left_pad;
///
/// assert_eq!(left_pad("5", "0", 3).unwrap(), "005");
/// ```
pub fn left_pad(text: &str, pad: &str, length: usize) -> Result<String> {
    let padding = padding(text, pad, length)?;
    Ok(padding + text)
}

/// Pads `text` on the right with repetitions of `pad` up to `length` characters.
pub fn right_pad(text: &str, pad: &str, length: usize) -> Result<String> {
    let padding = padding(text, pad, length)?;
    Ok(format!("{text}{padding}"))
}

fn padding(text: &str, pad: &str, length: usize) -> Result<String> {
    if pad.is_empty() {
        return Err(Error::ConfigurationError("padding string must not be empty".into()));
    }
    let missing = length.saturating_sub(text.chars().count());
    Ok(pad.chars().cycle().take(missing).collect())
}

/// Formats a decimal string as a price with at least `digits_after_dot`
/// fractional digits, joined by `dot`.
///
/// The fractional part is zero-filled but never truncated, and an empty
/// integer part becomes `0`.
///
/// # Examples
/// ```
/// use vista::helpers::format_price;
///
/// assert_eq!(format_price("12.5", 2, "."), "12.50");
/// assert_eq!(format_price(".7", 2, ","), "0,70");
/// ```
pub fn format_price(value: &str, digits_after_dot: usize, dot: &str) -> String {
    let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));
    let integer = if integer.is_empty() { "0" } else { integer };
    format!("{integer}{dot}{fraction:0<digits_after_dot$}")
}

/// Builds a `mailto:` link. The address is used as given.
pub fn mail_to(email: &str) -> String {
    format!("mailto:{email}")
}
