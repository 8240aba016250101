use crate::error::CoreError;

/// Reduces a human-formatted number to a dial string: an optional leading `+`
/// followed by digits. Spaces, dashes, dots and parentheses are dropped.
pub fn normalize_dialstring(value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    let invalid = || CoreError::InvalidDialString(value.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut saw_digit = false;

    for (idx, ch) in trimmed.chars().enumerate() {
        if ch.is_ascii_digit() {
            out.push(ch);
            saw_digit = true;
            continue;
        }
        match ch {
            '+' if idx == 0 => out.push('+'),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(invalid()),
        }
    }

    if !saw_digit {
        return Err(invalid());
    }

    Ok(out)
}
