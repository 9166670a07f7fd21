use std::error::Error;

pub(crate) fn parse_timeout_ms(input: &str) -> Result<u64, Box<dyn Error>> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Ok(trimmed.parse()?);
    }
    let duration = humantime::parse_duration(trimmed)?;
    let millis = duration.as_millis();
    if millis > u64::MAX as u128 {
        return Err("timeout too large".into());
    }
    Ok(millis as u64)
}

/// Quote text as typed: surrounding whitespace trimmed, blank rejected.
pub(crate) fn parse_quote(input: &str) -> Result<String, Box<dyn Error>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("quote must not be empty".into());
    }
    Ok(trimmed.to_string())
}
