use serde_json::Value;
use std::io::{self, Read};

/// Attempt to read a JSON (or YAML) document from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

/// Parse piped text, trying JSON first and YAML second.
pub fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str::<Value>(trimmed)
            .map(Some)
            .map_err(|_| {
                Box::<dyn std::error::Error>::from(format!(
                    "stdin is neither JSON nor YAML: {}",
                    json_err
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let v = parse_document(r#"{"spend": "10"}"#).unwrap().unwrap();
        assert_eq!(v["spend"], "10");
    }

    #[test]
    fn test_parse_yaml() {
        let v = parse_document("spend: '10'\nrevenue: '25'\n").unwrap().unwrap();
        assert_eq!(v["revenue"], "25");
    }

    #[test]
    fn test_blank_is_none() {
        assert!(parse_document("  \n").unwrap().is_none());
    }
}
