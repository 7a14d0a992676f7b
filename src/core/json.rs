//! Pulling JSON out of free-form model replies.

use serde_json::Value;

/// Find the JSON payload in a model reply.
///
/// Replies come back as bare JSON, as a ```json fenced block, or as JSON wrapped in prose.
/// The first fenced block wins. Otherwise every `[`/`{` in the text is tried as the start of a
/// value, and the first one holding objects is returned, so citation marks like `[1]` around
/// the payload are passed over.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str(block.trim()) {
            return Some(value);
        }
    }

    let values = embedded_values(trimmed);
    let index = values.iter().position(holds_records).unwrap_or(0);
    values.into_iter().nth(index)
}

fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the line.
    let body_start = after.find('\n')? + 1;
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Every array or object that parses at some bracket in `raw`, in order, without overlaps.
fn embedded_values(raw: &str) -> Vec<Value> {
    let mut values = Vec::new();
    let mut pos = 0;
    while let Some(found) = raw[pos..].find(['[', '{']) {
        let start = pos + found;
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                values.push(value);
                pos = start + stream.byte_offset();
            }
            _ => pos = start + 1,
        }
    }
    values
}

fn holds_records(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        let value = extract_json(r#"  [{"name": "A"}] "#).unwrap();
        assert_eq!(value[0]["name"], "A");
    }

    #[test]
    fn test_fenced_json() {
        let raw = "Here you go:\n```json\n[{\"name\": \"Needle & Co\"}]\n```\nEnjoy!";
        let value = extract_json(raw).unwrap();
        assert_eq!(value[0]["name"], "Needle & Co");
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = r#"I found these studios: [{"name": "One"}, {"name": "Two"}] (sources below)"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let raw = r#"Result: {"artists": [{"name": "One"}]} done"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value["artists"][0]["name"], "One");
    }

    #[test]
    fn test_citation_before_the_array_is_skipped() {
        let raw = "Here are the studios I found (see [1]):\n[{\"name\":\"A\"},{\"name\":\"B\"}]";
        let value = extract_json(raw).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "B");
    }

    #[test]
    fn test_source_list_after_the_array_is_ignored() {
        let raw = "[{\"name\":\"A\"},{\"name\":\"B [Studio]\"}]\nSources: [1] [2]";
        let value = extract_json(raw).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "B [Studio]");
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json("Sorry, I couldn't find any artists.").is_none());
    }
}
