// src/services/envelope.rs

//! Envelope parser.
//!
//! Every reply is wrapped as `{"response": {"header": {..}, "body": {..}}}`.
//! The item list inside the body changes shape with result cardinality:
//!
//! ```text
//! "items": [ {..}, {..} ]          // plain array
//! "items": { "item": [ {..} ] }    // wrapped array
//! "items": { "item": {..} }        // wrapped single object
//! "items": "" / absent / null      // no results
//! ```
//!
//! All of these normalize to a (possibly empty) `Vec` of item objects.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::models::ResponseSummary;

/// A JSON object.
pub type JsonObject = Map<String, Value>;

/// Canonical view of one API reply.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEnvelope {
    pub header: JsonObject,
    pub body: JsonObject,
    pub items: Vec<JsonObject>,
}

impl RawEnvelope {
    /// Header/paging fields, with lenient numeric parsing (unparsable → 0).
    pub fn summary(&self) -> ResponseSummary {
        ResponseSummary {
            result_code: field_as_string(&self.header, "resultCode"),
            result_msg: field_as_string(&self.header, "resultMsg"),
            num_of_rows: field_as_u64(&self.body, "numOfRows"),
            page_no: field_as_u64(&self.body, "pageNo"),
            total_count: field_as_u64(&self.body, "totalCount"),
        }
    }

    /// Look up a page-level metadata field by its wire key.
    pub fn page_meta(&self, key: &str) -> Option<String> {
        match key {
            "resultCode" | "resultMsg" => Some(field_as_string(&self.header, key)),
            "numOfRows" | "pageNo" | "totalCount" => Some(field_as_string(&self.body, key)),
            _ => None,
        }
    }
}

/// Item container variants, tried in declaration order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemsContainer {
    List(Vec<Value>),
    Wrapped { item: ItemPayload },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemPayload {
    Many(Vec<Value>),
    One(JsonObject),
    Other(Value),
}

impl ItemsContainer {
    fn into_items(self) -> Vec<JsonObject> {
        let values = match self {
            ItemsContainer::List(values) => values,
            ItemsContainer::Wrapped { item } => match item {
                ItemPayload::Many(values) => values,
                ItemPayload::One(object) => return vec![object],
                ItemPayload::Other(_) => Vec::new(),
            },
            ItemsContainer::Other(_) => Vec::new(),
        };

        values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(object) => Some(object),
                _ => None,
            })
            .collect()
    }
}

/// Parse a raw reply body into its canonical envelope.
pub fn parse_envelope(raw_body: &str) -> Result<RawEnvelope, ParseError> {
    let root: Value = serde_json::from_str(raw_body).map_err(|e| {
        log::debug!("Reply is not JSON: {}", e);
        ParseError::MalformedJson
    })?;
    let Value::Object(mut root) = root else {
        return Err(ParseError::MalformedJson);
    };

    let Some(Value::Object(mut response)) = root.remove("response") else {
        return Err(ParseError::MissingResponse);
    };
    let Some(Value::Object(header)) = response.remove("header") else {
        return Err(ParseError::MissingHeader);
    };
    let Some(Value::Object(mut body)) = response.remove("body") else {
        return Err(ParseError::MissingBody);
    };

    let items = body
        .remove("items")
        .and_then(|raw| serde_json::from_value::<ItemsContainer>(raw).ok())
        .map(ItemsContainer::into_items)
        .unwrap_or_default();

    Ok(RawEnvelope {
        header,
        body,
        items,
    })
}

/// String form of a field; absent or null yields an empty string.
pub fn field_as_string(object: &JsonObject, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn field_as_u64(object: &JsonObject, key: &str) -> u64 {
    match object.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(items: &str) -> String {
        format!(
            r#"{{"response":{{"header":{{"resultCode":"00","resultMsg":"OK"}},"body":{{"numOfRows":"10","pageNo":"1","totalCount":"2"{items}}}}}}}"#
        )
    }

    fn titles(envelope: &RawEnvelope) -> Vec<String> {
        envelope
            .items
            .iter()
            .map(|item| field_as_string(item, "bidNtceNm"))
            .collect()
    }

    #[test]
    fn rejects_non_json_and_non_object_roots() {
        assert_eq!(parse_envelope("<xml/>"), Err(ParseError::MalformedJson));
        assert_eq!(parse_envelope("[1,2]"), Err(ParseError::MalformedJson));
    }

    #[test]
    fn reports_each_missing_key_distinctly() {
        assert_eq!(parse_envelope("{}"), Err(ParseError::MissingResponse));
        assert_eq!(
            parse_envelope(r#"{"response":{"body":{}}}"#),
            Err(ParseError::MissingHeader)
        );
        assert_eq!(
            parse_envelope(r#"{"response":{"header":{}}}"#),
            Err(ParseError::MissingBody)
        );
    }

    #[test]
    fn absent_items_yield_empty_sequence() {
        let envelope = parse_envelope(&wrap("")).unwrap();
        assert!(envelope.items.is_empty());
    }

    #[test]
    fn plain_array_is_used_as_is() {
        let envelope =
            parse_envelope(&wrap(r#","items":[{"bidNtceNm":"A"},{"bidNtceNm":"B"}]"#)).unwrap();
        assert_eq!(titles(&envelope), ["A", "B"]);
    }

    #[test]
    fn wrapped_single_object_becomes_singleton() {
        let envelope = parse_envelope(&wrap(r#","items":{"item":{"bidNtceNm":"A"}}"#)).unwrap();
        assert_eq!(titles(&envelope), ["A"]);
    }

    #[test]
    fn wrapped_array_is_unwrapped() {
        let envelope =
            parse_envelope(&wrap(r#","items":{"item":[{"bidNtceNm":"A"},{"bidNtceNm":"B"}]}"#))
                .unwrap();
        assert_eq!(titles(&envelope), ["A", "B"]);
    }

    #[test]
    fn unexpected_shapes_are_silently_empty() {
        for items in [
            r#","items":"""#,
            r#","items":null"#,
            r#","items":42"#,
            r#","items":{"other":[]}"#,
            r#","items":{"item":"x"}"#,
        ] {
            let envelope = parse_envelope(&wrap(items)).unwrap();
            assert!(envelope.items.is_empty(), "items shape {items}");
        }
    }

    #[test]
    fn non_object_elements_are_dropped() {
        let envelope = parse_envelope(&wrap(r#","items":[1,{"bidNtceNm":"A"},"x"]"#)).unwrap();
        assert_eq!(titles(&envelope), ["A"]);
    }

    #[test]
    fn summary_parses_string_and_number_counts() {
        let envelope = parse_envelope(
            r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE."},"body":{"numOfRows":999,"pageNo":"2","totalCount":"2500"}}}"#,
        )
        .unwrap();
        let summary = envelope.summary();
        assert_eq!(summary.result_msg, "NORMAL SERVICE.");
        assert_eq!(summary.num_of_rows, 999);
        assert_eq!(summary.page_no, 2);
        assert_eq!(summary.total_count, 2500);
        assert_eq!(envelope.page_meta("totalCount").as_deref(), Some("2500"));
        assert_eq!(envelope.page_meta("bidNtceNm"), None);
    }
}
