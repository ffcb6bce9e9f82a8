//! Row projector: raw items to flat, schema-keyed records.

use crate::models::{CURRENCY_KEYS, PAGE_META_KEYS, Record};
use crate::utils::amount::format_amount;

use super::envelope::{JsonObject, RawEnvelope, field_as_string};

/// Project one item into a record.
///
/// Page-level keys are read from the envelope, every other key from the item.
/// Missing fields become empty strings; currency fields get thousands separators.
pub fn project_row(
    item: &JsonObject,
    page: &RawEnvelope,
    ordinal: usize,
    schema: &[String],
) -> Record {
    let mut record = Record::new(ordinal);
    for key in schema {
        let raw = if PAGE_META_KEYS.contains(&key.as_str()) {
            page.page_meta(key).unwrap_or_default()
        } else {
            field_as_string(item, key)
        };
        let value = if CURRENCY_KEYS.contains(&key.as_str()) {
            format_amount(&raw)
        } else {
            raw
        };
        record.set(key, value);
    }
    record
}

/// Project every item of a page, numbering from 1.
pub fn project_page(page: &RawEnvelope, schema: &[String]) -> Vec<Record> {
    page.items
        .iter()
        .enumerate()
        .map(|(i, item)| project_row(item, page, i + 1, schema))
        .collect()
}
