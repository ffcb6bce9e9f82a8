//! Flat, column-keyed bid-notice records and the column schema.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key of the display-order column.
pub const ORDINAL_KEY: &str = "ordinal";

/// Bid notice title.
pub const TITLE_KEY: &str = "bidNtceNm";
/// Business category ("물품" goods, "용역" services).
pub const CATEGORY_KEY: &str = "bsnsDivNm";
/// Assigned budget (design amount).
pub const BUDGET_KEY: &str = "asignBdgtAmt";
/// Estimated price.
pub const ESTIMATED_PRICE_KEY: &str = "presmptPrce";

/// Fields reformatted with thousands separators.
pub const CURRENCY_KEYS: [&str; 2] = [BUDGET_KEY, ESTIMATED_PRICE_KEY];

/// Keys sourced from the page envelope instead of the item.
pub const PAGE_META_KEYS: [&str; 5] =
    ["resultCode", "resultMsg", "numOfRows", "pageNo", "totalCount"];

/// Default column schema, in display order.
pub const BID_COLUMNS: [&str; 16] = [
    "bidNtceNo",
    "bidNtceOrd",
    "refNtceNo",
    "ppsNtceYn",
    TITLE_KEY,
    "bidNtceSttusNm",
    "bidNtceDate",
    "bidNtceBgn",
    CATEGORY_KEY,
    "cntrctCnclsSttusNm",
    "cntrctCnclsMthdNm",
    "ntceInsttNm",
    "dmndInsttNm",
    BUDGET_KEY,
    ESTIMATED_PRICE_KEY,
    "bidNtceUrl",
];

/// Human-readable header for a column key. Unknown keys display as themselves.
pub fn display_name(key: &str) -> &str {
    match key {
        ORDINAL_KEY => "순번",
        "resultCode" => "결과코드",
        "resultMsg" => "결과메세지",
        "numOfRows" => "한 페이지 결과수",
        "pageNo" => "페이지 번호",
        "totalCount" => "전체 결과수",
        "bidNtceNo" => "입찰공고번호",
        "bidNtceOrd" => "입찰공고차수",
        "refNtceNo" => "참조공고번호",
        "ppsNtceYn" => "나라장터공고여부",
        "bidNtceNm" => "입찰공고명",
        "bidNtceSttusNm" => "입찰공고상태명",
        "bidNtceDate" => "입찰공고일자",
        "bidNtceBgn" => "입찰공고시각",
        "bsnsDivNm" => "업무구분명",
        "cntrctCnclsSttusNm" => "계약체결상태명",
        "cntrctCnclsMthdNm" => "계약체결방법명",
        "ntceInsttNm" => "공고기관명",
        "dmndInsttNm" => "수요기관명",
        "asignBdgtAmt" => "배정예산금액(설계금액)",
        "presmptPrce" => "추정가격",
        "bidNtceUrl" => "입찰공고URL",
        other => other,
    }
}

/// One output column: wire key plus header text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Column {
    pub key: String,
    pub name: String,
}

/// Header row for a schema, ordinal column first.
pub fn header(schema: &[String]) -> Vec<Column> {
    std::iter::once(ORDINAL_KEY)
        .chain(schema.iter().map(String::as_str))
        .map(|key| Column {
            key: key.to_string(),
            name: display_name(key).to_string(),
        })
        .collect()
}

/// The default schema as owned keys.
pub fn default_schema() -> Vec<String> {
    BID_COLUMNS.iter().map(|k| k.to_string()).collect()
}

/// Ordered column → value mapping. The ordinal is always the first entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Start a record holding only its ordinal.
    pub fn new(ordinal: usize) -> Self {
        Self {
            fields: vec![(ORDINAL_KEY.to_string(), ordinal.to_string())],
        }
    }

    /// Append a column, or overwrite it if already present.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn ordinal(&self) -> usize {
        self.get(ORDINAL_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_ordinal(&mut self, ordinal: usize) {
        self.set(ORDINAL_KEY, ordinal.to_string());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Rewrite ordinals as a strict 1..=N sequence in slice order.
pub fn renumber(records: &mut [Record]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.set_ordinal(i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_is_first_and_set_overwrites() {
        let mut record = Record::new(7);
        record.set(TITLE_KEY, "A");
        record.set(TITLE_KEY, "B");
        assert_eq!(record.keys().collect::<Vec<_>>(), [ORDINAL_KEY, TITLE_KEY]);
        assert_eq!(record.get(TITLE_KEY), Some("B"));
        assert_eq!(record.ordinal(), 7);
    }

    #[test]
    fn renumber_produces_dense_sequence() {
        let mut records = vec![Record::new(5), Record::new(5), Record::new(1)];
        renumber(&mut records);
        let ordinals: Vec<_> = records.iter().map(Record::ordinal).collect();
        assert_eq!(ordinals, [1, 2, 3]);
    }

    #[test]
    fn serializes_in_column_order() {
        let mut record = Record::new(1);
        record.set("bidNtceNo", "R25");
        record.set(BUDGET_KEY, "1,000");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ordinal":"1","bidNtceNo":"R25","asignBdgtAmt":"1,000"}"#);
    }

    #[test]
    fn header_puts_ordinal_first() {
        let columns = header(&default_schema());
        assert_eq!(columns.len(), BID_COLUMNS.len() + 1);
        assert_eq!(columns[0].name, "순번");
        assert_eq!(columns[5].name, "입찰공고명");
    }
}
