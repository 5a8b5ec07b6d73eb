use chrono::SecondsFormat;

/// Document ids are opaque strings assigned by the store.
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts, in euros.
pub type Amount = f64;

/// Render a timestamp in the fixed-width form used for stored documents.
///
/// Always microsecond precision with a `Z` suffix, so that comparing two
/// rendered timestamps as strings gives the same order as comparing the
/// instants themselves.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time in stored-document form.
pub fn now_string() -> String {
    format_timestamp(chrono::Utc::now())
}

/// Fresh document id.
pub fn new_doc_id() -> DocId {
    uuid::Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width() {
        let a = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        let (fa, fb) = (format_timestamp(a), format_timestamp(b));
        assert_eq!(fa, "2024-01-02T03:04:05.000000Z");
        assert_eq!(fa.len(), fb.len());
        assert!(fa < fb);
    }

    #[test]
    fn doc_ids_are_unique() {
        let first = new_doc_id();
        let second = new_doc_id();
        assert_ne!(first, second);
        assert_eq!(first.len(), 32);
    }
}
