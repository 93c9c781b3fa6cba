use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Returns the current UTC instant formatted as RFC3339
/// (e.g. "2025-11-02T12:34:56Z").
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).expect("error formatting timestamp")
}
