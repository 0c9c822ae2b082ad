use time::{PrimitiveDateTime, format_description::well_known::Rfc3339};

pub mod games;
pub mod health;
pub mod import;
pub mod member;
pub mod player;
pub mod validation;

/// Render a database timestamp (stored without zone, written in UTC) as RFC 3339.
fn format_timestamp(time: PrimitiveDateTime) -> String {
    time.assume_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
