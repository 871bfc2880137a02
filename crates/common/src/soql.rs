//! Fixed-shape SOQL construction for the reprocessing query.
//!
//! Pure string transforms: record-id list in, query text out. Ids are escaped rather
//! than substituted character-by-character, so a quote inside an id cannot break out
//! of the IN clause.

/// Default name of the custom timestamp field stamped on each record.
pub const DEFAULT_LAST_PROCESSED_FIELD: &str = "Last_Processed_TS__c";

/// Resolve the last-processed field name, applying the managed-package namespace
/// prefix when one is present.
pub fn last_processed_field(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}__{DEFAULT_LAST_PROCESSED_FIELD}"),
        _ => DEFAULT_LAST_PROCESSED_FIELD.to_string(),
    }
}

/// Escape a record id for use inside a single-quoted SOQL string literal.
fn escape_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Render record ids as a parenthesized, quoted, comma-separated IN clause:
/// `('003A','003B')`.
pub fn in_clause(ids: &[String]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("'{}'", escape_id(id))).collect();
    format!("({})", quoted.join(","))
}

/// Build the reprocessing query for a batch of Contact ids.
pub fn contact_query(ids: &[String], namespace: Option<&str>) -> String {
    format!(
        "SELECT Id, {}, FirstName, LastName FROM Contact WHERE Id IN {}",
        last_processed_field(namespace),
        in_clause(ids)
    )
}
