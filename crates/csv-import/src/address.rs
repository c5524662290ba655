//! Single-line mailing addresses for geocoding.

use std::collections::BTreeMap;

const ADDRESS_FIELDS: [&str; 5] = ["address_1", "address_2", "city", "state", "zip"];

fn field<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    fields.get(name).map(String::as_str).unwrap_or("")
}

/// `"{address_1} {address_2} {city}, {state} {zip}"`, absent fields empty.
pub fn format_map_address(fields: &BTreeMap<String, String>) -> String {
    format!(
        "{} {} {}, {} {}",
        field(fields, "address_1"),
        field(fields, "address_2"),
        field(fields, "city"),
        field(fields, "state"),
        field(fields, "zip"),
    )
}

/// True when at least one address field has content.
pub fn has_address(fields: &BTreeMap<String, String>) -> bool {
    ADDRESS_FIELDS
        .iter()
        .any(|name| !field(fields, name).trim().is_empty())
}
