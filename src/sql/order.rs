//! Caller-supplied sort clause: `column [asc|desc]`, comma separated.
//! Only the shape is checked here; whether the column exists is left to the backend.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub descending: bool,
}

fn term_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)(?:\s+([A-Za-z]+))?\s*$").ok())
        .as_ref()
}

/// Parse an order clause. `Err` carries the offending term.
pub fn parse_order(clause: &str) -> Result<Vec<OrderTerm>, String> {
    let mut terms = Vec::new();
    for part in clause.split(',') {
        let caps = term_pattern()
            .and_then(|re| re.captures(part))
            .ok_or_else(|| part.trim().to_string())?;
        let descending = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
            None => false,
            Some(dir) if dir == "asc" => false,
            Some(dir) if dir == "desc" => true,
            Some(_) => return Err(part.trim().to_string()),
        };
        terms.push(OrderTerm {
            column: caps[1].to_string(),
            descending,
        });
    }
    Ok(terms)
}
