//! Key-name transcoding between the backends' snake_case wire contract and
//! the camelCase representation used everywhere else in this crate.
//!
//! Only object *keys* are ever touched. Values — including strings that
//! happen to look like dates or identifiers — pass through untouched, and
//! the input tree is never mutated.
//!
//! Irregular keys (mostly acronym-bearing ones such as `no_pks_po` ↔
//! `noPKSPO`) live in static override tables, looked up before the regular
//! rule runs. Keys outside the tables fall through to the algorithmic rule,
//! which is *not* guaranteed to round-trip for acronym-bearing camelCase
//! input (`noPKSPO` would become `no_p_k_s_p_o`). That is a known limitation
//! of the contract, not an error condition: both directions are total.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular snake→camel mappings. Every entry here must have its exact
/// reversal in [`CAMEL_TO_SNAKE_OVERRIDES`].
const SNAKE_TO_CAMEL_OVERRIDES: &[(&str, &str)] = &[
    ("no_pks_po", "noPKSPO"),
    ("no_bast", "noBAST"),
    ("no_lha", "noLHA"),
    ("audit_uic", "auditUIC"),
    ("kpi_ytd", "kpiYTD"),
    ("pic_nip", "picNIP"),
];

/// Irregular camel→snake mappings. Larger than the snake→camel table: it
/// also absorbs the regular-rule spellings older clients produced for the
/// same keys, so both `noPKSPO` and `noPksPo` land on `no_pks_po`.
const CAMEL_TO_SNAKE_OVERRIDES: &[(&str, &str)] = &[
    ("noPKSPO", "no_pks_po"),
    ("noPksPo", "no_pks_po"),
    ("noBAST", "no_bast"),
    ("noBast", "no_bast"),
    ("noLHA", "no_lha"),
    ("noLha", "no_lha"),
    ("auditUIC", "audit_uic"),
    ("auditUic", "audit_uic"),
    ("kpiYTD", "kpi_ytd"),
    ("kpiYtd", "kpi_ytd"),
    ("picNIP", "pic_nip"),
    ("picNip", "pic_nip"),
];

static SNAKE_TO_CAMEL: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SNAKE_TO_CAMEL_OVERRIDES.iter().copied().collect());

static CAMEL_TO_SNAKE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CAMEL_TO_SNAKE_OVERRIDES.iter().copied().collect());

/// Convert a single snake_case key to camelCase.
///
/// Override table first; otherwise every `_x` (underscore followed by an
/// ASCII lowercase letter) becomes the uppercased letter. Underscores not
/// followed by a lowercase letter (trailing, doubled, `_1`) are kept as-is.
pub fn key_to_camel(key: &str) -> String {
    if let Some(mapped) = SNAKE_TO_CAMEL.get(key) {
        return (*mapped).to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            match chars.peek() {
                Some(next) if next.is_ascii_lowercase() => {
                    let next = chars.next().unwrap_or('_');
                    out.push(next.to_ascii_uppercase());
                }
                _ => out.push('_'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a single camelCase key to snake_case.
///
/// Override table first; otherwise every ASCII uppercase letter becomes
/// `_` + its lowercase form.
pub fn key_to_snake(key: &str) -> String {
    if let Some(mapped) = CAMEL_TO_SNAKE.get(key) {
        return (*mapped).to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively convert every object key in `value` to camelCase.
pub fn to_camel(value: &Value) -> Value {
    transform(value, key_to_camel)
}

/// Recursively convert every object key in `value` to snake_case.
pub fn to_snake(value: &Value) -> Value {
    transform(value, key_to_snake)
}

fn transform(value: &Value, key_fn: fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| transform(v, key_fn)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (key_fn(k), transform(v, key_fn)))
                .collect(),
        ),
        other => other.clone(),
    }
}
