//! Table-driven decoding of RPC documents into [`Package`] records.
//!
//! Each object under `results` is walked key by key. Keys are resolved
//! against [`FIELDS`], a table sorted by key name, and the matching
//! [`Slot`] both fixes the JSON kind the value must have and knows where the
//! value lands in the record. Numbers of any form are narrowed into the
//! integer fields. Unknown keys, `null` values and values of the wrong kind
//! are logged and skipped.

use std::collections::TryReserveError;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::package::{Package, PackageList};

/// Top-level key holding the array of package objects.
const RESULTS_KEY: &str = "results";

/// Why a response body could not be turned into a [`PackageList`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON parsed but `results` is missing or not an array.
    #[error("unexpected document shape: {0}")]
    Shape(&'static str),

    /// The server answered with an error document.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The record array could not be allocated.
    #[error("out of memory: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Where a decoded value is stored, and therefore which JSON kind it needs.
enum Slot {
    Str(fn(&mut Package) -> &mut Option<String>),
    Int(fn(&mut Package) -> &mut i64),
    List(fn(&mut Package) -> &mut Vec<String>),
}

impl Slot {
    fn expected(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::List(_) => "array",
        }
    }
}

struct Field {
    key: &'static str,
    slot: Slot,
}

/// Must stay sorted by `key`; lookups are a binary search.
static FIELDS: &[Field] = &[
    Field { key: "CategoryID", slot: Slot::Int(|p| &mut p.category_id) },
    Field { key: "CheckDepends", slot: Slot::List(|p| &mut p.checkdepends) },
    Field { key: "Conflicts", slot: Slot::List(|p| &mut p.conflicts) },
    Field { key: "Depends", slot: Slot::List(|p| &mut p.depends) },
    Field { key: "Description", slot: Slot::Str(|p| &mut p.description) },
    Field { key: "FirstSubmitted", slot: Slot::Int(|p| &mut p.submitted) },
    Field { key: "Groups", slot: Slot::List(|p| &mut p.groups) },
    Field { key: "ID", slot: Slot::Int(|p| &mut p.package_id) },
    Field { key: "LastModified", slot: Slot::Int(|p| &mut p.modified) },
    Field { key: "License", slot: Slot::List(|p| &mut p.licenses) },
    Field { key: "Maintainer", slot: Slot::Str(|p| &mut p.maintainer) },
    Field { key: "MakeDepends", slot: Slot::List(|p| &mut p.makedepends) },
    Field { key: "Name", slot: Slot::Str(|p| &mut p.name) },
    Field { key: "NumVotes", slot: Slot::Int(|p| &mut p.votes) },
    Field { key: "OptDepends", slot: Slot::List(|p| &mut p.optdepends) },
    Field { key: "OutOfDate", slot: Slot::Int(|p| &mut p.out_of_date) },
    Field { key: "PackageBase", slot: Slot::Str(|p| &mut p.pkgbase) },
    Field { key: "PackageBaseID", slot: Slot::Int(|p| &mut p.pkgbase_id) },
    Field { key: "Provides", slot: Slot::List(|p| &mut p.provides) },
    Field { key: "Replaces", slot: Slot::List(|p| &mut p.replaces) },
    Field { key: "URL", slot: Slot::Str(|p| &mut p.upstream_url) },
    Field { key: "URLPath", slot: Slot::Str(|p| &mut p.urlpath) },
    Field { key: "Version", slot: Slot::Str(|p| &mut p.version) },
];

fn lookup(key: &str) -> Option<&'static Field> {
    FIELDS
        .binary_search_by(|field| field.key.cmp(key))
        .ok()
        .map(|i| &FIELDS[i])
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode an RPC response body into a list of packages.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] if `json` does not parse,
/// [`DecodeError::Rpc`] if the server answered with an error document,
/// [`DecodeError::Shape`] if `results` is missing or not an array, and
/// [`DecodeError::Alloc`] if the record array cannot be allocated.
pub fn packages_from_json(json: &[u8]) -> Result<PackageList, DecodeError> {
    let mut doc: Value = serde_json::from_slice(json)?;

    if doc.get("type").and_then(Value::as_str) == Some("error") {
        let message = doc
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(DecodeError::Rpc(message.to_string()));
    }

    let results = match doc.get_mut(RESULTS_KEY).map(Value::take) {
        Some(Value::Array(results)) => results,
        Some(_) => return Err(DecodeError::Shape("`results` is not an array")),
        None => return Err(DecodeError::Shape("missing `results`")),
    };

    let mut records = Vec::new();
    records.try_reserve_exact(results.len() + 1)?;

    for entry in results {
        match entry {
            Value::Object(object) => records.push(copy_to_package(object)),
            other => warn!(kind = kind_of(&other), "skipping non-object entry in results"),
        }
    }
    records.push(Package::default());

    Ok(PackageList::from_terminated(records))
}

fn copy_to_package(object: Map<String, Value>) -> Package {
    let mut package = Package::default();

    for (key, value) in object {
        let Some(field) = lookup(&key) else {
            debug!(key = key.as_str(), "no field for key, skipping");
            continue;
        };

        // leave the field unset
        if value.is_null() {
            continue;
        }

        match (&field.slot, value) {
            (Slot::Str(slot), Value::String(s)) => *slot(&mut package) = Some(s),
            (Slot::Int(slot), Value::Number(n)) => *slot(&mut package) = narrow(&n),
            (Slot::List(slot), Value::Array(items)) => *slot(&mut package) = copy_to_list(&key, items),
            (slot, other) => warn!(
                key = key.as_str(),
                got = kind_of(&other),
                expected = slot.expected(),
                "type mismatch, skipping"
            ),
        }
    }

    package
}

/// Fit any JSON number into an `i64`, saturating at the bounds and
/// truncating fractions toward zero.
fn narrow(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        i
    } else if n.is_u64() {
        i64::MAX
    } else {
        // `as` saturates and maps NaN to 0
        n.as_f64().map_or(0, |f| f as i64)
    }
}

fn copy_to_list(key: &str, items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                warn!(key, got = kind_of(&other), "skipping non-string list element");
                None
            }
        })
        .collect()
}
