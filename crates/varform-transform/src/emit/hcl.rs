//! Declaration text rendering.
//!
//! All output uses `\n` line endings and sorted keys, so identical models
//! always render to identical bytes.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;
use varform_core::{Environment, Sensitivity};

use crate::normalize::{Bucket, Buckets};

/// Indent width of the comprehensive and manifest files.
const INDENT: usize = 2;
/// Indent width of the JSON-style object in scoped files.
const SCOPED_INDENT: usize = 6;
/// Closes the `locals` and project blocks of a scoped file.
const SCOPED_TRAILER: &str = "\n  }\n}\n";

// Keys matching this can be written without quotes.
static BARE_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap());

/// A double-quoted string literal.
///
/// JSON escaping, plus `${`/`%{` doubled so the provisioning tool does not
/// treat exported values as templates.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("${", "$${")
        .replace("%{", "%%{")
}

/// A value literal; absent values become `null`.
pub fn value_literal(value: Option<&str>) -> String {
    match value {
        Some(v) => string_literal(v),
        None => "null".to_string(),
    }
}

/// A key, bare when it is identifier-safe and quoted otherwise.
pub fn object_key(key: &str) -> String {
    if BARE_KEY_REGEX.is_match(key) {
        key.to_string()
    } else {
        string_literal(key)
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    let _ = writeln!(out, "{:width$}{}", "", text, width = depth * INDENT);
}

fn write_bucket(out: &mut String, depth: usize, key: &str, bucket: &Bucket) {
    if bucket.is_empty() {
        line(out, depth, &format!("{} = {{}}", object_key(key)));
        return;
    }
    line(out, depth, &format!("{} = {{", object_key(key)));
    for (name, value) in bucket {
        line(
            out,
            depth + 1,
            &format!("{} = {}", object_key(name), value_literal(value.as_deref())),
        );
    }
    line(out, depth, "}");
}

/// Every set of a project in one `locals` block, sensitivity-major.
///
/// ```hcl
/// locals {
///   billing = {
///     Shared_Config = {
///       parameters = {
///         production = {
///           X = "1"
///         }
///         ...
/// ```
pub fn render_comprehensive(
    local_name: &str,
    sets: &BTreeMap<String, Buckets<Sensitivity, Environment>>,
) -> String {
    let mut out = String::from("locals {\n");
    if sets.is_empty() {
        line(&mut out, 1, &format!("{} = {{}}", local_name));
    } else {
        line(&mut out, 1, &format!("{} = {{", local_name));
        for (set, sensitivities) in sets {
            line(&mut out, 2, &format!("{} = {{", object_key(set)));
            for (sensitivity, environments) in sensitivities {
                line(&mut out, 3, &format!("{} = {{", sensitivity));
                for (environment, bucket) in environments {
                    write_bucket(&mut out, 4, environment.as_str(), bucket);
                }
                line(&mut out, 3, "}");
            }
            line(&mut out, 2, "}");
        }
        line(&mut out, 1, "}");
    }
    out.push_str("}\n");
    out
}

/// The sorted list of set names in use by a project.
pub fn render_manifest<'a>(local_name: &str, set_names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = set_names.into_iter().collect();
    names.sort_unstable();
    names.dedup();

    let key = format!("{}_parametersets", local_name);
    let mut out = String::from("locals {\n");
    if names.is_empty() {
        line(&mut out, 1, &format!("{} = []", key));
    } else {
        line(&mut out, 1, &format!("{} = [", key));
        let last = names.len() - 1;
        for (i, name) in names.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            line(&mut out, 2, &format!("{}{}", string_literal(name), separator));
        }
        line(&mut out, 1, "]");
    }
    out.push_str("}\n");
    out
}

/// One bucket for one environment, as a JSON-style object with quoted keys.
///
/// ```hcl
/// locals {
///   billing = {
///     staging = {
///       "X" = "1"
/// }
///   }
/// }
/// ```
pub fn render_scoped(local_name: &str, environment: Environment, bucket: &Bucket) -> String {
    let mut out = format!(
        "locals {{\n  {} = {{\n    {} = ",
        local_name, environment
    );
    if bucket.is_empty() {
        out.push_str("{}");
    } else {
        out.push('{');
        for (name, value) in bucket {
            let _ = write!(
                out,
                "\n{:width$}{} = {}",
                "",
                string_literal(name),
                value_literal(value.as_deref()),
                width = SCOPED_INDENT
            );
        }
        out.push_str("\n}");
    }
    out.push_str(SCOPED_TRAILER);
    out
}
