//! Submitted form values and field validation
//!
//! HTML forms arrive as urlencoded key/value pairs (a key may repeat, e.g.
//! genre checkboxes). API create bodies are JSON objects and are flattened
//! into the same [`FormData`] so both paths share one set of validators.

use atm_common::validators::parse_rating_tenths;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const REQUIRED: &str = "This field is required.";

/// Submitted key/value pairs in submission order
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Flatten a JSON object: arrays become repeated keys, null is omitted
    pub fn from_json(body: &Value) -> Result<Self, String> {
        let object = body
            .as_object()
            .ok_or_else(|| "Expected a JSON object".to_string())?;

        let mut form = Self::new();
        for (key, value) in object {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = json_scalar(item) {
                            form.push(key, text);
                        }
                    }
                }
                other => {
                    if let Some(text) = json_scalar(other) {
                        form.push(key, text);
                    }
                }
            }
        }
        Ok(form)
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Builder-style `push`
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value.to_string());
        self
    }

    /// First value for `key`, whitespace-trimmed; empty when absent
    pub fn value(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .unwrap_or("")
    }

    /// First value for `key` exactly as submitted
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All non-empty values for a repeated key
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim())
            .collect()
    }

    pub fn has_value(&self, key: &str, value: &str) -> bool {
        self.values(key).iter().any(|v| *v == value)
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Validation messages keyed by field name, plus form-wide messages
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// `{"field": ["message", ...], "non_field_errors": [...]}`
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (field, messages) in &self.fields {
            map.insert(field.clone(), Value::from(messages.clone()));
        }
        if !self.non_field.is_empty() {
            map.insert(
                "non_field_errors".to_string(),
                Value::from(self.non_field.clone()),
            );
        }
        Value::Object(map)
    }
}

/// Required text field with an optional length cap
pub fn required_text(
    form: &FormData,
    errors: &mut FormErrors,
    name: &str,
    max_len: Option<usize>,
) -> String {
    let value = form.value(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return String::new();
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            errors.add(
                name,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max, len
                ),
            );
        }
    }
    value.to_string()
}

/// Optional free text; blank becomes `None`
pub fn optional_text(form: &FormData, name: &str) -> Option<String> {
    let value = form.value(name);
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_int(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

pub fn required_int(form: &FormData, errors: &mut FormErrors, name: &str) -> Option<i64> {
    let value = form.value(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return None;
    }
    let parsed = parse_int(value);
    if parsed.is_none() {
        errors.add(name, "Enter a whole number.");
    }
    parsed
}

/// Optional integer: blank is `Ok(None)`, garbage is an error
pub fn optional_int(form: &FormData, errors: &mut FormErrors, name: &str) -> Option<i64> {
    let value = form.value(name);
    if value.is_empty() {
        return None;
    }
    let parsed = parse_int(value);
    if parsed.is_none() {
        errors.add(name, "Enter a whole number.");
    }
    parsed
}

pub fn optional_date(form: &FormData, errors: &mut FormErrors, name: &str) -> Option<NaiveDate> {
    let value = form.value(name);
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(name, "Enter a valid date.");
            None
        }
    }
}

fn invalid_choice(value: &str) -> String {
    format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    )
}

/// Required choice among an enumeration, by code or label
pub fn required_choice<T>(
    form: &FormData,
    errors: &mut FormErrors,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let value = form.value(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        errors.add(name, invalid_choice(value));
    }
    parsed
}

/// Required reference to one of `valid_ids`
pub fn required_id(
    form: &FormData,
    errors: &mut FormErrors,
    name: &str,
    valid_ids: &[i64],
) -> Option<i64> {
    let value = form.value(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return None;
    }
    match parse_int(value) {
        Some(id) if valid_ids.contains(&id) => Some(id),
        _ => {
            errors.add(name, invalid_choice(value));
            None
        }
    }
}

/// Required non-empty set of references to `valid_ids`
pub fn required_ids(
    form: &FormData,
    errors: &mut FormErrors,
    name: &str,
    valid_ids: &[i64],
) -> Vec<i64> {
    let values = form.values(name);
    if values.is_empty() {
        errors.add(name, REQUIRED);
        return Vec::new();
    }

    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        match parse_int(value) {
            Some(id) if valid_ids.contains(&id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => {
                errors.add(name, invalid_choice(value));
                return Vec::new();
            }
        }
    }
    ids
}

/// Required rating, returned in tenths
pub fn required_rating(form: &FormData, errors: &mut FormErrors, name: &str) -> Option<i64> {
    let value = form.value(name);
    if value.is_empty() {
        errors.add(name, REQUIRED);
        return None;
    }
    match parse_rating_tenths(value) {
        Ok(tenths) => Some(tenths),
        Err(message) => {
            errors.add(name, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repeated_keys() {
        let form = FormData::from_pairs(vec![
            ("genre".into(), "1".into()),
            ("name".into(), "  Emperor ".into()),
            ("genre".into(), "3".into()),
        ]);
        assert_eq!(form.values("genre"), vec!["1", "3"]);
        assert_eq!(form.value("name"), "Emperor");
        assert_eq!(form.value("missing"), "");
    }

    #[test]
    fn test_from_json_flattens_arrays() {
        let form = FormData::from_json(&json!({
            "name": "Mayhem",
            "formed_in": 1984,
            "genre": [2, 5],
            "bio": null
        }))
        .unwrap();
        assert_eq!(form.value("formed_in"), "1984");
        assert_eq!(form.values("genre"), vec!["2", "5"]);
        assert_eq!(form.raw("bio"), None);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(FormData::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_required_text_limits() {
        let form = FormData::new().with("name", "abcdef");
        let mut errors = FormErrors::new();
        required_text(&form, &mut errors, "name", Some(3));
        required_text(&form, &mut errors, "missing", None);
        assert_eq!(
            errors.field("name"),
            ["Ensure this value has at most 3 characters (it has 6).".to_string()]
        );
        assert_eq!(errors.field("missing"), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_required_ids_rejects_unknown() {
        let form = FormData::new().with("genre", 1).with("genre", 9);
        let mut errors = FormErrors::new();
        let ids = required_ids(&form, &mut errors, "genre", &[1, 2]);
        assert!(ids.is_empty());
        assert!(errors.has("genre"));
    }

    #[test]
    fn test_optional_int_blank_is_none() {
        let form = FormData::new().with("ended_in", "").with("year", "19x");
        let mut errors = FormErrors::new();
        assert_eq!(optional_int(&form, &mut errors, "ended_in"), None);
        assert!(errors.is_empty());
        assert_eq!(optional_int(&form, &mut errors, "year"), None);
        assert_eq!(errors.field("year"), ["Enter a whole number.".to_string()]);
    }

    #[test]
    fn test_errors_to_json() {
        let mut errors = FormErrors::new();
        errors.add("name", REQUIRED);
        errors.add_non_field("Passwords don't match");
        assert_eq!(
            errors.to_json(),
            json!({
                "name": [REQUIRED],
                "non_field_errors": ["Passwords don't match"]
            })
        );
    }
}
