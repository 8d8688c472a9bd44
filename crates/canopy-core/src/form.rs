// ── Form drafts ──
//
// A draft is the unsaved JSON image of a record. Every edit replaces one
// key. Inputs that fail to parse are remembered verbatim and block saving
// until corrected.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::entity::Entity;
use crate::error::CoreError;
use crate::schema::{FieldKind, FieldSpec, value_text};

/// Raw text of an input that did not parse, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInput {
    pub raw: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    values: Map<String, Value>,
    invalid: BTreeMap<String, InvalidInput>,
}

impl Draft {
    /// Fresh draft for an add form: empty text, zero counters, first
    /// option for choices, and today where the field asks for it.
    pub fn blank<E: Entity>(today: NaiveDate) -> Self {
        let values = E::FIELDS
            .iter()
            .map(|field| (field.key.to_owned(), blank_value(field, today)))
            .collect();
        Self {
            values,
            invalid: BTreeMap::new(),
        }
    }

    /// Copy the given fields out of an existing record.
    pub fn from_record<'a, E: Entity>(
        record: &E,
        fields: impl IntoIterator<Item = &'a FieldSpec>,
    ) -> Result<Self, CoreError> {
        let image = to_json_map(record)?;
        let values = fields
            .into_iter()
            .map(|field| {
                let value = image.get(field.key).cloned().unwrap_or(Value::Null);
                (field.key.to_owned(), value)
            })
            .collect();
        Ok(Self {
            values,
            invalid: BTreeMap::new(),
        })
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Text to show in the input: the rejected raw text if there is one.
    pub fn text(&self, key: &str) -> String {
        match self.invalid.get(key) {
            Some(invalid) => invalid.raw.clone(),
            None => self.values.get(key).map(value_text).unwrap_or_default(),
        }
    }

    pub fn invalid(&self, key: &str) -> Option<&InvalidInput> {
        self.invalid.get(key)
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Parse raw text for a field and store the result.
    pub fn set_input(&mut self, field: &FieldSpec, raw: &str) {
        match parse_input(field.kind, raw) {
            Ok(value) => {
                self.invalid.remove(field.key);
                self.values.insert(field.key.to_owned(), value);
            }
            Err(reason) => {
                self.values.insert(field.key.to_owned(), Value::Null);
                self.invalid.insert(
                    field.key.to_owned(),
                    InvalidInput {
                        raw: raw.to_owned(),
                        reason,
                    },
                );
            }
        }
    }

    /// Store an already-typed JSON value.
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.invalid.remove(key);
        self.values.insert(key.to_owned(), value);
    }

    /// Flip a boolean field.
    pub fn toggle(&mut self, key: &str) {
        let current = self.values.get(key).and_then(Value::as_bool).unwrap_or(false);
        self.set_value(key, Value::Bool(!current));
    }

    /// Step a choice field to the next or previous suggested option.
    pub fn cycle(&mut self, field: &FieldSpec, forward: bool) {
        let FieldKind::Choice(options) = field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = self.text(field.key);
        let next = match options.iter().position(|o| *o == current) {
            Some(idx) if forward => (idx + 1) % options.len(),
            Some(idx) => (idx + options.len() - 1) % options.len(),
            None if forward => 0,
            None => options.len() - 1,
        };
        if let Some(option) = options.get(next) {
            self.set_value(field.key, Value::String((*option).to_owned()));
        }
    }

    /// Check unparsed inputs and required fields among `fields`. Keys the
    /// draft does not carry are left to the record being merged into.
    pub fn validate<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldSpec>,
    ) -> Result<(), CoreError> {
        let mut problems = Vec::new();
        for field in fields {
            if let Some(invalid) = self.invalid.get(field.key) {
                problems.push(format!("{}: {}", field.label, invalid.reason));
            } else if field.required && self.values.get(field.key).is_some_and(is_blank) {
                problems.push(format!("{} is required", field.label));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::validation(problems.join("; ")))
        }
    }

    /// Overlay draft values onto a base image. With `only`, keys outside
    /// that list are left as the base has them.
    pub fn merge_into(&self, mut base: Map<String, Value>, only: Option<&[&str]>) -> Map<String, Value> {
        for (key, value) in &self.values {
            if only.is_none_or(|keys| keys.contains(&key.as_str())) {
                base.insert(key.clone(), value.clone());
            }
        }
        base
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn blank_value(field: &FieldSpec, today: NaiveDate) -> Value {
    match field.kind {
        FieldKind::Text => Value::String(String::new()),
        FieldKind::Integer if field.required => Value::Number(Number::from(0_u32)),
        FieldKind::Flag => Value::Bool(false),
        FieldKind::Choice(options) => options
            .first()
            .map_or(Value::String(String::new()), |o| Value::String((*o).to_owned())),
        FieldKind::Date if field.defaults_today => {
            Value::String(today.format("%Y-%m-%d").to_string())
        }
        FieldKind::Integer
        | FieldKind::Decimal
        | FieldKind::Date
        | FieldKind::Time
        | FieldKind::Reference => Value::Null,
    }
}

/// Parse raw input text according to a field kind.
///
/// Empty input clears optional values (`null`); text stays text.
pub fn parse_input(kind: FieldKind, raw: &str) -> Result<Value, &'static str> {
    let trimmed = raw.trim();
    match kind {
        FieldKind::Text | FieldKind::Choice(_) => Ok(Value::String(trimmed.to_owned())),
        _ if trimmed.is_empty() && kind != FieldKind::Flag => Ok(Value::Null),
        FieldKind::Integer => trimmed
            .parse::<u32>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| "expected a whole number"),
        FieldKind::Reference => trimmed
            .parse::<u64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| "expected a record id"),
        FieldKind::Decimal => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or("expected a number"),
        FieldKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|_| Value::String(trimmed.to_owned()))
            .map_err(|_| "expected a date as YYYY-MM-DD"),
        FieldKind::Time => NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map(|_| Value::String(trimmed.to_owned()))
            .map_err(|_| "expected a time as HH:MM"),
        FieldKind::Flag => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "n" | "0" | "off" | "" => Ok(Value::Bool(false)),
            _ => Err("expected yes or no"),
        },
    }
}

pub fn to_json_map<T: Serialize>(record: &T) -> Result<Map<String, Value>, CoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CoreError::Internal(format!(
            "record serialized to a non-object: {other}"
        ))),
        Err(e) => Err(CoreError::Internal(format!("failed to serialize record: {e}"))),
    }
}

pub fn from_json_map<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| CoreError::validation(format!("Invalid record: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{Animal, Plant, Tree};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn blank_animal_defaults() {
        let draft = Draft::blank::<Animal>(today());
        assert_eq!(draft.value("name"), Some(&json!("")));
        assert_eq!(draft.value("count"), Some(&json!(0)));
        assert_eq!(draft.value("conservationStatus"), Some(&json!("Endangered")));
        assert_eq!(draft.value("lastSightingDate"), Some(&json!("2025-03-14")));
    }

    #[test]
    fn blank_tree_leaves_optional_numbers_null() {
        let draft = Draft::blank::<Tree>(today());
        assert_eq!(draft.value("heightMeters"), Some(&Value::Null));
        assert_eq!(draft.value("plantationDate"), Some(&Value::Null));
    }

    #[test]
    fn numeric_input_parses_or_is_flagged() {
        let field = Animal::field("count").unwrap();
        let mut draft = Draft::blank::<Animal>(today());

        draft.set_input(field, "12");
        assert_eq!(draft.value("count"), Some(&json!(12)));
        assert!(draft.is_valid());

        draft.set_input(field, "twelve");
        assert!(!draft.is_valid());
        assert_eq!(draft.text("count"), "twelve");
        let err = draft.validate(Animal::FIELDS).unwrap_err();
        assert_eq!(err.to_string(), "Population: expected a whole number");

        draft.set_input(field, "7");
        assert!(draft.is_valid());
        assert_eq!(draft.text("count"), "7");
    }

    #[test]
    fn empty_optional_decimal_becomes_null() {
        let field = Tree::field("heightMeters").unwrap();
        let mut draft = Draft::blank::<Tree>(today());
        draft.set_input(field, "12.5");
        assert_eq!(draft.value("heightMeters"), Some(&json!(12.5)));
        draft.set_input(field, "  ");
        assert_eq!(draft.value("heightMeters"), Some(&Value::Null));
    }

    #[test]
    fn required_fields_are_enforced() {
        let draft = Draft::blank::<Animal>(today());
        let err = draft.validate(Animal::FIELDS).unwrap_err();
        assert_eq!(err.to_string(), "Name is required; Zone is required");
    }

    #[test]
    fn flags_toggle_and_parse() {
        let mut draft = Draft::blank::<Plant>(today());
        assert_eq!(draft.value("medicinalUse"), Some(&json!(false)));
        draft.toggle("medicinalUse");
        assert_eq!(draft.value("medicinalUse"), Some(&json!(true)));
        draft.set_input(Plant::field("medicinalUse").unwrap(), "no");
        assert_eq!(draft.value("medicinalUse"), Some(&json!(false)));
    }

    #[test]
    fn choices_cycle_in_both_directions() {
        let field = Tree::field("healthStatus").unwrap();
        let mut draft = Draft::blank::<Tree>(today());
        assert_eq!(draft.text("healthStatus"), "Healthy");
        draft.cycle(field, true);
        assert_eq!(draft.text("healthStatus"), "Needs Care");
        draft.cycle(field, false);
        draft.cycle(field, false);
        assert_eq!(draft.text("healthStatus"), "Dead");
    }

    #[test]
    fn choices_accept_values_outside_the_list() {
        let field = Tree::field("treeType").unwrap();
        let mut draft = Draft::blank::<Tree>(today());
        draft.set_input(field, "Palm");
        assert_eq!(draft.value("treeType"), Some(&json!("Palm")));
    }

    #[test]
    fn time_and_date_inputs_are_checked() {
        assert_eq!(parse_input(FieldKind::Time, "09:30"), Ok(json!("09:30")));
        assert_eq!(parse_input(FieldKind::Time, "09:30:15"), Ok(json!("09:30:15")));
        assert!(parse_input(FieldKind::Time, "9.30am").is_err());
        assert!(parse_input(FieldKind::Date, "2025-02-30").is_err());
        assert_eq!(parse_input(FieldKind::Reference, "7"), Ok(json!(7)));
        assert!(parse_input(FieldKind::Integer, "-3").is_err());
    }

    #[test]
    fn merge_respects_key_subset() {
        let mut draft = Draft::default();
        draft.set_value("count", json!(99));
        draft.set_value("zone", json!("Zone Z"));
        let base = json!({ "animalId": 1, "count": 1, "zone": "Zone A", "name": "Tiger" });
        let Value::Object(base) = base else { unreachable!() };

        let merged = draft.merge_into(base.clone(), Some(&["count"][..]));
        assert_eq!(merged["count"], 99);
        assert_eq!(merged["zone"], "Zone A");

        let merged = draft.merge_into(base, None);
        assert_eq!(merged["zone"], "Zone Z");
        assert_eq!(merged["animalId"], 1);
        assert_eq!(merged["name"], "Tiger");
    }
}
