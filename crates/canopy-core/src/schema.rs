// ── Schema descriptors ──
//
// Each entity describes its editable fields, table columns and filters as
// static data. Forms, tables and filter panels in both front-ends are
// generated from these descriptors instead of being written per entity.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Input kind of a form field, which decides how raw text is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative whole number.
    Integer,
    Decimal,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM` or `HH:MM:SS`
    Time,
    Flag,
    /// Free text with a list of suggested values.
    Choice(&'static [&'static str]),
    /// Numeric id of another record.
    Reference,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Reference)
    }
}

/// One editable field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key on the wire.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Exposed by the quick-update form.
    pub quick: bool,
    /// New drafts start with today's date.
    pub defaults_today: bool,
    pub hint: Option<&'static str>,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            quick: false,
            defaults_today: false,
            hint: None,
        }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub const fn integer(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Integer)
    }

    pub const fn decimal(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Decimal)
    }

    pub const fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub const fn time(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Time)
    }

    pub const fn flag(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Flag)
    }

    pub const fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(key, label, FieldKind::Choice(options))
    }

    pub const fn reference(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Reference)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn quick(mut self) -> Self {
        self.quick = true;
        self
    }

    pub const fn today(mut self) -> Self {
        self.defaults_today = true;
        self
    }

    pub const fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Text filter inputs an entity screen offers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Zone,
    ConservationStatus,
    HealthStatus,
    Type,
    Date,
    DateRange,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Zone => "Zone",
            Self::ConservationStatus => "Conservation Status",
            Self::HealthStatus => "Health Status",
            Self::Type => "Type",
            Self::Date => "Date",
            Self::DateRange => "Date Range",
        }
    }
}

/// One-shot filters that need no input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickFilter {
    Medicinal,
    Active,
}

impl QuickFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::Medicinal => "Medicinal only",
            Self::Active => "Active only",
        }
    }
}

/// Presentation-only urgency of a record, derived from its status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Good,
    Neutral,
}

impl Severity {
    pub fn from_conservation(status: &str) -> Self {
        match status {
            "Endangered" | "Critically Endangered" => Self::Critical,
            "Vulnerable" => Self::Warning,
            _ => Self::Good,
        }
    }

    pub fn from_health(status: &str) -> Self {
        match status {
            "Healthy" => Self::Good,
            "Needs Care" => Self::Warning,
            "Diseased" | "Dead" => Self::Critical,
            _ => Self::Neutral,
        }
    }

    pub fn from_officer_status(status: &str) -> Self {
        match status {
            "Active" => Self::Good,
            "On Leave" => Self::Warning,
            _ => Self::Neutral,
        }
    }

    pub fn from_condition(status: &str) -> Self {
        match status {
            "Excellent" | "Good" => Self::Good,
            "Fair" => Self::Warning,
            "Poor" | "Needs Repair" => Self::Critical,
            _ => Self::Neutral,
        }
    }
}

/// Render a JSON field value for a table cell or form input.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "Yes".into(),
        Value::Bool(false) => "No".into(),
        other => other.to_string(),
    }
}

/// Deserialize `null` as the type's default.
///
/// The service emits `null` for unset numeric and text columns; records
/// keep plain values for the fields every form requires.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_flags_compose() {
        const FIELD: FieldSpec = FieldSpec::integer("count", "Population").required().quick();
        assert!(FIELD.required);
        assert!(FIELD.quick);
        assert!(!FIELD.defaults_today);
        assert!(FIELD.kind.is_numeric());
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(Severity::from_conservation("Critically Endangered"), Severity::Critical);
        assert_eq!(Severity::from_conservation("Vulnerable"), Severity::Warning);
        assert_eq!(Severity::from_conservation("Least Concern"), Severity::Good);
        assert_eq!(Severity::from_health("Needs Care"), Severity::Warning);
        assert_eq!(Severity::from_health("unknown"), Severity::Neutral);
        assert_eq!(Severity::from_condition("Needs Repair"), Severity::Critical);
    }

    #[test]
    fn value_text_formats_cells() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("Zone A")), "Zone A");
        assert_eq!(value_text(&json!(12.5)), "12.5");
        assert_eq!(value_text(&json!(true)), "Yes");
    }
}
