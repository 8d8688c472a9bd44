// REST collections and the filtered-list endpoints they expose.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Top-level REST collection, one per managed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    Animals,
    Trees,
    Plants,
    Officers,
    Visitors,
    Resources,
}

/// Server-side filter for a list request.
///
/// Each variant maps to a dedicated sub-path of the collection, e.g.
/// `Zone("Zone A")` becomes `GET /animals/zone/Zone%20A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Zone(String),
    ConservationStatus(String),
    HealthStatus(String),
    Type(String),
    Medicinal,
    Active,
    Date(String),
    DateRange { start: String, end: String },
}

impl Filter {
    /// Path segments appended after the collection root.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Zone(zone) => vec!["zone", zone],
            Self::ConservationStatus(status) => vec!["conservation-status", status],
            Self::HealthStatus(status) => vec!["health-status", status],
            Self::Type(kind) => vec!["type", kind],
            Self::Medicinal => vec!["medicinal"],
            Self::Active => vec!["active"],
            Self::Date(date) => vec!["date", date],
            Self::DateRange { .. } => vec!["date-range"],
        }
    }

    /// Query parameters, only used by the date-range endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::DateRange { start, end } => {
                vec![("startDate", start.clone()), ("endDate", end.clone())]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_lowercase_paths() {
        assert_eq!(Collection::Officers.as_ref(), "officers");
        assert_eq!(Collection::Resources.to_string(), "resources");
        assert_eq!("trees".parse::<Collection>().ok(), Some(Collection::Trees));
    }

    #[test]
    fn date_range_uses_query_parameters() {
        let filter = Filter::DateRange {
            start: "2025-01-01".into(),
            end: "2025-01-31".into(),
        };
        assert_eq!(filter.segments(), vec!["date-range"]);
        assert_eq!(
            filter.query(),
            vec![
                ("startDate", "2025-01-01".to_owned()),
                ("endDate", "2025-01-31".to_owned())
            ]
        );
    }

    #[test]
    fn zone_filter_keeps_raw_segment() {
        let filter = Filter::Zone("Zone A".into());
        assert_eq!(filter.segments(), vec!["zone", "Zone A"]);
        assert!(filter.query().is_empty());
    }
}
