// ── Filter inputs ──
//
// Screens keep one text input per filter field. Applying them picks the
// highest-priority non-empty input; the rest are ignored.

use canopy_api::Filter;
use chrono::NaiveDate;

use crate::error::CoreError;
use crate::schema::{FilterField, QuickFilter};

pub const DATE_RANGE_INCOMPLETE: &str = "Please select both start and end dates";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub zone: String,
    /// Conservation or health status, depending on the entity.
    pub status: String,
    pub kind: String,
    pub date: String,
    pub from: String,
    pub to: String,
}

impl FilterInputs {
    pub fn is_empty(&self) -> bool {
        [&self.zone, &self.status, &self.kind, &self.date, &self.from, &self.to]
            .iter()
            .all(|v| v.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The input backing a single-value filter field.
    ///
    /// `DateRange` has two inputs and is addressed through `from` / `to`.
    pub fn input_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Zone => &mut self.zone,
            FilterField::ConservationStatus | FilterField::HealthStatus => &mut self.status,
            FilterField::Type => &mut self.kind,
            FilterField::Date => &mut self.date,
            FilterField::DateRange => &mut self.from,
        }
    }

    /// Resolve the inputs against an entity's priority list.
    ///
    /// Returns `Ok(None)` when every relevant input is empty.
    pub fn resolve(&self, fields: &[FilterField]) -> Result<Option<Filter>, CoreError> {
        for field in fields {
            let filter = match field {
                FilterField::Zone => non_empty(&self.zone).map(Filter::Zone),
                FilterField::ConservationStatus => {
                    non_empty(&self.status).map(Filter::ConservationStatus)
                }
                FilterField::HealthStatus => non_empty(&self.status).map(Filter::HealthStatus),
                FilterField::Type => non_empty(&self.kind).map(Filter::Type),
                FilterField::Date => match non_empty(&self.date) {
                    Some(date) => Some(Filter::Date(checked_date(date)?)),
                    None => None,
                },
                FilterField::DateRange => {
                    match (non_empty(&self.from), non_empty(&self.to)) {
                        (Some(start), Some(end)) => Some(Filter::DateRange {
                            start: checked_date(start)?,
                            end: checked_date(end)?,
                        }),
                        (None, None) => None,
                        _ => return Err(CoreError::validation(DATE_RANGE_INCOMPLETE)),
                    }
                }
            };
            if filter.is_some() {
                return Ok(filter);
            }
        }
        Ok(None)
    }
}

impl From<QuickFilter> for Filter {
    fn from(quick: QuickFilter) -> Self {
        match quick {
            QuickFilter::Medicinal => Filter::Medicinal,
            QuickFilter::Active => Filter::Active,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn checked_date(value: String) -> Result<String, CoreError> {
    match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        Ok(_) => Ok(value),
        Err(_) => Err(CoreError::validation(format!(
            "Invalid date '{value}', expected YYYY-MM-DD"
        ))),
    }
}
