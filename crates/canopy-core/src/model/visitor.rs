// ── Visitor domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::entity_id::EntityId;
use super::options::VisitorType;
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, null_as_default};
use crate::stats::{self, Stat};

/// A logged park visit. The service only stamps `createdAt` on visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    #[serde(rename = "visitorId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visitor_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone_visited: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entity for Visitor {
    const KIND: EntityKind = EntityKind::Visitor;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("fullName", "Full Name").required().hint("e.g., Jane Smith"),
        FieldSpec::text("contactNumber", "Contact Number").hint("e.g., +1234567890"),
        FieldSpec::text("email", "Email"),
        FieldSpec::date("visitDate", "Visit Date").required().today(),
        FieldSpec::time("entryTime", "Entry Time").hint("HH:MM"),
        FieldSpec::time("exitTime", "Exit Time").hint("HH:MM"),
        FieldSpec::choice("visitorType", "Visitor Type", VisitorType::VARIANTS),
        FieldSpec::integer("groupSize", "Group Size").required(),
        FieldSpec::text("permitNumber", "Permit Number").hint("e.g., PER-2025-001"),
        FieldSpec::text("zoneVisited", "Zone Visited").required().hint("e.g., Zone A"),
        FieldSpec::text("purpose", "Purpose"),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "fullName",
        "visitDate",
        "visitorType",
        "groupSize",
        "zoneVisited",
        "permitNumber",
    ];

    const FILTERS: &'static [FilterField] =
        &[FilterField::Zone, FilterField::Date, FilterField::DateRange];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn zone(&self) -> &str {
        &self.zone_visited
    }

    fn display_name(&self) -> String {
        self.full_name.clone()
    }

    fn summarize(records: &[Self], today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Visitors", stats::total(records)),
            Stat::count(
                "Today",
                stats::count_where(records, |v| v.visit_date == Some(today)),
            ),
            Stat::count("Zones Visited", stats::distinct(records, |v| v.zone_visited.as_str())),
        ]
    }
}
