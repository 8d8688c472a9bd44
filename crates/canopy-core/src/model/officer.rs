// ── Forest officer domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::entity_id::EntityId;
use super::options::OfficerStatus;
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, QuickFilter, Severity, null_as_default};
use crate::stats::{self, Stat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestOfficer {
    #[serde(rename = "officerId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub designation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ForestOfficer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    pub fn is_active(&self) -> bool {
        self.status == OfficerStatus::Active.to_string()
    }
}

impl Entity for ForestOfficer {
    const KIND: EntityKind = EntityKind::Officer;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("firstName", "First Name").required().hint("e.g., John"),
        FieldSpec::text("lastName", "Last Name").required().hint("e.g., Doe"),
        FieldSpec::text("employeeId", "Employee ID").hint("e.g., EMP-1042"),
        FieldSpec::text("designation", "Designation").quick().hint("e.g., Forest Ranger"),
        FieldSpec::text("department", "Department"),
        FieldSpec::text("assignedZone", "Assigned Zone").required().quick().hint("e.g., Zone A"),
        FieldSpec::text("contactNumber", "Contact Number").quick().hint("e.g., +1234567890"),
        FieldSpec::text("email", "Email"),
        FieldSpec::date("joiningDate", "Joining Date"),
        FieldSpec::choice("status", "Status", OfficerStatus::VARIANTS).quick(),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "firstName",
        "lastName",
        "designation",
        "assignedZone",
        "contactNumber",
        "status",
    ];

    const FILTERS: &'static [FilterField] = &[FilterField::Zone];

    const QUICK_FILTERS: &'static [QuickFilter] = &[QuickFilter::Active];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn zone(&self) -> &str {
        &self.assigned_zone
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn severity(&self) -> Severity {
        Severity::from_officer_status(&self.status)
    }

    fn summarize(records: &[Self], _today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Officers", stats::total(records)),
            Stat::count("Active", stats::count_where(records, Self::is_active)),
            Stat::count("Zones Covered", stats::distinct(records, |o| o.assigned_zone.as_str())),
        ]
    }
}
