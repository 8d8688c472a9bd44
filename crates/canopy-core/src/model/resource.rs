// ── Resource domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::entity_id::EntityId;
use super::options::{ConditionStatus, ResourceType};
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, Severity, null_as_default};
use crate::stats::{self, Stat};

/// Equipment, vehicles and supplies, optionally assigned to an officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "resourceId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_zone: String,
    /// Weak reference to a `ForestOfficer`; never resolved client-side.
    #[serde(default)]
    pub assigned_officer_id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub condition_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_maintenance_date: Option<NaiveDate>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Resource {
    const KIND: EntityKind = EntityKind::Resource;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("resourceName", "Name").required().hint("e.g., Forest Patrol Vehicle"),
        FieldSpec::choice("resourceType", "Type", ResourceType::VARIANTS),
        FieldSpec::integer("quantity", "Quantity").required(),
        FieldSpec::text("unit", "Unit").hint("e.g., units, litres"),
        FieldSpec::text("location", "Location"),
        FieldSpec::text("assignedZone", "Assigned Zone").required().hint("e.g., Zone A"),
        FieldSpec::reference("assignedOfficerId", "Officer ID").hint("Officer ID"),
        FieldSpec::choice("conditionStatus", "Condition", ConditionStatus::VARIANTS),
        FieldSpec::decimal("cost", "Cost"),
        FieldSpec::date("purchaseDate", "Purchase Date"),
        FieldSpec::date("lastMaintenanceDate", "Last Maintenance").today(),
        FieldSpec::date("nextMaintenanceDate", "Next Maintenance"),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "resourceName",
        "resourceType",
        "quantity",
        "assignedZone",
        "assignedOfficerId",
        "conditionStatus",
    ];

    const FILTERS: &'static [FilterField] = &[FilterField::Zone, FilterField::Type];

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
        self.resource_name.clone()
    }

    fn severity(&self) -> Severity {
        Severity::from_condition(&self.condition_status)
    }

    fn summarize(records: &[Self], _today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Resources", stats::total(records)),
            Stat::count("Total Quantity", stats::sum_counts(records, |r| r.quantity)),
            Stat::count(
                "Assigned",
                stats::count_where(records, |r| r.assigned_officer_id.is_some()),
            ),
            Stat::count("Types", stats::distinct(records, |r| r.resource_type.as_str())),
        ]
    }
}
