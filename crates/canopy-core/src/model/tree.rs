// ── Tree domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::entity_id::EntityId;
use super::options::{HealthStatus, TreeType};
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, Severity, null_as_default};
use crate::stats::{self, Stat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    #[serde(rename = "treeId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scientific_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,
    #[serde(default)]
    pub height_meters: Option<f64>,
    #[serde(default)]
    pub age_years: Option<u32>,
    #[serde(default)]
    pub diameter_cm: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plantation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tree_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Tree {
    const KIND: EntityKind = EntityKind::Tree;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("commonName", "Common Name").required().hint("e.g., Oak"),
        FieldSpec::text("scientificName", "Scientific Name").hint("e.g., Quercus"),
        FieldSpec::text("location", "Location").hint("e.g., North Forest Section 3"),
        FieldSpec::text("zone", "Zone").required().hint("e.g., Zone A"),
        FieldSpec::decimal("heightMeters", "Height (m)"),
        FieldSpec::integer("ageYears", "Age (years)"),
        FieldSpec::decimal("diameterCm", "Diameter (cm)"),
        FieldSpec::choice("healthStatus", "Health Status", HealthStatus::VARIANTS),
        FieldSpec::date("plantationDate", "Plantation Date"),
        FieldSpec::choice("treeType", "Tree Type", TreeType::VARIANTS),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "commonName",
        "treeType",
        "zone",
        "heightMeters",
        "ageYears",
        "healthStatus",
    ];

    const FILTERS: &'static [FilterField] = &[FilterField::Zone, FilterField::HealthStatus];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn zone(&self) -> &str {
        &self.zone
    }

    fn display_name(&self) -> String {
        self.common_name.clone()
    }

    fn severity(&self) -> Severity {
        Severity::from_health(&self.health_status)
    }

    fn summarize(records: &[Self], _today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Trees", stats::total(records)),
            Stat::count(
                "Healthy",
                stats::count_where(records, |t| t.health_status == "Healthy"),
            ),
            Stat::count(
                "Needs Care",
                stats::count_where(records, |t| t.health_status == "Needs Care"),
            ),
            Stat::amount(
                "Avg Height (m)",
                stats::average(records, |t| t.height_meters),
            ),
        ]
    }
}
