// ── Plant domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, QuickFilter, null_as_default};
use crate::stats::{self, Stat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "plantId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scientific_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plant_type: String,
    #[serde(default)]
    pub coverage_area_sqm: Option<f64>,
    #[serde(default)]
    pub flowering_season: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medicinal_use: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Plant {
    const KIND: EntityKind = EntityKind::Plant;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("commonName", "Common Name").required().hint("e.g., Aloe Vera"),
        FieldSpec::text("scientificName", "Scientific Name").hint("e.g., Aloe barbadensis"),
        FieldSpec::text("location", "Location"),
        FieldSpec::text("zone", "Zone").required().hint("e.g., Zone A"),
        FieldSpec::text("plantType", "Plant Type").hint("e.g., Herb, Shrub"),
        FieldSpec::decimal("coverageAreaSqm", "Coverage (sqm)"),
        FieldSpec::text("floweringSeason", "Flowering Season").hint("e.g., Spring"),
        FieldSpec::flag("medicinalUse", "Medicinal Use"),
        FieldSpec::integer("count", "Count").required(),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "commonName",
        "plantType",
        "zone",
        "count",
        "coverageAreaSqm",
        "medicinalUse",
    ];

    const FILTERS: &'static [FilterField] = &[FilterField::Zone];

    const QUICK_FILTERS: &'static [QuickFilter] = &[QuickFilter::Medicinal];

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

    fn summarize(records: &[Self], _today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Plants", stats::total(records)),
            Stat::count("Medicinal", stats::count_where(records, |p| p.medicinal_use)),
            Stat::amount(
                "Total Coverage (sqm)",
                stats::sum_amounts(records, |p| p.coverage_area_sqm),
            ),
        ]
    }
}
