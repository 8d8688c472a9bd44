// ── Animal domain type ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use super::entity_id::EntityId;
use super::options::ConservationStatus;
use crate::entity::{Entity, EntityKind};
use crate::schema::{FieldSpec, FilterField, Severity, null_as_default};
use crate::stats::{self, Stat};

/// A tracked wildlife species population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    #[serde(rename = "animalId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scientific_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species_type: String,
    /// Population count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conservation_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sighting_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Animal {
    pub fn is_endangered(&self) -> bool {
        self.conservation_status
            .parse::<ConservationStatus>()
            .is_ok_and(ConservationStatus::is_endangered)
    }
}

impl Entity for Animal {
    const KIND: EntityKind = EntityKind::Animal;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Name").required().hint("e.g., Bengal Tiger"),
        FieldSpec::text("scientificName", "Scientific Name").hint("e.g., Panthera tigris"),
        FieldSpec::text("speciesType", "Species Type").hint("e.g., Mammal"),
        FieldSpec::integer("count", "Population").required().quick(),
        FieldSpec::text("zone", "Zone").required().quick().hint("e.g., Zone A"),
        FieldSpec::text("location", "Location").hint("e.g., North ridge"),
        FieldSpec::choice(
            "conservationStatus",
            "Conservation Status",
            ConservationStatus::VARIANTS,
        )
        .quick(),
        FieldSpec::date("lastSightingDate", "Last Sighting").today(),
    ];

    const COLUMNS: &'static [&'static str] = &[
        "name",
        "speciesType",
        "count",
        "zone",
        "conservationStatus",
        "lastSightingDate",
    ];

    const FILTERS: &'static [FilterField] = &[FilterField::Zone, FilterField::ConservationStatus];

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
        self.name.clone()
    }

    fn severity(&self) -> Severity {
        Severity::from_conservation(&self.conservation_status)
    }

    fn summarize(records: &[Self], _today: NaiveDate) -> Vec<Stat> {
        vec![
            Stat::count("Total Species", stats::total(records)),
            Stat::count("Total Population", stats::sum_counts(records, |a| a.count)),
            Stat::count("Endangered", stats::count_where(records, Self::is_endangered)),
        ]
    }
}
