// ── Entity abstraction ──
//
// The console manages six record types through one generic view. This
// trait is the descriptor that view is parameterized by.

use std::fmt::Debug;

use canopy_api::Collection;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, EnumString};

use crate::model::EntityId;
use crate::schema::{FieldSpec, FilterField, QuickFilter, Severity};
use crate::stats::Stat;

/// Which record type a screen or command manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Animal,
    Tree,
    Plant,
    Officer,
    Visitor,
    Resource,
}

impl EntityKind {
    pub fn collection(self) -> Collection {
        match self {
            Self::Animal => Collection::Animals,
            Self::Tree => Collection::Trees,
            Self::Plant => Collection::Plants,
            Self::Officer => Collection::Officers,
            Self::Visitor => Collection::Visitors,
            Self::Resource => Collection::Resources,
        }
    }

    /// Lowercase singular noun used in messages ("animal").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Animal => "animal",
            Self::Tree => "tree",
            Self::Plant => "plant",
            Self::Officer => "officer",
            Self::Visitor => "visitor",
            Self::Resource => "resource",
        }
    }

    /// Capitalized singular ("Forest Officer").
    pub fn title(self) -> &'static str {
        match self {
            Self::Animal => "Animal",
            Self::Tree => "Tree",
            Self::Plant => "Plant",
            Self::Officer => "Forest Officer",
            Self::Visitor => "Visitor",
            Self::Resource => "Resource",
        }
    }

    /// Heading for the management screen.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Animal => "Wildlife Management",
            Self::Tree => "Tree Management",
            Self::Plant => "Plant Management",
            Self::Officer => "Forest Officers",
            Self::Visitor => "Visitor Management",
            Self::Resource => "Resource Management",
        }
    }
}

/// A record type the console can list, edit and summarize.
pub trait Entity:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const KIND: EntityKind;

    /// Every editable field, in form order.
    const FIELDS: &'static [FieldSpec];

    /// Keys shown as table columns, after the id.
    const COLUMNS: &'static [&'static str];

    /// Text filters in priority order: the first non-empty one wins.
    const FILTERS: &'static [FilterField];

    const QUICK_FILTERS: &'static [QuickFilter] = &[];

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: EntityId);

    fn zone(&self) -> &str;

    /// Short human label for confirmations and toasts.
    fn display_name(&self) -> String;

    fn severity(&self) -> Severity {
        Severity::Neutral
    }

    /// Headline statistics over the given list.
    fn summarize(records: &[Self], today: NaiveDate) -> Vec<Stat>;

    /// Whether this entity offers the reduced quick-update form.
    fn supports_quick_update() -> bool {
        Self::FIELDS.iter().any(|f| f.quick)
    }

    fn field(key: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.key == key)
    }

    fn quick_fields() -> impl Iterator<Item = &'static FieldSpec> {
        Self::FIELDS.iter().filter(|f| f.quick)
    }
}
