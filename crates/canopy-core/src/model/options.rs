// ── Enumerated field vocabularies ──
//
// Values are stored as plain strings on the records. These enums only
// supply the choices offered by forms and filters, plus severity lookups.

use strum::{Display, EnumString, VariantNames};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum ConservationStatus {
    Endangered,
    Vulnerable,
    #[strum(serialize = "Near Threatened")]
    NearThreatened,
    #[strum(serialize = "Least Concern")]
    LeastConcern,
    #[strum(serialize = "Critically Endangered")]
    CriticallyEndangered,
}

impl ConservationStatus {
    /// Counted in the "endangered" statistic.
    pub fn is_endangered(self) -> bool {
        matches!(self, Self::Endangered | Self::CriticallyEndangered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum HealthStatus {
    Healthy,
    #[strum(serialize = "Needs Care")]
    NeedsCare,
    Diseased,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum TreeType {
    Deciduous,
    Evergreen,
    Coniferous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum OfficerStatus {
    Active,
    Inactive,
    #[strum(serialize = "On Leave")]
    OnLeave,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum ResourceType {
    Vehicle,
    Equipment,
    Tools,
    Communication,
    #[strum(serialize = "Safety Gear")]
    SafetyGear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum ConditionStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    #[strum(serialize = "Needs Repair")]
    NeedsRepair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
pub enum VisitorType {
    Tourist,
    Researcher,
    Student,
    Photographer,
    Official,
}
