// ── Domain model ──
//
// One flat record type per tracked entity. Field names follow the
// service's camelCase JSON; enumerated columns stay plain strings.

pub mod animal;
pub mod entity_id;
pub mod officer;
pub mod options;
pub mod plant;
pub mod resource;
pub mod tree;
pub mod visitor;

pub use animal::Animal;
pub use entity_id::EntityId;
pub use officer::ForestOfficer;
pub use options::{
    ConditionStatus, ConservationStatus, HealthStatus, OfficerStatus, ResourceType, TreeType,
    VisitorType,
};
pub use plant::Plant;
pub use resource::Resource;
pub use tree::Tree;
pub use visitor::Visitor;
