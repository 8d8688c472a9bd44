//! Screen identifiers and tab-bar ordering.

use std::fmt;

use canopy_core::EntityKind;

/// Identifies each top-level screen. Everything except `Login` sits in the
/// tab bar and is reachable with number keys once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    Dashboard, // 1
    Animals,   // 2
    Trees,     // 3
    Plants,    // 4
    Officers,  // 5
    Visitors,  // 6
    Resources, // 7
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 7] = [
        Self::Dashboard,
        Self::Animals,
        Self::Trees,
        Self::Plants,
        Self::Officers,
        Self::Visitors,
        Self::Resources,
    ];

    /// The entity screens, in dashboard menu order.
    pub const MODULES: [ScreenId; 6] = [
        Self::Animals,
        Self::Trees,
        Self::Plants,
        Self::Officers,
        Self::Visitors,
        Self::Resources,
    ];

    /// Number key for this screen. Login has none.
    pub fn number(self) -> u8 {
        match self {
            Self::Login => 0,
            Self::Dashboard => 1,
            Self::Animals => 2,
            Self::Trees => 3,
            Self::Plants => 4,
            Self::Officers => 5,
            Self::Visitors => 6,
            Self::Resources => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Animals => "Wildlife",
            Self::Trees => "Trees",
            Self::Plants => "Plants",
            Self::Officers => "Officers",
            Self::Visitors => "Visitors",
            Self::Resources => "Resources",
        }
    }

    pub fn entity(self) -> Option<EntityKind> {
        match self {
            Self::Login | Self::Dashboard => None,
            Self::Animals => Some(EntityKind::Animal),
            Self::Trees => Some(EntityKind::Tree),
            Self::Plants => Some(EntityKind::Plant),
            Self::Officers => Some(EntityKind::Officer),
            Self::Visitors => Some(EntityKind::Visitor),
            Self::Resources => Some(EntityKind::Resource),
        }
    }

    pub fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Animal => Self::Animals,
            EntityKind::Tree => Self::Trees,
            EntityKind::Plant => Self::Plants,
            EntityKind::Officer => Self::Officers,
            EntityKind::Visitor => Self::Visitors,
            EntityKind::Resource => Self::Resources,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(8), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Resources.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Resources);
        assert_eq!(ScreenId::Animals.next(), ScreenId::Trees);
    }

    #[test]
    fn modules_map_to_entities() {
        for id in ScreenId::MODULES {
            let kind = id.entity().unwrap_or_else(|| panic!("{id} has no entity"));
            assert_eq!(ScreenId::for_entity(kind), id);
        }
        assert!(ScreenId::Dashboard.entity().is_none());
    }
}
