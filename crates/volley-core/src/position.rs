//! Canonical position groups

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five canonical role groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionGroup {
    Outside,
    MiddleBlocker,
    Opposite,
    Setter,
    Libero,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 5] = [
        PositionGroup::Outside,
        PositionGroup::MiddleBlocker,
        PositionGroup::Opposite,
        PositionGroup::Setter,
        PositionGroup::Libero,
    ];

    /// Map a raw role code to its group.
    ///
    /// `OH*` → Outside, `MB*` → Middle Blocker (prefix match); `OPP`, `S`
    /// and `L` match exactly. Anything else is unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.starts_with("OH") {
            Some(Self::Outside)
        } else if code.starts_with("MB") {
            Some(Self::MiddleBlocker)
        } else {
            match code.as_str() {
                "OPP" => Some(Self::Opposite),
                "S" => Some(Self::Setter),
                "L" => Some(Self::Libero),
                _ => None,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Outside => "Outside",
            Self::MiddleBlocker => "Middle Blocker",
            Self::Opposite => "Opposite",
            Self::Setter => "Setter",
            Self::Libero => "Libero",
        }
    }

    /// Liberos may not attack or block
    pub fn can_attack_or_block(&self) -> bool {
        !matches!(self, Self::Libero)
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_exact_codes() {
        assert_eq!(PositionGroup::from_code("OH2"), Some(PositionGroup::Outside));
        assert_eq!(PositionGroup::from_code("oh1"), Some(PositionGroup::Outside));
        assert_eq!(PositionGroup::from_code("MB1"), Some(PositionGroup::MiddleBlocker));
        assert_eq!(PositionGroup::from_code("OPP"), Some(PositionGroup::Opposite));
        assert_eq!(PositionGroup::from_code("S"), Some(PositionGroup::Setter));
        assert_eq!(PositionGroup::from_code(" L "), Some(PositionGroup::Libero));
    }

    #[test]
    fn test_unrecognized_codes() {
        assert_eq!(PositionGroup::from_code(""), None);
        assert_eq!(PositionGroup::from_code("DS"), None);
        // exact match only for setter and opposite
        assert_eq!(PositionGroup::from_code("S2"), None);
        assert_eq!(PositionGroup::from_code("OPP1"), None);
    }

    #[test]
    fn test_libero_cannot_attack() {
        assert!(!PositionGroup::Libero.can_attack_or_block());
        assert!(PositionGroup::Outside.can_attack_or_block());
    }
}
