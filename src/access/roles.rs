//! Role codes and the single display-name normalization used everywhere.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized organisational role codes.
///
/// Tokens and configuration refer to roles either by display name
/// (`"Chief Executive Officer"`) or by code (`"CEO"`); [`RoleCode::normalize`]
/// accepts both so no caller ever compares raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCode {
    /// Chief Executive Officer
    CEO,
    /// Head of Finance
    HOF,
    /// Head of Waste
    HOW,
    /// Waste Officer
    WO,
    /// Finance Officer
    FO,
}

impl RoleCode {
    /// Normalize a raw role string to a code.
    ///
    /// Accepts the display name or the code itself; anything else is `None`
    /// and is denied wherever an allow-list applies.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw {
            "Chief Executive Officer" | "CEO" => Some(Self::CEO),
            "Head of Finance" | "HOF" => Some(Self::HOF),
            "Head of Waste" | "HOW" => Some(Self::HOW),
            "Waste Officer" | "WO" => Some(Self::WO),
            "Finance Officer" | "FO" => Some(Self::FO),
            _ => None,
        }
    }

    /// The short code string.
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            Self::CEO => "CEO",
            Self::HOF => "HOF",
            Self::HOW => "HOW",
            Self::WO => "WO",
            Self::FO => "FO",
        }
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_display_names_to_codes() {
        assert_eq!(
            RoleCode::normalize("Chief Executive Officer"),
            Some(RoleCode::CEO)
        );
        assert_eq!(RoleCode::normalize("Head of Finance"), Some(RoleCode::HOF));
        assert_eq!(RoleCode::normalize("Head of Waste"), Some(RoleCode::HOW));
        assert_eq!(RoleCode::normalize("Waste Officer"), Some(RoleCode::WO));
        assert_eq!(RoleCode::normalize("Finance Officer"), Some(RoleCode::FO));
    }

    #[test]
    fn normalize_accepts_codes_directly() {
        assert_eq!(RoleCode::normalize("CEO"), Some(RoleCode::CEO));
        assert_eq!(RoleCode::normalize("WO"), Some(RoleCode::WO));
    }

    #[test]
    fn normalize_rejects_unknown_roles() {
        assert_eq!(RoleCode::normalize("Staff"), None);
        assert_eq!(RoleCode::normalize(""), None);
        assert_eq!(RoleCode::normalize("ceo"), None);
    }

    #[test]
    fn serializes_as_code_string() {
        let json = serde_json::to_string(&RoleCode::HOF).unwrap();
        assert_eq!(json, "\"HOF\"");
        let parsed: RoleCode = serde_json::from_str("\"CEO\"").unwrap();
        assert_eq!(parsed, RoleCode::CEO);
    }
}
