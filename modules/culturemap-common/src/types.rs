use serde::{Deserialize, Serialize};

/// Display text for a contact field that could not be resolved.
pub const UNAVAILABLE: &str = "unavailable";

/// Render-time fallbacks for catalog fields the source left empty.
pub const NAME_UNAVAILABLE: &str = "Nom non disponible";
pub const ADDRESS_UNAVAILABLE: &str = "Adresse non disponible";
pub const CATEGORY_UNAVAILABLE: &str = "Type non disponible";
pub const IDENTIFIER_UNAVAILABLE: &str = "non disponible";

/// Contact details for an organization, as shown next to a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub phone: String,
    pub email: String,
}

impl ContactDetails {
    pub fn new(phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Both fields set to the "unavailable" sentinel.
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE, UNAVAILABLE)
    }

    /// Build from optional fields, substituting the sentinel for each absent one.
    pub fn from_parts(phone: Option<String>, email: Option<String>) -> Self {
        Self {
            phone: phone.unwrap_or_else(|| UNAVAILABLE.to_string()),
            email: email.unwrap_or_else(|| UNAVAILABLE.to_string()),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.phone == UNAVAILABLE && self.email == UNAVAILABLE
    }
}
