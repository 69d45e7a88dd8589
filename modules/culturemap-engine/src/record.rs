use std::sync::OnceLock;

use culturemap_common::{ContactDetails, GeoPoint};
use serde::Serialize;

/// One catalog entry: a cultural facility with a category and a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    /// Organization identifier keying contact lookups. `None` disables enrichment.
    pub id: Option<String>,
    /// Facility type label. `None` when the source row had no usable label.
    pub category: Option<String>,
    /// `None` when the source coordinates were missing or unusable.
    pub position: Option<GeoPoint>,
    pub display: DisplayFields,
}

/// Human-facing fields. Absent values stay absent here; renderers pick the fallback text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayFields {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(skip)]
    contact: OnceLock<ContactDetails>,
}

impl DisplayFields {
    pub fn new(name: Option<String>, address: Option<String>) -> Self {
        Self {
            name,
            address,
            contact: OnceLock::new(),
        }
    }

    /// Contact details, once a lookup for this record has succeeded.
    pub fn contact(&self) -> Option<&ContactDetails> {
        self.contact.get()
    }

    /// Write-once. Returns false if contact details were already set.
    pub(crate) fn set_contact(&self, details: ContactDetails) -> bool {
        self.contact.set(details).is_ok()
    }
}

impl GeoRecord {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            id: None,
            category: Some(category.into()),
            position: None,
            display: DisplayFields::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.position = Some(GeoPoint::new(lat, lng));
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.display.address = Some(address.into());
        self
    }

    /// Identifier usable as a lookup key (present and not blank).
    pub fn lookup_key(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Position with both components finite, if any.
    pub fn valid_position(&self) -> Option<&GeoPoint> {
        self.position.as_ref().filter(|p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_is_write_once() {
        let record = GeoRecord::new("Musée").with_id("200046977");
        assert!(record.display.contact().is_none());

        assert!(record.display.set_contact(ContactDetails::new("01", "a@b.fr")));
        assert!(!record.display.set_contact(ContactDetails::new("02", "c@d.fr")));
        assert_eq!(record.display.contact().unwrap().phone, "01");
    }

    #[test]
    fn new_display_fields_start_without_contact() {
        let display = DisplayFields::new(Some("Musée du Berry".into()), None);
        assert_eq!(display.name.as_deref(), Some("Musée du Berry"));
        assert!(display.address.is_none());
        assert!(display.contact().is_none());
    }

    #[test]
    fn blank_identifier_is_not_a_lookup_key() {
        assert_eq!(GeoRecord::new("Musée").with_id("  ").lookup_key(), None);
        assert_eq!(GeoRecord::new("Musée").lookup_key(), None);
        assert_eq!(GeoRecord::new("Musée").with_id("243500139").lookup_key(), Some("243500139"));
    }

    #[test]
    fn non_finite_position_is_not_valid() {
        assert!(GeoRecord::new("Cinéma").at(f64::NAN, 2.0).valid_position().is_none());
        assert!(GeoRecord::new("Cinéma").at(48.0, 2.0).valid_position().is_some());
    }
}
