use culturemap_common::{
    ContactDetails, ADDRESS_UNAVAILABLE, CATEGORY_UNAVAILABLE, IDENTIFIER_UNAVAILABLE,
    NAME_UNAVAILABLE,
};
use serde::Serialize;

use crate::record::GeoRecord;

/// One exported row. Absent catalog fields carry their display fallback text;
/// coordinates stay empty rather than invented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub address: String,
    pub category: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub identifier: String,
    pub email: String,
    pub phone: String,
}

impl ExportRow {
    pub fn from_record(record: &GeoRecord) -> Self {
        let contact = record
            .display
            .contact()
            .cloned()
            .unwrap_or_else(ContactDetails::unavailable);
        let position = record.valid_position();

        Self {
            name: or_fallback(&record.display.name, NAME_UNAVAILABLE),
            address: or_fallback(&record.display.address, ADDRESS_UNAVAILABLE),
            category: or_fallback(&record.category, CATEGORY_UNAVAILABLE),
            longitude: position.map(|p| p.lng),
            latitude: position.map(|p| p.lat),
            identifier: record
                .lookup_key()
                .map(String::from)
                .unwrap_or_else(|| IDENTIFIER_UNAVAILABLE.to_string()),
            email: contact.email,
            phone: contact.phone,
        }
    }
}

fn or_fallback(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

/// Rows for the visible subset, in order.
pub fn export_rows(visible: &[&GeoRecord]) -> Vec<ExportRow> {
    visible.iter().map(|r| ExportRow::from_record(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use culturemap_common::UNAVAILABLE;

    #[test]
    fn bare_record_exports_fallbacks() {
        let mut record = GeoRecord::new("Musée");
        record.category = None;
        let row = ExportRow::from_record(&record);

        assert_eq!(row.name, NAME_UNAVAILABLE);
        assert_eq!(row.address, ADDRESS_UNAVAILABLE);
        assert_eq!(row.category, CATEGORY_UNAVAILABLE);
        assert_eq!(row.identifier, IDENTIFIER_UNAVAILABLE);
        assert_eq!(row.longitude, None);
        assert_eq!(row.email, UNAVAILABLE);
        assert_eq!(row.phone, UNAVAILABLE);
    }

    #[test]
    fn enriched_record_exports_contact() {
        let record = GeoRecord::new("Théâtre")
            .named("TAP")
            .with_address("6 rue de la Marne 86000 Poitiers")
            .with_id("200069854")
            .at(46.5836, 0.3366);
        record
            .display
            .set_contact(ContactDetails::new("05 49 39 29 29", "billetterie@tap-poitiers.com"));

        let rows = export_rows(&[&record]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "TAP");
        assert_eq!(rows[0].latitude, Some(46.5836));
        assert_eq!(rows[0].longitude, Some(0.3366));
        assert_eq!(rows[0].phone, "05 49 39 29 29");
    }
}
