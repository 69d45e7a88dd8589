use std::collections::HashMap;

use serde::Deserialize;

/// Contact fields the directory holds for one organization.
/// Every field is optional; blank strings count as missing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ContactRecord {
    pub telephone: Option<String>,
    pub telephone_administratif: Option<String>,
    pub email: Option<String>,
}

impl ContactRecord {
    /// Main switchboard number, falling back to the administrative line.
    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.telephone).or_else(|| non_blank(&self.telephone_administratif))
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    /// At least one usable contact field is present.
    pub fn has_contact(&self) -> bool {
        self.phone().is_some() || self.email().is_some()
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Response body of `GET /contacts`: identifier → contact record.
pub type ContactsResponse = HashMap<String, ContactRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_falls_back_to_administrative_line() {
        let record: ContactRecord = serde_json::from_str(
            r#"{"telephone": "  ", "telephone_administratif": "05 49 00 00 00"}"#,
        )
        .unwrap();
        assert_eq!(record.phone(), Some("05 49 00 00 00"));
        assert_eq!(record.email(), None);
        assert!(record.has_contact());
    }

    #[test]
    fn primary_phone_wins() {
        let record = ContactRecord {
            telephone: Some("01 00 00 00 00".into()),
            telephone_administratif: Some("02 00 00 00 00".into()),
            email: Some("accueil@musee.fr".into()),
        };
        assert_eq!(record.phone(), Some("01 00 00 00 00"));
        assert_eq!(record.email(), Some("accueil@musee.fr"));
    }

    #[test]
    fn empty_record_has_no_contact() {
        let response: ContactsResponse =
            serde_json::from_str(r#"{"213500001": {}, "213500002": {"email": null}}"#).unwrap();
        assert_eq!(response.len(), 2);
        assert!(response.values().all(|r| !r.has_contact()));
    }
}
