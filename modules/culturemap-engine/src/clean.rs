use culturemap_common::{CultureMapError, Result};
use serde_json::Value;

/// Properties the engine reads from each feature.
pub const DEFAULT_KEEP_FIELDS: [&str; 4] = [
    "type_equipement_ou_lieu",
    "nom",
    "adresse_postale",
    "code_insee_epci",
];

/// Drop every feature property not in `keep`, in place. Geometry is untouched.
/// Returns the number of features that carried a `properties` object.
pub fn prune_properties<S: AsRef<str>>(collection: &mut Value, keep: &[S]) -> Result<usize> {
    let features = collection
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| CultureMapError::Catalog("expected a FeatureCollection with a `features` array".into()))?;

    let mut touched = 0;
    for feature in features.iter_mut() {
        if let Some(properties) = feature.get_mut("properties").and_then(Value::as_object_mut) {
            properties.retain(|key, _| keep.iter().any(|k| k.as_ref() == key));
            touched += 1;
        }
    }

    tracing::info!(features = touched, kept_fields = keep.len(), "Pruned feature properties");
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_listed_properties() {
        let mut doc = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [0.34, 46.58] },
                    "properties": {
                        "nom": "Médiathèque François-Mitterrand",
                        "type_equipement_ou_lieu": "Bibliothèque",
                        "surface": 12000,
                        "label": "BM"
                    }
                },
                { "type": "Feature", "geometry": null }
            ]
        });

        let touched = prune_properties(&mut doc, &DEFAULT_KEEP_FIELDS[..]).unwrap();
        assert_eq!(touched, 1);

        let props = &doc["features"][0]["properties"];
        assert_eq!(props.as_object().unwrap().len(), 2);
        assert_eq!(props["nom"], "Médiathèque François-Mitterrand");
        assert_eq!(doc["features"][0]["geometry"]["coordinates"][1], 46.58);
    }

    #[test]
    fn rejects_non_collections() {
        let mut doc = json!([1, 2, 3]);
        assert!(prune_properties(&mut doc, &["nom"][..]).is_err());
    }
}
