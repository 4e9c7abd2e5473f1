use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope for `list.php?i=list`; TheMealDB reuses the `meals` field name
/// for the ingredient catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientResponse {
    pub meals: Option<Vec<IngredientInfo>>,
}

/// An entry from TheMealDB's ingredient catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientInfo {
    #[serde(rename = "idIngredient")]
    pub id: Option<String>,
    #[serde(rename = "strIngredient")]
    pub name: Option<String>,
    #[serde(rename = "strDescription")]
    pub description: Option<String>,
    #[serde(rename = "strThumb")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strType")]
    pub kind: Option<String>,
}

impl fmt::Display for IngredientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or("(unnamed)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_catalog_entry() {
        let json = r#"{
            "idIngredient": "1",
            "strIngredient": "Chicken",
            "strDescription": "The chicken is a type of domesticated fowl.",
            "strType": null
        }"#;
        let info: IngredientInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id.as_deref(), Some("1"));
        assert_eq!(info.name.as_deref(), Some("Chicken"));
        assert!(info.kind.is_none());
        assert_eq!(format!("{}", info), "Chicken");
    }

    #[test]
    fn test_catalog_envelope() {
        let json = r#"{"meals": [{"idIngredient": "2", "strIngredient": "Salmon"}]}"#;
        let response: IngredientResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.meals.unwrap().len(), 1);
    }
}
