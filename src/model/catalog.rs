//! Catalog entities as returned by the pollen catalog API
//!
//! These are read-only views: the application never mutates them, it only
//! reflects the user's selections against them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plant family, the top of the taxonomic hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    #[serde(default, alias = "category_id")]
    pub catalog_id: Option<Uuid>,
}

/// A genus within a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genus {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub family_id: Option<Uuid>,
    /// Whether this is a type genus
    #[serde(default)]
    pub is_type: bool,
}

/// A species within a genus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub genus_id: Option<Uuid>,
    #[serde(default)]
    pub is_type: bool,
}

/// One hit of an alphabet-letter genus lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenusByLetter {
    #[serde(rename = "id")]
    pub genus_id: Uuid,
    #[serde(rename = "name")]
    pub genus_name: String,
    #[serde(default)]
    pub family_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Study {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub is_reference: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub study: Study,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub sample: Sample,
}

/// A catalog item: one imaged pollen specimen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// Thumbnail payload, base64 encoded (optionally as a `data:` URL)
    pub key_image: String,
    #[serde(default)]
    pub family_id: Option<Uuid>,
    #[serde(default)]
    pub genus_id: Option<Uuid>,
    #[serde(default)]
    pub species_id: Option<Uuid>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub slide: Option<Slide>,
    /// Physical width of one image pixel, in micrometres
    #[serde(default)]
    pub voxel_width: Option<f64>,
}

impl Item {
    /// Whether the item belongs to a reference study
    pub fn is_reference(&self) -> bool {
        self.slide
            .as_ref()
            .is_some_and(|slide| slide.sample.study.is_reference)
    }

    /// Short label for gallery cards
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserializes_nested_slide() {
        let json = r#"{
            "id": "6f1c3a52-9f0e-4c55-a1f4-2b8c0f1f9a01",
            "key_image": "iVBORw0KGgo=",
            "genus_id": "0c6f0a7e-1e3b-4e8e-9d8e-6c7a1b2c3d4e",
            "slide": {
                "description": "Slide 4",
                "remarks": null,
                "sample": {
                    "description": "Core B",
                    "location": "Lake Suigetsu",
                    "age": "12 ka",
                    "remarks": "",
                    "study": { "description": "Holocene", "location": "JP", "remarks": null, "is_reference": true }
                }
            },
            "voxel_width": 0.12
        }"#;

        let item: Item = serde_json::from_str(json).expect("item should parse");
        assert!(item.is_reference());
        assert_eq!(item.voxel_width, Some(0.12));
        assert_eq!(item.slide.unwrap().sample.age.as_deref(), Some("12 ka"));
    }

    #[test]
    fn test_item_without_slide_is_not_reference() {
        let json = r#"{ "id": "6f1c3a52-9f0e-4c55-a1f4-2b8c0f1f9a01", "key_image": "" }"#;
        let item: Item = serde_json::from_str(json).expect("item should parse");
        assert!(!item.is_reference());
        assert_eq!(item.short_id(), "6f1c3a52");
    }

    #[test]
    fn test_genus_by_letter_uses_wire_names() {
        let json = r#"[{ "id": "0c6f0a7e-1e3b-4e8e-9d8e-6c7a1b2c3d4e", "name": "Pinus", "family_name": "Pinaceae" }]"#;
        let hits: Vec<GenusByLetter> = serde_json::from_str(json).expect("hits should parse");
        assert_eq!(hits[0].genus_name, "Pinus");
        assert_eq!(hits[0].family_name, "Pinaceae");
    }

    #[test]
    fn test_family_accepts_category_alias() {
        let json = r#"{ "id": "0c6f0a7e-1e3b-4e8e-9d8e-6c7a1b2c3d4e", "name": "Betulaceae", "category_id": "6f1c3a52-9f0e-4c55-a1f4-2b8c0f1f9a01" }"#;
        let family: Family = serde_json::from_str(json).expect("family should parse");
        assert!(family.catalog_id.is_some());
    }
}
