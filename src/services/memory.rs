//! In-memory demo catalog
//!
//! A small seeded taxonomy with generated specimen thumbnails. Backs the
//! `--demo` mode and the tests; honors every filter the REST API takes.

use super::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::catalog::{Sample, Slide, Study};
use crate::model::{Family, Genus, GenusByLetter, Item, ItemQuery, QueryScope, Species};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use uuid::Uuid;

type SpeciesSeed = (&'static str, bool);
type GenusSeed = (&'static str, bool, &'static [SpeciesSeed]);
type FamilySeed = (&'static str, &'static [GenusSeed]);

const DEMO_TAXA: &[FamilySeed] = &[
    (
        "Betulaceae",
        &[
            ("Alnus", false, &[("glutinosa", true), ("incana", false)]),
            ("Betula", true, &[("pendula", true), ("pubescens", false)]),
            ("Corylus", false, &[("avellana", false)]),
        ],
    ),
    (
        "Pinaceae",
        &[
            ("Abies", false, &[("alba", false)]),
            ("Picea", false, &[("abies", true)]),
            ("Pinus", true, &[("sylvestris", true), ("mugo", false)]),
        ],
    ),
    (
        "Cannabaceae",
        &[
            ("Cannabis", false, &[("sativa", true)]),
            ("Celtis", true, &[("australis", false)]),
            ("Humulus", false, &[("lupulus", false)]),
            ("Pteroceltis", false, &[("tatarinowii", false)]),
        ],
    ),
    (
        "Poaceae",
        &[
            ("Phragmites", false, &[("australis", true)]),
            ("Poa", false, &[("annua", false), ("pratensis", true)]),
        ],
    ),
    (
        "Akaniaceae",
        &[
            ("Akania", false, &[("bidwillii", true)]),
            ("Bretschneidera", false, &[("sinensis", false)]),
        ],
    ),
];

const ITEMS_PER_SPECIES: usize = 3;
const THUMBNAIL_SIZE: u32 = 24;

fn seeded_id(kind: u128, n: usize) -> Uuid {
    Uuid::from_u128((kind << 96) | n as u128)
}

/// Catalog held entirely in memory
pub struct MemoryCatalog {
    catalog_id: Uuid,
    families: Vec<Family>,
    genera: Vec<Genus>,
    species: Vec<Species>,
    items: Vec<Item>,
    latency: Option<Duration>,
}

impl MemoryCatalog {
    /// Build the seeded demo catalog
    pub fn demo() -> Self {
        let catalog_id = seeded_id(0xCA7A, 0);
        let mut catalog = Self {
            catalog_id,
            families: Vec::new(),
            genera: Vec::new(),
            species: Vec::new(),
            items: Vec::new(),
            latency: None,
        };

        for (family_name, genera) in DEMO_TAXA {
            let family_id = seeded_id(1, catalog.families.len());
            catalog.families.push(Family {
                id: family_id,
                name: family_name.to_string(),
                catalog_id: Some(catalog_id),
            });

            for (genus_name, genus_is_type, species) in genera.iter() {
                let genus_id = seeded_id(2, catalog.genera.len());
                catalog.genera.push(Genus {
                    id: genus_id,
                    name: genus_name.to_string(),
                    family_id: Some(family_id),
                    is_type: *genus_is_type,
                });

                for (epithet, species_is_type) in species.iter() {
                    let species_id = seeded_id(3, catalog.species.len());
                    let name = format!("{} {}", genus_name, epithet);
                    catalog.species.push(Species {
                        id: species_id,
                        name: name.clone(),
                        genus_id: Some(genus_id),
                        is_type: *species_is_type,
                    });

                    for n in 0..ITEMS_PER_SPECIES {
                        let item_id = seeded_id(4, catalog.items.len());
                        catalog.items.push(demo_item(
                            item_id,
                            (family_id, genus_id, species_id),
                            &name,
                            n,
                        ));
                    }
                }
            }
        }

        catalog
    }

    /// Delay every call so that requests overlap
    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn catalog_id(&self) -> Uuid {
        self.catalog_id
    }

    #[cfg(test)]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    #[cfg(test)]
    pub fn genera(&self) -> &[Genus] {
        &self.genera
    }

    #[cfg(test)]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn genus(&self, id: Option<Uuid>) -> Option<&Genus> {
        let id = id?;
        self.genera.iter().find(|g| g.id == id)
    }

    fn species_entry(&self, id: Option<Uuid>) -> Option<&Species> {
        let id = id?;
        self.species.iter().find(|s| s.id == id)
    }

    /// Items matching `query`, before pagination
    pub fn matching_items(&self, query: &ItemQuery) -> Vec<&Item> {
        let Some(scope) = query.scope() else {
            return Vec::new();
        };

        self.items
            .iter()
            .filter(|item| match scope {
                QueryScope::Family(id) => item.family_id == Some(id),
                QueryScope::Genus(id) => item.genus_id == Some(id),
                QueryScope::Species(id) => item.species_id == Some(id),
            })
            .filter(|item| {
                query.include_genus_type != Some(false)
                    || !self.genus(item.genus_id).is_some_and(|g| g.is_type)
            })
            .filter(|item| {
                query.include_species_type != Some(false)
                    || !self.species_entry(item.species_id).is_some_and(|s| s.is_type)
            })
            .filter(|item| !query.reference_only || item.is_reference())
            .collect()
    }
}

fn demo_item(id: Uuid, taxon: (Uuid, Uuid, Uuid), species_name: &str, n: usize) -> Item {
    let (family_id, genus_id, species_id) = taxon;
    let is_reference = n % 2 == 0;
    let study = Study {
        description: Some(if is_reference {
            "Reference collection".to_string()
        } else {
            "Lake sediment survey".to_string()
        }),
        location: Some("Utrecht".to_string()),
        remarks: None,
        is_reference,
    };
    let sample = Sample {
        description: Some(format!("{} sample {}", species_name, n + 1)),
        location: Some("Core A".to_string()),
        age: Some(format!("{} BP", 1200 + n * 350)),
        remarks: None,
        study,
    };
    let slide = Slide {
        description: Some(format!("Slide {}", n + 1)),
        remarks: Some("glycerine mount".to_string()),
        sample,
    };

    Item {
        id,
        key_image: demo_thumbnail(species_name, n),
        family_id: Some(family_id),
        genus_id: Some(genus_id),
        species_id: Some(species_id),
        comment: Some(format!("{} specimen", species_name)),
        slide: Some(slide),
        voxel_width: Some(0.1 + 0.02 * n as f64),
    }
}

/// Draw a pollen-grain-like disc and return it as base64 PNG
fn demo_thumbnail(seed: &str, n: usize) -> String {
    let hash = seed
        .bytes()
        .fold(n as u32 * 31 + 7, |acc, b| acc.wrapping_mul(33) ^ u32::from(b));
    let base = Rgb([
        120 + (hash & 0x7f) as u8,
        100 + ((hash >> 7) & 0x7f) as u8,
        40 + ((hash >> 14) & 0x3f) as u8,
    ]);

    let center = (THUMBNAIL_SIZE as f32 - 1.0) / 2.0;
    let radius = THUMBNAIL_SIZE as f32 * (0.32 + (n % 3) as f32 * 0.05);
    let img = RgbImage::from_fn(THUMBNAIL_SIZE, THUMBNAIL_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > radius {
            Rgb([12, 12, 16])
        } else if dist > radius - 2.0 {
            Rgb([base[0] / 2, base[1] / 2, base[2] / 2])
        } else {
            base
        }
    });

    let mut bytes = Vec::new();
    match img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png) {
        Ok(()) => STANDARD.encode(&bytes),
        Err(_) => String::new(),
    }
}

#[async_trait]
impl CatalogClient for MemoryCatalog {
    async fn list_families(&self, catalog_id: Uuid) -> Result<Vec<Family>, CatalogError> {
        self.simulate_latency().await;
        if catalog_id != self.catalog_id {
            return Ok(Vec::new());
        }
        Ok(self.families.clone())
    }

    async fn list_genera(
        &self,
        family_id: Uuid,
        include_type_genera: bool,
    ) -> Result<Vec<Genus>, CatalogError> {
        self.simulate_latency().await;
        let mut genera: Vec<Genus> = self
            .genera
            .iter()
            .filter(|g| g.family_id == Some(family_id))
            .filter(|g| include_type_genera || !g.is_type)
            .cloned()
            .collect();
        genera.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genera)
    }

    async fn list_genera_by_letter(
        &self,
        letter: char,
        include_type_genera: bool,
    ) -> Result<Vec<GenusByLetter>, CatalogError> {
        self.simulate_latency().await;
        let letter = letter.to_ascii_uppercase();
        let mut hits: Vec<GenusByLetter> = self
            .genera
            .iter()
            .filter(|g| g.name.chars().next().map(|c| c.to_ascii_uppercase()) == Some(letter))
            .filter(|g| include_type_genera || !g.is_type)
            .map(|g| GenusByLetter {
                genus_id: g.id,
                genus_name: g.name.clone(),
                family_name: self
                    .families
                    .iter()
                    .find(|f| Some(f.id) == g.family_id)
                    .map(|f| f.name.clone())
                    .unwrap_or_default(),
            })
            .collect();
        hits.sort_by(|a, b| a.genus_name.cmp(&b.genus_name));
        Ok(hits)
    }

    async fn list_species(
        &self,
        genus_id: Uuid,
        include_type_species: bool,
    ) -> Result<Vec<Species>, CatalogError> {
        self.simulate_latency().await;
        let mut species: Vec<Species> = self
            .species
            .iter()
            .filter(|s| s.genus_id == Some(genus_id))
            .filter(|s| include_type_species || !s.is_type)
            .cloned()
            .collect();
        species.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(species)
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
        self.simulate_latency().await;
        let per_page = query.max_results.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * per_page;
        Ok(self
            .matching_items(query)
            .into_iter()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::filter::SORT_KEY;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn family_query(family_id: Uuid) -> ItemQuery {
        ItemQuery {
            family_id: Some(family_id),
            genus_id: None,
            species_id: None,
            include_genus_type: Some(true),
            include_species_type: None,
            reference_only: false,
            sort_key: SORT_KEY,
            max_results: 100,
            page: 1,
        }
    }

    #[test]
    fn test_demo_catalog_is_seeded() {
        let catalog = MemoryCatalog::demo();
        assert_eq!(catalog.families().len(), DEMO_TAXA.len());
        assert!(catalog.genera().len() > catalog.families().len());
        assert_eq!(catalog.items().len(), catalog.species().len() * ITEMS_PER_SPECIES);
        assert!(catalog.items().iter().all(|i| !i.key_image.is_empty()));
    }

    #[test]
    fn test_genera_filtered_by_type_flag() {
        let catalog = MemoryCatalog::demo();
        let betulaceae = catalog.families()[0].id;

        let all = block_on(catalog.list_genera(betulaceae, true)).unwrap();
        let non_type = block_on(catalog.list_genera(betulaceae, false)).unwrap();

        assert_eq!(all.len(), 3);
        assert!(non_type.iter().all(|g| !g.is_type));
        assert_eq!(non_type.len(), 2);
    }

    #[test]
    fn test_genera_by_letter_matches_prefix_and_type_flag() {
        let catalog = MemoryCatalog::demo();
        let hits = block_on(catalog.list_genera_by_letter('p', false)).unwrap();
        let names: Vec<&str> = hits.iter().map(|h| h.genus_name.as_str()).collect();

        // Pinus is a type genus and must be excluded
        assert_eq!(names, vec!["Phragmites", "Picea", "Poa", "Pteroceltis"]);
        assert!(hits.iter().all(|h| !h.family_name.is_empty()));
    }

    #[test]
    fn test_items_reference_only() {
        let catalog = MemoryCatalog::demo();
        let mut query = family_query(catalog.families()[0].id);
        query.reference_only = true;

        let items = block_on(catalog.list_items(&query)).unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().all(|i| i.is_reference()));
    }

    #[test]
    fn test_items_paginate() {
        let catalog = MemoryCatalog::demo();
        let mut query = family_query(catalog.families()[0].id);
        let total = catalog.matching_items(&query).len();
        query.max_results = 4;

        let first = block_on(catalog.list_items(&query)).unwrap();
        query.page = 2;
        let second = block_on(catalog.list_items(&query)).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4.min(total - 4));
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_items_exclude_type_genera() {
        let catalog = MemoryCatalog::demo();
        let mut query = family_query(catalog.families()[0].id);
        query.include_genus_type = Some(false);

        let items = catalog.matching_items(&query);
        let betula = catalog.genera().iter().find(|g| g.name == "Betula").unwrap();
        assert!(items.iter().all(|i| i.genus_id != Some(betula.id)));
    }

    #[test]
    fn test_unknown_catalog_has_no_families() {
        let catalog = MemoryCatalog::demo();
        let families = block_on(catalog.list_families(Uuid::nil())).unwrap();
        assert!(families.is_empty());
    }
}
