//! Alphabet-letter lookup state

use super::catalog::{GenusByLetter, Species};
use uuid::Uuid;

/// Species expansion state of one genus row
#[derive(Debug, Clone, PartialEq)]
pub enum SpeciesExpansion {
    Collapsed,
    Loading,
    Loaded(Vec<Species>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterGenus {
    pub genus: GenusByLetter,
    pub expansion: SpeciesExpansion,
    /// Species already fetched once; re-expanding reuses them
    pub cached: Option<Vec<Species>>,
}

/// A row of the flattened browser list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterRow {
    Genus(Uuid),
    /// The `ALL` entry under an expanded genus
    All(Uuid),
    Species { genus_id: Uuid, species_id: Uuid },
}

/// Results of one letter search
#[derive(Debug, Clone, PartialEq)]
pub struct LetterBrowser {
    pub letter: char,
    pub loading: bool,
    pub error: Option<String>,
    pub genera: Vec<LetterGenus>,
}

impl LetterBrowser {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            loading: true,
            error: None,
            genera: Vec::new(),
        }
    }

    pub fn set_results(&mut self, hits: Vec<GenusByLetter>) {
        self.loading = false;
        self.error = None;
        self.genera = hits
            .into_iter()
            .map(|genus| LetterGenus {
                genus,
                expansion: SpeciesExpansion::Collapsed,
                cached: None,
            })
            .collect();
    }

    pub fn set_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.genera.clear();
    }

    pub fn genus_mut(&mut self, genus_id: Uuid) -> Option<&mut LetterGenus> {
        self.genera.iter_mut().find(|g| g.genus.genus_id == genus_id)
    }

    pub fn genus(&self, genus_id: Uuid) -> Option<&LetterGenus> {
        self.genera.iter().find(|g| g.genus.genus_id == genus_id)
    }

    /// Flatten into display rows, expanded genera followed by `ALL` and species
    pub fn rows(&self) -> Vec<LetterRow> {
        let mut rows = Vec::new();
        for entry in &self.genera {
            let genus_id = entry.genus.genus_id;
            rows.push(LetterRow::Genus(genus_id));
            if let SpeciesExpansion::Loaded(species) = &entry.expansion {
                rows.push(LetterRow::All(genus_id));
                rows.extend(species.iter().map(|s| LetterRow::Species {
                    genus_id,
                    species_id: s.id,
                }));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(n: u128, name: &str) -> GenusByLetter {
        GenusByLetter {
            genus_id: Uuid::from_u128(n),
            genus_name: name.to_string(),
            family_name: "Pinaceae".to_string(),
        }
    }

    #[test]
    fn test_rows_include_all_entry_when_expanded() {
        let mut browser = LetterBrowser::new('P');
        browser.set_results(vec![hit(1, "Picea"), hit(2, "Pinus")]);
        assert_eq!(
            browser.rows(),
            vec![
                LetterRow::Genus(Uuid::from_u128(1)),
                LetterRow::Genus(Uuid::from_u128(2))
            ]
        );

        let species = Species {
            id: Uuid::from_u128(10),
            name: "sylvestris".into(),
            genus_id: Some(Uuid::from_u128(2)),
            is_type: false,
        };
        browser.genus_mut(Uuid::from_u128(2)).unwrap().expansion =
            SpeciesExpansion::Loaded(vec![species]);

        assert_eq!(
            browser.rows(),
            vec![
                LetterRow::Genus(Uuid::from_u128(1)),
                LetterRow::Genus(Uuid::from_u128(2)),
                LetterRow::All(Uuid::from_u128(2)),
                LetterRow::Species {
                    genus_id: Uuid::from_u128(2),
                    species_id: Uuid::from_u128(10)
                },
            ]
        );
    }

    #[test]
    fn test_failure_clears_results() {
        let mut browser = LetterBrowser::new('Q');
        browser.set_results(vec![hit(1, "Quercus")]);
        browser.set_failed("timeout".into());
        assert!(browser.genera.is_empty());
        assert_eq!(browser.error.as_deref(), Some("timeout"));
        assert!(!browser.loading);
    }
}
