//! Filter state - the single source of truth for what the gallery shows
//!
//! `FilterState` holds the cascading selection (family → genus → species),
//! the type/reference toggles, pagination, and the generation counter used
//! to discard responses that belong to an older state.

use uuid::Uuid;

/// Sort key sent with every items query
pub const SORT_KEY: &str = "abundance";

/// Result cap used when the max-results field is blank or invalid
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// Genus selection; `All` is distinct from "nothing chosen yet"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenusSelection {
    #[default]
    Unset,
    /// Every genus under the selected family
    All,
    Genus(Uuid),
}

/// Granularity of an items query, most specific wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Family(Uuid),
    Genus(Uuid),
    Species(Uuid),
}

/// Which toggle was flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    NonReference,
    GenusType,
    SpeciesType,
}

/// Parameters of one items-listing call. Exactly one id is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub family_id: Option<Uuid>,
    pub genus_id: Option<Uuid>,
    pub species_id: Option<Uuid>,
    pub include_genus_type: Option<bool>,
    pub include_species_type: Option<bool>,
    pub reference_only: bool,
    pub sort_key: &'static str,
    pub max_results: u32,
    pub page: u32,
}

impl ItemQuery {
    pub fn scope(&self) -> Option<QueryScope> {
        if let Some(id) = self.species_id {
            Some(QueryScope::Species(id))
        } else if let Some(id) = self.genus_id {
            Some(QueryScope::Genus(id))
        } else {
            self.family_id.map(QueryScope::Family)
        }
    }
}

/// Current selection and query parameters
#[derive(Debug, Clone)]
pub struct FilterState {
    pub family_id: Option<Uuid>,
    pub genus: GenusSelection,
    pub species_id: Option<Uuid>,
    pub include_non_reference: bool,
    pub include_genus_type: bool,
    pub include_species_type: bool,
    pub max_results: u32,
    page: u32,
    generation: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

impl FilterState {
    pub fn new(max_results: u32) -> Self {
        Self {
            family_id: None,
            genus: GenusSelection::Unset,
            species_id: None,
            include_non_reference: true,
            include_genus_type: true,
            include_species_type: true,
            max_results: if max_results == 0 {
                DEFAULT_MAX_RESULTS
            } else {
                max_results
            },
            page: 1,
            generation: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance the generation; every state-changing event calls this
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Select a family, invalidating genus and species
    pub fn select_family(&mut self, family_id: Uuid) {
        self.family_id = Some(family_id);
        self.genus = GenusSelection::Unset;
        self.species_id = None;
        self.page = 1;
    }

    /// Select a genus (or `All`), invalidating species
    pub fn select_genus(&mut self, genus: GenusSelection) {
        self.genus = genus;
        self.species_id = None;
        self.page = 1;
    }

    pub fn select_species(&mut self, species_id: Uuid) {
        self.species_id = Some(species_id);
        self.page = 1;
    }

    /// Forget the whole cascade (used when jumping in from the letter lookup)
    pub fn clear_selection(&mut self) {
        self.family_id = None;
        self.genus = GenusSelection::Unset;
        self.species_id = None;
        self.page = 1;
    }

    /// Move `delta` pages, clamped at 1. Returns whether the page changed.
    pub fn change_page(&mut self, delta: i32) -> bool {
        let next = (i64::from(self.page) + i64::from(delta)).clamp(1, i64::from(u32::MAX)) as u32;
        if next == self.page {
            return false;
        }
        self.page = next;
        true
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn set_type_filter(&mut self, which: TypeFilter, value: bool) {
        match which {
            TypeFilter::NonReference => self.include_non_reference = value,
            TypeFilter::GenusType => self.include_genus_type = value,
            TypeFilter::SpeciesType => self.include_species_type = value,
        }
    }

    pub fn type_filter(&self, which: TypeFilter) -> bool {
        match which {
            TypeFilter::NonReference => self.include_non_reference,
            TypeFilter::GenusType => self.include_genus_type,
            TypeFilter::SpeciesType => self.include_species_type,
        }
    }

    /// Most specific non-empty selection: species > genus > family
    pub fn scope(&self) -> Option<QueryScope> {
        if let Some(id) = self.species_id {
            return Some(QueryScope::Species(id));
        }
        if let GenusSelection::Genus(id) = self.genus {
            return Some(QueryScope::Genus(id));
        }
        self.family_id.map(QueryScope::Family)
    }

    /// Build the items query for the current state, if anything is selected
    pub fn item_query(&self) -> Option<ItemQuery> {
        let scope = self.scope()?;
        let mut query = ItemQuery {
            family_id: None,
            genus_id: None,
            species_id: None,
            include_genus_type: None,
            include_species_type: None,
            reference_only: !self.include_non_reference,
            sort_key: SORT_KEY,
            max_results: self.max_results,
            page: self.page,
        };
        match scope {
            QueryScope::Family(id) => {
                query.family_id = Some(id);
                query.include_genus_type = Some(self.include_genus_type);
            }
            QueryScope::Genus(id) => {
                query.genus_id = Some(id);
                query.include_species_type = Some(self.include_species_type);
            }
            QueryScope::Species(id) => {
                query.species_id = Some(id);
                query.include_species_type = Some(self.include_species_type);
            }
        }
        Some(query)
    }
}

/// Parse the max-results field, falling back to the default on bad input
pub fn parse_max_results(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => DEFAULT_MAX_RESULTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_new_state_has_no_scope() {
        let state = FilterState::default();
        assert_eq!(state.scope(), None);
        assert!(state.item_query().is_none());
        assert_eq!(state.page(), 1);
        assert_eq!(state.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_scope_prefers_most_specific() {
        let mut state = FilterState::default();
        state.select_family(id(1));
        assert_eq!(state.scope(), Some(QueryScope::Family(id(1))));

        state.select_genus(GenusSelection::Genus(id(2)));
        assert_eq!(state.scope(), Some(QueryScope::Genus(id(2))));

        state.select_species(id(3));
        assert_eq!(state.scope(), Some(QueryScope::Species(id(3))));
    }

    #[test]
    fn test_all_genera_falls_back_to_family_scope() {
        let mut state = FilterState::default();
        state.select_family(id(1));
        state.select_genus(GenusSelection::All);
        assert_eq!(state.scope(), Some(QueryScope::Family(id(1))));
    }

    #[test]
    fn test_select_family_clears_genus_and_species() {
        let mut state = FilterState::default();
        state.select_family(id(1));
        state.select_genus(GenusSelection::Genus(id(2)));
        state.select_species(id(3));

        state.select_family(id(4));
        assert_eq!(state.genus, GenusSelection::Unset);
        assert_eq!(state.species_id, None);
    }

    #[test]
    fn test_page_clamps_at_one() {
        let mut state = FilterState::default();
        assert!(!state.change_page(-1));
        assert_eq!(state.page(), 1);

        assert!(state.change_page(2));
        assert_eq!(state.page(), 3);
        assert!(state.change_page(-10));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_item_query_inverts_reference_flag() {
        let mut state = FilterState::default();
        state.select_family(id(1));
        state.set_type_filter(TypeFilter::NonReference, false);

        let query = state.item_query().unwrap();
        assert!(query.reference_only);
        assert_eq!(query.sort_key, "abundance");
        assert_eq!(query.family_id, Some(id(1)));
        assert_eq!(query.genus_id, None);
        assert_eq!(query.species_id, None);
    }

    #[test]
    fn test_item_query_carries_one_id_and_relevant_flag() {
        let mut state = FilterState::default();
        state.select_family(id(1));
        state.select_genus(GenusSelection::Genus(id(2)));
        state.set_type_filter(TypeFilter::SpeciesType, false);

        let query = state.item_query().unwrap();
        assert_eq!(query.family_id, None);
        assert_eq!(query.genus_id, Some(id(2)));
        assert_eq!(query.include_genus_type, None);
        assert_eq!(query.include_species_type, Some(false));
    }

    #[test]
    fn test_parse_max_results() {
        assert_eq!(parse_max_results("250"), 250);
        assert_eq!(parse_max_results(" 40 "), 40);
        assert_eq!(parse_max_results(""), DEFAULT_MAX_RESULTS);
        assert_eq!(parse_max_results("lots"), DEFAULT_MAX_RESULTS);
        assert_eq!(parse_max_results("0"), DEFAULT_MAX_RESULTS);
        assert_eq!(parse_max_results("-5"), DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_bump_is_monotonic() {
        let mut state = FilterState::default();
        let first = state.bump();
        let second = state.bump();
        assert!(second > first);
        assert_eq!(state.generation(), second);
    }
}
