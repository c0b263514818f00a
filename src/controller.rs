//! Filter-cascade controller
//!
//! Owns the filter state and everything derived from it: dropdown contents,
//! the current gallery items, the detail view and the letter browser. It is
//! the only place that decides what to query.
//!
//! The controller performs no I/O. Each operation returns the requests it
//! wants issued, stamped with the current generation, and `apply_response`
//! folds the results back in. A response is applied only if it carries the
//! generation of the latest request issued for the same target; anything
//! older was overtaken by a later state change and is dropped.

use crate::error::{CatalogError, ControllerError};
use crate::model::filter::parse_max_results;
use crate::model::{
    DetailView, Dropdown, FilterState, GenusSelection, Item, LetterBrowser, OptionValue,
    PanelVisibility, SpeciesExpansion, TypeFilter,
};
use crate::services::{CatalogPayload, CatalogQuery, CatalogRequest, CatalogResponse, SpeciesTarget};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a response feeds into; one outstanding request per target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Target {
    Families,
    Genera,
    Species,
    Items,
    Letter,
    LetterSpecies(Uuid),
}

impl Target {
    fn of(query: &CatalogQuery) -> Self {
        match query {
            CatalogQuery::Families { .. } => Target::Families,
            CatalogQuery::Genera { .. } => Target::Genera,
            CatalogQuery::GeneraByLetter { .. } => Target::Letter,
            CatalogQuery::Species {
                target: SpeciesTarget::Dropdown,
                ..
            } => Target::Species,
            CatalogQuery::Species {
                genus_id,
                target: SpeciesTarget::LetterBrowser,
                ..
            } => Target::LetterSpecies(*genus_id),
            CatalogQuery::Items(_) => Target::Items,
        }
    }
}

/// Status line message
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
    /// Request target that raised it; `None` for thumbnail selection
    source: Option<Target>,
}

impl Notice {
    fn info(source: Option<Target>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            at: Local::now(),
            source,
        }
    }

    fn error(source: Option<Target>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            at: Local::now(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryStatus {
    /// No items query has completed yet
    NoSelection,
    Loading,
    NoResults,
    Showing(usize),
}

pub struct FilterController {
    catalog_id: Uuid,
    image_base_url: String,
    state: FilterState,
    families: Dropdown,
    genera: Dropdown,
    species: Dropdown,
    items: Vec<Item>,
    items_loading: bool,
    items_loaded: bool,
    detail: Option<DetailView>,
    letter_browser: Option<LetterBrowser>,
    panels: PanelVisibility,
    notice: Option<Notice>,
    last_refreshed: Option<DateTime<Local>>,
    issued: HashMap<Target, u64>,
}

impl FilterController {
    pub fn new(catalog_id: Uuid, image_base_url: &str, max_results: u32) -> Self {
        Self {
            catalog_id,
            image_base_url: image_base_url.to_string(),
            state: FilterState::new(max_results),
            families: Dropdown::new("Family"),
            genera: Dropdown::new("Genus"),
            species: Dropdown::new("Species"),
            items: Vec::new(),
            items_loading: false,
            items_loaded: false,
            detail: None,
            letter_browser: None,
            panels: PanelVisibility::default(),
            notice: None,
            last_refreshed: None,
            issued: HashMap::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn families(&self) -> &Dropdown {
        &self.families
    }

    pub fn genera(&self) -> &Dropdown {
        &self.genera
    }

    pub fn species(&self) -> &Dropdown {
        &self.species
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn letter_browser(&self) -> Option<&LetterBrowser> {
        self.letter_browser.as_ref()
    }

    pub fn panels(&self) -> PanelVisibility {
        self.panels
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Drop the notice if `source` raised it
    fn clear_notice_from(&mut self, source: Option<Target>) {
        if self.notice.as_ref().is_some_and(|n| n.source == source) {
            self.notice = None;
        }
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn gallery_status(&self) -> GalleryStatus {
        if self.items_loading {
            GalleryStatus::Loading
        } else if !self.items_loaded {
            GalleryStatus::NoSelection
        } else if self.items.is_empty() {
            GalleryStatus::NoResults
        } else {
            GalleryStatus::Showing(self.items.len())
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request bookkeeping
    // ─────────────────────────────────────────────────────────────────────────

    fn issue(&mut self, query: CatalogQuery) -> CatalogRequest {
        let generation = self.state.generation();
        self.issued.insert(Target::of(&query), generation);
        CatalogRequest { generation, query }
    }

    /// Drop whatever is outstanding for `target`
    fn forget(&mut self, target: Target) {
        self.issued.remove(&target);
    }

    fn forget_letter_species(&mut self) {
        self.issued
            .retain(|target, _| !matches!(target, Target::LetterSpecies(_)));
    }

    /// The items query for the current state, if anything is selected
    fn items_request(&mut self) -> Option<CatalogRequest> {
        match self.state.item_query() {
            Some(query) => {
                self.items_loading = true;
                Some(self.issue(CatalogQuery::Items(query)))
            }
            None => {
                self.items_loading = false;
                self.forget(Target::Items);
                None
            }
        }
    }

    fn genera_request(&mut self, family_id: Uuid) -> CatalogRequest {
        self.genera.loading = true;
        self.issue(CatalogQuery::Genera {
            family_id,
            include_type_genera: self.state.include_genus_type,
        })
    }

    fn letter_request(&mut self, letter: char) -> CatalogRequest {
        self.letter_browser = Some(LetterBrowser::new(letter));
        self.forget_letter_species();
        self.issue(CatalogQuery::GeneraByLetter {
            letter,
            include_type_genera: self.state.include_genus_type,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the family list and reset the cascade
    pub fn initialize(&mut self) -> Vec<CatalogRequest> {
        let generation = self.state.bump();
        info!(generation, catalog_id = %self.catalog_id, "loading families");

        self.state.clear_selection();
        self.families.clear();
        self.families.loading = true;
        self.genera.clear();
        self.species.clear();
        self.items.clear();
        self.items_loading = false;
        self.items_loaded = false;
        self.detail = None;
        self.forget(Target::Genera);
        self.forget(Target::Species);
        self.forget(Target::Items);

        vec![self.issue(CatalogQuery::Families {
            catalog_id: self.catalog_id,
        })]
    }

    pub fn on_family_changed(&mut self, value: OptionValue) -> Vec<CatalogRequest> {
        let OptionValue::Id(family_id) = value else {
            return Vec::new();
        };

        self.families.select_value(value);
        self.state.select_family(family_id);
        let generation = self.state.bump();
        debug!(generation, %family_id, "family selected");

        self.genera.clear();
        self.species.clear();
        self.forget(Target::Species);

        let mut requests = vec![self.genera_request(family_id)];
        requests.extend(self.items_request());
        requests
    }

    pub fn on_genus_changed(&mut self, value: OptionValue) -> Vec<CatalogRequest> {
        let genus = match value {
            OptionValue::Placeholder => return Vec::new(),
            OptionValue::All => GenusSelection::All,
            OptionValue::Id(id) => GenusSelection::Genus(id),
        };

        self.genera.select_value(value);
        self.state.select_genus(genus);
        let generation = self.state.bump();
        debug!(generation, genus = %value, "genus selected");

        self.species.clear();
        self.forget(Target::Species);

        let mut requests = Vec::new();
        if let GenusSelection::Genus(genus_id) = genus {
            self.species.loading = true;
            requests.push(self.issue(CatalogQuery::Species {
                genus_id,
                include_type_species: self.state.include_species_type,
                target: SpeciesTarget::Dropdown,
            }));
        }
        requests.extend(self.items_request());
        requests
    }

    pub fn on_species_changed(&mut self, value: OptionValue) -> Vec<CatalogRequest> {
        let OptionValue::Id(species_id) = value else {
            return Vec::new();
        };

        self.species.select_value(value);
        self.state.select_species(species_id);
        let generation = self.state.bump();
        debug!(generation, %species_id, "species selected");

        self.items_request().into_iter().collect()
    }

    pub fn on_type_filter_toggled(&mut self, which: TypeFilter, value: bool) -> Vec<CatalogRequest> {
        if self.state.type_filter(which) == value {
            return Vec::new();
        }

        self.state.set_type_filter(which, value);
        self.state.reset_page();
        let generation = self.state.bump();
        debug!(generation, ?which, value, "type filter toggled");

        let mut requests = Vec::new();
        if which == TypeFilter::GenusType {
            if let Some(family_id) = self.state.family_id {
                requests.push(self.genera_request(family_id));
            }
            if let Some(letter) = self.letter_browser.as_ref().map(|b| b.letter) {
                requests.push(self.letter_request(letter));
            }
        }
        requests.extend(self.items_request());
        requests
    }

    /// Move `delta` pages; a clamped move is a no-op
    pub fn on_page_changed(&mut self, delta: i32) -> Vec<CatalogRequest> {
        if self.state.scope().is_none() || !self.state.change_page(delta) {
            return Vec::new();
        }
        let generation = self.state.bump();
        debug!(generation, page = self.state.page(), "page changed");

        self.items_request().into_iter().collect()
    }

    pub fn on_max_results_entered(&mut self, input: &str) -> Vec<CatalogRequest> {
        self.state.max_results = parse_max_results(input);
        self.state.reset_page();
        let generation = self.state.bump();
        debug!(generation, max_results = self.state.max_results, "max results changed");

        self.items_request().into_iter().collect()
    }

    /// Re-issue the items query for the current state
    pub fn refresh_gallery(&mut self) -> Vec<CatalogRequest> {
        self.state.bump();
        self.items_request().into_iter().collect()
    }

    pub fn on_thumbnail_selected(&mut self, item_id: Uuid) -> Result<(), ControllerError> {
        let Some(item) = self.items.iter().find(|item| item.id == item_id) else {
            let err = ControllerError::ItemUnavailable(item_id);
            warn!(%item_id, "selected item is not in the current page");
            self.notice = Some(Notice::error(None, err.to_string()));
            return Err(err);
        };

        self.detail = Some(DetailView::from_item(item, &self.image_base_url));
        self.clear_notice_from(None);
        Ok(())
    }

    /// Search genera by first letter; hides the gallery and viewer
    pub fn on_alphabet_letter_selected(&mut self, letter: char) -> Vec<CatalogRequest> {
        if !letter.is_ascii_alphabetic() {
            return Vec::new();
        }
        let letter = letter.to_ascii_uppercase();
        let generation = self.state.bump();
        debug!(generation, %letter, "letter search");

        self.panels = PanelVisibility {
            gallery: false,
            viewer: false,
        };
        vec![self.letter_request(letter)]
    }

    /// Toggle a genus row of the letter browser, fetching its species once
    pub fn on_letter_genus_expanded(&mut self, genus_id: Uuid) -> Vec<CatalogRequest> {
        let include_type_species = self.state.include_species_type;
        let Some(entry) = self
            .letter_browser
            .as_mut()
            .and_then(|browser| browser.genus_mut(genus_id))
        else {
            return Vec::new();
        };

        if matches!(entry.expansion, SpeciesExpansion::Loaded(_)) {
            entry.expansion = SpeciesExpansion::Collapsed;
            return Vec::new();
        }
        if matches!(entry.expansion, SpeciesExpansion::Loading) {
            return Vec::new();
        }
        if let Some(cached) = entry.cached.clone() {
            entry.expansion = SpeciesExpansion::Loaded(cached);
            return Vec::new();
        }

        entry.expansion = SpeciesExpansion::Loading;
        vec![self.issue(CatalogQuery::Species {
            genus_id,
            include_type_species,
            target: SpeciesTarget::LetterBrowser,
        })]
    }

    /// `ALL` under a letter-browser genus: show every item of that genus
    pub fn on_letter_all_selected(&mut self, genus_id: Uuid) -> Vec<CatalogRequest> {
        self.jump_from_letter(genus_id, None)
    }

    pub fn on_letter_species_selected(
        &mut self,
        genus_id: Uuid,
        species_id: Uuid,
    ) -> Vec<CatalogRequest> {
        self.jump_from_letter(genus_id, Some(species_id))
    }

    /// Mirror a letter-browser pick into the dropdowns and query the gallery
    fn jump_from_letter(&mut self, genus_id: Uuid, species_id: Option<Uuid>) -> Vec<CatalogRequest> {
        let Some(entry) = self
            .letter_browser
            .as_ref()
            .and_then(|browser| browser.genus(genus_id))
        else {
            return Vec::new();
        };
        let genus_name = entry.genus.genus_name.clone();
        let species_list = match &entry.expansion {
            SpeciesExpansion::Loaded(species) => species.clone(),
            _ => entry.cached.clone().unwrap_or_default(),
        };
        if let Some(id) = species_id {
            if !species_list.iter().any(|s| s.id == id) {
                return Vec::new();
            }
        }

        self.state.clear_selection();
        self.state.select_genus(GenusSelection::Genus(genus_id));
        if let Some(id) = species_id {
            self.state.select_species(id);
        }
        let generation = self.state.bump();
        info!(generation, genus = %genus_name, "jumping to genus from letter lookup");

        self.families.select_value(OptionValue::Placeholder);
        self.genera.populate([(genus_id, genus_name)], false);
        self.genera.select_value(OptionValue::Id(genus_id));
        self.species
            .populate(species_list.into_iter().map(|s| (s.id, s.name)), false);
        if let Some(id) = species_id {
            self.species.select_value(OptionValue::Id(id));
        }
        self.forget(Target::Genera);
        self.forget(Target::Species);

        self.close_letter_browser();
        self.items_request().into_iter().collect()
    }

    /// Hide the letter browser and bring the gallery and viewer back
    pub fn close_letter_browser(&mut self) {
        self.letter_browser = None;
        self.panels = PanelVisibility::default();
        self.forget(Target::Letter);
        self.forget_letter_species();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Responses
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold a response into the state. Returns any follow-up requests.
    pub fn apply_response(&mut self, response: CatalogResponse) -> Vec<CatalogRequest> {
        let target = Target::of(&response.query);
        if self.issued.get(&target) != Some(&response.generation) {
            debug!(
                generation = response.generation,
                current = self.state.generation(),
                kind = response.query.kind(),
                "discarding stale response"
            );
            return Vec::new();
        }
        self.forget(target);

        match response.result {
            Ok(payload) => self.apply_payload(target, payload),
            Err(err) => {
                self.apply_failure(target, &response.query, err);
                Vec::new()
            }
        }
    }

    fn apply_payload(&mut self, target: Target, payload: CatalogPayload) -> Vec<CatalogRequest> {
        self.clear_notice_from(Some(target));
        match (target, payload) {
            (Target::Families, CatalogPayload::Families(families)) => {
                info!(count = families.len(), "families loaded");
                self.families
                    .populate(families.into_iter().map(|f| (f.id, f.name)), false);
                if let Some(id) = self.state.family_id {
                    self.families.select_value(OptionValue::Id(id));
                }
            }
            (Target::Genera, CatalogPayload::Genera(genera)) => {
                debug!(count = genera.len(), "genera loaded");
                self.genera
                    .populate(genera.into_iter().map(|g| (g.id, g.name)), true);
                return self.restore_genus_selection();
            }
            (Target::Species, CatalogPayload::Species(species)) => {
                debug!(count = species.len(), "species loaded");
                self.species
                    .populate(species.into_iter().map(|s| (s.id, s.name)), false);
                if let Some(id) = self.state.species_id {
                    self.species.select_value(OptionValue::Id(id));
                }
            }
            (Target::Letter, CatalogPayload::GeneraByLetter(hits)) => {
                if let Some(browser) = self.letter_browser.as_mut() {
                    debug!(letter = %browser.letter, count = hits.len(), "letter search loaded");
                    browser.set_results(hits);
                }
            }
            (Target::LetterSpecies(genus_id), CatalogPayload::Species(species)) => {
                if let Some(entry) = self
                    .letter_browser
                    .as_mut()
                    .and_then(|browser| browser.genus_mut(genus_id))
                {
                    entry.cached = Some(species.clone());
                    entry.expansion = SpeciesExpansion::Loaded(species);
                }
            }
            (Target::Items, CatalogPayload::Items(items)) => {
                info!(count = items.len(), page = self.state.page(), "items loaded");
                self.items = items;
                self.items_loading = false;
                self.items_loaded = true;
                self.last_refreshed = Some(Local::now());
                // The gallery was rebuilt; an old reselect hint no longer applies
                self.clear_notice_from(None);
                if self.items.is_empty() {
                    self.notice = Some(Notice::info(
                        Some(Target::Items),
                        "No results for the current filters",
                    ));
                }
            }
            (target, payload) => {
                warn!(?target, ?payload, "response payload does not match its query");
            }
        }
        Vec::new()
    }

    /// Re-select the chosen genus after the genus list was refetched
    fn restore_genus_selection(&mut self) -> Vec<CatalogRequest> {
        match self.state.genus {
            GenusSelection::Unset => Vec::new(),
            GenusSelection::All => {
                self.genera.select_value(OptionValue::All);
                Vec::new()
            }
            GenusSelection::Genus(id) => {
                if self.genera.select_value(OptionValue::Id(id)) {
                    return Vec::new();
                }
                info!(genus_id = %id, "selected genus no longer listed, widening to family");
                self.state.select_genus(GenusSelection::Unset);
                self.state.bump();
                self.species.clear();
                self.forget(Target::Species);
                self.items_request().into_iter().collect()
            }
        }
    }

    fn apply_failure(&mut self, target: Target, query: &CatalogQuery, err: CatalogError) {
        warn!(kind = query.kind(), error = %err, "catalog request failed");
        let message = err.to_string();

        match target {
            Target::Families => {
                self.families.clear();
                self.notice = Some(Notice::error(
                    Some(Target::Families),
                    format!("Could not load families: {}", message),
                ));
            }
            Target::Genera => {
                self.genera.clear();
                self.notice = Some(Notice::error(
                    Some(Target::Genera),
                    format!("Could not load genera: {}", message),
                ));
            }
            Target::Species => {
                self.species.clear();
                self.notice = Some(Notice::error(
                    Some(Target::Species),
                    format!("Could not load species: {}", message),
                ));
            }
            Target::Letter => {
                if let Some(browser) = self.letter_browser.as_mut() {
                    browser.set_failed(message);
                }
            }
            Target::LetterSpecies(genus_id) => {
                if let Some(entry) = self
                    .letter_browser
                    .as_mut()
                    .and_then(|browser| browser.genus_mut(genus_id))
                {
                    entry.expansion = SpeciesExpansion::Failed(message);
                }
            }
            Target::Items => {
                self.items_loading = false;
                self.notice = Some(Notice::error(
                    Some(Target::Items),
                    format!("Could not load items: {}", message),
                ));
            }
        }
    }
}
