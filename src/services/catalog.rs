//! Catalog client interface and request/response envelopes
//!
//! The controller never calls the catalog directly. It emits
//! `CatalogRequest`s stamped with its generation counter; the fetch runner
//! executes them and hands back `CatalogResponse`s carrying the same stamp.

use crate::error::CatalogError;
use crate::model::{Family, Genus, GenusByLetter, Item, ItemQuery, Species};
use async_trait::async_trait;
use uuid::Uuid;

/// Operations the browser needs from the catalog backend
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_families(&self, catalog_id: Uuid) -> Result<Vec<Family>, CatalogError>;

    async fn list_genera(
        &self,
        family_id: Uuid,
        include_type_genera: bool,
    ) -> Result<Vec<Genus>, CatalogError>;

    async fn list_genera_by_letter(
        &self,
        letter: char,
        include_type_genera: bool,
    ) -> Result<Vec<GenusByLetter>, CatalogError>;

    async fn list_species(
        &self,
        genus_id: Uuid,
        include_type_species: bool,
    ) -> Result<Vec<Species>, CatalogError>;

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError>;
}

/// Where a species list should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesTarget {
    Dropdown,
    LetterBrowser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogQuery {
    Families {
        catalog_id: Uuid,
    },
    Genera {
        family_id: Uuid,
        include_type_genera: bool,
    },
    GeneraByLetter {
        letter: char,
        include_type_genera: bool,
    },
    Species {
        genus_id: Uuid,
        include_type_species: bool,
        target: SpeciesTarget,
    },
    Items(ItemQuery),
}

impl CatalogQuery {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogQuery::Families { .. } => "families",
            CatalogQuery::Genera { .. } => "genera",
            CatalogQuery::GeneraByLetter { .. } => "genera-by-letter",
            CatalogQuery::Species { .. } => "species",
            CatalogQuery::Items(_) => "items",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Families(Vec<Family>),
    Genera(Vec<Genus>),
    GeneraByLetter(Vec<GenusByLetter>),
    Species(Vec<Species>),
    Items(Vec<Item>),
}

/// A query stamped with the generation it was issued under
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub generation: u64,
    pub query: CatalogQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogResponse {
    pub generation: u64,
    pub query: CatalogQuery,
    pub result: Result<CatalogPayload, CatalogError>,
}

/// Run one query against a client
pub async fn execute(
    client: &dyn CatalogClient,
    query: &CatalogQuery,
) -> Result<CatalogPayload, CatalogError> {
    match query {
        CatalogQuery::Families { catalog_id } => client
            .list_families(*catalog_id)
            .await
            .map(CatalogPayload::Families),
        CatalogQuery::Genera {
            family_id,
            include_type_genera,
        } => client
            .list_genera(*family_id, *include_type_genera)
            .await
            .map(CatalogPayload::Genera),
        CatalogQuery::GeneraByLetter {
            letter,
            include_type_genera,
        } => client
            .list_genera_by_letter(*letter, *include_type_genera)
            .await
            .map(CatalogPayload::GeneraByLetter),
        CatalogQuery::Species {
            genus_id,
            include_type_species,
            ..
        } => client
            .list_species(*genus_id, *include_type_species)
            .await
            .map(CatalogPayload::Species),
        CatalogQuery::Items(item_query) => client
            .list_items(item_query)
            .await
            .map(CatalogPayload::Items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryCatalog;

    #[test]
    fn test_execute_dispatches_by_query() {
        let catalog = MemoryCatalog::demo();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let query = CatalogQuery::Families {
            catalog_id: catalog.catalog_id(),
        };
        let payload = runtime.block_on(execute(&catalog, &query)).unwrap();
        match payload {
            CatalogPayload::Families(families) => assert!(!families.is_empty()),
            other => panic!("unexpected payload: {:?}", other),
        }
        assert_eq!(query.kind(), "families");
    }
}
