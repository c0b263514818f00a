//! REST client for the pollen catalog API

use super::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::{Family, Genus, GenusByLetter, Item, ItemQuery, Species};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// HTTP implementation of `CatalogClient`
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Client timeouts report like the fetch runner's own deadline
    fn request_error(&self, err: reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout(self.timeout.as_secs())
        } else {
            err.into()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = self.url(path);
        debug!(url = %url, ?params, "catalog GET");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Server {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| match self.request_error(e) {
                CatalogError::Network(message) => CatalogError::Decode(message),
                other => other,
            })
    }
}

/// Wire parameters of an items query
pub fn item_query_params(query: &ItemQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(id) = query.family_id {
        params.push(("family", id.to_string()));
    }
    if let Some(id) = query.genus_id {
        params.push(("genus", id.to_string()));
    }
    if let Some(id) = query.species_id {
        params.push(("species", id.to_string()));
    }
    if let Some(flag) = query.include_genus_type {
        params.push(("include_genus_type", flag.to_string()));
    }
    if let Some(flag) = query.include_species_type {
        params.push(("include_species_type", flag.to_string()));
    }
    params.push((
        "is_include_non_reference_check",
        (!query.reference_only).to_string(),
    ));
    params.push(("order", query.sort_key.to_string()));
    params.push(("max_results", query.max_results.to_string()));
    params.push(("page", query.page.to_string()));
    params
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_families(&self, catalog_id: Uuid) -> Result<Vec<Family>, CatalogError> {
        self.get("/families/", &[("category_id", catalog_id.to_string())])
            .await
    }

    async fn list_genera(
        &self,
        family_id: Uuid,
        include_type_genera: bool,
    ) -> Result<Vec<Genus>, CatalogError> {
        self.get(
            "/genera/",
            &[
                ("family_id", family_id.to_string()),
                ("include_type_genera", include_type_genera.to_string()),
            ],
        )
        .await
    }

    async fn list_genera_by_letter(
        &self,
        letter: char,
        include_type_genera: bool,
    ) -> Result<Vec<GenusByLetter>, CatalogError> {
        let path = format!("/genera/letter/{}", letter.to_ascii_uppercase());
        self.get(
            &path,
            &[("include_type_genera", include_type_genera.to_string())],
        )
        .await
    }

    async fn list_species(
        &self,
        genus_id: Uuid,
        include_type_species: bool,
    ) -> Result<Vec<Species>, CatalogError> {
        self.get(
            "/species/",
            &[
                ("genera_id", genus_id.to_string()),
                ("include_type_species", include_type_species.to_string()),
            ],
        )
        .await
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, CatalogError> {
        self.get("/items/", &item_query_params(query)).await
    }
}
