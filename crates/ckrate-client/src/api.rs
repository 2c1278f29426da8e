//! HTTP rating API source

use crate::source::{RatingSource, SummaryQuery};
use async_trait::async_trait;
use ckrate_core::error::{CkrateError, Result};
use ckrate_core::types::{DataframeResponse, ProjectsResponse, SummaryResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info};

const DATAFRAMES_PATH: &str = "v1/storage/dataframes";
const SUMMARY_PATH: &str = "v2/summary";
const PROJECTS_PATH: &str = "v3/projects";

/// Rating source backed by the rating service's REST API
pub struct ApiSource {
    endpoint: Url,
    identity_endpoint: Option<Url>,
    client: reqwest::Client,
}

/// Parse a base URL, making sure relative joins append to its path
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| CkrateError::Config(format!("Invalid endpoint URL '{raw}': {e}")))
}

impl ApiSource {
    /// Create a source for the rating API at `endpoint`
    ///
    /// Project names are only resolved when `identity_endpoint` is given.
    pub fn new(endpoint: &str, identity_endpoint: Option<&str>) -> Result<Self> {
        let endpoint = parse_base_url(endpoint)?;
        let identity_endpoint = identity_endpoint.map(parse_base_url).transpose()?;
        info!("Using rating API at {}", endpoint);

        Ok(Self {
            endpoint,
            identity_endpoint,
            client: reqwest::Client::new(),
        })
    }

    fn build_url(base: &Url, path: &str, params: &[(&str, Option<String>)]) -> Result<Url> {
        let mut url = base
            .join(path)
            .map_err(|e| CkrateError::Config(format!("Invalid API path '{path}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                if let Some(value) = value {
                    pairs.append_pair(key, value);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn dataframes_url(&self, begin: &str, end: &str, tenant_id: Option<&str>) -> Result<Url> {
        Self::build_url(
            &self.endpoint,
            DATAFRAMES_PATH,
            &[
                ("begin", Some(begin.to_string())),
                ("end", Some(end.to_string())),
                ("tenant_id", tenant_id.map(str::to_string)),
            ],
        )
    }

    fn summary_url(&self, query: &SummaryQuery) -> Result<Url> {
        Self::build_url(
            &self.endpoint,
            SUMMARY_PATH,
            &[
                ("groupby", query.groupby_param()),
                ("filters", query.filters_param()),
                ("response_format", Some("object".to_string())),
            ],
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CkrateError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RatingSource for ApiSource {
    async fn get_dataframes(
        &self,
        begin: &str,
        end: &str,
        tenant_id: Option<&str>,
    ) -> Result<DataframeResponse> {
        let url = self.dataframes_url(begin, end, tenant_id)?;
        let response: DataframeResponse = self.get_json(url).await?;
        debug!("Fetched {} dataframes", response.dataframes.len());
        Ok(response)
    }

    async fn get_summary(&self, query: &SummaryQuery) -> Result<SummaryResponse> {
        let url = self.summary_url(query)?;
        let response: SummaryResponse = self.get_json(url).await?;
        debug!("Fetched {} summary rows", response.results.len());
        Ok(response)
    }

    async fn list_projects(&self) -> Result<HashMap<String, String>> {
        let Some(identity) = &self.identity_endpoint else {
            debug!("No identity endpoint configured, project names unavailable");
            return Ok(HashMap::new());
        };

        let url = Self::build_url(identity, PROJECTS_PATH, &[])?;
        let response: ProjectsResponse = self.get_json(url).await?;
        Ok(response
            .projects
            .into_iter()
            .map(|project| (project.id, project.name))
            .collect())
    }
}
