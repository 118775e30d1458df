use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use tally_core::fooddata::{
    FoodCandidate, FoodDetailResponse, FoodNutrients, MAX_SEARCH_RESULTS, SearchResponse,
    food_nutrients, search_results,
};
use tally_core::service::FoodLookupProvider;

const API_BASE: &str = "https://api.nal.usda.gov/fdc/v1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    page_size: usize,
}

/// USDA `FoodData Central` client. Owns a small runtime so the synchronous
/// [`FoodLookupProvider`] calls can drive reqwest.
pub struct FoodDataCentralClient {
    client: reqwest::Client,
    api_key: String,
    rt: tokio::runtime::Runtime,
}

impl FoodDataCentralClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "tally-cli/{} (nutrition tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            rt,
        })
    }

    pub async fn search_async(&self, query: &str) -> Result<Vec<FoodCandidate>> {
        tracing::debug!(query, "searching FoodData Central");
        let resp = self
            .client
            .post(format!("{API_BASE}/foods/search"))
            .query(&[("api_key", self.api_key.as_str())])
            .json(&SearchRequest {
                query,
                page_size: MAX_SEARCH_RESULTS,
            })
            .send()
            .await
            .context("Failed to reach FoodData Central")?
            .error_for_status()
            .context("FoodData Central search request failed")?;

        let data: SearchResponse = resp
            .json()
            .await
            .context("Failed to parse FoodData Central search response")?;
        search_results(data)
    }

    pub async fn nutrients_async(&self, fdc_id: i64) -> Result<Option<FoodNutrients>> {
        tracing::debug!(fdc_id, "fetching FoodData Central details");
        let resp = self
            .client
            .get(format!("{API_BASE}/food/{fdc_id}"))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to reach FoodData Central")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .context("FoodData Central detail request failed")?;

        let data: FoodDetailResponse = resp
            .json()
            .await
            .context("Failed to parse FoodData Central food details")?;
        Ok(food_nutrients(data))
    }
}

impl FoodLookupProvider for FoodDataCentralClient {
    fn search(&self, query: &str) -> Result<Vec<FoodCandidate>> {
        self.rt.block_on(self.search_async(query))
    }

    fn nutrients(&self, reference_id: i64) -> Result<Option<FoodNutrients>> {
        self.rt.block_on(self.nutrients_async(reference_id))
    }
}
