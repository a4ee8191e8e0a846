//! Ranking sources
//!
//! The source of truth for team standings. The hosted backend exposes the
//! ranking view through a PostgREST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::TeamRanking;

/// Anything that can produce the current ranking for a zone.
///
/// `zone` is `None` for the contest-wide ranking.
#[async_trait]
pub trait RankingSource: Send + Sync {
    async fn fetch_ranking(&self, zone: Option<&str>) -> Result<Vec<TeamRanking>>;
}

/// Reads rankings from the backend's REST interface.
#[derive(Debug, Clone)]
pub struct RestRankingSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestRankingSource {
    /// Creates a source for `{base_url}/rest/v1/{table}`.
    ///
    /// `request_timeout` bounds each HTTP request at the transport level.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.backend_url.clone(),
            config.backend_api_key.clone(),
            config.ranking_table.clone(),
            config.fetch_timeout(),
        )
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    /// Query parameters: highest points first, filtered by zone when given.
    pub fn query(zone: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("select", "team,points,zone".to_string()),
            ("order", "points.desc".to_string()),
        ];
        if let Some(zone) = zone {
            params.push(("zone", format!("eq.{}", zone)));
        }
        params
    }
}

#[async_trait]
impl RankingSource for RestRankingSource {
    #[instrument(skip(self))]
    async fn fetch_ranking(&self, zone: Option<&str>) -> Result<Vec<TeamRanking>> {
        let rows = self
            .client
            .get(self.endpoint())
            .query(&Self::query(zone))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TeamRanking>>()
            .await?;
        Ok(rows)
    }
}
