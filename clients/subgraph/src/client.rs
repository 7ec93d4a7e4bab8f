use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::types::{GraphQLResponse, PositionData, PositionsData};

/// KyberSwap Elastic subgraph on Polygon.
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/kybernetwork/kyberswap-elastic-matic";

/// Client for querying position data from a GraphQL subgraph.
pub struct SubgraphClient {
    client: Arc<reqwest::Client>,
    base_url: String,
}

#[derive(Serialize)]
struct QueryRequest {
    query: String,
}

impl SubgraphClient {
    pub fn new(client: Arc<reqwest::Client>, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetches the positions with the given IDs together with their pool state.
    ///
    /// Positions unknown to the subgraph are simply absent from the result.
    pub async fn get_positions(&self, ids: &[String]) -> Result<Vec<PositionData>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(ids = ?ids, "querying positions");
        let body = QueryRequest {
            query: positions_query(ids),
        };
        let resp: GraphQLResponse<PositionsData> = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .context("failed to query positions")?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode positions response")?;

        into_positions(resp)
    }
}

fn into_positions(resp: GraphQLResponse<PositionsData>) -> Result<Vec<PositionData>> {
    if let Some(err) = resp.errors.first() {
        return Err(anyhow!("subgraph returned an error: {}", err.message));
    }
    resp.data
        .map(|data| data.positions)
        .ok_or_else(|| anyhow!("subgraph response carries no data"))
}

fn positions_query(ids: &[String]) -> String {
    let ids = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('"', "")))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"{{
  positions(where: {{id_in: [{ids}]}}) {{
    id
    liquidity
    pool {{
      sqrtPrice
      tick
      token0 {{
        symbol
        decimals
      }}
      token1 {{
        symbol
        decimals
      }}
    }}
    tickLower {{
      tickIdx
    }}
    tickUpper {{
      tickIdx
    }}
  }}
}}"#
    )
}
