//! Port implementations backed by the subgraph and Binance clients.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use clients_binance::{BinanceError, BinancePerpsClient, NewOrderParams};
use clients_subgraph::{PositionData, SubgraphClient};

use crate::error::VenueError;
use crate::ports::{OrderAck, OrderRequest, OrderType, OrderVenue, ValuationSource};

#[async_trait]
impl ValuationSource for SubgraphClient {
    async fn fetch_positions(&self, ids: &[String]) -> Result<Vec<PositionData>> {
        self.get_positions(ids).await
    }
}

#[async_trait]
impl OrderVenue for BinancePerpsClient {
    async fn quantity_precisions(&self) -> Result<HashMap<String, u32>, VenueError> {
        Ok(BinancePerpsClient::quantity_precisions(self).await?)
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, VenueError> {
        let params = NewOrderParams {
            symbol: &order.symbol,
            side: order.side.as_str(),
            order_type: order.order_type.as_str(),
            quantity: &order.quantity,
            price: None,
            time_in_force: match order.order_type {
                OrderType::Market => None,
                OrderType::Limit => Some(order.time_in_force.as_str()),
            },
            reduce_only: order.reduce_only,
        };
        let resp = self.new_order(&params).await?;
        Ok(OrderAck {
            order_id: resp.order_id.to_string(),
            status: resp.status,
        })
    }
}

impl From<BinanceError> for VenueError {
    fn from(err: BinanceError) -> Self {
        if err.is_quantity_too_small() {
            return VenueError::QuantityTooSmall(err.to_string());
        }
        match err {
            BinanceError::Api { code, msg } => VenueError::Rejected { code, msg },
            other => VenueError::Transport(other.to_string()),
        }
    }
}
