use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, error};

use crate::config::BinancePerpsClientConfig;
use crate::error::BinanceError;
use crate::types::{ExchangeInfo, NewOrderParams, OrderResponse};
use crate::utils;

/// Client for Binance perpetual futures (USDT-M) API.
pub struct BinancePerpsClient {
    client: Arc<reqwest::Client>,
    api_key: String,
    api_secret: String,
    base_url: String,
}

impl BinancePerpsClient {
    pub fn new(client: Arc<reqwest::Client>, config: BinancePerpsClientConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            api_secret: config.api_secret,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches trading rules for every listed symbol. Public endpoint, unsigned.
    pub async fn exchange_info(&self) -> Result<ExchangeInfo, BinanceError> {
        let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let body = utils::read_body(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Quantity precision keyed by symbol, e.g. `"ETHUSDT" -> 3`.
    pub async fn quantity_precisions(&self) -> Result<HashMap<String, u32>, BinanceError> {
        let info = self.exchange_info().await?;
        Ok(info
            .symbols
            .into_iter()
            .map(|s| (s.symbol, s.quantity_precision))
            .collect())
    }

    /// Places a new order via `POST /fapi/v1/order`.
    ///
    /// `timeInForce` and `price` are only sent for non-market orders;
    /// `reduceOnly` is sent whenever it is set.
    pub async fn new_order(&self, order: &NewOrderParams<'_>) -> Result<OrderResponse, BinanceError> {
        let params = order_params(order);
        debug!(symbol = order.symbol, side = order.side, quantity = order.quantity, "placing futures order");

        let body = utils::fapi_signed_request(
            &self.client,
            &self.base_url,
            "/fapi/v1/order",
            Method::POST,
            &self.api_key,
            &self.api_secret,
            params,
        )
        .await
        .inspect_err(|err| {
            error!(
                symbol = order.symbol,
                quantity = order.quantity,
                side = order.side,
                order_type = order.order_type,
                reduce_only = order.reduce_only,
                error = %err,
                "failed to create futures order"
            )
        })?;

        Ok(serde_json::from_str(&body)?)
    }
}

fn order_params<'a>(order: &NewOrderParams<'a>) -> Vec<(&'a str, String)> {
    let mut params: Vec<(&str, String)> = vec![
        ("symbol", order.symbol.to_string()),
        ("side", order.side.to_string()),
        ("type", order.order_type.to_string()),
        ("quantity", order.quantity.to_string()),
    ];
    if order.order_type != "MARKET" {
        if let Some(price) = order.price {
            params.push(("price", price.to_string()));
        }
        if let Some(tif) = order.time_in_force {
            params.push(("timeInForce", tif.to_string()));
        }
    }
    if order.reduce_only {
        params.push(("reduceOnly", "true".to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market_sell<'a>() -> NewOrderParams<'a> {
        NewOrderParams {
            symbol: "ETHUSDT",
            side: "SELL",
            order_type: "MARKET",
            quantity: "0.006",
            price: None,
            time_in_force: Some("GTC"),
            reduce_only: false,
        }
    }

    #[test]
    fn market_orders_skip_time_in_force() {
        let params = order_params(&market_sell());
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["symbol", "side", "type", "quantity"]);
    }

    #[test]
    fn reduce_only_is_sent_for_market_buys() {
        let order = NewOrderParams {
            side: "BUY",
            reduce_only: true,
            ..market_sell()
        };
        let params = order_params(&order);
        assert!(params.contains(&("reduceOnly", "true".to_string())));
    }

    #[test]
    fn limit_orders_carry_price_and_time_in_force() {
        let order = NewOrderParams {
            order_type: "LIMIT",
            price: Some("2500.5"),
            ..market_sell()
        };
        let params = order_params(&order);
        assert!(params.contains(&("price", "2500.5".to_string())));
        assert!(params.contains(&("timeInForce", "GTC".to_string())));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BinancePerpsClient::new(
            Arc::new(reqwest::Client::new()),
            BinancePerpsClientConfig {
                api_key: "k".to_string(),
                api_secret: "s".to_string(),
                base_url: "https://fapi.binance.com/".to_string(),
            },
        );
        assert_eq!(client.base_url, "https://fapi.binance.com");
    }
}
