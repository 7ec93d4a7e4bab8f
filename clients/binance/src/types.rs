use serde::Deserialize;

/// Subset of `GET /fapi/v1/exchangeInfo` used for order sizing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

/// Trading rules for a single futures symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub base_asset: String,
    #[serde(default)]
    pub quote_asset: String,
    /// Number of fractional digits accepted in an order quantity.
    pub quantity_precision: u32,
    #[serde(default)]
    pub price_precision: u32,
}

/// Parameters for `POST /fapi/v1/order`.
#[derive(Debug, Clone)]
pub struct NewOrderParams<'a> {
    pub symbol: &'a str,
    /// "BUY" or "SELL"
    pub side: &'a str,
    /// "MARKET", "LIMIT", ...
    pub order_type: &'a str,
    pub quantity: &'a str,
    /// Limit price; ignored for market orders.
    pub price: Option<&'a str>,
    /// "GTC", "IOC" or "FOK"; only sent with a price.
    pub time_in_force: Option<&'a str>,
    pub reduce_only: bool,
}

/// Acknowledgement returned by `POST /fapi/v1/order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub symbol: String,
    pub status: String,
    #[serde(default)]
    pub client_order_id: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub orig_qty: String,
    #[serde(default)]
    pub executed_qty: String,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub update_time: i64,
}
