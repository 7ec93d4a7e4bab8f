mod config;
mod error;
mod perps;
mod types;
mod utils;

pub use config::{BinancePerpsClientConfig, DEFAULT_BASE_URL};
pub use error::{BinanceError, ERR_QUANTITY_TOO_SMALL};
pub use perps::BinancePerpsClient;
pub use types::{ExchangeInfo, NewOrderParams, OrderResponse, SymbolInfo};
pub use utils::fapi_signed_request;
