use serde::Deserialize;
use thiserror::Error;

/// Error code returned when an order's quantity is below what the symbol
/// accepts after applying its quantity precision.
pub const ERR_QUANTITY_TOO_SMALL: i64 = -4164;

/// Errors returned by the Binance futures REST client.
#[derive(Debug, Error)]
pub enum BinanceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error payload returned by the API (`{"code": ..., "msg": ...}`).
    #[error("binance api error: code={code} msg={msg}")]
    Api { code: i64, msg: String },

    /// Non-success status without a decodable error payload.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BinanceError {
    /// API error code, when the error carries one.
    pub fn code(&self) -> Option<i64> {
        match self {
            BinanceError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_quantity_too_small(&self) -> bool {
        self.code() == Some(ERR_QUANTITY_TOO_SMALL)
    }

    /// Builds an error from a non-success HTTP response body.
    pub(crate) fn from_response(status: u16, body: String) -> Self {
        #[derive(Deserialize)]
        struct ApiErrorBody {
            code: i64,
            msg: String,
        }

        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => BinanceError::Api {
                code: err.code,
                msg: err.msg,
            },
            Err(_) => BinanceError::Status { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_error_payload() {
        let err = BinanceError::from_response(
            400,
            r#"{"code":-4164,"msg":"Order's notional must be no smaller than 5.0"}"#.to_string(),
        );
        assert_eq!(err.code(), Some(ERR_QUANTITY_TOO_SMALL));
        assert!(err.is_quantity_too_small());
        assert!(err.to_string().contains("code=-4164"));
    }

    #[test]
    fn keeps_raw_body_when_payload_is_not_json() {
        let err = BinanceError::from_response(502, "Bad Gateway".to_string());
        assert!(matches!(err, BinanceError::Status { status: 502, .. }));
        assert!(!err.is_quantity_too_small());
    }
}
