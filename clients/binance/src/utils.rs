use hmac::{Hmac, Mac};
use reqwest::Method;
use sha2::Sha256;
use url::form_urlencoded;

use crate::error::BinanceError;

type HmacSha256 = Hmac<Sha256>;

const RECV_WINDOW_MS: &str = "5000";

pub(crate) fn binance_fapi_timestamp_ms() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

/// Encode params as query string (URL-encoded). The signature must be computed over this string.
pub(crate) fn build_query(params: &[(&str, String)]) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (k, v) in params {
        ser.append_pair(k, v);
    }
    ser.finish()
}

/// HMAC-SHA256(secret, query) -> lowercase hex.
fn sign_query(api_secret: &str, query: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(api_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Append signature to params and return the full query string.
pub(crate) fn sign_params(api_secret: &str, params: &[(&str, String)]) -> String {
    let query = build_query(params);
    let sig = sign_query(api_secret, &query);
    format!("{}&signature={}", query, sig)
}

/// Reads the body and maps non-success statuses onto [`BinanceError`].
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, BinanceError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(BinanceError::from_response(status.as_u16(), body));
    }
    Ok(body)
}

/// Signed request for USD-M futures (fapi).
///
/// - base_url: e.g. "https://fapi.binance.com"
/// - path: e.g. "/fapi/v2/account" or "/fapi/v1/order"
/// - params: without signature; timestamp/recvWindow are added if missing.
///
/// GET sends the signed query in the URL; other methods send it as an
/// application/x-www-form-urlencoded body. Non-success responses come back as
/// [`BinanceError::Api`] when the body carries an error code.
pub async fn fapi_signed_request(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
    method: Method,
    api_key: &str,
    api_secret: &str,
    mut params: Vec<(&str, String)>,
) -> Result<String, BinanceError> {
    if !params.iter().any(|(k, _)| *k == "timestamp") {
        params.push(("timestamp", binance_fapi_timestamp_ms()));
    }
    if !params.iter().any(|(k, _)| *k == "recvWindow") {
        params.push(("recvWindow", RECV_WINDOW_MS.to_string()));
    }

    let signed_query = sign_params(api_secret, &params);

    let url = format!("{}{}", base_url, path);
    let req = if method == Method::GET {
        client.get(format!("{}?{}", url, signed_query))
    } else {
        client
            .request(method, url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(signed_query)
    };

    let resp = req.header("X-MBX-APIKEY", api_key).send().await?;
    read_body(resp).await
}
