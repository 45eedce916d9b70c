//! HTTP sources backed by the public BrasilAPI service.
//!
//! Uses the blocking `reqwest` client; every request carries the adapter
//! timeout so a slow upstream cannot stall a validation call.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::{AdapterError, PostalInfo, PostalSource, TaxpayerSource, TaxpayerStatus};

pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br/api";

/// Client for the CNPJ and CEP endpoints.
#[derive(Debug, Clone)]
pub struct BrasilApi {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CnpjResponse {
    cnpj: String,
    razao_social: String,
    uf: Option<String>,
    descricao_situacao_cadastral: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CepResponse {
    cep: String,
    state: String,
    city: String,
}

impl BrasilApi {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<Option<T>, AdapterError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .send()
            .map_err(|e| classify(e, timeout))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .map(Some)
                .map_err(|e| AdapterError::InvalidResponse(e.to_string())),
            status => Err(AdapterError::Unavailable(format!("{url} returned {status}"))),
        }
    }
}

impl Default for BrasilApi {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> AdapterError {
    if err.is_timeout() {
        AdapterError::Timeout(timeout)
    } else {
        AdapterError::Unavailable(err.to_string())
    }
}

impl TaxpayerSource for BrasilApi {
    fn status(
        &self,
        tax_id: &str,
        timeout: Duration,
    ) -> Result<Option<TaxpayerStatus>, AdapterError> {
        let body: Option<CnpjResponse> = self.get(&format!("cnpj/v1/{tax_id}"), timeout)?;
        Ok(body.map(|b| TaxpayerStatus {
            tax_id: b.cnpj,
            active: b
                .descricao_situacao_cadastral
                .is_some_and(|s| s.eq_ignore_ascii_case("ATIVA")),
            name: b.razao_social,
            jurisdiction: b.uf,
        }))
    }
}

impl PostalSource for BrasilApi {
    fn resolve(
        &self,
        postal_code: &str,
        timeout: Duration,
    ) -> Result<Option<PostalInfo>, AdapterError> {
        let body: Option<CepResponse> = self.get(&format!("cep/v1/{postal_code}"), timeout)?;
        Ok(body.map(|b| PostalInfo {
            postal_code: b.cep.replace('-', ""),
            municipality: b.city,
            jurisdiction: b.state,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnpj_payload_shape() {
        let body: CnpjResponse = serde_json::from_str(
            r#"{"cnpj":"11222333000181","razao_social":"ACME LTDA","uf":"SP",
                "descricao_situacao_cadastral":"ATIVA","situacao_cadastral":2}"#,
        )
        .unwrap();
        assert_eq!(body.uf.as_deref(), Some("SP"));
        assert_eq!(body.descricao_situacao_cadastral.as_deref(), Some("ATIVA"));
    }

    #[test]
    fn unreachable_host_is_unavailable() {
        let api = BrasilApi::with_base_url("http://127.0.0.1:9/");
        let r = api.status("11222333000181", Duration::from_millis(200));
        assert!(r.is_err());
    }
}
