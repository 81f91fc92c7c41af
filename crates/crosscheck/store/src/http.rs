//! HTTP implementation of the store transport.
//!
//! Speaks a small REST keyspace rooted at a base URL:
//!
//! ```text
//! POST /v1/{algorithm}/{scope}/parameters            -> {"id": n}
//! GET  /v1/{algorithm}/{scope}/parameters            -> [{"id": n, "record": {...}}]
//! POST /v1/{algorithm}/{scope}/parameters/{id}/data  -> 204
//! GET  /v1/{algorithm}/{scope}/parameters/{id}/data  -> [{...}]
//! POST /v1/{algorithm}/keys                          -> {"id": n}
//! GET  /v1/{algorithm}/keys                          -> [{"id": n, "record": {...}}]
//! POST /v1/{algorithm}/keys/{ref}/encodings          -> 204
//! GET  /v1/{algorithm}/keys/{ref}/encodings          -> [{...}]
//! ```
//!
//! The server allocates ids; this client never invents one. A 404 on a
//! data or encoding path means the parent identifier is unknown to the
//! server and is surfaced as the corresponding typed error.

use crate::remote::StoreTransport;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use crosscheck_types::{KeyReference, ParametersId};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// HTTP store transport.
pub struct HttpTransport {
    base: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct IdResponse {
    id: u64,
}

#[derive(Deserialize)]
struct RecordRow {
    id: u64,
    record: serde_json::Value,
}

impl HttpTransport {
    pub fn new(base: Url) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(base: Url, client: reqwest::Client) -> Self {
        Self { base, client }
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        self.base
            .join(path)
            .map_err(|e| StoreError::Write(format!("invalid store endpoint '{path}': {e}")))
    }

    async fn post(&self, url: Url, body: Vec<u8>) -> StoreResult<reqwest::Response> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::Write(format!("{url} not found")));
        }
        if !response.status().is_success() {
            return Err(StoreError::Write(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        Ok(response)
    }

    async fn get(&self, url: Url) -> StoreResult<reqwest::Response> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Read(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        Ok(response)
    }

    fn rows_to_bytes(rows: Vec<RecordRow>) -> StoreResult<Vec<(u64, Vec<u8>)>> {
        rows.into_iter()
            .map(|row| {
                let bytes = serde_json::to_vec(&row.record)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok((row.id, bytes))
            })
            .collect()
    }

    fn values_to_bytes(values: Vec<serde_json::Value>) -> StoreResult<Vec<Vec<u8>>> {
        values
            .into_iter()
            .map(|value| {
                serde_json::to_vec(&value).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl StoreTransport for HttpTransport {
    async fn put_parameters(
        &self,
        algorithm: &str,
        scope: &str,
        record: Vec<u8>,
    ) -> StoreResult<u64> {
        let url = self.endpoint(&format!("v1/{algorithm}/{scope}/parameters"))?;
        let response = self.post(url, record).await?;
        let assigned: IdResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(assigned.id)
    }

    async fn get_all_parameters(
        &self,
        algorithm: &str,
        scope: &str,
    ) -> StoreResult<Vec<(u64, Vec<u8>)>> {
        let url = self.endpoint(&format!("v1/{algorithm}/{scope}/parameters"))?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let rows: Vec<RecordRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Self::rows_to_bytes(rows)
    }

    async fn put_data(
        &self,
        algorithm: &str,
        scope: &str,
        parameters_id: u64,
        record: Vec<u8>,
    ) -> StoreResult<()> {
        let url = self.endpoint(&format!(
            "v1/{algorithm}/{scope}/parameters/{parameters_id}/data"
        ))?;
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(record)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::UnknownParametersId {
                algorithm: algorithm.to_string(),
                scope: scope.to_string(),
                id: ParametersId::new(parameters_id),
            }),
            status if status.is_success() => Ok(()),
            status => Err(StoreError::Write(format!("{url} returned {status}"))),
        }
    }

    async fn get_all_data(
        &self,
        algorithm: &str,
        scope: &str,
        parameters_id: u64,
    ) -> StoreResult<Vec<Vec<u8>>> {
        let url = self.endpoint(&format!(
            "v1/{algorithm}/{scope}/parameters/{parameters_id}/data"
        ))?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::UnknownParametersId {
                algorithm: algorithm.to_string(),
                scope: scope.to_string(),
                id: ParametersId::new(parameters_id),
            });
        }
        let values: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Self::values_to_bytes(values)
    }

    async fn put_key(&self, algorithm: &str, descriptor: Vec<u8>) -> StoreResult<u64> {
        let url = self.endpoint(&format!("v1/{algorithm}/keys"))?;
        let response = self.post(url, descriptor).await?;
        let assigned: IdResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(assigned.id)
    }

    async fn get_all_keys(&self, algorithm: &str) -> StoreResult<Vec<(u64, Vec<u8>)>> {
        let url = self.endpoint(&format!("v1/{algorithm}/keys"))?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let rows: Vec<RecordRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Self::rows_to_bytes(rows)
    }

    async fn put_key_encoding(
        &self,
        algorithm: &str,
        reference: u64,
        record: Vec<u8>,
    ) -> StoreResult<()> {
        let url = self.endpoint(&format!("v1/{algorithm}/keys/{reference}/encodings"))?;
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(record)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::UnknownKeyReference {
                algorithm: algorithm.to_string(),
                reference: KeyReference::new(reference),
            }),
            status if status.is_success() => Ok(()),
            status => Err(StoreError::Write(format!("{url} returned {status}"))),
        }
    }

    async fn get_all_key_encodings(
        &self,
        algorithm: &str,
        reference: u64,
    ) -> StoreResult<Vec<Vec<u8>>> {
        let url = self.endpoint(&format!("v1/{algorithm}/keys/{reference}/encodings"))?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::UnknownKeyReference {
                algorithm: algorithm.to_string(),
                reference: KeyReference::new(reference),
            });
        }
        let values: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Self::values_to_bytes(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_under_the_base_url() {
        let transport = HttpTransport::new(Url::parse("http://store.local/compat/").unwrap());
        let url = transport
            .endpoint("v1/AES-GCM/ciphers/parameters")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://store.local/compat/v1/AES-GCM/ciphers/parameters"
        );
    }
}
