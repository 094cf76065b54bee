//! HTTP client for the backend's RPC endpoints.
//!
//! Procedures are invoked as `POST {base}/rpc/{procedure}` with a JSON body
//! and the service key as a bearer header. Mutating procedures answer with
//! a `{ success, error? }` status payload; reads answer with their result
//! document directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use estancia_core::{ActivityId, CompanyId, EstablishmentId, UserId};

use crate::config::BackendConfig;
use crate::models::{
    BatchHeader, Category, LotWithStock, ReclassificationActivity, ReclassificationOp,
};

use super::types::{
    ActivityDetailRequest, ActivityDetailResponse, CategoriesRequest, CategoriesResponse,
    CommitLineRequest, LotsWithStockRequest, LotsWithStockResponse, MarkReversedRequest,
    PersistActivityRequest, PersistActivityResponse, RpcStatus,
};
use super::{BackendError, ReclassificationBackend};

/// Client for the managed relational backend.
///
/// Cheap to clone; the underlying HTTP client and configuration are shared.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] if the service key contains
    /// characters that cannot appear in a header, or
    /// [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.service_key.expose_secret()))
                .map_err(|_| {
                    BackendError::Unauthorized(
                        "service key contains characters not valid in a header".to_string(),
                    )
                })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                http,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Liveness probe against the backend root.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the backend is unreachable or
    /// answers with an error status.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.inner
            .http
            .get(self.inner.base_url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn rpc_url(&self, procedure: &str) -> Url {
        let mut url = self.inner.base_url.clone();
        // Url::join would treat a base without trailing slash differently;
        // extending path segments sidesteps that.
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|()| {
                unreachable!("backend base URL is validated as a base at config load")
            });
            segments.pop_if_empty().push("rpc").push(procedure);
        }
        url
    }

    /// Invoke a read procedure and decode its result document.
    async fn rpc<Req: Serialize + Sync, Res: DeserializeOwned>(
        &self,
        procedure: &str,
        body: &Req,
    ) -> Result<Res, BackendError> {
        let response = self
            .inner
            .http
            .post(self.rpc_url(procedure))
            .json(body)
            .send()
            .await?;

        let response = Self::check_status(procedure, response)?;
        Ok(response.json::<Res>().await?)
    }

    /// Invoke a mutating procedure and interpret its status payload.
    async fn rpc_status<Req: Serialize + Sync>(
        &self,
        procedure: &str,
        body: &Req,
    ) -> Result<(), BackendError> {
        let status: RpcStatus = self.rpc(procedure, body).await?;
        if status.success {
            Ok(())
        } else {
            Err(BackendError::Rpc(status.error.unwrap_or_else(|| {
                format!("{procedure} reported failure without a message")
            })))
        }
    }

    fn check_status(
        procedure: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Unauthorized(
                format!("service key rejected for {procedure}"),
            )),
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(procedure.to_string())),
            _ => Ok(response.error_for_status()?),
        }
    }
}

impl ReclassificationBackend for BackendClient {
    #[instrument(skip(self))]
    async fn fetch_lots_with_stock(
        &self,
        establishment_id: EstablishmentId,
    ) -> Result<Vec<LotWithStock>, BackendError> {
        let response: LotsWithStockResponse = self
            .rpc("lots_with_stock", &LotsWithStockRequest { establishment_id })
            .await?;
        Ok(response.lots.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_categories(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Category>, BackendError> {
        let response: CategoriesResponse = self
            .rpc("categories_for_company", &CategoriesRequest { company_id })
            .await?;
        Ok(response.categories.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, op), fields(lot = %op.lot_id, from = %op.source_category, to = %op.destination_category, quantity = op.quantity))]
    async fn commit_reclassification_line(
        &self,
        op: &ReclassificationOp,
    ) -> Result<(), BackendError> {
        self.rpc_status("reclassify_lot_category", &CommitLineRequest::from(op))
            .await
    }

    #[instrument(skip(self, header, lines), fields(establishment = %header.establishment_id, lines = lines.len()))]
    async fn persist_activity(
        &self,
        header: &BatchHeader,
        lines: &[ReclassificationOp],
    ) -> Result<ActivityId, BackendError> {
        let response: PersistActivityResponse = self
            .rpc(
                "register_reclassification_activity",
                &PersistActivityRequest::new(header, lines),
            )
            .await?;
        Ok(response.activity_id)
    }

    #[instrument(skip(self))]
    async fn fetch_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<ReclassificationActivity, BackendError> {
        let response: ActivityDetailResponse = self
            .rpc(
                "reclassification_activity_detail",
                &ActivityDetailRequest { activity_id },
            )
            .await?;
        Ok(response.into())
    }

    #[instrument(skip(self))]
    async fn mark_activity_reversed(
        &self,
        activity_id: ActivityId,
        reversed_at: DateTime<Utc>,
        reversed_by: UserId,
    ) -> Result<(), BackendError> {
        self.rpc_status(
            "mark_activity_reversed",
            &MarkReversedRequest {
                activity_id,
                reversed_at,
                reversed_by_user_id: reversed_by,
            },
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: Url::parse(base).unwrap(),
            service_key: SecretString::from("k9!PzR2@vX7#qL4$wN8%"),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_rpc_url_joins_procedure() {
        let client = client("https://backend.example.com");
        assert_eq!(
            client.rpc_url("lots_with_stock").as_str(),
            "https://backend.example.com/rpc/lots_with_stock"
        );
    }

    #[test]
    fn test_rpc_url_respects_base_path() {
        let client = client("https://backend.example.com/api/v1/");
        assert_eq!(
            client.rpc_url("mark_activity_reversed").as_str(),
            "https://backend.example.com/api/v1/rpc/mark_activity_reversed"
        );
    }
}
