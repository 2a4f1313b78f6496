//! HTTP client for the TesaPay PHP backend

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::fee::{FeeTables, FeeTier};
use crate::transfer::pin::Pin;
use crate::transfer::types::TransferRequest;

use super::error::{ApiError, ApiResult};
use super::types::{
    BackendResponse, CreateTransferBody, CryptoFeesResponse, FeeKind, MomoFeesResponse, Session,
    VerifyPinBody,
};

const FEES_PATH: &str = "get_transfer_fees.php";
const TRANSFERS_PATH: &str = "transfers.php";
const VERIFY_PIN_PATH: &str = "verify_pin.php";

const TRANSFER_FAILED: &str = "Transfer failed";
const PIN_REJECTED: &str = "Invalid transaction PIN";

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Raw MOMO tier list
    pub async fn momo_fees(&self) -> ApiResult<Vec<FeeTier>> {
        let resp: MomoFeesResponse = self.get_fees(FeeKind::Momo).await?;
        Ok(resp.momo_fees)
    }

    /// Blockchain fee pairs plus crypto platform tiers
    pub async fn crypto_fees(&self) -> ApiResult<CryptoFeesResponse> {
        self.get_fees(FeeKind::Crypto).await
    }

    /// Fetch both fee endpoints concurrently and validate them into [`FeeTables`].
    pub async fn fee_tables(&self) -> ApiResult<FeeTables> {
        let (momo, crypto) = tokio::try_join!(self.momo_fees(), self.crypto_fees())?;
        debug!(
            momo_tiers = momo.len(),
            crypto_tiers = crypto.platform_fees.len(),
            blockchain_pairs = crypto.crypto_fees.len(),
            "Fee tables loaded"
        );
        Ok(FeeTables::new(
            momo,
            crypto.platform_fees,
            crypto.crypto_fees,
        )?)
    }

    /// Submit a composed transfer.
    ///
    /// Returns the backend's confirmation message, if any.
    pub async fn create_transfer(
        &self,
        request: &TransferRequest,
        pin: &Pin,
    ) -> ApiResult<Option<String>> {
        let body = CreateTransferBody::new(self.session.user_id, request, pin);
        debug!(
            draft_id = %request.draft_id(),
            transfer_type = %request.transfer_type(),
            amount = %request.amount(),
            currency = request.currency(),
            "POST {}", TRANSFERS_PATH
        );
        let resp = self.post(TRANSFERS_PATH, &body).await?;
        resp.into_result(TRANSFER_FAILED)
    }

    pub async fn verify_pin(&self, pin: &Pin) -> ApiResult<()> {
        let body = VerifyPinBody {
            user_id: self.session.user_id,
            transaction_pin: pin,
        };
        let resp = self.post(VERIFY_PIN_PATH, &body).await?;
        resp.into_result(PIN_REJECTED).map(|_| ())
    }

    async fn get_fees<T: DeserializeOwned>(&self, kind: FeeKind) -> ApiResult<T> {
        let request = self
            .http
            .get(self.url(FEES_PATH))
            .query(&[("type", kind.as_str())]);
        let resp = self.authorize(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(kind = %kind, status = status.as_u16(), "Fee request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// POST a JSON body and decode the `{success, message}` envelope.
    ///
    /// The body is decoded regardless of status so backend messages on 4xx
    /// responses still reach the user. Only an unreadable body on a non-2xx
    /// status becomes [`ApiError::Http`].
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<BackendResponse> {
        let request = self.http.post(self.url(path)).json(body);
        let resp = self.authorize(request).send().await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        decode_envelope(status, &bytes).inspect_err(|e| {
            warn!(path, status = status.as_u16(), error = %e, "Backend call failed");
        })
    }
}

fn decode_envelope(status: StatusCode, bytes: &[u8]) -> ApiResult<BackendResponse> {
    match serde_json::from_slice::<BackendResponse>(bytes) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(ApiError::Http {
            status: status.as_u16(),
        }),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}
