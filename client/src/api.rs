use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use hustings_shared::{
    AuthStatus, AvailableSlots, Candidate, CandidateDraft, Envelope, LotteryRecord,
    LotterySettings, PasswordChange, PhotoUpload, VoteConfig, VoteStatistics,
};

use crate::saga::CandidateGateway;

/// Fixed prefix of the administrative API; every request below is relative
/// to it.
pub const API_BASE: &str = "/api/admin";
/// Login boundary. Any 401 hands control here.
pub const LOGIN_PAGE: &str = "/admin/login";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 401. The body (typically the login page's HTML) is never parsed.
    #[error("not authenticated")]
    Unauthenticated,
    /// Caught client-side before any request leaves the page.
    #[error("{0}")]
    Validation(String),
    /// `success: false` envelope with the server's own message.
    #[error("{0}")]
    Rejected(String),
    /// Network failure or a body that did not decode.
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-JSON response; only the status code is trustworthy.
    #[error("unexpected server response (HTTP {0})")]
    Http(u16),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Send the browser to the login page. Used wherever the gateway reports
/// [`ApiError::Unauthenticated`].
pub fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        window.location().set_href(LOGIN_PAGE).ok();
    }
}

fn is_json(resp: &Response) -> bool {
    resp.headers()
        .get("content-type")
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

/// Decode the uniform envelope. 401 short-circuits before any body access,
/// and nothing is JSON-decoded without a JSON content type — an HTML error
/// page must never reach the parser.
async fn json_envelope<T: DeserializeOwned>(resp: Response) -> ApiResult<Envelope<T>> {
    if resp.status() == 401 {
        return Err(ApiError::Unauthenticated);
    }
    if !is_json(&resp) {
        return Err(ApiError::Http(resp.status()));
    }
    resp.json::<Envelope<T>>()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))
}

async fn decode_data<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    match json_envelope::<T>(resp).await?.into_result() {
        Ok(Some(data)) => Ok(data),
        Ok(None) => Err(ApiError::Transport(
            "response carried no payload".to_string(),
        )),
        Err(message) => Err(ApiError::Rejected(message)),
    }
}

async fn decode_ack(resp: Response) -> ApiResult<()> {
    match json_envelope::<serde_json::Value>(resp).await?.into_result() {
        Ok(_) => Ok(()),
        Err(message) => Err(ApiError::Rejected(message)),
    }
}

pub async fn fetch_candidates() -> ApiResult<Vec<Candidate>> {
    let resp = Request::get(&format!("{API_BASE}/candidates")).send().await?;
    decode_data(resp).await
}

pub async fn create_candidate(draft: &CandidateDraft) -> ApiResult<Candidate> {
    let resp = Request::post(&format!("{API_BASE}/candidates"))
        .json(draft)?
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn update_candidate(id: u32, draft: &CandidateDraft) -> ApiResult<Candidate> {
    let resp = Request::put(&format!("{API_BASE}/candidates/{id}"))
        .json(draft)?
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn delete_candidate(id: u32) -> ApiResult<()> {
    let resp = Request::delete(&format!("{API_BASE}/candidates/{id}"))
        .send()
        .await?;
    decode_ack(resp).await
}

/// Multipart upload: `file` plus, when the photo should be associated on the
/// server side, the owning `candidate_id`.
pub async fn upload_photo(file: &web_sys::File, candidate_id: Option<u32>) -> ApiResult<PhotoUpload> {
    let form = web_sys::FormData::new()
        .map_err(|_| ApiError::Transport("could not assemble upload form".to_string()))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| ApiError::Transport("could not attach photo".to_string()))?;
    if let Some(id) = candidate_id {
        form.append_with_str("candidate_id", &id.to_string())
            .map_err(|_| ApiError::Transport("could not attach candidate id".to_string()))?;
    }

    let resp = Request::post(&format!("{API_BASE}/upload/photo"))
        .body(form)?
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn fetch_vote_config() -> ApiResult<VoteConfig> {
    let resp = Request::get(&format!("{API_BASE}/vote/config")).send().await?;
    decode_data(resp).await
}

pub async fn update_vote_config(config: &VoteConfig) -> ApiResult<VoteConfig> {
    let resp = Request::put(&format!("{API_BASE}/vote/config"))
        .json(config)?
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn fetch_vote_statistics() -> ApiResult<VoteStatistics> {
    let resp = Request::get(&format!("{API_BASE}/votes/statistics"))
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn reset_votes() -> ApiResult<()> {
    let resp = Request::post(&format!("{API_BASE}/votes/reset"))
        .send()
        .await?;
    decode_ack(resp).await
}

pub async fn check_auth() -> ApiResult<AuthStatus> {
    let resp = Request::get(&format!("{API_BASE}/check-auth")).send().await?;
    decode_data(resp).await
}

pub async fn logout() -> ApiResult<()> {
    let resp = Request::post(&format!("{API_BASE}/logout")).send().await?;
    decode_ack(resp).await
}

pub async fn change_password(change: &PasswordChange) -> ApiResult<()> {
    let resp = Request::post(&format!("{API_BASE}/change-password"))
        .json(change)?
        .send()
        .await?;
    decode_ack(resp).await
}

pub async fn fetch_lottery_history() -> ApiResult<Vec<LotteryRecord>> {
    let resp = Request::get(&format!("{API_BASE}/lottery/history"))
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn fetch_lottery_available() -> ApiResult<AvailableSlots> {
    let resp = Request::get(&format!("{API_BASE}/lottery/available"))
        .send()
        .await?;
    decode_data(resp).await
}

pub async fn save_lottery_settings(settings: &LotterySettings) -> ApiResult<()> {
    let resp = Request::post(&format!("{API_BASE}/lottery/settings"))
        .json(settings)?
        .send()
        .await?;
    decode_ack(resp).await
}

pub async fn reset_lottery() -> ApiResult<()> {
    let resp = Request::post(&format!("{API_BASE}/lottery/reset"))
        .send()
        .await?;
    decode_ack(resp).await
}

/// The live gateway the save sagas run against.
pub struct AdminApi;

impl CandidateGateway for AdminApi {
    type Photo = web_sys::File;

    async fn create_candidate(&self, draft: &CandidateDraft) -> ApiResult<Candidate> {
        create_candidate(draft).await
    }

    async fn update_candidate(&self, id: u32, draft: &CandidateDraft) -> ApiResult<Candidate> {
        update_candidate(id, draft).await
    }

    async fn upload_photo(
        &self,
        photo: &Self::Photo,
        candidate_id: Option<u32>,
    ) -> ApiResult<PhotoUpload> {
        upload_photo(photo, candidate_id).await
    }
}
