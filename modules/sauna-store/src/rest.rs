//! Hosted PostgREST backend (Supabase's `/rest/v1` row API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use sauna_common::{
    Config, NewSauna, NewSubmission, Sauna, SaunaPatch, Submission, SubmissionStatus,
    SubmissionType, SubmittedData,
};

use crate::error::{Result, StoreError};
use crate::store::{SaunaFilter, SaunaStore};

const SAUNAS: &str = "saunas";
const SUBMISSIONS: &str = "submissions";

/// Media type asking PostgREST for exactly one row as a bare object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// PostgREST's code for "the single-object request matched zero rows".
const NO_ROWS: &str = "PGRST116";

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct SubmissionInsert<'a> {
    #[serde(rename = "type")]
    submission_type: SubmissionType,
    status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    sauna_id: Option<Uuid>,
    submitted_data: &'a SubmittedData,
}

/// Outcome of a request that expects at most one row.
enum Single<T> {
    Found(T),
    NoRows,
}

pub struct RestSaunaStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestSaunaStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| StoreError::Validation(format!("invalid access key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| StoreError::Validation(format!("invalid access key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.store_url, &config.store_key, config.request_timeout)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn fetch_many<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let resp = request.send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    async fn fetch_single<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Single<T>> {
        let resp = request.header(ACCEPT, SINGLE_OBJECT).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(Single::Found(resp.json().await?));
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<PostgrestError>(&body).ok();
        if parsed.as_ref().and_then(|e| e.code.as_deref()) == Some(NO_ROWS) {
            return Ok(Single::NoRows);
        }
        Err(upstream(status, parsed, body))
    }

    async fn get_row<T: DeserializeOwned>(&self, table: &str, id: Uuid) -> Result<Option<T>> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        match self.fetch_single(request).await? {
            Single::Found(row) => Ok(Some(row)),
            Single::NoRows => Ok(None),
        }
    }

    async fn insert_row<B: Serialize + ?Sized, T: DeserializeOwned>(&self, table: &str, body: &B) -> Result<T> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body);
        match self.fetch_single(request).await? {
            Single::Found(row) => Ok(row),
            Single::NoRows => Err(StoreError::Upstream {
                status: StatusCode::NOT_ACCEPTABLE.as_u16(),
                message: format!("insert into {table} returned no row"),
            }),
        }
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<PostgrestError>(&body).ok();
    Err(upstream(status, parsed, body))
}

fn upstream(status: StatusCode, parsed: Option<PostgrestError>, body: String) -> StoreError {
    let message = parsed.and_then(|e| e.message).unwrap_or(body);
    StoreError::Upstream {
        status: status.as_u16(),
        message,
    }
}

fn filter_params(filter: &SaunaFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", "name.asc".to_string()),
    ];
    if let Some(setting) = filter.setting {
        params.push(("setting", format!("eq.{setting}")));
    }
    if let Some(booking_type) = filter.booking_type {
        params.push(("booking_type", format!("eq.{booking_type}")));
    }
    if let Some(lake) = filter.has_lake_access {
        params.push(("has_lake_access", format!("eq.{lake}")));
    }
    params
}

#[async_trait]
impl SaunaStore for RestSaunaStore {
    async fn list(&self, filter: &SaunaFilter) -> Result<Vec<Sauna>> {
        let request = self
            .client
            .get(self.table_url(SAUNAS))
            .query(&filter_params(filter));
        let saunas: Vec<Sauna> = self.fetch_many(request).await?;
        debug!(count = saunas.len(), "Fetched saunas");
        Ok(saunas)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Sauna>> {
        self.get_row(SAUNAS, id).await
    }

    async fn insert(&self, sauna: NewSauna) -> Result<Sauna> {
        sauna.validate()?;
        self.insert_row(SAUNAS, &sauna).await
    }

    async fn update(&self, id: Uuid, patch: SaunaPatch) -> Result<Sauna> {
        patch.validate()?;
        let request = self
            .client
            .patch(self.table_url(SAUNAS))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch);
        match self.fetch_single(request).await? {
            Single::Found(row) => Ok(row),
            Single::NoRows => Err(StoreError::NotFound),
        }
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission> {
        submission.validate()?;
        let row = SubmissionInsert {
            submission_type: submission.submission_type,
            status: SubmissionStatus::Pending,
            sauna_id: submission.sauna_id,
            submitted_data: &submission.submitted_data,
        };
        self.insert_row(SUBMISSIONS, &row).await
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        self.get_row(SUBMISSIONS, id).await
    }
}
