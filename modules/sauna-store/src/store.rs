use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use sauna_common::{BookingType, NewSauna, NewSubmission, Sauna, SaunaPatch, Setting, Submission};

use crate::error::{Result, StoreError};

/// Equality filters for [`SaunaStore::list`]. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaunaFilter {
    pub setting: Option<Setting>,
    pub booking_type: Option<BookingType>,
    pub has_lake_access: Option<bool>,
}

impl SaunaFilter {
    pub fn matches(&self, sauna: &Sauna) -> bool {
        self.setting.map_or(true, |s| s == sauna.setting)
            && self.booking_type.map_or(true, |b| b == sauna.booking_type)
            && self.has_lake_access.map_or(true, |l| l == sauna.has_lake_access)
    }
}

/// Record access for saunas and submissions.
///
/// Listings are always ordered by name ascending. Lookups that find no row
/// return `Ok(None)`; only `update` reports a missing id as
/// [`StoreError::NotFound`].
#[async_trait]
pub trait SaunaStore: Send + Sync {
    async fn list(&self, filter: &SaunaFilter) -> Result<Vec<Sauna>>;

    async fn list_all(&self) -> Result<Vec<Sauna>> {
        self.list(&SaunaFilter::default()).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Sauna>>;

    async fn insert(&self, sauna: NewSauna) -> Result<Sauna>;

    async fn update(&self, id: Uuid, patch: SaunaPatch) -> Result<Sauna>;

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission>;

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>>;
}

#[async_trait]
impl<S: SaunaStore + ?Sized> SaunaStore for Arc<S> {
    async fn list(&self, filter: &SaunaFilter) -> Result<Vec<Sauna>> {
        (**self).list(filter).await
    }

    async fn list_all(&self) -> Result<Vec<Sauna>> {
        (**self).list_all().await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Sauna>> {
        (**self).get_by_id(id).await
    }

    async fn insert(&self, sauna: NewSauna) -> Result<Sauna> {
        (**self).insert(sauna).await
    }

    async fn update(&self, id: Uuid, patch: SaunaPatch) -> Result<Sauna> {
        (**self).update(id, patch).await
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission> {
        (**self).insert_submission(submission).await
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        (**self).get_submission(id).await
    }
}

/// Bound a store call by `deadline`. Expiry becomes [`StoreError::Timeout`].
pub async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| StoreError::Timeout(deadline))?
}
