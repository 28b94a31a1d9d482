//! In-process store for tests and local development. No database required.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sauna_common::{NewSauna, NewSubmission, Sauna, SaunaPatch, Submission};

use crate::error::{Result, StoreError};
use crate::store::{SaunaFilter, SaunaStore};

#[derive(Default)]
pub struct MemorySaunaStore {
    saunas: RwLock<Vec<Sauna>>,
    submissions: RwLock<Vec<Submission>>,
}

impl MemorySaunaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, e.g. fixtures.
    pub fn with_saunas(saunas: Vec<Sauna>) -> Self {
        Self {
            saunas: RwLock::new(saunas),
            submissions: RwLock::new(Vec::new()),
        }
    }

    /// All submissions received so far (for test assertions).
    pub async fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl SaunaStore for MemorySaunaStore {
    async fn list(&self, filter: &SaunaFilter) -> Result<Vec<Sauna>> {
        let mut rows: Vec<Sauna> = self
            .saunas
            .read()
            .await
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Sauna>> {
        Ok(self.saunas.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, sauna: NewSauna) -> Result<Sauna> {
        sauna.validate()?;
        let stored = Sauna::from_new(sauna, Uuid::new_v4(), Utc::now());
        self.saunas.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, patch: SaunaPatch) -> Result<Sauna> {
        patch.validate()?;
        let mut saunas = self.saunas.write().await;
        let sauna = saunas
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        sauna.apply(patch);
        Ok(sauna.clone())
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission> {
        submission.validate()?;
        let stored = Submission::from_new(submission, Uuid::new_v4(), Utc::now());
        self.submissions.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use sauna_common::{
        BookingType, HeatSource, OpeningHours, SaunaType, Setting, SubmissionStatus,
        SubmissionType, SubmittedData,
    };

    fn every_day(hours: &str) -> OpeningHours {
        let mut table = OpeningHours::default();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            table.set(day, hours);
        }
        table
    }

    fn new_sauna(name: &str, setting: Setting) -> NewSauna {
        NewSauna {
            name: name.to_string(),
            address: "Stockholm".to_string(),
            gmaps_url: None,
            website: None,
            booking_url: None,
            phone: None,
            opening_hours: every_day("09:00-21:00"),
            pricing_details: "150 SEK".to_string(),
            booking_type: BookingType::DropIn,
            heat_sources: vec![HeatSource::Wood],
            sauna_types: vec![SaunaType::Dry],
            setting,
            has_lake_access: setting == Setting::Lakeside,
            amenities: None,
            swimsuit_policy: None,
            avg_rating: None,
            review_count: None,
        }
    }

    #[tokio::test]
    async fn list_is_sorted_by_name_and_filtered() {
        let store = MemorySaunaStore::new();
        store.insert(new_sauna("Sturebadet", Setting::CitySpa)).await.unwrap();
        store.insert(new_sauna("Flottsbro Bastu", Setting::Lakeside)).await.unwrap();
        store.insert(new_sauna("Centralbadet", Setting::CitySpa)).await.unwrap();

        let names: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Centralbadet", "Flottsbro Bastu", "Sturebadet"]);

        let spas = store
            .list(&SaunaFilter {
                setting: Some(Setting::CitySpa),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(spas.len(), 2);
    }

    #[tokio::test]
    async fn insert_rejects_incomplete_hours() {
        let store = MemorySaunaStore::new();
        let mut sauna = new_sauna("Centralbadet", Setting::CitySpa);
        sauna.opening_hours.sunday = None;
        let err = store.insert(sauna).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(msg) if msg.contains("sunday")));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = MemorySaunaStore::new();
        let patch = SaunaPatch {
            phone: Some("+46 8 000 00 00".to_string()),
            ..Default::default()
        };
        let err = store.update(Uuid::new_v4(), patch).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let store = MemorySaunaStore::new();
        let stored = store.insert(new_sauna("Centralbadet", Setting::CitySpa)).await.unwrap();
        let mut hours = stored.opening_hours.clone();
        hours.set(Weekday::Sun, "closed");

        let updated = store
            .update(
                stored.id,
                SaunaPatch {
                    opening_hours: Some(hours),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.opening_hours.entry(Weekday::Sun), Some("closed"));
        assert_eq!(updated.name, "Centralbadet");
        assert_eq!(store.get_by_id(stored.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn submissions_are_stored_pending() {
        let store = MemorySaunaStore::new();
        let created = store
            .insert_submission(NewSubmission {
                submission_type: SubmissionType::NewSuggestion,
                sauna_id: None,
                submitted_data: SubmittedData {
                    name: Some("Skeppsholmen Bastu".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(created.status, SubmissionStatus::Pending);
        assert_eq!(store.get_submission(created.id).await.unwrap(), Some(created));
        assert_eq!(store.get_submission(Uuid::new_v4()).await.unwrap(), None);
    }
}
