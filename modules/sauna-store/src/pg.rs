//! Direct Postgres backend, used by the admin tooling.
//!
//! Enum columns travel as text and are parsed on the Rust side, so no custom
//! sqlx type mappings are needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use sauna_common::{
    NewSauna, NewSubmission, OpeningHours, Sauna, SaunaPatch, Submission, SubmittedData,
};

use crate::error::{Result, StoreError};
use crate::store::{SaunaFilter, SaunaStore};

const SAUNA_COLUMNS: &str = r#"
    id, created_at, name, address, gmaps_url, website, booking_url, phone,
    opening_hours, pricing_details,
    booking_type::text AS booking_type,
    heat_sources::text[] AS heat_sources,
    sauna_types::text[] AS sauna_types,
    setting::text AS setting,
    has_lake_access, amenities, swimsuit_policy, avg_rating, review_count
"#;

const SUBMISSION_COLUMNS: &str = r#"
    id, created_at, type::text AS type, status::text AS status, sauna_id, submitted_data
"#;

#[derive(Debug, sqlx::FromRow)]
struct SaunaRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    name: String,
    address: String,
    gmaps_url: Option<String>,
    website: Option<String>,
    booking_url: Option<String>,
    phone: Option<String>,
    opening_hours: Json<OpeningHours>,
    pricing_details: String,
    booking_type: String,
    heat_sources: Vec<String>,
    sauna_types: Vec<String>,
    setting: String,
    has_lake_access: bool,
    amenities: Option<Vec<String>>,
    swimsuit_policy: Option<String>,
    avg_rating: Option<f64>,
    review_count: Option<i32>,
}

impl TryFrom<SaunaRow> for Sauna {
    type Error = StoreError;

    fn try_from(row: SaunaRow) -> Result<Self> {
        Ok(Sauna {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            address: row.address,
            gmaps_url: row.gmaps_url,
            website: row.website,
            booking_url: row.booking_url,
            phone: row.phone,
            opening_hours: row.opening_hours.0,
            pricing_details: row.pricing_details,
            booking_type: row.booking_type.parse()?,
            heat_sources: parse_tags(&row.heat_sources)?,
            sauna_types: parse_tags(&row.sauna_types)?,
            setting: row.setting.parse()?,
            has_lake_access: row.has_lake_access,
            amenities: row.amenities,
            swimsuit_policy: row.swimsuit_policy,
            avg_rating: row.avg_rating,
            review_count: row.review_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    #[sqlx(rename = "type")]
    submission_type: String,
    status: String,
    sauna_id: Option<Uuid>,
    submitted_data: Json<SubmittedData>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StoreError;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        Ok(Submission {
            id: row.id,
            created_at: row.created_at,
            submission_type: row.submission_type.parse()?,
            status: row.status.parse()?,
            sauna_id: row.sauna_id,
            submitted_data: row.submitted_data.0,
        })
    }
}

fn parse_tags<T>(values: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = sauna_common::ParseTagError>,
{
    values
        .iter()
        .map(|v| v.parse().map_err(StoreError::from))
        .collect()
}

fn tag_strings<T: std::fmt::Display>(tags: &[T]) -> Vec<String> {
    tags.iter().map(ToString::to_string).collect()
}

#[derive(Clone)]
pub struct PgSaunaStore {
    pool: PgPool,
}

impl PgSaunaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl SaunaStore for PgSaunaStore {
    async fn list(&self, filter: &SaunaFilter) -> Result<Vec<Sauna>> {
        let sql = format!(
            r#"
            SELECT {SAUNA_COLUMNS}
            FROM saunas
            WHERE ($1::text IS NULL OR setting = $1::text::setting_enum)
              AND ($2::text IS NULL OR booking_type = $2::text::booking_type_enum)
              AND ($3::boolean IS NULL OR has_lake_access = $3)
            ORDER BY name ASC
            "#
        );
        let rows = sqlx::query_as::<_, SaunaRow>(&sql)
            .bind(filter.setting.map(|s| s.as_str()))
            .bind(filter.booking_type.map(|b| b.as_str()))
            .bind(filter.has_lake_access)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Sauna::try_from).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Sauna>> {
        let sql = format!("SELECT {SAUNA_COLUMNS} FROM saunas WHERE id = $1");
        let row = sqlx::query_as::<_, SaunaRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Sauna::try_from).transpose()
    }

    async fn insert(&self, sauna: NewSauna) -> Result<Sauna> {
        sauna.validate()?;
        let sql = format!(
            r#"
            INSERT INTO saunas (
                name, address, gmaps_url, website, booking_url, phone,
                opening_hours, pricing_details, booking_type, heat_sources,
                sauna_types, setting, has_lake_access, amenities,
                swimsuit_policy, avg_rating, review_count
            )
            VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9::text::booking_type_enum, $10::text[]::heat_source_enum[],
                $11::text[]::sauna_type_enum[], $12::text::setting_enum, $13, $14,
                $15, $16, $17
            )
            RETURNING {SAUNA_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SaunaRow>(&sql)
            .bind(&sauna.name)
            .bind(&sauna.address)
            .bind(&sauna.gmaps_url)
            .bind(&sauna.website)
            .bind(&sauna.booking_url)
            .bind(&sauna.phone)
            .bind(Json(&sauna.opening_hours))
            .bind(&sauna.pricing_details)
            .bind(sauna.booking_type.as_str())
            .bind(tag_strings(&sauna.heat_sources))
            .bind(tag_strings(&sauna.sauna_types))
            .bind(sauna.setting.as_str())
            .bind(sauna.has_lake_access)
            .bind(&sauna.amenities)
            .bind(&sauna.swimsuit_policy)
            .bind(sauna.avg_rating)
            .bind(sauna.review_count)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn update(&self, id: Uuid, patch: SaunaPatch) -> Result<Sauna> {
        patch.validate()?;
        let sql = format!(
            r#"
            UPDATE saunas SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                gmaps_url = COALESCE($4, gmaps_url),
                website = COALESCE($5, website),
                booking_url = COALESCE($6, booking_url),
                phone = COALESCE($7, phone),
                opening_hours = COALESCE($8, opening_hours),
                pricing_details = COALESCE($9, pricing_details),
                booking_type = COALESCE($10::text::booking_type_enum, booking_type),
                heat_sources = COALESCE($11::text[]::heat_source_enum[], heat_sources),
                sauna_types = COALESCE($12::text[]::sauna_type_enum[], sauna_types),
                setting = COALESCE($13::text::setting_enum, setting),
                has_lake_access = COALESCE($14, has_lake_access),
                amenities = COALESCE($15, amenities),
                swimsuit_policy = COALESCE($16, swimsuit_policy),
                avg_rating = COALESCE($17, avg_rating),
                review_count = COALESCE($18, review_count)
            WHERE id = $1
            RETURNING {SAUNA_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SaunaRow>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.address)
            .bind(&patch.gmaps_url)
            .bind(&patch.website)
            .bind(&patch.booking_url)
            .bind(&patch.phone)
            .bind(patch.opening_hours.as_ref().map(Json))
            .bind(&patch.pricing_details)
            .bind(patch.booking_type.map(|b| b.as_str()))
            .bind(patch.heat_sources.as_deref().map(tag_strings))
            .bind(patch.sauna_types.as_deref().map(tag_strings))
            .bind(patch.setting.map(|s| s.as_str()))
            .bind(patch.has_lake_access)
            .bind(&patch.amenities)
            .bind(&patch.swimsuit_policy)
            .bind(patch.avg_rating)
            .bind(patch.review_count)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Submission> {
        submission.validate()?;
        let sql = format!(
            r#"
            INSERT INTO submissions (type, status, sauna_id, submitted_data)
            VALUES ($1::text::submission_type_enum, 'pending', $2, $3)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(submission.submission_type.as_str())
            .bind(submission.sauna_id)
            .bind(Json(&submission.submitted_data))
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1");
        let row = sqlx::query_as::<_, SubmissionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Submission::try_from).transpose()
    }
}
