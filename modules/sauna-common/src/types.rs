use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ParseTagError, ValidationError};
use crate::schedule::OpeningHours;

/// Declares a closed tag enum whose wire form is a fixed display string.
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseTagError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

tag_enum! {
    /// How visitors get in.
    BookingType, "booking type" {
        DropIn => "Drop-in welcome",
        Required => "Online booking required",
        MembersOnly => "Members only",
    }
}

tag_enum! {
    HeatSource, "heat source" {
        Wood => "Wood-fired",
        Electric => "Electric",
    }
}

tag_enum! {
    SaunaType, "sauna type" {
        Dry => "Finnish Dry",
        Steam => "Steam Room",
        Infrared => "Infrared",
    }
}

tag_enum! {
    /// Where the sauna sits.
    Setting, "setting" {
        Lakeside => "Lakeside",
        Seaside => "Seaside",
        CitySpa => "City Spa",
        Gym => "Gym",
        Rooftop => "Rooftop",
        Floating => "Floating",
    }
}

tag_enum! {
    SubmissionType, "submission type" {
        NewSuggestion => "new_suggestion",
        Correction => "correction_report",
    }
}

tag_enum! {
    SubmissionStatus, "submission status" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

// --- Saunas ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sauna {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmaps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub opening_hours: OpeningHours,
    pub pricing_details: String,
    pub booking_type: BookingType,
    pub heat_sources: Vec<HeatSource>,
    pub sauna_types: Vec<SaunaType>,
    pub setting: Setting,
    pub has_lake_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimsuit_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
}

impl Sauna {
    /// URL path segment for this sauna's detail page.
    pub fn slug(&self) -> String {
        crate::slug::slugify(&self.name)
    }

    /// Materialize an insert payload into a stored record.
    pub fn from_new(new: NewSauna, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            name: new.name,
            address: new.address,
            gmaps_url: new.gmaps_url,
            website: new.website,
            booking_url: new.booking_url,
            phone: new.phone,
            opening_hours: new.opening_hours,
            pricing_details: new.pricing_details,
            booking_type: new.booking_type,
            heat_sources: new.heat_sources,
            sauna_types: new.sauna_types,
            setting: new.setting,
            has_lake_access: new.has_lake_access,
            amenities: new.amenities,
            swimsuit_policy: new.swimsuit_policy,
            avg_rating: new.avg_rating,
            review_count: new.review_count,
        }
    }

    /// Overwrite every field the patch carries.
    pub fn apply(&mut self, patch: SaunaPatch) {
        let SaunaPatch {
            name,
            address,
            gmaps_url,
            website,
            booking_url,
            phone,
            opening_hours,
            pricing_details,
            booking_type,
            heat_sources,
            sauna_types,
            setting,
            has_lake_access,
            amenities,
            swimsuit_policy,
            avg_rating,
            review_count,
        } = patch;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = gmaps_url {
            self.gmaps_url = Some(v);
        }
        if let Some(v) = website {
            self.website = Some(v);
        }
        if let Some(v) = booking_url {
            self.booking_url = Some(v);
        }
        if let Some(v) = phone {
            self.phone = Some(v);
        }
        if let Some(v) = opening_hours {
            self.opening_hours = v;
        }
        if let Some(v) = pricing_details {
            self.pricing_details = v;
        }
        if let Some(v) = booking_type {
            self.booking_type = v;
        }
        if let Some(v) = heat_sources {
            self.heat_sources = v;
        }
        if let Some(v) = sauna_types {
            self.sauna_types = v;
        }
        if let Some(v) = setting {
            self.setting = v;
        }
        if let Some(v) = has_lake_access {
            self.has_lake_access = v;
        }
        if let Some(v) = amenities {
            self.amenities = Some(v);
        }
        if let Some(v) = swimsuit_policy {
            self.swimsuit_policy = Some(v);
        }
        if let Some(v) = avg_rating {
            self.avg_rating = Some(v);
        }
        if let Some(v) = review_count {
            self.review_count = Some(v);
        }
    }
}

/// Insert payload: a sauna without the store-assigned `id` and `created_at`.
/// This is also the shape of each entry in the seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSauna {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmaps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub opening_hours: OpeningHours,
    pub pricing_details: String,
    pub booking_type: BookingType,
    pub heat_sources: Vec<HeatSource>,
    pub sauna_types: Vec<SaunaType>,
    pub setting: Setting,
    pub has_lake_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimsuit_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
}

impl NewSauna {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(day) = self.opening_hours.missing_days().next() {
            return Err(ValidationError::MissingDay(crate::schedule::day_key(day)));
        }
        Ok(())
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaunaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmaps_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<BookingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_sources: Option<Vec<HeatSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauna_types: Option<Vec<SaunaType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<Setting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_lake_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimsuit_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
}

impl SaunaPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rejects patches that carry nothing or would blank the name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

// --- Submissions ---

/// Fields proposed by the submitter. Free-form; nothing here is trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmittedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauna_id: Option<Uuid>,
    pub submitted_data: SubmittedData,
}

impl Submission {
    /// New submissions always start out pending review.
    pub fn from_new(new: NewSubmission, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            submission_type: new.submission_type,
            status: SubmissionStatus::Pending,
            sauna_id: new.sauna_id,
            submitted_data: new.submitted_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sauna_id: Option<Uuid>,
    #[serde(default)]
    pub submitted_data: SubmittedData,
}

impl NewSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.submission_type {
            SubmissionType::NewSuggestion => {
                let has_name = self
                    .submitted_data
                    .name
                    .as_deref()
                    .is_some_and(|n| !n.trim().is_empty());
                if !has_name {
                    return Err(ValidationError::SuggestionWithoutName);
                }
            }
            SubmissionType::Correction => {
                if self.sauna_id.is_none() {
                    return Err(ValidationError::CorrectionWithoutSauna);
                }
            }
        }
        Ok(())
    }
}
