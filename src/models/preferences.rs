//! Trip preferences and their validation
//!
//! `TripPreferencesInput` mirrors the preferences document as written by the
//! user. It is converted into a validated [`TripPreferences`] with
//! `TryFrom`; a `TripPreferences` value that breaks a constraint cannot be
//! constructed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::Location;
use crate::{Result, StayScoutError};

/// Largest party a single search may be made for
pub const MAX_GROUP_SIZE: i64 = 16;

/// Unvalidated preferences as decoded from the input file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripPreferencesInput {
    pub group_size: i64,
    pub locations: Vec<Location>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Accepts either a JSON number or a numeric string
    pub max_budget_per_night: Decimal,
    #[serde(default)]
    pub min_bedrooms: Option<i64>,
    #[serde(default)]
    pub min_bathrooms: Option<f64>,
    #[serde(default)]
    pub desired_amenities: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_vibes: Option<Vec<String>>,
    #[serde(default)]
    pub walkability_important: bool,
}

/// Validated trip request
#[derive(Debug, Clone, PartialEq)]
pub struct TripPreferences {
    group_size: u32,
    locations: Vec<Location>,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    max_budget_per_night: Decimal,
    min_bedrooms: Option<u32>,
    min_bathrooms: Option<f64>,
    desired_amenities: Vec<String>,
    preferred_vibes: Vec<String>,
    walkability_important: bool,
}

impl TryFrom<TripPreferencesInput> for TripPreferences {
    type Error = StayScoutError;

    fn try_from(input: TripPreferencesInput) -> Result<Self> {
        if input.group_size > MAX_GROUP_SIZE {
            return Err(StayScoutError::validation(
                "group_size",
                format!("group_size must be {MAX_GROUP_SIZE} or less"),
            ));
        }
        if input.group_size <= 0 {
            return Err(StayScoutError::validation(
                "group_size",
                "group_size must be greater than 0",
            ));
        }
        if input.check_out_date <= input.check_in_date {
            return Err(StayScoutError::validation(
                "check_out_date",
                "check_out_date must be after check_in_date",
            ));
        }
        if input.max_budget_per_night <= Decimal::ZERO {
            return Err(StayScoutError::validation(
                "max_budget_per_night",
                "max_budget_per_night must be greater than 0",
            ));
        }
        let min_bedrooms = match input.min_bedrooms {
            Some(bedrooms) if bedrooms <= 0 => {
                return Err(StayScoutError::validation(
                    "min_bedrooms",
                    "min_bedrooms must be greater than 0",
                ));
            }
            Some(bedrooms) => Some(u32::try_from(bedrooms).map_err(|_| {
                StayScoutError::validation("min_bedrooms", "min_bedrooms is out of range")
            })?),
            None => None,
        };
        // NaN fails this comparison as well
        if let Some(bathrooms) = input.min_bathrooms
            && !(bathrooms > 0.0)
        {
            return Err(StayScoutError::validation(
                "min_bathrooms",
                "min_bathrooms must be greater than 0",
            ));
        }
        if input.locations.is_empty() {
            return Err(StayScoutError::validation(
                "locations",
                "locations must contain at least one entry",
            ));
        }

        Ok(Self {
            // bounded by MAX_GROUP_SIZE above
            group_size: input.group_size as u32,
            locations: input.locations,
            check_in_date: input.check_in_date,
            check_out_date: input.check_out_date,
            max_budget_per_night: input.max_budget_per_night,
            min_bedrooms,
            min_bathrooms: input.min_bathrooms,
            desired_amenities: input.desired_amenities.unwrap_or_default(),
            preferred_vibes: input.preferred_vibes.unwrap_or_default(),
            walkability_important: input.walkability_important,
        })
    }
}

impl TripPreferences {
    #[must_use]
    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in_date
    }

    #[must_use]
    pub fn check_out_date(&self) -> NaiveDate {
        self.check_out_date
    }

    #[must_use]
    pub fn max_budget_per_night(&self) -> Decimal {
        self.max_budget_per_night
    }

    #[must_use]
    pub fn min_bedrooms(&self) -> Option<u32> {
        self.min_bedrooms
    }

    #[must_use]
    pub fn min_bathrooms(&self) -> Option<f64> {
        self.min_bathrooms
    }

    #[must_use]
    pub fn desired_amenities(&self) -> &[String] {
        &self.desired_amenities
    }

    #[must_use]
    pub fn preferred_vibes(&self) -> &[String] {
        &self.preferred_vibes
    }

    #[must_use]
    pub fn walkability_important(&self) -> bool {
        self.walkability_important
    }
}
