// ABOUTME: Activity kind enumeration and sport grouping for classification defaults
// ABOUTME: Parses display names into kinds and maps each kind onto its sport group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::metric_keys;

/// Enumeration of supported activity kinds
///
/// Kinds serialize as their `snake_case` identifier. Names that do not map to a
/// known kind are preserved in the `Other` variant so rules and baselines for
/// unusual activities still have a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    // Running family
    /// Outdoor run
    Run,
    /// Trail run
    TrailRun,
    /// Virtual run
    VirtualRun,
    /// Track session
    TrackRun,
    /// Treadmill run
    Treadmill,

    // Cycling family
    /// Road ride
    Ride,
    /// Gravel ride
    GravelRide,
    /// Mountain bike ride
    MtbRide,
    /// Virtual ride
    VirtualRide,
    /// Commute by bike
    CommutingRide,
    /// Indoor trainer ride
    IndoorRide,
    /// Mixed surface ride
    MixedSurfaceRide,
    /// E-bike ride
    EBikeRide,
    /// E-mountain bike ride
    EMountainBikeRide,

    // Swimming
    /// Pool swim
    LapSwimming,
    /// Open water swim
    OpenWaterSwimming,

    // Walk / hike
    /// Outdoor walk
    Walk,
    /// Indoor walk
    IndoorWalking,
    /// Hike
    Hike,

    /// Rowing
    Rowing,

    // Gym
    /// Generic workout
    Workout,
    /// Strength training
    StrengthTraining,
    /// `CrossFit`
    Crossfit,
    /// High intensity interval training
    Hiit,
    /// Cardio machines
    CardioTraining,
    /// Yoga
    Yoga,

    // Snow
    /// Alpine skiing
    AlpineSki,
    /// Nordic skiing
    NordicSki,
    /// Snowboarding
    Snowboard,
    /// Snowshoeing
    SnowShoeing,

    // Skating
    /// Ice skating
    IceSkate,
    /// Inline skating
    InlineSkating,

    // Water and board
    /// Windsurfing
    Windsurf,
    /// Sailing
    Sailing,
    /// Surfing
    Surf,
    /// Stand-up paddling
    StandUpPaddling,
    /// Kayaking
    Kayaking,

    // Field and racket
    /// Soccer
    Soccer,
    /// Tennis
    Tennis,
    /// Table tennis
    TableTennis,
    /// Badminton
    Badminton,
    /// Squash
    Squash,
    /// Racquetball
    Racquetball,
    /// Pickleball
    Pickleball,

    /// Multisport transition
    Transition,

    /// Activity kind not covered by the standard list
    Other(String),
}

/// Sport group sharing one table of category defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityGroup {
    /// Running family
    Run,
    /// Cycling family
    Ride,
    /// Swimming
    Swim,
    /// Walking
    Walk,
    /// Hiking
    Hike,
    /// Rowing
    Row,
    /// Gym and bodyweight
    Gym,
    /// Snow sports
    Snow,
    /// Skating
    Skate,
    /// Water and board sports
    Water,
    /// Field and racket sports
    Field,
    /// Multisport transitions
    Transition,
    /// Unknown kinds
    Other,
}

impl ActivityGroup {
    /// All groups in declaration order
    pub const ALL: [Self; 13] = [
        Self::Run,
        Self::Ride,
        Self::Swim,
        Self::Walk,
        Self::Hike,
        Self::Row,
        Self::Gym,
        Self::Snow,
        Self::Skate,
        Self::Water,
        Self::Field,
        Self::Transition,
        Self::Other,
    ];

    /// `snake_case` identifier of the group
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Ride => "ride",
            Self::Swim => "swim",
            Self::Walk => "walk",
            Self::Hike => "hike",
            Self::Row => "row",
            Self::Gym => "gym",
            Self::Snow => "snow",
            Self::Skate => "skate",
            Self::Water => "water",
            Self::Field => "field",
            Self::Transition => "transition",
            Self::Other => "other",
        }
    }
}

/// Convert a human-friendly string to `snake_case`
///
/// Lowercases, replaces every run of non-alphanumeric characters with a single
/// underscore and trims underscores from both ends.
///
/// ```
/// use pierre_core::models::normalize_name;
///
/// assert_eq!(normalize_name("  E-Mountain Bike Ride "), "e_mountain_bike_ride");
/// assert_eq!(normalize_name("Lap Swimming!!"), "lap_swimming");
/// ```
#[must_use]
pub fn normalize_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_separator = false;
    for ch in value.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}

impl ActivityKind {
    /// Every standard kind, in catalog order
    pub const STANDARD: [Self; 45] = [
        Self::Run,
        Self::TrailRun,
        Self::VirtualRun,
        Self::TrackRun,
        Self::Treadmill,
        Self::Ride,
        Self::GravelRide,
        Self::MtbRide,
        Self::VirtualRide,
        Self::CommutingRide,
        Self::IndoorRide,
        Self::MixedSurfaceRide,
        Self::EBikeRide,
        Self::EMountainBikeRide,
        Self::LapSwimming,
        Self::OpenWaterSwimming,
        Self::Walk,
        Self::IndoorWalking,
        Self::Hike,
        Self::Rowing,
        Self::Workout,
        Self::StrengthTraining,
        Self::Crossfit,
        Self::Hiit,
        Self::CardioTraining,
        Self::Yoga,
        Self::AlpineSki,
        Self::NordicSki,
        Self::Snowboard,
        Self::SnowShoeing,
        Self::IceSkate,
        Self::InlineSkating,
        Self::Windsurf,
        Self::Sailing,
        Self::Surf,
        Self::StandUpPaddling,
        Self::Kayaking,
        Self::Soccer,
        Self::Tennis,
        Self::TableTennis,
        Self::Badminton,
        Self::Squash,
        Self::Racquetball,
        Self::Pickleball,
        Self::Transition,
    ];

    /// Parse a display name or identifier into a kind
    ///
    /// The input is normalized with [`normalize_name`] first, so "Trail Run",
    /// "trail-run" and "trail_run" all resolve to [`ActivityKind::TrailRun`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized = normalize_name(name);
        match normalized.as_str() {
            "run" => Self::Run,
            "trail_run" => Self::TrailRun,
            "virtual_run" => Self::VirtualRun,
            "track_run" => Self::TrackRun,
            "treadmill" => Self::Treadmill,
            "ride" => Self::Ride,
            "gravel_ride" => Self::GravelRide,
            "mtb_ride" => Self::MtbRide,
            "virtual_ride" => Self::VirtualRide,
            "commuting_ride" => Self::CommutingRide,
            "indoor_ride" => Self::IndoorRide,
            "mixed_surface_ride" => Self::MixedSurfaceRide,
            "e_bike_ride" => Self::EBikeRide,
            "e_mountain_bike_ride" => Self::EMountainBikeRide,
            "lap_swimming" => Self::LapSwimming,
            "open_water_swimming" => Self::OpenWaterSwimming,
            "walk" => Self::Walk,
            "indoor_walking" => Self::IndoorWalking,
            "hike" => Self::Hike,
            "rowing" => Self::Rowing,
            "workout" => Self::Workout,
            "strength_training" => Self::StrengthTraining,
            "crossfit" => Self::Crossfit,
            "hiit" => Self::Hiit,
            "cardio_training" => Self::CardioTraining,
            "yoga" => Self::Yoga,
            "alpine_ski" => Self::AlpineSki,
            "nordic_ski" => Self::NordicSki,
            "snowboard" => Self::Snowboard,
            "snow_shoeing" => Self::SnowShoeing,
            "ice_skate" => Self::IceSkate,
            "inline_skating" => Self::InlineSkating,
            "windsurf" => Self::Windsurf,
            "sailing" => Self::Sailing,
            "surf" => Self::Surf,
            "stand_up_paddling" => Self::StandUpPaddling,
            "kayaking" => Self::Kayaking,
            "soccer" => Self::Soccer,
            "tennis" => Self::Tennis,
            "tabletennis" => Self::TableTennis,
            "badminton" => Self::Badminton,
            "squash" => Self::Squash,
            "racquetball" => Self::Racquetball,
            "pickleball" => Self::Pickleball,
            "transition" => Self::Transition,
            _ => Self::Other(normalized),
        }
    }

    /// `snake_case` identifier used in keys and serialized records
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Run => "run",
            Self::TrailRun => "trail_run",
            Self::VirtualRun => "virtual_run",
            Self::TrackRun => "track_run",
            Self::Treadmill => "treadmill",
            Self::Ride => "ride",
            Self::GravelRide => "gravel_ride",
            Self::MtbRide => "mtb_ride",
            Self::VirtualRide => "virtual_ride",
            Self::CommutingRide => "commuting_ride",
            Self::IndoorRide => "indoor_ride",
            Self::MixedSurfaceRide => "mixed_surface_ride",
            Self::EBikeRide => "e_bike_ride",
            Self::EMountainBikeRide => "e_mountain_bike_ride",
            Self::LapSwimming => "lap_swimming",
            Self::OpenWaterSwimming => "open_water_swimming",
            Self::Walk => "walk",
            Self::IndoorWalking => "indoor_walking",
            Self::Hike => "hike",
            Self::Rowing => "rowing",
            Self::Workout => "workout",
            Self::StrengthTraining => "strength_training",
            Self::Crossfit => "crossfit",
            Self::Hiit => "hiit",
            Self::CardioTraining => "cardio_training",
            Self::Yoga => "yoga",
            Self::AlpineSki => "alpine_ski",
            Self::NordicSki => "nordic_ski",
            Self::Snowboard => "snowboard",
            Self::SnowShoeing => "snow_shoeing",
            Self::IceSkate => "ice_skate",
            Self::InlineSkating => "inline_skating",
            Self::Windsurf => "windsurf",
            Self::Sailing => "sailing",
            Self::Surf => "surf",
            Self::StandUpPaddling => "stand_up_paddling",
            Self::Kayaking => "kayaking",
            Self::Soccer => "soccer",
            Self::Tennis => "tennis",
            Self::TableTennis => "tabletennis",
            Self::Badminton => "badminton",
            Self::Squash => "squash",
            Self::Racquetball => "racquetball",
            Self::Pickleball => "pickleball",
            Self::Transition => "transition",
            Self::Other(name) => name,
        }
    }

    /// Human-readable name used in insight headers
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Run => "Run",
            Self::TrailRun => "Trail Run",
            Self::VirtualRun => "Virtual Run",
            Self::TrackRun => "Track Run",
            Self::Treadmill => "Treadmill",
            Self::Ride => "Ride",
            Self::GravelRide => "Gravel Ride",
            Self::MtbRide => "MTB Ride",
            Self::VirtualRide => "Virtual Ride",
            Self::CommutingRide => "Commuting Ride",
            Self::IndoorRide => "Indoor Ride",
            Self::MixedSurfaceRide => "Mixed Surface Ride",
            Self::EBikeRide => "E-Bike Ride",
            Self::EMountainBikeRide => "E-Mountain Bike Ride",
            Self::LapSwimming => "Lap Swimming",
            Self::OpenWaterSwimming => "Open Water Swimming",
            Self::Walk => "Walk",
            Self::IndoorWalking => "Indoor Walking",
            Self::Hike => "Hike",
            Self::Rowing => "Rowing",
            Self::Workout => "Workout",
            Self::StrengthTraining => "Strength Training",
            Self::Crossfit => "Crossfit",
            Self::Hiit => "HIIT",
            Self::CardioTraining => "Cardio Training",
            Self::Yoga => "Yoga",
            Self::AlpineSki => "Alpine Ski",
            Self::NordicSki => "Nordic Ski",
            Self::Snowboard => "Snowboard",
            Self::SnowShoeing => "Snow Shoeing",
            Self::IceSkate => "Ice Skate",
            Self::InlineSkating => "Inline Skating",
            Self::Windsurf => "Windsurf",
            Self::Sailing => "Sailing",
            Self::Surf => "Surf",
            Self::StandUpPaddling => "Stand Up Paddling",
            Self::Kayaking => "Kayaking",
            Self::Soccer => "Soccer",
            Self::Tennis => "Tennis",
            Self::TableTennis => "Tabletennis",
            Self::Badminton => "Badminton",
            Self::Squash => "Squash",
            Self::Racquetball => "Racquetball",
            Self::Pickleball => "Pickleball",
            Self::Transition => "Transition",
            Self::Other(name) => name,
        }
    }

    /// Sport group whose default rule table applies to this kind
    #[must_use]
    pub const fn group(&self) -> ActivityGroup {
        match self {
            Self::Run | Self::TrailRun | Self::VirtualRun | Self::TrackRun | Self::Treadmill => {
                ActivityGroup::Run
            }
            Self::Ride
            | Self::GravelRide
            | Self::MtbRide
            | Self::VirtualRide
            | Self::CommutingRide
            | Self::IndoorRide
            | Self::MixedSurfaceRide
            | Self::EBikeRide
            | Self::EMountainBikeRide => ActivityGroup::Ride,
            Self::LapSwimming | Self::OpenWaterSwimming => ActivityGroup::Swim,
            Self::Walk | Self::IndoorWalking => ActivityGroup::Walk,
            Self::Hike => ActivityGroup::Hike,
            Self::Rowing => ActivityGroup::Row,
            Self::Workout
            | Self::StrengthTraining
            | Self::Crossfit
            | Self::Hiit
            | Self::CardioTraining
            | Self::Yoga => ActivityGroup::Gym,
            Self::AlpineSki | Self::NordicSki | Self::Snowboard | Self::SnowShoeing => {
                ActivityGroup::Snow
            }
            Self::IceSkate | Self::InlineSkating => ActivityGroup::Skate,
            Self::Windsurf
            | Self::Sailing
            | Self::Surf
            | Self::StandUpPaddling
            | Self::Kayaking => ActivityGroup::Water,
            Self::Soccer
            | Self::Tennis
            | Self::TableTennis
            | Self::Badminton
            | Self::Squash
            | Self::Racquetball
            | Self::Pickleball => ActivityGroup::Field,
            Self::Transition => ActivityGroup::Transition,
            Self::Other(_) => ActivityGroup::Other,
        }
    }

    /// Metrics worth discussing in an insight for this kind
    ///
    /// Also bounds which default metrics are seeded into a kind's rules.
    #[must_use]
    pub fn insight_parameters(&self) -> &'static [&'static str] {
        use metric_keys::{CADENCE, DISTANCE, ELEVATION_GAIN, HEART_RATE, PACE, POWER, SPEED};

        match self {
            Self::Treadmill => &[HEART_RATE, DISTANCE, PACE, CADENCE],
            Self::IndoorRide => &[POWER, HEART_RATE, DISTANCE, SPEED, CADENCE],
            Self::IndoorWalking => &[HEART_RATE, DISTANCE, PACE],
            Self::Workout => &[HEART_RATE, DISTANCE],
            Self::CardioTraining => &[HEART_RATE, DISTANCE, PACE],
            Self::SnowShoeing => &[DISTANCE, ELEVATION_GAIN, HEART_RATE],
            Self::Soccer => &[HEART_RATE, DISTANCE, PACE],
            _ => match self.group() {
                ActivityGroup::Run => &[HEART_RATE, DISTANCE, ELEVATION_GAIN, PACE, CADENCE],
                ActivityGroup::Ride => &[POWER, HEART_RATE, DISTANCE, ELEVATION_GAIN, SPEED, CADENCE],
                ActivityGroup::Swim => &[DISTANCE, PACE, HEART_RATE],
                ActivityGroup::Walk | ActivityGroup::Hike => {
                    &[HEART_RATE, DISTANCE, ELEVATION_GAIN, PACE]
                }
                ActivityGroup::Row => &[POWER, HEART_RATE, DISTANCE, CADENCE, PACE],
                ActivityGroup::Gym | ActivityGroup::Field => &[HEART_RATE],
                ActivityGroup::Snow => &[DISTANCE, ELEVATION_GAIN, SPEED, HEART_RATE],
                ActivityGroup::Skate | ActivityGroup::Water => &[DISTANCE, SPEED, HEART_RATE],
                ActivityGroup::Transition | ActivityGroup::Other => &[],
            },
        }
    }
}

impl From<String> for ActivityKind {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<&str> for ActivityKind {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Other(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
