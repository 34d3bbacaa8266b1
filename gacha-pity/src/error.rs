use crate::banner::BannerId;

/// A banner configuration rule that was broken.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigViolation {
    #[error("{field} must be a finite value between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },
    #[error("soft pity start must be at least 1, got {0}")]
    SoftPityBelowOne(u32),
    #[error("soft pity start ({soft_pity_start}) must not exceed hard pity ({hard_pity})")]
    SoftPityAfterHardPity { soft_pity_start: u32, hard_pity: u32 },
    #[error("hard pity must not exceed {max}, got {hard_pity}")]
    HardPityAboveMax { hard_pity: u32, max: u32 },
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },
    #[error("current pity ({current_pity}) must be below hard pity ({hard_pity})")]
    PityBeyondHardPity { current_pity: u32, hard_pity: u32 },
    #[error("planned pulls must be at least 1")]
    NoPlannedPulls,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration for {banner}: {violation}")]
    Configuration {
        banner: BannerId,
        violation: ConfigViolation,
    },

    #[error("calculation failed for {banner}: {reason}")]
    Calculation { banner: BannerId, reason: String },

    #[error("result validation failed for {banner}: {reason}")]
    Validation { banner: BannerId, reason: String },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The banner this error concerns, when it is banner-scoped.
    pub fn banner(&self) -> Option<&BannerId> {
        match self {
            Error::Configuration { banner, .. }
            | Error::Calculation { banner, .. }
            | Error::Validation { banner, .. } => Some(banner),
            Error::Csv(_) | Error::CsvWrite(_) | Error::Io(_) | Error::Json(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
