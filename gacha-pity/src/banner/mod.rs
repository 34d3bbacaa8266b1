pub mod config;
pub mod table;

pub use config::{BannerConfig, BannerConfigBuilder, BannerId, MAX_HARD_PITY, SoftPityOffset};
pub use table::BannerTable;
