pub mod bracket;
pub mod config;
pub mod dataset;
pub mod flags;
pub mod goals;
pub mod knockout;
pub mod lineup;
pub mod shot_data;
pub mod state;
pub mod timeline;
