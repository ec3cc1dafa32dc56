//! Configuration content: loaders and the typed configuration store.
//!
//! This crate turns data files into validated, queryable records:
//! - Record catalogs (data-driven via RON, one file per table)
//! - Store settings (data-driven via TOML)
//! - [`ConfigStore`]: typed named-record tables with lookup statistics,
//!   lifecycle tracking, and bulk validation sweeps
//!
//! Validation itself is delegated to a shared [`validation::ValidationEngine`].

pub mod store;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use store::{
    ConfigStore, PerformanceSnapshot, PerformanceStats, StoreError, StoreSettings, StoreState,
    SweepOptions, SweepReport,
};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ContentFactory, LoadResult, SettingsLoader};
