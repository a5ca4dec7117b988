//! Core library for dict-hygiene.
//!
//! Scans word-frequency dictionaries (`[{ "word": ..., "freq": ... }]` JSON
//! files, one per language) for entries that need cleanup, and removes them
//! in bulk with a backup of the previous file.
//!
//! # Modules
//!
//! - [`classify`] - Pure per-word classifiers
//! - [`scan`] - Single-pass scanning with throttled progress
//! - [`analysis`] - Analyzer passes, duplicate grouping, and search
//! - [`filter`] - Category filters over analyzer results
//! - [`delete`] - Bulk delete with backup
//! - [`session`] - Per-analyzer scan/delete state machine
//! - [`store`] / [`cache`] - Dictionary files and the in-process cache
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use dict_hygiene_core::{AnalyzerKind, AnalyzerSession, ConfigLoader, DictionaryCache};
//! use dict_hygiene_core::scan::NoProgress;
//!
//! let (config, _) = ConfigLoader::new().load().expect("Failed to load configuration");
//! let cache = DictionaryCache::new(config.store());
//! let lang = cache.store().language("uk").expect("unsupported language");
//!
//! let mut session = AnalyzerSession::new(AnalyzerKind::Case);
//! let report = session
//!     .scan(&cache, &lang, &config.analysis_options("uk"), &mut NoProgress)
//!     .expect("scan failed");
//! println!("{} capitalized words", report.len());
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod cache;
pub mod classify;
pub mod config;
pub mod delete;
pub mod entry;
pub mod error;
pub mod filter;
pub mod scan;
pub mod session;
pub mod store;

pub use analysis::{AnalysisOptions, AnalysisReport, AnalyzerKind, SearchReport};
pub use cache::DictionaryCache;
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use delete::{DeleteOutcome, DeletionTarget};
pub use entry::DictionaryEntry;
pub use error::{ConfigError, ConfigResult, ErrorKind, HygieneError, HygieneResult};
pub use filter::{Category, FilterSet};
pub use session::{AnalyzerSession, SessionState};
pub use store::{DictionaryStore, LanguageCode};
