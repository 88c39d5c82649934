//! tally-core: schema inference and period aggregation for untyped transaction exports.
//!
//! Pipeline: [`RawTable`] → [`classify`] (role map) → [`normalize`] (canonical
//! transactions) → [`summarize`] (totals and daily/fortnightly/monthly buckets).
//! [`Engine`] runs the whole chain with configuration and explicit role overrides.

pub mod aggregate;
pub mod bucket;
pub mod classifier;
pub mod config;
pub mod counterparty;
pub mod direction;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod parse;
pub mod pipeline;
pub mod roles;
pub mod table;

pub use aggregate::{DateRange, Flow, Summary, Totals, summarize};
pub use bucket::{FortnightKey, Half, MonthKey};
pub use classifier::{Classification, ColumnProfile, classify};
pub use config::{ClassifierConfig, CounterpartyConfig, DirectionConfig, EngineConfig};
pub use counterparty::{CounterpartyExtractor, TitleCasePair};
pub use direction::{DirectionStrategy, SignDirection, TypeLabelDirection};
pub use error::{EngineError, Result};
pub use model::{Direction, Transaction};
pub use normalizer::{DropCounts, Normalized, normalize};
pub use pipeline::{Analysis, Engine};
pub use roles::{Role, RoleMap};
pub use table::{Cell, RawTable};
