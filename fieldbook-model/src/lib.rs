//! Typed entities and field mapping for Fieldbook.
//!
//! The hosted record store speaks in loosely-typed, field-name keyed records.
//! This crate is the only place that knows how those records line up with the
//! typed entities the rest of the application works with:
//! - [`RawRecord`] and [`FieldAccess`]: the raw value bag and its coercing readers
//! - [`TableSchema`]: per-table projection, ordering and updateable allow-list
//! - [`RecordMapping`]: the two-way mapping every entity kind implements
//! - [`Temperature`] and [`resolve_relation`]: decoders for the two ambiguous encodings
//!
//! Reads never fail. Absent, null or malformed values are replaced by the
//! entity's documented default and the oddity is logged at `warn`.

mod crop;
mod error;
mod farm;
mod financial;
mod ids;
mod mapping;
mod record;
mod relation;
mod schema;
mod task;
mod temperature;
mod weather;

pub use crop::{Crop, CROP_SCHEMA};
pub use error::{ModelError, ModelResult};
pub use farm::{Farm, FarmAudit, FieldIssue, FARM_SCHEMA};
pub use financial::{Financial, FINANCIAL_SCHEMA};
pub use ids::RecordId;
pub use mapping::{RecordMapping, WriteMode};
pub use record::{record_of, FieldAccess, RawRecord, ID_FIELD, NAME_FIELD};
pub use relation::{relation_value, resolve_relation};
pub use schema::{FieldSpec, FieldType, PageSpec, SortSpec, SortType, TableSchema};
pub use task::{Task, TASK_SCHEMA};
pub use temperature::{EncodedTemperature, Temperature};
pub use weather::{WeatherDay, WEATHER_SCHEMA};
