//! Daily weather forecast rows.

use crate::ids::RecordId;
use crate::mapping::{RecordMapping, WriteMode};
use crate::record::{finite_number, optional_text, record_of, FieldAccess, RawRecord, NAME_FIELD};
use crate::schema::{FieldSpec, FieldType, SortSpec, SortType, TableSchema};
use crate::temperature::Temperature;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Forecast table, oldest day first.
pub static WEATHER_SCHEMA: TableSchema = TableSchema {
    table: "weather_c",
    fields: &[
        FieldSpec::id(),
        FieldSpec::read_only(NAME_FIELD, FieldType::Text),
        FieldSpec::date("date_c"),
        FieldSpec::temperature("temperature_c"),
        FieldSpec::text("condition_c"),
        FieldSpec::number("humidity_c"),
        FieldSpec::number("precipitation_c"),
    ],
    order_by: Some(SortSpec {
        field: "date_c",
        sort: SortType::Asc,
    }),
    paging: None,
};

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherDay {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    pub temperature: Temperature,
    pub condition: String,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Chance of precipitation, percent.
    pub precipitation: f64,
}

impl WeatherDay {
    pub const DEFAULT_CONDITION: &'static str = "sunny";
    pub const DEFAULT_HUMIDITY: f64 = 50.0;
    pub const DEFAULT_PRECIPITATION: f64 = 10.0;

    /// A default day dated `date`.
    pub fn placeholder(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }
}

impl Default for WeatherDay {
    fn default() -> Self {
        Self {
            id: None,
            date: None,
            temperature: Temperature::DEFAULT,
            condition: Self::DEFAULT_CONDITION.to_string(),
            humidity: Self::DEFAULT_HUMIDITY,
            precipitation: Self::DEFAULT_PRECIPITATION,
        }
    }
}

impl RecordMapping for WeatherDay {
    const KIND: &'static str = "weather";

    fn schema() -> &'static TableSchema {
        &WEATHER_SCHEMA
    }

    fn from_record(raw: &RawRecord) -> Self {
        let defaults = Self::default();
        Self {
            id: raw.record_id(),
            date: raw.text("date_c"),
            temperature: Temperature::decode(raw.get("temperature_c")),
            condition: raw.text("condition_c").unwrap_or(defaults.condition),
            humidity: raw.number("humidity_c").unwrap_or(defaults.humidity),
            precipitation: raw.number("precipitation_c").unwrap_or(defaults.precipitation),
        }
    }

    fn to_record(&self, _mode: WriteMode) -> RawRecord {
        record_of([
            ("date_c", optional_text(&self.date)),
            ("temperature_c", self.temperature.encode()),
            ("condition_c", Value::String(self.condition.clone())),
            ("humidity_c", finite_number(self.humidity, Self::DEFAULT_HUMIDITY)),
            (
                "precipitation_c",
                finite_number(self.precipitation, Self::DEFAULT_PRECIPITATION),
            ),
        ])
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}
