//! Forecast lookups on top of the weather table.

use crate::error::{StoreError, StoreResult};
use crate::protocol::WhereClause;
use crate::service::RecordService;
use chrono::{Local, NaiveDate};
use fieldbook_model::{RecordMapping, WeatherDay};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Forecast lookups over the weather table.
#[derive(Clone)]
pub struct WeatherService {
    records: RecordService<WeatherDay>,
}

impl WeatherService {
    pub fn new(records: RecordService<WeatherDay>) -> Self {
        Self { records }
    }

    /// The underlying record service, for writes.
    pub fn records(&self) -> &RecordService<WeatherDay> {
        &self.records
    }

    /// Every forecast day, earliest first. Empty when the store is unreachable.
    pub async fn forecast(&self) -> Vec<WeatherDay> {
        self.records.get_all().await
    }

    /// The earliest forecast day, or a default day dated today when there is none.
    pub async fn current(&self) -> WeatherDay {
        self.forecast()
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| WeatherDay::placeholder(today()))
    }

    /// The forecast for `date`.
    pub async fn by_date(&self, date: NaiveDate) -> StoreResult<WeatherDay> {
        let key = date.format(DATE_FORMAT).to_string();
        self.records
            .find(vec![WhereClause::equal_to("date_c", key.as_str())])
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::RecordNotFound {
                kind: WeatherDay::KIND,
                key,
            })
    }
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
