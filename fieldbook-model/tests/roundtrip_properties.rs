//! Property tests for the mapping round-trip law.
//!
//! For any entity `e` built from well-formed values, reading back its write
//! payload reproduces every updateable field. Create payloads carry no `Id`,
//! so the read-back entity has none; update payloads carry the addressed one.

use fieldbook_model::{
    Crop, Farm, FarmAudit, Financial, RecordId, RecordMapping, Task, Temperature, WeatherDay,
};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ,.'-]{0,24}").unwrap()
}

fn date() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        (2000u32..2040, 1u32..13, 1u32..29).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
    )
}

fn amount() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9
}

fn relation() -> impl Strategy<Value = Option<RecordId>> {
    prop::option::of((1i64..1_000_000).prop_map(RecordId::new))
}

fn crop() -> impl Strategy<Value = Crop> {
    (text(), text(), date(), date(), text(), amount(), text(), text()).prop_map(
        |(name, variety, planting_date, expected_harvest, field_location, quantity, status, notes)| {
            Crop {
                id: None,
                name,
                variety,
                planting_date,
                expected_harvest,
                field_location,
                quantity,
                status,
                notes,
            }
        },
    )
}

fn task() -> impl Strategy<Value = Task> {
    (
        text(),
        text(),
        date(),
        text(),
        text(),
        any::<bool>(),
        text(),
        relation(),
    )
        .prop_map(
            |(title, description, due_date, priority, category, completed, status, crop_id)| Task {
                id: None,
                title,
                description,
                due_date,
                priority,
                category,
                completed,
                status,
                crop_id,
            },
        )
}

fn financial() -> impl Strategy<Value = Financial> {
    (text(), text(), amount(), text(), date(), relation()).prop_map(
        |(kind, category, amount, description, date, crop_id)| Financial {
            id: None,
            kind,
            category,
            amount,
            description,
            date,
            crop_id,
        },
    )
}

fn farm() -> impl Strategy<Value = Farm> {
    (
        text(),
        text(),
        text(),
        text(),
        text(),
        text(),
        prop::option::of(0.0f64..100_000.0),
    )
        .prop_map(
            |(name, tags, farm_name, location, contact_email, farm_type, farm_size)| Farm {
                id: None,
                name,
                tags,
                farm_name,
                location,
                contact_email,
                farm_type,
                farm_size,
                audit: FarmAudit::default(),
            },
        )
}

fn weather_day() -> impl Strategy<Value = WeatherDay> {
    (
        date(),
        any::<i64>(),
        any::<i64>(),
        text(),
        0.0f64..100.0,
        0.0f64..100.0,
    )
        .prop_map(|(date, high, low, condition, humidity, precipitation)| WeatherDay {
            id: None,
            date,
            temperature: Temperature::new(high, low),
            condition,
            humidity,
            precipitation,
        })
}

fn assert_round_trip<E>(entity: &E) -> Result<(), TestCaseError>
where
    E: RecordMapping + PartialEq + std::fmt::Debug,
{
    let created = E::from_record(&entity.to_create_record());
    prop_assert_eq!(&created, entity);
    prop_assert_eq!(created.id(), None);

    let id = RecordId::new(41);
    let updated = E::from_record(&entity.to_update_record(id));
    prop_assert_eq!(updated.id(), Some(id));

    // Re-serializing the read-back entity is stable.
    prop_assert_eq!(created.to_create_record(), entity.to_create_record());
    Ok(())
}

// =============================================================================
// ROUND-TRIP LAW
// =============================================================================

proptest! {
    #[test]
    fn crop_round_trips(e in crop()) {
        assert_round_trip(&e)?;
    }

    #[test]
    fn task_round_trips(e in task()) {
        assert_round_trip(&e)?;
    }

    #[test]
    fn financial_round_trips(e in financial()) {
        assert_round_trip(&e)?;
    }

    #[test]
    fn farm_round_trips(e in farm()) {
        assert_round_trip(&e)?;
    }

    #[test]
    fn weather_day_round_trips(e in weather_day()) {
        assert_round_trip(&e)?;
    }

    /// The `high,low` text form carries the full integer range.
    #[test]
    fn temperature_pair_round_trips(high in any::<i64>(), low in any::<i64>()) {
        let temperature = Temperature::new(high, low);
        prop_assert_eq!(Temperature::decode(Some(&temperature.encode())), temperature);
    }

    /// Any single reading decodes to the fixed ±5 spread.
    #[test]
    fn scalar_temperature_spread(t in -1_000i64..1_000) {
        let decoded = Temperature::decode(Some(&serde_json::Value::String(t.to_string())));
        prop_assert_eq!(decoded, Temperature::new(t + 5, t - 5));
    }

    /// Decoding never panics, whatever the column holds.
    #[test]
    fn temperature_decode_is_total(s in ".{0,40}") {
        let _ = Temperature::decode(Some(&serde_json::Value::String(s)));
    }
}
