//! Time-series readings taken during a visit
//!
//! Readings come from four places on the form: the measurement-results sensor
//! table, the environment conditions, the stage table and the discharge
//! temperatures. Numbers are parsed strictly; a present value that is not a
//! number aborts the mapping.

use super::numbers::parse_number;
use super::stage::MeanGageHeightSelector;
use super::time::{mean_of, mean_of_span, VisitContext};
use crate::config::{FieldVisitConfig, SensorConfig};
use crate::domain::document::{
    is_checked, non_blank, ArrivalDeparture, StageMeasurements, StageRow, SurveyDocument,
};
use crate::domain::ids::ReferencePointName;
use crate::domain::records::{parameters, units, Reading, ReadingType};
use crate::domain::result::MappingResult;
use crate::domain::time::TimeValue;

/// Sensor labels of the environment conditions section
pub mod sensor_labels {
    pub const WIND_SPEED: &str = "Wind Speed (km/h)";
    pub const BATTERY_VOLTAGE: &str = "Battery Voltage Under Load (V)";
    pub const TANK_PRESSURE: &str = "Tank Pressure (psi)";
    pub const TANK_FEED: &str = "Tank Feed (psi)";
    pub const BUBBLE_RATE: &str = "N2 Bubble Rate (B./min)";
}

/// Reading type named by a stage row
///
/// The row's explicit reading type wins when recognized; otherwise the
/// correction action is searched for a reset or cleaning keyword.
pub fn row_reading_type(row: &StageRow) -> Option<ReadingType> {
    if let Some(explicit) = non_blank(row.reading_type.as_deref()).and_then(ReadingType::from_label) {
        return Some(explicit);
    }

    let action: String = non_blank(row.correction_action.as_deref())?
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    [
        ("resetbefore", ReadingType::ResetBefore),
        ("resetafter", ReadingType::ResetAfter),
        ("cleaningbefore", ReadingType::CleaningBefore),
        ("cleaningafter", ReadingType::CleaningAfter),
    ]
    .into_iter()
    .find(|(keyword, _)| action.contains(keyword))
    .map(|(_, reading_type)| reading_type)
}

/// Remark attached to readings of a row with a sensor reset correction
pub fn stage_row_remark(row: &StageRow) -> Option<String> {
    let correction = non_blank(row.sensor_reset_correction.as_deref())?;
    let time = non_blank(row.time.as_deref()).unwrap_or_default();

    Some(match non_blank(row.correction_action.as_deref()) {
        Some(action) => format!("@{time} {action}. Correction:{correction}"),
        None => format!("@{time}. Correction:{correction}"),
    })
}

/// Collects every reading of one document
pub struct ReadingAssembler<'a> {
    config: &'a FieldVisitConfig,
    visit: &'a VisitContext,
    document: &'a SurveyDocument,
    series_selector: Option<MeanGageHeightSelector>,
}

impl<'a> ReadingAssembler<'a> {
    /// `series_selector` names the stage column whose included rows already
    /// went out as a discharge mean gage height series
    pub fn new(
        config: &'a FieldVisitConfig,
        visit: &'a VisitContext,
        document: &'a SurveyDocument,
        series_selector: Option<MeanGageHeightSelector>,
    ) -> Self {
        Self {
            config,
            visit,
            document,
            series_selector,
        }
    }

    pub fn assemble(&self) -> MappingResult<Vec<Reading>> {
        let mut readings = Vec::new();

        self.add_sensor_readings(&mut readings)?;
        self.add_environment_readings(&mut readings)?;
        self.add_stage_readings(&mut readings)?;
        self.add_temperature_readings(&mut readings)?;

        Ok(readings)
    }

    /// Time for environment readings that carry none of their own
    ///
    /// The discharge mean time, else the middle of the stage-row times.
    pub fn environment_time(&self) -> TimeValue {
        let mean_time = self
            .document
            .discharge_summary
            .as_ref()
            .map_or(TimeValue::Absent, |d| {
                self.visit.parse_time_or_absent(d.mean_time.as_deref())
            });

        mean_time.or_else(|| {
            mean_of_span(self.stage_rows().iter().map(|row| {
                self.visit.parse_time_or_absent(row.time.as_deref())
            }))
        })
    }

    fn stage_rows(&self) -> &[StageRow] {
        self.document
            .stage_measurements
            .as_ref()
            .map(|stage| stage.rows.as_slice())
            .unwrap_or_default()
    }

    fn add_sensor_readings(&self, readings: &mut Vec<Reading>) -> MappingResult<()> {
        let Some(results) = self.document.measurement_results.as_ref() else {
            return Ok(());
        };

        for (index, row) in results.sensors.iter().enumerate() {
            let Some(label) = non_blank(row.sensor_ref.as_deref()) else {
                continue;
            };
            let Some(sensor) = self.config.sensor(label) else {
                tracing::debug!(sensor = label, "Skipping unknown sensor");
                continue;
            };

            let Some(time) = self.visit.parse_time_or_absent(row.time.as_deref()).instant() else {
                continue;
            };

            let context = format!("sensor row {}", row.row.unwrap_or(index as u32 + 1));
            let values = [
                (&row.observed_value, "observed value", ReadingType::Routine),
                (&row.sensor_value, "sensor value", ReadingType::Reference),
            ];

            for (text, field, reading_type) in values {
                if let Some(value) = parse_number(text.as_deref(), field, &context)? {
                    readings.push(
                        sensor_reading(sensor, value)
                            .at(Some(time))
                            .of_type(reading_type),
                    );
                }
            }
        }

        Ok(())
    }

    fn add_environment_readings(&self, readings: &mut Vec<Reading>) -> MappingResult<()> {
        let Some(conditions) = self.document.environment_conditions.as_ref() else {
            return Ok(());
        };
        let inferred = self.environment_time();

        let single = [
            (sensor_labels::WIND_SPEED, &conditions.wind_speed),
            (sensor_labels::BATTERY_VOLTAGE, &conditions.battery_voltage),
        ];
        for (label, text) in single {
            self.push_environment_reading(readings, label, text.as_deref(), inferred)?;
        }

        let paired = [
            (sensor_labels::TANK_PRESSURE, &conditions.tank_pressure),
            (sensor_labels::TANK_FEED, &conditions.tank_feed),
            (sensor_labels::BUBBLE_RATE, &conditions.bubble_rate),
        ];
        for (label, pair) in paired {
            let Some(ArrivalDeparture {
                arrival,
                arrival_time,
                departure,
                departure_time,
            }) = pair
            else {
                continue;
            };

            for (value, time) in [(arrival, arrival_time), (departure, departure_time)] {
                let time = self.visit.parse_time_or_absent(time.as_deref()).or(inferred);
                self.push_environment_reading(readings, label, value.as_deref(), time)?;
            }
        }

        Ok(())
    }

    fn push_environment_reading(
        &self,
        readings: &mut Vec<Reading>,
        label: &str,
        text: Option<&str>,
        time: TimeValue,
    ) -> MappingResult<()> {
        let Some(sensor) = self.config.sensor(label) else {
            return Ok(());
        };

        if let Some(value) = parse_number(text, label, "environment conditions")? {
            readings.push(sensor_reading(sensor, value).at(time.instant()));
        }

        Ok(())
    }

    fn add_stage_readings(&self, readings: &mut Vec<Reading>) -> MappingResult<()> {
        let Some(stage) = self.document.stage_measurements.as_ref() else {
            return Ok(());
        };

        let mapping = &self.config.mapping;
        let columns = [
            (MeanGageHeightSelector::Hg1, None),
            (MeanGageHeightSelector::Hg2, None),
            (MeanGageHeightSelector::Wlr1, Some(&stage.wlr1)),
            (MeanGageHeightSelector::Wlr2, Some(&stage.wlr2)),
        ];

        for (index, row) in stage.rows.iter().enumerate() {
            let Some(time) = self.visit.parse_time_or_absent(row.time.as_deref()).instant() else {
                continue;
            };

            let context = format!("stage row {}", row.row.unwrap_or(index as u32 + 1));
            let included = is_checked(row.mgh_included.as_deref());
            let remark = stage_row_remark(row);
            let sensor_reset_correction = parse_number(
                row.sensor_reset_correction.as_deref(),
                "sensor reset correction",
                &context,
            )?;

            for (selector, water_level) in columns {
                let Some(value) =
                    parse_number(selector.row_value(row), &selector.to_string(), &context)?
                else {
                    continue;
                };

                if included && self.series_selector == Some(selector) {
                    continue;
                }

                let reading = Reading::new(parameters::GAGE_HEIGHT, units::DISTANCE, value)
                    .at(Some(time))
                    .with_comments(remark.clone());

                let reading = match water_level {
                    None => reading
                        .of_type(ReadingType::Routine)
                        .with_method(Some(mapping.logger_method_code.clone())),
                    Some(column) => reading
                        .of_type(row_reading_type(row).unwrap_or(ReadingType::Reference))
                        .with_method(Some(mapping.water_level_method_code.clone()))
                        .with_reference_point(
                            column
                                .reference_point
                                .as_deref()
                                .and_then(ReferencePointName::sanitize),
                        )
                        .with_adjustment(sensor_reset_correction),
                };

                readings.push(reading);
            }
        }

        Ok(())
    }

    fn add_temperature_readings(&self, readings: &mut Vec<Reading>) -> MappingResult<()> {
        let Some(summary) = self.document.discharge_summary.as_ref() else {
            return Ok(());
        };

        let time = self
            .visit
            .parse_time_or_absent(summary.mean_time.as_deref())
            .or_else(|| {
                mean_of(
                    self.visit.parse_time_or_absent(summary.start_time.as_deref()),
                    self.visit.parse_time_or_absent(summary.end_time.as_deref()),
                )
            })
            .instant();

        let temperatures = [
            (&summary.water_temperature, "water temperature", parameters::WATER_TEMPERATURE),
            (&summary.air_temperature, "air temperature", parameters::AIR_TEMPERATURE),
        ];

        for (text, field, parameter_id) in temperatures {
            if let Some(value) = parse_number(text.as_deref(), field, "discharge summary")? {
                readings.push(Reading::new(parameter_id, units::TEMPERATURE, value).at(time));
            }
        }

        Ok(())
    }
}

fn sensor_reading(sensor: &SensorConfig, value: f64) -> Reading {
    Reading::new(sensor.parameter_id.clone(), sensor.unit_id.clone(), value)
        .with_method(sensor.method_code.clone())
}

/// Stage rows whose mean-gage-height checkbox is set
pub fn flagged_rows(stage: &StageMeasurements) -> impl Iterator<Item = &StageRow> {
    stage
        .rows
        .iter()
        .filter(|row| is_checked(row.mgh_included.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::MappingError;
    use chrono::{FixedOffset, NaiveDate, Timelike};
    use serde_json::json;
    use test_case::test_case;

    fn visit() -> VisitContext {
        VisitContext::new(
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            FixedOffset::west_opt(6 * 3600).unwrap(),
        )
    }

    fn document(value: serde_json::Value) -> SurveyDocument {
        serde_json::from_value(value).unwrap()
    }

    fn assemble(
        document: &SurveyDocument,
        series_selector: Option<MeanGageHeightSelector>,
    ) -> MappingResult<Vec<Reading>> {
        let config = FieldVisitConfig::default();
        let visit = visit();
        ReadingAssembler::new(&config, &visit, document, series_selector).assemble()
    }

    fn stage_document() -> SurveyDocument {
        document(json!({
            "stageMeasurements": {
                "wlr1": { "referencePoint": "**BM2" },
                "rows": [
                    { "time": "10:00", "hg1": "1.000", "wl1": "0.998", "mghIncluded": "True" },
                    { "time": "11:00", "hg1": "1.020", "wl1": "1.015",
                      "sensorResetCorrection": "0.004", "correctionAction": "Reset After" },
                    { "time": "", "hg1": "1.030" }
                ]
            }
        }))
    }

    #[test_case(None, Some("Reset Before"), Some(ReadingType::ResetBefore) ; "from action")]
    #[test_case(Some("cleaning_after"), Some("Reset Before"), Some(ReadingType::CleaningAfter) ; "explicit wins")]
    #[test_case(Some("sometimes"), Some("Sensor cleaning before visit"), Some(ReadingType::CleaningBefore) ; "unknown explicit falls back")]
    #[test_case(None, Some("Adjusted"), None ; "no keyword")]
    #[test_case(None, None, None ; "nothing")]
    fn test_row_reading_type(
        explicit: Option<&str>,
        action: Option<&str>,
        expected: Option<ReadingType>,
    ) {
        let row = StageRow {
            reading_type: explicit.map(str::to_string),
            correction_action: action.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(row_reading_type(&row), expected);
    }

    #[test]
    fn test_stage_row_remark() {
        let row = StageRow {
            time: Some("11:00".to_string()),
            sensor_reset_correction: Some("0.004".to_string()),
            correction_action: Some("Reset After".to_string()),
            ..Default::default()
        };
        assert_eq!(
            stage_row_remark(&row).as_deref(),
            Some("@11:00 Reset After. Correction:0.004")
        );
        assert_eq!(stage_row_remark(&StageRow::default()), None);
    }

    #[test]
    fn test_stage_readings() {
        let readings = assemble(&stage_document(), None).unwrap();

        // Two timed rows with HG1 and WL1 each; the untimed row is skipped
        assert_eq!(readings.len(), 4);

        let logger: Vec<_> = readings
            .iter()
            .filter(|r| r.method.as_deref() == Some("Logger"))
            .collect();
        assert_eq!(logger.len(), 2);
        assert!(logger.iter().all(|r| r.reading_type == ReadingType::Routine));

        let water_level: Vec<_> = readings
            .iter()
            .filter(|r| r.method.as_deref() == Some("WaterLevelReference"))
            .collect();
        assert_eq!(water_level.len(), 2);
        assert_eq!(water_level[0].reading_type, ReadingType::Reference);
        assert_eq!(water_level[0].reference_point_name.as_ref().unwrap().as_str(), "BM2");
        assert_eq!(water_level[0].adjustment_amount, None);
        assert_eq!(water_level[1].reading_type, ReadingType::ResetAfter);
        assert_eq!(water_level[1].adjustment_amount, Some(0.004));
        assert_eq!(
            water_level[1].comments.as_deref(),
            Some("@11:00 Reset After. Correction:0.004")
        );
    }

    #[test]
    fn test_series_column_skips_included_rows() {
        let readings = assemble(&stage_document(), Some(MeanGageHeightSelector::Hg1)).unwrap();

        let logger: Vec<_> = readings
            .iter()
            .filter(|r| r.method.as_deref() == Some("Logger"))
            .collect();
        assert_eq!(logger.len(), 1);
        assert_eq!(logger[0].value, 1.020);
        assert_eq!(readings.len(), 3);
    }

    #[test]
    fn test_sensor_table_readings() {
        let document = document(json!({
            "measurementResults": {
                "sensors": [
                    { "sensorRef": "Head Stage (m)", "time": "10:30",
                      "observedValue": "1.234", "sensorValue": "1.230" },
                    { "sensorRef": "Mystery Probe", "time": "10:30", "observedValue": "5" },
                    { "sensorRef": "Head Stage (m)", "time": "", "observedValue": "1.1" }
                ]
            }
        }));

        let readings = assemble(&document, None).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].parameter_id, "HD");
        assert_eq!(readings[0].reading_type, ReadingType::Routine);
        assert_eq!(readings[1].reading_type, ReadingType::Reference);
        assert_eq!(readings[1].time.unwrap().minute(), 30);
    }

    #[test]
    fn test_environment_readings_use_inferred_time() {
        let document = document(json!({
            "environmentConditions": {
                "windSpeed": "12",
                "batteryVoltage": "12.6",
                "tankPressure": { "arrival": "40", "arrivalTime": "09:05", "departure": "38" }
            },
            "stageMeasurements": {
                "rows": [ { "time": "10:00" }, { "time": "12:00" } ]
            }
        }));

        let readings = assemble(&document, None).unwrap();
        assert_eq!(readings.len(), 4);
        assert_eq!(readings[0].parameter_id, "WS");
        assert_eq!(readings[0].time.unwrap().hour(), 11);
        let tank: Vec<_> = readings.iter().filter(|r| r.parameter_id == "PT").collect();
        assert_eq!(tank[0].time.unwrap().minute(), 5);
        assert_eq!(tank[1].time.unwrap().hour(), 11);
    }

    #[test]
    fn test_discharge_mean_time_is_preferred() {
        let document = document(json!({
            "environmentConditions": { "windSpeed": "12" },
            "dischargeSummary": { "meanTime": "13:20", "waterTemperature": "8.5", "airTemperature": "" },
            "stageMeasurements": { "rows": [ { "time": "10:00" } ] }
        }));

        let readings = assemble(&document, None).unwrap();
        assert_eq!(readings.len(), 2);
        assert!(readings.iter().all(|r| r.time.unwrap().hour() == 13));
        assert_eq!(readings[1].parameter_id, parameters::WATER_TEMPERATURE);
        assert_eq!(readings[1].unit_id, units::TEMPERATURE);
    }

    #[test]
    fn test_temperature_time_falls_back_to_period_middle() {
        let document = document(json!({
            "dischargeSummary": { "startTime": "10:00", "endTime": "10:45", "airTemperature": "21" }
        }));

        let readings = assemble(&document, None).unwrap();
        let time = readings[0].time.unwrap();
        assert_eq!((time.hour(), time.minute(), time.second()), (10, 22, 0));
    }

    #[test]
    fn test_unparsable_reading_is_fatal() {
        let document = document(json!({
            "environmentConditions": { "batteryVoltage": "twelve" }
        }));

        let err = assemble(&document, None).unwrap_err();
        assert!(matches!(err, MappingError::InvalidNumber { ref value, .. } if value == "twelve"));
    }
}
