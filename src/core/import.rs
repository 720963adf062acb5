//! Document importer - main orchestrator for one survey document
//!
//! Gates the version, resolves the location, maps the whole document in
//! memory and only then hands the records to the appender.

use super::summary::ImportSummary;
use super::time::{parse_visit_date, VisitContext};
use super::version_gate::VersionGate;
use super::visit::{MappedVisit, VisitAssembler};
use crate::adapters::FieldDataAppender;
use crate::config::FieldVisitConfig;
use crate::domain::errors::{FieldVisitError, MappingError};
use crate::domain::ids::LocationIdentifier;
use crate::domain::records::LocationInfo;
use crate::domain::{Result, SurveyDocument};
use crate::{log_document_start, log_visit_mapped};
use std::time::Instant;

/// Maps survey documents and appends their records
pub struct DocumentImporter {
    config: FieldVisitConfig,
    gate: VersionGate,
    dry_run: bool,
}

impl DocumentImporter {
    /// Create an importer from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the version window is invalid.
    pub fn new(config: &FieldVisitConfig) -> Result<Self> {
        let gate = VersionGate::new(&config.versions.min_version, &config.versions.max_version)?;

        Ok(Self {
            config: config.clone(),
            gate,
            dry_run: config.application.dry_run,
        })
    }

    /// Map without appending anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Resolve the location a document belongs to
    ///
    /// # Errors
    ///
    /// Fails when the document has no station number, or with a configuration
    /// error when the station's UTC offset is malformed.
    pub fn resolve_location(&self, document: &SurveyDocument) -> Result<LocationInfo> {
        let station = document
            .station_number()
            .ok_or_else(|| MappingError::missing("station number", "general info"))?;

        let identifier = LocationIdentifier::new(station)
            .map_err(|_| MappingError::missing("station number", "general info"))?;
        let utc_offset = self
            .config
            .location
            .utc_offset_for(station)
            .map_err(|e| FieldVisitError::Configuration(format!("UTC offset for {station}: {e}")))?;

        Ok(LocationInfo {
            identifier,
            utc_offset,
        })
    }

    /// Map a document into records without appending them
    ///
    /// # Errors
    ///
    /// Returns [`FieldVisitError::Mapping`] for any invalid document content.
    pub fn map(&self, document: &SurveyDocument) -> Result<(LocationInfo, MappedVisit)> {
        let version = self.gate.reject_if_out_of_range(document.version.as_deref())?;
        let location = self.resolve_location(document)?;
        let visit_date = parse_visit_date(
            document
                .general_info
                .as_ref()
                .and_then(|info| info.date.as_deref()),
        )?;

        log_document_start!(location.identifier, version, visit_date);

        let visit = VisitContext::new(visit_date, location.utc_offset);
        let mapped = VisitAssembler::new(&self.config, visit, document).assemble()?;

        log_visit_mapped!(
            location.identifier,
            mapped.details.period.start,
            mapped.details.period.end,
            mapped.readings.len()
        );

        Ok((location, mapped))
    }

    /// Map a document and append its records in order
    ///
    /// The visit comes first, then the control condition, the discharge
    /// activity, the readings and the level surveys. Nothing is appended
    /// when mapping fails.
    ///
    /// # Errors
    ///
    /// Returns [`FieldVisitError::Mapping`] for invalid document content, or
    /// the appender's error when it rejects a record.
    pub fn import(
        &self,
        document: &SurveyDocument,
        appender: &mut impl FieldDataAppender,
    ) -> Result<ImportSummary> {
        let start_time = Instant::now();
        let (location, mapped) = self.map(document)?;

        let mut summary = ImportSummary::new(location.identifier.clone(), mapped.details.period);
        summary.control_conditions = usize::from(mapped.control_condition.is_some());
        summary.discharge_activities = usize::from(mapped.discharge_activity.is_some());
        summary.readings = mapped.readings.len();
        summary.level_surveys = mapped.level_surveys.len();
        summary.dry_run = self.dry_run;

        if self.dry_run {
            tracing::info!(station = %location.identifier, "Dry run, no records appended");
        } else {
            append(&location, mapped, appender)?;
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

fn append(
    location: &LocationInfo,
    mapped: MappedVisit,
    appender: &mut impl FieldDataAppender,
) -> Result<()> {
    let visit = appender.add_field_visit(location, mapped.details)?;

    if let Some(condition) = mapped.control_condition {
        appender.add_control_condition(&visit, condition)?;
    }
    if let Some(activity) = mapped.discharge_activity {
        appender.add_discharge_activity(&visit, activity)?;
    }
    for reading in mapped.readings {
        appender.add_reading(&visit, reading)?;
    }
    for survey in mapped.level_surveys {
        appender.add_level_survey(&visit, survey)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CollectingAppender;
    use serde_json::json;

    fn document(value: serde_json::Value) -> SurveyDocument {
        serde_json::from_value(value).unwrap()
    }

    fn stage_only_document() -> SurveyDocument {
        document(json!({
            "version": "v1.3.2",
            "generalInfo": { "stationNumber": "05BH004", "date": "2024/06/12" },
            "partyInfo": { "party": "JD/KL" },
            "stageMeasurements": {
                "rows": [
                    { "time": "10:00", "hg1": "1.000" },
                    { "time": "11:00", "hg1": "1.020" }
                ]
            }
        }))
    }

    fn config() -> FieldVisitConfig {
        let mut config = FieldVisitConfig::default();
        config
            .location
            .utc_offsets
            .insert("05BH004".to_string(), "-06:00".to_string());
        config
    }

    #[test]
    fn test_import_appends_visit_and_readings() {
        let importer = DocumentImporter::new(&config()).unwrap();
        let mut appender = CollectingAppender::new();

        let summary = importer.import(&stage_only_document(), &mut appender).unwrap();

        assert_eq!(summary.location.as_str(), "05BH004");
        assert_eq!(summary.readings, 2);
        assert_eq!(summary.discharge_activities, 0);
        assert_eq!(summary.total_records(), 3);
        assert_eq!(
            summary.period.start.to_rfc3339(),
            "2024-06-12T10:00:00-06:00"
        );

        let visits = appender.visits();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].utc_offset, "-06:00");
        assert_eq!(visits[0].details.party.as_deref(), Some("JD/KL"));
        assert_eq!(visits[0].readings.len(), 2);
    }

    #[test]
    fn test_dry_run_appends_nothing() {
        let importer = DocumentImporter::new(&config()).unwrap().with_dry_run(true);
        let mut appender = CollectingAppender::new();

        let summary = importer.import(&stage_only_document(), &mut appender).unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.readings, 2);
        assert!(appender.visits().is_empty());
    }

    #[test]
    fn test_unsupported_version_appends_nothing() {
        let mut doc = stage_only_document();
        doc.version = Some("v1.2".to_string());
        let importer = DocumentImporter::new(&config()).unwrap();
        let mut appender = CollectingAppender::new();

        let err = importer.import(&doc, &mut appender).unwrap_err();

        assert!(err.is_invalid_data());
        assert!(matches!(
            err,
            FieldVisitError::Mapping(MappingError::UnsupportedVersion { .. })
        ));
        assert!(appender.visits().is_empty());
    }

    #[test]
    fn test_missing_station_number_is_invalid_data() {
        let mut doc = stage_only_document();
        doc.general_info = None;
        let importer = DocumentImporter::new(&config()).unwrap();

        let err = importer.resolve_location(&doc).unwrap_err();
        assert!(matches!(
            err,
            FieldVisitError::Mapping(MappingError::MissingField { .. })
        ));
    }

    #[test]
    fn test_blank_station_number_is_invalid_data() {
        let mut doc = stage_only_document();
        if let Some(info) = doc.general_info.as_mut() {
            info.station_number = Some("   ".to_string());
        }
        let importer = DocumentImporter::new(&config()).unwrap();
        let mut appender = CollectingAppender::new();

        let err = importer.import(&doc, &mut appender).unwrap_err();
        assert!(err.is_invalid_data());
        assert!(appender.visits().is_empty());
    }

    #[test]
    fn test_unknown_station_uses_default_offset() {
        let mut doc = stage_only_document();
        if let Some(info) = doc.general_info.as_mut() {
            info.station_number = Some("07AA001".to_string());
        }
        let importer = DocumentImporter::new(&config()).unwrap();

        let location = importer.resolve_location(&doc).unwrap();
        assert_eq!(location.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_invalid_version_window_is_configuration_error() {
        let mut config = config();
        config.versions.min_version = "v2.0".to_string();

        let err = DocumentImporter::new(&config).err().unwrap();
        assert!(matches!(err, FieldVisitError::Configuration(_)));
    }
}
