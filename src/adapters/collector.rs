//! In-memory appender
//!
//! Gathers every record it receives so the result of a mapping pass can be
//! inspected or written out as JSON.

use super::appender::{FieldDataAppender, FieldVisitHandle};
use crate::domain::records::{
    ControlCondition, DischargeActivity, FieldVisitDetails, LevelSurvey, LocationInfo, Reading,
};
use crate::domain::{FieldVisitError, Result};
use serde::Serialize;

/// One visit and everything attached to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedVisit {
    pub location: String,
    pub utc_offset: String,
    pub details: FieldVisitDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_condition: Option<ControlCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_activity: Option<DischargeActivity>,
    pub readings: Vec<Reading>,
    pub level_surveys: Vec<LevelSurvey>,
}

/// Appender that keeps records in memory
#[derive(Debug, Default, Serialize)]
pub struct CollectingAppender {
    visits: Vec<CollectedVisit>,
}

impl CollectingAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> &[CollectedVisit] {
        &self.visits
    }

    pub fn into_visits(self) -> Vec<CollectedVisit> {
        self.visits
    }

    /// Pretty-printed JSON of every collected visit
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a record cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.visits)?)
    }

    fn visit_mut(&mut self, handle: &FieldVisitHandle) -> Result<&mut CollectedVisit> {
        self.visits.get_mut(handle.index()).ok_or_else(|| {
            FieldVisitError::Appender(format!("Unknown field visit handle {}", handle.index()))
        })
    }
}

impl FieldDataAppender for CollectingAppender {
    fn add_field_visit(
        &mut self,
        location: &LocationInfo,
        details: FieldVisitDetails,
    ) -> Result<FieldVisitHandle> {
        self.visits.push(CollectedVisit {
            location: location.identifier.to_string(),
            utc_offset: location.utc_offset.to_string(),
            details,
            control_condition: None,
            discharge_activity: None,
            readings: Vec::new(),
            level_surveys: Vec::new(),
        });
        Ok(FieldVisitHandle::new(self.visits.len() - 1))
    }

    fn add_control_condition(
        &mut self,
        visit: &FieldVisitHandle,
        condition: ControlCondition,
    ) -> Result<()> {
        let entry = self.visit_mut(visit)?;
        if entry.control_condition.is_some() {
            return Err(FieldVisitError::Appender(format!(
                "Visit at {} already has a control condition",
                entry.location
            )));
        }
        entry.control_condition = Some(condition);
        Ok(())
    }

    fn add_discharge_activity(
        &mut self,
        visit: &FieldVisitHandle,
        activity: DischargeActivity,
    ) -> Result<()> {
        let entry = self.visit_mut(visit)?;
        if entry.discharge_activity.is_some() {
            return Err(FieldVisitError::Appender(format!(
                "Visit at {} already has a discharge activity",
                entry.location
            )));
        }
        entry.discharge_activity = Some(activity);
        Ok(())
    }

    fn add_reading(&mut self, visit: &FieldVisitHandle, reading: Reading) -> Result<()> {
        self.visit_mut(visit)?.readings.push(reading);
        Ok(())
    }

    fn add_level_survey(&mut self, visit: &FieldVisitHandle, survey: LevelSurvey) -> Result<()> {
        self.visit_mut(visit)?.level_surveys.push(survey);
        Ok(())
    }
}
