//! Record appender abstraction
//!
//! This module defines the trait a host must implement to receive the
//! records mapped from one survey document.

use crate::domain::records::{
    ControlCondition, DischargeActivity, FieldVisitDetails, LevelSurvey, LocationInfo, Reading,
};
use crate::domain::Result;

/// Opaque handle to a visit created by an appender
///
/// Every record after the visit itself is attached through this handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldVisitHandle(usize);

impl FieldVisitHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Receiver of mapped field visit records
///
/// Calls arrive in a fixed order: the visit first, then at most one control
/// condition, at most one discharge activity, the readings, and finally the
/// level surveys.
pub trait FieldDataAppender {
    /// Create the visit for a location
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the visit.
    fn add_field_visit(
        &mut self,
        location: &LocationInfo,
        details: FieldVisitDetails,
    ) -> Result<FieldVisitHandle>;

    /// Attach the control condition
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the record is rejected.
    fn add_control_condition(
        &mut self,
        visit: &FieldVisitHandle,
        condition: ControlCondition,
    ) -> Result<()>;

    /// Attach the discharge activity
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the record is rejected.
    fn add_discharge_activity(
        &mut self,
        visit: &FieldVisitHandle,
        activity: DischargeActivity,
    ) -> Result<()>;

    /// Attach one reading
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the record is rejected.
    fn add_reading(&mut self, visit: &FieldVisitHandle, reading: Reading) -> Result<()>;

    /// Attach one level survey
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown or the record is rejected.
    fn add_level_survey(&mut self, visit: &FieldVisitHandle, survey: LevelSurvey) -> Result<()>;
}
