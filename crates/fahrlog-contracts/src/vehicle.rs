//! The vehicle record.
//!
//! Vehicles are read-only from the engine's perspective. The display
//! attributes are opaque except where error messages need to name the
//! vehicle for the user.

use serde::{Deserialize, Serialize};

/// A vehicle owning zero or more trips.
///
/// The `audit_protected` flag is monotonic: once set by the application it
/// is never cleared. A vehicle that was protected in the past must still be
/// protected, or its historic chain becomes unverifiable by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Storage-assigned identifier.
    pub id: i64,

    /// Manufacturer name.
    pub make: String,

    /// Model name.
    pub model: String,

    /// License plate as displayed to the user.
    pub license_plate: String,

    /// Fuel type label.
    pub fuel_type: String,

    /// Whether this vehicle's trip history must be tamper-evident.
    pub audit_protected: bool,
}

impl Vehicle {
    /// Human-readable label for error messages: `"Make Model (PLATE)"`.
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.license_plate)
    }
}
