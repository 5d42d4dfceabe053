use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ServiceError;

/// One persisted supplier delivery row.
///
/// Field order is the column order of the backing CSV file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupplierRecord {
    pub id: u64,
    pub supplier_name: Option<String>,
    pub address: Option<String>,
    pub quantity_liters: Option<f64>,
    pub price_per_liter: Option<f64>,
    pub submitted_by: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SupplierRecord {
    /// `quantity_liters * price_per_liter` rounded to cents, when both are known.
    pub fn earnings(&self) -> Option<f64> {
        match (self.quantity_liters, self.price_per_liter) {
            (Some(q), Some(p)) => Some(round2(q * p)),
            _ => None,
        }
    }
}

/// Read-side projection: the stored record plus derived `earnings`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupplierView {
    #[serde(flatten)]
    pub record: SupplierRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings: Option<f64>,
}

impl From<&SupplierRecord> for SupplierView {
    fn from(record: &SupplierRecord) -> Self {
        Self { earnings: record.earnings(), record: record.clone() }
    }
}

/// Payload for a new supplier record. Every field may be omitted.
///
/// `id` and `timestamp` are assigned by the store and cannot be supplied.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewSupplier {
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub quantity_liters: Option<f64>,
    #[serde(default)]
    pub price_per_liter: Option<f64>,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl NewSupplier {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_amount("quantity_liters", self.quantity_liters)?;
        check_amount("price_per_liter", self.price_per_liter)
    }

    pub(crate) fn into_record(self, id: u64, timestamp: DateTime<Utc>) -> SupplierRecord {
        SupplierRecord {
            id,
            supplier_name: non_blank(self.supplier_name),
            address: non_blank(self.address),
            quantity_liters: self.quantity_liters,
            price_per_liter: self.price_per_liter,
            submitted_by: non_blank(self.submitted_by),
            timestamp,
        }
    }
}

/// One field of a partial update.
///
/// `Absent` keeps the stored value, `Null` clears it, `Value` overwrites it.
/// Use with `#[serde(default)]` so a missing key deserializes as `Absent`.
#[derive(Clone, Debug, PartialEq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }
}

impl Patch<String> {
    fn non_blank(self) -> Self {
        match self {
            Patch::Value(s) if s.trim().is_empty() => Patch::Null,
            other => other,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Partial update over the four editable fields.
/// `submitted_by`, `id` and `timestamp` are never touched by an update.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SupplierPatch {
    #[serde(default)]
    pub supplier_name: Patch<String>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub quantity_liters: Patch<f64>,
    #[serde(default)]
    pub price_per_liter: Patch<f64>,
}

impl SupplierPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_amount("quantity_liters", self.quantity_liters.as_value().copied())?;
        check_amount("price_per_liter", self.price_per_liter.as_value().copied())
    }

    pub(crate) fn apply_to(self, record: &mut SupplierRecord) {
        self.supplier_name.non_blank().apply(&mut record.supplier_name);
        self.address.non_blank().apply(&mut record.address);
        self.quantity_liters.apply(&mut record.quantity_liters);
        self.price_per_liter.apply(&mut record.price_per_liter);
    }
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), ServiceError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ServiceError::Validation(format!("{field} must be a non-negative number")))
        }
        _ => Ok(()),
    }
}

// Blank text is stored as an empty CSV cell, which reads back as null.
fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

// Exact ties go to the even cent.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
