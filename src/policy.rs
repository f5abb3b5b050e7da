use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// An insurance policy record, the single entity managed by the store.
///
/// `id` is assigned by the store on `add` and is immutable afterwards.
/// Dates are kept as raw `YYYY-MM-DD` strings and the premium as the raw
/// number supplied by the caller; the store persists both as given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: u64,
    pub policy_number: String,
    pub customer_name: String,
    pub start_date: String,
    pub end_date: String,
    pub premium_amount: f64,
}

/// A policy before the store has assigned its id: the input to
/// `PolicyStore::add`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    pub policy_number: String,
    pub customer_name: String,
    pub start_date: String,
    pub end_date: String,
    pub premium_amount: f64,
}

impl PolicyDraft {
    /// Check the required string fields. Date ordering and premium sign are
    /// accepted as given.
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.policy_number.is_empty() {
            return Err(StoreError::Validation {
                field: "policyNumber",
            });
        }
        if self.customer_name.is_empty() {
            return Err(StoreError::Validation {
                field: "customerName",
            });
        }
        if self.start_date.is_empty() {
            return Err(StoreError::Validation { field: "startDate" });
        }
        if self.end_date.is_empty() {
            return Err(StoreError::Validation { field: "endDate" });
        }
        Ok(())
    }

    pub(crate) fn into_policy(self, id: u64) -> Policy {
        Policy {
            id,
            policy_number: self.policy_number,
            customer_name: self.customer_name,
            start_date: self.start_date,
            end_date: self.end_date,
            premium_amount: self.premium_amount,
        }
    }
}
