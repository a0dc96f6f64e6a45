//! Customer Models
//! Mission: Customer record and its request/response shapes

use serde::{Deserialize, Serialize};

/// A stored customer record with audit timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub create_date: String,
    pub update_date: String,
}

/// Create/update request body
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub email: String,
}

/// Customer response (no audit timestamps)
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub email: String,
}

impl CustomerResponse {
    pub fn from_record(record: &CustomerRecord) -> Self {
        Self {
            id: record.id,
            firstname: record.firstname.clone(),
            lastname: record.lastname.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
        }
    }
}
