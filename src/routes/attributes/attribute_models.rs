use serde::{Deserialize, Serialize};

// Attribute upsert request
#[derive(Deserialize)]
pub struct AddAttributeRequest {
    pub attr_name: String,
    pub attr_value: String,
}

// Deletion response
#[derive(Serialize)]
pub struct DeleteAttributeResponse {
    pub success: bool,
    pub message: String,
}
