use serde::Serialize;
use sqlx::FromRow;

/// Free-form key/value metadata attached to a project.
#[derive(Debug, Serialize, FromRow)]
pub struct CustomAttribute {
    pub attribute_id: i32,
    pub project_id: i32,
    pub attr_name: String,
    pub attr_value: String,
}
