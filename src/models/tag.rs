use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct Tag {
    pub tag_id: i32,
    pub tag_name: String,
    pub color: String,
}
