use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Rahul Sharma",
        "department": "Engineering",
        "role": "Software Engineer",
        "salary": 60000.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Rahul Sharma")]
    pub name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Software Engineer")]
    pub role: String,

    #[schema(example = 60000.0)]
    pub salary: f64,
}
