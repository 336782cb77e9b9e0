#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Phone {
    pub id: i32,
    pub client_id: i32,
    pub phone_number: String,
}
