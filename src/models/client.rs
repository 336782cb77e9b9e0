#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Client {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// All phone numbers owned by this client, empty when there are none.
    pub phones: Vec<String>,
}
