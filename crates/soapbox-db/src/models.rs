/// Database row types — these map directly to SQLite rows.
/// Distinct from the soapbox-types API models so the hash column
/// stays confined to this layer.

pub struct UserRow {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

pub struct FeedbackRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner: String,
    pub created_at: String,
}
