/// Usernames are case-insensitive identities.
pub fn user_key(username: &str) -> String {
    username.trim().to_lowercase()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.trim().to_lowercase())
}

pub fn user_created_at_key(timestamp_ms: i64, username: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    format!("{:020}:{}", ts, user_key(username))
}

pub fn rating_state_key(username: &str) -> String {
    user_key(username)
}

pub fn technical_progress_key(username: &str) -> String {
    user_key(username)
}

pub fn personality_result_key(username: &str) -> String {
    user_key(username)
}

pub fn final_report_key(username: &str) -> String {
    user_key(username)
}
