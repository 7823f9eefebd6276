pub const USERS: &str = "users";
pub const RATING_STATES: &str = "rating_states";
pub const TECHNICAL_PROGRESS: &str = "technical_progress";
pub const PERSONALITY_RESULTS: &str = "personality_results";
pub const FINAL_REPORTS: &str = "final_reports";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Secondary index trees
pub const USERS_BY_CREATED_AT: &str = "users_by_created_at";
