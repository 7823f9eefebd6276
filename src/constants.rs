/// Questions in one technical test sitting.
pub const TOTAL_TECHNICAL_QUESTIONS: u32 = 15;

/// The technical test always opens on this question.
pub const FIRST_TECHNICAL_QUESTION_ID: u32 = 1;

/// Personality questionnaire length.
pub const PERSONALITY_QUESTION_COUNT: u32 = 20;

/// Likert scale bounds and neutral point.
pub const LIKERT_MIN: i32 = 1;
pub const LIKERT_MAX: i32 = 7;
pub const LIKERT_MIDPOINT: i32 = 4;

/// Request bodies larger than this are rejected.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 50;
pub const FULLNAME_MAX_LEN: usize = 100;
