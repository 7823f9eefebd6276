//! Final report: folds the three earlier stages into a skill level and asks
//! the LLM for a career roadmap.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::technical::TechnicalProgress;
use crate::gap::engine::GapEngine;
use crate::gap::GapError;
use crate::services::llm_provider::{ChatMessage, LlmError, LlmProvider};
use crate::store::{Store, StoreError};

pub const UNKNOWN_PERSONALITY: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Gap(#[from] GapError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Basic,
    Adept,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Basic => "basic",
            SkillLevel::Adept => "adept",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub average_rating: i32,
    /// `"{solved},{milestone_number}"`.
    pub technical_test: String,
    pub personality_type: String,
    pub skill_level: SkillLevel,
    pub career_guidance: String,
    pub generated_at: DateTime<Utc>,
}

/// Everything the report is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInputs {
    pub average_rating: i32,
    pub solved: u32,
    pub milestone_number: u32,
    pub personality_type: String,
}

impl ReportInputs {
    pub fn gather(store: &Store, gap: &GapEngine, username: &str) -> Result<Self, ReportError> {
        let average_rating = gap
            .summary(username)?
            .map(|summary| summary.average_rating)
            .unwrap_or(0);
        let progress = store
            .get_technical_progress(username)?
            .unwrap_or_else(TechnicalProgress::default);
        let personality_type = store
            .get_personality_result(username)?
            .map(|result| result.personality_type)
            .unwrap_or_else(|| UNKNOWN_PERSONALITY.to_string());

        Ok(Self {
            average_rating,
            solved: progress.solved,
            milestone_number: milestone_number(&progress.milestone),
            personality_type,
        })
    }

    pub fn skill_level(&self) -> SkillLevel {
        skill_level(self.solved, self.milestone_number)
    }

    pub fn technical_summary(&self) -> String {
        format!("{},{}", self.solved, self.milestone_number)
    }
}

/// Leading integer of a milestone label; labels that do not start with a
/// number ("Completed 15 Questions", "Test Ended: ...", "Not Started") give 0.
pub fn milestone_number(label: &str) -> u32 {
    label
        .split_whitespace()
        .next()
        .and_then(|word| word.parse().ok())
        .unwrap_or(0)
}

pub fn skill_level(solved: u32, milestone_number: u32) -> SkillLevel {
    if solved == 0 {
        SkillLevel::Beginner
    } else if solved == milestone_number {
        SkillLevel::Basic
    } else if solved > milestone_number.saturating_add(5) {
        SkillLevel::Advanced
    } else if solved > milestone_number {
        SkillLevel::Adept
    } else {
        SkillLevel::Beginner
    }
}

const ROLE_ROADMAPS: &[(&str, &str)] = &[
    ("Frontend Developer", "frontend"),
    ("Backend Developer", "backend"),
    ("DevOps Engineer", "devops"),
    ("Full Stack Developer", "fullstack"),
    ("AI Engineer", "ai"),
    ("Data Analyst", "data-analyst"),
    ("AI and Data Scientist", "ai-and-data-scientist"),
    ("Android Developer", "android"),
    ("iOS Developer", "ios"),
    ("PostgreSQL Developer", "postgresql"),
    ("Blockchain Developer", "blockchain"),
    ("QA Engineer", "qa"),
    ("Software Architect", "software-architect"),
    ("Cyber Security Specialist", "cyber-security"),
    ("UX Designer", "ux"),
    ("Game Developer", "game-developer"),
    ("Technical Writer", "technical-writer"),
    ("MLOps Engineer", "mlops"),
    ("Product Manager", "product-manager"),
    ("Engineering Manager", "engineering-manager"),
    ("Developer Relations Specialist", "developer-relations"),
];

const SKILL_ROADMAPS: &[(&str, &str)] = &[
    ("Computer Science", "computer-science"),
    ("React Developer", "react"),
    ("Vue Developer", "vue"),
    ("Angular Developer", "angular"),
    ("JavaScript Developer", "javascript"),
    ("Node.js Developer", "nodejs"),
    ("TypeScript Developer", "typescript"),
    ("Python Developer", "python"),
    ("SQL Developer", "sql"),
    ("System Design", "system-design"),
    ("API Design", "api-design"),
    ("ASP.NET Core Developer", "aspnet-core"),
    ("Java Developer", "java"),
    ("C++ Developer", "cpp"),
    ("Flutter Developer", "flutter"),
    ("Spring Boot Developer", "spring-boot"),
    ("Go Developer", "go"),
    ("Rust Developer", "rust"),
    ("GraphQL Developer", "graphql"),
    ("Design and Architecture", "design-and-architecture"),
    ("Design System", "design-system"),
    ("React Native Developer", "react-native"),
    ("AWS Developer", "aws"),
    ("Code Review", "code-review"),
    ("Docker", "docker"),
    ("Kubernetes", "kubernetes"),
    ("Linux", "linux"),
    ("MongoDB Developer", "mongodb"),
    ("Prompt Engineering", "prompt-engineering"),
    ("Terraform", "terraform"),
    ("Data Structures & Algorithms", "data-structures"),
    ("Git and GitHub", "git"),
    ("Redis Developer", "redis"),
    ("PHP Developer", "php"),
    ("Cloudflare", "cloudflare"),
];

const ROADMAP_SECTIONS: &str = "\
### 1. Core Programming Languages & Technologies
- Which languages and technologies should I master, ranked for my skill level, and why?
- Link the official documentation and the best learning resources.

### 2. Learning Strategies
- Given my personality type, how do I improve fastest: courses, projects, competitive programming or something else?
- Break it down into daily, weekly and monthly habits, and how to avoid burnout.

### 3. Career Paths That Match My Strengths
- Rank suitable career tracks from entry level to advanced, with the skills each requires.

### 4. Critical Mistakes to Avoid
- Common mistakes at my level, with real examples and how to fix them.

### 5. Resources
- Top courses, books and platforms by topic, prioritising free, high-quality material.

### 6. Milestones & Benchmarks
- What should I be able to build after 1 month, 3 months, 6 months and 1 year?
- Suggest challenges and mini-projects that prove each checkpoint.
";

/// The career-roadmap prompt sent to the LLM as a single user message.
pub fn career_prompt(average_rating: i32, personality_type: &str, level: SkillLevel) -> String {
    let mut prompt = format!(
        "I want a clear, no-nonsense roadmap to a strong career in programming.\n\n\
         My coding proficiency is rated {average_rating} on a scale of 800 to 1600; \
         1200 is the minimum for a competent developer, so anything below it means my \
         foundations need a structured fix.\n\
         My personality type is '{personality_type}', which shapes how I learn and solve problems.\n\
         I am a {level} programmer and want a direct path to level up.\n\n\
         Provide a detailed, structured career roadmap covering:\n\n"
    );
    prompt.push_str(ROADMAP_SECTIONS);

    prompt.push_str(
        "\n### 7. Roadmaps\nPick the most relevant roadmap(s) for me from this list and link them directly:\n\n**Role-based:**\n",
    );
    for (name, slug) in ROLE_ROADMAPS {
        prompt.push_str(&format!("- [{name}](https://roadmap.sh/{slug})\n"));
    }
    prompt.push_str("\n**Skill-based:**\n");
    for (name, slug) in SKILL_ROADMAPS {
        prompt.push_str(&format!("- [{name}](https://roadmap.sh/{slug})\n"));
    }

    prompt.push_str(
        "\n### Final instructions\n\
         - Be as detailed as possible, with real-world examples.\n\
         - Include step-by-step plans and direct action points.\n\
         - If several roadmaps apply, rank them and justify the choice.\n",
    );
    prompt
}

/// Builds, stores and returns a fresh report for `username`.
pub async fn generate(
    store: &Store,
    gap: &GapEngine,
    llm: &LlmProvider,
    username: &str,
) -> Result<FinalReport, ReportError> {
    let inputs = ReportInputs::gather(store, gap, username)?;
    let level = inputs.skill_level();
    let prompt = career_prompt(inputs.average_rating, &inputs.personality_type, level);

    tracing::info!(
        username,
        average_rating = inputs.average_rating,
        solved = inputs.solved,
        skill_level = %level,
        "Requesting career guidance"
    );
    let career_guidance = llm.chat(vec![ChatMessage::user(prompt)]).await?;

    let report = FinalReport {
        average_rating: inputs.average_rating,
        technical_test: inputs.technical_summary(),
        personality_type: inputs.personality_type,
        skill_level: level,
        career_guidance,
        generated_at: Utc::now(),
    };
    store.set_final_report(username, &report)?;
    Ok(report)
}
