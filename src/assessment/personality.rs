//! Twenty-item Likert questionnaire scored into a four-letter type.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{LIKERT_MAX, LIKERT_MIDPOINT, LIKERT_MIN, PERSONALITY_QUESTION_COUNT};

#[derive(Debug, Error, PartialEq)]
pub enum PersonalityError {
    #[error("no responses submitted")]
    NoResponses,
    #[error("Invalid question ID: {0}")]
    UnknownQuestion(u32),
    #[error("response to question {question_id} must be between 1 and 7, got {value}")]
    ValueOutOfRange { question_id: u32, value: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalityTrait {
    I,
    E,
    S,
    N,
    T,
    F,
    J,
    P,
}

const CYCLE: [PersonalityTrait; 8] = [
    PersonalityTrait::I,
    PersonalityTrait::S,
    PersonalityTrait::T,
    PersonalityTrait::J,
    PersonalityTrait::E,
    PersonalityTrait::N,
    PersonalityTrait::F,
    PersonalityTrait::P,
];

/// Items cycle through `I S T J E N F P`; 17..=20 restart the cycle.
pub fn trait_for_question(question_id: u32) -> Option<PersonalityTrait> {
    if question_id == 0 || question_id > PERSONALITY_QUESTION_COUNT {
        return None;
    }
    Some(CYCLE[((question_id - 1) % 8) as usize])
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TraitScores {
    pub i: i32,
    pub e: i32,
    pub s: i32,
    pub n: i32,
    pub t: i32,
    pub f: i32,
    pub j: i32,
    pub p: i32,
}

impl TraitScores {
    fn add(&mut self, personality_trait: PersonalityTrait, delta: i32) {
        let slot = match personality_trait {
            PersonalityTrait::I => &mut self.i,
            PersonalityTrait::E => &mut self.e,
            PersonalityTrait::S => &mut self.s,
            PersonalityTrait::N => &mut self.n,
            PersonalityTrait::T => &mut self.t,
            PersonalityTrait::F => &mut self.f,
            PersonalityTrait::J => &mut self.j,
            PersonalityTrait::P => &mut self.p,
        };
        *slot += delta;
    }

    /// Ties go to the second letter of each pair.
    pub fn personality_type(&self) -> String {
        [
            if self.i > self.e { 'I' } else { 'E' },
            if self.s > self.n { 'S' } else { 'N' },
            if self.t > self.f { 'T' } else { 'F' },
            if self.j > self.p { 'J' } else { 'P' },
        ]
        .iter()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityResult {
    pub personality_type: String,
    pub scores: TraitScores,
    pub answered: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Scores a response set. Every item must be known and on the 1..=7 scale;
/// nothing is scored if any item is invalid.
pub fn analyze(responses: &BTreeMap<u32, i32>) -> Result<PersonalityResult, PersonalityError> {
    if responses.is_empty() {
        return Err(PersonalityError::NoResponses);
    }

    let mut scores = TraitScores::default();
    for (&question_id, &value) in responses {
        let personality_trait =
            trait_for_question(question_id).ok_or(PersonalityError::UnknownQuestion(question_id))?;
        if !(LIKERT_MIN..=LIKERT_MAX).contains(&value) {
            return Err(PersonalityError::ValueOutOfRange { question_id, value });
        }
        scores.add(personality_trait, value - LIKERT_MIDPOINT);
    }

    Ok(PersonalityResult {
        personality_type: scores.personality_type(),
        scores,
        answered: responses.len(),
        submitted_at: Utc::now(),
    })
}
