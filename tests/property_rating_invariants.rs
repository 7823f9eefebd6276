use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use assessment_backend::gap::config::GapConfig;
use assessment_backend::gap::pool::QuestionPool;
use assessment_backend::gap::rating::{evaluate, updated_rating};
use assessment_backend::gap::selector::select_next;
use assessment_backend::gap::types::{Difficulty, Question, RatingState, Selection, Topic};

const TOPICS: [&str; 3] = ["Databases", "Networking", "Security"];

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

fn pool(config: &GapConfig, per_tier: u32) -> QuestionPool {
    let mut questions = Vec::new();
    let mut id = 1;
    for topic in &config.topics {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..per_tier {
                questions.push(Question {
                    id,
                    topic: topic.clone(),
                    difficulty,
                    prompt: format!("q{id}"),
                    options: vec!["a".to_string(), "b".to_string()],
                    answer: "a".to_string(),
                    prerequisites: vec![],
                });
                id += 1;
            }
        }
    }
    QuestionPool::from_questions(questions, config).expect("valid pool")
}

proptest! {
    #[test]
    fn pt_rating_stays_within_bounds(
        current in 500_i32..=1600,
        difficulty in difficulty_strategy(),
        correct in any::<bool>(),
    ) {
        let cfg = GapConfig::default();
        let next = updated_rating(current, difficulty, correct, &cfg.rating);
        prop_assert!((500..=1600).contains(&next));
        if correct {
            prop_assert!(next >= current);
        } else {
            prop_assert!(next <= current);
        }
    }

    #[test]
    fn pt_average_is_floored_mean_after_any_answers(
        answers in prop::collection::vec((0_usize..3, difficulty_strategy(), any::<bool>()), 0..60),
    ) {
        let cfg = GapConfig::with_topics(TOPICS);
        let mut state = RatingState::new(&cfg);
        for (topic_index, difficulty, correct) in answers {
            let topic = Topic::from(TOPICS[topic_index]);
            let (rating, next) = evaluate(state, &topic, difficulty, correct, &cfg).expect("known topic");
            prop_assert!((500..=1600).contains(&rating));
            state = next;
        }

        let sum: i32 = state.topic_ratings().values().sum();
        prop_assert_eq!(state.average_rating(), sum.div_euclid(3));
        prop_assert_eq!(state.topic_ratings().len(), 3);
    }

    #[test]
    fn pt_selection_never_repeats_and_bounds_history(seed in any::<u64>(), per_tier in 1_u32..4) {
        let cfg = GapConfig::with_topics(TOPICS);
        let pool = pool(&cfg, per_tier);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = RatingState::new(&cfg);
        let mut seen = HashSet::new();

        for _ in 0..pool.len() + 5 {
            let (selection, next) = select_next(state, &pool, &cfg, &mut rng);
            state = next;
            prop_assert!(state.topic_history().len() <= cfg.selection.history_limit);
            for topic in &cfg.topics {
                prop_assert!(state.history_count(topic) <= cfg.selection.rotation_limit);
            }
            if let Selection::Presented(question) = selection {
                prop_assert!(question.id > 0);
                prop_assert!(seen.insert(question.id), "question {} served twice", question.id);
            }
        }
    }
}
