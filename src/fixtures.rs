//! Seed data loaded into fresh in-memory collections

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Answer, Question, QuestionType, Response};

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

fn question(
    id: &str,
    text: &str,
    question_type: QuestionType,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        question_type,
        is_published,
        created_at,
        updated_at,
    }
}

fn response(id: &str, question_id: &str, answer: Answer, timestamp: DateTime<Utc>) -> Response {
    Response {
        id: id.to_string(),
        question_id: question_id.to_string(),
        answer,
        user_id: None,
        timestamp,
    }
}

pub fn seed_questions() -> Vec<Question> {
    vec![
        question(
            "1",
            "How would you rate your experience with our service?",
            QuestionType::Rating,
            true,
            at(2023, 5, 15, 0, 0),
            at(2023, 5, 15, 0, 0),
        ),
        question(
            "2",
            "Did you find what you were looking for today?",
            QuestionType::YesNo,
            true,
            at(2023, 6, 20, 0, 0),
            at(2023, 6, 22, 0, 0),
        ),
        question(
            "3",
            "Please tell us how we can improve our service",
            QuestionType::Text,
            false,
            at(2023, 7, 10, 0, 0),
            at(2023, 7, 10, 0, 0),
        ),
    ]
}

pub fn seed_responses() -> Vec<Response> {
    vec![
        response("1", "1", Answer::Rating(4), at(2023, 7, 15, 10, 30)),
        response("2", "1", Answer::Rating(5), at(2023, 7, 16, 14, 20)),
        response("3", "2", Answer::YesNo(true), at(2023, 7, 16, 15, 45)),
    ]
}
