//! Analytics aggregator
//!
//! Statistics are derived on demand from the response collection joined
//! against the current question types; nothing here is stored.
//!
//! A response takes part in the rating or yes/no figures only when its
//! question still exists, has that type, and the answer has the matching
//! shape. Every response counts toward `total_responses`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::app_log;
use crate::error::FeedbackResult;
use crate::logger::LogLevel;
use crate::models::{Answer, Question, QuestionType, Response};
use crate::repository::{QuestionStore, ResponseStore};
use crate::responses::{MAX_RATING, MIN_RATING};

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub total_responses: usize,
    /// Mean star rating, 0 when there are no rating responses
    pub average_rating: f64,
    /// Share of yes answers in percent, 0 when there are no yes/no responses
    pub yes_percentage: f64,
}

/// Count of responses for one star value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingBucket {
    pub stars: u8,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct YesNoDistribution {
    pub yes: usize,
    pub no: usize,
}

/// Figures for a single question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionStats {
    pub question_id: String,
    pub response_count: usize,
    pub average_rating: Option<f64>,
    pub yes_no: Option<YesNoDistribution>,
}

/// One row of the admin responses table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseRow {
    pub response: Response,
    /// `None` when the question was deleted
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub display_answer: String,
}

#[derive(Clone)]
pub struct AnalyticsAggregator {
    responses: ResponseStore,
    questions: QuestionStore,
}

/// Responses split by the type of the question they answer
#[derive(Default)]
struct Joined {
    total: usize,
    ratings: Vec<u8>,
    yes_no: YesNoDistribution,
}

impl Joined {
    fn build(responses: &[Response], types: &HashMap<String, QuestionType>) -> Self {
        let mut joined = Joined {
            total: responses.len(),
            ..Joined::default()
        };

        for response in responses {
            match (types.get(&response.question_id), &response.answer) {
                (Some(QuestionType::Rating), Answer::Rating(stars)) => joined.ratings.push(*stars),
                (Some(QuestionType::YesNo), Answer::YesNo(true)) => joined.yes_no.yes += 1,
                (Some(QuestionType::YesNo), Answer::YesNo(false)) => joined.yes_no.no += 1,
                _ => {}
            }
        }

        joined
    }

    fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.ratings.iter().map(|&s| u64::from(s)).sum();
        sum as f64 / self.ratings.len() as f64
    }

    fn yes_percentage(&self) -> f64 {
        let answered = self.yes_no.yes + self.yes_no.no;
        if answered == 0 {
            return 0.0;
        }
        self.yes_no.yes as f64 / answered as f64 * 100.0
    }
}

pub fn rating_label(stars: u8) -> String {
    if stars == 1 {
        "1 Star".to_string()
    } else {
        format!("{} Stars", stars)
    }
}

impl AnalyticsAggregator {
    pub fn new(responses: ResponseStore, questions: QuestionStore) -> Self {
        Self {
            responses,
            questions,
        }
    }

    fn question_types(&self) -> FeedbackResult<HashMap<String, QuestionType>> {
        Ok(self
            .questions
            .list()?
            .into_iter()
            .map(|q| (q.id, q.question_type))
            .collect())
    }

    fn joined(&self) -> FeedbackResult<Joined> {
        let types = self.question_types()?;
        let responses = self.responses.list()?;
        Ok(Joined::build(&responses, &types))
    }

    pub fn compute_summary(&self) -> FeedbackResult<ResponseSummary> {
        let joined = self.joined()?;
        let summary = ResponseSummary {
            total_responses: joined.total,
            average_rating: joined.average_rating(),
            yes_percentage: joined.yes_percentage(),
        };
        app_log!(
            LogLevel::Debug,
            "Computed summary over {} responses",
            summary.total_responses
        );
        Ok(summary)
    }

    /// Counts for stars 1..=5, always five buckets in ascending order
    pub fn rating_distribution(&self) -> FeedbackResult<Vec<RatingBucket>> {
        let joined = self.joined()?;
        Ok((MIN_RATING..=MAX_RATING)
            .map(|stars| RatingBucket {
                stars,
                count: joined.ratings.iter().filter(|&&s| s == stars).count(),
                label: rating_label(stars),
            })
            .collect())
    }

    /// Whether the rating chart has anything to show
    pub fn has_rating_data(&self) -> FeedbackResult<bool> {
        Ok(self.rating_distribution()?.iter().any(|b| b.count > 0))
    }

    pub fn yes_no_distribution(&self) -> FeedbackResult<YesNoDistribution> {
        Ok(self.joined()?.yes_no)
    }

    /// Figures for one question; `None` when the question does not exist
    pub fn question_stats(&self, question_id: &str) -> FeedbackResult<Option<QuestionStats>> {
        let Some(question) = self.questions.get(question_id)? else {
            return Ok(None);
        };

        let responses: Vec<Response> = self
            .responses
            .list()?
            .into_iter()
            .filter(|r| r.question_id == question_id)
            .collect();

        let types = HashMap::from([(question.id.clone(), question.question_type)]);
        let joined = Joined::build(&responses, &types);

        Ok(Some(QuestionStats {
            question_id: question.id,
            response_count: responses.len(),
            average_rating: (question.question_type == QuestionType::Rating)
                .then(|| joined.average_rating()),
            yes_no: (question.question_type == QuestionType::YesNo).then_some(joined.yes_no),
        }))
    }

    /// Responses joined with their question for the admin table, newest first
    pub fn response_rows(&self) -> FeedbackResult<Vec<ResponseRow>> {
        let questions: HashMap<String, Question> = self
            .questions
            .list()?
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect();

        let mut rows: Vec<ResponseRow> = self
            .responses
            .list()?
            .into_iter()
            .map(|response| {
                let question = questions.get(&response.question_id);
                ResponseRow {
                    question_text: question.map(|q| q.text.clone()),
                    question_type: question.map(|q| q.question_type),
                    display_answer: response.answer.to_string(),
                    response,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.response.timestamp.cmp(&a.response.timestamp));
        Ok(rows)
    }
}
