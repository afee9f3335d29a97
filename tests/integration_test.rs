use chrono::Utc;
use feedback_lib::config::{AppConfig, StoreBackend};
use feedback_lib::models::{Answer, NewQuestion, NewResponse, QuestionPatch, QuestionType};
use feedback_lib::{FeedbackDesk, FeedbackError, WidgetState};
use tempfile::TempDir;

fn desk_in(dir: &TempDir, seed: bool) -> FeedbackDesk {
    let config = AppConfig {
        store: StoreBackend::File {
            path: dir.path().join("feedback-store.json"),
        },
        seed_fixtures: seed,
        ..AppConfig::default()
    };
    FeedbackDesk::new(config).unwrap()
}

/// Admin publishes a question, visitors answer through the widget,
/// the dashboard sees the aggregates
#[test]
fn test_admin_widget_analytics_workflow() {
    let dir = TempDir::new().unwrap();
    let desk = desk_in(&dir, false);

    // Step 1: Sign in
    let admin = desk.session().login("admin@example.com", "password").unwrap();
    assert_eq!(desk.session().require_auth().unwrap(), admin);

    // Step 2: Draft a question, publish it
    let draft = desk
        .questions()
        .create(NewQuestion::new("Rate our checkout", QuestionType::Rating, false))
        .unwrap();
    assert!(desk.questions().list_published().unwrap().is_empty());

    let mut widget = desk.widget();
    assert!(matches!(widget.open(), Err(FeedbackError::NoPublishedQuestions)));

    desk.questions().set_published(&draft.id, true).unwrap();

    // Step 3: Visitors answer
    for stars in [5, 5, 1] {
        let mut widget = desk.widget();
        assert_eq!(widget.open().unwrap().id, draft.id);
        widget.submit(Answer::Rating(stars)).unwrap();
        assert!(matches!(widget.state(), WidgetState::Submitted { .. }));
    }

    // Step 4: Dashboard figures
    let counts: Vec<usize> = desk
        .analytics()
        .rating_distribution()
        .unwrap()
        .into_iter()
        .map(|b| b.count)
        .collect();
    assert_eq!(counts, vec![1, 0, 0, 0, 2]);

    let summary = desk.analytics().compute_summary().unwrap();
    assert_eq!(summary.total_responses, 3);
    assert!((summary.average_rating - 11.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.yes_percentage, 0.0);

    assert_eq!(desk.responses().list_by_question(&draft.id).unwrap().len(), 3);

    // Step 5: Sign out
    desk.session().logout().unwrap();
    assert!(desk.session().check_auth().unwrap().is_none());
}

#[test]
fn test_yes_no_percentage_across_questions() {
    let dir = TempDir::new().unwrap();
    let desk = desk_in(&dir, false);

    let found = desk
        .questions()
        .create(NewQuestion::new("Found it?", QuestionType::YesNo, true))
        .unwrap();
    let text = desk
        .questions()
        .create(NewQuestion::new("Anything else?", QuestionType::Text, true))
        .unwrap();

    for answer in [true, true, false] {
        desk.responses()
            .create(NewResponse::new(found.id.clone(), Answer::YesNo(answer), Utc::now()))
            .unwrap();
    }
    desk.responses()
        .create(NewResponse::new(text.id.clone(), Answer::Text("Nope".to_string()), Utc::now()))
        .unwrap();

    let summary = desk.analytics().compute_summary().unwrap();
    assert_eq!(summary.total_responses, 4);
    assert!((summary.yes_percentage - 66.666_666_666).abs() < 1e-6);
    assert_eq!(summary.average_rating, 0.0);

    let yes_no = desk.analytics().yes_no_distribution().unwrap();
    assert_eq!((yes_no.yes, yes_no.no), (2, 1));
}

#[test]
fn test_question_lifecycle_against_fixtures() {
    let dir = TempDir::new().unwrap();
    let desk = desk_in(&dir, true);

    assert_eq!(desk.questions().list_all().unwrap().len(), 3);

    let updated = desk
        .questions()
        .update("3", QuestionPatch::default().published(true))
        .unwrap();
    assert!(updated.is_published);
    assert_eq!(desk.questions().list_published().unwrap().len(), 3);

    desk.questions().delete("3").unwrap();
    assert!(desk.questions().get_by_id("3").unwrap().is_none());
    desk.questions().delete("3").unwrap();

    assert!(matches!(
        desk.questions().update("3", QuestionPatch::default().text("gone")),
        Err(FeedbackError::QuestionNotFound(_))
    ));

    // Responses to the deleted question stay listed
    desk.responses()
        .create(NewResponse::new("3", Answer::Text("late answer".to_string()), Utc::now()))
        .unwrap();
    assert_eq!(desk.responses().list_by_question("3").unwrap().len(), 1);
    assert_eq!(desk.analytics().compute_summary().unwrap().total_responses, 4);
}

#[test]
fn test_damaged_session_file_does_not_block_startup() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("feedback-store.json"),
        "{\"user\": {\"id\": \"1\", \"em",
    )
    .unwrap();

    let desk = desk_in(&dir, true);
    assert!(desk.session().check_auth().unwrap().is_none());
    assert_eq!(desk.questions().list_all().unwrap().len(), 3);
    assert_eq!(desk.analytics().compute_summary().unwrap().total_responses, 3);

    desk.session().login("admin@example.com", "password").unwrap();
    drop(desk);

    let reopened = desk_in(&dir, true);
    assert!(reopened.session().check_auth().unwrap().is_some());
}

#[test]
fn test_session_persists_between_desks() {
    let dir = TempDir::new().unwrap();

    let first = desk_in(&dir, true);
    assert!(matches!(
        first.session().login("admin@example.com", "wrong"),
        Err(FeedbackError::InvalidCredentials)
    ));
    let user = first.session().login("admin@example.com", "password").unwrap();
    drop(first);

    let second = desk_in(&dir, true);
    assert_eq!(second.session().check_auth().unwrap(), Some(user));

    // Collections are not persisted, only the session
    second
        .questions()
        .create(NewQuestion::new("Only here", QuestionType::Text, true))
        .unwrap();
    drop(second);

    let third = desk_in(&dir, true);
    assert_eq!(third.questions().list_all().unwrap().len(), 3);
    assert!(third.session().check_auth().unwrap().is_some());
}
