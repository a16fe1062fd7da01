use std::sync::Arc;

use quiz_core::model::{Question, QuestionId, QuizSettings};
use services::{QuizLoopService, RandomSource};
use storage::repository::{InMemoryRepository, SettingsRepository};

fn bank() -> Vec<Question> {
    vec![
        Question::new(
            QuestionId::new(1),
            "Which OSI layer contains media access control?",
            ["Physical", "Data link", "Network"],
            ["Data link"],
            false,
        )
        .unwrap(),
        Question::new(
            QuestionId::new(2),
            "Which protocols live on the transport layer?",
            ["TCP", "UDP", "IP", "HTTP", "FTP"],
            ["TCP", "UDP"],
            true,
        )
        .unwrap(),
    ]
}

fn service(repo: &InMemoryRepository) -> QuizLoopService {
    QuizLoopService::new(Arc::new(repo.clone())).with_random(RandomSource::seeded(5))
}

#[tokio::test]
async fn quiz_loop_runs_a_full_pass() {
    let repo = InMemoryRepository::new();
    let svc = service(&repo);

    let mut session = svc.start(bank()).await.unwrap();
    while !session.is_complete() {
        if !session.is_revealed() {
            let answers = session.current_question().correct_answers().to_vec();
            for answer in &answers {
                session.select_option(answer).unwrap();
            }
        }
        session.advance();
    }

    assert!(session.summary().is_perfect());
    assert_eq!(session.score(), 2);
}

#[tokio::test]
async fn starring_and_filter_are_persisted() {
    let repo = InMemoryRepository::new();
    let svc = service(&repo);

    let mut session = svc.start(bank()).await.unwrap();
    assert!(svc.toggle_star(&mut session, QuestionId::new(2)).await.unwrap());
    svc.apply_starred_filter(&mut session, true).await.unwrap();

    let stored = repo.get_settings().await.unwrap().unwrap();
    assert_eq!(stored, QuizSettings::new(true, [QuestionId::new(2)]));

    // A new session picks the stored filter up.
    let next = svc.start(bank()).await.unwrap();
    assert_eq!(next.total(), 1);
    assert_eq!(next.current_question().id(), QuestionId::new(2));
}

#[tokio::test]
async fn stale_starred_filter_falls_back_to_all_questions() {
    let repo = InMemoryRepository::new();
    repo.save_settings(&QuizSettings::new(true, [QuestionId::new(42)]))
        .await
        .unwrap();

    let session = service(&repo).start(bank()).await.unwrap();
    assert_eq!(session.total(), 2);
    assert!(session.restrict_to_starred());
}

#[tokio::test]
async fn full_reset_clears_store_and_restarts() {
    let repo = InMemoryRepository::new();
    let svc = service(&repo);

    let mut session = svc.start(bank()).await.unwrap();
    svc.toggle_star(&mut session, QuestionId::new(1)).await.unwrap();
    svc.apply_starred_filter(&mut session, true).await.unwrap();
    session.advance();
    session.advance();
    assert!(session.has_missed());

    svc.full_reset(&mut session).await.unwrap();

    assert!(repo.get_settings().await.unwrap().is_none());
    assert!(session.starred().is_empty());
    assert!(!session.restrict_to_starred());
    assert_eq!(session.total(), 2);
    assert_eq!(session.position(), 0);
    assert_eq!(session.score(), 0);
    assert!(!session.has_missed());
}

#[tokio::test]
async fn toggle_star_unknown_question_is_rejected() {
    let repo = InMemoryRepository::new();
    let svc = service(&repo);
    let mut session = svc.start(bank()).await.unwrap();

    let err = svc
        .toggle_star(&mut session, QuestionId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, services::QuizLoopError::Quiz(_)));
    assert!(repo.get_settings().await.unwrap().is_none());
}
