//! End-to-end session behavior against the in-memory store.

use survey_flow::{
    AnswerKey, AnswerValue, FetchMode, Question, QuestionOption, QuestionType, ResponseSession,
    SessionError, SessionState, StoreError, SubmitError, SurveyDefinition, SurveyStatus,
    TestStore,
};

fn feedback_survey() -> SurveyDefinition {
    SurveyDefinition::new(
        1,
        "Customer feedback",
        vec![
            Question::new(10, QuestionType::Text, "What did you think?").required(),
            Question::new(11, QuestionType::StarRating, "Rate us"),
        ],
    )
    .with_status(SurveyStatus::Published)
}

fn store_with(survey: SurveyDefinition) -> TestStore {
    TestStore::new().with_survey(survey)
}

#[tokio::test]
async fn navigation_clamps_to_question_range() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(store, 1, FetchMode::Published)
        .await
        .unwrap();

    assert!(session.is_first());
    session.previous();
    session.previous();
    assert_eq!(session.current_index(), 0);

    for _ in 0..10 {
        session.next();
    }
    assert_eq!(session.current_index(), 1);
    assert!(session.is_last());

    session.previous();
    assert_eq!(session.current_index(), 0);
}

#[tokio::test]
async fn missing_survey_reports_not_found() {
    let store = TestStore::new();
    let err = ResponseSession::open(store, 99, FetchMode::Published)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound));
}

#[tokio::test]
async fn draft_survey_is_invisible_to_respondents_but_previews() {
    let draft = feedback_survey().with_status(SurveyStatus::Draft);

    let store = store_with(draft.clone());
    let err = ResponseSession::open(store, 1, FetchMode::Published)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound));

    let store = store_with(draft);
    let session = ResponseSession::open(store, 1, FetchMode::Preview)
        .await
        .unwrap();
    assert_eq!(session.state(), SessionState::Active);
}

#[tokio::test]
async fn answers_round_trip_through_the_session() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(store, 1, FetchMode::Published)
        .await
        .unwrap();

    session.answer_current("loved it").unwrap();
    assert_eq!(
        session.answers().get(&AnswerKey::Question(10)),
        Some(&AnswerValue::Text("loved it".to_string()))
    );

    session.answer(11u64, 4.0).unwrap();
    assert_eq!(
        session.answers().get(&AnswerKey::Question(11)),
        Some(&AnswerValue::Number(4.0))
    );
}

#[tokio::test]
async fn checkbox_toggle_is_a_set_operation() {
    let survey = SurveyDefinition::new(
        2,
        "Toppings",
        vec![Question::new(20, QuestionType::Checkbox, "Pick some").with_options(vec![
            QuestionOption::bare("olives"),
            QuestionOption::bare("basil"),
        ])],
    )
    .with_status(SurveyStatus::Published);

    let mut session = ResponseSession::open(store_with(survey), 2, FetchMode::Published)
        .await
        .unwrap();

    session.toggle_selection(20, "olives").unwrap();
    session.toggle_selection(20, "basil").unwrap();
    session.toggle_selection(20, "olives").unwrap();

    assert_eq!(
        session.answers().get(&AnswerKey::Question(20)),
        Some(&AnswerValue::Selections(vec!["basil".to_string()]))
    );
}

#[tokio::test]
async fn submit_refuses_until_required_questions_are_answered() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(store, 1, FetchMode::Published)
        .await
        .unwrap();

    // Question 10 is required and still blank.
    let err = session.submit().await.unwrap_err();
    match err {
        SubmitError::MissingRequired { missing } => assert_eq!(missing, vec![10]),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.state(), SessionState::Active);

    // Fill it in, navigate forward, and submit from the last question.
    session.answer_current("hello").unwrap();
    session.next();
    session.submit().await.unwrap();
    assert_eq!(session.state(), SessionState::Submitted);
}

#[tokio::test]
async fn submitted_sessions_are_read_only() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(&store, 1, FetchMode::Published)
        .await
        .unwrap();

    session.answer_current("hello").unwrap();
    session.next();
    session.submit().await.unwrap();

    // Submitted sessions refuse further writes and repeat submissions.
    assert!(matches!(
        session.answer(10u64, "late edit"),
        Err(SessionError::AlreadySubmitted)
    ));
    assert!(matches!(
        session.toggle_selection(10, "x"),
        Err(SessionError::AlreadySubmitted)
    ));
    assert!(matches!(
        session.submit().await,
        Err(SubmitError::AlreadySubmitted)
    ));
    assert_eq!(store.create_calls(), 1);
}

#[tokio::test]
async fn recorded_submission_omits_unanswered_questions() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(&store, 1, FetchMode::Published)
        .await
        .unwrap();

    session.answer(10u64, "hello").unwrap();
    session.next();
    session.submit().await.unwrap();

    assert_eq!(store.create_calls(), 1);
    let submissions = store.submissions();
    assert_eq!(submissions.len(), 1);

    let recorded = &submissions[0];
    assert_eq!(recorded.survey_id, 1);
    assert_eq!(recorded.session_id, session.session_id().to_string());

    // The unanswered rating (question 11) is absent, not null.
    assert_eq!(recorded.responses.len(), 1);
    assert_eq!(recorded.responses[0].question_id, 10);
    assert_eq!(
        recorded.responses[0].answer,
        AnswerValue::Text("hello".to_string())
    );
}

#[tokio::test]
async fn answering_an_optional_question_does_not_satisfy_a_required_one() {
    let store = store_with(feedback_survey());
    let mut session = ResponseSession::open(store, 1, FetchMode::Published)
        .await
        .unwrap();

    // Only the optional rating is answered; the required text is not.
    session.answer(11u64, 5.0).unwrap();
    let err = session.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::MissingRequired { missing } if missing == vec![10]
    ));
}

#[tokio::test]
async fn preview_sessions_never_contact_the_store_on_submit() {
    let survey = feedback_survey().with_status(SurveyStatus::Draft);
    let store = store_with(survey);
    let mut session = ResponseSession::open(&store, 1, FetchMode::Preview)
        .await
        .unwrap();

    session.answer(10u64, "dry run").unwrap();
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::PreviewOnly));
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn failed_submission_keeps_answers_and_allows_retry() {
    let store = store_with(feedback_survey());
    store.fail_next_submit(StoreError::Server("database down".to_string()));

    let mut session = ResponseSession::open(&store, 1, FetchMode::Published)
        .await
        .unwrap();
    session.answer(10u64, "hello").unwrap();

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Store(StoreError::Server(_))));
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(
        session.answers().get(&AnswerKey::Question(10)),
        Some(&AnswerValue::Text("hello".to_string()))
    );

    session.submit().await.unwrap();
    assert_eq!(session.state(), SessionState::Submitted);
    assert_eq!(store.create_calls(), 2);
    assert_eq!(store.submissions().len(), 1);
}

#[tokio::test]
async fn contact_followup_parts_submit_as_separate_entries() {
    let survey = SurveyDefinition::new(
        3,
        "Stay in touch",
        vec![Question::new(12, QuestionType::ContactFollowup, "Anything else?").required()],
    )
    .with_status(SurveyStatus::Published);

    let store = store_with(survey);
    let mut session = ResponseSession::open(&store, 3, FetchMode::Published)
        .await
        .unwrap();

    // A required compound question is satisfied by either part.
    session.answer(AnswerKey::Phone(12), "0241234567").unwrap();
    assert!(session.validate().is_empty());
    session.answer(AnswerKey::Comments(12), "call after five").unwrap();
    session.submit().await.unwrap();

    // Both parts go out as separate entries under the bare numeric id.
    let submissions = store.submissions();
    let entries = &submissions[0].responses;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.question_id == 12));
    assert_eq!(
        entries[0].answer,
        AnswerValue::Text("call after five".to_string())
    );
    assert_eq!(
        entries[1].answer,
        AnswerValue::Text("0241234567".to_string())
    );
}
