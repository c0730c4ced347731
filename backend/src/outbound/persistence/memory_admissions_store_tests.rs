//! Constraint tests for the in-memory store.

use chrono::{DateTime, Utc};

use super::MemoryAdmissionsStore;
use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, BatchStatusOutcome, FoodRepository,
    FoodRepositoryError, FormRepository, FormRepositoryError, IdempotencyRepository,
};
use crate::domain::{
    Account, AccountId, Answer, ApplicantStatus, Application, ApplicationId, EventDay, FoodGrab,
    IdempotencyKey, Meal, MealId, MealType, Question, QuestionId,
};

fn now() -> DateTime<Utc> {
    "2026-10-02T18:00:00Z"
        .parse()
        .expect("timestamp parses")
}

fn account() -> Account {
    Account {
        id: AccountId::random(),
        email: "ada@example.com".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}

fn application(account_id: AccountId) -> Application {
    Application {
        id: ApplicationId::random(),
        account_id,
        status: ApplicantStatus::Applying,
        is_draft: true,
        created_at: now(),
        updated_at: now(),
    }
}

fn question(label: &str, order: u32) -> Question {
    Question {
        id: QuestionId::random(),
        label: label.into(),
        order,
        required: true,
    }
}

fn lunch() -> Meal {
    Meal {
        id: MealId::random(),
        day: EventDay::Saturday,
        meal_type: MealType::Lunch,
        is_active: true,
    }
}

#[tokio::test]
async fn one_application_per_account() {
    let store = MemoryAdmissionsStore::new();
    let account = account();
    store.add_account(account.clone()).expect("account registers");

    store
        .insert_application(&application(account.id))
        .await
        .expect("first insert succeeds");
    let err = store
        .insert_application(&application(account.id))
        .await
        .expect_err("second insert is refused");

    assert!(matches!(
        err,
        ApplicationRepositoryError::DuplicateKey { .. }
    ));
}

#[tokio::test]
async fn batch_updates_are_all_or_nothing() {
    let store = MemoryAdmissionsStore::new();
    let first = account();
    let second = account();
    store.add_account(first.clone()).expect("account registers");
    store.add_account(second.clone()).expect("account registers");

    let known = application(first.id);
    store
        .insert_application(&known)
        .await
        .expect("insert succeeds");
    let ghost = ApplicationId::random();

    let outcome = store
        .set_statuses(
            &[known.id, ghost],
            ApplicantStatus::Accepted,
            false,
            now(),
        )
        .await
        .expect("batch call succeeds");
    assert_eq!(outcome, BatchStatusOutcome::UnknownApplication(ghost));

    let untouched = store
        .find_application(known.id)
        .await
        .expect("lookup succeeds")
        .expect("application exists");
    assert_eq!(
        untouched.status,
        ApplicantStatus::Applying,
        "no partial write leaked"
    );

    let outcome = store
        .set_statuses(&[known.id, known.id], ApplicantStatus::Accepted, false, now())
        .await
        .expect("batch call succeeds");
    assert_eq!(
        outcome,
        BatchStatusOutcome::Applied { updated: 1 },
        "duplicate ids count once"
    );
}

#[tokio::test]
async fn question_labels_are_unique() {
    let store = MemoryAdmissionsStore::new();
    store
        .insert_question(&question("Age", 0))
        .await
        .expect("first insert succeeds");

    let err = store
        .insert_question(&question("Age", 1))
        .await
        .expect_err("label collision is refused");
    assert!(matches!(err, FormRepositoryError::DuplicateKey { .. }));

    store
        .insert_question(&question("School", 1))
        .await
        .expect("distinct label succeeds");
    let listed = store.list_questions().await.expect("list succeeds");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].label, "Age");
}

#[tokio::test]
async fn questions_come_back_in_form_order() {
    let store = MemoryAdmissionsStore::new();
    for (label, order) in [("Third", 2), ("First", 0), ("Second", 1)] {
        store
            .insert_question(&question(label, order))
            .await
            .expect("insert succeeds");
    }

    let labels: Vec<_> = store
        .list_questions()
        .await
        .expect("list succeeds")
        .into_iter()
        .map(|question| question.label)
        .collect();
    assert_eq!(labels, ["First", "Second", "Third"]);
}

#[tokio::test]
async fn answer_edits_report_missing_rows() {
    let store = MemoryAdmissionsStore::new();
    let application_id = ApplicationId::random();
    let question = question("Age", 0);

    let missing = store
        .set_answer_value(application_id, question.id, Some("24".into()))
        .await
        .expect("call succeeds");
    assert!(!missing);

    store
        .insert_answer(&Answer {
            application_id,
            question_id: question.id,
            value: None,
        })
        .await
        .expect("insert succeeds");
    let updated = store
        .set_answer_value(application_id, question.id, Some("24".into()))
        .await
        .expect("call succeeds");
    assert!(updated);

    let answers = store
        .answers_for_application(application_id)
        .await
        .expect("list succeeds");
    assert_eq!(answers[0].value.as_deref(), Some("24"));
}

#[tokio::test]
async fn meal_slots_are_unique() {
    let store = MemoryAdmissionsStore::new();
    store.insert_meal(&lunch()).await.expect("insert succeeds");

    let err = store
        .insert_meal(&lunch())
        .await
        .expect_err("slot collision is refused");
    assert!(matches!(err, FoodRepositoryError::DuplicateKey { .. }));
}

#[tokio::test]
async fn grabs_are_unique_per_meal_and_account() {
    let store = MemoryAdmissionsStore::new();
    let meal = lunch();
    store.insert_meal(&meal).await.expect("insert succeeds");
    let grab = FoodGrab {
        account_id: AccountId::random(),
        meal_id: meal.id,
        recorded_at: now(),
    };

    store.insert_grab(&grab).await.expect("first grab succeeds");
    let err = store
        .insert_grab(&grab)
        .await
        .expect_err("repeat grab is refused");
    assert!(matches!(err, FoodRepositoryError::DuplicateKey { .. }));

    let grabs = store
        .grabs_for_account(grab.account_id)
        .await
        .expect("list succeeds");
    assert_eq!(grabs.len(), 1);
}

#[tokio::test]
async fn ensure_claims_a_key_exactly_once() {
    let store = MemoryAdmissionsStore::new();
    let key = IdempotencyKey::question_label("Age");

    let first = store.ensure(&key).await.expect("ensure succeeds");
    assert!(!first.already_exists);

    let second = store.ensure(&key).await.expect("ensure succeeds");
    assert!(second.already_exists);

    let other = store
        .ensure(&IdempotencyKey::question_label("School"))
        .await
        .expect("ensure succeeds");
    assert!(!other.already_exists);
}

#[tokio::test]
async fn the_window_inserts_once_but_replaces_freely() {
    use chrono::Duration;
    use crate::domain::SubmissionWindow;

    let store = MemoryAdmissionsStore::new();
    let window = SubmissionWindow {
        opens_at: now(),
        closes_at: now() + Duration::days(7),
    };

    store
        .insert_submission_window(window)
        .await
        .expect("first insert succeeds");
    let err = store
        .insert_submission_window(window)
        .await
        .expect_err("second insert is refused");
    assert!(matches!(err, FormRepositoryError::DuplicateKey { .. }));

    let replacement = SubmissionWindow {
        opens_at: now() + Duration::days(1),
        closes_at: now() + Duration::days(8),
    };
    store
        .set_submission_window(replacement)
        .await
        .expect("replace succeeds");
    assert_eq!(
        store.submission_window().await.expect("fetch succeeds"),
        Some(replacement)
    );
}
