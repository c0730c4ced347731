//! Badge-scan tests over mocked storage ports.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::MockClock;
use rstest::rstest;

use super::answer_key;
use crate::domain::ports::{
    MockApplicationRepository, MockFoodRepository, MockFormRepository,
};
use crate::domain::{
    Account, AccountId, Answer, ApplicantStatus, Application, ApplicationId, CheckInService,
    ErrorCode, EventDay, FoodGrab, Meal, MealId, MealType, Question, QuestionId,
};

fn now() -> DateTime<Utc> {
    "2026-10-02T18:00:00Z"
        .parse()
        .expect("timestamp parses")
}

fn pinned_clock(at: DateTime<Utc>) -> MockClock {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(at);
    clock
}

fn account() -> Account {
    Account {
        id: AccountId::random(),
        email: "ada@example.com".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}

fn application(account_id: AccountId, status: ApplicantStatus) -> Application {
    Application {
        id: ApplicationId::random(),
        account_id,
        status,
        is_draft: false,
        created_at: now() - Duration::days(3),
        updated_at: now() - Duration::days(1),
    }
}

fn empty_forms() -> MockFormRepository {
    let mut forms = MockFormRepository::new();
    forms.expect_list_questions().returning(|| Ok(Vec::new()));
    forms
        .expect_answers_for_application()
        .returning(|_| Ok(Vec::new()));
    forms
}

fn empty_food() -> MockFoodRepository {
    let mut food = MockFoodRepository::new();
    food.expect_list_meals().returning(|| Ok(Vec::new()));
    food.expect_grabs_for_account().returning(|_| Ok(Vec::new()));
    food
}

fn counted(mut applications: MockApplicationRepository) -> MockApplicationRepository {
    applications
        .expect_count_with_status()
        .withf(|statuses| statuses == [ApplicantStatus::ScannedIn])
        .returning(|_| Ok(7));
    applications
        .expect_count_with_status()
        .withf(|statuses| {
            statuses == [ApplicantStatus::WalkIn, ApplicantStatus::WalkInSubmitted]
        })
        .returning(|_| Ok(2));
    applications
}

fn service(
    applications: MockApplicationRepository,
    forms: MockFormRepository,
    food: MockFoodRepository,
) -> CheckInService<MockApplicationRepository, MockFormRepository, MockFoodRepository> {
    CheckInService::new(
        Arc::new(applications),
        Arc::new(forms),
        Arc::new(food),
        Arc::new(pinned_clock(now())),
    )
}

#[tokio::test]
async fn first_scan_greets_and_transitions() {
    let account = account();
    let accepted = application(account.id, ApplicantStatus::Accepted);
    let id = accepted.id;
    let scanned = Application {
        status: ApplicantStatus::ScannedIn,
        ..accepted.clone()
    };

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(move |_| Ok(Some(accepted)));
    applications
        .expect_find_account()
        .return_once(move |_| Ok(Some(account)));
    applications
        .expect_set_status()
        .times(1)
        .withf(|_, status, _| *status == ApplicantStatus::ScannedIn)
        .return_once(move |_, _, _| Ok(Some(scanned)));

    let outcome = service(counted(applications), empty_forms(), empty_food())
        .scan(id)
        .await
        .expect("scan succeeds");

    assert_eq!(outcome.message, "Welcome Ada!");
    assert_eq!(outcome.status, ApplicantStatus::ScannedIn);
    assert_eq!(outcome.scanned_count, 7);
    assert_eq!(outcome.walk_in_count, 2);
    assert_eq!(outcome.answers.get("firstName"), Some(&Some("Ada".into())));
    assert_eq!(
        outcome.answers.get("email"),
        Some(&Some("ada@example.com".into()))
    );
}

#[tokio::test]
async fn repeat_scan_greets_without_writing() {
    let account = account();
    let scanned = application(account.id, ApplicantStatus::ScannedIn);
    let id = scanned.id;

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(move |_| Ok(Some(scanned)));
    applications
        .expect_find_account()
        .return_once(move |_| Ok(Some(account)));
    // No set_status expectation: a repeat scan must not write.

    let outcome = service(counted(applications), empty_forms(), empty_food())
        .scan(id)
        .await
        .expect("scan succeeds");

    assert_eq!(outcome.message, "Already scanned in: Ada!");
    assert_eq!(outcome.status, ApplicantStatus::ScannedIn);
}

#[rstest]
#[case(ApplicantStatus::WalkIn)]
#[case(ApplicantStatus::WalkInSubmitted)]
#[tokio::test]
async fn walk_in_scans_settle_on_submitted(#[case] status: ApplicantStatus) {
    let account = account();
    let walk_in = application(account.id, status);
    let id = walk_in.id;
    let settled = Application {
        status: ApplicantStatus::WalkInSubmitted,
        ..walk_in.clone()
    };

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(move |_| Ok(Some(walk_in)));
    applications
        .expect_find_account()
        .return_once(move |_| Ok(Some(account)));
    applications
        .expect_set_status()
        .times(1)
        .withf(|_, status, _| *status == ApplicantStatus::WalkInSubmitted)
        .return_once(move |_, _, _| Ok(Some(settled)));

    let outcome = service(counted(applications), empty_forms(), empty_food())
        .scan(id)
        .await
        .expect("scan succeeds");

    assert_eq!(outcome.message, "Welcome walk-in Ada!");
    assert_eq!(outcome.status, ApplicantStatus::WalkInSubmitted);
}

#[tokio::test]
async fn ineligible_status_is_named_in_the_refusal() {
    let account = account();
    let rejected = application(account.id, ApplicantStatus::Rejected);
    let id = rejected.id;

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(move |_| Ok(Some(rejected)));
    applications
        .expect_find_account()
        .return_once(move |_| Ok(Some(account)));

    let err = service(applications, MockFormRepository::new(), MockFoodRepository::new())
        .scan(id)
        .await
        .expect_err("ineligible status is refused");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.message(),
        "User with status REJECTED is not eligible for check-in"
    );
    let details = err.details().expect("details carry the status");
    assert_eq!(details["currentStatus"], "REJECTED");
}

#[tokio::test]
async fn unknown_badge_is_not_found() {
    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(|_| Ok(None));

    let err = service(applications, MockFormRepository::new(), MockFoodRepository::new())
        .scan(ApplicationId::random())
        .await
        .expect_err("unknown badge is refused");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "No application found with this QR code");
}

#[tokio::test]
async fn snapshot_joins_answers_and_food_history() {
    let account = account();
    let account_id = account.id;
    let scanned = application(account.id, ApplicantStatus::ScannedIn);
    let id = scanned.id;

    let phone = Question {
        id: QuestionId::random(),
        label: "Phone Number".into(),
        order: 3,
        required: true,
    };
    let answer = Answer {
        application_id: id,
        question_id: phone.id,
        value: Some("555-0100".into()),
    };
    let meal = Meal {
        id: MealId::random(),
        day: EventDay::Saturday,
        meal_type: MealType::Lunch,
        is_active: true,
    };
    let grab = FoodGrab {
        account_id,
        meal_id: meal.id,
        recorded_at: now() - Duration::hours(2),
    };

    let mut applications = MockApplicationRepository::new();
    applications
        .expect_find_application()
        .return_once(move |_| Ok(Some(scanned)));
    applications
        .expect_find_account()
        .return_once(move |_| Ok(Some(account)));

    let mut forms = MockFormRepository::new();
    forms
        .expect_list_questions()
        .return_once(move || Ok(vec![phone]));
    forms
        .expect_answers_for_application()
        .return_once(move |_| Ok(vec![answer]));

    let mut food = MockFoodRepository::new();
    let listed = meal.clone();
    food.expect_list_meals()
        .return_once(move || Ok(vec![listed]));
    food.expect_grabs_for_account()
        .withf(move |id| *id == account_id)
        .return_once(move |_| Ok(vec![grab]));

    let outcome = service(counted(applications), forms, food)
        .scan(id)
        .await
        .expect("scan succeeds");

    assert_eq!(
        outcome.answers.get("phoneNumber"),
        Some(&Some("555-0100".into()))
    );
    assert_eq!(outcome.food.len(), 1);
    assert_eq!(outcome.food[0].name, "Saturday Lunch");
    assert_eq!(outcome.food[0].meal_type, MealType::Lunch);
}

#[rstest]
#[case("Phone Number", "phoneNumber")]
#[case("Dietary Restrictions", "dietaryRestrictions")]
#[case("T-Shirt Size", "tShirtSize")]
#[case("First Name", "firstname")]
#[case("What school do you attend?", "whatschooldoyouattend?")]
fn answer_keys_keep_their_historical_forms(#[case] label: &str, #[case] expected: &str) {
    assert_eq!(answer_key(label), expected);
}
