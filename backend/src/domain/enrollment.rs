//! Application creation with prefilled answers.
//!
//! An application materialises the first time an account touches the form
//! subsystem. The question set is captured at that moment: one answer row per
//! seeded question, so later question edits cannot break existing drafts.

use chrono::{DateTime, Utc};

use crate::domain::ports::{ApplicationRepository, FormRepository};
use crate::domain::{Account, Answer, AnswerFile, Application, Error, Question};

const PREFILL_FIRST_NAME: &str = "first name";
const PREFILL_LAST_NAME: &str = "last name";
const PREFILL_EMAIL: &str = "email";

/// A freshly materialised application with its answer rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// The draft application, status `APPLYING`.
    pub application: Application,
    /// One answer per non-file question, identity fields prefilled.
    pub answers: Vec<Answer>,
    /// Placeholder upload slot, present when a resume question is seeded.
    pub answer_file: Option<AnswerFile>,
}

/// Build the application, answers, and upload slot for an account.
///
/// Identity answers ("First Name", "Last Name", "Email") are prefilled from
/// the account profile so applicants never retype what registration already
/// captured. The resume question gets an [`AnswerFile`] slot instead of an
/// answer row.
///
/// # Errors
/// Returns an invalid-request error when the account profile is missing a
/// name or email, since those prefills are part of the submission contract.
pub fn enroll(
    account: &Account,
    questions: &[Question],
    now: DateTime<Utc>,
) -> Result<Enrollment, Error> {
    if account.first_name.trim().is_empty()
        || account.last_name.trim().is_empty()
        || account.email.trim().is_empty()
    {
        return Err(Error::invalid_request(
            "User profile incomplete - missing first name, last name, or email",
        ));
    }

    let application = Application::draft(account.id, now);

    let mut answers = Vec::with_capacity(questions.len());
    let mut answer_file = None;
    for question in questions {
        if is_resume_question(&question.label) {
            answer_file = Some(AnswerFile::placeholder(application.id));
            continue;
        }
        answers.push(Answer {
            application_id: application.id,
            question_id: question.id,
            value: prefill_value(account, &question.label),
        });
    }

    Ok(Enrollment {
        application,
        answers,
        answer_file,
    })
}

/// Enroll an account and persist every row the enrollment produced.
///
/// Shared by the submission flow (first form fetch) and Walk-in Mark (an
/// email that resolves to an account with no application yet).
pub(crate) async fn materialize<A, F>(
    applications: &A,
    forms: &F,
    account: &Account,
    now: DateTime<Utc>,
) -> Result<Application, Error>
where
    A: ApplicationRepository + ?Sized,
    F: FormRepository + ?Sized,
{
    let questions = forms.list_questions().await?;
    let enrollment = enroll(account, &questions, now)?;

    applications
        .insert_application(&enrollment.application)
        .await?;
    for answer in &enrollment.answers {
        forms.insert_answer(answer).await?;
    }
    if let Some(file) = &enrollment.answer_file {
        forms.insert_answer_file(file).await?;
    }
    Ok(enrollment.application)
}

fn is_resume_question(label: &str) -> bool {
    label.to_lowercase().contains("resume")
}

fn prefill_value(account: &Account, label: &str) -> Option<String> {
    match label.trim().to_lowercase().as_str() {
        PREFILL_FIRST_NAME => Some(account.first_name.clone()),
        PREFILL_LAST_NAME => Some(account.last_name.clone()),
        PREFILL_EMAIL => Some(account.email.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{AccountId, ApplicantStatus, QuestionId};

    fn account() -> Account {
        Account {
            id: AccountId::random(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    fn question(label: &str, order: u32, required: bool) -> Question {
        Question {
            id: QuestionId::random(),
            label: label.into(),
            order,
            required,
        }
    }

    #[rstest]
    fn prefills_identity_answers_from_the_account() {
        let questions = vec![
            question("First Name", 0, true),
            question("Last Name", 1, true),
            question("Email", 2, true),
            question("School Name", 3, true),
        ];

        let enrollment = enroll(&account(), &questions, Utc::now()).expect("enrolls");

        assert_eq!(enrollment.application.status, ApplicantStatus::Applying);
        assert!(enrollment.application.is_draft);
        let values: Vec<Option<&str>> = enrollment
            .answers
            .iter()
            .map(|a| a.value.as_deref())
            .collect();
        assert_eq!(
            values,
            vec![Some("Ada"), Some("Lovelace"), Some("ada@example.com"), None]
        );
    }

    #[rstest]
    fn resume_question_becomes_an_upload_slot() {
        let questions = vec![
            question("Attach Your Resume", 0, true),
            question("Age", 1, true),
        ];

        let enrollment = enroll(&account(), &questions, Utc::now()).expect("enrolls");

        assert_eq!(enrollment.answers.len(), 1);
        let file = enrollment.answer_file.expect("upload slot present");
        assert_eq!(file.application_id, enrollment.application.id);
        assert!(!file.is_uploaded());
    }

    #[rstest]
    #[case("", "Lovelace", "ada@example.com")]
    #[case("Ada", "  ", "ada@example.com")]
    #[case("Ada", "Lovelace", "")]
    fn incomplete_profile_is_rejected(
        #[case] first_name: &str,
        #[case] last_name: &str,
        #[case] email: &str,
    ) {
        let account = Account {
            id: AccountId::random(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        };

        let err = enroll(&account, &[], Utc::now()).expect_err("profile rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn no_resume_question_means_no_upload_slot() {
        let enrollment =
            enroll(&account(), &[question("Age", 0, true)], Utc::now()).expect("enrolls");
        assert!(enrollment.answer_file.is_none());
    }
}
