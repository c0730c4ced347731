//! Port abstraction for form storage: questions, answers, uploaded files,
//! and the submission window.

use async_trait::async_trait;

use crate::domain::{
    Answer, AnswerFile, ApplicationId, Question, QuestionId, SubmissionWindow,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by form repository adapters.
    pub enum FormRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "form repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "form repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        DuplicateKey { message: String } => "form row already exists: {message}",
    }
}

/// Port for question, answer, and window storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// List every question in ascending display order.
    async fn list_questions(&self) -> Result<Vec<Question>, FormRepositoryError>;

    /// Resolve a question by its exact label.
    async fn find_question_by_label(
        &self,
        label: &str,
    ) -> Result<Option<Question>, FormRepositoryError>;

    /// Persist a new question. Fails with `DuplicateKey` on a label collision.
    async fn insert_question(&self, question: &Question) -> Result<(), FormRepositoryError>;

    /// List the answers recorded for an application.
    async fn answers_for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Answer>, FormRepositoryError>;

    /// Persist a new answer row.
    async fn insert_answer(&self, answer: &Answer) -> Result<(), FormRepositoryError>;

    /// Overwrite the value of one answer.
    ///
    /// Returns `false` when no row exists for the pair.
    async fn set_answer_value(
        &self,
        application_id: ApplicationId,
        question_id: QuestionId,
        value: Option<String>,
    ) -> Result<bool, FormRepositoryError>;

    /// Resolve the uploaded-file record for an application.
    async fn answer_file_for(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<AnswerFile>, FormRepositoryError>;

    /// Persist a new uploaded-file record.
    async fn insert_answer_file(&self, file: &AnswerFile) -> Result<(), FormRepositoryError>;

    /// Overwrite the stored filename and path for an application's upload.
    ///
    /// Returns `false` when the application has no file record.
    async fn set_answer_file(
        &self,
        application_id: ApplicationId,
        original_filename: String,
        file_path: String,
    ) -> Result<bool, FormRepositoryError>;

    /// Fetch the submission window, if one has been configured.
    async fn submission_window(&self) -> Result<Option<SubmissionWindow>, FormRepositoryError>;

    /// Persist the submission window.
    ///
    /// Fails with `DuplicateKey` when a window is already configured.
    async fn insert_submission_window(
        &self,
        window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError>;

    /// Replace the submission window, creating it when absent.
    async fn set_submission_window(
        &self,
        window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError>;
}

/// Fixture implementation for wiring without a real store.
#[derive(Debug, Default)]
pub struct FixtureFormRepository;

#[async_trait]
impl FormRepository for FixtureFormRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, FormRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_question_by_label(
        &self,
        _label: &str,
    ) -> Result<Option<Question>, FormRepositoryError> {
        Ok(None)
    }

    async fn insert_question(&self, _question: &Question) -> Result<(), FormRepositoryError> {
        Ok(())
    }

    async fn answers_for_application(
        &self,
        _application_id: ApplicationId,
    ) -> Result<Vec<Answer>, FormRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert_answer(&self, _answer: &Answer) -> Result<(), FormRepositoryError> {
        Ok(())
    }

    async fn set_answer_value(
        &self,
        _application_id: ApplicationId,
        _question_id: QuestionId,
        _value: Option<String>,
    ) -> Result<bool, FormRepositoryError> {
        Ok(true)
    }

    async fn answer_file_for(
        &self,
        _application_id: ApplicationId,
    ) -> Result<Option<AnswerFile>, FormRepositoryError> {
        Ok(None)
    }

    async fn insert_answer_file(&self, _file: &AnswerFile) -> Result<(), FormRepositoryError> {
        Ok(())
    }

    async fn set_answer_file(
        &self,
        _application_id: ApplicationId,
        _original_filename: String,
        _file_path: String,
    ) -> Result<bool, FormRepositoryError> {
        Ok(true)
    }

    async fn submission_window(&self) -> Result<Option<SubmissionWindow>, FormRepositoryError> {
        Ok(None)
    }

    async fn insert_submission_window(
        &self,
        _window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError> {
        Ok(())
    }

    async fn set_submission_window(
        &self,
        _window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError> {
        Ok(())
    }
}
