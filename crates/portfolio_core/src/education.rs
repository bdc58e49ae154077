//! Education section editor: form state, validation and record CRUD.

use std::sync::Arc;

use shared::{
    domain::{DegreeOption, Education, EducationId, UserId},
    protocol::{CreateEducationRequest, UpdateEducationRequest},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::{PortfolioError, Result},
    gateway::PortfolioApi,
    loading::{LoadingOp, LoadingTracker},
    notice::{Notice, NoticeContext},
    session::{publish_notice, PortfolioEvent},
};

/// Section id the API files education records under.
pub const EDUCATION_SECTION_ID: i64 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationForm {
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub school: String,
    pub from: String,
    pub to: String,
    pub selected_degree_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing_fields: Vec<&'static str>,
    pub same_dates: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing_fields.is_empty() && !self.same_dates
    }

    pub fn message(&self) -> String {
        if self.same_dates {
            "Start date and end date cant be the same".to_string()
        } else {
            format!(
                "Please fill in the required fields: {}",
                self.missing_fields.join(", ")
            )
        }
    }
}

pub fn validate(form: &EducationForm) -> ValidationReport {
    let required = [
        ("fieldOfStudy", &form.field_of_study),
        ("school", &form.school),
        ("Description", &form.description),
        ("Degree", &form.selected_degree_id),
        ("Start date", &form.from),
        ("End date", &form.to),
    ];
    ValidationReport {
        missing_fields: required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect(),
        same_dates: !form.from.is_empty() && form.from == form.to,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Rejected(ValidationReport),
}

pub struct EducationEditor {
    api: Arc<dyn PortfolioApi>,
    user_id: UserId,
    events: broadcast::Sender<PortfolioEvent>,
    loading: Arc<LoadingTracker>,
    pub form: EducationForm,
    degree_options: Vec<DegreeOption>,
    educations: Vec<Education>,
    is_form: bool,
    is_edit_mode: bool,
    is_data: bool,
    editing_id: Option<EducationId>,
}

impl EducationEditor {
    pub fn new(
        api: Arc<dyn PortfolioApi>,
        user_id: UserId,
        events: broadcast::Sender<PortfolioEvent>,
        loading: Arc<LoadingTracker>,
    ) -> Self {
        Self {
            api,
            user_id,
            events,
            loading,
            form: EducationForm::default(),
            degree_options: Vec::new(),
            educations: Vec::new(),
            is_form: false,
            is_edit_mode: false,
            is_data: true,
            editing_id: None,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn educations(&self) -> &[Education] {
        &self.educations
    }

    pub fn degree_options(&self) -> &[DegreeOption] {
        &self.degree_options
    }

    pub fn is_form(&self) -> bool {
        self.is_form
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn is_data(&self) -> bool {
        self.is_data
    }

    pub fn editing_id(&self) -> Option<EducationId> {
        self.editing_id
    }

    pub fn set_is_form(&mut self, is_form: bool) {
        self.is_form = is_form;
    }

    fn notify(&self, notice: Notice) {
        publish_notice(&self.events, notice);
    }

    /// Clears every field and shows the empty form.
    pub fn reset_form(&mut self) {
        self.form = EducationForm::default();
        self.is_form = true;
    }

    /// Refreshes the degree options. Failures are logged and leave the
    /// previous options in place.
    pub async fn load_degrees(&mut self) {
        let _loading = self.loading.begin(LoadingOp::Education);
        match self.api.list_degrees().await {
            Ok(response) => match response.into_options() {
                Some(options) => {
                    debug!(count = options.len(), "education: degree options loaded");
                    self.degree_options = options;
                }
                None => debug!("education: degree response carried no data"),
            },
            Err(err) => warn!(error = %err, "education: failed to load degree options"),
        }
    }

    /// Accepts `degree_id` only when it is one of the loaded options.
    pub fn select_degree(&mut self, degree_id: &str) -> bool {
        let known = self
            .degree_options
            .iter()
            .any(|option| option.id == degree_id);
        if known {
            self.form.selected_degree_id = degree_id.to_string();
        }
        known
    }

    pub async fn list(&mut self) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::Education);
        let details = self.api.list_educations(&self.user_id).await.map_err(|err| {
            warn!(user_id = %self.user_id, error = %err, "education: failed to list records");
            err
        })?;
        self.educations = details.educations();
        debug!(count = self.educations.len(), "education: records loaded");
        Ok(())
    }

    async fn relist(&mut self) {
        if let Err(err) = self.list().await {
            debug!(error = %err, "education: refresh after write failed");
        }
    }

    pub async fn add(&mut self) -> Result<SubmitOutcome> {
        let _loading = self.loading.begin(LoadingOp::Education);
        let report = validate(&self.form);
        if !report.is_valid() {
            self.notify(Notice::error(NoticeContext::Education, report.message()));
            return Ok(SubmitOutcome::Rejected(report));
        }

        let degree_id = self
            .form
            .selected_degree_id
            .trim()
            .parse::<i64>()
            .map_err(|_| {
                PortfolioError::Validation(format!(
                    "degree id '{}' is not numeric",
                    self.form.selected_degree_id
                ))
            })?;
        let request = CreateEducationRequest {
            field_of_study: self.form.field_of_study.clone(),
            degree_id,
            school: self.form.school.clone(),
            description: self.form.description.clone(),
            from: self.form.from.clone(),
            to: self.form.to.clone(),
            user_id: self.user_id.clone(),
            section_id: EDUCATION_SECTION_ID,
        };

        if let Err(err) = self.api.create_education(&self.user_id, &request).await {
            self.notify(Notice::error(
                NoticeContext::Education,
                format!("We had some issues adding your education detail: {err}"),
            ));
            return Err(err);
        }

        info!(user_id = %self.user_id, school = %request.school, "education: record created");
        self.relist().await;
        self.notify(Notice::success(
            NoticeContext::Education,
            "Education detail created successfully",
        ));
        self.reset_form();
        self.is_form = false;
        self.is_data = true;
        Ok(SubmitOutcome::Saved)
    }

    /// Loads an existing record into the form and switches to edit mode.
    pub fn begin_edit(&mut self, education_id: EducationId) -> Result<()> {
        let education = self
            .educations
            .iter()
            .find(|education| education.id == education_id)
            .cloned()
            .ok_or_else(|| {
                PortfolioError::Validation(format!("no education record {}", education_id.0))
            })?;
        self.form = EducationForm {
            degree: education
                .degree
                .as_ref()
                .and_then(|degree| degree.as_str().map(str::to_string))
                .unwrap_or_default(),
            field_of_study: education.field_of_study,
            description: education.description,
            school: education.school,
            from: education.from,
            to: education.to,
            selected_degree_id: String::new(),
        };
        self.editing_id = Some(education_id);
        self.is_edit_mode = true;
        self.is_form = true;
        Ok(())
    }

    pub async fn update(&mut self, education_id: EducationId) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::Education);
        let request = UpdateEducationRequest {
            degree: self.form.degree.clone(),
            field_of_study: self.form.field_of_study.clone(),
            id: education_id.0,
            school: self.form.school.clone(),
            description: self.form.description.clone(),
            from: self.form.from.clone(),
            to: self.form.to.clone(),
        };

        if let Err(err) = self.api.update_education(education_id, &request).await {
            self.notify(Notice::error(
                NoticeContext::Education,
                format!("failed to update education detail: {err}"),
            ));
            return Err(err);
        }

        self.notify(Notice::success(
            NoticeContext::Education,
            "Education detail updated successfully",
        ));
        self.reset_form();
        self.is_edit_mode = false;
        self.is_form = false;
        self.is_data = true;
        self.editing_id = None;
        self.relist().await;
        Ok(())
    }

    pub async fn delete(&mut self, education_id: EducationId) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::Education);
        if let Err(err) = self.api.delete_education(education_id).await {
            self.notify(Notice::error(
                NoticeContext::Education,
                format!("Was not able to delete education: {err}"),
            ));
            return Err(err);
        }
        self.educations
            .retain(|education| education.id != education_id);
        self.notify(Notice::success(
            NoticeContext::Education,
            "Education Deleted successfully",
        ));
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/education_tests.rs"]
mod tests;
