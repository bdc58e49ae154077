use super::*;
use crate::{notice::Severity, test_support::FakeApi};

fn editor_with(api: FakeApi) -> (EducationEditor, broadcast::Receiver<PortfolioEvent>) {
    let (events, rx) = broadcast::channel(64);
    let editor = EducationEditor::new(
        Arc::new(api),
        UserId::from("u-1"),
        events,
        LoadingTracker::new(),
    );
    (editor, rx)
}

fn complete_form() -> EducationForm {
    EducationForm {
        degree: String::new(),
        field_of_study: "Computer Science".into(),
        description: "Distributed systems".into(),
        school: "Unilag".into(),
        from: "2018".into(),
        to: "2022".into(),
        selected_degree_id: "2".into(),
    }
}

fn notices(rx: &mut broadcast::Receiver<PortfolioEvent>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let PortfolioEvent::Notice(notice) = event {
            out.push(notice);
        }
    }
    out
}

#[test]
fn validation_lists_missing_fields_in_form_order() {
    let report = validate(&EducationForm {
        school: "Unilag".into(),
        from: "2018".into(),
        ..EducationForm::default()
    });
    assert!(!report.is_valid());
    assert_eq!(
        report.missing_fields,
        vec!["fieldOfStudy", "Description", "Degree", "End date"]
    );
    assert!(!report.same_dates);
    assert!(report.message().starts_with("Please fill in the required fields"));
}

#[test]
fn validation_rejects_identical_dates() {
    let report = validate(&EducationForm {
        to: "2018".into(),
        from: "2018".into(),
        ..complete_form()
    });
    assert!(report.missing_fields.is_empty());
    assert!(report.same_dates);
    assert_eq!(report.message(), "Start date and end date cant be the same");
}

#[tokio::test]
async fn rejected_form_never_reaches_the_api() {
    let api = FakeApi::ok();
    let calls = Arc::clone(&api.calls);
    let (mut editor, mut rx) = editor_with(api);
    editor.form = EducationForm {
        school: "Unilag".into(),
        ..EducationForm::default()
    };

    let outcome = editor.add().await.expect("add");
    assert!(matches!(outcome, SubmitOutcome::Rejected(ref report) if !report.is_valid()));
    assert!(calls.lock().await.is_empty());
    assert_eq!(editor.form.school, "Unilag");

    let notices = notices(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity(), Severity::Error);
}

#[tokio::test]
async fn add_posts_record_and_refreshes_the_list() {
    let api = FakeApi::ok();
    let created = Arc::clone(&api.created);
    let (mut editor, mut rx) = editor_with(api);

    editor.load_degrees().await;
    assert_eq!(editor.degree_options().len(), 2);
    assert!(!editor.select_degree("9"));
    assert!(editor.select_degree("2"));

    editor.reset_form();
    assert!(editor.is_form());
    editor.form = complete_form();

    let outcome = editor.add().await.expect("add");
    assert_eq!(outcome, SubmitOutcome::Saved);

    let created = created.lock().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].degree_id, 2);
    assert_eq!(created[0].section_id, EDUCATION_SECTION_ID);
    assert_eq!(created[0].user_id, UserId::from("u-1"));
    assert_eq!(created[0].school, "Unilag");

    assert_eq!(editor.educations().len(), 2);
    assert_eq!(editor.form, EducationForm::default());
    assert!(!editor.is_form());
    assert!(editor.is_data());

    let notices = notices(&mut rx);
    assert_eq!(notices.last().map(Notice::severity), Some(Severity::Success));
}

#[tokio::test]
async fn failed_create_keeps_the_form() {
    let (mut editor, mut rx) = editor_with(FakeApi {
        fail_create: true,
        ..FakeApi::ok()
    });
    editor.form = complete_form();

    editor.add().await.expect_err("create fails");
    assert_eq!(editor.form, complete_form());
    let notices = notices(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity(), Severity::Error);
}

#[tokio::test]
async fn editing_loads_record_and_update_leaves_edit_mode() {
    let api = FakeApi::ok();
    let updated = Arc::clone(&api.updated);
    let (mut editor, _rx) = editor_with(api);
    editor.list().await.expect("list");

    editor.begin_edit(EducationId(2)).expect("edit");
    assert!(editor.is_edit_mode());
    assert_eq!(editor.editing_id(), Some(EducationId(2)));
    assert_eq!(editor.form.school, "Second Uni");
    assert_eq!(editor.form.degree, "MSc");

    editor.form.school = "Renamed Uni".into();
    editor.update(EducationId(2)).await.expect("update");

    let updated = updated.lock().await;
    assert_eq!(updated[0].id, 2);
    assert_eq!(updated[0].school, "Renamed Uni");
    assert_eq!(updated[0].field_of_study, "Physics");
    assert!(!editor.is_edit_mode());
    assert!(!editor.is_form());
    assert_eq!(editor.editing_id(), None);
}

#[tokio::test]
async fn editing_an_unknown_record_is_rejected() {
    let (mut editor, _rx) = editor_with(FakeApi::ok());
    editor.list().await.expect("list");
    assert!(matches!(
        editor.begin_edit(EducationId(42)),
        Err(PortfolioError::Validation(_))
    ));
    assert!(!editor.is_edit_mode());
}

#[tokio::test]
async fn delete_removes_the_record_locally() {
    let (mut editor, mut rx) = editor_with(FakeApi::ok());
    editor.list().await.expect("list");

    editor.delete(EducationId(1)).await.expect("delete");
    let ids: Vec<_> = editor.educations().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![EducationId(2)]);
    assert_eq!(
        notices(&mut rx).last().map(Notice::severity),
        Some(Severity::Success)
    );
}

#[tokio::test]
async fn failed_delete_keeps_records_and_reports() {
    let (mut editor, mut rx) = editor_with(FakeApi {
        fail_delete: true,
        ..FakeApi::ok()
    });
    editor.list().await.expect("list");

    editor.delete(EducationId(1)).await.expect_err("delete fails");
    assert_eq!(editor.educations().len(), 2);
    let notices = notices(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity(), Severity::Error);
}

#[tokio::test]
async fn degree_failure_keeps_previous_options() {
    let (mut editor, _rx) = editor_with(FakeApi {
        fail_degrees: true,
        ..FakeApi::ok()
    });
    editor.load_degrees().await;
    assert!(editor.degree_options().is_empty());
    assert!(!editor.select_degree("1"));
}
