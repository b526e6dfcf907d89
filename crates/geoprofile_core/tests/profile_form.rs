use geoprofile_core::model::profile::{ProfileId, DEFAULT_AVATAR_URL};
use geoprofile_core::seed::sample_profiles;
use geoprofile_core::service::profile_form::{
    FormError, FormMode, ProfileForm, SaveOutcome, MISSING_FIELDS_MESSAGE,
};
use geoprofile_core::service::profile_service::ProfileService;
use geoprofile_core::InMemoryProfileRepository;

fn seeded() -> ProfileService<InMemoryProfileRepository> {
    ProfileService::seeded(sample_profiles()).expect("samples should seed")
}

fn filled_create_form() -> ProfileForm {
    let mut form = ProfileForm::create();
    let draft = form.draft_mut();
    draft.name = "Noah Kim".to_string();
    draft.description = "Backend engineer".to_string();
    draft.address.city = "Denver".to_string();
    draft.address.state = "CO".to_string();
    form.set_latitude_input("39.7392");
    form.set_longitude_input("-104.9903");
    form.set_interests_input("Climbing, , Rust ");
    form
}

#[test]
fn new_form_starts_blank_with_default_avatar() {
    let form = ProfileForm::create();

    assert_eq!(form.mode(), &FormMode::Create);
    assert_eq!(form.draft().avatar, DEFAULT_AVATAR_URL);
    assert!(form.draft().name.is_empty());
    assert_eq!(form.draft().location().lat, 0.0);
    assert_eq!(form.draft().location().lng, 0.0);
}

#[test]
fn create_submit_adds_a_profile_with_generated_id() {
    let mut service = seeded();
    let form = filled_create_form();

    let outcome = form.submit(&mut service).expect("submit should succeed");

    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert_eq!(outcome.message(), "Profile created successfully");
    let stored = service
        .find(outcome.profile_id().as_str())
        .expect("lookup")
        .expect("created profile");
    assert_eq!(stored.interests(), ["Climbing", "Rust"]);
    assert_eq!(stored.location().lat, 39.7392);
    assert_eq!(service.count(), 7);
}

#[test]
fn missing_required_fields_use_the_generic_message() {
    let mut service = seeded();
    let mut form = ProfileForm::create();
    form.draft_mut().name = "Noah Kim".to_string();

    let err = form.submit(&mut service).expect_err("city is missing");

    assert!(matches!(err, FormError::Validation(_)));
    assert_eq!(err.user_message(), MISSING_FIELDS_MESSAGE);
    assert_eq!(service.count(), 6);
}

#[test]
fn unparseable_longitude_is_reported_not_zeroed() {
    let mut service = seeded();
    let mut form = filled_create_form();
    form.set_longitude_input("west-ish");

    let err = form.submit(&mut service).expect_err("bad longitude");

    assert!(matches!(
        err,
        FormError::InvalidCoordinate {
            field: "longitude",
            ..
        }
    ));
    assert!(err.user_message().contains("west-ish"));
    assert_eq!(service.count(), 6);
}

#[test]
fn out_of_range_latitude_fails_validation() {
    let mut service = seeded();
    let mut form = filled_create_form();
    form.set_latitude_input("123.0");

    let err = form.submit(&mut service).expect_err("latitude out of range");
    assert!(matches!(err, FormError::Validation(_)));
    assert_ne!(err.user_message(), MISSING_FIELDS_MESSAGE);
}

#[test]
fn edit_prefills_inputs_and_updates_in_place() {
    let mut service = seeded();
    let original = service.find("5").expect("lookup").expect("profile 5");
    let mut form = ProfileForm::edit(&original);

    assert_eq!(form.mode(), &FormMode::Edit(ProfileId::new("5")));
    assert_eq!(form.interests_input(), original.interests().join(", "));

    form.draft_mut().company = Some("Brand Lab".to_string());
    let outcome = form.submit(&mut service).expect("update should succeed");

    assert_eq!(outcome, SaveOutcome::Updated(ProfileId::new("5")));
    assert_eq!(outcome.message(), "Profile updated successfully");
    let stored = service.find("5").expect("lookup").expect("profile 5");
    assert_eq!(stored.company.as_deref(), Some("Brand Lab"));
    assert_eq!(stored.location(), original.location());
    assert_eq!(service.count(), 6);
}

#[test]
fn editing_a_deleted_profile_reports_not_found() {
    let mut service = seeded();
    let original = service.find("6").expect("lookup").expect("profile 6");
    let form = ProfileForm::edit(&original);
    service.delete("6").expect("delete");

    let err = form.submit(&mut service).expect_err("profile is gone");
    assert_eq!(err.user_message(), "Profile not found");
}
