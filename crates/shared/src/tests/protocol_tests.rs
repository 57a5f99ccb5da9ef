use super::*;

fn form(title: &str, level: &str) -> SaveTutorialForm {
    SaveTutorialForm {
        title: title.to_string(),
        level: Some(level.to_string()),
        ..SaveTutorialForm::default()
    }
}

#[test]
fn blank_id_means_new_record() {
    let mut raw = form("New Tutorial", "3");
    raw.id = Some(String::new());
    raw.description = Some("   ".into());
    let tutorial = raw.into_tutorial().expect("valid form");
    assert_eq!(tutorial.id, None);
    assert_eq!(tutorial.description, None);
    assert_eq!(tutorial.level, 3);
}

#[test]
fn parses_existing_id_and_trims_title() {
    let mut raw = form("  Updated Title ", "7");
    raw.id = Some("1".into());
    raw.published = Some("true".into());
    let tutorial = raw.into_tutorial().expect("valid form");
    assert_eq!(tutorial.id, Some(TutorialId(1)));
    assert_eq!(tutorial.title, "Updated Title");
    assert!(tutorial.published);
}

#[test]
fn description_keeps_surrounding_whitespace() {
    let mut raw = form("Whitespace", "2");
    raw.description = Some("  indented\ntext ".into());
    let tutorial = raw.into_tutorial().expect("valid form");
    assert_eq!(tutorial.description.as_deref(), Some("  indented\ntext "));
}

#[test]
fn numeric_fields_tolerate_padding() {
    let mut raw = form("Padded", " 4 ");
    raw.id = Some(" 12 ".into());
    let tutorial = raw.into_tutorial().expect("valid form");
    assert_eq!(tutorial.id, Some(TutorialId(12)));
    assert_eq!(tutorial.level, 4);
}

#[test]
fn zero_id_is_an_existing_record() {
    let mut raw = form("Zero", "1");
    raw.id = Some("0".into());
    assert_eq!(raw.into_tutorial().expect("valid form").id, Some(TutorialId(0)));
}

#[test]
fn checkbox_values_map_to_published() {
    for (value, expected) in [
        (Some("on"), true),
        (Some("1"), true),
        (Some("true"), true),
        (Some("false"), false),
        (None, false),
    ] {
        let mut raw = form("Checkbox", "1");
        raw.published = value.map(str::to_string);
        assert_eq!(raw.into_tutorial().expect("valid").published, expected);
    }
}

#[test]
fn missing_level_defaults_to_zero() {
    let raw = SaveTutorialForm {
        title: "No level".into(),
        ..SaveTutorialForm::default()
    };
    assert_eq!(raw.into_tutorial().expect("valid").level, 0);
}

#[test]
fn rejects_non_numeric_level_and_id() {
    assert_eq!(
        form("Bad level", "hard").into_tutorial(),
        Err(ValidationError::InvalidLevel("hard".into()))
    );

    let mut raw = form("Bad id", "1");
    raw.id = Some("abc".into());
    assert_eq!(
        raw.into_tutorial(),
        Err(ValidationError::InvalidId("abc".into()))
    );
}

#[test]
fn runs_entity_validation() {
    assert_eq!(
        form("", "1").into_tutorial(),
        Err(ValidationError::EmptyTitle)
    );
    assert_eq!(
        form("Level", "12").into_tutorial(),
        Err(ValidationError::LevelOutOfRange(12))
    );
}
