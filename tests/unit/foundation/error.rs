use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrubError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ScrubError::load("x").to_string().contains("load error:"));
    assert!(ScrubError::render("x").to_string().contains("render error:"));
    assert!(
        ScrubError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrubError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: ScrubError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ScrubError::Serde(_)));
}
