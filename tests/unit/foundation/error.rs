use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PhotomaskError::invalid_format("x")
            .to_string()
            .contains("invalid format:")
    );
    assert!(
        PhotomaskError::asset_not_found("x")
            .to_string()
            .contains("asset not found:")
    );
    assert!(
        PhotomaskError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PhotomaskError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        PhotomaskError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        PhotomaskError::session("x")
            .to_string()
            .contains("session error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PhotomaskError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
