use cinereview::server::utils::token_utils::TokenUtil;

#[test]
fn test_token_round_trip() {
    let util = TokenUtil::new("test_secret".to_string());
    let token = util
        .generate_token("user123", TokenUtil::generate_expiry(12))
        .unwrap();

    assert_eq!(util.verify_token(&token), Some("user123".to_string()));
}

#[test]
fn test_token_verification() {
    let util = TokenUtil::new("test_secret".to_string());
    let token = util
        .generate_token("user123", TokenUtil::generate_expiry(12))
        .unwrap();

    // garbage should fail
    assert_eq!(util.verify_token("invalid"), None);

    // signed with another secret should fail
    let other = TokenUtil::new("other_secret".to_string());
    assert_eq!(other.verify_token(&token), None);

    // tampered payload should fail
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[1] = "eyJzdWIiOiJhZG1pbiIsImV4cCI6OTk5OTk5OTk5OSwiaWF0IjowfQ";
    assert_eq!(util.verify_token(&parts.join(".")), None);
}

#[test]
fn test_expired_token() {
    let util = TokenUtil::new("test_secret".to_string());
    let past_expiry = 1234567890; // a while ago

    let token = util.generate_token("user123", past_expiry).unwrap();

    // expired token should fail even if the signature is correct
    assert_eq!(util.verify_token(&token), None);
}

#[test]
fn test_empty_subject_is_rejected() {
    let util = TokenUtil::new("test_secret".to_string());
    let token = util
        .generate_token("", TokenUtil::generate_expiry(1))
        .unwrap();

    assert_eq!(util.verify_token(&token), None);
}
