use super::*;

#[test]
fn normalize_email_accepts_basic_address() {
    assert_eq!(normalize_email("  Dean@College.EDU "), Some("dean@college.edu".to_owned()));
}

#[test]
fn normalize_email_rejects_invalid_values() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("dean"), None);
    assert_eq!(normalize_email("@college.edu"), None);
    assert_eq!(normalize_email("dean@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

#[test]
fn normalize_code_uppercases() {
    let code = generate_access_code();
    assert_eq!(normalize_code(&code), Some(code.clone()));
    assert_eq!(normalize_code(" abc234 "), Some("ABC234".to_owned()));
}

#[test]
fn normalize_code_rejects_bad_shapes() {
    assert_eq!(normalize_code("abc23"), None);
    assert_eq!(normalize_code("abc2345"), None);
    // 0, 1, I and O are excluded from the alphabet.
    assert_eq!(normalize_code("ABC1I0"), None);
    assert_eq!(normalize_code("ABC23!"), None);
}

#[test]
fn generated_codes_use_alphabet() {
    for _ in 0..50 {
        let code = generate_access_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }
}

#[test]
fn hash_is_stable_hex() {
    let a = hash_access_code("ABC234");
    assert_eq!(a, hash_access_code("ABC234"));
    assert_ne!(a, hash_access_code("ABC235"));
    assert_eq!(a.len(), 64);
}

#[test]
fn template_injects_email_and_code() {
    let html = render_admin_code_template("dean@college.edu", "ABC234");
    assert!(html.contains("dean@college.edu"));
    assert!(html.contains("ABC234"));
    assert!(!html.contains("{{EMAIL}}"));
    assert!(!html.contains("{{CODE}}"));
}

#[tokio::test]
async fn request_without_delivery_config_is_unavailable() {
    let (state, _log) = crate::state::test_helpers::test_app_state();
    let err = request_access_code(&state.pool, &state.config.admin, "dean@college.edu")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminAuthError::EmailNotConfigured));
}

#[tokio::test]
async fn request_with_malformed_email_is_rejected_first() {
    let (state, _log) = crate::state::test_helpers::test_app_state();
    let err = request_access_code(&state.pool, &state.config.admin, "not an email")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminAuthError::InvalidEmail));
}

#[tokio::test]
async fn non_admin_request_is_silently_accepted() {
    let (state, _log) = crate::state::test_helpers::test_app_state();
    let mut admin = state.config.admin.clone();
    admin.email = Some(EmailConfig { resend_api_key: "re_test".into(), from: "noreply@college.edu".into() });
    // Never reaches the database or the mail API.
    let sent = request_access_code(&state.pool, &admin, "visitor@example.org").await.unwrap();
    assert!(!sent);
}

#[tokio::test]
async fn verify_rejects_non_admin_before_lookup() {
    let (state, _log) = crate::state::test_helpers::test_app_state();
    let err = verify_access_code(&state.pool, &state.config.admin, "visitor@example.org", "ABC234")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminAuthError::VerificationFailed));
}

#[tokio::test]
async fn verify_rejects_malformed_code() {
    let (state, _log) = crate::state::test_helpers::test_app_state();
    let err = verify_access_code(&state.pool, &state.config.admin, "dean@college.edu", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminAuthError::InvalidCode));
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
fn unique_admin() -> (String, AdminConfig) {
    let email = format!("dean+{}@college.edu", uuid::Uuid::new_v4().simple());
    let admin = AdminConfig { emails: vec![email.clone()], email: None };
    (email, admin)
}

#[cfg(feature = "live-db-tests")]
fn other_code(code: &str) -> &'static str {
    if code == "AAAAAA" { "BBBBBB" } else { "AAAAAA" }
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn access_code_is_single_use() {
    let pool = crate::state::test_helpers::integration_pool().await;
    let (email, admin) = unique_admin();
    let code = store_access_code(&pool, &email).await.expect("store should succeed");

    let verified = verify_access_code(&pool, &admin, &email.to_uppercase(), &code.to_lowercase())
        .await
        .expect("first use should succeed");
    assert_eq!(verified, email);
    assert!(matches!(
        verify_access_code(&pool, &admin, &email, &code).await,
        Err(AdminAuthError::VerificationFailed)
    ));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn access_code_burns_after_repeated_failures() {
    let pool = crate::state::test_helpers::integration_pool().await;
    let (email, admin) = unique_admin();
    let code = store_access_code(&pool, &email).await.expect("store should succeed");

    for _ in 0..MAX_FAILED_ATTEMPTS {
        assert!(matches!(
            verify_access_code(&pool, &admin, &email, other_code(&code)).await,
            Err(AdminAuthError::VerificationFailed)
        ));
    }
    assert!(matches!(
        verify_access_code(&pool, &admin, &email, &code).await,
        Err(AdminAuthError::VerificationFailed)
    ));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn new_code_replaces_outstanding_one() {
    let pool = crate::state::test_helpers::integration_pool().await;
    let (email, admin) = unique_admin();
    let old = store_access_code(&pool, &email).await.expect("store should succeed");
    let new = store_access_code(&pool, &email).await.expect("store should succeed");

    if old != new {
        assert!(verify_access_code(&pool, &admin, &email, &old).await.is_err());
    }
    assert!(verify_access_code(&pool, &admin, &email, &new).await.is_ok());
}
