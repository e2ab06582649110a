use super::*;

fn small() -> RateLimitConfig {
    RateLimitConfig {
        per_key_limit: 3,
        per_key_window: Duration::from_secs(60),
        global_limit: 5,
        global_window: Duration::from_secs(60),
    }
}

#[test]
fn per_key_allows_up_to_limit() {
    let rl = RateLimiter::new(small());
    let now = Instant::now();

    for i in 0..3 {
        assert!(rl.check_and_record_at("session-a", now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at("session-a", now),
        Err(RateLimitError::PerKeyExceeded { limit: 3, window_secs: 60 })
    ));
}

#[test]
fn global_allows_up_to_limit() {
    let rl = RateLimiter::new(small());
    let now = Instant::now();

    for i in 0..5 {
        let key = format!("key-{i}");
        assert!(rl.check_and_record_at(&key, now).is_ok(), "request {i} should succeed");
    }
    assert!(matches!(
        rl.check_and_record_at("another", now),
        Err(RateLimitError::GlobalExceeded { limit: 5, .. })
    ));
}

#[test]
fn window_expiry_allows_new_requests() {
    let rl = RateLimiter::new(small());
    let start = Instant::now();

    for _ in 0..3 {
        rl.check_and_record_at("k", start).unwrap();
    }
    assert!(rl.check_and_record_at("k", start).is_err());

    let after_window = start + Duration::from_secs(60) + Duration::from_millis(1);
    assert!(rl.check_and_record_at("k", after_window).is_ok());
}

#[test]
fn distinct_keys_do_not_interfere() {
    let rl = RateLimiter::new(small());
    let now = Instant::now();

    for _ in 0..3 {
        rl.check_and_record_at("a", now).unwrap();
    }
    assert!(rl.check_and_record_at("a", now).is_err());
    assert!(rl.check_and_record_at("b", now).is_ok());
}

#[test]
fn rejected_request_is_not_recorded() {
    let rl = RateLimiter::new(small());
    let now = Instant::now();

    for _ in 0..3 {
        rl.check_and_record_at("a", now).unwrap();
    }
    for _ in 0..10 {
        assert!(rl.check_and_record_at("a", now).is_err());
    }
    // Global budget (5) still has room for two more keys.
    assert!(rl.check_and_record_at("b", now).is_ok());
    assert!(rl.check_and_record_at("c", now).is_ok());
}

#[test]
fn drained_keys_are_forgotten() {
    let rl = RateLimiter::new(small());
    let start = Instant::now();
    rl.check_and_record_at("one-off", start).unwrap();
    assert_eq!(rl.tracked_keys(), 1);

    let later = start + Duration::from_secs(61);
    rl.check_and_record_at("fresh", later).unwrap();
    assert_eq!(rl.tracked_keys(), 1);
}

#[test]
fn from_env_overrides_defaults() {
    unsafe { std::env::set_var("__RLTEST_RATE_LIMIT_PER_KEY", "9") };
    let cfg = RateLimitConfig::from_env("__RLTEST", RateLimitConfig::form_defaults());
    assert_eq!(cfg.per_key_limit, 9);
    assert_eq!(cfg.per_key_window, Duration::from_secs(600));
    assert_eq!(cfg.global_limit, 200);
    unsafe { std::env::remove_var("__RLTEST_RATE_LIMIT_PER_KEY") };
}
