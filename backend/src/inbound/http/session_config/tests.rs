//! Unit tests for session configuration validation.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct KeyDir {
    dir: TempDir,
}

impl KeyDir {
    fn with_key(&self, len: usize) -> PathBuf {
        let path = self.dir.path().join(format!("key-{len}"));
        std::fs::write(&path, vec![b'a'; len]).expect("write key file");
        path
    }

    fn missing(&self) -> PathBuf {
        self.dir.path().join("absent")
    }
}

#[fixture]
fn keys() -> KeyDir {
    KeyDir {
        dir: tempfile::tempdir().expect("temp dir"),
    }
}

fn toggles(key_file: PathBuf) -> SessionToggles {
    SessionToggles {
        key_file,
        allow_ephemeral: false,
        cookie_secure: true,
        same_site: Some("Strict".to_owned()),
    }
}

fn expect_error(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(_) => panic!("expected session configuration to be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_a_full_length_key(keys: KeyDir) {
    let settings = session_settings(&toggles(keys.with_key(64)), BuildMode::Release)
        .expect("valid release settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn derived_keys_are_stable(keys: KeyDir) {
    let path = keys.with_key(64);
    let first = session_settings(&toggles(path.clone()), BuildMode::Release).expect("first");
    let second = session_settings(&toggles(path), BuildMode::Release).expect("second");

    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
fn release_rejects_short_keys(keys: KeyDir) {
    let error = expect_error(session_settings(
        &toggles(keys.with_key(32)),
        BuildMode::Release,
    ));

    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn debug_replaces_underived_keys(keys: KeyDir) {
    let settings =
        session_settings(&toggles(keys.with_key(8)), BuildMode::Debug).expect("debug settings");

    assert_eq!(settings.key.master().len(), 64);
}

#[rstest]
fn release_requires_the_key_file(keys: KeyDir) {
    let error = expect_error(session_settings(
        &toggles(keys.missing()),
        BuildMode::Release,
    ));

    assert!(matches!(error, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_an_ephemeral_key(keys: KeyDir) {
    let result = session_settings(&toggles(keys.missing()), BuildMode::Debug);

    assert!(result.is_ok());
}

#[rstest]
fn release_refuses_ephemeral_keys(keys: KeyDir) {
    let mut config = toggles(keys.with_key(64));
    config.allow_ephemeral = true;

    let error = expect_error(session_settings(&config, BuildMode::Release));

    assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(None, BuildMode::Debug, SameSite::Lax)]
#[case(None, BuildMode::Release, SameSite::Strict)]
#[case(Some("lax"), BuildMode::Release, SameSite::Lax)]
#[case(Some(" STRICT "), BuildMode::Debug, SameSite::Strict)]
#[case(Some("None"), BuildMode::Release, SameSite::None)]
#[case(Some("sideways"), BuildMode::Debug, SameSite::Lax)]
fn same_site_policies(
    keys: KeyDir,
    #[case] value: Option<&str>,
    #[case] mode: BuildMode,
    #[case] expected: SameSite,
) {
    let mut config = toggles(keys.with_key(64));
    config.same_site = value.map(str::to_owned);

    let settings = session_settings(&config, mode).expect("valid settings");

    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn release_rejects_unknown_same_site(keys: KeyDir) {
    let mut config = toggles(keys.with_key(64));
    config.same_site = Some("sideways".to_owned());

    let error = expect_error(session_settings(&config, BuildMode::Release));

    assert!(matches!(
        error,
        SessionConfigError::InvalidSameSite { ref value, .. } if value == "sideways"
    ));
}

#[rstest]
#[case(BuildMode::Release, false)]
#[case(BuildMode::Debug, true)]
fn same_site_none_needs_secure_cookies_in_release(
    keys: KeyDir,
    #[case] mode: BuildMode,
    #[case] accepted: bool,
) {
    let mut config = toggles(keys.with_key(64));
    config.cookie_secure = false;
    config.same_site = Some("none".to_owned());

    let result = session_settings(&config, mode);

    match result {
        Ok(settings) => {
            assert!(accepted);
            assert_eq!(settings.same_site, SameSite::None);
            assert!(!settings.cookie_secure);
        }
        Err(error) => {
            assert!(!accepted);
            assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
        }
    }
}
