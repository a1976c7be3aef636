use super::*;

#[test]
fn new_session_without_token_is_signed_out() {
    let session = Session::default();
    assert!(!session.is_signed_in());
    assert_eq!(session.token(), None);
    assert_eq!(session.redirect_to(), None);
}

#[test]
fn set_token_is_visible_through_clones() {
    let session = Session::default();
    let clone = session.clone();
    session.set_token("abc");
    assert_eq!(clone.token().as_deref(), Some("abc"));
}

#[test]
fn logout_clears_token_and_requests_login_redirect() {
    let session = Session::new(Some("abc".into()));
    session.logout();
    assert_eq!(session.token(), None);
    assert_eq!(session.redirect_to(), Some(LOGIN_PATH));
}

#[test]
fn set_token_after_logout_clears_redirect() {
    let session = Session::new(Some("abc".into()));
    session.logout();
    session.set_token("fresh");
    assert_eq!(session.redirect_to(), None);
    assert!(session.is_signed_in());
}

#[tokio::test]
async fn subscribers_observe_logout() {
    let session = Session::new(Some("abc".into()));
    let mut rx = session.subscribe();
    session.logout();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().redirect_to, Some(LOGIN_PATH));
}

#[test]
fn token_from_cookie_finds_token_entry() {
    assert_eq!(token_from_cookie("theme=dark; token=eyJ.abc.def; lang=ar").as_deref(), Some("eyJ.abc.def"));
}

#[test]
fn token_from_cookie_decodes_percent_escapes() {
    assert_eq!(token_from_cookie("token=a%2Bb%3D").as_deref(), Some("a+b="));
}

#[test]
fn token_from_cookie_keeps_malformed_escapes() {
    assert_eq!(token_from_cookie("token=100%zz").as_deref(), Some("100%zz"));
}

#[test]
fn token_from_cookie_rejects_signed_escapes() {
    assert_eq!(token_from_cookie("token=a%+1b").as_deref(), Some("a%+1b"));
    assert_eq!(token_from_cookie("token=a%-1b").as_deref(), Some("a%-1b"));
}

#[test]
fn token_from_cookie_missing_or_empty_is_none() {
    assert_eq!(token_from_cookie("theme=dark"), None);
    assert_eq!(token_from_cookie("token=; theme=dark"), None);
    assert_eq!(token_from_cookie(""), None);
}
