//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, test, web};

use super::ApiResult;
use super::session::SessionContext;
use crate::domain::{Error, UserId};

/// Route that signs the path's user id into the session cookie.
pub const TEST_LOGIN_PATH: &str = "/test/login/{user_id}";

/// Session middleware with a throwaway key, cookie name `session`, and the
/// `Secure` flag off so plain-HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler for [`TEST_LOGIN_PATH`] standing in for the identity service.
pub async fn test_login(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let user_id =
        UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Request that logs `user_id` in through [`TEST_LOGIN_PATH`].
pub fn login_request(user_id: &UserId) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/test/login/{user_id}"))
}

/// Session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("response sets a session cookie")
}
