use rocket::Request;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome};

use crate::storage::{Store, credentials};

use super::Identity;

pub const SESSION_COOKIE: &str = "user_id";

/// Marks the browser as logged in as `identity`. The cookie is encrypted, so
/// the user id inside it can be trusted on the way back in.
pub fn start_session(cookies: &CookieJar<'_>, identity: &Identity) {
    cookies.add_private(
        Cookie::build((SESSION_COOKIE, identity.user_id.clone()))
            .same_site(SameSite::Lax)
            .http_only(true),
    );
}

pub fn end_session(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::build(SESSION_COOKIE));
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Identity {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_span = tracing::info_span!("identity_guard");
        let _guard = auth_span.enter();

        let user_id = match request.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Outcome::Forward(Status::Unauthorized),
        };

        let store = match request.rocket().state::<Store>() {
            Some(store) => store,
            None => {
                tracing::error!("Store not found in managed state");
                return Outcome::Error((Status::InternalServerError, ()));
            }
        };

        // Re-resolve so a removed account loses its session.
        match credentials::find(store, &user_id) {
            Some(credential) => {
                tracing::debug!(user_id = %user_id, "Session resolved");
                Outcome::Success(credential.identity())
            }
            None => {
                tracing::warn!(user_id = %user_id, "Session refers to unknown user");
                request.cookies().remove_private(Cookie::build(SESSION_COOKIE));
                Outcome::Forward(Status::Unauthorized)
            }
        }
    }
}
