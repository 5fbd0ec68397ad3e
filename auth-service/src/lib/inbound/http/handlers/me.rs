use axum::http::StatusCode;
use axum::Extension;

use super::register::UserData;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Return the user the presented bearer token was issued for.
pub async fn me(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}
