use actix_web::cookie::Key;
use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{GithubProvider, ProviderError, ProviderUser, SessionStorage};
use crate::errors::AppError;
use crate::handlers::response::BaseResponse;

pub const LOGIN_PATH: &str = "/api/v1/auth/login";

const USER_KEY: &str = "user";
const ACCESS_TOKEN_KEY: &str = "access_token";
const STATE_KEY: &str = "oauth_state";

/// Signed-in identity as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub user: ProviderUser,
    pub access_token: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn provider_failure(e: ProviderError) -> AppError {
    log::warn!("sign-in failed: {e}");
    AppError::Provider(e.to_string())
}

fn redirect(status: StatusCode, location: &str, session: &SessionStorage) -> HttpResponse {
    let mut resp = HttpResponse::build(status);
    resp.insert_header((LOCATION, location));
    session.apply(&mut resp);
    resp.finish()
}

/// GET /api/v1/auth/
///
/// Shows the identity stored in the session, or sends the caller to sign in.
#[utoipa::path(
    get,
    path = "/api/v1/auth/",
    responses(
        (status = 200, description = "Signed in", body = BaseResponse<Identity>),
        (status = 302, description = "No identity in session; redirect to sign-in"),
    ),
    tag = "auth"
)]
pub async fn home(req: HttpRequest, key: web::Data<Key>) -> HttpResponse {
    let session = SessionStorage::from_request(&req, &key);

    let user = session.get_item(USER_KEY);
    if user.is_empty() {
        return redirect(StatusCode::FOUND, LOGIN_PATH, &session);
    }

    match serde_json::from_str::<ProviderUser>(&user) {
        Ok(user) => {
            let identity = Identity {
                user,
                access_token: session.get_item(ACCESS_TOKEN_KEY),
            };
            BaseResponse::respond(StatusCode::OK, identity, "Signed in")
        }
        Err(e) => {
            log::warn!("discarding unreadable session user: {e}");
            redirect(StatusCode::FOUND, LOGIN_PATH, &session)
        }
    }
}

/// GET /api/v1/auth/login
///
/// Redirects to the provider's authorize page with a fresh `state` that the
/// callback checks against the session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/login",
    responses(
        (status = 307, description = "Redirect to the identity provider"),
        (status = 500, description = "Provider misconfigured", body = String),
    ),
    tag = "auth"
)]
pub async fn sign_in(
    req: HttpRequest,
    key: web::Data<Key>,
    provider: web::Data<GithubProvider>,
) -> Result<HttpResponse, AppError> {
    let mut session = SessionStorage::from_request(&req, &key);

    let state = Uuid::new_v4().simple().to_string();
    let url = provider.authorization_url(&state).map_err(provider_failure)?;
    session.set_item(STATE_KEY, state);

    Ok(redirect(StatusCode::TEMPORARY_REDIRECT, url.as_str(), &session))
}

/// GET /api/v1/auth/callback
///
/// Completes the code exchange and stores the resulting identity in the
/// session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Authentication successful", body = BaseResponse<Identity>),
        (status = 500, description = "Raw provider error", body = String),
    ),
    tag = "auth"
)]
pub async fn callback(
    req: HttpRequest,
    key: web::Data<Key>,
    provider: web::Data<GithubProvider>,
    query: web::Query<CallbackParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let mut session = SessionStorage::from_request(&req, &key);

    if let Some(error) = params.error {
        return Err(provider_failure(ProviderError::OAuth {
            error,
            description: params.error_description.unwrap_or_default(),
        }));
    }

    let expected_state = session.get_item(STATE_KEY);
    if expected_state.is_empty() || params.state.as_deref() != Some(expected_state.as_str()) {
        return Err(provider_failure(ProviderError::StateMismatch));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or(ProviderError::MissingCode)
        .map_err(provider_failure)?;

    let access_token = provider.exchange_code(&code).await.map_err(provider_failure)?;
    let user = provider.fetch_user(&access_token).await.map_err(provider_failure)?;
    let user_json = serde_json::to_string(&user).map_err(|e| AppError::Provider(e.to_string()))?;

    session.set_item(USER_KEY, user_json);
    session.set_item(ACCESS_TOKEN_KEY, access_token.clone());
    session.set_item(STATE_KEY, "");
    log::info!("signed in provider user {}", user.login);

    let mut resp = HttpResponse::Ok();
    session.apply(&mut resp);
    Ok(resp.json(BaseResponse::new(
        StatusCode::OK,
        Identity { user, access_token },
        "Authentication successful",
    )))
}
