mod requests;
mod responses;
pub mod utils;

use crate::{
    database::{with_conn, DbPool},
    error::{AuthError, StoreError},
    protocol::SimpleResponse,
    query::{AnalyticsSeries, AppointmentQuery, Scope},
    session::{removal_cookie, session_cookie, SessionContext, SessionKeys},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use anyhow::bail;
use chrono::Utc;

use self::{
    requests::{AnalyticsRequest, LoginRequest, ViewRequest},
    responses::{AnalyticsResponse, AppointmentsResponse, LoginResponse, ProfileResponse},
};

/// Window of the on-screen analytics and their exports.
pub const ANALYTICS_WINDOW_DAYS: u32 = 7;

/// Routes reachable without a session.
pub fn config_public(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout);
}

/// Routes that need [`crate::session::RequireLogin`] in front of them.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(profile)
        .service(history)
        .service(analytics);
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    keys: web::Data<SessionKeys>,
    info: web::Json<LoginRequest>,
) -> impl Responder {
    match login_impl(pool, keys.clone(), info).await {
        Ok(response) => {
            let cookie = session_cookie(response.login_token.clone(), keys.max_age_secs());
            HttpResponse::Ok().cookie(cookie).json(response)
        }
        Err(err) => HttpResponse::Ok().json(LoginResponse::err(err)),
    }
}

async fn login_impl(
    pool: web::Data<DbPool>,
    keys: web::Data<SessionKeys>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    let info = info.into_inner();
    let email = info.email.trim().to_string();

    let lookup = email.clone();
    let technician = with_conn(&pool, move |conn| Ok(utils::find_by_email(conn, &lookup)?))
        .await
        .map_err(|err| {
            tracing::warn!(cause = err.cause(), "login lookup failed");
            err
        })?;
    let technician = match technician {
        Some(technician) => technician,
        None => {
            tracing::info!(%email, "login rejected: unknown email");
            bail!(AuthError::InvalidCredentials);
        }
    };

    let stored = technician.password.clone();
    let valid = web::block(move || utils::verify_password(&info.password, &stored))
        .await
        .map_err(StoreError::from)?;
    if !valid {
        tracing::info!(%email, "login rejected: wrong password");
        bail!(AuthError::InvalidCredentials);
    }

    let context = SessionContext::from(&technician);
    let login_token = keys.issue(&context, Utc::now())?;
    tracing::info!(technician_id = technician.id, "technician logged in");

    Ok(LoginResponse {
        success: true,
        err: "".to_string(),
        login_token,
        technician_name: technician.name,
    })
}

#[get("/logout")]
async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(SimpleResponse::ok())
}

crate::view_funcs! {
    (dashboard, "/dashboard", ViewRequest, AppointmentsResponse),
    (profile, "/profile", ViewRequest, ProfileResponse),
    (history, "/history", ViewRequest, AppointmentsResponse),
    (analytics, "/analytics", AnalyticsRequest, AnalyticsResponse),
}

async fn dashboard_impl(
    pool: web::Data<DbPool>,
    session: SessionContext,
    _info: web::Query<ViewRequest>,
) -> Result<AppointmentsResponse, StoreError> {
    let appointments = AppointmentQuery::new(&pool, &session).find_today().await?;
    Ok(AppointmentsResponse::rows(appointments))
}

async fn profile_impl(
    pool: web::Data<DbPool>,
    session: SessionContext,
    _info: web::Query<ViewRequest>,
) -> Result<ProfileResponse, StoreError> {
    let id = session.technician_id;
    let scope = Scope::from_session(&session);
    let found =
        with_conn(&pool, move |conn| Ok(utils::find_profile(conn, id, scope.as_ref())?)).await?;
    match found {
        Some((technician, total)) => Ok(ProfileResponse::new(technician, total)),
        None => Ok(ProfileResponse::err("Technician not found")),
    }
}

async fn history_impl(
    pool: web::Data<DbPool>,
    session: SessionContext,
    _info: web::Query<ViewRequest>,
) -> Result<AppointmentsResponse, StoreError> {
    let appointments = AppointmentQuery::new(&pool, &session).find_all().await?;
    Ok(AppointmentsResponse::rows(appointments))
}

async fn analytics_impl(
    pool: web::Data<DbPool>,
    session: SessionContext,
    info: web::Query<AnalyticsRequest>,
) -> Result<AnalyticsResponse, StoreError> {
    let window_days = info.window_days.unwrap_or(ANALYTICS_WINDOW_DAYS);
    let bundle = AppointmentQuery::new(&pool, &session)
        .analytics(window_days)
        .await?;
    Ok(AnalyticsResponse {
        success: true,
        err: "".to_string(),
        window_days: Some(window_days),
        analytics: AnalyticsSeries::from(&bundle),
    })
}
