use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use chrono::Utc;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use super::{bearer_token, SessionContext, SessionKeys, SESSION_COOKIE};
use crate::error::AuthError;

/// Rejects requests without a valid session token with a uniform 401 before
/// they reach a handler. Accepted requests carry their [`SessionContext`] in
/// the request extensions.
///
/// The token is read from the `login_token` cookie, or from an
/// `Authorization: Bearer` header for non-browser clients.
#[derive(Clone)]
pub struct RequireLogin;

impl<S, B> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireLoginMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginMiddleware { service }))
    }
}

pub struct RequireLoginMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireLoginMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(context) => {
                req.extensions_mut().insert(context);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                tracing::debug!(path = req.path(), "rejected request: {}", err);
                let response = err.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<SessionContext, AuthError> {
    let keys = match req.app_data::<web::Data<SessionKeys>>() {
        Some(keys) => keys,
        None => {
            tracing::error!("session keys missing from app data");
            return Err(AuthError::NotAuthenticated);
        }
    };
    let token = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(req.headers()).map(str::to_string))
        .ok_or(AuthError::NotAuthenticated)?;
    keys.verify(&token, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, http::StatusCode, test, App, HttpResponse};
    use rstest::rstest;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"guard secret", 3600).expect("keys")
    }

    fn context() -> SessionContext {
        SessionContext {
            technician_id: 3,
            technician_name: "Lee".to_string(),
            technician_expertise: Some("Plumbing".to_string()),
            technician_location: Some("LA".to_string()),
        }
    }

    async fn whoami(session: SessionContext) -> HttpResponse {
        HttpResponse::Ok().body(session.technician_name)
    }

    #[rstest]
    #[case::no_token(None, None)]
    #[case::garbage_cookie(Some("garbage"), None)]
    #[case::garbage_bearer(None, Some("Bearer garbage"))]
    #[actix_web::test]
    async fn rejects_without_valid_token(
        #[case] cookie: Option<&str>,
        #[case] authorization: Option<&str>,
    ) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(keys()))
                .service(web::scope("").wrap(RequireLogin).route("/me", web::get().to(whoami))),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/me");
        if let Some(cookie) = cookie {
            req = req.cookie(Cookie::new(SESSION_COOKIE, cookie.to_string()));
        }
        if let Some(authorization) = authorization {
            req = req.insert_header(("Authorization", authorization.to_string()));
        }
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn admits_cookie_and_bearer_tokens() {
        let keys = keys();
        let token = keys.issue(&context(), Utc::now()).expect("token");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(keys))
                .service(web::scope("").wrap(RequireLogin).route("/me", web::get().to(whoami))),
        )
        .await;

        let by_cookie = test::TestRequest::get()
            .uri("/me")
            .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
            .to_request();
        let body = test::call_and_read_body(&app, by_cookie).await;
        assert_eq!(body, "Lee");

        let by_header = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, by_header).await;
        assert_eq!(body, "Lee");
    }

    #[actix_web::test]
    async fn extractor_without_guard_is_unauthorized() {
        let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
