use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: "".to_string(),
        }
    }
}

/// Gives every listed response an `err` constructor that keeps all payload
/// fields at their (empty) defaults.
#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
}

/// Declares guarded `GET` views backed by `<name>_impl` functions returning
/// `Result<$response, StoreError>`.
///
/// A store failure never reaches the transport: the view answers 200 with an
/// empty payload and the "could not connect" notice in `err`.
#[macro_export]
macro_rules! view_funcs {
    ( $( ( $func_name:ident, $url:literal, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[get($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    session: SessionContext,
                    info: web::Query<$request>,
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, session, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::warn!(route = $url, cause = err.cause(), "serving empty view");
                            <$response>::err(err.to_string())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}
