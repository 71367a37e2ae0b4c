use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Keygate licensing API
Version: {version}

Seller panel endpoints:
  - POST /register        - Register a seller account
  - POST /login           - Seller login, returns owner_id
  - POST /sellers/delete  - Delete a seller (cascades to apps and users)
  - POST /apps/create     - Create an application, returns app_id + app_secret
  - POST /apps/list       - List applications for an owner
  - POST /apps/webhook    - Configure an application's login webhook
  - POST /apps/delete     - Delete an application (cascades to users)
  - POST /users/create    - Issue an end-user credential
  - POST /users/list      - List credentials for an application
  - POST /users/extend    - Extend a credential's expiry
  - POST /users/delete    - Delete a credential

Client endpoints:
  - POST /api/1.0/user_login - Validate a credential and bind its HWID

Operational endpoints:
  - GET  /health            - Light health check
  - GET  /health?mode=full  - Full health check (includes the store)
  - GET  /metrics           - Prometheus metrics
"#
    )
}
