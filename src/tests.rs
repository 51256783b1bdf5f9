#[cfg(test)]
mod integration_tests {
    use crate::handlers::auth::LoginRequest;
    use crate::handlers::users::{UserListResponse, UserResponse};
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::{
        CLIENT_PASSWORD, CLIENT_USERNAME, admin_auth, basic_auth, setup_test_app,
    };
    use axum::http::{StatusCode, header::{AUTHORIZATION, WWW_AUTHENTICATE}};
    use axum_test::TestServer;
    use serde_json::json;

    async fn server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    fn signup_body(username: &str, tipo: &str, direccion: Option<&str>) -> serde_json::Value {
        json!({
            "username": username,
            "email": format!("{}@devoluciones.uy", username),
            "password1": "Retiro-Domicilio-42",
            "password2": "Retiro-Domicilio-42",
            "tipo": tipo,
            "direccion": direccion,
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_signup_client_with_address() {
        let server = server().await;

        let response = server
            .post("/accounts/signup")
            .json(&signup_body("ana", "cliente", Some("Bulevar Artigas 1500")))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Account created successfully");
        assert_eq!(body.data.username, "ana");
        assert_eq!(body.data.tipo, "cliente");
        assert_eq!(body.data.direccion.as_deref(), Some("Bulevar Artigas 1500"));

        // The stored account carries the same type and address
        let stored = server
            .get(&format!("/api/v1/admin/users/{}", body.data.id))
            .add_header(AUTHORIZATION, admin_auth())
            .await;
        stored.assert_status(StatusCode::OK);
        let stored: ApiResponse<UserResponse> = stored.json();
        assert_eq!(stored.data.tipo, "cliente");
        assert_eq!(stored.data.direccion.as_deref(), Some("Bulevar Artigas 1500"));
        assert!(!stored.data.is_staff);
    }

    #[tokio::test]
    async fn test_signup_without_address() {
        let server = server().await;

        let response = server
            .post("/accounts/signup")
            .json(&json!({
                "username": "beto",
                "email": "beto@devoluciones.uy",
                "password1": "Retiro-Domicilio-42",
                "password2": "Retiro-Domicilio-42",
                "tipo": "cliente",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.data.direccion, None);
    }

    #[tokio::test]
    async fn test_signup_carrier() {
        let server = server().await;

        let response = server
            .post("/accounts/signup")
            .json(&signup_body("fletes", "transportista", None))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.data.tipo, "transportista");
        assert_eq!(body.data.tipo_display, "Transportista");
    }

    #[tokio::test]
    async fn test_signup_password_mismatch_creates_nothing() {
        let server = server().await;

        let mut body = signup_body("diego", "cliente", Some("Colonia 900"));
        body["password2"] = json!("Otra-Clave-Distinta-1");

        let response = server.post("/accounts/signup").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert!(!error.success);
        assert_eq!(error.code, "VALIDATION_ERROR");
        let fields = error.fields.unwrap();
        assert_eq!(
            fields["password2"],
            vec!["You must type the same password each time.".to_string()]
        );

        // Only the fixture accounts exist
        let list = server
            .get("/api/v1/admin/users")
            .add_header(AUTHORIZATION, admin_auth())
            .await;
        let list: ApiResponse<UserListResponse> = list.json();
        assert_eq!(list.data.total, 2);
        assert!(list.data.users.iter().all(|u| u.username != "diego"));
    }

    #[tokio::test]
    async fn test_signup_rejects_admin_tipo() {
        let server = server().await;

        let response = server
            .post("/accounts/signup")
            .json(&signup_body("jefe", "admin", None))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert!(error.fields.unwrap().contains_key("tipo"));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username() {
        let server = server().await;

        let response = server
            .post("/accounts/signup")
            .json(&signup_body("CLIENTE1", "cliente", None))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(
            error.fields.unwrap()["username"],
            vec!["A user with that username already exists.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_login() {
        let server = server().await;

        let response = server
            .post("/accounts/login")
            .json(&LoginRequest {
                username: CLIENT_USERNAME.to_string(),
                password: CLIENT_PASSWORD.to_string(),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.message, "Login successful");
        assert!(body.data.last_login.is_some());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let server = server().await;

        let response = server
            .post("/accounts/login")
            .json(&LoginRequest {
                username: CLIENT_USERNAME.to_string(),
                password: "no-es-la-clave".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_admin_requires_credentials() {
        let server = server().await;

        let response = server.get("/api/v1/admin/users").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.header(WWW_AUTHENTICATE), "Basic realm=\"devoluciones\"");
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "AUTHENTICATION_REQUIRED");
    }

    #[tokio::test]
    async fn test_admin_rejects_non_staff() {
        let server = server().await;

        let response = server
            .get("/api/v1/admin/users")
            .add_header(AUTHORIZATION, basic_auth(CLIENT_USERNAME, CLIENT_PASSWORD))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn test_admin_create_without_tipo_defaults_to_client() {
        let server = server().await;

        let response = server
            .post("/api/v1/admin/users")
            .add_header(AUTHORIZATION, admin_auth())
            .json(&json!({
                "username": "mostrador",
                "password1": "Sucursal-Centro-31",
                "password2": "Sucursal-Centro-31",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data.tipo, "cliente");
        assert_eq!(body.data.direccion, None);
    }

    #[tokio::test]
    async fn test_admin_create_admin_account() {
        let server = server().await;

        let response = server
            .post("/api/v1/admin/users")
            .add_header(AUTHORIZATION, admin_auth())
            .json(&json!({
                "username": "supervisora",
                "password1": "Sucursal-Centro-31",
                "password2": "Sucursal-Centro-31",
                "tipo": "admin",
                "is_staff": true,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.data.tipo, "admin");
        assert!(body.data.is_staff);
    }

    #[tokio::test]
    async fn test_admin_update_tipo_and_direccion() {
        let server = server().await;

        let created = server
            .post("/accounts/signup")
            .json(&signup_body("ramiro", "cliente", Some("Rivera 2020")))
            .await;
        let created: ApiResponse<UserResponse> = created.json();

        let response = server
            .put(&format!("/api/v1/admin/users/{}", created.data.id))
            .add_header(AUTHORIZATION, admin_auth())
            .json(&json!({ "tipo": "transportista", "direccion": "Galicia 1100" }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.message, "User updated successfully");
        assert_eq!(body.data.tipo, "transportista");
        assert_eq!(body.data.direccion.as_deref(), Some("Galicia 1100"));
        assert_eq!(body.data.username, "ramiro");
    }

    #[tokio::test]
    async fn test_admin_list_filters_by_tipo() {
        let server = server().await;

        server
            .post("/accounts/signup")
            .json(&signup_body("fletes", "transportista", None))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/v1/admin/users")
            .add_query_param("tipo", "transportista")
            .add_header(AUTHORIZATION, admin_auth())
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserListResponse> = response.json();
        assert_eq!(body.data.total, 1);
        assert_eq!(body.data.users[0].username, "fletes");

        let invalid = server
            .get("/api/v1/admin/users")
            .add_query_param("tipo", "gerente")
            .add_header(AUTHORIZATION, admin_auth())
            .await;
        invalid.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_list_pagination() {
        let server = server().await;

        let response = server
            .get("/api/v1/admin/users")
            .add_query_param("page", 2)
            .add_query_param("per_page", 1)
            .add_header(AUTHORIZATION, admin_auth())
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserListResponse> = response.json();
        assert_eq!(body.data.total, 2);
        assert_eq!(body.data.page, 2);
        assert_eq!(body.data.users.len(), 1);
        assert_eq!(body.data.users[0].username, CLIENT_USERNAME);
    }

    #[tokio::test]
    async fn test_admin_get_missing_user() {
        let server = server().await;

        let response = server
            .get("/api/v1/admin/users/9999")
            .add_header(AUTHORIZATION, admin_auth())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_delete_user() {
        let server = server().await;

        let created = server
            .post("/accounts/signup")
            .json(&signup_body("efimero", "cliente", None))
            .await;
        let created: ApiResponse<UserResponse> = created.json();
        let path = format!("/api/v1/admin/users/{}", created.data.id);

        let response = server.delete(&path).add_header(AUTHORIZATION, admin_auth()).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "User deleted successfully");

        server
            .get(&path)
            .add_header(AUTHORIZATION, admin_auth())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
