#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::PathItemType;

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));
        assert!(components.schemas.contains_key("SignupForm"));
        assert!(components.schemas.contains_key("UserResponse"));

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = error_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
            assert!(properties.contains_key("fields"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_signup_form_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let signup_schema = components.schemas.get("SignupForm").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = signup_schema {
            for field in ["username", "email", "password1", "password2", "tipo", "direccion"] {
                assert!(obj.properties.contains_key(field), "missing {}", field);
            }
        } else {
            panic!("SignupForm should be an object schema");
        }
    }

    #[test]
    fn test_openapi_paths_contain_account_endpoints() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let signup = paths.get("/accounts/signup").unwrap();
        let signup_post = signup.operations.get(&PathItemType::Post).unwrap();
        assert!(signup_post.responses.responses.contains_key("201"));
        assert!(signup_post.responses.responses.contains_key("400"));

        assert!(paths.get("/accounts/login").unwrap().operations.contains_key(&PathItemType::Post));
        assert!(paths.get("/health").unwrap().operations.contains_key(&PathItemType::Get));

        let users = paths.get("/api/v1/admin/users").unwrap();
        assert!(users.operations.contains_key(&PathItemType::Get));
        assert!(users.operations.contains_key(&PathItemType::Post));

        let user = paths.get("/api/v1/admin/users/{user_id}").unwrap();
        assert!(user.operations.contains_key(&PathItemType::Get));
        assert!(user.operations.contains_key(&PathItemType::Put));
        assert!(user.operations.contains_key(&PathItemType::Delete));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
