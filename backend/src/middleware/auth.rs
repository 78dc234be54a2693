//! Authentication middleware
//!
//! Validates JWT access tokens and enforces the per-resource access policy.
//! The policy is a static table mapping {path prefix, safe vs. mutating verb}
//! to the required access level, consulted once per request.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// Required access level for a route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Access policy for one resource prefix
struct RoutePolicy {
    prefix: &'static str,
    read: Access,
    write: Access,
}

/// Static access-policy table. Read = GET/HEAD/OPTIONS, write = everything
/// else. Routes not listed here are public (the router 404s unknown paths).
static ACCESS_POLICY: &[RoutePolicy] = &[
    RoutePolicy {
        prefix: "/auth",
        read: Access::Public,
        write: Access::Public,
    },
    RoutePolicy {
        prefix: "/health",
        read: Access::Public,
        write: Access::Public,
    },
    RoutePolicy {
        prefix: "/dashboard",
        read: Access::Public,
        write: Access::Public,
    },
    // User CRUD is unrestricted in the current scope
    RoutePolicy {
        prefix: "/users",
        read: Access::Public,
        write: Access::Public,
    },
    RoutePolicy {
        prefix: "/products",
        read: Access::Public,
        write: Access::Authenticated,
    },
    RoutePolicy {
        prefix: "/suppliers",
        read: Access::Public,
        write: Access::Authenticated,
    },
    RoutePolicy {
        prefix: "/stock-movements",
        read: Access::Public,
        write: Access::Authenticated,
    },
    RoutePolicy {
        prefix: "/alerts",
        read: Access::Authenticated,
        write: Access::Authenticated,
    },
    RoutePolicy {
        prefix: "/reports",
        read: Access::Authenticated,
        write: Access::Authenticated,
    },
];

/// Look up the access level required for a method/path pair
pub fn required_access(method: &Method, path: &str) -> Access {
    let path = path.strip_prefix("/api").unwrap_or(path);
    let is_read = matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS);

    for policy in ACCESS_POLICY {
        let matched = path == policy.prefix
            || path
                .strip_prefix(policy.prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        if matched {
            return if is_read { policy.read } else { policy.write };
        }
    }

    Access::Public
}

/// Authenticated user information extracted from a JWT access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Authentication middleware
///
/// Decodes a Bearer token when one is supplied and stores the resulting
/// [`AuthUser`] in request extensions, then enforces the access policy for
/// the route. A supplied-but-invalid token is rejected even on public routes.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => Some(&header[7..]),
        _ => None,
    };

    // Decode and validate JWT token when present.
    // Secret comes from the environment (middleware runs without state).
    let jwt_secret = std::env::var("INVENTORY__JWT__SECRET")
        .or_else(|_| std::env::var("INVENTORY_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    if let Some(token) = token {
        match decode_access_token(token, &jwt_secret) {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(msg) => {
                return unauthorized_response(&msg);
            }
        }
    }

    let required = required_access(request.method(), request.uri().path());
    if required == Access::Authenticated && request.extensions().get::<AuthUser>().is_none() {
        return unauthorized_response("Authentication required");
    }

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    username: String,
    email: String,
    token_type: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate a JWT access token
fn decode_access_token(token: &str, secret: &str) -> Result<AuthUser, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))?;

    if claims.token_type != "access" {
        return Err("Invalid token: not an access token".to_string());
    }

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in token".to_string())?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
        email: claims.email,
    })
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for the authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_and_health_are_public() {
        assert_eq!(
            required_access(&Method::POST, "/api/auth/login"),
            Access::Public
        );
        assert_eq!(
            required_access(&Method::POST, "/api/auth/signup"),
            Access::Public
        );
        assert_eq!(required_access(&Method::GET, "/api/health"), Access::Public);
    }

    #[test]
    fn test_catalog_reads_are_public() {
        for prefix in ["/api/products", "/api/suppliers", "/api/stock-movements"] {
            assert_eq!(required_access(&Method::GET, prefix), Access::Public);
            assert_eq!(
                required_access(&Method::GET, &format!("{}/42", prefix)),
                Access::Public
            );
        }
    }

    #[test]
    fn test_catalog_writes_need_auth() {
        for prefix in ["/api/products", "/api/suppliers", "/api/stock-movements"] {
            assert_eq!(
                required_access(&Method::POST, prefix),
                Access::Authenticated
            );
            assert_eq!(
                required_access(&Method::PUT, &format!("{}/42", prefix)),
                Access::Authenticated
            );
            assert_eq!(
                required_access(&Method::PATCH, &format!("{}/42", prefix)),
                Access::Authenticated
            );
            assert_eq!(
                required_access(&Method::DELETE, &format!("{}/42", prefix)),
                Access::Authenticated
            );
        }
    }

    #[test]
    fn test_alerts_and_reports_need_auth_even_for_reads() {
        assert_eq!(
            required_access(&Method::GET, "/api/alerts/low-stock"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::GET, "/api/reports/low-stock"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::GET, "/api/reports/fast-moving"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::GET, "/api/reports/sales-vs-restock"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_users_and_dashboard_are_unrestricted() {
        assert_eq!(required_access(&Method::GET, "/api/users"), Access::Public);
        assert_eq!(
            required_access(&Method::DELETE, "/api/users/7"),
            Access::Public
        );
        assert_eq!(
            required_access(&Method::GET, "/api/dashboard/stats"),
            Access::Public
        );
    }

    #[test]
    fn test_prefix_match_requires_segment_boundary() {
        // "/reportsfoo" must not inherit the /reports policy
        assert_eq!(
            required_access(&Method::GET, "/api/reportsfoo"),
            Access::Public
        );
        assert_eq!(
            required_access(&Method::GET, "/api/reports"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_policy_works_with_and_without_api_prefix() {
        assert_eq!(
            required_access(&Method::POST, "/products"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::POST, "/api/products"),
            Access::Authenticated
        );
    }

    #[test]
    fn test_decode_rejects_garbage_token() {
        assert!(decode_access_token("not-a-jwt", "secret").is_err());
    }

    #[test]
    fn test_decode_rejects_refresh_token_and_wrong_secret() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "5".to_string(),
            username: "user@example.com".to_string(),
            email: "user@example.com".to_string(),
            token_type: "refresh".to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(decode_access_token(&token, "secret").is_err());

        let access = Claims {
            token_type: "access".to_string(),
            ..claims
        };
        let token = encode(
            &Header::default(),
            &access,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(decode_access_token(&token, "other-secret").is_err());

        let user = decode_access_token(&token, "secret").unwrap();
        assert_eq!(user.user_id, 5);
        assert_eq!(user.username, "user@example.com");
    }
}
