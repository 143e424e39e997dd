//! Gateway identity boundary. Authentication itself happens upstream; the
//! gateway forwards the verified caller as `x-user-id` / `x-user-role`
//! headers and this extractor is the only place that reads them.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_instructor(&self) -> Result<(), AppError> {
        match self.role {
            Role::Instructor => Ok(()),
            _ => Err(AppError::Authorization(
                "instructor role required".to_string(),
            )),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_str(parts, "x-user-id")?
            .parse::<Uuid>()
            .map_err(|_| AppError::Authentication("invalid x-user-id header".to_string()))?;
        let role = header_str(parts, "x-user-role")?
            .parse::<Role>()
            .map_err(|_| AppError::Authentication("invalid x-user-role header".to_string()))?;
        Ok(AuthUser { id, role })
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication(format!("missing {} header", name)))
}
