use crate::error::SalonError;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use salon_scheduler_domain::{Appointment, User, ID};
use salon_scheduler_infra::SalonContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Expiration time (as UTC timestamp in seconds)
    pub exp: usize,
    pub user_id: String,
}

fn parse_authtoken_header(token_header_value: &str) -> String {
    token_header_value
        .replace("Bearer", "")
        .replace("bearer", "")
        .trim()
        .to_string()
}

pub fn decode_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?
    .claims;
    Ok(claims)
}

async fn auth_user_req(req: &HttpRequest, ctx: &SalonContext) -> Option<User> {
    let token = req.headers().get("authorization")?.to_str().ok()?;
    let token = parse_authtoken_header(token);
    let claims = decode_token(&token, &ctx.config.jwt_secret).ok()?;
    let user_id = claims.user_id.parse::<ID>().ok()?;
    ctx.repos.users.find(&user_id).await
}

/// The authenticated `User` if the request carries valid credentials
pub async fn protect_optional_route(req: &HttpRequest, ctx: &SalonContext) -> Option<User> {
    auth_user_req(req, ctx).await
}

pub async fn protect_route(req: &HttpRequest, ctx: &SalonContext) -> Result<User, SalonError> {
    auth_user_req(req, ctx).await.ok_or_else(|| {
        SalonError::Unauthorized(
            "Unable to find user from credentials. Provide a valid bearer token in the authorization header."
                .into(),
        )
    })
}

pub async fn protect_admin_route(
    req: &HttpRequest,
    ctx: &SalonContext,
) -> Result<User, SalonError> {
    let user = protect_route(req, ctx).await?;
    if !user.is_admin() {
        return Err(SalonError::Forbidden(
            "Only admins are allowed to perform this action".into(),
        ));
    }
    Ok(user)
}

/// Finds the `Appointment` if it is owned by the `User`
pub async fn user_can_access_appointment(
    user: &User,
    appointment_id: &ID,
    ctx: &SalonContext,
) -> Result<Appointment, SalonError> {
    match ctx.repos.appointments.find(appointment_id).await {
        Some(appointment) if appointment.is_owned_by(&user.id) => Ok(appointment),
        _ => Err(SalonError::NotFound(format!(
            "The appointment with id: {}, was not found.",
            appointment_id
        ))),
    }
}
