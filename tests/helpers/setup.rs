use jsonwebtoken::{encode, EncodingKey, Header};
use salon_scheduler_api::Application;
use salon_scheduler_domain::{User, UserRole};
use salon_scheduler_infra::SalonContext;
use salon_scheduler_sdk::SalonSDK;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    exp: usize,
    user_id: String,
}

pub struct TestApp {
    pub ctx: SalonContext,
    pub address: String,
}

impl TestApp {
    /// Stores a new user and returns it with an sdk authenticated as that user
    pub async fn create_user(&self, role: UserRole) -> (User, SalonSDK) {
        let mut user = User::new("Asha Rao", "asha@example.com");
        user.role = role;
        self.ctx
            .repos
            .users
            .insert(&user)
            .await
            .expect("To insert user");

        let claims = Claims {
            exp: (chrono::Utc::now().timestamp() + 60 * 60) as usize,
            user_id: user.id.to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.ctx.config.jwt_secret.as_bytes()),
        )
        .expect("To create token");

        (user, SalonSDK::with_token(self.address.clone(), token))
    }
}

// Launch the application as a background task
pub async fn spawn_app_with<F: FnOnce(&mut SalonContext)>(configure: F) -> (TestApp, SalonSDK) {
    let mut ctx = SalonContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.timezone = chrono_tz::UTC;
    // Sweeps are triggered explicitly
    ctx.config.reminder_sweep_interval_secs = 60 * 60 * 24;
    configure(&mut ctx);

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = SalonSDK::new(address.clone());
    (TestApp { ctx, address }, sdk)
}

pub async fn spawn_app() -> (TestApp, SalonSDK) {
    spawn_app_with(|_| ()).await
}
