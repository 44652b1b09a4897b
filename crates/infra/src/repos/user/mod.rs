mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;
use salon_scheduler_domain::{User, ID};

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_by_email(&self, email: &str) -> Option<User>;
}

#[cfg(test)]
mod tests {
    use crate::SalonContext;
    use salon_scheduler_domain::{User, UserRole};

    #[tokio::test]
    async fn inserts_and_finds_users() {
        let ctx = SalonContext::create_inmemory();
        let mut user = User::new("Meera", " Meera@Example.com");
        ctx.repos.users.insert(&user).await.expect("To insert user");

        let found = ctx.repos.users.find(&user.id).await.expect("To find user");
        assert_eq!(found.email, "meera@example.com");
        assert_eq!(found.role, UserRole::Customer);

        user.role = UserRole::Admin;
        ctx.repos.users.save(&user).await.expect("To save user");
        let found = ctx
            .repos
            .users
            .find_by_email("meera@example.com")
            .await
            .expect("To find user by email");
        assert!(found.is_admin());
        assert!(ctx.repos.users.find_by_email("nobody@example.com").await.is_none());
    }
}
