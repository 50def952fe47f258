//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod job_repo;
pub mod notification_repo;
pub mod onboarding_repo;
pub mod payment_repo;
pub mod setting_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use job_repo::JobRepo;
pub use notification_repo::NotificationRepo;
pub use onboarding_repo::OnboardingRepo;
pub use payment_repo::PaymentRepo;
pub use setting_repo::SettingRepo;
pub use subscription_repo::SubscriptionRepo;
pub use user_repo::UserRepo;
