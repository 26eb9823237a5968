use sentira_types::error::RepositoryError;
use sentira_types::profile::UserProfile;
use sentira_types::report::UserStatistics;

/// User profile persistence.
pub trait UserRepository: Send + Sync {
    /// Insert a profile if none exists for this user id; return the stored
    /// profile either way.
    fn ensure_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, RepositoryError>> + Send;

    fn get_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;

    /// Aggregate counts and first/last interaction timestamps.
    fn get_statistics(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<UserStatistics, RepositoryError>> + Send;
}
