//! Factory for creating repository instances.

use std::sync::Arc;

use super::config::{BackendKind, RepositoryConfig};
use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryResult};

/// Factory for constructing repository backends from configuration.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create the repository selected by `config`.
    pub fn create(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config.backend {
            BackendKind::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_creates_healthy_local_repo() {
        let config = RepositoryConfig::default();
        let repo = RepositoryFactory::create(&config).unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
