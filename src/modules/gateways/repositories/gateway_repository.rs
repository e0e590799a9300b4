use crate::core::Result;
use crate::modules::gateways::models::Gateway;
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Lookup of host gateway records
#[async_trait]
pub trait GatewayRepository: Send + Sync {
    /// Find active gateway by endpoint
    async fn find_by_endpoint(&self, endpoint: &str) -> Result<Option<Gateway>>;

    /// List all active gateways
    async fn list_active(&self) -> Result<Vec<Gateway>>;
}

/// Gateway repository for database operations
#[derive(Clone)]
pub struct MySqlGatewayRepository {
    pool: MySqlPool,
}

impl MySqlGatewayRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GatewayRepository for MySqlGatewayRepository {
    async fn find_by_endpoint(&self, endpoint: &str) -> Result<Option<Gateway>> {
        let gateway = sqlx::query_as::<_, Gateway>(
            r#"
            SELECT endpoint, config, is_active
            FROM gateways
            WHERE endpoint = ? AND is_active = TRUE
            "#,
        )
        .bind(endpoint)
        .fetch_optional(&self.pool)
        .await?;

        Ok(gateway)
    }

    async fn list_active(&self) -> Result<Vec<Gateway>> {
        let gateways = sqlx::query_as::<_, Gateway>(
            r#"
            SELECT endpoint, config, is_active
            FROM gateways
            WHERE is_active = TRUE
            ORDER BY endpoint
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(gateways)
    }
}

/// Gateway records kept in process memory
#[derive(Default)]
pub struct InMemoryGatewayRepository {
    gateways: RwLock<HashMap<String, Gateway>>,
}

impl InMemoryGatewayRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, gateway: Gateway) {
        self.gateways
            .write()
            .await
            .insert(gateway.endpoint.clone(), gateway);
    }
}

#[async_trait]
impl GatewayRepository for InMemoryGatewayRepository {
    async fn find_by_endpoint(&self, endpoint: &str) -> Result<Option<Gateway>> {
        Ok(self
            .gateways
            .read()
            .await
            .get(endpoint)
            .filter(|g| g.is_active)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Gateway>> {
        let mut gateways: Vec<Gateway> = self
            .gateways
            .read()
            .await
            .values()
            .filter(|g| g.is_active)
            .cloned()
            .collect();
        gateways.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        Ok(gateways)
    }
}
