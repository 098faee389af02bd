use serde_json::Value;
use uuid::Uuid;

use crate::filter::{validate_identifier, FilterError, SortDirection};

use super::client::{DataClient, DataServiceError};

/// Ordering applied to a repository listing. Listings always carry one
/// deterministic ordering column.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub order_by: String,
    pub ascending: bool,
}

impl ListOptions {
    pub fn desc(order_by: impl Into<String>) -> Self {
        Self { order_by: order_by.into(), ascending: false }
    }

    pub fn asc(order_by: impl Into<String>) -> Self {
        Self { order_by: order_by.into(), ascending: true }
    }

    fn direction(&self) -> SortDirection {
        if self.ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Thin generic wrapper over one table, bound to the caller's verified
/// token. Every operation runs under that user's row-level permissions.
pub struct AuthenticatedRepository {
    client: DataClient,
    table: String,
}

impl AuthenticatedRepository {
    pub fn new(client: DataClient, table: impl Into<String>) -> Result<Self, FilterError> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self { client, table })
    }

    /// All rows visible to the caller, ordered per `options`.
    pub async fn find_all(&self, options: &ListOptions) -> Result<Vec<Value>, DataServiceError> {
        self.client
            .from(&self.table)?
            .order(&options.order_by, options.direction())?
            .select()
            .await
    }

    /// Insert a record, stamping `criado_por` with the creating user when
    /// supplied. Returns the inserted row.
    pub async fn create(
        &self,
        mut record: Value,
        created_by: Option<Uuid>,
    ) -> Result<Value, DataServiceError> {
        if let (Some(user_id), Some(obj)) = (created_by, record.as_object_mut()) {
            obj.insert("criado_por".to_string(), Value::String(user_id.to_string()));
        }
        self.client.from(&self.table)?.insert(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataServiceConfig;
    use url::Url;

    fn client() -> DataClient {
        let config = DataServiceConfig {
            base_url: Url::parse("http://localhost:54321/").unwrap(),
            anon_key: "anon".to_string(),
            service_key: "service".to_string(),
        };
        DataClient::for_user(&config, &reqwest::Client::new(), "jwt")
    }

    #[test]
    fn rejects_invalid_table_name() {
        assert!(AuthenticatedRepository::new(client(), "safras").is_ok());
        assert!(AuthenticatedRepository::new(client(), "safras;--").is_err());
    }

    #[test]
    fn list_options_direction() {
        assert_eq!(ListOptions::desc("data").direction(), SortDirection::Desc);
        assert_eq!(ListOptions::asc("nome").direction(), SortDirection::Asc);
    }
}
