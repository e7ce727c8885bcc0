//! Connect RPC backend client
//!
//! The budgeting backend speaks the Connect protocol; every call is a
//! `POST {base}/budget.v1.<Service>/<Method>` with a camelCase JSON body
//! and an optional bearer token. Only the three services the import engine
//! consumes are implemented here.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{
    CategoryKind, CategoryRecord, CategoryTranslation, PreparedTransaction, TenantMembership,
    TransactionType,
};
use crate::ports::{CategoryClient, NewCategory, TenantClient, TransactionClient};

/// HTTP client for the budget backend
#[derive(Debug, Clone)]
pub struct ConnectBackend {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ConnectBackend {
    /// Create a client for the given base URL
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Backend URL must be http(s), got '{}'",
                base_url.scheme()
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            auth_token,
        })
    }

    /// Issue one unary Connect call
    async fn call<Req, Resp>(&self, service: &str, method: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let path = format!("budget.v1.{}/{}", service, method);
        let url = self
            .base_url
            .join(&path)
            .map_err(|e| Error::config(format!("Bad RPC path '{}': {}", path, e)))?;

        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::backend(format!(
                "{} {}: {}",
                status.as_u16(),
                path,
                message
            )));
        }
        Ok(response.json().await?)
    }
}

// === Wire DTOs (Connect JSON, camelCase) ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListCategoriesRequest {
    kind: CategoryKind,
    include_inactive: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCategoriesResponse {
    #[serde(default)]
    categories: Vec<CategoryRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCategoryRequest<'a> {
    kind: CategoryKind,
    code: &'a str,
    is_active: bool,
    translations: &'a [CategoryTranslation],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCategoryResponse {
    category: CategoryRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoneyDto<'a> {
    currency_code: &'a str,
    minor_units: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimestampDto {
    seconds: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionRequest<'a> {
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    amount: MoneyDto<'a>,
    occurred_at: TimestampDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a str>,
    comment: &'a str,
}

#[derive(Debug, Serialize)]
struct ListMyTenantsRequest {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMyTenantsResponse {
    #[serde(default)]
    memberships: Vec<TenantMembership>,
}

#[async_trait]
impl CategoryClient for ConnectBackend {
    async fn list_categories(
        &self,
        kind: CategoryKind,
        include_inactive: bool,
    ) -> Result<Vec<CategoryRecord>> {
        let resp: ListCategoriesResponse = self
            .call(
                "CategoryService",
                "ListCategories",
                &ListCategoriesRequest {
                    kind,
                    include_inactive,
                },
            )
            .await?;
        Ok(resp.categories)
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord> {
        let resp: CreateCategoryResponse = self
            .call(
                "CategoryService",
                "CreateCategory",
                &CreateCategoryRequest {
                    kind: category.kind,
                    code: &category.code,
                    is_active: category.is_active,
                    translations: &category.translations,
                },
            )
            .await?;
        Ok(resp.category)
    }
}

#[async_trait]
impl TransactionClient for ConnectBackend {
    async fn create_transaction(&self, tx: &PreparedTransaction) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "TransactionService",
                "CreateTransaction",
                &CreateTransactionRequest {
                    transaction_type: tx.transaction_type,
                    amount: MoneyDto {
                        currency_code: &tx.amount.currency_code,
                        minor_units: tx.amount.minor_units,
                    },
                    occurred_at: TimestampDto {
                        seconds: tx.occurred_at,
                    },
                    category_id: tx.category_id.as_deref(),
                    comment: &tx.comment,
                },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TenantClient for ConnectBackend {
    async fn list_my_tenants(&self) -> Result<Vec<TenantMembership>> {
        let resp: ListMyTenantsResponse = self
            .call("TenantService", "ListMyTenants", &ListMyTenantsRequest {})
            .await?;
        Ok(resp.memberships)
    }
}
