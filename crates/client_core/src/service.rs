//! Persistence collaborator: the remote employee service and its HTTP client.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Employee, EmployeeDraft, EmployeeId},
    error::ApiError,
    protocol::{
        delete_employee_path, ADD_EMPLOYEE_PATH, LIST_EMPLOYEES_PATH, UPDATE_EMPLOYEE_PATH,
    },
};
use tracing::debug;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote store of employee records. Each call resolves exactly once.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>>;
    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee>;
    async fn update_employee(&self, employee: &Employee) -> Result<Employee>;
    async fn delete_employee(&self, id: Option<EmployeeId>) -> Result<()>;
}

pub struct HttpEmployeeService {
    http: Client,
    base_url: String,
}

impl HttpEmployeeService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid employee service url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("employee service url must use http or https, got '{base_url}'");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl EmployeeService for HttpEmployeeService {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let url = self.endpoint(LIST_EMPLOYEES_PATH);
        let res = self.http.get(&url).send().await?;
        let res = ensure_success(res).await?;
        let employees: Vec<Employee> = res.json().await.context("malformed employee list")?;
        debug!(count = employees.len(), "listed employees");
        Ok(employees)
    }

    async fn create_employee(&self, draft: &EmployeeDraft) -> Result<Employee> {
        let url = self.endpoint(ADD_EMPLOYEE_PATH);
        let res = self.http.post(&url).json(draft).send().await?;
        let res = ensure_success(res).await?;
        let created: Employee = res.json().await.context("malformed created employee")?;
        debug!(id = ?created.id, "created employee");
        Ok(created)
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Employee> {
        let url = self.endpoint(UPDATE_EMPLOYEE_PATH);
        let res = self.http.put(&url).json(employee).send().await?;
        let res = ensure_success(res).await?;
        let updated: Employee = res.json().await.context("malformed updated employee")?;
        debug!(id = ?updated.id, "updated employee");
        Ok(updated)
    }

    async fn delete_employee(&self, id: Option<EmployeeId>) -> Result<()> {
        let url = self.endpoint(&delete_employee_path(id));
        let res = self.http.delete(&url).send().await?;
        ensure_success(res).await?;
        debug!(id = ?id, "deleted employee");
        Ok(())
    }
}

async fn ensure_success(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let url = res.url().to_string();
    let body = res.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => api_error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        Err(_) => body,
    };
    Err(anyhow!("{url} responded {}: {detail}", status.as_u16()))
}
