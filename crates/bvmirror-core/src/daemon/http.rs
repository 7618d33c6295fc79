//! HTTP JSON implementation of the daemon capability (Gopeed-style API).
//!
//! Every response is an envelope `{code, msg, data}` where code 0 means
//! success. Calls carry no explicit timeout; the transport default applies.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::{DaemonClient, DaemonError, ResolvedRequest, TaskHandle, TaskStatus};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self, call: &'static str) -> Result<T, DaemonError> {
        if self.code != 0 {
            return Err(DaemonError::Api {
                call,
                code: self.code,
                msg: self.msg.unwrap_or_default(),
            });
        }
        self.data.ok_or(DaemonError::MissingData(call))
    }

    fn into_ok(self, call: &'static str) -> Result<(), DaemonError> {
        if self.code != 0 {
            return Err(DaemonError::Api {
                call,
                code: self.code,
                msg: self.msg.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ServerInfoData {
    version: String,
}

#[derive(Debug, Deserialize)]
struct ResolveData {
    id: String,
    res: ResolveResource,
}

#[derive(Debug, Deserialize)]
struct ResolveResource {
    files: Vec<ResolveFile>,
}

#[derive(Debug, Deserialize)]
struct ResolveFile {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TaskInfo {
    id: String,
    status: TaskStatus,
}

/// Client for one daemon instance. Destination dirs are joined onto
/// `download_root`, the directory the daemon itself saves into.
pub struct HttpDaemonClient {
    base: String,
    download_root: String,
    client: reqwest::Client,
}

impl HttpDaemonClient {
    pub fn new(base_url: impl Into<String>, download_root: impl Into<String>) -> Self {
        Self {
            base: base_url.into().trim_end_matches('/').to_string(),
            download_root: download_root.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Envelope<T>, DaemonError> {
        Ok(self.client.get(url).send().await?.json().await?)
    }
}

#[async_trait]
impl DaemonClient for HttpDaemonClient {
    async fn server_info(&self) -> Result<String, DaemonError> {
        let envelope: Envelope<ServerInfoData> =
            self.get_json(&self.url("/api/v1/info")).await?;
        Ok(envelope.into_data("server_info")?.version)
    }

    async fn resolve(&self, url: &str) -> Result<ResolvedRequest, DaemonError> {
        let body = json!({ "req": { "url": url } });
        let envelope: Envelope<ResolveData> = self
            .client
            .post(self.url("/api/v1/resolve"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        let data = envelope.into_data("resolve")?;
        let filename = data
            .res
            .files
            .first()
            .map(|f| f.name.clone())
            .ok_or(DaemonError::MissingData("resolve"))?;
        Ok(ResolvedRequest {
            id: data.id,
            filename,
        })
    }

    async fn create_task(
        &self,
        resolved_id: &str,
        filename: &str,
        dest_dir: &str,
    ) -> Result<TaskHandle, DaemonError> {
        let path = format!(
            "{}{}",
            self.download_root,
            dest_dir.trim_start_matches('/')
        );
        let body = json!({
            "rid": resolved_id,
            "opt": { "name": filename, "path": path },
        });
        let envelope: Envelope<String> = self
            .client
            .post(self.url("/api/v1/tasks"))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_data("create_task")
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<TaskHandle>, DaemonError> {
        let url = match status {
            Some(TaskStatus::Queued) => self.url("/api/v1/tasks?status=queued"),
            Some(TaskStatus::Running) => self.url("/api/v1/tasks?status=running"),
            Some(TaskStatus::Done) => self.url("/api/v1/tasks?status=done"),
            Some(TaskStatus::Error) => self.url("/api/v1/tasks?status=error"),
            None => self.url("/api/v1/tasks"),
        };
        let envelope: Envelope<Vec<TaskInfo>> = self.get_json(&url).await?;
        Ok(envelope
            .into_data("list_tasks")?
            .into_iter()
            .map(|t| t.id)
            .collect())
    }

    async fn get_status(&self, handle: &str) -> Result<TaskStatus, DaemonError> {
        let url = self.url(&format!("/api/v1/tasks/{handle}"));
        let envelope: Envelope<TaskInfo> = self.get_json(&url).await?;
        Ok(envelope.into_data("get_status")?.status)
    }

    async fn clear_all(&self) -> Result<(), DaemonError> {
        let envelope: Envelope<serde_json::Value> = self
            .client
            .delete(self.url("/api/v1/tasks?force=false"))
            .send()
            .await?
            .json()
            .await?;
        envelope.into_ok("clear_all")
    }
}
