use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::stage::{Stage, StageData, StageId, decode_stage_list};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

/// The HTTP contract of the stages service.
#[async_trait]
pub trait StageApi: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Stage>>;
    async fn get(&self, id: StageId) -> ClientResult<Stage>;
    async fn create(&self, data: &StageData) -> ClientResult<()>;
    async fn update(&self, id: StageId, data: &StageData) -> ClientResult<()>;
    async fn delete(&self, id: StageId) -> ClientResult<()>;
}

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn ensure_success(self) -> ClientResult<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpStageApi {
    pub config: ClientConfig,
    pub client: reqwest::Client,
}

impl HttpStageApi {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub async fn send(
        &self,
        method: Method,
        api_path: &str,
        body: Option<&StageData>,
    ) -> ClientResult<ApiResponse> {
        let url = self.config.api_path(api_path);
        log::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }

    fn stage_path(id: StageId) -> String {
        format!("/stages/{}", id)
    }
}

#[async_trait]
impl StageApi for HttpStageApi {
    async fn list(&self) -> ClientResult<Vec<Stage>> {
        let resp = self.send(Method::GET, "/stages", None).await?.ensure_success()?;
        Ok(decode_stage_list(&resp.body)?)
    }

    async fn get(&self, id: StageId) -> ClientResult<Stage> {
        let resp = self
            .send(Method::GET, &Self::stage_path(id), None)
            .await?
            .ensure_success()?;
        Ok(serde_json::from_slice(&resp.body)?)
    }

    async fn create(&self, data: &StageData) -> ClientResult<()> {
        self.send(Method::POST, "/stages", Some(data))
            .await?
            .ensure_success()?;
        Ok(())
    }

    async fn update(&self, id: StageId, data: &StageData) -> ClientResult<()> {
        self.send(Method::PUT, &Self::stage_path(id), Some(data))
            .await?
            .ensure_success()?;
        Ok(())
    }

    async fn delete(&self, id: StageId) -> ClientResult<()> {
        self.send(Method::DELETE, &Self::stage_path(id), None)
            .await?
            .ensure_success()?;
        Ok(())
    }
}
