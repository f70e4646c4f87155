use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

pub const BADGE_ACTION_CLASS: &str = "com.jenkinsci.plugins.badge.action.BadgeAction";

#[derive(Debug, Clone, Deserialize)]
pub struct BuildRef {
    pub number: i64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    #[serde(rename = "lastBuild")]
    pub last_build: Option<BuildRef>,
    #[serde(rename = "inQueue", default)]
    pub in_queue: bool,
}

/// Build detail as Jenkins reports it. `actions` is an ordered list of
/// loosely-typed records; the `_class` discriminator identifies the ones we
/// care about.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub number: i64,
    #[serde(rename = "inProgress", default)]
    pub in_progress: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "estimatedDuration", default)]
    pub estimated_duration: i64,
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl BuildInfo {
    pub fn badge_text(&self) -> Option<String> {
        self.actions
            .iter()
            .find(|a| a.get("_class").and_then(Value::as_str) == Some(BADGE_ACTION_CLASS))
            .and_then(|a| a.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Folder-scoped job names use '/', which Jenkins nests as `/job/` segments.
pub fn job_api_url(base_url: &str, job_name: &str) -> String {
    format!(
        "{}/job/{}/api/json",
        base_url.trim_end_matches('/'),
        job_name.replace('/', "/job/")
    )
}

pub fn job_page_url(base_url: &str, job_name: &str) -> String {
    format!(
        "{}/job/{}",
        base_url.trim_end_matches('/'),
        job_name.replace('/', "/job/")
    )
}

#[async_trait]
pub trait JenkinsApi: Send + Sync {
    async fn fetch_job(&self) -> Result<JobInfo, ClientError>;
    async fn fetch_build(&self, build_url: &str) -> Result<BuildInfo, ClientError>;
}

pub struct HttpJenkinsClient {
    client: reqwest::Client,
    base_url: String,
    job_name: String,
    username: Option<String>,
    access_token: Option<String>,
}

impl HttpJenkinsClient {
    pub fn new(
        base_url: String,
        job_name: String,
        username: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url,
            job_name,
            username,
            access_token,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        let mut request = self.client.get(url);
        if let (Some(user), Some(token)) = (&self.username, &self.access_token) {
            if !user.is_empty() && !token.is_empty() {
                request = request.basic_auth(user, Some(token));
            }
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!("Request to {} failed with status {}", url, status).into());
        }

        let parsed: T = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse JSON from {}: {}", url, e))?;
        Ok(parsed)
    }
}

#[async_trait]
impl JenkinsApi for HttpJenkinsClient {
    async fn fetch_job(&self) -> Result<JobInfo, ClientError> {
        let url = job_api_url(&self.base_url, &self.job_name);
        self.get_json(&url).await
    }

    async fn fetch_build(&self, build_url: &str) -> Result<BuildInfo, ClientError> {
        let url = format!("{}/api/json", build_url.trim_end_matches('/'));
        self.get_json(&url).await
    }
}
