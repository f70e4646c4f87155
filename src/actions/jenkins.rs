use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::jenkins::{job_page_url, HttpJenkinsClient, JenkinsApi};
use crate::host::{DeckAction, DeckConnection, UrlOpener};
use crate::models::build::{BuildResult, BuildStatus};
use crate::service::build_status::build_icon_spec;
use crate::service::icon::{data_uri, render_icon};
use crate::tasks::tick_loop::minute_changed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JenkinsSettings {
    #[serde(rename = "jenkinsUrl", default)]
    pub jenkins_url: String,
    #[serde(rename = "jobName", default)]
    pub job_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "access_token", default)]
    pub access_token: Option<String>,
}

impl JenkinsSettings {
    pub fn is_configured(&self) -> bool {
        !self.jenkins_url.is_empty() && !self.job_name.is_empty()
    }

    pub fn build_client(&self) -> Option<Arc<dyn JenkinsApi>> {
        if !self.is_configured() {
            return None;
        }
        HttpJenkinsClient::new(
            self.jenkins_url.clone(),
            self.job_name.clone(),
            self.username.clone(),
            self.access_token.clone(),
        )
        .ok()
        .map(|c| Arc::new(c) as Arc<dyn JenkinsApi>)
    }
}

/// Key action polling one Jenkins job. Refreshes at most once per wall-clock
/// minute and skips the whole cycle when the last build number has not moved.
pub struct JenkinsAction {
    settings: JenkinsSettings,
    client: Option<Arc<dyn JenkinsApi>>,
    connection: Arc<dyn DeckConnection>,
    opener: Arc<dyn UrlOpener>,
    last_seen: i64,
    last_minute: Option<u32>,
}

impl JenkinsAction {
    pub fn new(
        settings: JenkinsSettings,
        connection: Arc<dyn DeckConnection>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        let client = settings.build_client();
        Self {
            settings,
            client,
            connection,
            opener,
            last_seen: -1,
            last_minute: None,
        }
    }

    /// Same action with an injected API client; used by tests.
    pub fn with_client(
        settings: JenkinsSettings,
        client: Arc<dyn JenkinsApi>,
        connection: Arc<dyn DeckConnection>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            settings,
            client: Some(client),
            connection,
            opener,
            last_seen: -1,
            last_minute: None,
        }
    }

    pub async fn refresh(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };
        match jenkins_tick(
            client.as_ref(),
            self.connection.as_ref(),
            &self.settings.job_name,
            self.last_seen,
            Utc::now(),
        )
        .await
        {
            Ok(seen) => self.last_seen = seen,
            Err(e) => log::warn!("Jenkins refresh skipped: {}", e),
        }
    }
}

/// One poll cycle: job metadata, then build detail, then select and render.
/// Returns the build number to treat as already seen. A cycle whose last
/// build number equals `last_seen` stops before the detail fetch and renders
/// nothing; a running build is never marked seen so progress keeps updating.
pub async fn jenkins_tick(
    client: &dyn JenkinsApi,
    connection: &dyn DeckConnection,
    job_name: &str,
    last_seen: i64,
    now: DateTime<Utc>,
) -> Result<i64, String> {
    let job = client.fetch_job().await.map_err(|e| e.to_string())?;
    let Some(last_build) = job.last_build else {
        return Ok(last_seen);
    };
    if last_build.number == last_seen {
        return Ok(last_seen);
    }
    let Some(build_url) = last_build.url else {
        return Ok(last_seen);
    };

    let build = client
        .fetch_build(&build_url)
        .await
        .map_err(|e| e.to_string())?;
    let status = BuildStatus {
        job_name: job_name.to_string(),
        number: build.number,
        in_progress: build.in_progress,
        result: BuildResult::from_jenkins(build.result.as_deref()),
        timestamp_ms: build.timestamp,
        estimated_duration_ms: build.estimated_duration,
        queued: job.in_queue,
        badge_text: build.badge_text(),
    };

    let spec = build_icon_spec(&status, now);
    connection.set_image(&data_uri(&render_icon(&spec))).await?;

    if status.in_progress {
        Ok(last_seen)
    } else {
        Ok(last_build.number)
    }
}

#[async_trait]
impl DeckAction for JenkinsAction {
    async fn key_pressed(&mut self) {
        if !self.settings.is_configured() {
            return;
        }
        let url = job_page_url(&self.settings.jenkins_url, &self.settings.job_name);
        if let Err(e) = self.opener.open_url(&url) {
            log::warn!("{}", e);
        }
    }

    async fn key_released(&mut self) {
        // Nothing to do on release.
    }

    async fn on_tick(&mut self) {
        if minute_changed(&mut self.last_minute, Utc::now()) {
            self.refresh().await;
        }
    }

    async fn received_settings(&mut self, payload: Value) {
        match serde_json::from_value::<JenkinsSettings>(payload) {
            Ok(settings) => self.settings = settings,
            Err(e) => {
                log::warn!("Ignoring malformed Jenkins settings: {}", e);
                return;
            }
        }
        if let Ok(value) = serde_json::to_value(&self.settings) {
            if let Err(e) = self.connection.save_settings(value).await {
                log::warn!("{}", e);
            }
        }
        self.client = self.settings.build_client();
        // The job may have changed; forget the previously seen build.
        self.last_seen = -1;
        self.refresh().await;
    }
}
