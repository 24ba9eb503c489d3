use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::video::Mirror;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub status: Reachability,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub servers: Vec<ServerStatus>,
}

#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub name: String,
    pub url: String,
}

/// HEAD-probes a fixed list of mirror landing pages.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    client: Client,
    targets: Vec<ProbeTarget>,
    timeout: Duration,
}

impl StatusProbe {
    pub fn new(targets: Vec<ProbeTarget>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("cinestream/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build mirror probe HTTP client")?;
        Ok(Self {
            client,
            targets,
            timeout,
        })
    }

    pub fn for_mirrors(timeout: Duration) -> Result<Self> {
        let targets = Mirror::ALL
            .iter()
            .map(|m| ProbeTarget {
                name: m.name().to_string(),
                url: m.home_url().to_string(),
            })
            .collect();
        Self::new(targets, timeout)
    }

    /// Probes every target concurrently and reports each outcome in target
    /// order. Never fails as a whole.
    pub async fn check(&self) -> StatusReport {
        let handles: Vec<_> = self
            .targets
            .iter()
            .cloned()
            .map(|target| {
                let client = self.client.clone();
                let timeout = self.timeout;
                tokio::spawn(async move { probe(&client, target, timeout).await })
            })
            .collect();

        let mut servers = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(status) => servers.push(status),
                Err(e) => {
                    warn!("Mirror probe task failed: {}", e);
                    servers.push(ServerStatus {
                        name: "unknown".to_string(),
                        status: Reachability::Error,
                    });
                }
            }
        }
        StatusReport { servers }
    }
}

async fn probe(client: &Client, target: ProbeTarget, timeout: Duration) -> ServerStatus {
    let status = match client.head(&target.url).timeout(timeout).send().await {
        Ok(res) if res.status().is_success() => Reachability::Online,
        Ok(res) => {
            debug!("{} answered {}", target.name, res.status());
            Reachability::Offline
        }
        Err(e) => {
            debug!("{} unreachable: {}", target.name, e);
            Reachability::Offline
        }
    };
    ServerStatus {
        name: target.name,
        status,
    }
}
