//! `recon probe`: find a live backend and report it.

use std::sync::Arc;
use std::time::Duration;

use recon_client::BackendClient;
use recon_reach::{ReachCallback, ReachMonitor, ReachState};

use crate::context::AppContext;

pub async fn run(ctx: AppContext, wait: Option<u64>) -> anyhow::Result<()> {
    let mut settings = ctx.reach;
    if let Some(secs) = wait {
        settings.max_wait = Duration::from_secs(secs);
    }

    println!("probing {} candidate(s):", ctx.candidates.len());
    for url in &ctx.candidates {
        println!("  {url}");
    }

    let client = BackendClient::new(ctx.api_key.clone());
    let monitor = ReachMonitor::new(ctx.candidates, client.clone(), settings)
        .with_callback(narrate_transitions());

    match monitor.start().wait().await {
        ReachState::Online { url } => {
            // Best-effort detail; the probe verdict stands either way.
            match client.health(&url).await {
                Ok(info) => println!(
                    "online: {url} (version {}, {} modules available)",
                    info.version.as_deref().unwrap_or("unknown"),
                    info.modules_available.len()
                ),
                Err(_) => println!("online: {url}"),
            }
            Ok(())
        }
        _ => anyhow::bail!(
            "no backend answered within {}s",
            settings.max_wait.as_secs()
        ),
    }
}

/// Transition callback that keeps the operator informed while the
/// backend cold-starts.
pub fn narrate_transitions() -> ReachCallback {
    Arc::new(|state, _url| {
        Box::pin(async move {
            match state {
                ReachState::Waking => {
                    println!("no answer yet; waiting for the backend to wake up...")
                }
                ReachState::Offline => println!("giving up: every candidate stayed quiet"),
                _ => {}
            }
        })
    })
}
