//! `recon scan`: submit a scan and poll it to completion.

use std::sync::Arc;

use recon_client::BackendClient;
use recon_core::wire::{ScanRequest, ScanType};
use recon_poll::{FailureReason, JobPoller, PollResult, ProgressCallback};
use recon_reach::ReachMonitor;

use crate::commands::probe::narrate_transitions;
use crate::context::AppContext;

pub async fn run(
    ctx: AppContext,
    target: &str,
    scan_type: ScanType,
    deep: bool,
) -> anyhow::Result<()> {
    let client = BackendClient::new(ctx.api_key.clone());

    let monitor = ReachMonitor::new(ctx.candidates.clone(), client.clone(), ctx.reach)
        .with_callback(narrate_transitions());
    let terminal = monitor.start().wait().await;
    let Some(base_url) = terminal.url().map(str::to_string) else {
        anyhow::bail!(
            "no backend answered within {}s; try again or pass --url",
            ctx.reach.max_wait.as_secs()
        );
    };

    let request = ScanRequest::new(target, scan_type, deep);
    let submitted = client.submit_scan(&base_url, &request).await?;
    println!(
        "scan {} submitted ({} scan of {target})",
        submitted.scan_id, scan_type
    );

    let poller = JobPoller::new(
        client,
        &base_url,
        &submitted.scan_id,
        scan_type.expected_modules(),
        ctx.poll,
    )
    .on_progress(print_progress());

    match poller.start().wait().await {
        PollResult::Completed(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload.to_value())?);
            Ok(())
        }
        PollResult::Failed(FailureReason::JobFailed) => {
            anyhow::bail!("backend reported the scan as failed")
        }
        PollResult::Failed(FailureReason::BackendLost) => {
            anyhow::bail!("lost the backend while polling; the scan may still finish server-side")
        }
        PollResult::Cancelled => anyhow::bail!("polling was cancelled"),
    }
}

fn print_progress() -> ProgressCallback {
    Arc::new(|progress| {
        Box::pin(async move {
            println!("progress: {progress}%");
        })
    })
}
