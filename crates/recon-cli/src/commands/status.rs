//! `recon status`: one-shot status fetch for a submitted scan.

use recon_client::BackendClient;
use recon_reach::ReachMonitor;

use crate::context::AppContext;

pub async fn run(ctx: AppContext, scan_id: &str) -> anyhow::Result<()> {
    let client = BackendClient::new(ctx.api_key.clone());

    // With an explicit URL there is nothing to discover; otherwise fall
    // back to the monitor's own resolution.
    let base_url = match &ctx.explicit_url {
        Some(url) => recon_core::resolve::normalize_base_url(url),
        None => {
            let monitor = ReachMonitor::new(ctx.candidates.clone(), client.clone(), ctx.reach);
            let terminal = monitor.start().wait().await;
            terminal
                .url()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("no backend reachable; pass --url"))?
        }
    };

    let status = client.scan_status(&base_url, scan_id).await?;
    println!("{}", serde_json::to_string_pretty(&status.to_value())?);
    Ok(())
}
