//! Serve command - run the webhook endpoint.

use colored::Colorize;
use std::net::SocketAddr;
use trackhook_webhooks::{WebhookEndpoint, WebhookServer};

use super::Context;
use crate::error::{CliError, CliResult};
use crate::{info, success, warn};

/// Run the webhook server until Ctrl-C.
pub async fn run(ctx: &Context, bind: Option<&str>) -> CliResult<()> {
    ctx.settings.validate_for_server()?;

    let addr = parse_bind(bind.unwrap_or(&ctx.settings.bind_addr))?;
    let config = ctx.webhook_config();
    let endpoint = WebhookEndpoint::from_config(&config)?;

    info(&format!(
        "Webhook endpoint listening on {}",
        format!("http://{}", addr).cyan()
    ));
    info(&format!(
        "Writing logs to {}",
        ctx.settings.log_dir.display().to_string().cyan()
    ));
    if ctx.settings.webhook_secret.is_empty() {
        warn("No webhook secret configured; unsigned deliveries will be accepted");
    }

    WebhookServer::new(endpoint).listen(addr).await?;

    success("Server stopped");
    Ok(())
}

fn parse_bind(addr: &str) -> CliResult<SocketAddr> {
    addr.parse()
        .map_err(|_| CliError::InvalidArgument(format!("invalid bind address: {}", addr)))
}
