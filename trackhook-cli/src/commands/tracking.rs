//! Tracking commands - register, fetch, delete and list trackings.

use colored::Colorize;
use rand::Rng;
use serde_json::{Value, json};
use trackhook_client::{ApiResponse, Checkpoint, Tracking};

use super::{Context, heading, print_response};
use crate::error::CliResult;
use crate::{info, success, warn};

const NOT_AVAILABLE: &str = "N/A";

/// Request body for a new tracking with sample customer details.
pub fn registration_body(
    tracking_number: &str,
    courier: &str,
    order_number: &str,
    order_id: u32,
) -> Value {
    json!({
        "tracking_number": tracking_number,
        "courier": courier,
        "order_number": order_number,
        "customer_name": "Test User",
        "customer_email": "test@example.com",
        "customer_phone": "60123456789",
        "parcel_content": "Test Product",
        "order_id": order_id,
        "note": "Test tracking registration",
    })
}

/// Register a tracking.
pub async fn register(
    ctx: &Context,
    tracking_number: &str,
    courier: &str,
    order_number: Option<&str>,
) -> CliResult<()> {
    let client = ctx.client()?;

    let mut rng = rand::rng();
    let order_number = order_number
        .map(str::to_string)
        .unwrap_or_else(|| rng.random_range(1_000_000..=9_999_999u32).to_string());
    let order_id = rng.random_range(100_000..=999_999u32);

    info(&format!("Tracking Number: {}", tracking_number.cyan()));
    info(&format!("Courier: {}", courier.cyan()));
    info(&format!("Order Number: {}", order_number.cyan()));

    let body = registration_body(tracking_number, courier, &order_number, order_id);
    let response = client.create_tracking(&body).await?;

    print_response(&response);
    if response.is_success() {
        success("Tracking successfully registered!");
        if let Some(tracking) = response.tracking() {
            heading("Tracking Details");
            print_block(&summary_lines(&tracking));
        }
    } else {
        warn("Failed to register tracking.");
    }
    Ok(())
}

/// Fetch and print one tracking.
pub async fn get(ctx: &Context, tracking_number: &str, courier: &str) -> CliResult<()> {
    let client = ctx.client()?;

    info("Fetching tracking information...");
    info(&format!("Tracking Number: {}", tracking_number.cyan()));
    info(&format!("Courier: {}", courier.cyan()));

    let response = client.get_tracking(courier, tracking_number).await?;
    println!();
    println!("  {} {}", "HTTP Code:".bright_white().bold(), response.status_code);

    if response.status_code == 200 {
        print_tracking_response(&response);
    } else {
        warn("Failed to get tracking information.");
        print_response(&response);
    }

    heading("Raw Response");
    println!("  {}", response.raw_body);
    Ok(())
}

/// Delete one tracking.
pub async fn delete(ctx: &Context, tracking_number: &str, courier: &str) -> CliResult<()> {
    let client = ctx.client()?;

    info(&format!(
        "Deleting tracking {} ({})",
        tracking_number.cyan(),
        courier
    ));
    let response = client.delete_tracking(courier, tracking_number).await?;

    print_response(&response);
    if response.is_success() {
        success("Tracking deleted.");
    } else {
        warn("Failed to delete tracking.");
    }
    Ok(())
}

/// List trackings.
pub async fn list(ctx: &Context) -> CliResult<()> {
    let client = ctx.client()?;

    info("Fetching trackings...");
    let response = client.get_trackings().await?;

    if response.is_success() && response.get("trackings").is_some() {
        print_tracking_list(&response.trackings());
    } else {
        print_response(&response);
    }
    Ok(())
}

/// List supported couriers.
pub async fn couriers(ctx: &Context) -> CliResult<()> {
    let client = ctx.client()?;

    info("Fetching couriers...");
    let response = client.get_couriers().await?;

    print_response(&response);
    Ok(())
}

fn print_tracking_response(response: &ApiResponse) {
    if let Some(tracking) = response.tracking() {
        success("Tracking Found!");
        print_block(&detail_lines(&tracking));
    } else if response.get("trackings").is_some_and(Value::is_array) {
        print_tracking_list(&response.trackings());
    } else {
        warn("No tracking data found in response.");
        print_response(response);
    }
}

fn print_tracking_list(trackings: &[Tracking]) {
    success(&format!("Found {} tracking(s)!", trackings.len()));
    for (index, tracking) in trackings.iter().enumerate() {
        heading(&format!("Tracking {}", index + 1));
        print_block(&list_lines(tracking));
    }
}

fn print_block(lines: &[String]) {
    for line in lines {
        println!("  {}", line);
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Short summary after registration.
pub fn summary_lines(tracking: &Tracking) -> Vec<String> {
    vec![
        format!("ID: {}", text(&tracking.id)),
        format!("Tracking Number: {}", text(&tracking.tracking_number)),
        format!("Courier: {}", text(&tracking.courier)),
        format!("Status: {}", text(&tracking.status)),
        format!("Short Link: {}", text(&tracking.short_link)),
        format!("Created at: {}", text(&tracking.created_at)),
    ]
}

/// One entry of a tracking listing.
pub fn list_lines(tracking: &Tracking) -> Vec<String> {
    vec![
        format!("Tracking Number: {}", text(&tracking.tracking_number)),
        format!("Courier: {}", text(&tracking.courier)),
        format!("Status: {}", text(&tracking.status)),
        format!("Short Link: {}", text(&tracking.short_link)),
    ]
}

/// Full tracking details with checkpoints and notes.
pub fn detail_lines(tracking: &Tracking) -> Vec<String> {
    let mut lines = vec![
        "=== Tracking Information ===".to_string(),
        format!("ID: {}", text(&tracking.id)),
        format!("Tracking Number: {}", text(&tracking.tracking_number)),
        format!("Courier: {}", text(&tracking.courier)),
        format!("Status: {}", text(&tracking.status)),
        format!("Short Link: {}", text(&tracking.short_link)),
        format!("Customer: {}", text(&tracking.customer_name)),
        format!("Email: {}", text(&tracking.customer_email)),
        format!("Phone: {}", text(&tracking.customer_phone)),
        format!("Order Number: {}", text(&tracking.order_number)),
        format!("Parcel Content: {}", text(&tracking.parcel_content)),
        format!("Created at: {}", text(&tracking.created_at)),
        format!("Updated at: {}", text(&tracking.updated_at)),
        String::new(),
        "=== Latest Checkpoint ===".to_string(),
    ];

    match &tracking.latest_checkpoint {
        Some(checkpoint) => lines.extend(checkpoint_lines(checkpoint, "")),
        None => lines.push("No checkpoints available yet.".to_string()),
    }

    if !tracking.checkpoints.is_empty() {
        lines.push(String::new());
        lines.push("=== All Checkpoints ===".to_string());
        for (index, checkpoint) in tracking.checkpoints.iter().enumerate() {
            lines.push(format!("{}) {}", index + 1, text(&checkpoint.time)));
            lines.extend(checkpoint_lines(checkpoint, "   ").into_iter().skip(1));
            lines.push(String::new());
        }
    }

    if let Some(note) = tracking.note.as_deref().filter(|n| !n.is_empty()) {
        lines.push("=== Notes ===".to_string());
        lines.push(note.to_string());
    }

    lines
}

fn checkpoint_lines(checkpoint: &Checkpoint, indent: &str) -> Vec<String> {
    vec![
        format!("{}Time: {}", indent, text(&checkpoint.time)),
        format!("{}Status: {}", indent, text(&checkpoint.status)),
        format!("{}Content: {}", indent, text(&checkpoint.content)),
        format!("{}Location: {}", indent, text(&checkpoint.location)),
    ]
}
