//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and push interval before
//! starting the server.

use std::time::Duration;

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Values loaded from the environment are offered as prompt defaults. The
/// confirmed configuration is passed to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: ServerConfig) -> std::io::Result<()> {
    println!("{}", config.app_name);
    println!();

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or(config.bind_addr);

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    let interval_secs: u64 = Input::new()
        .with_prompt("Push interval (seconds)")
        .default(config.push_interval.as_secs())
        .validate_with(|v: &u64| {
            if *v > 0 {
                Ok(())
            } else {
                Err("must be greater than zero")
            }
        })
        .interact_text()
        .unwrap_or_else(|_| config.push_interval.as_secs());
    config.push_interval = Duration::from_secs(interval_secs);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.bind_addr, config.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
