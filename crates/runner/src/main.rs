use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use dashboard::{format_epoch, Dashboard, DashboardConfig};
use market_client::{
    ActiveSymbolsRequest, ClientConfig, ClientState, FeedPayload, MarketClient, Topic,
};

/// How long to wait for the connection to wind down on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    common::init_logging();

    let market = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "R_100".to_string());

    info!(market = %market, "starting live price dashboard");

    let mut dashboard = Dashboard::new(DashboardConfig {
        market,
        ..DashboardConfig::default()
    });

    let mut client = MarketClient::new(ClientConfig::default());

    // Bridge subscriber callbacks into the main loop
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
    for topic in [Topic::Tick, Topic::History, Topic::ActiveSymbols] {
        let feed_tx = feed_tx.clone();
        client.subscribe(topic, move |payload| {
            let _ = feed_tx.send(payload.clone());
        });
    }

    if let Err(e) = client.connect().await {
        error!(error = %e, "could not reach the market data feed");
        return;
    }

    // Log connection state transitions as they happen
    let mut state_log_rx = client.state_watch();
    tokio::spawn(async move {
        while state_log_rx.changed().await.is_ok() {
            let state = *state_log_rx.borrow();
            info!(state = %state, "connection state");
        }
    });

    // Request the instrument catalog and the selected market's feed
    if let Err(e) = client.send(ActiveSymbolsRequest::default()) {
        error!(error = %e, "failed to request instrument catalog");
    }
    if let Err(e) = client.send(dashboard.subscription_request()) {
        error!(error = %e, "failed to subscribe to ticks");
    }

    // Ctrl+C flips the shutdown flag
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }

            maybe_payload = feed_rx.recv() => {
                let Some(payload) = maybe_payload else { break };
                dashboard.handle(&payload);

                if let FeedPayload::Tick(tick) = &payload {
                    println!(
                        "{} | {} | quote: {}",
                        format_epoch(tick.epoch),
                        tick.symbol,
                        tick.quote
                    );
                }
            }
        }
    }

    client.close();

    // Give the connection a moment to wind down cleanly
    let mut state_rx = client.state_watch();
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while *state_rx.borrow() != ClientState::Closed {
            if state_rx.changed().await.is_err() {
                break;
            }
        }
    })
    .await;

    info!(
        market = %dashboard.market(),
        last_price = ?dashboard.current_price(),
        ticks_windowed = dashboard.window().len(),
        "shutdown complete"
    );
}
