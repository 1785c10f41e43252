//! Live-price dashboard state.
//!
//! Tracks the selected market, a rolling window of its latest quotes, and
//! the instrument catalog. Feed messages arrive through [`Dashboard::handle`];
//! market switches re-subscribe over the client.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use market_client::{
    ClientError, FeedPayload, ForgetAllRequest, MarketClient, TicksHistoryRequest,
};
use model::ActiveSymbol;

use crate::window::TickWindow;

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Initially selected market.
    pub market: String,
    /// Size of the tick window.
    pub tick_count: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            market: "R_100".to_string(),
            tick_count: 20,
        }
    }
}

/// State behind the live-price view.
#[derive(Debug)]
pub struct Dashboard {
    market: String,
    tick_count: u32,
    window: TickWindow,
    symbols: Vec<ActiveSymbol>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            market: config.market,
            window: TickWindow::new(config.tick_count as usize),
            tick_count: config.tick_count,
            symbols: Vec::new(),
        }
    }

    /// Currently selected market symbol.
    pub fn market(&self) -> &str {
        &self.market
    }

    /// The rolling quote window for the selected market.
    pub fn window(&self) -> &TickWindow {
        &self.window
    }

    /// Latest quote of the selected market.
    pub fn current_price(&self) -> Option<Decimal> {
        self.window.latest()
    }

    /// The instrument catalog, once received.
    pub fn symbols(&self) -> &[ActiveSymbol] {
        &self.symbols
    }

    /// Display name of the selected market, when the catalog knows it.
    pub fn market_display_name(&self) -> Option<&str> {
        self.symbols
            .iter()
            .find(|symbol| symbol.symbol == self.market)
            .map(|symbol| symbol.display_name.as_str())
    }

    /// The subscription request for the selected market.
    pub fn subscription_request(&self) -> TicksHistoryRequest {
        TicksHistoryRequest::latest_ticks(self.market.clone(), self.tick_count)
    }

    /// Fold one feed message into the dashboard state.
    ///
    /// Ticks for markets other than the selected one are ignored.
    pub fn handle(&mut self, payload: &FeedPayload) {
        match payload {
            FeedPayload::Tick(tick) => {
                if tick.symbol != self.market {
                    return;
                }
                self.window.push(tick.quote);
                debug!(symbol = %tick.symbol, quote = %tick.quote, "tick");
            }
            FeedPayload::History(history) => {
                self.window.seed_from_history(history);
                debug!(quotes = self.window.len(), "seeded tick window");
            }
            FeedPayload::ActiveSymbols(symbols) => {
                info!(count = symbols.len(), "instrument catalog received");
                self.symbols = symbols.clone();
            }
        }
    }

    /// Switch to another market: drop the old tick subscription, clear the
    /// window, and subscribe to the new market's history+live feed.
    ///
    /// The selection changes even when the client is offline; the send
    /// error is returned so the caller can log it.
    pub fn switch_market(
        &mut self,
        client: &MarketClient,
        symbol: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.market = symbol.into();
        self.window.clear();
        info!(market = %self.market, "switching market");

        client.send(ForgetAllRequest::ticks())?;
        client.send(self.subscription_request())
    }
}

/// Render a tick epoch for display.
pub fn format_epoch(epoch: i64) -> String {
    match Utc.timestamp_opt(epoch, 0).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch.to_string(),
    }
}
