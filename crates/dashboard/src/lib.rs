//! Live-price dashboard state: rolling tick window, market selection,
//! instrument catalog.

mod dashboard;
mod window;

pub use dashboard::{format_epoch, Dashboard, DashboardConfig};
pub use window::TickWindow;
