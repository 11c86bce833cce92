mod roc;
mod stock;

pub use roc::RocCalculator;
pub use stock::StockCalculator;

use gloo::{console, dialogs};

use crate::roc::Notifier;

/// `window.alert`, mirrored to the console.
pub(crate) struct BrowserAlert;

impl Notifier for BrowserAlert {
    fn alert(&self, message: &str) {
        console::warn!("alert:", message);
        dialogs::alert(message);
    }
}
