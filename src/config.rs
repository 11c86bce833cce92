#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AppConfig {
    pub roc: RocConfig,
}

/// Default: eager, no button, silent on non-numeric input. `classic()` adds
/// the button and the non-numeric alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RocConfig {
    pub calculate_button: bool,
    pub alert_on_invalid_input: bool,
}

impl RocConfig {
    pub fn classic() -> Self {
        Self { calculate_button: true, alert_on_invalid_input: true }
    }
}
