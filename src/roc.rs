use crate::config::RocConfig;
use crate::error::{CalcError, Result};
use crate::format::{format_percent, is_blank, parse_field, round2, SignCategory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocResult {
    pub percentage: f64,
    pub sign: SignCategory,
}

pub fn compute_roc(expected_return: f64, total_investment: f64) -> Result<RocResult> {
    if !expected_return.is_finite() || !total_investment.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    if total_investment <= 0.0 {
        return Err(CalcError::NonPositiveInvestment);
    }
    let percentage = (expected_return / total_investment) * 100.0;
    if !percentage.is_finite() {
        return Err(CalcError::InvalidInput);
    }
    Ok(RocResult { percentage, sign: SignCategory::of(percentage) })
}

pub trait Notifier {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RocView {
    pub visible: bool,
    pub text: String,
    pub category: Option<SignCategory>,
}

impl RocView {
    fn shown(result: RocResult) -> Self {
        Self {
            visible: true,
            text: format_percent(result.percentage),
            // styled by the value as displayed
            category: Some(SignCategory::of(round2(result.percentage))),
        }
    }

    pub fn css_class(&self) -> String {
        let mut class = String::from("result");
        if !self.visible {
            class.push_str(" hidden");
        }
        if let Some(cat) = self.category {
            if !cat.css_class().is_empty() {
                class.push(' ');
                class.push_str(cat.css_class());
            }
        }
        class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocTrigger {
    Input,
    Submit, // Enter key or the Calculate button
}

#[derive(Debug, Clone, PartialEq)]
pub struct RocController {
    config: RocConfig,
    view: RocView,
}

impl RocController {
    pub fn new(config: RocConfig) -> Self {
        Self { config, view: RocView::default() }
    }

    pub fn set_config(&mut self, config: RocConfig) {
        self.config = config;
    }

    pub fn view(&self) -> &RocView {
        &self.view
    }

    /// Non-numeric input leaves the panel untouched and alerts only when the
    /// config asks for it. Non-positive investment always alerts.
    pub fn handle(
        &mut self,
        trigger: RocTrigger,
        expected_raw: &str,
        total_raw: &str,
        notifier: &dyn Notifier,
    ) -> Result<RocResult> {
        if trigger == RocTrigger::Input && (is_blank(expected_raw) || is_blank(total_raw)) {
            self.view = RocView::default();
            return Err(CalcError::IncompleteInput);
        }

        let parsed = parse_field(expected_raw)
            .and_then(|e| parse_field(total_raw).map(|t| (e, t)))
            // on submit an empty field is just another bad number
            .map_err(|_| CalcError::InvalidInput);
        let (expected, total) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                if self.config.alert_on_invalid_input {
                    notifier.alert(&err.to_string());
                }
                return Err(err);
            }
        };

        match compute_roc(expected, total) {
            Ok(result) => {
                self.view = RocView::shown(result);
                Ok(result)
            }
            Err(err) => {
                if err == CalcError::NonPositiveInvestment {
                    notifier.alert(&err.to_string());
                }
                self.view = RocView::default();
                Err(err)
            }
        }
    }
}
