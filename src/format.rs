use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignCategory {
    Positive,
    Negative,
    Neutral,
}

impl SignCategory {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "",
        }
    }
}

// Empty is incomplete; `inf` and `NaN` parse but are invalid.
pub fn parse_field(raw: &str) -> Result<f64> {
    let s = raw.trim().replace(',', "");
    if s.is_empty() {
        return Err(CalcError::IncompleteInput);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::InvalidInput),
    }
}

pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

pub fn format_fixed(v: f64) -> String {
    // avoid "-0.00" for tiny negatives
    let v = if v.abs() < 0.005 { 0.0 } else { v };
    format!("{:.2}", v)
}

pub fn format_percent(v: f64) -> String {
    format!("{}%", format_fixed(v))
}

/// Signed by the rounded value, so the sign agrees with the digits shown.
pub fn format_signed_percent(v: f64) -> String {
    match SignCategory::of(round2(v)) {
        SignCategory::Positive => format!("+{}%", format_fixed(v)),
        _ => format_percent(v),
    }
}

pub fn format_money(v: f64) -> String {
    format!("${}", format_fixed(v))
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
