use std::fmt;

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{EntityId, Record};

/// Calendar month a payslip covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("Unknown", |m| m.name());
        write!(f, "{name} {}", self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipLine {
    pub label: String,
    pub amount: f64,
    pub deduction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: EntityId,
    pub period: PayPeriod,
    pub gross: f64,
    pub deductions: f64,
    pub net: f64,
    pub currency: String,
    pub issued_at: Option<NaiveDate>,
    pub lines: Vec<PayslipLine>,
}

impl Record for Payslip {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_display() {
        assert_eq!(PayPeriod { year: 2024, month: 6 }.to_string(), "June 2024");
        assert_eq!(PayPeriod { year: 2024, month: 13 }.to_string(), "Unknown 2024");
    }
}
