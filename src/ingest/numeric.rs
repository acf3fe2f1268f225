//! Clean-numeric normalizer for currency-formatted report cells

use crate::error::{RoasError, RoasResult};
use regex::Regex;

/// Turns report cells such as `"$1,234.50"`, `"AED 1 234"` or `"(12.00)"`
/// into numbers. Build once per ingestion and reuse for every cell.
#[derive(Debug, Clone)]
pub struct NumericCleaner {
    currency_code: Regex,
    noise: Regex,
}

impl NumericCleaner {
    pub fn new() -> RoasResult<Self> {
        // Leading or trailing ISO code: "AED 1,500", "99.90 USD"
        let currency_code = Regex::new(r"^[A-Z]{3}\s*|\s*[A-Z]{3}$")
            .map_err(|e| RoasError::Import(format!("Regex error: {}", e)))?;
        let noise = Regex::new(r"[\p{Sc}\s\u{00A0}\u{202F},%]")
            .map_err(|e| RoasError::Import(format!("Regex error: {}", e)))?;
        Ok(Self {
            currency_code,
            noise,
        })
    }

    /// Blank cells and a lone `-` read as 0. Returns `None` when what is
    /// left after cleanup is still not a number; callers turn that into a
    /// data-quality error with row context.
    pub fn clean(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Some(0.0);
        }

        let (negative, body) = match trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => (true, inner),
            None => (false, trimmed),
        };

        let without_code = self.currency_code.replace_all(body, "");
        let cleaned = self.noise.replace_all(&without_code, "");
        // Only symbols or a bare currency code were present
        if cleaned.is_empty() || cleaned == "-" {
            return Some(0.0);
        }

        let value: f64 = cleaned.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(if negative { -value } else { value })
    }
}
