use crate::enums::{Direction, Outcome, TradeStatus};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A single logged trade.
///
/// `pnl` is the realized, signed P&L and is the only field that decides whether a
/// trade is a win, a loss or breakeven. `rr` is optional: a trade without an
/// R-multiple is different from a trade with `rr == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub date: NaiveDate,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    pub quantity: Decimal,
    #[serde(default)]
    pub commission: Decimal,
    pub pnl: Decimal,
    #[serde(default)]
    pub rr: Option<Decimal>,
    #[serde(default)]
    pub setup: Option<Uuid>,
    #[serde(default)]
    pub tags: BTreeSet<Uuid>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub status: TradeStatus,
}

impl Trade {
    /// Creates a closed trade with the given realized P&L and neutral defaults elsewhere.
    pub fn closed(date: NaiveDate, symbol: impl Into<String>, pnl: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            symbol: symbol.into(),
            direction: Direction::Long,
            entry_price: Decimal::ZERO,
            exit_price: None,
            quantity: Decimal::ONE,
            commission: Decimal::ZERO,
            pnl,
            rr: None,
            setup: None,
            tags: BTreeSet::new(),
            notes: String::new(),
            screenshots: Vec::new(),
            status: TradeStatus::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_pnl(self.pnl)
    }

    /// Checks the record shape before it is accepted by a store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::invalid("symbol", "must not be empty"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::invalid("quantity", format!("must be positive, got {}", self.quantity)));
        }
        if self.entry_price < Decimal::ZERO {
            return Err(CoreError::invalid("entry_price", "must not be negative"));
        }
        if matches!(self.exit_price, Some(price) if price < Decimal::ZERO) {
            return Err(CoreError::invalid("exit_price", "must not be negative"));
        }
        if self.commission < Decimal::ZERO {
            return Err(CoreError::invalid("commission", "must not be negative"));
        }
        Ok(())
    }
}

/// A daily journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub followed_system: bool,
    #[serde(default)]
    pub reflection: String,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, followed_system: bool) -> Self {
        Self {
            date,
            followed_system,
            reflection: String::new(),
        }
    }
}

/// Directed relationships from one tag to others. Authors may set these
/// asymmetrically (A excludes B without B excluding A).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRelationships {
    #[serde(default)]
    pub mutually_exclusive_with: BTreeSet<Uuid>,
    #[serde(default)]
    pub suggested_with: BTreeSet<Uuid>,
    #[serde(default)]
    pub required_with: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTag {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: Option<Uuid>,
    /// Derived from the trade history; recomputed, never trusted.
    #[serde(default)]
    pub usage_count: usize,
    #[serde(default)]
    pub relationships: TagRelationships,
}

impl CustomTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: String::new(),
            category: None,
            usage_count: 0,
            relationships: TagRelationships::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid("tag.name", "must not be empty"));
        }
        let rel = &self.relationships;
        if rel.mutually_exclusive_with.contains(&self.id)
            || rel.suggested_with.contains(&self.id)
            || rel.required_with.contains(&self.id)
        {
            return Err(CoreError::invalid(
                "tag.relationships",
                format!("tag '{}' references itself", self.name),
            ));
        }
        if let Some(id) = rel.required_with.intersection(&rel.mutually_exclusive_with).next() {
            return Err(CoreError::invalid(
                "tag.relationships",
                format!("tag '{}' both requires and excludes {}", self.name, id),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSetup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub usage_count: usize,
}

impl CustomSetup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: String::new(),
            category: None,
            usage_count: 0,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid("setup.name", "must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trade_validation_rejects_malformed_records() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut trade = Trade::closed(date, "AAPL", dec!(10));
        assert!(trade.validate().is_ok());

        trade.quantity = Decimal::ZERO;
        assert!(matches!(trade.validate(), Err(CoreError::InvalidInput(field, _)) if field == "quantity"));

        let blank = Trade::closed(date, "  ", dec!(10));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn missing_rr_deserializes_as_none() {
        let json = r#"{
            "id": "6a1f3f5e-3c39-4d0e-9a4b-1b8c6f6f0c11",
            "date": "2024-01-02",
            "symbol": "ES",
            "direction": "short",
            "entry_price": "4800",
            "quantity": "1",
            "pnl": "-50",
            "status": "closed"
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.rr, None);
        assert!(trade.tags.is_empty());
        assert_eq!(trade.outcome(), Outcome::Loss);
    }

    #[test]
    fn tag_cannot_reference_itself() {
        let mut tag = CustomTag::new("FOMO");
        tag.relationships.suggested_with.insert(tag.id);
        assert!(tag.validate().is_err());
    }
}
