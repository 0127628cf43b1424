use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub critical_quantity: i64,
    pub unit_value: Decimal,
    pub stock_value: Decimal,
    #[serde(skip_serializing)]
    pub photo: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        company_id: String,
        name: String,
        description: String,
        quantity: i64,
        critical_quantity: i64,
        unit_value: Decimal,
        photo: Vec<u8>,
    ) -> Self {
        let mut product = Self {
            id: Uuid::new_v4().to_string(),
            company_id,
            name,
            description,
            quantity,
            critical_quantity,
            unit_value,
            stock_value: Decimal::ZERO,
            photo,
            created_at: Utc::now(),
        };
        product.recalculate_stock_value();
        product
    }

    /// Stock value is unit value times quantity, recomputed on every mutation.
    pub fn recalculate_stock_value(&mut self) {
        self.stock_value = self.unit_value * Decimal::from(self.quantity);
    }

    pub fn is_below_critical(&self) -> bool {
        self.quantity <= self.critical_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn stock_value_is_unit_value_times_quantity() {
        let product = Product::new(
            "company-1".to_string(),
            "Hammer".to_string(),
            "Claw hammer".to_string(),
            12,
            3,
            Decimal::from_str("10.50").unwrap(),
            vec![0u8; 4],
        );
        assert_eq!(product.stock_value, Decimal::from_str("126.00").unwrap());
    }

    #[test]
    fn recalculate_tracks_quantity_changes() {
        let mut product = Product::new(
            "company-1".to_string(),
            "Hammer".to_string(),
            "Claw hammer".to_string(),
            12,
            3,
            Decimal::from_str("2.25").unwrap(),
            vec![0u8; 4],
        );
        product.quantity = 4;
        product.recalculate_stock_value();
        assert_eq!(product.stock_value, Decimal::from_str("9.00").unwrap());
    }

    #[test]
    fn below_critical_includes_the_threshold_itself() {
        let mut product = Product::new(
            "company-1".to_string(),
            "Hammer".to_string(),
            "Claw hammer".to_string(),
            5,
            5,
            Decimal::ONE,
            vec![0u8; 4],
        );
        assert!(product.is_below_critical());
        product.quantity = 6;
        assert!(!product.is_below_critical());
    }
}
