// src/domain/money.rs

use crate::domain::kinds::LossCategory;
use crate::domain::records::LossItem;

/// Parse a wire/form money value into whole currency units.
///
/// The API transmits money as decimal strings. Accounting here is in whole
/// units only, so:
/// - empty or non-numeric input coerces to 0
/// - a fractional part is dropped ("150000.00" -> 150000)
/// - negatives clamp to 0
pub fn parse_money(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let integer_part = trimmed.split('.').next().unwrap_or("");
    let value: i64 = integer_part.parse().unwrap_or(0);

    value.max(0)
}

/// Wire encoding of a money value (decimal string, whole units).
pub fn money_string(value: i64) -> String {
    value.max(0).to_string()
}

/// Display formatting: integer with thousands separators, e.g. "195,000".
pub fn format_money(value: i64) -> String {
    let digits = value.max(0).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Derived loss figures for an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LossTotals {
    pub cash_loss: i64,
    pub merchandise_loss: i64,
    pub total_loss: i64,
}

/// Recompute the derived figures from the raw parts:
/// - cash = fund + collection
/// - merchandise = sum(quantity * unit_price) over merchandise items
/// - total = cash + merchandise + other
pub fn recompute(
    cash_fund: i64,
    cash_collection: i64,
    items: &[LossItem],
    other_losses: i64,
) -> LossTotals {
    let cash_loss = cash_fund.max(0) + cash_collection.max(0);

    let merchandise_loss: i64 = items
        .iter()
        .filter(|item| item.category == LossCategory::Merchandise)
        .map(LossItem::line_total)
        .sum();

    LossTotals {
        cash_loss,
        merchandise_loss,
        total_loss: cash_loss + merchandise_loss + other_losses.max(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merch(quantity: i64, unit_price: i64) -> LossItem {
        LossItem {
            id: None,
            category: LossCategory::Merchandise,
            description: "item".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn parse_money_coerces_garbage_to_zero() {
        assert_eq!(parse_money(""), 0);
        assert_eq!(parse_money("   "), 0);
        assert_eq!(parse_money("abc"), 0);
        assert_eq!(parse_money("12abc"), 0);
        assert_eq!(parse_money("-500"), 0);
    }

    #[test]
    fn parse_money_drops_fractions() {
        assert_eq!(parse_money("150000"), 150000);
        assert_eq!(parse_money("150000.00"), 150000);
        assert_eq!(parse_money(" 42.99 "), 42);
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0), "0");
        assert_eq!(format_money(999), "999");
        assert_eq!(format_money(1000), "1,000");
        assert_eq!(format_money(195000), "195,000");
        assert_eq!(format_money(1234567), "1,234,567");
    }

    // total = (fund + collection) + sum(qty * price) + other
    #[test]
    fn worked_example() {
        let items = vec![merch(2, 10000)];
        let totals = recompute(100000, 50000, &items, 25000);

        assert_eq!(totals.cash_loss, 150000);
        assert_eq!(totals.merchandise_loss, 20000);
        assert_eq!(totals.total_loss, 195000);
    }

    #[test]
    fn material_items_do_not_count_as_merchandise() {
        let items = vec![
            merch(2, 10000),
            LossItem {
                id: None,
                category: LossCategory::Material,
                description: "broken door".to_string(),
                quantity: 1,
                unit_price: 80000,
            },
        ];

        let totals = recompute(0, 0, &items, 0);
        assert_eq!(totals.merchandise_loss, 20000);
        assert_eq!(totals.total_loss, 20000);
    }

    #[test]
    fn total_invariant_holds_over_a_grid_of_inputs() {
        let item_lists: Vec<Vec<LossItem>> = vec![
            vec![],
            vec![merch(1, 1)],
            vec![merch(3, 9999), merch(7, 250)],
        ];

        for fund in [0, 1, 100000] {
            for collection in [0, 50, 50000] {
                for other in [0, 25000] {
                    for items in &item_lists {
                        let totals = recompute(fund, collection, items, other);
                        let merchandise: i64 = items.iter().map(LossItem::line_total).sum();

                        assert_eq!(totals.cash_loss, fund + collection);
                        assert_eq!(totals.merchandise_loss, merchandise);
                        assert_eq!(
                            totals.total_loss,
                            (fund + collection) + merchandise + other
                        );
                    }
                }
            }
        }
    }
}
