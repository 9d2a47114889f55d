//! Monthly sales totals.

use serde::Serialize;

use crate::transaction::Transaction;

/// The sale amount and number of sold and unsold items for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every transaction. Missing prices count as zero.
    pub total_sale_amount: f64,
    /// The number of transactions marked as sold.
    pub total_sold_items: u64,
    /// The number of transactions not marked as sold, including those with no sold flag.
    pub total_not_sold_items: u64,
}

/// Calculate the sale statistics for `transactions`.
pub(super) fn compute_statistics(transactions: &[Transaction]) -> Statistics {
    let total_sale_amount = transactions
        .iter()
        .map(|transaction| transaction.price.unwrap_or(0.0))
        .sum();

    let total_sold_items = transactions
        .iter()
        .filter(|transaction| transaction.sold == Some(true))
        .count() as u64;

    Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items: transactions.len() as u64 - total_sold_items,
    }
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::transaction::Transaction;

    use super::{Statistics, compute_statistics};

    fn transaction(
        price: Option<f64>,
        sold: Option<bool>,
        date_of_sale: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: 0,
            title: None,
            description: None,
            price,
            date_of_sale,
            category: None,
            sold,
        }
    }

    #[test]
    fn sums_prices_and_counts_sold_items() {
        let transactions = [
            transaction(Some(50.0), Some(true), datetime!(2024-03-01 0:00 UTC)),
            transaction(Some(250.0), Some(false), datetime!(2024-03-15 0:00 UTC)),
        ];

        let got = compute_statistics(&transactions);

        assert_eq!(
            got,
            Statistics {
                total_sale_amount: 300.0,
                total_sold_items: 1,
                total_not_sold_items: 1,
            }
        );
    }

    #[test]
    fn missing_price_counts_as_zero_and_missing_sold_as_not_sold() {
        let transactions = [
            transaction(None, Some(true), datetime!(2024-03-01 0:00 UTC)),
            transaction(Some(12.5), None, datetime!(2024-03-02 0:00 UTC)),
            transaction(None, None, datetime!(2024-03-03 0:00 UTC)),
        ];

        let got = compute_statistics(&transactions);

        assert_eq!(got.total_sale_amount, 12.5);
        assert_eq!(got.total_sold_items, 1);
        assert_eq!(got.total_not_sold_items, 2);
    }

    #[test]
    fn sold_and_not_sold_add_up_to_total() {
        let transactions: Vec<_> = (0..37)
            .map(|i| {
                let sold = match i % 3 {
                    0 => Some(true),
                    1 => Some(false),
                    _ => None,
                };
                transaction(Some(i as f64), sold, datetime!(2024-03-01 0:00 UTC))
            })
            .collect();

        let got = compute_statistics(&transactions);

        assert_eq!(got.total_sold_items + got.total_not_sold_items, 37);
        assert_eq!(got.total_sale_amount, (0..37).sum::<i32>() as f64);
    }

    #[test]
    fn no_transactions_gives_zeroes() {
        assert_eq!(compute_statistics(&[]), Statistics::default());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let got = serde_json::to_value(Statistics {
            total_sale_amount: 300.0,
            total_sold_items: 1,
            total_not_sold_items: 1,
        })
        .unwrap();

        assert_eq!(
            got,
            serde_json::json!({
                "totalSaleAmount": 300.0,
                "totalSoldItems": 1,
                "totalNotSoldItems": 1
            })
        );
    }
}
