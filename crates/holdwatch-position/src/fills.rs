//! Episode fill counting.

use holdwatch_core::{AccountingMode, Direction, OrderRecord};

use crate::history::{Fill, FillHistory};

/// Number of fills that belong to the episode starting at `start_ms`.
///
/// Net balance counts every usable fill at or after the start. Side-tagged
/// counts only opening fills of the direction's own ledger.
pub fn count_fills(
    orders: &[OrderRecord],
    start_ms: u64,
    direction: Direction,
    mode: AccountingMode,
) -> usize {
    count_in_history(&FillHistory::from_orders(orders), start_ms, direction, mode)
}

pub(crate) fn count_in_history(
    history: &FillHistory,
    start_ms: u64,
    direction: Direction,
    mode: AccountingMode,
) -> usize {
    history
        .fills()
        .iter()
        .filter(|fill| fill.time_ms >= start_ms)
        .filter(|fill| belongs_to(fill, direction, mode))
        .count()
}

fn belongs_to(fill: &Fill, direction: Direction, mode: AccountingMode) -> bool {
    match mode {
        AccountingMode::NetBalance => true,
        AccountingMode::SideTagged => {
            fill.position_side == direction.ledger() && direction.is_opened_by(fill.side)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::reconstruct_open_time;
    use crate::fixtures::{
        filled, hedge_history, hedge_noise, hedged, lsk_history, order, permuted,
    };
    use holdwatch_core::{OrderSide, OrderStatus, PositionSide};

    const NET: AccountingMode = AccountingMode::NetBalance;
    const HEDGE: AccountingMode = AccountingMode::SideTagged;

    #[test]
    fn test_net_balance_counts_fills_since_start() {
        assert_eq!(count_fills(&lsk_history(), 6000, Direction::Long, NET), 2);
        assert_eq!(count_fills(&lsk_history(), 1000, Direction::Long, NET), 6);
    }

    #[test]
    fn test_net_balance_counts_both_sides() {
        let orders = vec![
            filled(1, OrderSide::Buy, "10", 1000),
            filled(2, OrderSide::Sell, "4", 2000),
            filled(3, OrderSide::Buy, "1", 3000),
        ];
        assert_eq!(count_fills(&orders, 1000, Direction::Long, NET), 3);
    }

    #[test]
    fn test_side_tagged_counts_opening_fills_of_ledger() {
        let orders = vec![
            hedged(1, PositionSide::Long, OrderSide::Buy, "0.1", 1000),
            hedged(2, PositionSide::Short, OrderSide::Sell, "0.2", 2000),
            hedged(3, PositionSide::Long, OrderSide::Buy, "0.1", 3000),
            hedged(4, PositionSide::Long, OrderSide::Sell, "0.05", 4000),
        ];
        assert_eq!(count_fills(&orders, 1000, Direction::Long, HEDGE), 2);
        assert_eq!(count_fills(&orders, 2000, Direction::Short, HEDGE), 1);
    }

    #[test]
    fn test_counting_is_repeatable_and_order_independent() {
        let mut hedge = hedge_history();
        hedge.extend(hedge_noise());
        let cases = [
            (lsk_history(), 6000, Direction::Long, NET, 2),
            (hedge.clone(), 1000, Direction::Long, HEDGE, 2),
            (hedge, 2000, Direction::Short, HEDGE, 1),
        ];

        for (orders, start, direction, mode, expected) in cases {
            let first = count_fills(&orders, start, direction, mode);
            assert_eq!(first, expected, "{mode} {direction}");
            assert_eq!(count_fills(&orders, start, direction, mode), first);
            for shift in 0..orders.len() {
                assert_eq!(
                    count_fills(&permuted(&orders, shift), start, direction, mode),
                    first,
                    "{mode} {direction} shift {shift}"
                );
            }
        }
    }

    #[test]
    fn test_noise_is_not_counted() {
        let mut orders = lsk_history();
        orders.push(order(30, OrderSide::Buy, OrderStatus::Canceled, "0", 6500));
        orders.push(filled(31, OrderSide::Buy, "bogus", 6600));
        assert_eq!(count_fills(&orders, 6000, Direction::Long, NET), 2);
    }

    #[test]
    fn test_reconstructed_episode_has_at_least_one_fill() {
        let cases: Vec<(Vec<OrderRecord>, Direction, AccountingMode)> = vec![
            (lsk_history(), Direction::Long, NET),
            (
                vec![
                    filled(1, OrderSide::Sell, "10", 1000),
                    filled(2, OrderSide::Buy, "20", 2000),
                ],
                Direction::Long,
                NET,
            ),
            (
                vec![
                    hedged(1, PositionSide::Long, OrderSide::Buy, "1", 1000),
                    hedged(2, PositionSide::Short, OrderSide::Sell, "1", 500),
                ],
                Direction::Short,
                HEDGE,
            ),
        ];
        for (orders, direction, mode) in cases {
            let start = reconstruct_open_time(&orders, direction, mode).unwrap();
            assert!(count_fills(&orders, start, direction, mode) >= 1);
        }
    }
}
