//! Global lock order
//!
//! Every transfer locks the account with the lower id first. Because all call
//! sites share this one order, no two transfers can each hold one lock while
//! waiting for the other's, whatever their directions.

use std::cmp::Ordering;

use crate::account::{AccountId, MonetaryAccount};

/// Order two ids as `(first, second)`, lower id first.
///
/// Equal ids return the arguments unchanged; callers must not try to take
/// both locks in that case.
pub fn order_ids<'a>(a: &'a AccountId, b: &'a AccountId) -> (&'a AccountId, &'a AccountId) {
    match a.cmp(b) {
        Ordering::Greater => (b, a),
        Ordering::Less | Ordering::Equal => (a, b),
    }
}

/// Order two accounts for lock acquisition by their ids.
pub fn lock_order<'a>(
    a: &'a MonetaryAccount,
    b: &'a MonetaryAccount,
) -> (&'a MonetaryAccount, &'a MonetaryAccount) {
    let (first, _) = order_ids(a.id(), b.id());
    if std::ptr::eq(first, a.id()) {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    #[test]
    fn test_order_ids_direction_independent() {
        let a = id("A");
        let b = id("B");
        assert_eq!(order_ids(&a, &b), (&a, &b));
        assert_eq!(order_ids(&b, &a), (&a, &b));
    }

    #[test]
    fn test_order_ids_equal() {
        let a1 = id("A");
        let a2 = id("A");
        let (first, second) = order_ids(&a1, &a2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lock_order_accounts() {
        let a = MonetaryAccount::open("Id-130", Decimal::ZERO).unwrap();
        let b = MonetaryAccount::open("Id-131", Decimal::ZERO).unwrap();

        let (first, second) = lock_order(&a, &b);
        assert_eq!(first.id().as_str(), "Id-130");
        assert_eq!(second.id().as_str(), "Id-131");

        let (first, second) = lock_order(&b, &a);
        assert_eq!(first.id().as_str(), "Id-130");
        assert_eq!(second.id().as_str(), "Id-131");
    }

    #[test]
    fn test_lock_order_is_total_over_many_ids() {
        let ids: Vec<AccountId> = ["C", "A", "B10", "B2", "b"].iter().map(|s| id(s)).collect();
        for x in &ids {
            for y in &ids {
                let (f1, s1) = order_ids(x, y);
                let (f2, s2) = order_ids(y, x);
                assert_eq!((f1, s1), (f2, s2));
                assert!(f1 <= s1);
            }
        }
    }
}
