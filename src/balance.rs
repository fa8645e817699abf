use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::schemas::{Expense, ParticipantName, Trip};

type Balance = HashMap<ParticipantName, f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceError {
    #[error("cannot compute: no participants")]
    NoParticipants,
    #[error("expense \"{expense_id}\" is paid by \"{payer}\", who is not a trip participant")]
    UnknownPayer {
        expense_id: String,
        payer: ParticipantName,
    },
}

/// Net position of every participant under an equal split.
///
/// A positive balance means the participant is owed money, a negative one
/// means they owe. Values are never rounded here; formatting is left to the
/// caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub total_spent: f64,
    pub fair_share: f64,
    pub balances: Balance,
}

/// Splits the total of `expenses` equally among `participants`.
///
/// An expense paid by someone outside `participants` still counts towards
/// the total but gets no entry in the result, so the balances stop summing
/// to zero. Callers are expected to reject such expenses beforehand, see
/// [`compute_trip_balances`].
pub fn compute_balances(
    participants: &[ParticipantName],
    expenses: &[Expense],
) -> Result<Balances, BalanceError> {
    if participants.is_empty() {
        return Err(BalanceError::NoParticipants);
    }

    let mut spent_by: Balance = participants.iter().map(|p| (p.clone(), 0.0)).collect();
    for expense in expenses {
        let amount = expense.amount;
        spent_by
            .entry(expense.paid_by.clone())
            .and_modify(|v| *v += amount)
            .or_insert(amount);
    }

    let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
    let fair_share = total_spent / participants.len() as f64;

    let balances = participants
        .iter()
        .map(|p| {
            let paid = spent_by.get(p).copied().unwrap_or_default();
            (p.clone(), paid - fair_share)
        })
        .collect();

    Ok(Balances {
        total_spent,
        fair_share,
        balances,
    })
}

/// Balances of a stored trip.
///
/// Participants can change after expenses were recorded, so every payer is
/// checked against the current participant list first.
pub fn compute_trip_balances(trip: &Trip) -> Result<Balances, BalanceError> {
    if let Some(orphan) = trip
        .expenses
        .iter()
        .find(|e| !trip.participants.contains(&e.paid_by))
    {
        tracing::warn!(
            trip = %trip.id,
            expense = %orphan.id,
            payer = %orphan.paid_by,
            "expense paid by someone outside the trip"
        );
        return Err(BalanceError::UnknownPayer {
            expense_id: orphan.id.clone(),
            payer: orphan.paid_by.clone(),
        });
    }

    let balances = compute_balances(&trip.participants, &trip.expenses)?;
    tracing::debug!(
        trip = %trip.id,
        total_spent = balances.total_spent,
        fair_share = balances.fair_share,
        "computed balances"
    );
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Vec<ParticipantName> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn expense(amount: f64, paid_by: &str) -> Expense {
        Expense {
            id: crate::schemas::new_id(),
            description: "dinner".to_string(),
            amount,
            paid_by: paid_by.to_string(),
        }
    }

    #[test]
    fn single_payer_is_owed_half() {
        let result = compute_balances(&names(&["A", "B"]), &[expense(100.0, "A")]).unwrap();
        assert_eq!(result.total_spent, 100.0);
        assert_eq!(result.fair_share, 50.0);
        assert_eq!(result.balances["A"], 50.0);
        assert_eq!(result.balances["B"], -50.0);
    }

    #[test]
    fn even_payments_settle_everyone() {
        let expenses = [expense(30.0, "A"), expense(30.0, "B"), expense(30.0, "C")];
        let result = compute_balances(&names(&["A", "B", "C"]), &expenses).unwrap();
        assert_eq!(result.total_spent, 90.0);
        assert_eq!(result.fair_share, 30.0);
        assert!(result.balances.values().all(|b| *b == 0.0));
        assert_eq!(result.balances.len(), 3);
    }

    #[test]
    fn no_expenses_means_zero_everywhere() {
        let result = compute_balances(&names(&["A"]), &[]).unwrap();
        assert_eq!(result.total_spent, 0.0);
        assert_eq!(result.fair_share, 0.0);
        assert_eq!(result.balances["A"], 0.0);
    }

    #[test]
    fn empty_participants_is_an_error() {
        assert_eq!(
            compute_balances(&[], &[expense(10.0, "A")]),
            Err(BalanceError::NoParticipants)
        );
        assert_eq!(compute_balances(&[], &[]), Err(BalanceError::NoParticipants));
    }

    #[test]
    fn outsider_payment_counts_in_total_only() {
        let result =
            compute_balances(&names(&["A", "B"]), &[expense(40.0, "A"), expense(20.0, "Z")])
                .unwrap();
        assert_eq!(result.total_spent, 60.0);
        assert_eq!(result.fair_share, 30.0);
        assert!(!result.balances.contains_key("Z"));
        assert_eq!(result.balances["A"], 10.0);
        assert_eq!(result.balances["B"], -30.0);
    }

    #[test]
    fn trip_with_orphaned_payer_is_rejected() {
        let orphan = expense(20.0, "Z");
        let trip = Trip {
            id: crate::schemas::new_id(),
            name: "Lisbon".to_string(),
            participants: names(&["A", "B"]),
            expenses: vec![expense(40.0, "A"), orphan.clone()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            compute_trip_balances(&trip),
            Err(BalanceError::UnknownPayer {
                expense_id: orphan.id,
                payer: "Z".to_string(),
            })
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let result = compute_balances(&names(&["A", "B"]), &[expense(100.0, "A")]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalSpent"], 100.0);
        assert_eq!(json["fairShare"], 50.0);
        assert_eq!(json["balances"]["B"], -50.0);
    }

    fn arb_trip() -> impl Strategy<Value = (Vec<ParticipantName>, Vec<Expense>)> {
        (1usize..8).prop_flat_map(|count| {
            let participants: Vec<ParticipantName> =
                (0..count).map(|i| format!("P{i}")).collect();
            let expenses = prop::collection::vec((0.01..10_000.0_f64, 0..count), 0..30);
            (Just(participants), expenses).prop_map(|(participants, raw)| {
                let expenses = raw
                    .into_iter()
                    .map(|(amount, payer)| expense(amount, &participants[payer]))
                    .collect();
                (participants, expenses)
            })
        })
    }

    fn tolerance(total: f64) -> f64 {
        1e-9 * total.max(1.0)
    }

    proptest! {
        #[test]
        fn balances_sum_to_zero((participants, expenses) in arb_trip()) {
            let result = compute_balances(&participants, &expenses).unwrap();
            let sum: f64 = result.balances.values().sum();
            prop_assert!(sum.abs() <= tolerance(result.total_spent));
        }

        #[test]
        fn fair_share_times_count_is_total((participants, expenses) in arb_trip()) {
            let result = compute_balances(&participants, &expenses).unwrap();
            let rebuilt = result.fair_share * participants.len() as f64;
            prop_assert!((rebuilt - result.total_spent).abs() <= tolerance(result.total_spent));
        }

        #[test]
        fn same_input_same_output((participants, expenses) in arb_trip()) {
            let first = compute_balances(&participants, &expenses).unwrap();
            let second = compute_balances(&participants, &expenses).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
