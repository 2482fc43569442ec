//! Treasury-return collaborators.
//!
//! An account acting as a token's treasury must have its held balances
//! redistributed before deletion. `NoTreasuryReturns` is the null object
//! for networks without treasury-held tokens; `InMemoryTreasury` performs
//! step-wise returns against an in-memory book of outstanding balances.

use std::collections::{HashMap, VecDeque};

use shared_types::{EntityNum, TokenAdjustment};

use crate::domain::{work, AdmissionThrottle};
use crate::ports::{TreasuryReturner, TreasuryStep};

/// Null-object returner: no entity is ever a treasury.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTreasuryReturns;

impl TreasuryReturner for NoTreasuryReturns {
    fn is_treasury(&self, _num: EntityNum) -> bool {
        false
    }

    fn return_step(&mut self, _num: EntityNum, _throttle: &mut AdmissionThrottle) -> TreasuryStep {
        TreasuryStep {
            finished: true,
            adjustments: vec![],
        }
    }
}

/// One outstanding treasury balance awaiting return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outstanding {
    token: EntityNum,
    amount: i64,
    beneficiary: EntityNum,
}

/// In-memory book of treasury-held balances, returned one balance per
/// throttled work step.
#[derive(Debug, Default)]
pub struct InMemoryTreasury {
    outstanding: HashMap<EntityNum, VecDeque<Outstanding>>,
}

impl InMemoryTreasury {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an outstanding balance held by `treasury`.
    pub fn add_outstanding(
        &mut self,
        treasury: EntityNum,
        token: EntityNum,
        amount: i64,
        beneficiary: EntityNum,
    ) {
        self.outstanding
            .entry(treasury)
            .or_default()
            .push_back(Outstanding {
                token,
                amount,
                beneficiary,
            });
    }
}

impl TreasuryReturner for InMemoryTreasury {
    fn is_treasury(&self, num: EntityNum) -> bool {
        self.outstanding
            .get(&num)
            .is_some_and(|pending| !pending.is_empty())
    }

    fn return_step(&mut self, num: EntityNum, throttle: &mut AdmissionThrottle) -> TreasuryStep {
        let mut adjustments = Vec::new();
        let Some(pending) = self.outstanding.get_mut(&num) else {
            return TreasuryStep {
                finished: true,
                adjustments,
            };
        };

        while let Some(&item) = pending.front() {
            if !throttle.allow(work::TREASURY_STEP) {
                break;
            }
            pending.pop_front();
            adjustments.push(TokenAdjustment {
                token: item.token,
                account: num,
                amount: -item.amount,
            });
            adjustments.push(TokenAdjustment {
                token: item.token,
                account: item.beneficiary,
                amount: item.amount,
            });
        }

        let finished = pending.is_empty();
        if finished {
            self.outstanding.remove(&num);
        }
        TreasuryStep {
            finished,
            adjustments,
        }
    }
}
