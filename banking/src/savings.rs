//! Savings accounts: withdrawals keep the balance at or above a floor.

use crate::account::{Account, AccountCore, AccountError, AccountKind};
use crate::money::Money;
use serde::Serialize;

/// Account whose balance may not fall below `min_balance` through a withdrawal
///
/// Only [`SavingsAccount::new`] builds one, so the floor is never negative.
/// There is no deserializer that could skip it:
///
/// ```compile_fail
/// fn decodable<T: serde::de::DeserializeOwned>() {}
/// decodable::<bankdesk::SavingsAccount>();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavingsAccount {
    core: AccountCore,
    min_balance: Money,
}

impl SavingsAccount {
    /// Creates a savings account. A negative floor is treated as zero.
    #[must_use]
    pub fn new(core: AccountCore, min_balance: Money) -> Self {
        Self {
            core,
            min_balance: min_balance.max(Money::ZERO),
        }
    }

    /// The balance floor
    #[must_use]
    pub const fn min_balance(&self) -> Money {
        self.min_balance
    }

    pub(crate) fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }
}

impl Account for SavingsAccount {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn deposit(&mut self, amount: Money) -> Result<Money, AccountError> {
        self.core.deposit(amount)
    }

    fn kind(&self) -> AccountKind {
        AccountKind::Savings
    }

    fn withdraw(&mut self, amount: Money) -> Result<Money, AccountError> {
        let min_balance = self.min_balance;
        self.core
            .withdraw_above(amount, min_balance, |balance| AccountError::MinimumBalance {
                balance,
                amount,
                min_balance,
            })
    }
}
