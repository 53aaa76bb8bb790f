//! Current accounts: withdrawals may overdraw down to a limit.

use crate::account::{Account, AccountCore, AccountError, AccountKind};
use crate::money::Money;
use serde::Serialize;

/// Account whose balance may go as low as `-overdraft_limit`
///
/// Built only through [`CurrentAccount::new`], which clamps the limit:
///
/// ```compile_fail
/// fn decodable<T: serde::de::DeserializeOwned>() {}
/// decodable::<bankdesk::CurrentAccount>();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentAccount {
    core: AccountCore,
    overdraft_limit: Money,
}

impl CurrentAccount {
    /// Creates a current account. A negative limit is treated as zero.
    #[must_use]
    pub fn new(core: AccountCore, overdraft_limit: Money) -> Self {
        Self {
            core,
            overdraft_limit: overdraft_limit.max(Money::ZERO),
        }
    }

    /// How far the balance may go below zero
    #[must_use]
    pub const fn overdraft_limit(&self) -> Money {
        self.overdraft_limit
    }

    pub(crate) fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }
}

impl Account for CurrentAccount {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn deposit(&mut self, amount: Money) -> Result<Money, AccountError> {
        self.core.deposit(amount)
    }

    fn kind(&self) -> AccountKind {
        AccountKind::Current
    }

    fn withdraw(&mut self, amount: Money) -> Result<Money, AccountError> {
        let overdraft_limit = self.overdraft_limit;
        // limit is non-negative, so negation cannot overflow
        let floor = overdraft_limit.checked_neg().ok_or(AccountError::Overflow)?;
        self.core.withdraw_above(amount, floor, |balance| {
            AccountError::OverdraftLimit {
                balance,
                amount,
                overdraft_limit,
            }
        })
    }
}
