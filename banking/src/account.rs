//! The account capability shared by every account kind.
//!
//! [`AccountCore`] owns identity and balance. Its balance field is private to
//! this crate: outside code reads it through [`Account::balance`] and changes
//! it only through [`Account::deposit`] and [`Account::withdraw`].

use crate::current::CurrentAccount;
use crate::money::Money;
use crate::savings::SavingsAccount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of an account in the registry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Creates an account number, trimming surrounding whitespace
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Self {
        Self(number.as_ref().trim().to_string())
    }

    /// Returns the number as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the number is empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of account the desk can open
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// Withdrawals may not take the balance below a minimum
    Savings,
    /// Withdrawals may overdraw up to a limit
    Current,
}

impl AccountKind {
    /// Display name of the kind
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "Savings",
            Self::Current => "Current",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons an account operation was refused
///
/// A refused operation never changes the balance.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AccountError {
    /// Deposit of zero or a negative amount
    #[error("Invalid deposit amount")]
    InvalidDeposit {
        /// Amount requested
        amount: Money,
    },

    /// Withdrawal of zero or a negative amount
    #[error("Invalid withdrawal amount")]
    InvalidWithdrawal {
        /// Amount requested
        amount: Money,
    },

    /// Savings withdrawal would go below the minimum balance
    #[error("Cannot withdraw! Minimum balance requirement not met.")]
    MinimumBalance {
        /// Balance before the attempt
        balance: Money,
        /// Amount requested
        amount: Money,
        /// Floor of the account
        min_balance: Money,
    },

    /// Current-account withdrawal would exceed the overdraft limit
    #[error("Overdraft limit exceeded!")]
    OverdraftLimit {
        /// Balance before the attempt
        balance: Money,
        /// Amount requested
        amount: Money,
        /// Overdraft limit of the account
        overdraft_limit: Money,
    },

    /// Result does not fit in the money range
    #[error("Amount out of range")]
    Overflow,
}

/// Identity and balance shared by every account kind
///
/// The balance is private. Inside the crate it changes through the
/// deposit and withdrawal rules, or through event replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountCore {
    number: AccountNumber,
    owner: String,
    balance: Money,
    opened_at: DateTime<Utc>,
}

impl AccountCore {
    /// Creates the shared part of an account
    #[must_use]
    pub const fn new(
        number: AccountNumber,
        owner: String,
        initial_balance: Money,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            number,
            owner,
            balance: initial_balance,
            opened_at,
        }
    }

    /// Account identifier
    #[must_use]
    pub const fn number(&self) -> &AccountNumber {
        &self.number
    }

    /// Account holder name
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Current balance
    #[must_use]
    pub const fn balance(&self) -> Money {
        self.balance
    }

    /// When the account was opened
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Sets the balance without any rule check.
    ///
    /// Only the deposit and withdrawal rules (after they passed) and event
    /// replay in the reducer go through here.
    pub(crate) const fn update_balance(&mut self, new_balance: Money) {
        self.balance = new_balance;
    }

    /// Adds a positive `amount` and returns the new balance.
    pub(crate) fn deposit(&mut self, amount: Money) -> Result<Money, AccountError> {
        if !amount.is_positive() {
            return Err(AccountError::InvalidDeposit { amount });
        }

        let new_balance = self
            .balance
            .checked_add(amount)
            .ok_or(AccountError::Overflow)?;
        self.update_balance(new_balance);
        Ok(new_balance)
    }

    /// Withdraws `amount` if the result stays at or above `floor`.
    ///
    /// `refuse` builds the variant-specific error from the balance before
    /// the attempt.
    pub(crate) fn withdraw_above(
        &mut self,
        amount: Money,
        floor: Money,
        refuse: impl FnOnce(Money) -> AccountError,
    ) -> Result<Money, AccountError> {
        if !amount.is_positive() {
            return Err(AccountError::InvalidWithdrawal { amount });
        }

        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or(AccountError::Overflow)?;
        if remaining < floor {
            return Err(refuse(self.balance));
        }

        self.update_balance(remaining);
        Ok(remaining)
    }
}

/// Deposit, withdraw and balance queries over an account
///
/// Every kind deposits through the same [`AccountCore`] rule and supplies
/// its own `withdraw` rule. The trait hands out the core read-only, so a
/// balance only changes through `deposit` and `withdraw`:
///
/// ```
/// use bankdesk::{Account, AccountCore, AccountNumber, Money, SavingsAccount};
/// use chrono::Utc;
///
/// let core = AccountCore::new(
///     AccountNumber::new("S-1"),
///     "Alice".to_string(),
///     Money::from_major(1000),
///     Utc::now(),
/// );
/// let mut account = SavingsAccount::new(core, Money::from_major(500));
///
/// assert!(account.withdraw(Money::from_major(600)).is_err());
/// assert_eq!(account.balance(), Money::from_major(1000));
/// ```
///
/// Replacing the core from outside the crate does not compile:
///
/// ```compile_fail
/// use bankdesk::{AccountCore, AccountNumber, Money, SavingsAccount};
/// use chrono::Utc;
///
/// let core = |balance| {
///     AccountCore::new(AccountNumber::new("S-1"), "Alice".to_string(), balance, Utc::now())
/// };
/// let mut account = SavingsAccount::new(core(Money::from_major(1000)), Money::from_major(500));
/// *account.core_mut() = core(Money::from_major(-99));
/// ```
///
/// Nor does reaching it through a generic bound:
///
/// ```compile_fail
/// use bankdesk::{Account, AccountCore};
///
/// fn overwrite<A: Account>(account: &mut A, core: AccountCore) {
///     *account.core_mut() = core;
/// }
/// ```
///
/// Nor setting the balance on a core directly:
///
/// ```compile_fail
/// use bankdesk::{AccountCore, AccountNumber, Money};
/// use chrono::Utc;
///
/// let mut core = AccountCore::new(
///     AccountNumber::new("S-1"),
///     "Alice".to_string(),
///     Money::from_major(1000),
///     Utc::now(),
/// );
/// core.update_balance(Money::from_major(-99));
/// ```
pub trait Account {
    /// Shared identity and balance
    fn core(&self) -> &AccountCore;

    /// Which kind of account this is
    fn kind(&self) -> AccountKind;

    /// Adds a positive `amount` and returns the new balance
    ///
    /// # Errors
    ///
    /// [`AccountError::InvalidDeposit`] when `amount <= 0`,
    /// [`AccountError::Overflow`] when the sum does not fit.
    fn deposit(&mut self, amount: Money) -> Result<Money, AccountError>;

    /// Withdraws `amount` under the kind's rule
    ///
    /// # Errors
    ///
    /// Returns the reason the withdrawal was refused. The balance is
    /// unchanged on error.
    fn withdraw(&mut self, amount: Money) -> Result<Money, AccountError>;

    /// Current balance
    fn balance(&self) -> Money {
        self.core().balance()
    }

    /// Account identifier
    fn account_number(&self) -> &AccountNumber {
        self.core().number()
    }

    /// Account holder name
    fn owner(&self) -> &str {
        self.core().owner()
    }

    /// When the account was opened
    fn opened_at(&self) -> DateTime<Utc> {
        self.core().opened_at()
    }
}

/// An account as stored in the registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BankAccount {
    /// Savings account
    Savings(SavingsAccount),
    /// Current account
    Current(CurrentAccount),
}

impl BankAccount {
    /// Event replay writes recorded balances through here
    pub(crate) fn core_mut(&mut self) -> &mut AccountCore {
        match self {
            Self::Savings(account) => account.core_mut(),
            Self::Current(account) => account.core_mut(),
        }
    }
}

impl Account for BankAccount {
    fn core(&self) -> &AccountCore {
        match self {
            Self::Savings(account) => account.core(),
            Self::Current(account) => account.core(),
        }
    }

    fn kind(&self) -> AccountKind {
        match self {
            Self::Savings(_) => AccountKind::Savings,
            Self::Current(_) => AccountKind::Current,
        }
    }

    fn deposit(&mut self, amount: Money) -> Result<Money, AccountError> {
        match self {
            Self::Savings(account) => account.deposit(amount),
            Self::Current(account) => account.deposit(amount),
        }
    }

    fn withdraw(&mut self, amount: Money) -> Result<Money, AccountError> {
        match self {
            Self::Savings(account) => account.withdraw(amount),
            Self::Current(account) => account.withdraw(amount),
        }
    }
}

impl From<SavingsAccount> for BankAccount {
    fn from(account: SavingsAccount) -> Self {
        Self::Savings(account)
    }
}

impl From<CurrentAccount> for BankAccount {
    fn from(account: CurrentAccount) -> Self {
        Self::Current(account)
    }
}
