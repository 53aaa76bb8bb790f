//! Domain types for the bank registry.
//!
//! - [`BankState`]: the registry of open accounts, owned by the shell
//! - [`BankAction`]: commands the shell sends and the events they produce
//! - [`BankError`]: why a command was rejected

use crate::account::{Account, AccountError, AccountKind, AccountNumber, BankAccount};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Limits applied to newly opened accounts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDefaults {
    /// Floor for new savings accounts
    pub min_balance: Money,
    /// Overdraft limit for new current accounts
    pub overdraft_limit: Money,
}

impl AccountDefaults {
    /// The limit that applies to a new account of `kind`
    #[must_use]
    pub const fn limit_for(&self, kind: AccountKind) -> Money {
        match kind {
            AccountKind::Savings => self.min_balance,
            AccountKind::Current => self.overdraft_limit,
        }
    }
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            min_balance: Money::from_major(500),
            overdraft_limit: Money::from_major(1000),
        }
    }
}

/// Why a bank command was rejected
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BankError {
    /// No account is registered under the number
    #[error("Account not found!")]
    AccountNotFound {
        /// Number that was looked up
        number: AccountNumber,
    },

    /// The number is already registered
    #[error("Account {number} already exists!")]
    DuplicateAccount {
        /// Number that was requested
        number: AccountNumber,
    },

    /// The account number is empty
    #[error("Account number cannot be empty!")]
    BlankAccountNumber,

    /// The owner name is empty
    #[error("Account holder name cannot be empty!")]
    BlankOwner,

    /// The account refused the operation
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// State of all bank accounts
///
/// Serializable for dumps but not deserializable: accounts are rebuilt by
/// replaying `AccountOpened` events, which goes through the constructors.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BankState {
    accounts: HashMap<AccountNumber, BankAccount>,
    /// Last rejection (if any)
    pub last_error: Option<BankError>,
}

impl BankState {
    /// Creates a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of accounts
    #[must_use]
    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    /// Returns an account by number
    #[must_use]
    pub fn get(&self, number: &AccountNumber) -> Option<&BankAccount> {
        self.accounts.get(number)
    }

    /// Checks if an account exists
    #[must_use]
    pub fn exists(&self, number: &AccountNumber) -> bool {
        self.accounts.contains_key(number)
    }

    /// Returns the balance for an account
    #[must_use]
    pub fn balance(&self, number: &AccountNumber) -> Option<Money> {
        self.accounts.get(number).map(Account::balance)
    }

    /// Iterates over all open accounts in no particular order
    pub fn accounts(&self) -> impl Iterator<Item = &BankAccount> {
        self.accounts.values()
    }

    pub(crate) fn get_mut(&mut self, number: &AccountNumber) -> Option<&mut BankAccount> {
        self.accounts.get_mut(number)
    }

    pub(crate) fn insert(&mut self, account: BankAccount) {
        self.accounts
            .insert(account.account_number().clone(), account);
    }
}

/// Actions for the bank (commands and events)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankAction {
    // ========== Commands ==========
    /// Command: Open a new account
    OpenAccount {
        /// Account number
        number: AccountNumber,
        /// Account holder name
        owner: String,
        /// Savings or current
        kind: AccountKind,
        /// Initial balance
        initial_balance: Money,
    },

    /// Command: Deposit money into an account
    Deposit {
        /// Account to deposit into
        number: AccountNumber,
        /// Amount to deposit
        amount: Money,
    },

    /// Command: Withdraw money from an account
    Withdraw {
        /// Account to withdraw from
        number: AccountNumber,
        /// Amount to withdraw
        amount: Money,
    },

    /// Command: Report the balance of an account
    CheckBalance {
        /// Account to query
        number: AccountNumber,
    },

    /// Command: Leave the desk
    Exit,

    // ========== Events ==========
    /// Event: Account was opened
    AccountOpened {
        /// Account number
        number: AccountNumber,
        /// Account holder name
        owner: String,
        /// Savings or current
        kind: AccountKind,
        /// Initial balance
        initial_balance: Money,
        /// Minimum balance (savings) or overdraft limit (current)
        limit: Money,
        /// When the account was opened
        opened_at: DateTime<Utc>,
    },

    /// Event: Money was deposited
    MoneyDeposited {
        /// Account number
        number: AccountNumber,
        /// Amount deposited
        amount: Money,
        /// Balance after the deposit
        balance: Money,
    },

    /// Event: Money was withdrawn
    MoneyWithdrawn {
        /// Account number
        number: AccountNumber,
        /// Amount withdrawn
        amount: Money,
        /// Balance after the withdrawal
        balance: Money,
    },

    /// Event: Balance was read
    BalanceReported {
        /// Account number
        number: AccountNumber,
        /// Current balance
        balance: Money,
    },

    /// Event: Command was rejected
    Rejected {
        /// Why
        error: BankError,
    },
}

impl BankAction {
    /// Checks whether this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::OpenAccount { .. }
                | Self::Deposit { .. }
                | Self::Withdraw { .. }
                | Self::CheckBalance { .. }
                | Self::Exit
        )
    }

    /// Checks whether this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}
