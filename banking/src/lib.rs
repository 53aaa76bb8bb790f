//! In-memory banking desk.
//!
//! Two kinds of account share one capability, [`Account`]:
//!
//! - [`SavingsAccount`]: a withdrawal may not take the balance below its
//!   minimum balance
//! - [`CurrentAccount`]: a withdrawal may overdraw down to `-overdraft_limit`
//!
//! The registry of open accounts is a [`BankState`] driven by the
//! [`BankReducer`]; the [`Shell`] owns one and runs the menu.
//!
//! # Architecture
//!
//! ```text
//!   stdin ──► Shell ──► BankAction (command)
//!                          │
//!                          ▼
//!                     BankReducer ──► Account::deposit / withdraw
//!                          │
//!                          ▼
//!              Effect::Emit(event) / Effect::Halt
//!                          │
//!   stdout ◄── render ◄────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use bankdesk::{
//!     AccountKind, AccountNumber, BankAction, BankEnvironment, BankReducer, BankState, Money,
//! };
//! use bankdesk_core::{environment::SystemClock, reducer::Reducer};
//! use std::sync::Arc;
//!
//! let env = BankEnvironment::new(Arc::new(SystemClock));
//! let reducer = BankReducer::new();
//! let mut state = BankState::new();
//! let number = AccountNumber::new("S-100");
//!
//! reducer.reduce(
//!     &mut state,
//!     BankAction::OpenAccount {
//!         number: number.clone(),
//!         owner: "Alice".to_string(),
//!         kind: AccountKind::Savings,
//!         initial_balance: Money::from_major(1000),
//!     },
//!     &env,
//! );
//! reducer.reduce(
//!     &mut state,
//!     BankAction::Withdraw { number: number.clone(), amount: Money::from_major(400) },
//!     &env,
//! );
//!
//! assert_eq!(state.balance(&number), Some(Money::from_major(600)));
//! ```

pub mod account;
pub mod config;
pub mod current;
pub mod money;
pub mod reducer;
pub mod savings;
pub mod shell;
pub mod types;

// Re-export commonly used types
pub use account::{Account, AccountCore, AccountError, AccountKind, AccountNumber, BankAccount};
pub use config::BankConfig;
pub use current::CurrentAccount;
pub use money::{Money, ParseMoneyError};
pub use reducer::{BankEnvironment, BankReducer};
pub use savings::SavingsAccount;
pub use shell::{Shell, ShellError};
pub use types::{AccountDefaults, BankAction, BankError, BankState};
