//! Bank reducer.
//!
//! Handles registry operations: open, deposit, withdraw, balance queries.
//! Every command produces exactly one emitted event (the change it applied,
//! or a `Rejected` carrying the reason), except `Exit`, which halts.

use crate::account::{Account, AccountCore, AccountKind, AccountNumber, BankAccount};
use crate::current::CurrentAccount;
use crate::money::Money;
use crate::savings::SavingsAccount;
use crate::types::{AccountDefaults, BankAction, BankError, BankState};
use bankdesk_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment dependencies for the bank reducer
#[derive(Clone)]
pub struct BankEnvironment {
    /// Clock for account opening timestamps
    pub clock: Arc<dyn Clock>,
    /// Limits for newly opened accounts
    pub defaults: AccountDefaults,
}

impl BankEnvironment {
    /// Creates a new `BankEnvironment` with the default limits
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            defaults: AccountDefaults::default(),
        }
    }

    /// Replaces the limits for newly opened accounts
    #[must_use]
    pub const fn with_defaults(mut self, defaults: AccountDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Reducer for the bank registry
#[derive(Clone, Debug, Default)]
pub struct BankReducer;

impl BankReducer {
    /// Creates a new `BankReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `OpenAccount` command
    fn validate_open_account(
        state: &BankState,
        number: &AccountNumber,
        owner: &str,
    ) -> Result<(), BankError> {
        if number.is_blank() {
            return Err(BankError::BlankAccountNumber);
        }

        if state.exists(number) {
            return Err(BankError::DuplicateAccount {
                number: number.clone(),
            });
        }

        if owner.trim().is_empty() {
            return Err(BankError::BlankOwner);
        }

        Ok(())
    }

    fn not_found(number: AccountNumber) -> BankError {
        BankError::AccountNotFound { number }
    }

    /// Records a rejection and emits it
    fn reject(state: &mut BankState, error: BankError) -> SmallVec<[Effect<BankAction>; 4]> {
        warn!(%error, "command rejected");
        let event = BankAction::Rejected { error };
        Self::apply_event(state, &event);
        smallvec![Effect::Emit(event)]
    }

    /// Applies an event to state
    fn apply_event(state: &mut BankState, action: &BankAction) {
        match action {
            BankAction::AccountOpened {
                number,
                owner,
                kind,
                initial_balance,
                limit,
                opened_at,
            } => {
                if !state.exists(number) {
                    let core =
                        AccountCore::new(number.clone(), owner.clone(), *initial_balance, *opened_at);
                    let account = match kind {
                        AccountKind::Savings => {
                            BankAccount::from(SavingsAccount::new(core, *limit))
                        }
                        AccountKind::Current => {
                            BankAccount::from(CurrentAccount::new(core, *limit))
                        }
                    };
                    state.insert(account);
                }
                state.last_error = None;
            }
            BankAction::MoneyDeposited {
                number, balance, ..
            }
            | BankAction::MoneyWithdrawn {
                number, balance, ..
            } => {
                if let Some(account) = state.get_mut(number) {
                    account.core_mut().update_balance(*balance);
                }
                state.last_error = None;
            }
            BankAction::BalanceReported { .. } => {
                state.last_error = None;
            }
            BankAction::Rejected { error } => {
                state.last_error = Some(error.clone());
            }
            // Commands are not applied to state
            BankAction::OpenAccount { .. }
            | BankAction::Deposit { .. }
            | BankAction::Withdraw { .. }
            | BankAction::CheckBalance { .. }
            | BankAction::Exit => {}
        }
    }

    fn withdraw(
        state: &mut BankState,
        number: AccountNumber,
        amount: Money,
    ) -> SmallVec<[Effect<BankAction>; 4]> {
        let Some(account) = state.get_mut(&number) else {
            return Self::reject(state, Self::not_found(number));
        };

        match account.withdraw(amount) {
            Ok(balance) => {
                debug!(%number, %amount, %balance, "money withdrawn");
                let event = BankAction::MoneyWithdrawn {
                    number,
                    amount,
                    balance,
                };
                state.last_error = None;
                smallvec![Effect::Emit(event)]
            }
            Err(error) => Self::reject(state, error.into()),
        }
    }

    fn deposit(
        state: &mut BankState,
        number: AccountNumber,
        amount: Money,
    ) -> SmallVec<[Effect<BankAction>; 4]> {
        let Some(account) = state.get_mut(&number) else {
            return Self::reject(state, Self::not_found(number));
        };

        match account.deposit(amount) {
            Ok(balance) => {
                debug!(%number, %amount, %balance, "money deposited");
                let event = BankAction::MoneyDeposited {
                    number,
                    amount,
                    balance,
                };
                state.last_error = None;
                smallvec![Effect::Emit(event)]
            }
            Err(error) => Self::reject(state, error.into()),
        }
    }
}

impl Reducer for BankReducer {
    type State = BankState;
    type Action = BankAction;
    type Environment = BankEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BankAction::OpenAccount {
                number,
                owner,
                kind,
                initial_balance,
            } => {
                if let Err(error) = Self::validate_open_account(state, &number, &owner) {
                    return Self::reject(state, error);
                }

                info!(%number, %kind, %initial_balance, "account opened");
                let event = BankAction::AccountOpened {
                    number,
                    owner: owner.trim().to_string(),
                    kind,
                    initial_balance,
                    limit: env.defaults.limit_for(kind),
                    opened_at: env.clock.now(),
                };

                Self::apply_event(state, &event);
                smallvec![Effect::Emit(event)]
            }

            BankAction::Deposit { number, amount } => Self::deposit(state, number, amount),

            BankAction::Withdraw { number, amount } => Self::withdraw(state, number, amount),

            BankAction::CheckBalance { number } => match state.balance(&number) {
                Some(balance) => {
                    let event = BankAction::BalanceReported { number, balance };
                    Self::apply_event(state, &event);
                    smallvec![Effect::Emit(event)]
                }
                None => Self::reject(state, Self::not_found(number)),
            },

            BankAction::Exit => {
                debug!(accounts = state.count(), "exit requested");
                smallvec![Effect::Halt]
            }

            // ========== Events ==========
            BankAction::AccountOpened { .. }
            | BankAction::MoneyDeposited { .. }
            | BankAction::MoneyWithdrawn { .. }
            | BankAction::BalanceReported { .. }
            | BankAction::Rejected { .. } => {
                // Events are applied (for replay or external events)
                Self::apply_event(state, &action);
                SmallVec::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::account::AccountError;
    use bankdesk_testing::{assertions, test_clock, ReducerTest};

    fn create_test_env() -> BankEnvironment {
        BankEnvironment::new(Arc::new(test_clock()))
    }

    fn open(number: &str, kind: AccountKind, initial_balance: i64) -> BankAction {
        BankAction::OpenAccount {
            number: AccountNumber::new(number),
            owner: "Alice".to_string(),
            kind,
            initial_balance: Money::from_major(initial_balance),
        }
    }

    fn withdraw(number: &str, amount: i64) -> BankAction {
        BankAction::Withdraw {
            number: AccountNumber::new(number),
            amount: Money::from_major(amount),
        }
    }

    #[test]
    fn test_open_account_success() {
        let number = AccountNumber::new("S-1");

        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .when_action(open("S-1", AccountKind::Savings, 1000))
            .then_state(move |state| {
                assert_eq!(state.count(), 1);
                let Some(account) = state.get(&number) else {
                    panic!("account was not opened");
                };
                assert_eq!(account.owner(), "Alice");
                assert_eq!(account.kind(), AccountKind::Savings);
                assert_eq!(account.balance(), Money::from_major(1000));
                assert_eq!(account.opened_at(), test_clock().now());
                let BankAccount::Savings(savings) = account else {
                    panic!("expected a savings account");
                };
                assert_eq!(savings.min_balance(), Money::from_major(500));
            })
            .then_effects(|effects| {
                assert!(matches!(
                    assertions::single_emitted(effects),
                    BankAction::AccountOpened {
                        kind: AccountKind::Savings,
                        ..
                    }
                ));
            })
            .run();
    }

    #[test]
    fn test_open_uses_configured_defaults() {
        let env = create_test_env().with_defaults(AccountDefaults {
            min_balance: Money::from_major(10),
            overdraft_limit: Money::from_major(250),
        });

        ReducerTest::new(BankReducer::new())
            .with_env(env)
            .given_state(BankState::new())
            .when_action(open("C-1", AccountKind::Current, 0))
            .then_state(|state| {
                let Some(BankAccount::Current(account)) = state.get(&AccountNumber::new("C-1"))
                else {
                    panic!("expected a current account");
                };
                assert_eq!(account.overdraft_limit(), Money::from_major(250));
            })
            .run();
    }

    #[test]
    fn test_open_account_duplicate() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![open("S-1", AccountKind::Savings, 50)])
            .when_action(open("S-1", AccountKind::Current, 100))
            .then_state(|state| {
                assert_eq!(state.count(), 1); // Still only one account
                assert_eq!(
                    state.balance(&AccountNumber::new("S-1")),
                    Some(Money::from_major(50))
                );
                assert!(matches!(
                    state.last_error,
                    Some(BankError::DuplicateAccount { .. })
                ));
            })
            .run();
    }

    #[test]
    fn test_open_account_blank_fields() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .when_action(open("   ", AccountKind::Savings, 0))
            .then_state(|state| {
                assert_eq!(state.count(), 0);
                assert_eq!(state.last_error, Some(BankError::BlankAccountNumber));
            })
            .run();

        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .when_action(BankAction::OpenAccount {
                number: AccountNumber::new("S-9"),
                owner: "  ".to_string(),
                kind: AccountKind::Savings,
                initial_balance: Money::ZERO,
            })
            .then_state(|state| {
                assert_eq!(state.count(), 0);
                assert_eq!(state.last_error, Some(BankError::BlankOwner));
            })
            .run();
    }

    #[test]
    fn test_savings_withdraw_within_floor() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![open("S-1", AccountKind::Savings, 1000)])
            .when_action(withdraw("S-1", 400))
            .then_state(|state| {
                assert_eq!(
                    state.balance(&AccountNumber::new("S-1")),
                    Some(Money::from_major(600))
                );
                assert!(state.last_error.is_none());
            })
            .then_effects(|effects| {
                assert_eq!(
                    assertions::single_emitted(effects),
                    &BankAction::MoneyWithdrawn {
                        number: AccountNumber::new("S-1"),
                        amount: Money::from_major(400),
                        balance: Money::from_major(600),
                    }
                );
            })
            .run();
    }

    #[test]
    fn test_savings_withdraw_below_floor() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![
                open("S-1", AccountKind::Savings, 1000),
                withdraw("S-1", 400),
            ])
            .when_action(withdraw("S-1", 600))
            .then_state(|state| {
                // Balance unchanged
                assert_eq!(
                    state.balance(&AccountNumber::new("S-1")),
                    Some(Money::from_major(600))
                );
                assert!(matches!(
                    state.last_error,
                    Some(BankError::Account(AccountError::MinimumBalance { .. }))
                ));
            })
            .then_effects(|effects| {
                assert!(matches!(
                    assertions::single_emitted(effects),
                    BankAction::Rejected { .. }
                ));
            })
            .run();
    }

    #[test]
    fn test_current_withdraw_into_overdraft_then_past_limit() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![
                open("C-1", AccountKind::Current, 200),
                withdraw("C-1", 900),
            ])
            .when_action(withdraw("C-1", 400))
            .then_state(|state| {
                assert_eq!(
                    state.balance(&AccountNumber::new("C-1")),
                    Some(Money::from_major(-700))
                );
                assert!(matches!(
                    state.last_error,
                    Some(BankError::Account(AccountError::OverdraftLimit { .. }))
                ));
            })
            .run();
    }

    #[test]
    fn test_deposit_success_and_invalid() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![open("S-1", AccountKind::Savings, 100)])
            .when_action(BankAction::Deposit {
                number: AccountNumber::new("S-1"),
                amount: Money::from_major(50),
            })
            .then_state(|state| {
                assert_eq!(
                    state.balance(&AccountNumber::new("S-1")),
                    Some(Money::from_major(150))
                );
            })
            .run();

        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![open("S-1", AccountKind::Savings, 100)])
            .when_action(BankAction::Deposit {
                number: AccountNumber::new("S-1"),
                amount: Money::from_major(-50),
            })
            .then_state(|state| {
                assert_eq!(
                    state.balance(&AccountNumber::new("S-1")),
                    Some(Money::from_major(100))
                );
                assert!(matches!(
                    state.last_error,
                    Some(BankError::Account(AccountError::InvalidDeposit { .. }))
                ));
            })
            .run();
    }

    #[test]
    fn test_unknown_account_is_reported() {
        for action in [
            withdraw("nope", 1),
            BankAction::Deposit {
                number: AccountNumber::new("nope"),
                amount: Money::from_major(1),
            },
            BankAction::CheckBalance {
                number: AccountNumber::new("nope"),
            },
        ] {
            ReducerTest::new(BankReducer::new())
                .with_env(create_test_env())
                .given_state(BankState::new())
                .when_action(action)
                .then_state(|state| {
                    assert_eq!(state.count(), 0);
                    assert_eq!(
                        state.last_error,
                        Some(BankError::AccountNotFound {
                            number: AccountNumber::new("nope")
                        })
                    );
                })
                .run();
        }
    }

    #[test]
    fn test_check_balance_reports_and_clears_error() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![
                open("S-1", AccountKind::Savings, 700),
                withdraw("S-1", 700),
            ])
            .when_action(BankAction::CheckBalance {
                number: AccountNumber::new("S-1"),
            })
            .then_state(|state| assert!(state.last_error.is_none()))
            .then_effects(|effects| {
                assert_eq!(
                    assertions::single_emitted(effects),
                    &BankAction::BalanceReported {
                        number: AccountNumber::new("S-1"),
                        balance: Money::from_major(700),
                    }
                );
            })
            .run();
    }

    #[test]
    fn test_exit_halts() {
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .when_action(BankAction::Exit)
            .then_effects(assertions::assert_halts)
            .run();
    }

    #[test]
    fn test_events_replay_into_state() {
        let number = AccountNumber::new("C-7");

        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![BankAction::AccountOpened {
                number: number.clone(),
                owner: "Bob".to_string(),
                kind: AccountKind::Current,
                initial_balance: Money::from_major(10),
                limit: Money::from_major(100),
                opened_at: test_clock().now(),
            }])
            .when_action(BankAction::MoneyWithdrawn {
                number: number.clone(),
                amount: Money::from_major(60),
                balance: Money::from_major(-50),
            })
            .then_state(move |state| {
                assert_eq!(state.balance(&number), Some(Money::from_major(-50)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_replayed_negative_limits_are_clamped() {
        let opened = |number: &str, kind| BankAction::AccountOpened {
            number: AccountNumber::new(number),
            owner: "Eve".to_string(),
            kind,
            initial_balance: Money::from_major(100),
            limit: Money::from_major(-500),
            opened_at: test_clock().now(),
        };

        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![opened("S-1", AccountKind::Savings)])
            .when_action(opened("C-1", AccountKind::Current))
            .then_state(|state| {
                let Some(BankAccount::Savings(savings)) = state.get(&AccountNumber::new("S-1"))
                else {
                    panic!("expected a savings account");
                };
                assert_eq!(savings.min_balance(), Money::ZERO);
                let Some(BankAccount::Current(current)) = state.get(&AccountNumber::new("C-1"))
                else {
                    panic!("expected a current account");
                };
                assert_eq!(current.overdraft_limit(), Money::ZERO);
            })
            .run();

        // An overdraft of zero still refuses going below zero
        ReducerTest::new(BankReducer::new())
            .with_env(create_test_env())
            .given_state(BankState::new())
            .given_actions(vec![opened("C-1", AccountKind::Current)])
            .when_action(withdraw("C-1", 101))
            .then_state(|state| {
                assert_eq!(
                    state.balance(&AccountNumber::new("C-1")),
                    Some(Money::from_major(100))
                );
                assert!(matches!(
                    state.last_error,
                    Some(BankError::Account(AccountError::OverdraftLimit { .. }))
                ));
            })
            .run();
    }
}
