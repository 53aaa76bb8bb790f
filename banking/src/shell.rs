//! Interactive menu over the bank reducer.
//!
//! The shell owns the [`BankState`], turns menu choices into commands,
//! and renders whatever the reducer emits. It works over any
//! `BufRead`/`Write` pair so sessions can be scripted in tests.

use crate::account::{AccountKind, AccountNumber};
use crate::money::{Money, ParseMoneyError};
use crate::reducer::{BankEnvironment, BankReducer};
use crate::types::{BankAction, BankError, BankState};
use bankdesk_core::{effect::Effect, reducer::Reducer};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

const MENU: &str = "\n==== Banking System Menu ====\n\
1. Create Savings Account\n\
2. Create Current Account\n\
3. Deposit Money\n\
4. Withdraw Money\n\
5. Check Balance\n\
6. Exit";

/// Shell failures. Only I/O can fail; every domain problem is rendered.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading input or writing output failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Whether the loop keeps going after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again
    Continue,
    /// Stop the loop
    Halt,
}

/// A menu entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// Open a savings account
    CreateSavings,
    /// Open a current account
    CreateCurrent,
    /// Deposit into an account
    Deposit,
    /// Withdraw from an account
    Withdraw,
    /// Show an account balance
    CheckBalance,
    /// Leave
    Exit,
}

impl MenuChoice {
    /// Parses the text typed at the menu prompt
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::CreateSavings),
            "2" => Some(Self::CreateCurrent),
            "3" => Some(Self::Deposit),
            "4" => Some(Self::Withdraw),
            "5" => Some(Self::CheckBalance),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Renders an emitted event as the line shown to the user
#[must_use]
pub fn render(event: &BankAction) -> Option<String> {
    match event {
        BankAction::AccountOpened { kind, .. } => Some(format!("{kind} Account Created!")),
        BankAction::MoneyDeposited {
            amount, balance, ..
        } => Some(format!("Deposited {amount}. New Balance = {balance}")),
        BankAction::MoneyWithdrawn {
            amount, balance, ..
        } => Some(format!("Withdrawn {amount}. New Balance = {balance}")),
        BankAction::BalanceReported { balance, .. } => Some(format!("Balance = {balance}")),
        BankAction::Rejected { error } => Some(error.to_string()),
        BankAction::OpenAccount { .. }
        | BankAction::Deposit { .. }
        | BankAction::Withdraw { .. }
        | BankAction::CheckBalance { .. }
        | BankAction::Exit => None,
    }
}

/// Menu loop owning the account registry
pub struct Shell<R, W> {
    input: R,
    output: W,
    state: BankState,
    reducer: BankReducer,
    env: BankEnvironment,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell with an empty registry
    pub fn new(input: R, output: W, env: BankEnvironment) -> Self {
        Self {
            input,
            output,
            state: BankState::new(),
            reducer: BankReducer::new(),
            env,
        }
    }

    /// The registry as it stands
    pub const fn state(&self) -> &BankState {
        &self.state
    }

    /// Consumes the shell, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until Exit or end of input
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if the terminal cannot be read or written.
    pub fn run(&mut self) -> Result<(), ShellError> {
        while self.step()? == Flow::Continue {}
        Ok(())
    }

    /// Shows the menu once and handles one choice
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if the terminal cannot be read or written.
    pub fn step(&mut self) -> Result<Flow, ShellError> {
        writeln!(self.output, "{MENU}")?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return self.dispatch(BankAction::Exit);
        };

        match MenuChoice::parse(&choice) {
            Some(MenuChoice::CreateSavings) => self.create(AccountKind::Savings),
            Some(MenuChoice::CreateCurrent) => self.create(AccountKind::Current),
            Some(MenuChoice::Deposit) => self.transact("Enter Deposit Amount: ", |number, amount| {
                BankAction::Deposit { number, amount }
            }),
            Some(MenuChoice::Withdraw) => {
                self.transact("Enter Withdrawal Amount: ", |number, amount| {
                    BankAction::Withdraw { number, amount }
                })
            }
            Some(MenuChoice::CheckBalance) => {
                let Some(number) = self.prompt("Enter Account Number: ")? else {
                    return self.dispatch(BankAction::Exit);
                };
                self.dispatch(BankAction::CheckBalance {
                    number: AccountNumber::new(number),
                })
            }
            Some(MenuChoice::Exit) => self.dispatch(BankAction::Exit),
            None => {
                debug!(%choice, "unknown menu choice");
                writeln!(self.output, "Invalid choice! Please try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn create(&mut self, kind: AccountKind) -> Result<Flow, ShellError> {
        let Some(number) = self.prompt("Enter Account Number: ")? else {
            return self.dispatch(BankAction::Exit);
        };
        let Some(owner) = self.prompt("Enter Account Holder Name: ")? else {
            return self.dispatch(BankAction::Exit);
        };
        let Some(initial) = self.prompt("Enter Initial Balance: ")? else {
            return self.dispatch(BankAction::Exit);
        };

        let initial_balance = if initial.is_empty() {
            Money::ZERO
        } else {
            match initial.parse() {
                Ok(amount) => amount,
                Err(error) => return self.invalid_amount(&error),
            }
        };

        self.dispatch(BankAction::OpenAccount {
            number: AccountNumber::new(number),
            owner,
            kind,
            initial_balance,
        })
    }

    /// Deposit and withdraw: look the account up before asking for an amount
    ///
    /// An unknown number is answered here without a command, so unlike
    /// Check Balance it leaves `last_error` untouched and logs at `debug`
    /// rather than as a reducer rejection.
    fn transact(
        &mut self,
        amount_prompt: &str,
        command: impl FnOnce(AccountNumber, Money) -> BankAction,
    ) -> Result<Flow, ShellError> {
        let Some(number) = self.prompt("Enter Account Number: ")? else {
            return self.dispatch(BankAction::Exit);
        };
        let number = AccountNumber::new(number);
        if !self.state.exists(&number) {
            debug!(%number, "account not found, amount not requested");
            writeln!(self.output, "{}", BankError::AccountNotFound { number })?;
            return Ok(Flow::Continue);
        }

        let Some(amount) = self.prompt(amount_prompt)? else {
            return self.dispatch(BankAction::Exit);
        };
        match amount.parse() {
            Ok(amount) => self.dispatch(command(number, amount)),
            Err(error) => self.invalid_amount(&error),
        }
    }

    fn invalid_amount(&mut self, error: &ParseMoneyError) -> Result<Flow, ShellError> {
        debug!(%error, "malformed amount");
        writeln!(self.output, "Invalid amount: {error}")?;
        Ok(Flow::Continue)
    }

    /// Sends a command through the reducer and carries out its effects
    fn dispatch(&mut self, action: BankAction) -> Result<Flow, ShellError> {
        let effects = self.reducer.reduce(&mut self.state, action, &self.env);

        let mut flow = Flow::Continue;
        for effect in effects {
            match effect {
                Effect::Emit(event) => {
                    if let Some(line) = render(&event) {
                        writeln!(self.output, "{line}")?;
                    }
                }
                Effect::Halt => {
                    writeln!(self.output, "Exiting Banking System. Goodbye!")?;
                    flow = Flow::Halt;
                }
                Effect::None => {}
            }
        }
        Ok(flow)
    }

    /// Writes a prompt and reads one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>, ShellError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
