//! Contract ledger adapter.
//!
//! Translates two ledger-transaction verbs into fixed sequences of reads
//! and writes against a key-value ledger, delegating all contract
//! semantics to the template and engine crates:
//!
//! ```text
//! Host runtime
//!   │  Invocation { fcn, params }
//!   ▼
//! invoke() ── deploySmartLegalContract ──▶ C-Template, C-Data, C-State
//!         └── executeSmartLegalContract ─▶ C-State', response, events
//! ```
//!
//! Per contract identifier `C`, three records live on the ledger:
//! `C-Template` (the archive, verbatim), `C-Data` (structured clause
//! data), and `C-State` (execution state). Only `C-State` is rewritten
//! after deployment. Events ride on `C-{transactionId}-Events`.
//!
//! The adapter performs no retries and no rollback: every error aborts
//! the invocation and surfaces to the host as a failed transaction. A
//! clause-parse failure during deploy leaves `C-Template` written with no
//! matching data/state records; Execute treats that partial state as "not
//! deployed" and names the missing record.

pub mod deploy;
pub mod dispatch;
pub mod error;
pub mod execute;

pub use deploy::deploy;
pub use dispatch::{invoke, Invocation, FN_DEPLOY, FN_EXECUTE, FN_INIT_LEDGER};
pub use error::{ChaincodeError, Result};
pub use execute::execute;
