//! Invocation routing: an explicit allow-list match from function name to
//! handler, never a dynamic lookup.

use crate::deploy::deploy;
use crate::error::{ChaincodeError, Result};
use crate::execute::execute;
use pacta_ledger::Ledger;
use serde::Deserialize;
use tracing::info;

pub const FN_INIT_LEDGER: &str = "initLedger";
pub const FN_DEPLOY: &str = "deploySmartLegalContract";
pub const FN_EXECUTE: &str = "executeSmartLegalContract";

/// One host invocation: the selected function and its positional
/// string parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    pub fcn: String,
    #[serde(default)]
    pub params: Vec<String>,
}

/// Route one invocation to its handler. Success returns the response
/// payload (empty for deploy and initLedger); every failure surfaces as
/// the transaction's error.
pub async fn invoke<L: Ledger + ?Sized>(ledger: &L, invocation: &Invocation) -> Result<Vec<u8>> {
    match invocation.fcn.as_str() {
        FN_INIT_LEDGER => {
            info!("ledger initialized");
            Ok(Vec::new())
        }
        FN_DEPLOY => {
            deploy(ledger, &invocation.params).await?;
            Ok(Vec::new())
        }
        FN_EXECUTE => execute(ledger, &invocation.params).await,
        other => Err(ChaincodeError::UnknownFunction(other.to_string())),
    }
}
