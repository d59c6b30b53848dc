//! Execute: load the three contract records, run the engine once, persist
//! the successor state, and publish any emitted events.

use crate::error::{ChaincodeError, Result};
use pacta_engine::Engine;
use pacta_ledger::{keys, Ledger};
use pacta_template::{Clause, Template};
use serde_json::Value;
use tracing::info;

/// Execute a deployed contract from positional arguments
/// `[contractId, requestJSON]`. Returns the engine response, serialized.
///
/// The `C-State` write happens only after the engine call succeeds, so an
/// engine failure leaves prior state untouched. A non-empty emit list is
/// published as a single event keyed `C-{transactionId}-Events`.
pub async fn execute<L: Ledger + ?Sized>(ledger: &L, params: &[String]) -> Result<Vec<u8>> {
    if params.len() != 2 {
        return Err(ChaincodeError::ArgumentCount {
            op: "execute",
            expected: 2,
            got: params.len(),
        });
    }
    let contract_id = &params[0];
    let request_text = &params[1];

    let template_key = keys::template_key(contract_id);
    let archive = require(ledger, contract_id, &template_key).await?;
    let archive_b64 = String::from_utf8(archive).map_err(|e| ChaincodeError::Record {
        key: template_key.clone(),
        detail: e.to_string(),
    })?;
    let template = Template::from_archive(&archive_b64).map_err(ChaincodeError::TemplateDecode)?;
    info!(%contract_id, template = %template.identifier(), "executing contract");

    let data_key = keys::data_key(contract_id);
    let data = decode_record(&require(ledger, contract_id, &data_key).await?, &data_key)?;
    let mut clause = Clause::new(&template);
    clause.set_data(data);

    let state_key = keys::state_key(contract_id);
    let state = decode_record(&require(ledger, contract_id, &state_key).await?, &state_key)?;

    let request: Value = serde_json::from_str(request_text)
        .map_err(|e| ChaincodeError::BadRequest(format!("not valid JSON: {e}")))?;
    let transaction_id = request
        .get("transactionId")
        .and_then(Value::as_str)
        .ok_or_else(|| ChaincodeError::BadRequest("missing 'transactionId'".into()))?
        .to_string();

    let result = Engine::new().execute(&clause, &request, &state)?;
    info!(
        %contract_id,
        %transaction_id,
        response = %result.response,
        emitted = result.emit.len(),
        "engine execution complete"
    );

    ledger
        .put_state(&state_key, &serde_json::to_vec(&result.state)?)
        .await?;

    if !result.emit.is_empty() {
        ledger
            .set_event(
                &keys::events_key(contract_id, &transaction_id),
                &serde_json::to_vec(&result.emit)?,
            )
            .await?;
    }

    Ok(serde_json::to_vec(&result.response)?)
}

async fn require<L: Ledger + ?Sized>(
    ledger: &L,
    contract_id: &str,
    key: &str,
) -> Result<Vec<u8>> {
    ledger
        .get_state(key)
        .await?
        .ok_or_else(|| ChaincodeError::NotDeployed {
            contract_id: contract_id.to_string(),
            key: key.to_string(),
        })
}

fn decode_record(bytes: &[u8], key: &str) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| ChaincodeError::Record {
        key: key.to_string(),
        detail: e.to_string(),
    })
}
