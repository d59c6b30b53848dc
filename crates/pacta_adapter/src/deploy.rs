//! Deploy: validate a template archive, bind a clause, and write the
//! three contract records.

use crate::error::{ChaincodeError, Result};
use pacta_ledger::{keys, Ledger};
use pacta_template::{Clause, Template, TemplateError};
use serde_json::Value;
use tracing::info;

/// Deploy a contract instance from positional arguments
/// `[contractId, templateArchiveBase64, clauseText, initialStateJSON]`.
///
/// Writes, in order: `C-Template`, then (after the clause text parses and
/// the initial state validates) `C-State` and `C-Data`. A failure between
/// the writes leaves the earlier records behind; there is no rollback at
/// this layer, transaction atomicity is the host's concern.
pub async fn deploy<L: Ledger + ?Sized>(ledger: &L, params: &[String]) -> Result<()> {
    if params.len() != 4 {
        return Err(ChaincodeError::ArgumentCount {
            op: "deploy",
            expected: 4,
            got: params.len(),
        });
    }
    let contract_id = &params[0];
    let archive_b64 = &params[1];
    let clause_text = &params[2];
    let state_text = &params[3];

    // the archive must load before anything is written
    let template = Template::from_archive(archive_b64).map_err(ChaincodeError::TemplateDecode)?;
    info!(%contract_id, template = %template.identifier(), "deploying contract");

    ledger
        .put_state(&keys::template_key(contract_id), archive_b64.as_bytes())
        .await?;

    let mut clause = Clause::new(&template);
    let data = clause
        .parse(clause_text)
        .map_err(ChaincodeError::ClauseParse)?;
    let data_bytes = serde_json::to_vec(data)?;

    let raw_state: Value = serde_json::from_str(state_text).map_err(|e| {
        ChaincodeError::StateSchema(TemplateError::Schema(format!("not valid JSON: {e}")))
    })?;
    let state = template
        .serializer()
        .validate(&raw_state, template.state_class())
        .map_err(ChaincodeError::StateSchema)?;
    ledger
        .put_state(&keys::state_key(contract_id), &serde_json::to_vec(&state)?)
        .await?;

    ledger
        .put_state(&keys::data_key(contract_id), &data_bytes)
        .await?;
    Ok(())
}
