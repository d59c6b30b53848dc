//! Key naming for the three ledger records of a contract instance and
//! the per-transaction event key.

pub fn template_key(contract_id: &str) -> String {
    format!("{contract_id}-Template")
}

pub fn data_key(contract_id: &str) -> String {
    format!("{contract_id}-Data")
}

pub fn state_key(contract_id: &str) -> String {
    format!("{contract_id}-State")
}

pub fn events_key(contract_id: &str, transaction_id: &str) -> String {
    format!("{contract_id}-{transaction_id}-Events")
}
