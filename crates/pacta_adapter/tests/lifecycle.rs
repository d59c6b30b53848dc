//! Deploy/execute lifecycle over an in-memory ledger.

use pacta_adapter::{invoke, ChaincodeError, Invocation, FN_DEPLOY, FN_EXECUTE};
use pacta_ledger::{keys, MemLedger};
use pacta_template::{Manifest, Template};
use serde_json::{json, Value};

fn archive() -> String {
    let manifest: Manifest = serde_json::from_value(json!({
        "name": "late-delivery-penalty",
        "version": "0.4.1",
        "grammar": "Late delivery penalty is {{penaltyPercent}} percent per day, capped at {{capPercent}} percent.",
        "model": {
            "data": "io.pacta.late.PenaltyTerms",
            "state": "io.pacta.late.PenaltyState",
            "classes": {
                "io.pacta.late.PenaltyTerms": { "penaltyPercent": "Double", "capPercent": "Double" },
                "io.pacta.late.PenaltyState": { "value": "Long" },
                "io.pacta.late.PaymentRequest": { "transactionId": "String", "amount": "Long" },
                "io.pacta.late.PaymentResponse": { "total": "Long" },
                "io.pacta.late.NoOpRequest": { "transactionId": "String" }
            }
        },
        "logic": [
            {
                "on": "io.pacta.late.PaymentRequest",
                "update": [ {"target": "value", "op": "add", "source": {"path": "request.amount"}} ],
                "respond": {
                    "class": "io.pacta.late.PaymentResponse",
                    "fields": {"total": {"path": "state.value"}}
                },
                "emit": [
                    {"class": "io.pacta.late.PaymentObligation",
                     "fields": {"amount": {"path": "request.amount"}}}
                ]
            },
            { "on": "io.pacta.late.NoOpRequest" }
        ]
    }))
    .unwrap();
    Template::encode_archive(&manifest).unwrap()
}

const CLAUSE_TEXT: &str =
    "Late delivery penalty is 10.5 percent per day, capped at 55 percent.";

fn initial_state() -> String {
    json!({"$class": "io.pacta.late.PenaltyState", "value": 0}).to_string()
}

fn deploy_invocation(contract_id: &str) -> Invocation {
    Invocation {
        fcn: FN_DEPLOY.into(),
        params: vec![
            contract_id.into(),
            archive(),
            CLAUSE_TEXT.into(),
            initial_state(),
        ],
    }
}

fn execute_invocation(contract_id: &str, request: Value) -> Invocation {
    Invocation {
        fcn: FN_EXECUTE.into(),
        params: vec![contract_id.into(), request.to_string()],
    }
}

fn payment(transaction_id: &str, amount: i64) -> Value {
    json!({
        "$class": "io.pacta.late.PaymentRequest",
        "transactionId": transaction_id,
        "amount": amount
    })
}

fn stored_json(ledger: &MemLedger, key: &str) -> Value {
    serde_json::from_slice(&ledger.record(key).unwrap()).unwrap()
}

// ── deploy ───────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_writes_all_three_records() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();

    assert_eq!(ledger.record("C1-Template"), Some(archive().into_bytes()));
    assert_eq!(
        stored_json(&ledger, "C1-Data"),
        json!({
            "$class": "io.pacta.late.PenaltyTerms",
            "penaltyPercent": 10.5,
            "capPercent": 55.0
        })
    );
    assert_eq!(
        stored_json(&ledger, "C1-State"),
        json!({"$class": "io.pacta.late.PenaltyState", "value": 0})
    );
}

#[tokio::test]
async fn deploy_wrong_arg_count_performs_no_ledger_io() {
    let ledger = MemLedger::new();
    let invocation = Invocation {
        fcn: FN_DEPLOY.into(),
        params: vec!["C1".into(), archive()],
    };
    let err = invoke(&ledger, &invocation).await.unwrap_err();
    assert!(
        matches!(err, ChaincodeError::ArgumentCount { expected: 4, got: 2, .. }),
        "{err}"
    );
    assert_eq!(ledger.op_counts(), Default::default());
}

#[tokio::test]
async fn deploy_invalid_archive_writes_nothing() {
    let ledger = MemLedger::new();
    let mut invocation = deploy_invocation("C1");
    invocation.params[1] = "!!!not base64!!!".into();
    let err = invoke(&ledger, &invocation).await.unwrap_err();
    assert_eq!(err.code(), "template_decode");
    assert_eq!(ledger.op_counts(), Default::default());
}

#[tokio::test]
async fn deploy_unparseable_clause_leaves_partial_template_record() {
    // The template record is written before the clause text parses; a
    // parse failure aborts with no rollback. Execute must then report the
    // identifier as not deployed.
    let ledger = MemLedger::new();
    let mut invocation = deploy_invocation("C1");
    invocation.params[2] = "This is not the clause text.".into();
    let err = invoke(&ledger, &invocation).await.unwrap_err();
    assert_eq!(err.code(), "clause_parse");

    assert!(ledger.contains("C1-Template"));
    assert!(!ledger.contains("C1-Data"));
    assert!(!ledger.contains("C1-State"));
}

#[tokio::test]
async fn deploy_rejects_state_outside_schema() {
    let ledger = MemLedger::new();
    let mut invocation = deploy_invocation("C1");
    invocation.params[3] =
        json!({"$class": "io.pacta.late.PenaltyState", "value": "zero"}).to_string();
    let err = invoke(&ledger, &invocation).await.unwrap_err();
    assert_eq!(err.code(), "state_schema");
    assert!(!ledger.contains("C1-State"));
}

#[tokio::test]
async fn redeploy_overwrites_all_three_records() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    invoke(&ledger, &execute_invocation("C1", payment("t0", 7)))
        .await
        .unwrap();
    assert_eq!(stored_json(&ledger, "C1-State")["value"], json!(7));

    // second deployment wins wholesale, no merge with the advanced state
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    assert_eq!(stored_json(&ledger, "C1-State")["value"], json!(0));
    assert_eq!(ledger.record("C1-Template"), Some(archive().into_bytes()));
}

// ── execute ──────────────────────────────────────────────────────

#[tokio::test]
async fn execute_advances_state_and_returns_response_bytes() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();

    let payload = invoke(&ledger, &execute_invocation("C1", payment("t1", 5)))
        .await
        .unwrap();
    let response: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(
        response,
        json!({"$class": "io.pacta.late.PaymentResponse", "total": 5})
    );
    assert_eq!(
        stored_json(&ledger, "C1-State"),
        json!({"$class": "io.pacta.late.PenaltyState", "value": 5})
    );

    // a second payment accumulates on the persisted state
    let payload = invoke(&ledger, &execute_invocation("C1", payment("t2", 3)))
        .await
        .unwrap();
    let response: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(response["total"], json!(8));
}

#[tokio::test]
async fn execute_wrong_arg_count_performs_no_ledger_io() {
    let ledger = MemLedger::new();
    let invocation = Invocation {
        fcn: FN_EXECUTE.into(),
        params: vec!["C1".into()],
    };
    let err = invoke(&ledger, &invocation).await.unwrap_err();
    assert!(
        matches!(err, ChaincodeError::ArgumentCount { expected: 2, got: 1, .. }),
        "{err}"
    );
    assert_eq!(ledger.op_counts(), Default::default());
}

#[tokio::test]
async fn execute_never_deployed_names_the_template_record() {
    let ledger = MemLedger::new();
    let err = invoke(&ledger, &execute_invocation("C9", payment("t1", 1)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ChaincodeError::NotDeployed { ref key, .. } if key == "C9-Template"),
        "{err}"
    );
}

#[tokio::test]
async fn execute_partial_deploy_names_the_missing_record() {
    // Simulate the partial-deploy gap: only C-Template present.
    let ledger = MemLedger::new();
    let mut invocation = deploy_invocation("C1");
    invocation.params[2] = "garbage clause".into();
    invoke(&ledger, &invocation).await.unwrap_err();

    let err = invoke(&ledger, &execute_invocation("C1", payment("t1", 1)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ChaincodeError::NotDeployed { ref key, .. } if key == "C1-Data"),
        "{err}"
    );
    assert_eq!(err.code(), "not_deployed");
}

#[tokio::test]
async fn execute_emits_one_event_under_the_transaction_key() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    invoke(&ledger, &execute_invocation("C1", payment("t1", 5)))
        .await
        .unwrap();

    let events = ledger.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, keys::events_key("C1", "t1"));
    assert_eq!(
        events[0].payload,
        json!([{"$class": "io.pacta.late.PaymentObligation", "amount": 5}])
    );
}

#[tokio::test]
async fn execute_noop_request_emits_nothing_and_keeps_state() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();

    let request = json!({"$class": "io.pacta.late.NoOpRequest", "transactionId": "t1"});
    let payload = invoke(&ledger, &execute_invocation("C1", request))
        .await
        .unwrap();
    let response: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(response, json!({}));
    assert!(ledger.events().is_empty());
    assert_eq!(stored_json(&ledger, "C1-State")["value"], json!(0));
}

#[tokio::test]
async fn engine_failure_leaves_state_unmodified() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    let before = ledger.record("C1-State").unwrap();

    let request = json!({"$class": "io.pacta.late.Unmatched", "transactionId": "t1"});
    let err = invoke(&ledger, &execute_invocation("C1", request))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "engine_execution");
    assert_eq!(ledger.record("C1-State").unwrap(), before);
    assert!(ledger.events().is_empty());
}

#[tokio::test]
async fn corrupt_state_record_is_reported_with_its_key() {
    use pacta_ledger::Ledger;

    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    ledger.put_state("C1-State", b"{truncated").await.unwrap();

    let err = invoke(&ledger, &execute_invocation("C1", payment("t1", 1)))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ChaincodeError::Record { ref key, .. } if key == "C1-State"),
        "{err}"
    );
    assert_eq!(err.code(), "record_corrupt");
}

#[tokio::test]
async fn execute_requires_a_transaction_id() {
    let ledger = MemLedger::new();
    invoke(&ledger, &deploy_invocation("C1")).await.unwrap();
    let before = ledger.record("C1-State").unwrap();

    let request = json!({"$class": "io.pacta.late.PaymentRequest", "amount": 5});
    let err = invoke(&ledger, &execute_invocation("C1", request))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "bad_request");
    assert_eq!(ledger.record("C1-State").unwrap(), before);
}
