use colored::Colorize;
use pacta_template::{Manifest, Template};
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Read};

pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response, String> {
        let url = format!("{}{}", self.base, path);
        self.http
            .get(&url)
            .send()
            .map_err(|e| format!("request failed: {e}"))
    }

    fn post(&self, path: &str, body: &Value) -> Result<reqwest::blocking::Response, String> {
        let url = format!("{}{}", self.base, path);
        self.http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| format!("request failed: {e}"))
    }
}

fn read_input(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("read stdin: {e}"))?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|e| format!("read file: {e}"))
    }
}

fn check(resp: reqwest::blocking::Response) -> Result<Value, String> {
    let status = resp.status();
    let body: Value = resp.json().map_err(|e| format!("parse response: {e}"))?;
    if status.is_success() {
        Ok(body)
    } else {
        let detail = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        Err(format!("HTTP {}: {}", status.as_u16(), detail))
    }
}

/// Parse and validate a manifest, then encode it as a deployable archive.
fn encode(manifest_json: &str) -> Result<String, String> {
    let manifest: Manifest =
        serde_json::from_str(manifest_json).map_err(|e| format!("parse manifest: {e}"))?;
    Template::from_manifest(manifest.clone()).map_err(|e| format!("invalid template: {e}"))?;
    Template::encode_archive(&manifest).map_err(|e| format!("encode archive: {e}"))
}

// ── package ─────────────────────────────────────────────────────

pub fn package(manifest_path: &str) -> Result<(), String> {
    let content = read_input(manifest_path)?;
    println!("{}", encode(&content)?);
    Ok(())
}

// ── deploy ──────────────────────────────────────────────────────

pub fn deploy(
    client: &Client,
    contract_id: &str,
    manifest_path: &str,
    clause_path: &str,
    state_path: &str,
) -> Result<(), String> {
    let manifest = fs::read_to_string(manifest_path).map_err(|e| format!("read manifest: {e}"))?;
    let template_b64 = encode(&manifest)?;
    let clause_text = fs::read_to_string(clause_path).map_err(|e| format!("read clause: {e}"))?;
    let state_raw = read_input(state_path)?;
    let initial_state: Value =
        serde_json::from_str(&state_raw).map_err(|e| format!("parse state: {e}"))?;

    let body = json!({
        "contract_id": contract_id,
        "template_b64": template_b64,
        // editors append a trailing newline the grammar never contains
        "clause_text": clause_text.trim_end_matches('\n'),
        "initial_state": initial_state,
    });
    let r = check(client.post("/v1/deploy", &body)?)?;

    println!("{} {}", "Deployed:".dimmed(), contract_id.cyan());
    if let Some(url) = r.get("state_url").and_then(|u| u.as_str()) {
        println!("{} {}", "State:   ".dimmed(), url.dimmed());
    }
    Ok(())
}

// ── execute ─────────────────────────────────────────────────────

pub fn execute(client: &Client, contract_id: &str, request_path: &str) -> Result<(), String> {
    let request_raw = read_input(request_path)?;
    let request: Value =
        serde_json::from_str(&request_raw).map_err(|e| format!("parse request: {e}"))?;

    let body = json!({"contract_id": contract_id, "request": request});
    let response = check(client.post("/v1/execute", &body)?)?;

    println!("{}", "Response:".bold());
    println!(
        "{}",
        serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
    );
    Ok(())
}

// ── state ───────────────────────────────────────────────────────

pub fn state(client: &Client, contract_id: &str, record: &str) -> Result<(), String> {
    let suffix = match record {
        "template" => "Template",
        "data" => "Data",
        "state" => "State",
        other => return Err(format!("invalid record '{other}', expected template|data|state")),
    };
    let resp = client.get(&format!("/v1/state/{contract_id}-{suffix}"))?;
    let status = resp.status();
    let text = resp.text().map_err(|e| format!("read response: {e}"))?;
    if !status.is_success() {
        let detail = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| "unknown error".into());
        return Err(format!("HTTP {}: {}", status.as_u16(), detail));
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(v) => println!(
            "{}",
            serde_json::to_string_pretty(&v).unwrap_or_else(|_| text.clone())
        ),
        // the template record is base64 text, not JSON
        Err(_) => println!("{text}"),
    }
    Ok(())
}

// ── events ──────────────────────────────────────────────────────

pub fn events(client: &Client) -> Result<(), String> {
    let events = check(client.get("/v1/events")?)?;
    let list = events.as_array().cloned().unwrap_or_default();
    if list.is_empty() {
        println!("{}", "no events".dimmed());
        return Ok(());
    }
    for event in list {
        let name = event.get("name").and_then(|n| n.as_str()).unwrap_or("?");
        println!("{}", name.cyan());
        if let Some(payload) = event.get("payload") {
            println!(
                "{}",
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
            );
        }
    }
    Ok(())
}

// ── health ──────────────────────────────────────────────────────

pub fn health(client: &Client) -> Result<(), String> {
    let r = check(client.get("/healthz")?)?;
    if r.get("ok").and_then(|o| o.as_bool()).unwrap_or(false) {
        println!("{}", "peer is healthy".green());
        Ok(())
    } else {
        Err("peer reported unhealthy".into())
    }
}
