//! Template archives: a base64-wrapped JSON manifest, validated on load.

use crate::error::{Result, TemplateError};
use crate::grammar::Grammar;
use crate::logic::Rule;
use crate::model::{Model, Serializer};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The raw archive contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    /// Clause text with `{{variable}}` markers.
    pub grammar: String,
    pub model: Model,
    #[serde(default)]
    pub logic: Vec<Rule>,
}

/// A loaded, validated template.
#[derive(Debug, Clone)]
pub struct Template {
    manifest: Manifest,
    grammar: Grammar,
}

impl Template {
    /// Decode a base64 archive and validate the template it carries.
    pub fn from_archive(archive_b64: &str) -> Result<Template> {
        let bytes = BASE64.decode(archive_b64.trim())?;
        let manifest: Manifest = serde_json::from_slice(&bytes)?;
        Self::from_manifest(manifest)
    }

    pub fn from_manifest(manifest: Manifest) -> Result<Template> {
        let grammar = Grammar::compile(&manifest.grammar)?;
        let template = Template { manifest, grammar };
        template.check()?;
        Ok(template)
    }

    /// Encode a manifest into the archive form served to Deploy.
    pub fn encode_archive(manifest: &Manifest) -> Result<String> {
        let bytes = serde_json::to_vec(manifest)?;
        Ok(BASE64.encode(bytes))
    }

    /// Well-formedness: data/state classes declared, grammar variables
    /// cover the data class exactly, every rule references declared
    /// classes and real state fields.
    fn check(&self) -> Result<()> {
        let model = &self.manifest.model;
        let data_def = model.class(&model.data)?;
        let state_def = model.class(&model.state)?;

        let vars: BTreeSet<&str> = self.grammar.variables().collect();
        let fields: BTreeSet<&str> = data_def.keys().map(String::as_str).collect();
        if vars != fields {
            return Err(TemplateError::Grammar(format!(
                "grammar variables {vars:?} do not match data class fields {fields:?}"
            )));
        }

        for rule in &self.manifest.logic {
            model.class(&rule.on)?;
            if let Some(respond) = &rule.respond {
                if let Some(class) = &respond.class {
                    model.class(class)?;
                }
            }
            for step in &rule.update {
                if !state_def.contains_key(&step.target) {
                    return Err(TemplateError::Model(format!(
                        "rule on '{}': update target '{}' is not a field of state class '{}'",
                        rule.on, step.target, model.state
                    )));
                }
            }
        }
        Ok(())
    }

    /// Diagnostic identifier, `name@version`.
    pub fn identifier(&self) -> String {
        format!("{}@{}", self.manifest.name, self.manifest.version)
    }

    pub fn model(&self) -> &Model {
        &self.manifest.model
    }

    pub fn serializer(&self) -> Serializer<'_> {
        Serializer::new(&self.manifest.model)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn logic(&self) -> &[Rule] {
        &self.manifest.logic
    }

    pub fn data_class(&self) -> &str {
        &self.manifest.model.data
    }

    pub fn state_class(&self) -> &str {
        &self.manifest.model.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> Manifest {
        serde_json::from_value(json!({
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
                    "io.pacta.late.PaymentResponse": { "total": "Long" }
                }
            },
            "logic": [
                {
                    "on": "io.pacta.late.PaymentRequest",
                    "update": [ {"target": "value", "op": "add", "source": {"path": "request.amount"}} ],
                    "respond": { "class": "io.pacta.late.PaymentResponse", "fields": {"total": {"path": "state.value"}} },
                    "emit": [ {"class": "io.pacta.late.PaymentObligation", "fields": {"amount": {"path": "request.amount"}}} ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn archive_roundtrip_and_identifier() {
        let b64 = Template::encode_archive(&manifest()).unwrap();
        let template = Template::from_archive(&b64).unwrap();
        assert_eq!(template.identifier(), "late-delivery-penalty@0.4.1");
        assert_eq!(template.state_class(), "io.pacta.late.PenaltyState");
        assert_eq!(template.logic().len(), 1);
    }

    #[test]
    fn from_archive_rejects_bad_base64() {
        let err = Template::from_archive("!!!not base64!!!").unwrap_err();
        assert!(matches!(err, TemplateError::Decode(_)), "{err}");
    }

    #[test]
    fn from_archive_rejects_bad_manifest_json() {
        let b64 = BASE64.encode(b"{not json}");
        let err = Template::from_archive(&b64).unwrap_err();
        assert!(matches!(err, TemplateError::Manifest(_)), "{err}");
    }

    #[test]
    fn check_rejects_grammar_model_mismatch() {
        let mut m = manifest();
        m.grammar = "Penalty is {{penaltyPercent}} percent.".into();
        let err = Template::from_manifest(m).unwrap_err();
        assert!(err.to_string().contains("do not match data class fields"), "{err}");
    }

    #[test]
    fn check_rejects_rule_on_undeclared_class() {
        let mut m = manifest();
        m.logic[0].on = "io.pacta.late.Missing".into();
        let err = Template::from_manifest(m).unwrap_err();
        assert!(err.to_string().contains("not declared"), "{err}");
    }

    #[test]
    fn check_rejects_update_target_outside_state() {
        let mut m = manifest();
        m.logic[0].update[0].target = "balance".into();
        let err = Template::from_manifest(m).unwrap_err();
        assert!(err.to_string().contains("not a field of state class"), "{err}");
    }
}
