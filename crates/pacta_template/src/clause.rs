//! A clause: a template bound to structured data.

use crate::archive::Template;
use crate::error::Result;
use crate::model::CLASS_FIELD;
use serde_json::{Map, Value};

pub struct Clause<'t> {
    template: &'t Template,
    data: Option<Value>,
}

impl<'t> Clause<'t> {
    pub fn new(template: &'t Template) -> Self {
        Self {
            template,
            data: None,
        }
    }

    /// Parse clause text against the template grammar, binding and
    /// returning the captured data.
    pub fn parse(&mut self, text: &str) -> Result<&Value> {
        let model = self.template.model();
        let def = model.class(&model.data)?;
        let fields = self.template.grammar().parse(text, def)?;
        let mut obj = Map::new();
        obj.insert(CLASS_FIELD.to_string(), Value::String(model.data.clone()));
        obj.extend(fields);
        Ok(self.data.insert(Value::Object(obj)))
    }

    /// Bind already-structured data directly, without re-parsing text.
    pub fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn template(&self) -> &'t Template {
        self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Manifest;
    use serde_json::json;

    fn template() -> Template {
        let manifest: Manifest = serde_json::from_value(json!({
            "name": "fixed-rate",
            "version": "0.1.0",
            "grammar": "The interest rate is {{rate}} percent, fixed: {{fixed}}.",
            "model": {
                "data": "test.RateTerms",
                "state": "test.RateState",
                "classes": {
                    "test.RateTerms": { "rate": "Double", "fixed": "Boolean" },
                    "test.RateState": { "value": "Long" }
                }
            }
        }))
        .unwrap();
        Template::from_manifest(manifest).unwrap()
    }

    #[test]
    fn parse_binds_class_tagged_data() {
        let t = template();
        let mut clause = Clause::new(&t);
        clause
            .parse("The interest rate is 2.5 percent, fixed: true.")
            .unwrap();
        let data = clause.data().unwrap();
        assert_eq!(data["$class"], json!("test.RateTerms"));
        assert_eq!(data["rate"], json!(2.5));
        assert_eq!(data["fixed"], json!(true));
        // bound data conforms to the data class
        t.serializer().validate(data, "test.RateTerms").unwrap();
    }

    #[test]
    fn parse_failure_leaves_clause_unbound() {
        let t = template();
        let mut clause = Clause::new(&t);
        assert!(clause.parse("Something else entirely").is_err());
        assert!(clause.data().is_none());
    }

    #[test]
    fn set_data_binds_directly() {
        let t = template();
        let mut clause = Clause::new(&t);
        let data = json!({"$class": "test.RateTerms", "rate": 1.0, "fixed": false});
        clause.set_data(data.clone());
        assert_eq!(clause.data(), Some(&data));
    }
}
