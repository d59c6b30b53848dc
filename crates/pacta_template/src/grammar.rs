//! Clause text grammar: template text with `{{variable}}` markers,
//! compiled to alternating literal/variable segments.
//!
//! Parsing matches the literal runs exactly and captures the spans in
//! between as variable values, converted per the data class field types.

use crate::error::{Result, TemplateError};
use crate::model::{ClassDef, FieldType};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone)]
pub struct Grammar {
    segments: Vec<Segment>,
}

impl Grammar {
    /// Compile template text. Two variables may not be adjacent: the
    /// capture boundary between them would be ambiguous.
    pub fn compile(text: &str) -> Result<Grammar> {
        let mut segments = Vec::new();
        let mut rest = text;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| TemplateError::Grammar("unterminated '{{' marker".into()))?;
            let name = after[..close].trim();
            if name.is_empty() {
                return Err(TemplateError::Grammar("empty variable marker".into()));
            }
            if let Some(Segment::Variable(prev)) = segments.last() {
                return Err(TemplateError::Grammar(format!(
                    "variables '{prev}' and '{name}' are adjacent; a literal must separate them"
                )));
            }
            segments.push(Segment::Variable(name.to_string()));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        if segments.is_empty() {
            return Err(TemplateError::Grammar("template text is empty".into()));
        }
        Ok(Grammar { segments })
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Parse clause text, returning the captured variable fields
    /// (without the `$class` tag) typed per `def`.
    pub fn parse(&self, text: &str, def: &ClassDef) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        let mut cursor = 0usize;
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(lit) => {
                    if !text[cursor..].starts_with(lit.as_str()) {
                        return Err(TemplateError::Parse {
                            at: cursor,
                            expected: format!("'{}'", snippet(lit)),
                        });
                    }
                    cursor += lit.len();
                }
                Segment::Variable(name) => {
                    let raw = match self.segments.get(i + 1) {
                        Some(Segment::Literal(next)) => {
                            let pos = text[cursor..].find(next.as_str()).ok_or_else(|| {
                                TemplateError::Parse {
                                    at: cursor,
                                    expected: format!("'{}' after variable '{name}'", snippet(next)),
                                }
                            })?;
                            &text[cursor..cursor + pos]
                        }
                        // Compile rejects adjacent variables, so the only
                        // other case is the variable ending the text.
                        _ => &text[cursor..],
                    };
                    let ty = def.get(name).ok_or_else(|| {
                        TemplateError::Model(format!(
                            "grammar variable '{name}' is not a data class field"
                        ))
                    })?;
                    out.insert(name.clone(), convert(name, raw, *ty)?);
                    cursor += raw.len();
                }
            }
        }
        if cursor != text.len() {
            return Err(TemplateError::Parse {
                at: cursor,
                expected: "end of clause text".into(),
            });
        }
        Ok(out)
    }
}

fn convert(field: &str, raw: &str, ty: FieldType) -> Result<Value> {
    let fail = || TemplateError::Convert {
        field: field.to_string(),
        ty: ty.name(),
        raw: raw.to_string(),
    };
    match ty {
        FieldType::String => Ok(Value::String(raw.to_string())),
        FieldType::Long => raw.parse::<i64>().map(Value::from).map_err(|_| fail()),
        FieldType::Double => {
            let f = raw.parse::<f64>().map_err(|_| fail())?;
            if !f.is_finite() {
                return Err(fail());
            }
            Ok(Value::from(f))
        }
        FieldType::Boolean => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },
    }
}

fn snippet(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(24)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}
