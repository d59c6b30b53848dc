//! Smart legal contract templates.
//!
//! A template bundles a clause text grammar, a typed data model, and the
//! rules a contract executes under. Templates travel as base64 archives;
//! a [`Clause`] binds one to concrete data, either by parsing clause text
//! against the grammar or by attaching already-structured data directly.

pub mod archive;
pub mod clause;
pub mod error;
pub mod grammar;
pub mod logic;
pub mod model;

pub use archive::{Manifest, Template};
pub use clause::Clause;
pub use error::{Result, TemplateError};
pub use grammar::Grammar;
pub use logic::{EmitSpec, Op, Operand, Respond, Rule, UpdateStep};
pub use model::{ClassDef, FieldType, Model, Serializer, CLASS_FIELD};
