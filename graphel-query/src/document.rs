//! Structured GraphQL document model and serializer.
//!
//! The builder assembles a [`Document`] -- operation kind, variable
//! declarations, and a field tree -- and renders it through one serializer
//! instead of concatenating string templates. Variable naming stays explicit
//! on the declarations rather than being implied by position, so combining
//! several sub-builders into one document cannot produce colliding names.
//!
//! ```rust
//! use graphel_query::document::{ArgValue, Document, Field, OperationKind, VariableDef};
//!
//! let mut doc = Document::new(OperationKind::Query);
//! doc.declare(VariableDef::new("where_0", "users_bool_exp"));
//! doc.push(
//!     Field::new("users")
//!         .arg("where", ArgValue::variable("where_0"))
//!         .columns("id, name"),
//! );
//!
//! assert_eq!(
//!     doc.render(),
//!     "query ($where_0: users_bool_exp) {\n  users(where: $where_0) { id, name }\n}",
//! );
//! ```

use std::fmt::Write;

/// The GraphQL operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// A read-only query.
    Query,
    /// A mutation.
    Mutation,
}

impl OperationKind {
    /// The document keyword for this operation.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// A variable declaration in the operation signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDef {
    /// The variable name, without the leading `$`.
    pub name: String,
    /// The GraphQL type, including any `!` or list markers.
    pub gql_type: String,
}

impl VariableDef {
    /// Declare a variable.
    pub fn new(name: impl Into<String>, gql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gql_type: gql_type.into(),
        }
    }
}

/// An argument value: a variable reference, a bare enum literal, or an
/// object literal built from further argument values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// A reference to a declared variable, rendered as `$name`.
    Variable(String),
    /// A bare literal rendered as-is, e.g. a `distinct_on` column enum.
    Raw(String),
    /// An object literal, e.g. `pk_columns` or `on_conflict`.
    Object(Vec<(String, ArgValue)>),
}

impl ArgValue {
    /// A variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// A bare enum literal.
    pub fn raw(literal: impl Into<String>) -> Self {
        Self::Raw(literal.into())
    }

    fn render(&self, out: &mut String) {
        match self {
            Self::Variable(name) => {
                out.push('$');
                out.push_str(name);
            }
            Self::Raw(literal) => out.push_str(literal),
            Self::Object(entries) => {
                out.push_str("{ ");
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    value.render(out);
                }
                out.push_str(" }");
            }
        }
    }
}

/// A named argument on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// The argument name.
    pub name: String,
    /// The argument value.
    pub value: ArgValue,
}

/// The body of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A scalar leaf with no sub-selection.
    Scalar,
    /// A caller-supplied column selection, inlined as-is.
    Columns(String),
    /// A nested field tree.
    Fields(Vec<Field>),
}

/// A field in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Optional response alias.
    pub alias: Option<String>,
    /// The field name.
    pub name: String,
    /// Arguments, rendered in insertion order.
    pub arguments: Vec<Argument>,
    /// The field body.
    pub selection: Selection,
}

impl Field {
    /// A scalar field with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            selection: Selection::Scalar,
        }
    }

    /// Set the response alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append an argument.
    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }

    /// Set a raw column selection as the body.
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.selection = Selection::Columns(columns.into());
        self
    }

    /// Set a nested field tree as the body.
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.selection = Selection::Fields(fields);
        self
    }

    fn render(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        if let Some(alias) = &self.alias {
            if alias != &self.name {
                out.push_str(alias);
                out.push_str(": ");
            }
        }
        out.push_str(&self.name);
        if !self.arguments.is_empty() {
            out.push('(');
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&argument.name);
                out.push_str(": ");
                argument.value.render(out);
            }
            out.push(')');
        }
        match &self.selection {
            Selection::Scalar => out.push('\n'),
            Selection::Columns(columns) => {
                out.push_str(" { ");
                push_collapsed(out, columns);
                out.push_str(" }\n");
            }
            Selection::Fields(fields) => {
                out.push_str(" {\n");
                for field in fields {
                    field.render(out, depth + 1);
                }
                for _ in 0..depth {
                    out.push_str("  ");
                }
                out.push_str("}\n");
            }
        }
    }
}

/// Collapse runs of whitespace so multi-line selections render on one line.
fn push_collapsed(out: &mut String, text: &str) {
    let mut first = true;
    for word in text.split_whitespace() {
        if !first {
            out.push(' ');
        }
        out.push_str(word);
        first = false;
    }
}

/// A complete GraphQL operation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The operation kind.
    pub kind: OperationKind,
    /// Declared variables, in declaration order.
    pub variables: Vec<VariableDef>,
    /// Top-level fields.
    pub fields: Vec<Field>,
}

impl Document {
    /// Create an empty document of the given kind.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            variables: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare a variable.
    pub fn declare(&mut self, variable: VariableDef) -> &mut Self {
        self.variables.push(variable);
        self
    }

    /// Append a top-level field.
    pub fn push(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Render the document as GraphQL text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str(self.kind.keyword());
        if !self.variables.is_empty() {
            out.push_str(" (");
            for (i, variable) in self.variables.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "${}: {}", variable.name, variable.gql_type);
            }
            out.push(')');
        }
        out.push_str(" {\n");
        for field in &self.fields {
            field.render(&mut out, 1);
        }
        out.push('}');
        out
    }
}
