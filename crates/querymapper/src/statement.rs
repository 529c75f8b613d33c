//! Mutable statement state accumulated by the fluent builder.
//!
//! `Statement` is pure data: ordered SQL text fragments plus the positional
//! bindings that line up with the `?` placeholders across them. No
//! validation happens here; legality of the fragment order is the builder's
//! concern, and a binding/placeholder mismatch surfaces as a backend error
//! at execution time.

use crate::value::Value;

/// What a finished statement does, fixed by the verb starter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

/// Accumulated state for one in-flight statement.
#[derive(Clone, Debug, Default)]
pub struct Statement {
    table: Option<String>,
    index_column: Option<String>,
    index_value: Option<String>,
    operation: Option<Operation>,
    fragments: Vec<String>,
    bindings: Vec<Value>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = Some(table.into());
    }

    pub fn clear_table(&mut self) {
        self.table = None;
    }

    pub fn index_column(&self) -> Option<&str> {
        self.index_column.as_deref()
    }

    pub fn set_index_column(&mut self, column: impl Into<String>) {
        self.index_column = Some(column.into());
    }

    pub fn clear_index_column(&mut self) {
        self.index_column = None;
    }

    pub fn index_value(&self) -> Option<&str> {
        self.index_value.as_deref()
    }

    pub fn set_index_value(&mut self, value: impl Into<String>) {
        self.index_value = Some(value.into());
    }

    pub fn clear_index_value(&mut self) {
        self.index_value = None;
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = Some(operation);
    }

    pub fn clear_operation(&mut self) {
        self.operation = None;
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn set_fragments(&mut self, fragments: Vec<String>) {
        self.fragments = fragments;
    }

    pub fn push_fragment(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    pub fn clear_fragments(&mut self) {
        self.fragments.clear();
    }

    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: Vec<Value>) {
        self.bindings = bindings;
    }

    pub fn push_binding(&mut self, binding: impl Into<Value>) {
        self.bindings.push(binding.into());
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Empty fragments and bindings. Every verb starter runs this first.
    pub fn clear_statement(&mut self) {
        self.clear_fragments();
        self.clear_bindings();
    }

    /// Clear every field, abandoning the chain entirely.
    pub fn reset_all(&mut self) {
        self.clear_table();
        self.clear_index_column();
        self.clear_index_value();
        self.clear_operation();
        self.clear_statement();
    }

    /// The execution form: fragments joined with a single space.
    pub fn sql(&self) -> String {
        self.fragments.join(" ")
    }

    /// The log form: fragments joined with no separator.
    pub fn sql_compact(&self) -> String {
        self.fragments.concat()
    }

    /// The log form of the bindings, joined with no separator.
    pub fn bindings_compact(&self) -> String {
        self.bindings.iter().map(ToString::to_string).collect()
    }

    /// Whether any fragment contains the given text. Used by the builder to
    /// decide between starting a clause and continuing one.
    pub fn has_fragment_containing(&self, needle: &str) -> bool {
        self.fragments.iter().any(|fragment| fragment.contains(needle))
    }
}
