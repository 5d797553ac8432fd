use super::{Backend, Row};
use crate::error::TextBoxError;
use crate::schema::{Dialect, Statement};

/// Wraps a backend and keeps every statement passed to `execute`, in order.
/// Queries are forwarded without being recorded.
pub struct Recorder<B> {
    inner: B,
    statements: Vec<Statement>,
}

impl<B: Backend> Recorder<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            statements: Vec::new(),
        }
    }

    /// Statements attempted so far, including one that failed.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

#[cfg(test)]
impl<B: Backend> Recorder<B> {
    pub fn take_statements(&mut self) -> Vec<Statement> {
        std::mem::take(&mut self.statements)
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: Backend> Backend for Recorder<B> {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), TextBoxError> {
        self.statements.push(statement.clone());
        self.inner.execute(statement)
    }

    fn fetch_row(
        &mut self,
        row_index: usize,
        query: &Statement,
    ) -> Result<Option<Row>, TextBoxError> {
        self.inner.fetch_row(row_index, query)
    }
}
