//! Row batches exchanged with sources and downstream consumers

use crate::types::{Key, Value};

use super::errors::{SourceError, SourceResult};

/// A named column of values, aligned with a block's key column by row index
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a new column
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column values in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the column, returning its values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One batch of rows: a key column plus one value column per attribute
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    ids: Vec<Key>,
    columns: Vec<Column>,
}

impl Block {
    /// Creates a block, rejecting columns not aligned with the key column
    pub fn new(ids: Vec<Key>, columns: Vec<Column>) -> SourceResult<Self> {
        if let Some(column) = columns.iter().find(|c| c.len() != ids.len()) {
            return Err(SourceError::ColumnLengthMismatch {
                column: column.name().to_string(),
                expected: ids.len(),
                actual: column.len(),
            });
        }

        Ok(Self { ids, columns })
    }

    /// Returns the key column
    pub fn ids(&self) -> &[Key] {
        &self.ids
    }

    /// Returns the value columns in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the first column with the given name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns the number of rows
    pub fn rows(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_accepts_aligned_columns() {
        let block = Block::new(
            vec![1, 2],
            vec![Column::new("parent", vec![Value::UInt64(0), Value::UInt64(1)])],
        )
        .unwrap();

        assert_eq!(block.rows(), 2);
        assert_eq!(block.column("parent").unwrap().len(), 2);
        assert!(block.column("region").is_none());
    }

    #[test]
    fn test_block_rejects_misaligned_column() {
        let err = Block::new(
            vec![1, 2, 3],
            vec![Column::new("region", vec![Value::String("US".into())])],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SourceError::ColumnLengthMismatch {
                column: "region".into(),
                expected: 3,
                actual: 1,
            }
        );
    }
}
