//! Table model for the SDK

use super::column::Column;
use serde::{Deserialize, Serialize};

/// A table and its columns in declaration order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    /// Table name without quote delimiters
    pub name: String,
    /// Columns in the order they were declared
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Insert `table` into `tables`, replacing the column list of an existing
/// table with the same name in place.
///
/// Returns `true` when an earlier declaration was overwritten.
pub(crate) fn upsert_table(tables: &mut Vec<Table>, table: Table) -> bool {
    match tables.iter_mut().find(|t| t.name == table.name) {
        Some(existing) => {
            existing.columns = table.columns;
            true
        }
        None => {
            tables.push(table);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_keeps_first_position() {
        let mut tables = vec![
            Table::new("Sales", vec![Column::new("Amount")]),
            Table::new("Customer", vec![Column::new("Key")]),
        ];

        let replaced = upsert_table(
            &mut tables,
            Table::new("Sales", vec![Column::new("Qty"), Column::new("Price")]),
        );

        assert!(replaced);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "Sales");
        assert_eq!(tables[0].column_names().collect::<Vec<_>>(), ["Qty", "Price"]);
    }

    #[test]
    fn test_column_lookup() {
        let table = Table::new("Sales", vec![Column::new("Amount"), Column::calculated("Margin")]);
        assert!(table.has_column("Margin"));
        assert!(table.column("Margin").is_some_and(|c| c.calculated));
        assert!(!table.has_column("margin"));
    }
}
