//! Matching catalog foreign keys against a working set of tables

use pt_core::{DependencyEdge, ForeignKey, TableName};

/// A foreign key as read from a catalog: `columns` of `schema.table`
/// reference `referenced_columns` of `referenced_schema.referenced_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
}

fn normalize(ident: &str) -> String {
    ident.replace('"', "").to_uppercase()
}

/// Whether `name` denotes `schema.table`. Unqualified names match in any schema.
fn denotes(name: &TableName, schema: &str, table: &str) -> bool {
    let (name_schema, name_table) = name.parts();
    normalize(name_table) == normalize(table)
        && name_schema.map_or(true, |s| normalize(s) == normalize(schema))
}

fn lookup<'a>(tables: &'a [TableName], schema: &str, table: &str) -> Option<&'a TableName> {
    tables.iter().find(|t| denotes(t, schema, table))
}

/// Keep the foreign keys whose both ends are in `tables`, with table names
/// spelled the way `tables` spells them.
pub fn keys_within(tables: &[TableName], refs: &[ForeignKeyRef]) -> Vec<ForeignKey> {
    let mut keys: Vec<ForeignKey> = Vec::new();
    for fk in refs {
        let child = lookup(tables, &fk.schema, &fk.table);
        let parent = lookup(tables, &fk.referenced_schema, &fk.referenced_table);
        if let (Some(child), Some(parent)) = (child, parent) {
            let key = ForeignKey {
                child: child.clone(),
                child_columns: fk.columns.clone(),
                parent: parent.clone(),
                parent_columns: fk.referenced_columns.clone(),
            };
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Table-level view of [`keys_within`], one edge per table pair.
pub fn edges_within(tables: &[TableName], refs: &[ForeignKeyRef]) -> Vec<DependencyEdge> {
    let mut edges: Vec<DependencyEdge> = Vec::new();
    for key in keys_within(tables, refs) {
        let edge = key.edge();
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk(schema: &str, table: &str, ref_schema: &str, ref_table: &str) -> ForeignKeyRef {
        ForeignKeyRef {
            schema: schema.to_string(),
            table: table.to_string(),
            columns: vec!["parent_id".to_string()],
            referenced_schema: ref_schema.to_string(),
            referenced_table: ref_table.to_string(),
            referenced_columns: vec!["id".to_string()],
        }
    }

    #[test]
    fn test_edges_use_working_set_spelling() {
        let tables = vec![TableName::new("app.Orders"), TableName::new("APP.CUSTOMERS")];
        let refs = vec![fk("app", "orders", "app", "customers")];
        let edges = edges_within(&tables, &refs);
        assert_eq!(
            edges,
            vec![DependencyEdge::new("APP.CUSTOMERS", "app.Orders")]
        );
    }

    #[test]
    fn test_unqualified_names_match_any_schema() {
        let tables = vec![TableName::new("orders"), TableName::new("customers")];
        let refs = vec![fk("main", "ORDERS", "main", "CUSTOMERS")];
        assert_eq!(edges_within(&tables, &refs).len(), 1);
    }

    #[test]
    fn test_schema_mismatch_ignored() {
        let tables = vec![TableName::new("sales.orders"), TableName::new("sales.customers")];
        let refs = vec![fk("archive", "orders", "archive", "customers")];
        assert!(edges_within(&tables, &refs).is_empty());
    }

    #[test]
    fn test_external_parent_dropped() {
        let tables = vec![TableName::new("orders")];
        let refs = vec![fk("main", "orders", "main", "customers")];
        assert!(edges_within(&tables, &refs).is_empty());
    }

    #[test]
    fn test_duplicate_constraints_collapse() {
        let tables = vec![TableName::new("orders"), TableName::new("customers")];
        let refs = vec![
            fk("main", "orders", "main", "customers"),
            fk("main", "orders", "main", "customers"),
        ];
        assert_eq!(edges_within(&tables, &refs).len(), 1);
    }

    #[test]
    fn test_self_reference_kept() {
        let tables = vec![TableName::new("employees")];
        let refs = vec![fk("main", "employees", "main", "employees")];
        assert_eq!(
            edges_within(&tables, &refs),
            vec![DependencyEdge::new("employees", "employees")]
        );
    }

    #[test]
    fn test_keys_keep_columns() {
        let tables = vec![TableName::new("ORDERS"), TableName::new("CUSTOMERS")];
        let refs = vec![fk("main", "orders", "main", "customers")];
        let keys = keys_within(&tables, &refs);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].child, TableName::new("ORDERS"));
        assert_eq!(keys[0].parent, TableName::new("CUSTOMERS"));
        assert_eq!(keys[0].column_pairs(), vec![("parent_id", "id")]);
    }

    #[test]
    fn test_composite_keys_on_same_pair_share_one_edge() {
        let tables = vec![TableName::new("orders"), TableName::new("customers")];
        let mut second = fk("main", "orders", "main", "customers");
        second.columns = vec!["billing_id".to_string()];
        let refs = vec![fk("main", "orders", "main", "customers"), second];
        assert_eq!(keys_within(&tables, &refs).len(), 2);
        assert_eq!(edges_within(&tables, &refs).len(), 1);
    }
}
