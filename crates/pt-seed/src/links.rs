//! Foreign key aware seeding
//!
//! Parents are inserted before their children, and foreign key columns are
//! filled with key values drawn from the parent's generated rows so every
//! seeded reference resolves.

use crate::generator::{table_seed, DiagnosticKind, SeedDiagnostic, SeedValue, TableBuffer};
use pt_core::{ForeignKey, TableName, TableSchema};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn same_table(a: &TableName, b: &TableName) -> bool {
    a.key() == b.key()
}

/// Parent-first insertion order over `tables`, as indices into `tables`.
///
/// Stable: tables keep their schema order unless a parent has to move ahead
/// of a child. Self references are ignored; tables caught in a longer cycle
/// keep schema order at the end.
pub(crate) fn insertion_order(tables: &[&TableSchema], keys: &[ForeignKey]) -> Vec<usize> {
    let parents_of = |idx: usize| -> Vec<usize> {
        keys.iter()
            .filter(|k| same_table(&k.child, &tables[idx].name))
            .filter(|k| !same_table(&k.parent, &k.child))
            .filter_map(|k| tables.iter().position(|t| same_table(&t.name, &k.parent)))
            .collect()
    };
    let parents: Vec<Vec<usize>> = (0..tables.len()).map(parents_of).collect();

    let mut placed = vec![false; tables.len()];
    let mut order = Vec::with_capacity(tables.len());
    while order.len() < tables.len() {
        let next = (0..tables.len())
            .find(|&idx| !placed[idx] && parents[idx].iter().all(|&p| placed[p]));
        match next {
            Some(idx) => {
                placed[idx] = true;
                order.push(idx);
            }
            None => {
                let rest: Vec<usize> = (0..tables.len()).filter(|&idx| !placed[idx]).collect();
                log::warn!(
                    "Circular foreign keys between {}, seeding them in schema order",
                    rest.iter()
                        .map(|&idx| tables[idx].name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                order.extend(rest);
                break;
            }
        }
    }
    order
}

/// Columns of `table` that some foreign key references
pub(crate) fn key_columns<'a>(table: &TableName, keys: &'a [ForeignKey]) -> Vec<&'a str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in keys.iter().filter(|k| same_table(&k.parent, table)) {
        for (_, parent_column) in key.column_pairs() {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(parent_column)) {
                columns.push(parent_column);
            }
        }
    }
    columns
}

fn column_index(buffer: &TableBuffer, name: &str) -> Option<usize> {
    buffer.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
}

fn unlinked(key: &ForeignKey, message: String, diagnostics: &mut Vec<SeedDiagnostic>) {
    let diagnostic = SeedDiagnostic {
        kind: DiagnosticKind::UnlinkedForeignKey,
        table: key.child.to_string(),
        column: key.child_columns.join(", "),
        message,
    };
    log::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Overwrite foreign key columns with values from randomly chosen parent
/// rows. Keys that cannot be resolved against the buffers are reported and
/// left as generated.
pub(crate) fn link_rows(
    buffers: &mut [TableBuffer],
    keys: &[ForeignKey],
    seed: u64,
    diagnostics: &mut Vec<SeedDiagnostic>,
) {
    for (link, key) in keys.iter().enumerate() {
        let child = buffers.iter().position(|b| same_table(&b.table, &key.child));
        let parent = buffers.iter().position(|b| same_table(&b.table, &key.parent));
        let (Some(child), Some(parent)) = (child, parent) else {
            unlinked(key, format!("{} is not seeded", key.parent), diagnostics);
            continue;
        };

        let pairs = key.column_pairs();
        if pairs.is_empty() {
            unlinked(key, "referenced columns are unknown".to_string(), diagnostics);
            continue;
        }
        let resolved: Option<Vec<(usize, usize)>> = pairs
            .iter()
            .map(|(c, p)| Some((column_index(&buffers[child], c)?, column_index(&buffers[parent], p)?)))
            .collect();
        let Some(resolved) = resolved else {
            unlinked(
                key,
                format!("columns missing from the schema of {} or {}", key.child, key.parent),
                diagnostics,
            );
            continue;
        };

        let parent_keys: Vec<Vec<SeedValue>> = buffers[parent]
            .rows
            .iter()
            .map(|row| resolved.iter().map(|&(_, p)| row[p].clone()).collect())
            .collect();
        if parent_keys.is_empty() {
            continue;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(table_seed(seed, &key.child) ^ (link as u64 + 1));
        for row in &mut buffers[child].rows {
            let picked = &parent_keys[rng.random_range(0..parent_keys.len())];
            for (&(c, _), value) in resolved.iter().zip(picked) {
                row[c] = value.clone();
            }
        }
        log::debug!(
            "Linked {} -> {} on {} column(s)",
            key.child,
            key.parent,
            resolved.len()
        );
    }
}
