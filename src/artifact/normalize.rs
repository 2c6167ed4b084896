//! Normalization of raw records into grid rows
//!
//! Raw records are keyed by lookup paths which may contain dots and other
//! characters a grid can't use as property names. Each configured path is
//! given a positional synthetic name (`col1`, `col2`, ...) and rows are
//! re-keyed through that mapping.

use super::model::{
    ColumnDefinition, NormalizationResult, NormalizedRow, PathAndName, RawRecord,
};
use std::collections::HashMap;

/// Prefix of synthetic column property names
pub const COLUMN_PREFIX: &str = "col";

/// Lookup from raw record path to synthetic property name
pub type PropertyMapping = HashMap<String, String>;

/// Synthetic property name for a 1-based column position
pub fn column_prop(position: usize) -> String {
    format!("{}{}", COLUMN_PREFIX, position)
}

/// Build column definitions and the path -> prop lookup
///
/// One column per definition, in input order. If a path is listed twice both
/// columns are kept, but the lookup points at the later one.
pub fn normalize_columns(
    paths_and_names: &[PathAndName],
) -> (Vec<ColumnDefinition>, PropertyMapping) {
    let mut mapping = PropertyMapping::with_capacity(paths_and_names.len());
    let columns = paths_and_names
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let prop = column_prop(index + 1);
            mapping.insert(def.path.clone(), prop.clone());
            ColumnDefinition::new(def.friendly_name.clone(), prop)
        })
        .collect();

    (columns, mapping)
}

/// Re-key each raw record through the mapping, dropping unmapped keys
pub fn normalize_rows(data: &[RawRecord], mapping: &PropertyMapping) -> Vec<NormalizedRow> {
    data.iter()
        .map(|record| {
            record
                .iter()
                .filter_map(|(path, value)| {
                    mapping
                        .get(path)
                        .map(|prop| (prop.clone(), value.clone()))
                })
                .collect::<NormalizedRow>()
        })
        .collect()
}

/// Full normalization: columns first, then rows through the resulting mapping
pub fn normalize(data: &[RawRecord], paths_and_names: &[PathAndName]) -> NormalizationResult {
    let (columns, mapping) = normalize_columns(paths_and_names);
    let rows = normalize_rows(data, &mapping);
    NormalizationResult { rows, columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn foo_bar() -> Vec<PathAndName> {
        vec![PathAndName::new("a.b", "Foo"), PathAndName::new("c", "Bar")]
    }

    #[test]
    fn test_normalize_columns() {
        let (columns, mapping) = normalize_columns(&foo_bar());

        assert_eq!(
            columns,
            vec![
                ColumnDefinition::new("Foo", "col1"),
                ColumnDefinition::new("Bar", "col2"),
            ]
        );
        assert_eq!(mapping["a.b"], "col1");
        assert_eq!(mapping["c"], "col2");
    }

    #[test]
    fn test_normalize_columns_preserves_order_past_nine() {
        let defs: Vec<PathAndName> = (0..12)
            .map(|i| PathAndName::new(format!("p{}", i), format!("Name {}", i)))
            .collect();
        let (columns, _) = normalize_columns(&defs);

        assert_eq!(columns.len(), 12);
        for (i, col) in columns.iter().enumerate() {
            assert_eq!(col.prop, format!("col{}", i + 1));
            assert_eq!(col.name, format!("Name {}", i));
        }
    }

    #[test]
    fn test_normalize_columns_empty() {
        let (columns, mapping) = normalize_columns(&[]);
        assert!(columns.is_empty());
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_duplicate_path_maps_to_last_column() {
        let defs = vec![PathAndName::new("a", "First"), PathAndName::new("a", "Second")];
        let (columns, mapping) = normalize_columns(&defs);

        assert_eq!(columns.len(), 2);
        assert_eq!(mapping["a"], "col2");

        let rows = normalize_rows(&[record(&[("a", "v")])], &mapping);
        assert_eq!(rows[0], record(&[("col2", "v")]));
    }

    #[test]
    fn test_normalize_rows_drops_unmapped_keys() {
        let (_, mapping) = normalize_columns(&foo_bar());
        let rows = normalize_rows(&[record(&[("a.b", "1"), ("c", "2"), ("x", "99")])], &mapping);

        assert_eq!(rows, vec![record(&[("col1", "1"), ("col2", "2")])]);
    }

    #[test]
    fn test_normalize_rows_does_not_fill_missing_keys() {
        let (_, mapping) = normalize_columns(&foo_bar());
        let rows = normalize_rows(&[record(&[("c", "2")]), record(&[])], &mapping);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], record(&[("col2", "2")]));
        assert!(rows[1].is_empty());
    }

    #[test]
    fn test_normalize_empty_dataset_keeps_columns() {
        let result = normalize(&[], &foo_bar());
        assert!(result.rows.is_empty());
        assert_eq!(result.columns.len(), 2);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let data = vec![
            record(&[("a.b", "1"), ("c", "2")]),
            record(&[("a.b", "3"), ("zzz", "4")]),
        ];
        let first = normalize(&data, &foo_bar());
        let second = normalize(&data, &foo_bar());
        assert_eq!(first, second);
    }
}
