//! Property-based tests for header-aligned table splitting

use proptest::prelude::*;
use panbridge_core::parser::columns::parse_table;

const WIDTH: usize = 12;
const NAMES: [&str; 6] = ["Name", "Alpha", "Beta", "Gamma", "Delta", "Omega"];

fn header(columns: usize) -> String {
    NAMES[..columns]
        .iter()
        .map(|n| format!("{n:<WIDTH$}"))
        .collect::<String>()
}

fn row(values: &[String]) -> String {
    values.iter().map(|v| format!("{v:<WIDTH$}")).collect()
}

/// Rows of `columns` values; every value carries a digit so it never reads as header text
fn arb_rows(columns: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-z]{0,6}[0-9]", columns..=columns),
        1..10,
    )
}

fn arb_table() -> impl Strategy<Value = (usize, Vec<Vec<String>>)> {
    (2_usize..=NAMES.len()).prop_flat_map(|columns| (Just(columns), arb_rows(columns)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every aligned value lands under its own column
    #[test]
    fn aligned_rows_split_exactly((columns, rows) in arb_table()) {
        let mut raw = header(columns);
        for values in &rows {
            raw.push('\n');
            raw.push_str(&row(values));
        }

        let table = parse_table(&raw, "test", |l| l.starts_with("Name")).unwrap();
        prop_assert_eq!(table.layout.columns().len(), columns);
        prop_assert_eq!(table.rows.len(), rows.len());
        prop_assert!(table.rejected.is_empty());

        for (fields, values) in table.rows.iter().zip(&rows) {
            for (name, value) in NAMES.iter().zip(values) {
                prop_assert_eq!(fields.get(name), Some(value.as_str()));
            }
        }
    }

    /// A row that ends before the last column is rejected, the rest survive
    #[test]
    fn short_row_is_rejected((columns, rows) in arb_table(), pick in any::<prop::sample::Index>()) {
        let short = pick.index(rows.len());
        let mut raw = header(columns);
        for (i, values) in rows.iter().enumerate() {
            raw.push('\n');
            if i == short {
                raw.push_str(&values[0]);
            } else {
                raw.push_str(&row(values));
            }
        }

        let table = parse_table(&raw, "test", |l| l.starts_with("Name")).unwrap();
        prop_assert_eq!(table.rows.len(), rows.len() - 1);
        prop_assert_eq!(table.rejected.len(), 1);
    }
}
