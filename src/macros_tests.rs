#[cfg(test)]
mod tests {
    use crate::flavor::{Flavor, set_default_flavor_scoped};
    use crate::macros::collect_into_strings;
    use crate::{InsertBuilder, conflict_target, insert_cols, returning_cols, value_map};
    use pretty_assertions::assert_eq;

    #[test]
    fn into_strings_sources() {
        let owned = vec!["a".to_string(), "b".to_string()];
        assert_eq!(collect_into_strings(owned.as_slice()), vec!["a", "b"]);
        assert_eq!(collect_into_strings(owned), vec!["a", "b"]);
        assert_eq!(collect_into_strings("c"), vec!["c"]);
        assert_eq!(collect_into_strings(["d", "e"]), vec!["d", "e"]);
    }

    #[test]
    fn insert_macros_work() {
        let _g = set_default_flavor_scoped(Flavor::MySQL);
        let mut ib = InsertBuilder::new();
        ib.insert_into("t");
        insert_cols!(ib, "a", "b").values([1_i64, 2_i64]);
        returning_cols!(ib, "id", "a");

        let mut clause = conflict_target!("a", "b");
        clause.do_nothing();
        ib.on_conflict(clause);

        let (sql, _) = ib.build().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO t (a, b) VALUES (?, ?) ON CONFLICT (a, b) DO NOTHING RETURNING id, a"
        );
    }

    #[test]
    fn value_map_macro() {
        let m = value_map! { "b" => 2_i64, "a" => "x", };
        assert_eq!(m.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(value_map!().is_empty());
    }
}
