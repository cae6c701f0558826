#[cfg(test)]
mod tests {
    use crate::flavor::{Flavor, default_flavor, set_default_flavor_scoped};
    use pretty_assertions::assert_eq;

    #[test]
    fn flavor_display() {
        let cases = vec![
            (Flavor::MySQL, "MySQL"),
            (Flavor::PostgreSQL, "PostgreSQL"),
            (Flavor::SQLite, "SQLite"),
            (Flavor::SQLServer, "SQLServer"),
            (Flavor::Oracle, "Oracle"),
        ];

        for (f, expected) in cases {
            assert_eq!(f.to_string(), expected);
        }
    }

    #[test]
    fn placeholder_styles() {
        let cases = vec![
            (Flavor::MySQL, "?"),
            (Flavor::SQLite, "?"),
            (Flavor::PostgreSQL, "$3"),
            (Flavor::SQLServer, "@p3"),
            (Flavor::Oracle, ":3"),
        ];

        for (f, expected) in cases {
            let mut s = String::new();
            f.write_placeholder(3, &mut s);
            assert_eq!(s, expected);
        }
    }

    #[test]
    fn scoped_default_flavor() {
        let _g = set_default_flavor_scoped(Flavor::PostgreSQL);
        assert_eq!(default_flavor(), Flavor::PostgreSQL);
    }
}
