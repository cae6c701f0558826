//! Build：用 `$n` 语法自由拼接一个 SQL 片段，常用于 `InsertBuilder::from_select` 的子查询。

use crate::args::Args;
use crate::flavor::Flavor;
use crate::modifiers::{Arg, BuildResult, Builder};
use crate::value::SqlValue;

#[derive(Debug, Clone)]
struct CompiledBuilder {
    args: Args,
    format: String,
}

impl Builder for CompiledBuilder {
    fn build_with_flavor(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult {
        self.args
            .compile_with_flavor(&self.format, flavor, initial_arg)
    }

    fn flavor(&self) -> Flavor {
        self.args.flavor
    }
}

/// Build：`format` 中的 `$0`、`$1` 依次引用 `args_in`，`$$` 表示字面量 `$`。
///
/// ```
/// use halo_space::{Builder, SqlValue, build};
///
/// let sb = build("SELECT * FROM t2 WHERE id > $0", [10_i64]);
/// let (sql, args) = sb.build().unwrap();
/// assert_eq!(sql, "SELECT * FROM t2 WHERE id > ?");
/// assert_eq!(args, vec![SqlValue::I64(10)]);
/// ```
pub fn build(
    format: impl Into<String>,
    args_in: impl IntoIterator<Item = impl Into<Arg>>,
) -> Box<dyn Builder> {
    let mut args = Args::default();
    for a in args_in {
        args.add(a);
    }
    Box::new(CompiledBuilder {
        args,
        format: format.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::build;
    use crate::flavor::{Flavor, set_default_flavor_scoped};
    use crate::modifiers::{Arg, Builder, raw};
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_without_args() {
        let _g = set_default_flavor_scoped(Flavor::MySQL);
        let sb = build("SELECT * FROM table2", Vec::<Arg>::new());
        assert_eq!(sb.build().unwrap(), ("SELECT * FROM table2".to_string(), vec![]));
    }

    #[test]
    fn build_with_flavor_numbers_placeholders() {
        let _g = set_default_flavor_scoped(Flavor::MySQL);
        let sb = build("a = $0 AND b = $1 AND c = $2", [Arg::from(1_i64), raw("NOW()"), Arg::from("x")]);
        let (sql, args) = sb.build_with_flavor(Flavor::PostgreSQL, &[]).unwrap();
        assert_eq!(sql, "a = $1 AND b = NOW() AND c = $2");
        assert_eq!(args, vec![SqlValue::I64(1), SqlValue::from("x")]);
    }
}
