//! 参数修饰器与 `Builder` trait。

use crate::args::BuildError;
use crate::flavor::Flavor;
use crate::value::SqlValue;
use dyn_clone::DynClone;
use std::fmt;

/// `build` 的返回值：最终 SQL 与按占位符顺序排列的参数。
pub type BuildResult = Result<(String, Vec<SqlValue>), BuildError>;

/// Escape：把 `$` 替换为 `$$`，避免被 `Args::compile` 当成参数引用。
pub fn escape(ident: &str) -> String {
    ident.replace('$', "$$")
}

/// EscapeAll：批量 Escape。
pub fn escape_all(idents: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    idents.into_iter().map(|s| escape(s.as_ref())).collect()
}

/// Raw：原样拼入 SQL 的表达式，不产生占位符也不产生参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw {
    pub(crate) expr: String,
}

pub fn raw(expr: impl Into<String>) -> Arg {
    Arg::Raw(Raw { expr: expr.into() })
}

/// 可以嵌入语句的 SQL 片段（子查询、冲突子句等）。
///
/// `build_with_flavor` 的返回参数必须以 `initial_arg` 开头：嵌套片段拿到外层已收集的参数，
/// 在其后追加自己的参数，这样带序号的占位符（`$1`、`@p1`）才能跨片段连续。
pub trait Builder: DynClone {
    fn build(&self) -> BuildResult {
        self.build_with_flavor(self.flavor(), &[])
    }

    fn build_with_flavor(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult;

    fn flavor(&self) -> Flavor;
}

dyn_clone::clone_trait_object!(Builder);

impl fmt::Debug for dyn Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Builder(..)")
    }
}

impl Builder for Box<dyn Builder> {
    fn build_with_flavor(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult {
        (**self).build_with_flavor(flavor, initial_arg)
    }

    fn flavor(&self) -> Flavor {
        (**self).flavor()
    }
}

/// 写入语句的一个值：普通参数、原样表达式或嵌套片段。
#[derive(Debug, Clone)]
pub enum Arg {
    Value(SqlValue),
    Raw(Raw),
    Builder(Box<dyn Builder>),
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            // 嵌套片段无法比较
            _ => false,
        }
    }
}

impl From<SqlValue> for Arg {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Raw> for Arg {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

impl From<Box<dyn Builder>> for Arg {
    fn from(v: Box<dyn Builder>) -> Self {
        Self::Builder(v)
    }
}

macro_rules! impl_arg_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Self::Value(SqlValue::from(v))
                }
            }
        )*
    };
}

impl_arg_from_value!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    bool,
    &'static str,
    String,
    Vec<u8>,
    time::OffsetDateTime,
);

impl<T> From<Option<T>> for Arg
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        Self::Value(SqlValue::from_option(v))
    }
}
