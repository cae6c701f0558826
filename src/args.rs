//! Args：收集参数，并把含 `$n` 引用的 format 编译成最终 SQL 与参数列表。

use crate::flavor::{Flavor, default_flavor};
use crate::modifiers::{Arg, BuildResult, Raw};
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;

/// 构建语句时可能出现的错误。所有错误都只在 build 阶段产生。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("builder malformed statement: {0}")]
    MalformedStatement(#[from] Malformed),
    #[error("builder invalid conflict configuration: {0}")]
    InvalidConflictConfiguration(#[from] ConflictMisconfig),
    #[error("builder invalid arg reference ${0}")]
    InvalidArgRef(usize),
}

/// INSERT 语句结构不完整或自相矛盾。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Malformed {
    #[error("missing table name")]
    MissingTable,
    #[error("missing row source, neither VALUES nor SELECT is set")]
    MissingRowSource,
    #[error("VALUES and SELECT cannot both be used as row source")]
    ConflictingRowSource,
    #[error("row {row} has no values")]
    EmptyRow { row: usize },
    #[error("row {row} uses different columns than the rows before it")]
    ColumnSetMismatch { row: usize },
    #[error("row {row} has {actual} values but {expected} columns are declared")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// ON CONFLICT 子句配置错误。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConflictMisconfig {
    #[error("neither DO NOTHING nor DO UPDATE is chosen")]
    MissingAction,
    #[error("DO NOTHING cannot carry SET assignments")]
    AssignmentsOnDoNothing,
    #[error("DO UPDATE has no assignment to emit")]
    EmptyUpdate,
}

/// Args 存储 SQL 相关参数。
#[derive(Debug, Clone)]
pub struct Args {
    /// 默认 flavor，作为 `Builder::flavor` 的返回值。
    pub flavor: Flavor,

    pub(crate) arg_values: Vec<Arg>,
}

impl Default for Args {
    fn default() -> Self {
        Self::with_flavor(default_flavor())
    }
}

impl Args {
    pub fn with_flavor(flavor: Flavor) -> Self {
        Self {
            flavor,
            arg_values: Vec::new(),
        }
    }

    /// Add：追加一个参数并返回内部引用（`$0/$1/...`）。
    pub fn add(&mut self, arg: impl Into<Arg>) -> String {
        let idx = self.arg_values.len();
        self.arg_values.push(arg.into());
        format!("${idx}")
    }

    /// CompileWithFlavor：编译 format，并用 `flavor` 输出最终占位符。
    ///
    /// - `$n` 引用第 n 个参数，可以重复引用；
    /// - `$$` 输出一个 `$`；
    /// - 其它位置的 `$` 原样保留。
    pub fn compile_with_flavor(
        &self,
        format: &str,
        flavor: Flavor,
        initial_value: &[SqlValue],
    ) -> BuildResult {
        let mut ctx = CompileContext {
            buf: StringBuilder::new(),
            flavor,
            values: initial_value.to_vec(),
        };

        let mut rest = format;
        while let Some(pos) = rest.find('$') {
            if pos > 0 {
                ctx.buf.write_str(&rest[..pos]);
            }
            rest = &rest[pos + 1..];

            match rest.as_bytes().first() {
                None => {
                    ctx.buf.write_char('$');
                    break;
                }
                Some(b'$') => {
                    ctx.buf.write_char('$');
                    rest = &rest[1..];
                }
                Some(b) if b.is_ascii_digit() => {
                    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
                    let n = rest[..end]
                        .parse::<usize>()
                        .map_err(|_| BuildError::InvalidArgRef(usize::MAX))?;
                    let arg = self.arg_values.get(n).ok_or(BuildError::InvalidArgRef(n))?;
                    ctx.write_value(arg)?;
                    rest = &rest[end..];
                }
                Some(_) => ctx.buf.write_char('$'),
            }
        }

        if !rest.is_empty() {
            ctx.buf.write_str(rest);
        }

        Ok((ctx.buf.into_string(), ctx.values))
    }
}

#[derive(Debug)]
struct CompileContext {
    buf: StringBuilder,
    flavor: Flavor,
    values: Vec<SqlValue>,
}

impl CompileContext {
    fn write_value(&mut self, arg: &Arg) -> Result<(), BuildError> {
        match arg {
            Arg::Value(v) => {
                let mut ph = String::new();
                self.flavor.write_placeholder(self.values.len() + 1, &mut ph);
                self.buf.write_str(&ph);
                self.values.push(v.clone());
            }
            Arg::Raw(Raw { expr }) => self.buf.write_str(expr),
            Arg::Builder(b) => {
                let (sql, values) = b.build_with_flavor(self.flavor, &self.values)?;
                self.buf.write_str(&sql);
                self.values = values;
            }
        }
        Ok(())
    }
}
