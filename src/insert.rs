//! InsertBuilder：构建 INSERT 语句。
//!
//! 子句按固定顺序输出：
//!
//! ```text
//! INSERT [OR IGNORE | OR REPLACE] INTO table (cols)
//!     VALUES (...), (...) | <select>
//!     [ON CONFLICT ...]
//!     [RETURNING cols]
//! ```
//!
//! 占位符与参数在同一次从左到右的拼接中产生，参数顺序与占位符顺序严格一致。

use crate::args::{Args, Malformed};
use crate::conflict::ConflictBuilder;
use crate::flavor::{Flavor, default_flavor};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::modifiers::{Arg, BuildResult, Builder, escape, escape_all};
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use crate::value_map::normalize;

/// 行级修饰：`INSERT OR IGNORE` / `INSERT OR REPLACE`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertModifier {
    #[default]
    None,
    Ignore,
    Replace,
}

impl InsertModifier {
    fn verb(self) -> &'static str {
        match self {
            Self::None => "INSERT",
            Self::Ignore => "INSERT OR IGNORE",
            Self::Replace => "INSERT OR REPLACE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    flavor: Flavor,
    modifier: InsertModifier,
    table: Option<String>,
    cols: Vec<String>,
    rows: Vec<Vec<Arg>>,
    returning: Vec<String>,
    // 第一次在已有行之后换了一组列时，换列后的第一行的下标。
    cols_changed_at: Option<usize>,

    // Insert-Select holder
    select: Option<Box<dyn Builder>>,
    conflict: Option<ConflictBuilder>,
}

impl Default for InsertBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// InsertInto：`InsertBuilder::new()` 后立即设置表名。
pub fn insert_into(table: &str) -> InsertBuilder {
    let mut ib = InsertBuilder::new();
    ib.insert_into(table);
    ib
}

impl InsertBuilder {
    pub fn new() -> Self {
        Self {
            flavor: default_flavor(),
            modifier: InsertModifier::None,
            table: None,
            cols: Vec::new(),
            rows: Vec::new(),
            returning: Vec::new(),
            cols_changed_at: None,
            select: None,
            conflict: None,
        }
    }

    pub fn set_flavor(&mut self, flavor: Flavor) -> Flavor {
        std::mem::replace(&mut self.flavor, flavor)
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn modifier(&self) -> InsertModifier {
        self.modifier
    }

    pub fn build(&self) -> BuildResult {
        Builder::build(self)
    }

    pub fn insert_into(&mut self, table: &str) -> &mut Self {
        self.table = Some(escape(table));
        self
    }

    /// OrIgnore：输出 `INSERT OR IGNORE INTO`。与 `or_replace` 互斥，后调用者生效。
    pub fn or_ignore(&mut self) -> &mut Self {
        self.modifier = InsertModifier::Ignore;
        self
    }

    /// OrReplace：输出 `INSERT OR REPLACE INTO`。与 `or_ignore` 互斥，后调用者生效。
    pub fn or_replace(&mut self) -> &mut Self {
        self.modifier = InsertModifier::Replace;
        self
    }

    pub fn cols<T>(&mut self, cols: T) -> &mut Self
    where
        T: IntoStrings,
    {
        self.replace_cols(escape_all(collect_into_strings(cols)));
        self
    }

    /// 已有行之后再换成另一组列，旧行会被错配到新列上；记下位置，build 时报错。
    fn replace_cols(&mut self, cols: Vec<String>) {
        if !self.rows.is_empty() && self.cols != cols && self.cols_changed_at.is_none() {
            self.cols_changed_at = Some(self.rows.len());
        }
        self.cols = cols;
    }

    /// Values：追加一行，值的个数须与列数一致（build 时检查）。
    pub fn values(&mut self, values: impl IntoIterator<Item = impl Into<Arg>>) -> &mut Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// ValuesMultiple：按顺序追加多行。
    pub fn values_multiple<R>(&mut self, rows: impl IntoIterator<Item = R>) -> &mut Self
    where
        R: IntoIterator,
        R::Item: Into<Arg>,
    {
        for row in rows {
            self.values(row);
        }
        self
    }

    /// ValueMap：列名按升序排列后替换列清单，并追加对应的一行值。
    ///
    /// 可以多次调用以追加多行，但每次的列名集合须与已有的列一致，否则 build 报错。
    pub fn value_map<K, V>(&mut self, map: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let (cols, row): (Vec<String>, Vec<Arg>) = normalize(map).into_iter().unzip();
        self.replace_cols(escape_all(cols));
        self.rows.push(row);
        self
    }

    /// FromSelect：以子查询作为行来源，子查询的 SQL 与参数原样拼入。
    pub fn from_select(&mut self, select: impl Builder + 'static) -> &mut Self {
        self.select = Some(Box::new(select));
        self
    }

    /// OnConflict：挂上一个冲突子句，之后该子句归此语句所有。
    pub fn on_conflict(&mut self, clause: ConflictBuilder) -> &mut Self {
        self.conflict = Some(clause);
        self
    }

    /// OnConflictDoNothing：`ON CONFLICT DO NOTHING`，不带冲突列。
    pub fn on_conflict_do_nothing(&mut self) -> &mut Self {
        let mut clause = ConflictBuilder::default();
        clause.do_nothing();
        self.on_conflict(clause)
    }

    pub fn returning<T>(&mut self, cols: T) -> &mut Self
    where
        T: IntoStrings,
    {
        self.returning = escape_all(collect_into_strings(cols));
        self
    }

    fn check_row_source(&self) -> Result<(), Malformed> {
        match (&self.select, self.rows.is_empty()) {
            (Some(_), false) => return Err(Malformed::ConflictingRowSource),
            (None, true) => return Err(Malformed::MissingRowSource),
            _ => {}
        }

        if let Some(row) = self.cols_changed_at {
            return Err(Malformed::ColumnSetMismatch { row });
        }

        // 未声明列时，各行之间长度须一致。
        let expected = match (self.cols.len(), self.rows.first()) {
            (0, Some(first)) => first.len(),
            (n, _) => n,
        };
        for (i, row) in self.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(Malformed::EmptyRow { row: i });
            }
            if row.len() != expected {
                return Err(Malformed::RowLengthMismatch {
                    row: i,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(())
    }

    fn compile(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult {
        let table = self.table.as_deref().ok_or(Malformed::MissingTable)?;
        self.check_row_source()?;

        let mut args = Args::with_flavor(flavor);
        let mut buf = StringBuilder::new();

        buf.write_leading(self.modifier.verb());
        buf.write_str(" INTO ");
        buf.write_str(table);

        if !self.cols.is_empty() {
            buf.write_str(" (");
            buf.write_joined(&self.cols, ", ");
            buf.write_char(')');
        }

        if let Some(sb) = &self.select {
            let ph = args.add(Arg::Builder(sb.clone()));
            buf.write_leading(&ph);
        } else {
            buf.write_leading("VALUES ");
            for (i, row) in self.rows.iter().enumerate() {
                if i > 0 {
                    buf.write_str(", ");
                }
                let placeholders: Vec<String> = row.iter().map(|v| args.add(v.clone())).collect();
                buf.write_char('(');
                buf.write_joined(&placeholders, ", ");
                buf.write_char(')');
            }
        }

        if let Some(clause) = &self.conflict {
            clause.write_to(&mut buf, &mut args)?;
        }

        if !self.returning.is_empty() {
            buf.write_leading("RETURNING ");
            buf.write_joined(&self.returning, ", ");
        }

        args.compile_with_flavor(&buf.into_string(), flavor, initial_arg)
    }
}

impl Builder for InsertBuilder {
    fn build_with_flavor(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult {
        let built = self.compile(flavor, initial_arg);
        match &built {
            Ok((sql, args)) => {
                tracing::trace!(sql = %sql, args = args.len(), %flavor, "built INSERT statement");
            }
            Err(e) => tracing::debug!(error = %e, "rejected INSERT statement"),
        }
        built
    }

    fn flavor(&self) -> Flavor {
        self.flavor
    }
}
