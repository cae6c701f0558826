//! ConflictBuilder：构建 `ON CONFLICT [(cols)] DO NOTHING | DO UPDATE SET ...` 子句。
//!
//! 子句可以单独构建、单独 build，也可以交给 `InsertBuilder::on_conflict` 拼进 INSERT 语句。

use crate::args::{Args, BuildError, ConflictMisconfig};
use crate::flavor::{Flavor, default_flavor};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::modifiers::{Arg, BuildResult, Builder, escape, escape_all, raw};
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use crate::value_map::normalize;

/// 冲突时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Nothing,
    Update,
}

#[derive(Debug, Clone)]
struct ConditionalAssignment {
    col: String,
    value: Arg,
    guard: bool,
}

#[derive(Debug, Clone)]
pub struct ConflictBuilder {
    flavor: Flavor,

    target: Vec<String>,
    action: Option<ConflictAction>,

    explicit: Vec<(String, Arg)>,
    mapped: Vec<(String, Arg)>,
    conditional: Vec<ConditionalAssignment>,
}

impl Default for ConflictBuilder {
    fn default() -> Self {
        Self {
            flavor: default_flavor(),
            target: Vec::new(),
            action: None,
            explicit: Vec::new(),
            mapped: Vec::new(),
            conditional: Vec::new(),
        }
    }
}

/// OnConflict：以 `target` 作为冲突列创建子句，`target` 可以为空。
pub fn on_conflict<T>(target: T) -> ConflictBuilder
where
    T: IntoStrings,
{
    ConflictBuilder::new(target)
}

impl ConflictBuilder {
    pub fn new<T>(target: T) -> Self
    where
        T: IntoStrings,
    {
        Self {
            target: escape_all(collect_into_strings(target)),
            ..Self::default()
        }
    }

    /// SetFlavor：设置单独 build 时使用的 flavor，返回旧值。
    pub fn set_flavor(&mut self, flavor: Flavor) -> Flavor {
        std::mem::replace(&mut self.flavor, flavor)
    }

    pub fn action(&self) -> Option<ConflictAction> {
        self.action
    }

    /// DoNothing：冲突时忽略该行。与 `do_update` 互斥，后调用者生效。
    pub fn do_nothing(&mut self) -> &mut Self {
        self.action = Some(ConflictAction::Nothing);
        self
    }

    /// DoUpdate：冲突时执行 `SET` 赋值。与 `do_nothing` 互斥，后调用者生效。
    pub fn do_update(&mut self) -> &mut Self {
        self.action = Some(ConflictAction::Update);
        self
    }

    /// Set：追加一条赋值 `col = ?`。
    pub fn set(&mut self, col: &str, value: impl Into<Arg>) -> &mut Self {
        self.explicit.push((escape(col), value.into()));
        self
    }

    /// SetExcluded：追加 `col = EXCLUDED.col`，使用待插入行的值，不产生参数。
    pub fn set_excluded(&mut self, col: &str) -> &mut Self {
        // raw 表达式不经过 compile，不能 escape
        let v = raw(format!("EXCLUDED.{col}"));
        self.explicit.push((escape(col), v));
        self
    }

    /// SetMap：按列名排序后追加一批赋值，位于所有 `set` 之后、所有 `set_if` 之前。
    pub fn set_map<K, V>(&mut self, map: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        let pairs = normalize(map).into_iter().map(|(c, v)| (escape(&c), v));
        self.mapped.extend(pairs);
        self
    }

    /// SetIf：追加一条条件赋值；`guard` 为 false 时 build 既不输出 SQL 也不产生参数。
    pub fn set_if(&mut self, col: &str, value: impl Into<Arg>, guard: bool) -> &mut Self {
        self.conditional.push(ConditionalAssignment {
            col: escape(col),
            value: value.into(),
            guard,
        });
        self
    }

    fn recorded_len(&self) -> usize {
        self.explicit.len() + self.mapped.len() + self.conditional.len()
    }

    /// 最终输出的赋值：显式、map、条件成立的条件赋值，依次排列，不去重。
    fn emitted(&self) -> impl Iterator<Item = (&str, &Arg)> {
        let guarded = self
            .conditional
            .iter()
            .filter(|a| a.guard)
            .map(|a| (a.col.as_str(), &a.value));
        self.explicit
            .iter()
            .chain(&self.mapped)
            .map(|(c, v)| (c.as_str(), v))
            .chain(guarded)
    }

    /// 把子句写入外层语句的缓冲区，参数追加进外层的 `args`。
    pub(crate) fn write_to(
        &self,
        buf: &mut StringBuilder,
        args: &mut Args,
    ) -> Result<(), BuildError> {
        let action = self.action.ok_or(ConflictMisconfig::MissingAction)?;

        buf.write_leading("ON CONFLICT");
        if !self.target.is_empty() {
            buf.write_str(" (");
            buf.write_joined(&self.target, ", ");
            buf.write_char(')');
        }

        match action {
            ConflictAction::Nothing => {
                if self.recorded_len() > 0 {
                    return Err(ConflictMisconfig::AssignmentsOnDoNothing.into());
                }
                buf.write_str(" DO NOTHING");
            }
            ConflictAction::Update => {
                let assignments: Vec<String> = self
                    .emitted()
                    .map(|(col, v)| format!("{col} = {}", args.add(v.clone())))
                    .collect();
                if assignments.is_empty() {
                    return Err(ConflictMisconfig::EmptyUpdate.into());
                }
                buf.write_str(" DO UPDATE SET ");
                buf.write_joined(&assignments, ", ");
            }
        }
        Ok(())
    }
}

impl Builder for ConflictBuilder {
    fn build_with_flavor(&self, flavor: Flavor, initial_arg: &[SqlValue]) -> BuildResult {
        let mut args = Args::with_flavor(flavor);
        let mut buf = StringBuilder::new();
        self.write_to(&mut buf, &mut args)?;
        let built = args.compile_with_flavor(&buf.into_string(), flavor, initial_arg)?;
        tracing::trace!(sql = %built.0, args = built.1.len(), "built ON CONFLICT clause");
        Ok(built)
    }

    fn flavor(&self) -> Flavor {
        self.flavor
    }
}
