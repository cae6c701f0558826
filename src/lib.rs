//! halo-insert-builder：可组合的 INSERT / UPSERT 语句拼接与参数收集库。
//!
//! ```
//! use halo_space::{SqlValue, on_conflict, insert_into};
//!
//! let mut clause = on_conflict(["name"]);
//! clause.do_update().set("update_date", 55151515_i64);
//!
//! let mut ib = insert_into("table");
//! ib.cols(["name"]).values(["My Name"]).on_conflict(clause);
//!
//! let (sql, args) = ib.build().unwrap();
//! assert_eq!(
//!     sql,
//!     "INSERT INTO table (name) VALUES (?) ON CONFLICT (name) DO UPDATE SET update_date = ?"
//! );
//! assert_eq!(args, vec![SqlValue::from("My Name"), SqlValue::I64(55151515)]);
//! ```

pub mod args;
pub mod builder;
pub mod conflict;
pub mod flavor;
#[cfg(test)]
mod flavor_tests;
pub mod insert;
pub mod macros;
pub use crate::macros::*;
#[cfg(test)]
mod macros_tests;
pub mod modifiers;
mod string_builder;
pub mod value;
pub mod value_map;

pub use crate::args::{Args, BuildError, ConflictMisconfig, Malformed};
pub use crate::builder::build;
pub use crate::conflict::{ConflictAction, ConflictBuilder, on_conflict};
pub use crate::flavor::{Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped};
pub use crate::insert::{InsertBuilder, InsertModifier, insert_into};
pub use crate::modifiers::{Arg, BuildResult, Builder, Raw, escape, escape_all, raw};
pub use crate::value::SqlValue;
pub use crate::value_map::{ValueMap, normalize};

/// 推荐的便捷命名空间：允许 `use halo_space::sqlbuilder::{...}` 形式导入。
pub mod sqlbuilder {
    pub use crate::*;
}
