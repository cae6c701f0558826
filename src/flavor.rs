//! SQL Flavor（方言）：决定最终 SQL 中占位符的写法。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 占位符方言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    /// `?`
    #[default]
    MySQL,
    /// `$1, $2, ...`
    PostgreSQL,
    /// `?`
    SQLite,
    /// `@p1, @p2, ...`
    SQLServer,
    /// `:1, :2, ...`
    Oracle,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::MySQL as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::PostgreSQL,
            2 => Self::SQLite,
            3 => Self::SQLServer,
            4 => Self::Oracle,
            _ => Self::MySQL,
        }
    }

    /// 写出第 `index_1_based` 个占位符。
    pub(crate) fn write_placeholder(self, index_1_based: usize, out: &mut String) {
        match self {
            Self::MySQL | Self::SQLite => out.push('?'),
            Self::PostgreSQL => {
                out.push('$');
                out.push_str(&index_1_based.to_string());
            }
            Self::SQLServer => {
                out.push_str("@p");
                out.push_str(&index_1_based.to_string());
            }
            Self::Oracle => {
                out.push(':');
                out.push_str(&index_1_based.to_string());
            }
        }
    }
}

/// 获取当前全局默认 Flavor。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 设置全局默认 Flavor，返回旧值。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    let old = DEFAULT_FLAVOR.swap(flavor as u8, Ordering::Relaxed);
    Flavor::from_u8(old)
}

/// 修改全局默认 Flavor 的 RAII guard（会持有一个全局锁，避免并行测试互相干扰）。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    old: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.old);
    }
}

/// 在一个作用域内临时设置 DefaultFlavor，并保证退出作用域后自动恢复。
pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_flavor(flavor);
    DefaultFlavorGuard { _lock: lock, old }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
            Self::Oracle => "Oracle",
        };
        f.write_str(s)
    }
}
