//! 宏集合：为 builder 提供可变参数调用封装。
//! 通过 `insert_cols!` / `returning_cols!` 等宏，可以直接传入不定长字符串参数而无需手动创建 `Vec`。

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_strings {
    () => {
        Vec::<String>::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut values = Vec::<String>::new();
        $(
            $crate::extend_into_strings($value, &mut values);
        )*
        values
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __builder_with_strings {
    ($builder:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        $builder.$method($crate::__collect_strings!($($arg),*))
    };
}

pub trait IntoStrings {
    fn extend_into_strings(self, dst: &mut Vec<String>);
}

impl IntoStrings for String {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self);
    }
}

impl IntoStrings for &str {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self.to_string());
    }
}

impl<T, const N: usize> IntoStrings for [T; N]
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

impl<T> IntoStrings for &[T]
where
    T: Into<String> + Clone,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.iter().cloned().map(Into::into));
    }
}

impl<T> IntoStrings for Vec<T>
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

#[doc(hidden)]
pub fn extend_into_strings<T>(value: T, dst: &mut Vec<String>)
where
    T: IntoStrings,
{
    value.extend_into_strings(dst);
}

#[doc(hidden)]
pub fn collect_into_strings<T>(value: T) -> Vec<String>
where
    T: IntoStrings,
{
    let mut dst = Vec::new();
    value.extend_into_strings(&mut dst);
    dst
}

/// 为 `InsertBuilder::cols` 提供可变参数调用。
#[macro_export]
macro_rules! insert_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, cols $(, $col)*)
    };
}
pub use crate::insert_cols;

/// 为 `InsertBuilder::returning` 提供可变参数调用。
#[macro_export]
macro_rules! returning_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, returning $(, $col)*)
    };
}
pub use crate::returning_cols;

/// 以可变参数的冲突列创建 `ConflictBuilder`：`conflict_target!("name", "email")`。
#[macro_export]
macro_rules! conflict_target {
    ($($col:expr),* $(,)?) => {
        $crate::ConflictBuilder::new($crate::__collect_strings!($($col),*))
    };
}
pub use crate::conflict_target;

/// 构造 `ValueMap`：`value_map! { "id" => 1_i64, "name" => "My Name" }`。
#[macro_export]
macro_rules! value_map {
    () => {
        $crate::ValueMap::new()
    };
    ($($col:expr => $value:expr),+ $(,)?) => {{
        let mut m = $crate::ValueMap::new();
        $(
            m.insert($col, $value);
        )+
        m
    }};
}
