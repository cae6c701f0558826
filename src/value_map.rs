//! ValueMap：把无序的 `列名 -> 值` 映射规整为确定顺序的 `(列名, 值)` 序列。
//!
//! 顺序规则是按列名升序排序，对同一组键永远得到同一顺序；
//! 同一个键出现多次时保留最后一个值。

use crate::modifiers::Arg;
use std::collections::BTreeMap;

/// 以列名排序的值映射。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: BTreeMap<String, Arg>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置某列的值；已存在时覆盖。
    pub fn insert(&mut self, col: impl Into<String>, value: impl Into<Arg>) -> &mut Self {
        self.entries.insert(col.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 规整后的列名顺序。
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn into_pairs(self) -> Vec<(String, Arg)> {
        self.entries.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<Arg>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        for (k, v) in iter {
            m.insert(k, v);
        }
        m
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Arg);
    type IntoIter = std::collections::btree_map::IntoIter<String, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Normalize：接受任意 `(列名, 值)` 来源（`HashMap`、`BTreeMap`、数组等），返回按列名排序的序列。
pub fn normalize<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Vec<(String, Arg)>
where
    K: Into<String>,
    V: Into<Arg>,
{
    map.into_iter().collect::<ValueMap>().into_pairs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn normalize_sorts_hash_map_keys() {
        let m: HashMap<&str, Arg> = HashMap::from([
            ("name", Arg::from("My Name Again")),
            ("address", Arg::from("Some Address")),
            ("id", Arg::from(1_i64)),
        ]);
        let cols: Vec<String> = normalize(m).into_iter().map(|(c, _)| c).collect();
        assert_eq!(cols, vec!["address", "id", "name"]);
    }

    #[test]
    fn normalize_is_stable_for_same_keys() {
        let a = normalize([("b", 2_i64), ("a", 1_i64), ("c", 3_i64)]);
        let b = normalize([("c", 3_i64), ("a", 1_i64), ("b", 2_i64)]);
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_key_keeps_last_value() {
        let pairs = normalize([("a", 1_i64), ("a", 2_i64)]);
        assert_eq!(pairs, vec![("a".to_string(), Arg::Value(SqlValue::I64(2)))]);
    }

    #[test]
    fn value_map_builder_and_columns() {
        let mut m = ValueMap::new();
        m.insert("name", "My Name").insert("id", 1_i64);
        assert_eq!(m.len(), 2);
        assert_eq!(m.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(ValueMap::new().is_empty());
    }
}
