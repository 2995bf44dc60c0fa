// src/ordering.rs
// トップレベルのメニュー表示順
//
// ルートテーブル上の宣言順とは独立に、安定キー (項目・サブメニューは
// ルートのセグメント、グループは group キー) の並びで表示順を決める。

use crate::model::MenuEntry;

/// 既定の表示順
pub const DEFAULT_MENU_ORDER: &[&str] = &[
    "dashboard",
    "features",
    "users",
    "orders",
    "settings",
    "permission",
];

/// 安定キーの優先順位表。先頭ほど上に表示される
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOrder {
    keys: Vec<String>,
}

impl MenuOrder {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MenuOrder {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// キーの順位。表にないキーは最下位 (`usize::MAX`)
    pub fn rank(&self, key: &str) -> usize {
        self.keys
            .iter()
            .position(|k| k == key)
            .unwrap_or(usize::MAX)
    }

    /// トップレベルだけを安定ソートする。サブメニューやグループの中身はそのまま
    pub fn order(&self, mut entries: Vec<MenuEntry>) -> Vec<MenuEntry> {
        entries.sort_by_key(|entry| self.rank(&entry.key));
        entries
    }
}

impl Default for MenuOrder {
    fn default() -> Self {
        MenuOrder::new(DEFAULT_MENU_ORDER.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuKind;

    fn item(key: &str) -> MenuEntry {
        MenuEntry::new(key, MenuKind::Item)
    }

    fn keys(entries: &[MenuEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn known_keys_sort_by_rank_and_unknown_last() {
        let order = MenuOrder::default();
        let sorted = order.order(vec![
            item("orders"),
            item("dashboard"),
            item("unknownX"),
            item("users"),
        ]);
        assert_eq!(keys(&sorted), vec!["dashboard", "users", "orders", "unknownX"]);
    }

    #[test]
    fn unknown_entries_keep_projected_order() {
        let order = MenuOrder::default();
        let sorted = order.order(vec![item("zeta"), item("settings"), item("alpha"), item("mid")]);
        assert_eq!(keys(&sorted), vec!["settings", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn group_is_ranked_by_group_key() {
        let order = MenuOrder::default();
        let sorted = order.order(vec![
            MenuEntry::new("permission", MenuKind::Group),
            item("settings"),
            item("dashboard"),
        ]);
        assert_eq!(keys(&sorted), vec!["dashboard", "settings", "permission"]);
    }

    #[test]
    fn nested_children_are_left_alone() {
        let mut features = MenuEntry::new("features", MenuKind::Submenu);
        features.children = vec![item("users"), item("dashboard")];
        let sorted = MenuOrder::default().order(vec![features]);
        assert_eq!(keys(&sorted[0].children), vec!["users", "dashboard"]);
    }

    #[test]
    fn custom_order_overrides_default() {
        let order = MenuOrder::new(["orders", "dashboard"]);
        let sorted = order.order(vec![item("dashboard"), item("users"), item("orders")]);
        assert_eq!(keys(&sorted), vec!["orders", "dashboard", "users"]);
    }
}
