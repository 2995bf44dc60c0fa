//! ルート絞り込み・メニュー生成のプロパティテスト
//!
//! 任意のルートツリーと権限セットに対して次が成り立つことを確かめる:
//!
//! 1. 同じ入力なら同じ結果 (冪等)
//! 2. 権限・ロールを増やしても消えるノードはない (単調)
//! 3. 空の権限・ロールでは、トークンを宣言した requireAuth ノードは残らない
//! 4. 兄弟の相対順序は宣言順のまま
//! 5. 空のサブメニュー・グループは出力されない
//! 6. 並べ替えは入力の並べ替え (要素の増減なし)

use std::collections::BTreeSet;

use admin_route_auth::{
    MenuEntry, MenuKind, MenuOrder, RouteMeta, RouteNode, RoutePath, filter_routes, project_menu,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const PERMISSIONS: &[&str] = &["dashboard", "user_management", "system_settings", "feature_collection"];
const ROLES: &[&str] = &["admin", "manager", "user"];
const GROUPS: &[&str] = &["permission", "reports"];

fn permission_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(PERMISSIONS).prop_map(str::to_string)
}

fn role_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(ROLES).prop_map(str::to_string)
}

fn meta_strategy() -> impl Strategy<Value = RouteMeta> {
    (
        any::<bool>(),
        prop::collection::vec(permission_strategy(), 0..3),
        prop::collection::vec(role_strategy(), 0..2),
        prop::bool::weighted(0.15),
        any::<bool>(),
        prop::option::weighted(0.3, prop::sample::select(GROUPS)),
    )
        .prop_map(|(require_auth, permissions, roles, hidden, submenu, group)| RouteMeta {
            title: Some("title".to_string()),
            require_auth,
            permissions,
            roles,
            hidden,
            submenu,
            group: group.map(str::to_string),
            group_title: group.map(|g| format!("{g} title")),
            ..RouteMeta::default()
        })
}

/// 兄弟間で一意な名前 (n0, n1, ...) を振り直す
fn renumber(mut nodes: Vec<RouteNode>) -> Vec<RouteNode> {
    for (i, node) in nodes.iter_mut().enumerate() {
        node.path = RoutePath::Segment(format!("n{i}"));
    }
    nodes
}

fn node_strategy() -> impl Strategy<Value = RouteNode> {
    let leaf = meta_strategy().prop_map(|meta| RouteNode::segment("leaf", meta));
    leaf.prop_recursive(3, 32, 4, |inner| {
        (meta_strategy(), prop::collection::vec(inner, 0..4)).prop_map(|(meta, children)| {
            RouteNode::segment("node", meta).with_children(renumber(children))
        })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<RouteNode>> {
    prop::collection::vec(node_strategy(), 0..5).prop_map(renumber)
}

fn token_set(pool: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(prop::sample::select(pool).prop_map(str::to_string), 0..=pool.len())
}

/// ツリー上のすべてのノードの絶対パス
fn all_paths(nodes: &[RouteNode], base: &str, out: &mut BTreeSet<String>) {
    for node in nodes {
        let name = node.path.as_segment().unwrap_or("?");
        let full = format!("{base}/{name}");
        out.insert(full.clone());
        all_paths(node.children(), &full, out);
    }
}

fn paths_of(nodes: &[RouteNode]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    all_paths(nodes, "", &mut out);
    out
}

fn sibling_indices_increase(nodes: &[RouteNode]) -> bool {
    let indices: Vec<usize> = nodes
        .iter()
        .filter_map(|n| n.path.as_segment())
        .filter_map(|s| s.trim_start_matches('n').parse().ok())
        .collect();
    indices.windows(2).all(|w| w[0] < w[1])
        && nodes.iter().all(|n| sibling_indices_increase(n.children()))
}

fn no_gated_tokens(nodes: &[RouteNode]) -> bool {
    nodes.iter().all(|n| {
        (!n.meta.require_auth || n.meta.declares_no_tokens()) && no_gated_tokens(n.children())
    })
}

fn no_empty_containers(entries: &[MenuEntry]) -> bool {
    entries.iter().all(|e| match e.kind {
        MenuKind::Item => e.children.is_empty(),
        MenuKind::Submenu | MenuKind::Group => {
            !e.children.is_empty() && no_empty_containers(&e.children)
        }
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. 冪等
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filtering_is_deterministic(
        routes in forest_strategy(),
        permissions in token_set(PERMISSIONS),
        roles in token_set(ROLES),
    ) {
        let first = filter_routes(&routes, &permissions, &roles);
        let second = filter_routes(&routes, &permissions, &roles);
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. 単調
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn more_tokens_never_hide_routes(
        routes in forest_strategy(),
        p1 in token_set(PERMISSIONS),
        p_extra in token_set(PERMISSIONS),
        r1 in token_set(ROLES),
        r_extra in token_set(ROLES),
    ) {
        let p2: BTreeSet<String> = p1.union(&p_extra).cloned().collect();
        let r2: BTreeSet<String> = r1.union(&r_extra).cloned().collect();

        let narrow = paths_of(&filter_routes(&routes, &p1, &r1));
        let wide = paths_of(&filter_routes(&routes, &p2, &r2));
        prop_assert!(narrow.is_subset(&wide), "narrow={:?} wide={:?}", narrow, wide);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. 空の権限は閉じる
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_identity_fails_closed(routes in forest_strategy()) {
        let filtered = filter_routes(&routes, &BTreeSet::new(), &BTreeSet::new());
        prop_assert!(no_gated_tokens(&filtered));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. 兄弟順序の保存
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sibling_order_is_preserved(
        routes in forest_strategy(),
        permissions in token_set(PERMISSIONS),
        roles in token_set(ROLES),
    ) {
        let filtered = filter_routes(&routes, &permissions, &roles);
        prop_assert!(sibling_indices_increase(&filtered));
        prop_assert!(paths_of(&filtered).is_subset(&paths_of(&routes)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. 空コンテナなし
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn projection_never_emits_empty_containers(
        routes in forest_strategy(),
        permissions in token_set(PERMISSIONS),
        roles in token_set(ROLES),
    ) {
        let menu = project_menu(&filter_routes(&routes, &permissions, &roles));
        prop_assert!(no_empty_containers(&menu));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. 並べ替えは要素を保つ
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ordering_is_a_stable_permutation(routes in forest_strategy()) {
        let menu = project_menu(&routes);
        let ordered = MenuOrder::default().order(menu.clone());
        prop_assert_eq!(ordered.len(), menu.len());

        let mut before: Vec<&str> = menu.iter().map(|e| e.key.as_str()).collect();
        let mut after: Vec<&str> = ordered.iter().map(|e| e.key.as_str()).collect();
        // 表にないキーだけを取り出すと、元の順序のまま
        let order = MenuOrder::default();
        let unknown_before: Vec<&str> =
            before.iter().copied().filter(|k| order.rank(k) == usize::MAX).collect();
        let unknown_after: Vec<&str> =
            after.iter().copied().filter(|k| order.rank(k) == usize::MAX).collect();
        prop_assert_eq!(unknown_before, unknown_after);

        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }
}
