// src/access.rs
// 権限・ロールによるルートの絞り込み
//
// すべて純粋関数で、共有のルートテーブルは変更せずに新しいツリーを返す。

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::model::{RouteNode, RoutePath};
use crate::table::RouteTable;

/// 全権限 (admin プリセット)
pub const ALL_PERMISSIONS: &[&str] = &[
    "dashboard",
    "user_management",
    "order_management",
    "feature_collection",
    "system_settings",
    "role_management",
    "permission_management",
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "dashboard",
    "user_management",
    "order_management",
    "feature_collection",
];

const USER_PERMISSIONS: &[&str] = &["dashboard", "user_management", "feature_collection"];

/// 呼び出し元のセッション情報。グローバル状態ではなく引数として渡す
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub authenticated: bool,
    pub permissions: BTreeSet<String>,
    pub roles: BTreeSet<String>,
}

impl Identity {
    /// 未ログイン
    pub fn anonymous() -> Self {
        Identity::default()
    }

    /// ログイン済みで、権限とロールを明示する
    pub fn new<P, R>(permissions: P, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Identity {
            authenticated: true,
            permissions: permissions.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// ロール名からコンソール既定の権限セットを割り当てる。
    /// 未知のロールは user と同じ権限になる
    pub fn for_role(role: &str) -> Self {
        let permissions = match role {
            "admin" => ALL_PERMISSIONS,
            "manager" => MANAGER_PERMISSIONS,
            _ => USER_PERMISSIONS,
        };
        Identity::new(permissions.iter().copied(), [role])
    }

    pub fn has_permission(&self, token: &str) -> bool {
        has_permission(&self.permissions, token)
    }

    pub fn has_role(&self, token: &str) -> bool {
        has_role(&self.roles, token)
    }
}

pub fn has_permission(permissions: &BTreeSet<String>, token: &str) -> bool {
    permissions.contains(token)
}

pub fn has_role(roles: &BTreeSet<String>, token: &str) -> bool {
    roles.contains(token)
}

/// 1 ノード自身の検査。権限は OR、ロールも OR、両方あれば AND
fn node_passes(node: &RouteNode, permissions: &BTreeSet<String>, roles: &BTreeSet<String>) -> bool {
    let meta = &node.meta;
    if !meta.require_auth {
        return true;
    }
    if !meta.permissions.is_empty() && !meta.permissions.iter().any(|p| permissions.contains(p)) {
        return false;
    }
    if !meta.roles.is_empty() && !meta.roles.iter().any(|r| roles.contains(r)) {
        return false;
    }
    true
}

/// ルートツリーを権限・ロールで再帰的に絞り込む。
///
/// 不合格のノードは子孫ごと取り除く。合格したノードの子は再帰的に
/// 絞り込み、空になっても空配列として残す (空のコンテナを落とすのは
/// メニュー生成側の責務)。兄弟の順序は入力どおり。
pub fn filter_routes(
    routes: &[RouteNode],
    permissions: &BTreeSet<String>,
    roles: &BTreeSet<String>,
) -> Vec<RouteNode> {
    routes
        .iter()
        .filter(|node| node_passes(node, permissions, roles))
        .map(|node| RouteNode {
            path: node.path.clone(),
            children: node
                .children
                .as_ref()
                .map(|children| filter_routes(children, permissions, roles)),
            meta: node.meta.clone(),
        })
        .collect()
}

/// 未ログイン時の入口。トップレベルで requireAuth のないルートだけを残す
pub fn public_routes(routes: &[RouteNode]) -> Vec<RouteNode> {
    routes
        .iter()
        .filter(|node| !node.meta.require_auth)
        .cloned()
        .collect()
}

/// Identity に応じて絞り込み方を選ぶ
pub fn accessible_routes(table: &RouteTable, identity: &Identity) -> Vec<RouteNode> {
    let routes = if identity.authenticated {
        filter_routes(table.routes(), &identity.permissions, &identity.roles)
    } else {
        public_routes(table.routes())
    };
    debug!(
        authenticated = identity.authenticated,
        permissions = identity.permissions.len(),
        roles = identity.roles.len(),
        top_level = routes.len(),
        "filtered route table"
    );
    routes
}

/// 絞り込み済みツリーに `path` と一致するノードがあるか。
/// アクセス規則の再検査ではなく単なる存在確認
pub fn is_path_reachable(filtered: &[RouteNode], path: &str) -> bool {
    filtered.iter().any(|node| {
        let matches = match &node.path {
            RoutePath::Segment(s) => s == path,
            RoutePath::CatchAll => path == RoutePath::CATCH_ALL,
            RoutePath::Index => false,
        };
        matches || is_path_reachable(node.children(), path)
    })
}
