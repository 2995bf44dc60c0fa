// src/navigation.rs
// ルートガード: 遷移要求を絞り込み済みツリーに照らして許可・転送する

use serde::Serialize;
use tracing::debug;

use crate::access::Identity;
use crate::model::{Crumb, MenuEntry, RouteNode, RoutePath, join_path};

/// ガードが使う固定パス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// 未ログイン時の転送先
    pub login_path: String,
    /// ログイン済みでログイン画面に来たときの転送先
    pub home_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

/// 遷移要求に対する判定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Navigation {
    /// 該当ページをマウントしてよい
    Mount { path: String },
    /// 別のパスへ転送する
    Redirect { to: String },
    /// 到達できるルートがない (呼び出し側は "*" ページを出す)
    NotFound,
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// 解決経路上の 1 ノードとその絶対パス
struct Step<'a> {
    node: &'a RouteNode,
    href: String,
}

/// 絶対パスを絞り込み済みツリー上のノードに解決する。
/// 完全一致したコンテナは index 子ルートに解決される
pub fn resolve_route<'a>(filtered: &'a [RouteNode], target: &str) -> Option<&'a RouteNode> {
    let mut chain = Vec::new();
    if resolve_chain(filtered, "/", normalize(target), &mut chain) {
        chain.last().map(|step| step.node)
    } else {
        None
    }
}

/// `target` までの祖先列を `chain` に積む。見つからなければ false
fn resolve_chain<'a>(
    nodes: &'a [RouteNode],
    base: &str,
    target: &str,
    chain: &mut Vec<Step<'a>>,
) -> bool {
    for node in nodes {
        let RoutePath::Segment(segment) = &node.path else {
            continue;
        };
        let full = join_path(base, segment);
        let full_norm = normalize(&full).to_string();

        if full_norm == target {
            chain.push(Step {
                node,
                href: full_norm.clone(),
            });
            if let Some(index) = node.children().iter().find(|c| c.is_index()) {
                chain.push(Step {
                    node: index,
                    href: full_norm,
                });
            }
            return true;
        }

        if node.children.is_some() {
            let inside = full_norm == "/" || target.starts_with(&format!("{full_norm}/"));
            if inside {
                chain.push(Step {
                    node,
                    href: full_norm,
                });
                if resolve_chain(node.children(), &full, target, chain) {
                    return true;
                }
                chain.pop();
            }
        }
    }
    false
}

/// `target` のパンくずリスト。
///
/// 対象ルートが `meta.breadcrumb` を宣言していればそれを使い、なければ
/// 祖先のタイトルから導出する。index 子を持たないコンテナと group 見出しは
/// リンクなし ("#") になる。解決できなければ空
pub fn breadcrumbs(filtered: &[RouteNode], target: &str) -> Vec<Crumb> {
    let mut chain = Vec::new();
    if !resolve_chain(filtered, "/", normalize(target), &mut chain) {
        return Vec::new();
    }

    if let Some(step) = chain.iter().rev().find(|step| !step.node.is_index())
        && !step.node.meta.breadcrumb.is_empty()
    {
        return step.node.meta.breadcrumb.clone();
    }

    let mut crumbs = Vec::new();
    for step in chain.iter().filter(|step| !step.node.is_index()) {
        let meta = &step.node.meta;
        if let Some(group_title) = &meta.group_title {
            crumbs.push(Crumb::new(group_title.clone(), Crumb::NO_LINK));
        }
        let Some(title) = &meta.title else {
            continue;
        };
        let linkable = step.node.is_leaf() || step.node.children().iter().any(|c| c.is_index());
        let path = if linkable {
            step.href.clone()
        } else {
            Crumb::NO_LINK.to_string()
        };
        crumbs.push(Crumb::new(title.clone(), path));
    }
    crumbs
}

/// 遷移要求を判定する
pub fn guard(
    filtered: &[RouteNode],
    identity: &Identity,
    target: &str,
    config: &GuardConfig,
) -> Navigation {
    let target = normalize(target);
    let login_path = normalize(&config.login_path);
    let home_path = normalize(&config.home_path);

    // 1) 未ログインはログイン画面以外すべて転送
    if !identity.authenticated && target != login_path {
        debug!(target, "unauthenticated navigation redirected to login");
        return Navigation::Redirect {
            to: login_path.to_string(),
        };
    }

    // 2) ログイン済みでログイン画面に来たらホームへ
    if identity.authenticated && target == login_path {
        return Navigation::Redirect {
            to: home_path.to_string(),
        };
    }

    // 3) ツリー上で解決できるか
    match resolve_route(filtered, target) {
        Some(node) => match &node.meta.redirect {
            Some(to) => Navigation::Redirect { to: to.clone() },
            None => Navigation::Mount {
                path: target.to_string(),
            },
        },
        None => {
            debug!(target, "no reachable route");
            Navigation::NotFound
        }
    }
}

/// 現在のパスが 2 階層以上で、先頭セグメントに対応するサブメニューが
/// トップレベルにあれば、そのキーを展開状態として返す
pub fn open_submenu_keys(menu: &[MenuEntry], current_path: &str) -> Vec<String> {
    let segments: Vec<&str> = current_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 1 {
        return Vec::new();
    }
    let parent = format!("/{}", segments[0]);
    menu.iter()
        .filter(|entry| entry.is_submenu && entry.href.as_deref() == Some(parent.as_str()))
        .map(|_| parent.clone())
        .take(1)
        .collect()
}
