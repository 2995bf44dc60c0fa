// src/menu.rs
// 絞り込み済みルートからナビゲーションメニューを組み立てる

use tracing::debug;

use crate::access::{Identity, accessible_routes};
use crate::model::{MenuEntry, MenuKind, RouteNode, RoutePath, join_path};
use crate::table::RouteTable;

/// 生成途中のメニュー項目。元ノードの group 宣言を持ち回る
struct Projected {
    entry: MenuEntry,
    group: Option<GroupTag>,
}

struct GroupTag {
    key: String,
    title: Option<String>,
}

/// ルートツリーをメニューツリーへ射影する。
///
/// - hidden / index のノードは出さない
/// - `submenu` 付きで子を持つノードは折りたたみ式サブメニューになる
/// - それ以外のコンテナは子を親の階層に展開し、同じ `group` を持つ項目を
///   見出し付きグループにまとめる (グループなし項目が先、グループは初出順)
/// - 子が空になったサブメニュー・グループは出さない
///
/// 出力はツリー上の自然順であり、表示順ではない。
pub fn project_menu(filtered: &[RouteNode]) -> Vec<MenuEntry> {
    project_nodes(filtered, "/")
        .into_iter()
        .map(|p| p.entry)
        .collect()
}

fn project_nodes(nodes: &[RouteNode], base: &str) -> Vec<Projected> {
    let mut out = Vec::new();

    for node in nodes {
        // 1) 非表示と index ルートは飛ばす
        if node.meta.hidden || node.is_index() {
            continue;
        }

        let segment = match &node.path {
            RoutePath::Segment(s) => s.as_str(),
            RoutePath::CatchAll => RoutePath::CATCH_ALL,
            RoutePath::Index => continue,
        };
        let href = join_path(base, segment);

        match &node.children {
            // 2) 折りたたみ式サブメニュー
            Some(children) if node.meta.submenu => {
                let child_entries: Vec<MenuEntry> = project_nodes(children, &href)
                    .into_iter()
                    .map(|p| p.entry)
                    .collect();
                if child_entries.is_empty() {
                    debug!(path = segment, "dropping empty submenu");
                    continue;
                }
                let mut entry = leaf_entry(node, segment, &href, MenuKind::Submenu);
                entry.children = child_entries;
                out.push(Projected {
                    entry,
                    group: group_tag(node),
                });
            }
            // 3) 展開されるコンテナ。子をグループごとにまとめ直す
            Some(children) => {
                let projected = project_nodes(children, &href);
                out.extend(regroup(projected).into_iter().map(|entry| Projected {
                    entry,
                    group: None,
                }));
            }
            // 4) タイトル付きの葉
            None => {
                if node.meta.title.is_none() {
                    continue;
                }
                out.push(Projected {
                    entry: leaf_entry(node, segment, &href, MenuKind::Item),
                    group: group_tag(node),
                });
            }
        }
    }

    out
}

fn leaf_entry(node: &RouteNode, segment: &str, href: &str, kind: MenuKind) -> MenuEntry {
    let mut entry = MenuEntry::new(segment, kind);
    entry.path = Some(segment.to_string());
    entry.href = Some(href.to_string());
    entry.title = node.meta.title.clone();
    entry.icon = node.meta.icon.clone();
    entry
}

fn group_tag(node: &RouteNode) -> Option<GroupTag> {
    node.meta.group.as_ref().map(|key| GroupTag {
        key: key.clone(),
        title: node.meta.group_title.clone(),
    })
}

/// グループなしの項目を先に、続いてグループを初出順に並べる
fn regroup(projected: Vec<Projected>) -> Vec<MenuEntry> {
    let mut plain = Vec::new();
    let mut groups: Vec<MenuEntry> = Vec::new();

    for Projected { entry, group } in projected {
        match group {
            None => plain.push(entry),
            Some(tag) => {
                if let Some(existing) = groups.iter_mut().find(|g| g.key == tag.key) {
                    existing.children.push(entry);
                } else {
                    let mut group = MenuEntry::new(tag.key.clone(), MenuKind::Group);
                    group.title = Some(tag.title.unwrap_or(tag.key));
                    group.children.push(entry);
                    groups.push(group);
                }
            }
        }
    }

    plain.extend(groups.into_iter().filter(|g| !g.children.is_empty()));
    plain
}

/// ある Identity から見えるルートとメニューの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    /// 絞り込み済みルート (ガード・到達確認・パンくずに使う)
    pub routes: Vec<RouteNode>,
    /// 表示順に並べたメニュー
    pub menu: Vec<MenuEntry>,
}

/// 絞り込み → 射影 → 並べ替えを一度に行う
pub fn derive_view(table: &RouteTable, identity: &Identity) -> MenuView {
    let routes = accessible_routes(table, identity);
    let menu = table.menu_order().order(project_menu(&routes));
    debug!(entries = menu.len(), "built navigation menu");
    MenuView { routes, menu }
}

/// 最終メニューだけが欲しいとき
pub fn build_menu(table: &RouteTable, identity: &Identity) -> Vec<MenuEntry> {
    derive_view(table, identity).menu
}
