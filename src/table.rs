// src/table.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{RouteTableError, RouteTableResult};
use crate::model::{RouteMeta, RouteNode, RoutePath, join_path};
use crate::ordering::MenuOrder;
use crate::resolver::load_routes_file;

/// ディレクトリ読み込み時に対象とするファイル名の末尾
pub const ROUTE_FILE_SUFFIX: &str = ".routes.json";

/// 起動時に一度だけ組み立て、その後は読み取り専用のルートテーブル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
    menu_order: MenuOrder,
}

impl RouteTable {
    /// 形を検証してからテーブルを作る。不正があれば全体を拒否する
    pub fn new(routes: Vec<RouteNode>, menu_order: MenuOrder) -> RouteTableResult<Self> {
        validate_level(&routes, "/")?;
        Ok(RouteTable { routes, menu_order })
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn menu_order(&self) -> &MenuOrder {
        &self.menu_order
    }

    /// ファイルまたはディレクトリからテーブルを読み込む
    pub fn load(path: &Path) -> RouteTableResult<Self> {
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            let (routes, menu_order) = load_routes_file(path)?;
            info!(file = %path.display(), routes = routes.len(), "loaded route table");
            Self::new(routes, menu_order.map(MenuOrder::new).unwrap_or_default())
        }
    }

    /// ディレクトリ配下の `*.routes.json` をすべて読み込み、パス順に連結する
    pub fn load_dir(dir: &Path) -> RouteTableResult<Self> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file()
                    && e
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.ends_with(ROUTE_FILE_SUFFIX))
            })
            .map(|e| e.into_path())
            .collect();

        if files.is_empty() {
            return Err(RouteTableError::NoRouteFiles {
                dir: dir.to_path_buf(),
            });
        }

        // 重複を除去
        files.sort();
        files.dedup();

        let mut routes = Vec::new();
        let mut menu_order: Option<MenuOrder> = None;
        for file in &files {
            let (file_routes, file_order) = load_routes_file(file)?;
            debug!(file = %file.display(), routes = file_routes.len(), "merged route file");
            if let Some(order) = file_order {
                if menu_order.is_some() {
                    warn!(file = %file.display(), "menuOrder already declared, ignoring");
                } else {
                    menu_order = Some(MenuOrder::new(order));
                }
            }
            routes.extend(file_routes);
        }

        info!(
            dir = %dir.display(),
            files = files.len(),
            routes = routes.len(),
            "loaded route table directory"
        );
        Self::new(routes, menu_order.unwrap_or_default())
    }

    /// 管理コンソール既定のルートテーブル
    pub fn builtin() -> Self {
        RouteTable {
            routes: builtin_routes(),
            menu_order: MenuOrder::default(),
        }
    }
}

/// 兄弟間のセグメント重複・index 重複を検査し、子へ再帰する
fn validate_level(nodes: &[RouteNode], parent: &str) -> RouteTableResult<()> {
    let mut seen: HashSet<&RoutePath> = HashSet::new();
    for node in nodes {
        if let RoutePath::Segment(s) = &node.path
            && s.trim().is_empty()
        {
            return Err(RouteTableError::EmptySegment {
                location: parent.to_string(),
            });
        }
        if node.is_index() && node.children.is_some() {
            return Err(RouteTableError::IndexWithChildren {
                location: parent.to_string(),
            });
        }
        if !seen.insert(&node.path) {
            return Err(match &node.path {
                RoutePath::Index => RouteTableError::DuplicateIndex {
                    parent: parent.to_string(),
                },
                other => RouteTableError::DuplicateSegment {
                    parent: parent.to_string(),
                    segment: other.as_segment().unwrap_or(RoutePath::CATCH_ALL).to_string(),
                },
            });
        }
        if let Some(children) = &node.children {
            let here = match &node.path {
                RoutePath::Segment(s) => join_path(parent, s),
                _ => parent.to_string(),
            };
            validate_level(children, &here)?;
        }
    }
    Ok(())
}

fn page(title: &str, icon: &str, permissions: &[&str], roles: &[&str]) -> RouteMeta {
    RouteMeta {
        title: Some(title.to_string()),
        icon: Some(icon.to_string()),
        require_auth: true,
        permissions: permissions.iter().map(|s| s.to_string()).collect(),
        roles: roles.iter().map(|s| s.to_string()).collect(),
        ..RouteMeta::default()
    }
}

fn in_group(mut meta: RouteMeta, group: &str, title: &str) -> RouteMeta {
    meta.group = Some(group.to_string());
    meta.group_title = Some(title.to_string());
    meta
}

fn builtin_routes() -> Vec<RouteNode> {
    let layout = RouteMeta {
        title: Some("主布局".to_string()),
        require_auth: true,
        ..RouteMeta::default()
    };
    let home_redirect = RouteMeta {
        hidden: true,
        redirect: Some("/dashboard".to_string()),
        ..RouteMeta::default()
    };
    let features = RouteMeta {
        submenu: true,
        ..page("功能集合", "fas fa-puzzle-piece", &["feature_collection"], &[])
    };

    vec![
        RouteNode::segment("/", layout).with_children(vec![
            RouteNode::index(home_redirect),
            RouteNode::segment(
                "dashboard",
                page("仪表盘", "fas fa-tachometer-alt", &["dashboard"], &[]),
            ),
            RouteNode::segment(
                "users",
                page("用户管理", "fas fa-users", &["user_management"], &[]),
            ),
            RouteNode::segment(
                "orders",
                page("订单管理", "fas fa-shopping-cart", &["order_management"], &[]),
            ),
            RouteNode::segment(
                "settings",
                page("系统设置", "fas fa-cog", &["system_settings"], &["admin"]),
            ),
            RouteNode::segment("features", features).with_children(vec![
                RouteNode::segment(
                    "feature1",
                    page("功能1", "fas fa-star", &["feature_collection"], &[]),
                ),
                RouteNode::segment(
                    "feature2",
                    page("功能2", "fas fa-rocket", &["feature_collection"], &[]),
                ),
            ]),
            RouteNode::segment(
                "roles",
                in_group(
                    page("角色管理", "fas fa-key", &["role_management"], &["admin"]),
                    "permission",
                    "权限管理",
                ),
            ),
            RouteNode::segment(
                "permissions",
                in_group(
                    page(
                        "权限配置",
                        "fas fa-shield-alt",
                        &["permission_management"],
                        &["admin"],
                    ),
                    "permission",
                    "权限管理",
                ),
            ),
        ]),
        RouteNode::segment(
            "login",
            RouteMeta {
                title: Some("用户登录".to_string()),
                hidden: true,
                ..RouteMeta::default()
            },
        ),
        RouteNode::segment(
            "*",
            RouteMeta {
                title: Some("404".to_string()),
                icon: Some("fas fa-exclamation-triangle".to_string()),
                hidden: true,
                ..RouteMeta::default()
            },
        ),
    ]
}
