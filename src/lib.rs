// src/lib.rs
// 管理コンソールのルート権限・メニュー導出
//
// 宣言的なルートテーブルを呼び出し元の権限・ロールで絞り込み、
// そこからナビゲーションメニューを組み立てる。
//
//   RouteTable → filter_routes → project_menu → MenuOrder::order → UI
//                     └→ is_path_reachable / guard / breadcrumbs

pub mod access;
pub mod error;
pub mod menu;
pub mod model;
pub mod navigation;
pub mod ordering;
pub mod parser;
pub mod resolver;
pub mod table;

pub use access::{
    Identity, accessible_routes, filter_routes, has_permission, has_role, is_path_reachable,
    public_routes,
};
pub use error::{RouteTableError, RouteTableResult};
pub use menu::{MenuView, build_menu, derive_view, project_menu};
pub use model::{Crumb, MenuEntry, MenuKind, RouteMeta, RouteNode, RoutePath};
pub use navigation::{
    GuardConfig, Navigation, breadcrumbs, guard, open_submenu_keys, resolve_route,
};
pub use ordering::MenuOrder;
pub use table::RouteTable;
