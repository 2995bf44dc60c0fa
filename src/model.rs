// src/model.rs
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

/// ルートノードのパス種別
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutePath {
    /// 通常のパスセグメント (例: "dashboard", "/")
    Segment(String),
    /// 親のパスそのものに描画される index ルート
    Index,
    /// どこにもマッチしなかったパスを受け止める "*" ルート
    CatchAll,
}

impl RoutePath {
    pub const CATCH_ALL: &'static str = "*";

    /// 設定ファイル上の文字列から種別を決める ("*" だけは特別扱い)
    pub fn from_segment(segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if segment == Self::CATCH_ALL {
            RoutePath::CatchAll
        } else {
            RoutePath::Segment(segment)
        }
    }

    pub fn as_segment(&self) -> Option<&str> {
        match self {
            RoutePath::Segment(s) => Some(s),
            RoutePath::Index | RoutePath::CatchAll => None,
        }
    }
}

/// パンくずリストの 1 要素 (`path` が "#" ならリンクなし)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub title: String,
    pub path: String,
}

impl Crumb {
    pub const NO_LINK: &'static str = "#";

    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Crumb {
            title: title.into(),
            path: path.into(),
        }
    }
}

/// ルートに付与するアクセス制御・表示用メタ情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// false のノードは権限・ロールの検査をすり抜ける
    pub require_auth: bool,
    /// いずれか 1 つを持っていれば通過 (OR)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    /// いずれか 1 つを持っていれば通過 (OR)。空なら制限なし
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// メニューには出さないがパスでは到達できる
    pub hidden: bool,
    /// 子をまとめて折りたたみ式のサブメニューにする
    pub submenu: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
    /// index ルートなどで別パスへ転送する場合の転送先
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// 明示的なパンくず。空ならルートの祖先から導出する
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breadcrumb: Vec<Crumb>,
}

impl RouteMeta {
    /// 権限もロールも宣言していない (= 認証済みなら誰でも通れる) か
    pub fn declares_no_tokens(&self) -> bool {
        self.permissions.is_empty() && self.roles.is_empty()
    }
}

/// ルートテーブルを構成する 1 ノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNode {
    pub path: RoutePath,

    /// 子ルート。葉なら None、空配列とは区別する
    pub children: Option<Vec<RouteNode>>,

    pub meta: RouteMeta,
}

/// 入力ファイルと同じ形 (`path` か `index: true`) で書き出す
impl Serialize for RouteNode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RouteNode", 3)?;
        match &self.path {
            RoutePath::Segment(s) => state.serialize_field("path", s)?,
            RoutePath::CatchAll => state.serialize_field("path", RoutePath::CATCH_ALL)?,
            RoutePath::Index => state.serialize_field("index", &true)?,
        }
        if let Some(children) = &self.children {
            state.serialize_field("children", children)?;
        }
        state.serialize_field("meta", &self.meta)?;
        state.end()
    }
}

impl RouteNode {
    pub fn segment(path: impl Into<String>, meta: RouteMeta) -> Self {
        RouteNode {
            path: RoutePath::from_segment(path),
            children: None,
            meta,
        }
    }

    pub fn index(meta: RouteMeta) -> Self {
        RouteNode {
            path: RoutePath::Index,
            children: None,
            meta,
        }
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn is_index(&self) -> bool {
        self.path == RoutePath::Index
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn children(&self) -> &[RouteNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// メニュー項目の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuKind {
    /// 通常のリンク
    Item,
    /// 折りたたみ式のサブメニュー
    Submenu,
    /// 同じ group キーを持つ兄弟をまとめた見出し付きグループ
    Group,
}

/// ナビゲーション UI に渡すメニュー項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub key: String,
    /// ルートテーブル上のセグメント (グループでは None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 祖先のセグメントを連結した絶対パス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub kind: MenuKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
    pub is_submenu: bool,
    pub is_group: bool,
}

impl MenuEntry {
    pub fn new(key: impl Into<String>, kind: MenuKind) -> Self {
        MenuEntry {
            key: key.into(),
            path: None,
            href: None,
            title: None,
            icon: None,
            kind,
            children: Vec::new(),
            is_submenu: kind == MenuKind::Submenu,
            is_group: kind == MenuKind::Group,
        }
    }
}

/// パスセグメントを連結して絶対パスにする ("/" + "dashboard" → "/dashboard")
pub fn join_path(base: &str, segment: &str) -> String {
    if segment.starts_with('/') {
        return segment.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{segment}")
    } else {
        format!("{base}/{segment}")
    }
}
