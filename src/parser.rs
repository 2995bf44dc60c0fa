// src/parser.rs

use serde::Deserialize;
use tracing::debug;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RouteTableError, RouteTableResult};
use crate::model::RouteMeta;

/// JSON 上のルート定義をそのまま受け取る中間表現
///
/// 例: `{ "path": "features", "meta": { "submenu": true }, "include": "./features.routes.json" }`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawRoute {
    /// ルートのパス ("dashboard", "/", "*" など)。index ルートでは省略
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub index: bool,

    #[serde(default)]
    pub children: Option<Vec<RawRoute>>,

    /// 子ルートを別ファイルから読み込む場合の相対パス
    #[serde(default)]
    pub include: Option<String>,

    #[serde(default)]
    pub meta: RouteMeta,
}

/// ファイルのトップレベルは配列か、メニュー順を伴うオブジェクトのどちらか
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTable {
    Routes(Vec<RawRoute>),
    #[serde(rename_all = "camelCase")]
    Document {
        #[serde(default)]
        menu_order: Option<Vec<String>>,
        routes: Vec<RawRoute>,
    },
}

/// 1 ファイル分の解析結果
#[derive(Debug)]
pub struct ParsedFile {
    /// このルート定義が書かれているファイルへのパス
    pub source_file: PathBuf,
    pub routes: Vec<RawRoute>,
    pub menu_order: Option<Vec<String>>,
}

/// 文字列としてのルートテーブルを解析する (ファイル名はエラー表示用)
pub fn parse_routes_str(src: &str, source_file: &Path) -> RouteTableResult<ParsedFile> {
    let raw: RawTable = serde_json::from_str(src).map_err(|source| RouteTableError::Json {
        path: source_file.to_path_buf(),
        source,
    })?;

    let (routes, menu_order) = match raw {
        RawTable::Routes(routes) => (routes, None),
        RawTable::Document { menu_order, routes } => (routes, menu_order),
    };

    Ok(ParsedFile {
        source_file: source_file.to_path_buf(),
        routes,
        menu_order,
    })
}

pub fn parse_routes_in_file(file_path: &Path) -> RouteTableResult<ParsedFile> {
    debug!(file = %file_path.display(), "parsing route table");

    let src = fs::read_to_string(file_path).map_err(|source| RouteTableError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;

    let parsed = parse_routes_str(&src, file_path)?;
    debug!(
        file = %file_path.display(),
        routes = parsed.routes.len(),
        has_menu_order = parsed.menu_order.is_some(),
        "route table parsed"
    );
    Ok(parsed)
}
