// src/resolver.rs

use path_absolutize::Absolutize;
use tracing::{debug, warn};

use std::path::{Path, PathBuf};

use crate::error::{RouteTableError, RouteTableResult};
use crate::model::{RouteNode, RoutePath};
use crate::parser::{RawRoute, parse_routes_in_file};

/// `include` に書かれた相対パスを、それを含むファイル (`parent_file`) の
/// ディレクトリを基準にして絶対パスへ解決する。
///
/// 例: parent_file = /proj/routes/app.routes.json, include = "./features.routes.json"
///     → /proj/routes/features.routes.json
pub fn resolve_include_path(include: &str, parent_file: &Path) -> RouteTableResult<PathBuf> {
    let parent_dir = parent_file.parent().unwrap_or_else(|| Path::new("."));
    let candidate = parent_dir.join(include);
    let abs = candidate
        .absolutize()
        .map_err(|source| RouteTableError::Io {
            path: candidate.clone(),
            source,
        })?
        .to_path_buf();
    Ok(abs)
}

/// ファイルを読み込み、include をたどりながら RouteNode のツリーに変換する
///
/// 戻り値はトップレベルのルートとファイルが宣言したメニュー順。
pub fn load_routes_file(
    file_path: &Path,
) -> RouteTableResult<(Vec<RouteNode>, Option<Vec<String>>)> {
    let abs = file_path
        .absolutize()
        .map_err(|source| RouteTableError::Io {
            path: file_path.to_path_buf(),
            source,
        })?
        .to_path_buf();
    let mut stack = vec![abs.clone()];
    let parsed = parse_routes_in_file(&abs)?;
    let routes = convert_routes(parsed.routes, &abs, "", &mut stack)?;
    Ok((routes, parsed.menu_order))
}

/// include 先のファイルを読み込む。`stack` は読み込み中のファイル列 (循環検出用)
fn load_included(
    include: &str,
    parent_file: &Path,
    location: &str,
    stack: &mut Vec<PathBuf>,
) -> RouteTableResult<Vec<RouteNode>> {
    let child_file = resolve_include_path(include, parent_file)?;
    if stack.contains(&child_file) {
        return Err(RouteTableError::IncludeCycle { path: child_file });
    }

    debug!(
        from = %parent_file.display(),
        include = %child_file.display(),
        "resolving route include"
    );

    let parsed = parse_routes_in_file(&child_file)?;
    if parsed.menu_order.is_some() {
        warn!(
            file = %child_file.display(),
            "menuOrder in an included file is ignored"
        );
    }

    stack.push(child_file.clone());
    let routes = convert_routes(parsed.routes, &child_file, location, stack);
    stack.pop();
    routes
}

fn convert_routes(
    raws: Vec<RawRoute>,
    source_file: &Path,
    parent_location: &str,
    stack: &mut Vec<PathBuf>,
) -> RouteTableResult<Vec<RouteNode>> {
    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| convert_route(raw, i, source_file, parent_location, stack))
        .collect()
}

/// 1 つの RawRoute を RouteNode に変換する。形の不正はここで拒否する
fn convert_route(
    raw: RawRoute,
    position: usize,
    source_file: &Path,
    parent_location: &str,
    stack: &mut Vec<PathBuf>,
) -> RouteTableResult<RouteNode> {
    let label = raw.path.clone().unwrap_or_else(|| format!("#{position}"));
    let location = if parent_location.is_empty() {
        format!("{}:{label}", source_file.display())
    } else {
        format!("{parent_location}/{label}")
    };

    // 1) index ルートはパスも子も持たない
    if raw.index {
        if raw.path.is_some() {
            return Err(RouteTableError::IndexWithPath { location });
        }
        if raw.children.is_some() || raw.include.is_some() {
            return Err(RouteTableError::IndexWithChildren { location });
        }
        return Ok(RouteNode::index(raw.meta));
    }

    // 2) それ以外はパスが必須
    let path = match raw.path {
        Some(p) if p.trim().is_empty() => {
            return Err(RouteTableError::EmptySegment { location });
        }
        Some(p) => RoutePath::from_segment(p),
        None => return Err(RouteTableError::MissingPath { location }),
    };

    // 3) children と include を順に結合する
    let mut children: Option<Vec<RouteNode>> = match raw.children {
        Some(raws) => Some(convert_routes(raws, source_file, &location, stack)?),
        None => None,
    };
    if let Some(include) = &raw.include {
        let included = load_included(include, source_file, &location, stack)?;
        children.get_or_insert_with(Vec::new).extend(included);
    }

    Ok(RouteNode {
        path,
        children,
        meta: raw.meta,
    })
}
