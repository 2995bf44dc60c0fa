// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// ルートテーブルの読み込み・検証で発生するエラー
///
/// どれか 1 つでも発生したらテーブル全体を拒否する。
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("failed to read route table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse route table {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("route at {location} has no path and is not an index route")]
    MissingPath { location: String },

    #[error("index route at {location} must not declare a path")]
    IndexWithPath { location: String },

    #[error("index route at {location} must not have children")]
    IndexWithChildren { location: String },

    #[error("route at {location} has an empty path segment")]
    EmptySegment { location: String },

    #[error("duplicate route '{segment}' under {parent}")]
    DuplicateSegment { parent: String, segment: String },

    #[error("more than one index route under {parent}")]
    DuplicateIndex { parent: String },

    #[error("include cycle detected at {path}")]
    IncludeCycle { path: PathBuf },

    #[error("no *.routes.json files found under {dir}")]
    NoRouteFiles { dir: PathBuf },
}

pub type RouteTableResult<T> = Result<T, RouteTableError>;
