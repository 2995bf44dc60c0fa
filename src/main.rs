// src/main.rs

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use admin_route_auth::{
    Crumb, GuardConfig, Identity, MenuEntry, MenuView, Navigation, RouteNode, RouteTable,
    breadcrumbs, derive_view, guard, is_path_reachable, open_submenu_keys,
};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "Admin Route Auth",
    version = "0.1.0",
    about = "ルートテーブルを権限・ロールで絞り込み、メニューとともに JSON 出力する CLI ツール"
)]
struct Cli {
    /// ルートテーブル (JSON ファイル、または *.routes.json を含むディレクトリ)。
    /// 省略時は組み込みテーブル
    #[arg(short = 't', long = "table", value_name = "FILE|DIR", env = "ADMIN_ROUTE_TABLE")]
    table: Option<PathBuf>,

    /// 付与する権限 (複数指定可)
    #[arg(short = 'p', long = "permission", value_name = "TOKEN")]
    permissions: Vec<String>,

    /// 付与するロール (複数指定可)
    #[arg(short = 'r', long = "role", value_name = "TOKEN")]
    roles: Vec<String>,

    /// ロールの既定権限セットを使う (admin / manager / user)
    #[arg(long = "preset", value_name = "ROLE", conflicts_with_all = ["permissions", "roles"])]
    preset: Option<String>,

    /// 未ログインとして評価する
    #[arg(long = "anonymous", conflicts_with_all = ["preset", "permissions", "roles"])]
    anonymous: bool,

    /// このパス (セグメント) に到達できるか調べる
    #[arg(long = "check-path", value_name = "SEGMENT")]
    check_path: Option<String>,

    /// この絶対パスへの遷移をガードに通す
    #[arg(long = "navigate", value_name = "PATH")]
    navigate: Option<String>,

    #[arg(long = "login-path", default_value = "/login")]
    login_path: String,

    #[arg(long = "home-path", default_value = "/dashboard")]
    home_path: String,

    /// ログフィルタ (RUST_LOG より優先)
    #[arg(long = "log", value_name = "FILTER")]
    log: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    identity: &'a Identity,
    routes: &'a [RouteNode],
    menu: &'a [MenuEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    reachable: Option<Reachability<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    navigation: Option<NavigationReport<'a>>,
}

#[derive(Serialize)]
struct Reachability<'a> {
    path: &'a str,
    reachable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NavigationReport<'a> {
    target: &'a str,
    decision: Navigation,
    open_keys: Vec<String>,
    breadcrumbs: Vec<Crumb>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // 標準出力は JSON 専用なのでログは標準エラーへ
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn identity_from(cli: &Cli) -> Identity {
    if cli.anonymous {
        Identity::anonymous()
    } else if let Some(role) = &cli.preset {
        Identity::for_role(role)
    } else {
        Identity::new(cli.permissions.iter().cloned(), cli.roles.iter().cloned())
    }
}

fn main() -> anyhow::Result<()> {
    // 1) CLI 引数をパースし、ログを初期化
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    // 2) ルートテーブルを読み込む (指定がなければ組み込み)
    let table = match &cli.table {
        Some(path) => RouteTable::load(path)
            .with_context(|| format!("loading route table from {}", path.display()))?,
        None => RouteTable::builtin(),
    };

    // 3) Identity を決めて絞り込み → メニュー生成
    let identity = identity_from(&cli);
    let MenuView {
        routes: filtered,
        menu,
    } = derive_view(&table, &identity);
    info!(
        authenticated = identity.authenticated,
        menu_entries = menu.len(),
        "derived routes and menu"
    );

    // 4) 任意の到達確認とガード判定
    let reachable = cli.check_path.as_deref().map(|path| Reachability {
        path,
        reachable: is_path_reachable(&filtered, path),
    });

    let config = GuardConfig {
        login_path: cli.login_path.clone(),
        home_path: cli.home_path.clone(),
    };
    let navigation = cli.navigate.as_deref().map(|target| NavigationReport {
        target,
        decision: guard(&filtered, &identity, target, &config),
        open_keys: open_submenu_keys(&menu, target),
        breadcrumbs: breadcrumbs(&filtered, target),
    });

    // 5) 結果を JSON 化して標準出力
    let report = Report {
        identity: &identity,
        routes: &filtered,
        menu: &menu,
        reachable,
        navigation,
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    Ok(())
}
