//! gcloudctx - gcloud の構成を素早く切り替えるCLIツール
//!
//! kubectx と同じ感覚で gcloud の構成（configuration）を切り替える。
//!
//! # 機能
//!
//! - **切り替え**: 名前指定、`-` による直前の構成への切り戻し、fzf による対話選択
//! - **ディレクトリ設定**: `.gcloudctx` ファイルによるディレクトリ単位の構成指定
//! - **構成管理**: 作成、削除、名前変更、複製、エクスポート/インポート
//!
//! # 使用例
//!
//! ```bash
//! # 構成を切り替え
//! gcloudctx production
//!
//! # 直前の構成に戻る
//! gcloudctx -
//!
//! # カレントディレクトリで使う構成を設定して切り替え
//! gcloudctx use staging --switch
//! ```

mod cli;
mod common;
mod gcloud;
mod history;
mod interactive;
mod local;
mod profile;
mod report;
mod switch;

use clap::{CommandFactory, Parser};
use dialoguer::Confirm;
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use common::config::Config;
use common::error::{ExitStatus, GcloudctxError, Result, format_error};
use common::output::Output;
use gcloud::{GcloudStore, ProfileStore, Runner, validate_name};
use history::History;
use interactive::FzfOptions;
use local::BINDING_FILE_NAME;
use profile::{DocumentFormat, ImportOptions, ProfileDocument, ProfileManager};
use report::{ListFormat, ReportGenerator, preview_fallback};
use switch::{SwitchOptions, SwitchOutcome, Switcher, SyncOutcome, Target};

fn main() -> ExitCode {
    // CLIをパース
    let cli = Cli::parse();

    // ロギングを初期化
    init_logging(cli.verbose, cli.no_color);

    // 設定ファイルを読み込み（環境変数で上書き）
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&Output::new(cli.no_color), &e);
            return ExitCode::from(e.exit_status());
        }
    };

    // 出力ハンドラを作成
    let output = Output::new(cli.no_color || config.output.no_color);

    match run_command(&cli, &config, &output) {
        Ok(()) => ExitCode::from(ExitStatus::Success),
        // 対話選択の中断は何もせず正常終了
        Err(e) if e.is_canceled() => ExitCode::from(ExitStatus::Success),
        Err(e) => {
            report_error(&output, &e);
            ExitCode::from(e.exit_status())
        }
    }
}

/// ロギングを初期化
///
/// ログレベルは以下の優先順位で決定される:
/// 1. RUST_LOG 環境変数
/// 2. --verbose フラグ（gcloudctx=debug）
/// 3. デフォルト（warn レベル）
///
/// 標準出力はコマンドの出力に使うため、ログは標準エラーに書く。
fn init_logging(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,gcloudctx=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(!no_color),
        )
        .with(filter)
        .init();
}

/// エラーを表示
fn report_error(output: &Output, error: &GcloudctxError) {
    if let Some(hint) = error.hint() {
        output.error_with_hint(&error.to_string(), hint);
    } else {
        output.error(&error.to_string());
    }
    debug!("{}", format_error(error));
}

/// コマンドを実行
fn run_command(cli: &Cli, config: &Config, output: &Output) -> Result<()> {
    let store = GcloudStore::new(Runner::new(config.gcloud.binary.as_str()));
    let report = ReportGenerator::new(output.color());

    match &cli.command {
        Some(Commands::Create(args)) => {
            ProfileManager::new(&store).create(&args.name, args.activate)?;
            output.success(&format!("created configuration {:?}", args.name));
            if args.activate {
                output.success(&format!("activated configuration {:?}", args.name));
            }
            Ok(())
        }
        Some(Commands::Delete(args)) => run_delete(&store, &args.name, args.force, output),
        Some(Commands::Rename(args)) => {
            ProfileManager::new(&store).rename(&args.old, &args.new)?;
            output.success(&format!(
                "renamed configuration {:?} to {:?}",
                args.old, args.new
            ));
            forget_previous(&args.old, output);
            Ok(())
        }
        Some(Commands::Clone(args)) => {
            ProfileManager::new(&store).clone_profile(&args.source, &args.target, args.activate)?;
            output.success(&format!(
                "cloned configuration {:?} to {:?}",
                args.source, args.target
            ));
            if args.activate {
                output.success(&format!("activated configuration {:?}", args.target));
            }
            Ok(())
        }
        Some(Commands::Export(args)) => run_export(&store, args, output),
        Some(Commands::Import(args)) => run_import(&store, args, output),
        Some(Commands::Use(args)) => run_use(&store, args, output),
        Some(Commands::Auto) => run_auto(&store, output),
        Some(Commands::Completion(args)) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                env!("CARGO_PKG_NAME"),
                &mut io::stdout(),
            );
            Ok(())
        }
        Some(Commands::Preview(args)) => {
            print!("{}", render_preview(&store, &report, &args.line));
            Ok(())
        }
        None => run_root(cli, config, &store, &report, output),
    }
}

/// サブコマンドなしの実行
fn run_root(
    cli: &Cli,
    config: &Config,
    store: &GcloudStore,
    report: &ReportGenerator,
    output: &Output,
) -> Result<()> {
    if cli.list {
        let format: ListFormat = cli
            .output
            .as_deref()
            .unwrap_or(&config.output.format)
            .parse()?;
        let profiles = store.list()?;
        if profiles.is_empty() {
            output.message("No configurations found");
        } else {
            print!("{}", report.list(&profiles, format)?);
        }
        return Ok(());
    }

    if cli.current {
        return show_current(store, report, cli.info);
    }

    let options = SwitchOptions {
        sync_credentials: cli.sync_adc,
        impersonate: cli.impersonate_service_account.clone(),
    };

    if cli.interactive {
        return select_and_switch(store, config, &options, output);
    }

    match &cli.target {
        Some(target) => run_switch(store, &Target::parse(target), &options, output),
        None if !config.interactive.ignore_fzf && interactive::is_available() => {
            select_and_switch(store, config, &options, output)
        }
        None => show_current(store, report, false),
    }
}

/// 現在の構成を表示
fn show_current(store: &GcloudStore, report: &ReportGenerator, info: bool) -> Result<()> {
    let profile = store.get_active()?;
    if info {
        print!("{}", report.details(&profile));
    } else {
        println!("{}", report.current(&profile));
    }
    Ok(())
}

/// fzf で選んだ構成に切り替える
fn select_and_switch(
    store: &GcloudStore,
    config: &Config,
    options: &SwitchOptions,
    output: &Output,
) -> Result<()> {
    let fzf = FzfOptions::from_config(&config.interactive)?;
    let profiles = store.list()?;
    let selected = interactive::select(&profiles, &fzf)?;
    run_switch(store, &Target::Named(selected), options, output)
}

/// 構成を切り替えて結果を表示
fn run_switch(
    store: &GcloudStore,
    target: &Target,
    options: &SwitchOptions,
    output: &Output,
) -> Result<()> {
    let history = History::new()?;
    let outcome = Switcher::new(store, &history).switch(target, options)?;
    report_switch(&outcome, None, output);
    Ok(())
}

fn report_switch(outcome: &SwitchOutcome, from_dir: Option<&Path>, output: &Output) {
    match outcome {
        SwitchOutcome::AlreadyActive { name } => {
            output.success(&format!("already on configuration {:?}", name));
        }
        SwitchOutcome::Switched { to, sync, .. } => {
            match from_dir {
                Some(dir) => output.success(&format!(
                    "switched to configuration {:?} (from {})",
                    to,
                    dir.display()
                )),
                None => output.success(&format!("switched to configuration {:?}", to)),
            }
            if *sync == SyncOutcome::Synced {
                output.success("ADC synced successfully");
            }
            for warning in switch_warnings(outcome) {
                output.warning(&warning);
            }
        }
    }
}

/// 切り替え自体は完了したが失敗した付随処理の警告
fn switch_warnings(outcome: &SwitchOutcome) -> Vec<String> {
    let SwitchOutcome::Switched {
        history_error,
        sync,
        ..
    } = outcome
    else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    if let Some(reason) = history_error {
        warnings.push(format!("failed to save history: {}", reason));
    }
    if let SyncOutcome::Failed(reason) = sync {
        warnings.push(format!("failed to sync ADC: {}", reason));
    }
    warnings
}

/// 確認の上で構成を削除
fn run_delete(store: &GcloudStore, name: &str, force: bool, output: &Output) -> Result<()> {
    // 確認の前に削除できるかを検査する
    let profile = store.get(name)?;
    if profile.is_active {
        return Err(GcloudctxError::active_protected(name));
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete configuration {:?}?", name))
            .default(false)
            .interact()
            .map_err(anyhow::Error::from)?;
        if !confirmed {
            output.message("Deletion canceled");
            return Ok(());
        }
    }

    ProfileManager::new(store).delete(name)?;
    output.success(&format!("deleted configuration {:?}", name));
    forget_previous(name, output);
    Ok(())
}

/// なくなった構成を指す履歴を消す（失敗しても警告のみ）
fn forget_previous(name: &str, output: &Output) {
    if let Err(e) = History::new().and_then(|history| history.forget(name)) {
        output.warning(&format!("failed to update history: {}", e));
    }
}

/// 構成をエクスポート
fn run_export(store: &GcloudStore, args: &cli::profile::ExportArgs, output: &Output) -> Result<()> {
    let format: DocumentFormat = args.format.parse()?;
    let document = ProfileManager::new(store).export(args.name.as_deref())?;
    let content = document.render(format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, content).map_err(|e| {
                GcloudctxError::config(format!("failed to write {}: {}", path.display(), e))
            })?;
            output.success(&format!(
                "exported configuration {:?} to {}",
                document.name,
                path.display()
            ));
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// 構成をインポート
fn run_import(store: &GcloudStore, args: &cli::profile::ImportArgs, output: &Output) -> Result<()> {
    let document = ProfileDocument::read(&args.file)?;
    let options = ImportOptions {
        name: args.name.clone(),
        overwrite: args.overwrite,
        activate: args.activate,
    };
    let name = ProfileManager::new(store).import(&document, &options)?;

    output.success(&format!(
        "imported configuration {:?} from {}",
        name,
        args.file.display()
    ));
    if args.activate {
        output.success(&format!("activated configuration {:?}", name));
    }
    Ok(())
}

/// カレントディレクトリの構成設定
fn run_use(store: &GcloudStore, args: &cli::local::UseArgs, output: &Output) -> Result<()> {
    let cwd = std::env::current_dir()?;

    if args.unset {
        if !local::binding_exists(&cwd) {
            return Err(GcloudctxError::not_found(format!(
                "no {} file in current directory",
                BINDING_FILE_NAME
            )));
        }
        local::remove_binding(&cwd)?;
        output.success(&format!(
            "removed {} file from current directory",
            BINDING_FILE_NAME
        ));
        return Ok(());
    }

    let Some(name) = &args.name else {
        let binding = local::find_binding(&cwd)?;
        output.message(&format!("Local configuration: {}", binding.name));
        output.message(&format!("Found in: {}", binding.dir.display()));
        return Ok(());
    };

    validate_name(name)?;
    if !store.exists(name)? {
        return Err(GcloudctxError::not_found(format!(
            "configuration {:?} does not exist",
            name
        )));
    }
    local::write_binding(&cwd, name)?;
    output.success(&format!(
        "set local configuration to {:?} (saved to {})",
        name,
        local::binding_path(&cwd).display()
    ));

    if args.switch {
        run_switch(
            store,
            &Target::Named(name.clone()),
            &SwitchOptions::default(),
            output,
        )?;
    }
    Ok(())
}

/// ディレクトリ設定に従って切り替える
///
/// 設定ファイルが見つからないのはエラーではない（何も出力せず正常終了）。
fn run_auto(store: &GcloudStore, output: &Output) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let Some(binding) = local::resolve_binding(&cwd)? else {
        debug!("No {} found from {:?}", BINDING_FILE_NAME, cwd);
        return Ok(());
    };

    if !store.exists(&binding.name)? {
        return Err(GcloudctxError::not_found(format!(
            "configuration {:?} (from {}) does not exist",
            binding.name,
            binding.file().display()
        )));
    }

    let history = History::new()?;
    let outcome =
        Switcher::new(store, &history).switch_to(&binding.name, &SwitchOptions::default())?;
    // 既にアクティブなら何も表示しない
    if matches!(outcome, SwitchOutcome::Switched { .. }) {
        report_switch(&outcome, Some(&binding.dir), output);
    }
    Ok(())
}

/// fzf のプレビューを生成（失敗してもエラーにしない）
fn render_preview<S: ProfileStore + ?Sized>(
    store: &S,
    report: &ReportGenerator,
    line: &str,
) -> String {
    let name = match interactive::parse_profile_name(line) {
        Ok(name) => name,
        Err(e) => {
            debug!("Preview parse failed: {}", e);
            return preview_fallback(line, "Could not parse configuration name");
        }
    };

    match store.get(&name) {
        Ok(profile) => report.preview(&profile),
        Err(e) => {
            debug!("Preview lookup failed for {:?}: {}", name, e);
            preview_fallback(&name, "Details unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcloud::testing::{Fail, MemoryStore};

    #[test]
    fn test_switch_warnings() {
        let switched = |history_error: Option<&str>, sync: SyncOutcome| SwitchOutcome::Switched {
            from: "default".to_string(),
            to: "staging".to_string(),
            history_error: history_error.map(str::to_string),
            sync,
        };

        assert!(switch_warnings(&switched(None, SyncOutcome::Synced)).is_empty());
        assert!(
            switch_warnings(&SwitchOutcome::AlreadyActive {
                name: "default".to_string()
            })
            .is_empty()
        );
        assert_eq!(
            switch_warnings(&switched(
                Some("permission denied"),
                SyncOutcome::Failed("login aborted".to_string())
            )),
            vec![
                "failed to save history: permission denied",
                "failed to sync ADC: login aborted",
            ]
        );
    }

    #[test]
    fn test_render_preview_for_known_profile() {
        let store = MemoryStore::with_names(&["default", "staging"]);
        let out = render_preview(&store, &ReportGenerator::new(false), "  staging");
        assert!(out.contains("Configuration: staging"));
        assert!(out.contains("Status:  Inactive"));
    }

    #[test]
    fn test_render_preview_never_fails() {
        let store = MemoryStore::with_names(&["default"]);
        let report = ReportGenerator::new(false);

        assert_eq!(
            render_preview(&store, &report, "   "),
            "Configuration:    \n\n(Could not parse configuration name)\n"
        );
        assert_eq!(
            render_preview(&store, &report, "* gone (x@example.com)"),
            "Configuration: gone\n\n(Details unavailable)\n"
        );

        store.fail_on(Fail::List);
        assert!(render_preview(&store, &report, "default").contains("Details unavailable"));
    }
}
