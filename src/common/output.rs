//! 出力ユーティリティモジュール
//!
//! 成功・警告・エラーメッセージの表示を提供する。

use colored::Colorize;

/// 出力ハンドラ
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
}

impl Output {
    /// 新しい出力ハンドラを作成
    pub fn new(no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { color: !no_color }
    }

    /// 色付き出力が有効かどうか
    pub fn color(&self) -> bool {
        self.color
    }

    /// メッセージを出力
    pub fn message(&self, msg: &str) {
        println!("{}", msg);
    }

    /// 成功メッセージを出力
    pub fn success(&self, msg: &str) {
        println!("{} {}", self.paint_success("Success:"), msg);
    }

    /// 警告メッセージを出力
    pub fn warning(&self, msg: &str) {
        eprintln!("{} {}", self.paint_warning("Warning:"), msg);
    }

    /// エラーを出力
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", self.paint_error("Error:"), msg);
    }

    /// エラーとヒントを出力
    pub fn error_with_hint(&self, msg: &str, hint: &str) {
        self.error(msg);
        eprintln!("{} {}", self.paint_hint("Hint:"), hint);
    }

    fn paint_success(&self, label: &str) -> String {
        if self.color {
            label.green().bold().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_warning(&self, label: &str) -> String {
        if self.color {
            label.yellow().bold().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_error(&self, label: &str) -> String {
        if self.color {
            label.red().bold().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_hint(&self, label: &str) -> String {
        if self.color {
            label.cyan().to_string()
        } else {
            label.to_string()
        }
    }
}
