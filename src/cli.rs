use crate::export::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snomed-mapper")]
#[command(about = "料金表名称をSNOMEDコードに照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（--log-level debug と同じ）
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ログレベル (error/warn/info/debug/trace)。RUST_LOG が優先
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// 参照マスタファイル (.json/.xlsx)
    #[arg(short, long, global = true)]
    pub reference: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 名称リストを照合してJSONを出力
    Match {
        /// 照合する名称
        names: Vec<String>,

        /// 名称ファイル（1行1件のテキスト、または {"tariff_names": [...]} のJSON）
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/excel)。省略時は拡張子から判定
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// ワークブックを取り込んで全行を照合
    Bulk {
        /// 料金表ワークブック (.xlsx/.xls/.ods)
        #[arg(required = true)]
        workbook: PathBuf,

        /// 出力ファイル（デフォルト: 入力と同じフォルダの <名前>_matched.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/excel)。省略時は拡張子から判定
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// 参照マスタを読み込んで状態を表示
    Status,

    /// 設定を表示/編集
    Config {
        /// 参照マスタのパスを設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
