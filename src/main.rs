use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;
use snomed_mapper::{cli, config, export, logging, query, reference, workbook};
use cli::{Cli, Commands};
use config::Config;
use snomed_mapper_common::{ingest_and_match, match_batch, ReferenceIndex};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, &cli.log_level);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    if !config.parallel {
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build_global()
            .context("スレッドプールの初期化に失敗しました")?;
    }

    match cli.command {
        Commands::Match { names, input, output, format } => {
            let mut names = names;
            if let Some(path) = input {
                names.extend(query::read_names(&path)?);
            }

            let index = load_index(&config, cli.reference.as_deref())?;
            let results = match_batch(&names, &index)?;

            match output {
                Some(path) => {
                    export::export_match_results(&results, &path, format)?;
                    eprintln!("✔ {}件を照合: {}", results.len(), path.display());
                }
                None => {
                    let response = export::MatchResponse { results: &results };
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
            }
        }

        Commands::Bulk { workbook: input, output, format } => {
            println!("📋 snomed-mapper - 一括照合\n");

            // 1. 参照マスタ
            println!("[1/3] 参照マスタを読み込み中...");
            let index = load_index(&config, cli.reference.as_deref())?;
            println!("✔ {}件の参照エントリ\n", index.len());

            // 2. 取り込み・照合
            println!("[2/3] 取り込み・照合中...");
            let mut source = workbook::ExcelSource::open(&input)?;
            let report = ingest_and_match(&mut source, &index, &config.ingest_options())?;
            println!("✔ 総行数: {}", report.total_rows);
            println!("✔ 重複行数: {}", report.duplicated_rows);
            for skipped in &report.skipped_sheets {
                println!("  - スキップ: {} ({})", skipped.sheet, skipped.reason);
            }
            println!();

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let output_path = output.unwrap_or_else(|| default_bulk_output(&input));
            export::export_bulk_report(&report, &output_path, format)?;
            println!("✔ 結果を保存: {}", output_path.display());

            println!("\n✅ 一括照合完了");
        }

        Commands::Status => {
            let path = config.resolve_reference(cli.reference.as_deref());
            let index = load_index(&config, cli.reference.as_deref())?;
            let status = serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "reference": path.display().to_string(),
                "entries": index.len(),
                "terms": index.vocabulary().len(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::Config { set_reference, show } => {
            let mut config = config;

            if let Some(path) = set_reference {
                config.set_reference_path(path)?;
                println!("✔ 参照マスタを設定しました");
            }

            if show {
                println!("設定:");
                println!(
                    "  参照マスタ: {}",
                    config.resolve_reference(cli.reference.as_deref()).display()
                );
                println!("  集計シート: {}", config.summary_sheet);
                println!("  名称列: {}", config.tariff_name_column);
                println!("  価格列: {}", config.price_column);
                println!("  並列処理: {}", if config.parallel { "有効" } else { "無効" });
            }
        }
    }

    Ok(())
}

/// 参照マスタを読み込んでインデックスを構築
fn load_index(config: &Config, explicit: Option<&Path>) -> anyhow::Result<ReferenceIndex> {
    let path = config.resolve_reference(explicit);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("参照マスタ読み込み: {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let index = reference::load_reference_file(&path);
    spinner.finish_and_clear();

    index.with_context(|| format!("参照マスタを読み込めません: {}", path.display()))
}

/// 一括照合の既定出力先: <入力フォルダ>/<名前>_matched.xlsx
fn default_bulk_output(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tariffs");
    parent.join(format!("{}_matched.xlsx", stem))
}
