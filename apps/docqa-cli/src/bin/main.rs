use std::env;
use std::path::PathBuf;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use docqa_core::config::Settings;
use docqa_engine::extract::PlainTextExtractor;
use docqa_engine::{RagService, Status, UploadFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <data_dir> <question> [--top-k N]", args[0]);
        eprintln!("Example: {} ./docs 'What is the refund policy?' --top-k 4", args[0]);
        std::process::exit(1);
    }
    let data_dir = PathBuf::from(&args[1]);
    let question = args[2].clone();
    let mut top_k: Option<usize> = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--top-k" => match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                Some(v) => { top_k = Some(v); i += 1; }
                None => { eprintln!("Error: --top-k requires a number"); std::process::exit(1); }
            },
            other => { eprintln!("Error: unknown argument {other}"); std::process::exit(1); }
        }
        i += 1;
    }

    let settings = Settings::load()?;
    let embedder = docqa_providers::embedding_provider(&settings);
    let completer = docqa_providers::completion_provider(&settings);
    let service = RagService::new(settings, embedder, completer, Box::new(PlainTextExtractor));

    let mut files = Vec::new();
    for entry in WalkDir::new(&data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("unnamed").to_string();
        files.push(UploadFile { name, bytes });
    }
    if files.is_empty() {
        eprintln!("No files found under {}", data_dir.display());
        std::process::exit(1);
    }

    println!("📄 Uploading {} files from {}", files.len(), data_dir.display());
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("#>-"),
    );
    let mut added = 0usize;
    let mut total = 0usize;
    for file in files {
        let report = service.upload(std::slice::from_ref(&file)).await?;
        added += report.chunks_added;
        total = report.total_chunks;
        pb.inc(1);
    }
    pb.finish_and_clear();
    println!("   {added} chunks added, {total} total");

    println!("🔧 Building index...");
    let build = service.build().await?;
    if build.status != Status::Ok {
        eprintln!("{}", build.message.unwrap_or_else(|| "Nothing to index".to_string()));
        std::process::exit(1);
    }
    println!("   indexed {} chunks", build.chunks);

    println!("❓ {question}");
    let response = service.ask(&question, top_k).await?;
    match response.status {
        Status::Ok => {
            println!("\n{}", response.answer.unwrap_or_default());
            if !response.sources.is_empty() {
                println!("\nSources:");
                for source in &response.sources {
                    println!("  [{}] {}: {}", source.id, source.file, source.preview);
                }
            }
        }
        _ => println!("{}", response.message.unwrap_or_else(|| "Not ready".to_string())),
    }
    Ok(())
}
