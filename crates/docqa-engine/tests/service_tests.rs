use std::sync::Arc;

use docqa_core::config::Settings;
use docqa_core::types::PREVIEW_MAX_CHARS;
use docqa_engine::extract::PlainTextExtractor;
use docqa_engine::{RagService, Status, UploadFile};
use docqa_providers::fake::{FakeCompletions, FakeEmbeddings};

fn small_chunk_settings() -> Settings {
    Settings { chunk_size: 20, chunk_overlap: 5, ..Settings::default() }
}

fn service(settings: Settings) -> RagService {
    RagService::new(
        settings,
        Arc::new(FakeEmbeddings::new(64)),
        Arc::new(FakeCompletions),
        Box::new(PlainTextExtractor),
    )
}

fn txt(name: &str, content: &str) -> UploadFile {
    UploadFile { name: name.to_string(), bytes: content.as_bytes().to_vec() }
}

#[tokio::test]
async fn upload_counts_accumulate_across_calls() -> anyhow::Result<()> {
    let svc = service(small_chunk_settings());
    let files = [txt("sky.txt", "The sky is blue. Grass is green.")];

    let first = svc.upload(&files).await?;
    assert_eq!(first.status, Status::Ok);
    assert_eq!(first.files, 1);
    assert!((2..=3).contains(&first.chunks_added), "got {}", first.chunks_added);
    assert_eq!(first.total_chunks, first.chunks_added);

    let second = svc.upload(&files).await?;
    assert_eq!(second.chunks_added, first.chunks_added);
    assert_eq!(second.total_chunks, first.chunks_added * 2);
    Ok(())
}

#[tokio::test]
async fn unextractable_files_contribute_zero_chunks() -> anyhow::Result<()> {
    let svc = service(small_chunk_settings());

    let pdf_only = svc
        .upload(&[UploadFile { name: "scan.pdf".to_string(), bytes: vec![0x25, 0x50, 0x44, 0x46] }])
        .await?;
    assert_eq!(pdf_only.status, Status::Ok);
    assert_eq!(pdf_only.files, 1, "the file is still counted");
    assert_eq!(pdf_only.chunks_added, 0);
    assert_eq!(pdf_only.total_chunks, 0);

    let mixed = svc
        .upload(&[
            txt("notes.txt", "plain text survives extraction"),
            UploadFile { name: "scan.pdf".to_string(), bytes: vec![0x25, 0x50, 0x44, 0x46] },
        ])
        .await?;
    assert_eq!(mixed.files, 2);
    assert!(mixed.chunks_added >= 1);
    assert_eq!(mixed.total_chunks, mixed.chunks_added);
    Ok(())
}

#[tokio::test]
async fn upload_reads_real_files_from_disk() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    std::fs::write(tmp.path().join("a.txt"), "alpha bravo charlie")?;
    std::fs::write(tmp.path().join("b.md"), "# heading\ndelta echo")?;
    std::fs::write(tmp.path().join("c.bin"), [0u8, 1, 2, 3])?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(tmp.path())? {
        let path = entry?.path();
        files.push(UploadFile {
            name: path.file_name().and_then(|n| n.to_str()).unwrap_or("unnamed").to_string(),
            bytes: std::fs::read(&path)?,
        });
    }

    let svc = service(Settings::default());
    let report = svc.upload(&files).await?;
    assert_eq!(report.files, 3);
    assert_eq!(report.chunks_added, 2, "txt and md each fit one window; bin extracts empty");
    Ok(())
}

#[tokio::test]
async fn build_with_empty_corpus_is_a_distinct_non_ok_status() -> anyhow::Result<()> {
    let svc = service(small_chunk_settings());
    let report = svc.build().await?;
    assert_eq!(report.status, Status::EmptyCorpus);
    assert_eq!(report.chunks, 0);
    assert!(report.message.is_some());

    // The index stays absent, so asking still reports not-ready.
    let response = svc.ask("anything?", None).await?;
    assert_eq!(response.status, Status::NotReady);
    Ok(())
}

#[tokio::test]
async fn ask_before_build_reports_not_ready() -> anyhow::Result<()> {
    let svc = service(small_chunk_settings());
    svc.upload(&[txt("a.txt", "uploaded but never built")]).await?;

    let response = svc.ask("anything?", None).await?;
    assert_eq!(response.status, Status::NotReady);
    assert!(response.answer.is_none());
    assert!(response.sources.is_empty());
    assert!(response.message.is_some());
    Ok(())
}

#[tokio::test]
async fn blank_question_reports_no_question() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[txt("a.txt", "some indexed content")]).await?;
    let build = svc.build().await?;
    assert_eq!(build.status, Status::Ok);

    let response = svc.ask("   ", None).await?;
    assert_eq!(response.status, Status::NoQuestion);
    assert!(response.answer.is_none());
    Ok(())
}

#[tokio::test]
async fn ask_answers_with_rank_aligned_sources() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[
        txt("solar.txt", "solar panels convert sunlight into electricity"),
        txt("wind.txt", "wind turbines convert moving air into electricity"),
        txt("hydro.txt", "hydro plants convert falling water into electricity"),
    ])
    .await?;
    let build = svc.build().await?;
    assert_eq!(build.status, Status::Ok);
    assert_eq!(build.chunks, 3);

    let response = svc.ask("how do solar panels work?", None).await?;
    assert_eq!(response.status, Status::Ok);
    let answer = response.answer.expect("answer");
    assert!(!answer.is_empty());
    assert_eq!(response.sources.len(), 3, "top_k larger than corpus returns all chunks");
    for (i, source) in response.sources.iter().enumerate() {
        assert_eq!(source.id, i + 1, "source ids are 1-based ranks");
        assert!(source.preview.chars().count() <= PREVIEW_MAX_CHARS);
    }
    // Any marker the composer kept is backed by the sources list.
    assert!(!answer.contains(&format!("[{}]", response.sources.len() + 1)));
    Ok(())
}

#[tokio::test]
async fn chunk_text_as_question_ranks_its_own_file_first() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[
        txt("solar.txt", "solar panels convert sunlight into electricity"),
        txt("wind.txt", "wind turbines convert moving air into electricity"),
        txt("hydro.txt", "hydro plants convert falling water into electricity"),
    ])
    .await?;
    svc.build().await?;

    let response = svc
        .ask("wind turbines convert moving air into electricity", Some(1))
        .await?;
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].file, "wind.txt", "self-match ranks first");
    Ok(())
}

#[tokio::test]
async fn top_k_is_clamped_not_rejected() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[txt("a.txt", "only one chunk here")]).await?;
    svc.build().await?;

    let oversized = svc.ask("one?", Some(500)).await?;
    assert_eq!(oversized.sources.len(), 1);

    let zero = svc.ask("one?", Some(0)).await?;
    assert_eq!(zero.sources.len(), 1, "top_k 0 clamps up to 1");
    Ok(())
}

#[tokio::test]
async fn rebuild_after_more_uploads_keeps_positions_aligned() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[txt("solar.txt", "solar panels convert sunlight into electricity")]).await?;
    svc.build().await?;
    svc.upload(&[txt("wind.txt", "wind turbines convert moving air into electricity")]).await?;
    let rebuild = svc.build().await?;
    assert_eq!(rebuild.status, Status::Ok);
    assert_eq!(rebuild.chunks, 2, "rebuild re-embeds previously indexed chunks too");

    let response = svc
        .ask("wind turbines convert moving air into electricity", Some(1))
        .await?;
    assert_eq!(response.sources[0].file, "wind.txt");
    Ok(())
}

#[tokio::test]
async fn reset_clears_everything_and_restarts() -> anyhow::Result<()> {
    let svc = service(Settings::default());
    svc.upload(&[txt("a.txt", "first corpus content")]).await?;
    svc.build().await?;

    let reset = svc.reset().await?;
    assert_eq!(reset.status, Status::Ok);

    let response = svc.ask("anything?", None).await?;
    assert_eq!(response.status, Status::NotReady);

    let report = svc.upload(&[txt("b.txt", "second corpus content")]).await?;
    assert_eq!(report.total_chunks, report.chunks_added, "totals restart from the reset baseline");
    let build = svc.build().await?;
    assert_eq!(build.status, Status::Ok);
    let ok = svc.ask("second corpus content", None).await?;
    assert_eq!(ok.status, Status::Ok);
    Ok(())
}

#[tokio::test]
async fn concurrent_asks_share_a_stable_index() -> anyhow::Result<()> {
    let svc = Arc::new(service(Settings::default()));
    svc.upload(&[
        txt("solar.txt", "solar panels convert sunlight into electricity"),
        txt("wind.txt", "wind turbines convert moving air into electricity"),
    ])
    .await?;
    svc.build().await?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.ask("how is electricity produced?", Some(2)).await
        }));
    }
    for handle in handles {
        let response = handle.await??;
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.sources.len(), 2);
    }
    Ok(())
}
