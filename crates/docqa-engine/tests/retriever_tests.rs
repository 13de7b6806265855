use docqa_core::error::Error;
use docqa_core::traits::EmbeddingProvider;
use docqa_core::types::PREVIEW_MAX_CHARS;
use docqa_engine::retriever::retrieve;
use docqa_index::{CorpusStore, FlatIndex};
use docqa_providers::fake::FakeEmbeddings;

#[tokio::test]
async fn empty_index_maps_to_not_built() {
    let store = CorpusStore::new();
    let index = FlatIndex::new();
    let embedder = FakeEmbeddings::new(32);

    let err = retrieve(&embedder, &index, &store, "question", 4).await.unwrap_err();
    assert!(matches!(err, Error::IndexNotBuilt));
}

#[tokio::test]
async fn previews_are_bounded_but_full_text_is_kept() -> anyhow::Result<()> {
    let mut store = CorpusStore::new();
    let mut index = FlatIndex::new();
    let embedder = FakeEmbeddings::new(32);

    let long_text = "weather ".repeat(100).trim().to_string();
    assert!(long_text.chars().count() > PREVIEW_MAX_CHARS);
    let chunk = store.append("long.txt", &long_text);
    let vectors = embedder.embed_batch(&[long_text.clone()]).await?;
    let positions = index.add(vectors)?;
    store.mark_indexed(chunk.id, positions[0])?;

    let ranked = retrieve(&embedder, &index, &store, "weather report", 4).await?;
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].text, long_text, "the composer receives the full text");

    let result = ranked[0].to_query_result();
    assert_eq!(result.chunk_id, chunk.id);
    assert_eq!(result.file, "long.txt");
    assert_eq!(result.preview.chars().count(), PREVIEW_MAX_CHARS);
    Ok(())
}

#[tokio::test]
async fn oversized_k_is_clamped_through_both_layers() -> anyhow::Result<()> {
    let mut store = CorpusStore::new();
    let mut index = FlatIndex::new();
    let embedder = FakeEmbeddings::new(32);

    for (file, text) in [("a.txt", "first entry"), ("b.txt", "second entry")] {
        let chunk = store.append(file, text);
        let vectors = embedder.embed_batch(&[text.to_string()]).await?;
        let positions = index.add(vectors)?;
        store.mark_indexed(chunk.id, positions[0])?;
    }

    let ranked = retrieve(&embedder, &index, &store, "entry", 10_000).await?;
    assert_eq!(ranked.len(), 2, "clamped to the bound, then to the index size");
    Ok(())
}
