use std::fs;
use std::path::Path;

use localrag_answer::{AnswerSynthesizer, ExtractiveSynthesizer};
use localrag_core::chunker::Chunker;
use localrag_core::config::{Provider, RagConfig};
use localrag_core::Error;
use localrag_pipeline::RagPipeline;
use localrag_text::LexicalIndex;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_corpus(dir: &Path) {
    fs::write(dir.join("a.txt"), "RAG retrieves documents. It reduces hallucinations.").unwrap();
    fs::write(dir.join("b.txt"), "TF-IDF is a classic retrieval method using term weights.").unwrap();
}

#[test]
fn offline_end_to_end() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());

    let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
    pipe.build().expect("build");
    let res = pipe.query("What does RAG do?", 3).expect("query");

    assert!(res.sources.iter().any(|s| s.doc == "a.txt"), "should hit the relevant file");
    assert!(res.answer.contains("RAG") || res.answer.to_lowercase().contains("retriev"));
    assert_eq!(res.sources.len(), 2);
    assert_eq!(res.sources[0].doc, "a.txt");
    assert!(res.sources[0].score > res.sources[1].score);
    assert!(res.answer.contains("[a.txt#0]"));
}

#[test]
fn sources_carry_capped_previews() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("long.txt"), "fire safety matters. ".repeat(60)).unwrap();
    fs::write(tmp.path().join("other.txt"), "water boils at one hundred degrees.").unwrap();

    let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
    pipe.build().expect("build");
    let res = pipe.query("fire safety", 10).expect("query");

    assert_eq!(res.sources.len(), 4, "three windows of long.txt plus other.txt");
    for source in &res.sources {
        assert!(source.preview.chars().count() <= 160);
    }
    let json = serde_json::to_value(&res).expect("serialize");
    assert!(json["answer"].is_string());
    assert_eq!(json["sources"][0]["doc"], "long.txt");
}

#[test]
fn empty_directory_fails_build_with_empty_corpus() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("readme.md"), "not a text document").unwrap();

    let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
    assert!(matches!(pipe.build(), Err(Error::EmptyCorpus(_))));
    assert!(matches!(pipe.query("anything", 3), Err(Error::NotBuilt)));
}

#[test]
fn blank_documents_only_is_an_empty_corpus() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "   \n\n  ").unwrap();

    let mut pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
    assert!(matches!(pipe.build(), Err(Error::EmptyCorpus(_))));
}

#[test]
fn query_before_build_is_not_built() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    let pipe = RagPipeline::new(tmp.path(), &RagConfig::default()).expect("pipeline");
    assert!(matches!(pipe.query("What does RAG do?", 3), Err(Error::NotBuilt)));
}

#[test]
fn delegated_provider_without_key_fails_at_construction() {
    let tmp = TempDir::new().unwrap();
    let mut config = RagConfig::default();
    config.answer.provider = Provider::OpenAi;
    config.answer.delegated.api_key_env = "LOCALRAG_PIPELINE_TEST_UNSET_KEY".to_string();
    assert!(matches!(RagPipeline::new(tmp.path(), &config), Err(Error::InvalidConfig(_))));
}

#[test]
fn rebuild_gives_identical_results() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    let mut pipe = RagPipeline::from_parts(
        tmp.path(),
        Chunker::default(),
        LexicalIndex::new(),
        AnswerSynthesizer::from(ExtractiveSynthesizer::default()),
    );
    pipe.build().expect("build");
    let first = pipe.query("term weights", 2).expect("query");
    pipe.build().expect("rebuild");
    let second = pipe.query("term weights", 2).expect("query");
    assert_eq!(first, second);
    assert_eq!(first.sources[0].doc, "b.txt");
}
