//! Tantivy-backed implementation of the index-engine seam.
//!
//! The schema carries one indexed text field per document section
//! (title, keywords, description, body) plus the opaque stored
//! payload and the path key used for replacement. Section weights
//! from the preparation pipeline become query-time field boosts.

use chrono::Utc;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{
    BytesOptions, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer};
use tantivy::{Index, IndexWriter, TantivyDocument, TantivyError, Term};

use crate::core::engine::IndexEngine;
use crate::core::error::{Result, SitefindError};
use crate::core::types::{TextField, WeightedText};

/// Tokenizer name registered on every opened index
const STEM_TOKENIZER: &str = "stem";

/// Writer heap size (50MB)
const WRITER_HEAP: usize = 50_000_000;

/// Build the index schema
///
/// Fields:
/// - path: document key for replace/delete (STRING | STORED)
/// - payload: opaque per-document bytes (STORED only)
/// - title/keywords/description/body: stemmed searchable text
/// - indexed_at: timestamp (Date | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("path", STRING | STORED);
    builder.add_bytes_field("payload", BytesOptions::default().set_stored());

    let stemmed = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(STEM_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    for field in [
        TextField::Title,
        TextField::Keywords,
        TextField::Description,
        TextField::Body,
    ] {
        builder.add_text_field(field.name(), stemmed.clone());
    }

    builder.add_date_field("indexed_at", STORED);

    builder.build()
}

/// Map a configured language code to a stemmer language; unknown
/// codes fall back to English with a warning
fn stemmer_language(code: &str) -> Language {
    match code {
        "en" => Language::English,
        "de" => Language::German,
        "fr" => Language::French,
        "es" => Language::Spanish,
        "it" => Language::Italian,
        "nl" => Language::Dutch,
        "pt" => Language::Portuguese,
        "ru" => Language::Russian,
        "sv" => Language::Swedish,
        other => {
            tracing::warn!("Unknown stemming language '{}', using English", other);
            Language::English
        }
    }
}

/// Tantivy index wrapper implementing [`IndexEngine`]
pub struct TantivyEngine {
    index: Index,
    schema: Schema,
    writer: IndexWriter,
}

impl std::fmt::Debug for TantivyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyEngine")
            .field("schema", &"<schema>")
            .finish()
    }
}

impl TantivyEngine {
    /// Create a new index at `index_dir` (the directory is created
    /// if missing)
    pub fn create(index_dir: &Path, language: &str) -> Result<Self> {
        std::fs::create_dir_all(index_dir)?;

        let schema = create_schema();
        let index = Index::create_in_dir(index_dir, schema.clone())
            .map_err(|e| SitefindError::StorageError(format!("Failed to create index: {e}")))?;

        Self::finish_open(index, schema, language)
    }

    /// Open an existing index
    pub fn open(index_dir: &Path, language: &str) -> Result<Self> {
        let index = Index::open_in_dir(index_dir)
            .map_err(|e| SitefindError::StorageError(format!("Failed to open index: {e}")))?;
        let schema = index.schema();

        Self::finish_open(index, schema, language)
    }

    /// Open the index at `index_dir`, creating it on first use
    pub fn open_or_create(index_dir: &Path, language: &str) -> Result<Self> {
        if index_dir.join("meta.json").exists() {
            Self::open(index_dir, language)
        } else {
            Self::create(index_dir, language)
        }
    }

    fn finish_open(index: Index, schema: Schema, language: &str) -> Result<Self> {
        let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(Stemmer::new(stemmer_language(language)))
            .build();
        index.tokenizers().register(STEM_TOKENIZER, analyzer);

        let writer = index
            .writer(WRITER_HEAP)
            .map_err(|e| SitefindError::StorageError(format!("Failed to create writer: {e}")))?;

        Ok(Self {
            index,
            schema,
            writer,
        })
    }

    fn field(&self, name: &str) -> Result<tantivy::schema::Field> {
        self.schema
            .get_field(name)
            .map_err(|e: TantivyError| SitefindError::StorageError(format!("Missing field: {e}")))
    }
}

impl IndexEngine for TantivyEngine {
    fn replace_document(
        &mut self,
        key: &str,
        payload: &[u8],
        sections: &[WeightedText],
    ) -> Result<()> {
        let path_field = self.field("path")?;
        let payload_field = self.field("payload")?;

        // Replace = delete by key term, then add
        self.writer
            .delete_term(Term::from_field_text(path_field, key));

        let mut doc = TantivyDocument::default();
        doc.add_text(path_field, key);
        doc.add_bytes(payload_field, payload);
        for section in sections {
            doc.add_text(self.field(section.field.name())?, &section.text);
        }
        doc.add_date(
            self.field("indexed_at")?,
            tantivy::DateTime::from_timestamp_secs(Utc::now().timestamp()),
        );

        self.writer
            .add_document(doc)
            .map_err(|e| SitefindError::StorageError(format!("Failed to add document: {e}")))?;

        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| SitefindError::StorageError(format!("Failed to commit: {e}")))?;
        Ok(())
    }

    fn search(&self, query_str: &str, max_results: usize) -> Result<Vec<Vec<u8>>> {
        if query_str.trim().is_empty() {
            return Err(SitefindError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let reader = self
            .index
            .reader()
            .map_err(|e| SitefindError::SearchFailed(format!("Failed to create reader: {e}")))?;
        let searcher = reader.searcher();

        let payload_field = self.field("payload")?;
        let section_fields = [
            TextField::Title,
            TextField::Keywords,
            TextField::Description,
            TextField::Body,
        ];

        let mut query_parser = QueryParser::for_index(
            &self.index,
            section_fields
                .iter()
                .map(|f| self.field(f.name()))
                .collect::<Result<Vec<_>>>()?,
        );
        for field in section_fields {
            query_parser.set_field_boost(self.field(field.name())?, field.weight());
        }

        let query = query_parser
            .parse_query(query_str)
            .map_err(|e| SitefindError::InvalidQuery(format!("Failed to parse query: {e}")))?;

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(max_results))
            .map_err(|e| SitefindError::SearchFailed(format!("Search failed: {e}")))?;

        let mut payloads = Vec::with_capacity(top_docs.len());
        for (_score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address).map_err(|e| {
                SitefindError::SearchFailed(format!("Failed to retrieve document: {e}"))
            })?;
            let payload = doc
                .get_first(payload_field)
                .and_then(|v| v.as_bytes())
                .unwrap_or(&[])
                .to_vec();
            payloads.push(payload);
        }

        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sections(title: &str, body: &str) -> Vec<WeightedText> {
        vec![
            WeightedText {
                field: TextField::Title,
                text: title.to_string(),
            },
            WeightedText {
                field: TextField::Body,
                text: body.to_string(),
            },
        ]
    }

    #[test]
    fn test_schema_has_all_fields() {
        let schema = create_schema();
        for name in [
            "path",
            "payload",
            "title",
            "keywords",
            "description",
            "body",
            "indexed_at",
        ] {
            assert!(schema.get_field(name).is_ok(), "missing field {name}");
        }
    }

    #[test]
    fn test_payload_round_trips_through_engine() {
        let dir = tempdir().unwrap();
        let mut engine = TantivyEngine::create(dir.path(), "en").unwrap();

        let payload: Vec<u8> = vec![0x00, 0xFF, b'x', 0x00, 0xC3, 0x28];
        engine
            .replace_document("/a.html", &payload, &sections("Alpha waves", "deep sleep"))
            .unwrap();
        engine.commit().unwrap();

        let hits = engine.search("alpha", 10).unwrap();
        assert_eq!(hits, vec![payload]);
    }

    #[test]
    fn test_replace_document_overwrites_by_key() {
        let dir = tempdir().unwrap();
        let mut engine = TantivyEngine::create(dir.path(), "en").unwrap();

        engine
            .replace_document("/a.html", b"old", &sections("Apples", "fruit"))
            .unwrap();
        engine.commit().unwrap();
        engine
            .replace_document("/a.html", b"new", &sections("Apples", "fruit"))
            .unwrap();
        engine.commit().unwrap();

        let hits = engine.search("apples", 10).unwrap();
        assert_eq!(hits, vec![b"new".to_vec()]);
    }

    #[test]
    fn test_title_outweighs_body() {
        let dir = tempdir().unwrap();
        let mut engine = TantivyEngine::create(dir.path(), "en").unwrap();

        engine
            .replace_document("/title.html", b"T", &sections("zebra", "plain text"))
            .unwrap();
        engine
            .replace_document(
                "/body.html",
                b"B",
                &sections("plain title", "zebra zebra herd"),
            )
            .unwrap();
        engine.commit().unwrap();

        let hits = engine.search("zebra", 10).unwrap();
        assert_eq!(hits.first(), Some(&b"T".to_vec()));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_stemming_matches_inflected_forms() {
        let dir = tempdir().unwrap();
        let mut engine = TantivyEngine::create(dir.path(), "en").unwrap();

        engine
            .replace_document(
                "/run.html",
                b"R",
                &sections("Running guide", "runners love running"),
            )
            .unwrap();
        engine.commit().unwrap();

        let hits = engine.search("run", 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_max_results_caps_hits() {
        let dir = tempdir().unwrap();
        let mut engine = TantivyEngine::create(dir.path(), "en").unwrap();

        for i in 0..5 {
            engine
                .replace_document(
                    &format!("/p{i}.html"),
                    format!("P{i}").as_bytes(),
                    &sections("common topic", "common words"),
                )
                .unwrap();
        }
        engine.commit().unwrap();

        let hits = engine.search("common", 3).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_empty_query_rejected() {
        let dir = tempdir().unwrap();
        let engine = TantivyEngine::create(dir.path(), "en").unwrap();
        assert!(engine.search("   ", 10).is_err());
    }

    #[test]
    fn test_open_or_create_reopens() {
        let dir = tempdir().unwrap();
        {
            let mut engine = TantivyEngine::open_or_create(dir.path(), "en").unwrap();
            engine
                .replace_document("/a.html", b"A", &sections("persistent", "data"))
                .unwrap();
            engine.commit().unwrap();
        }

        let engine = TantivyEngine::open_or_create(dir.path(), "en").unwrap();
        let hits = engine.search("persistent", 10).unwrap();
        assert_eq!(hits, vec![b"A".to_vec()]);
    }
}
