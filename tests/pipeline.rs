//! End-to-end tests: index a small HTML tree with the real tantivy
//! engine, search it, unpack payloads, and render both output
//! formats.

use std::fs;
use tempfile::TempDir;

use sitefind::core::engine::IndexEngine;
use sitefind::core::render::{render_result_fragments, render_results_to_vec, Template};
use sitefind::{DocumentPipeline, FileWalker, ResultRecord, TantivyEngine};

fn write_site(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }
    temp_dir
}

fn page(title: &str, description: &str, canonical: &str, body: &str) -> String {
    format!(
        r#"<html><head>
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="keywords" content="site, test">
<link rel="canonical" href="{canonical}">
</head><body>{body}</body></html>"#
    )
}

fn index_site(site: &TempDir, index: &TempDir) -> (DocumentPipeline, TantivyEngine) {
    let pipeline = DocumentPipeline::new("nointernalindex");
    let walker = FileWalker::new(vec!["*.html".to_string()], vec![], 10).unwrap();
    let mut engine = TantivyEngine::open_or_create(index.path(), "en").unwrap();
    pipeline
        .index_directory(&mut engine, &walker, site.path())
        .unwrap();
    (pipeline, engine)
}

#[test]
fn indexes_and_finds_documents() {
    let site = write_site(&[
        (
            "guide.html",
            &page(
                "Install Guide",
                "How to install the widget",
                "https://example.com/guide/",
                "<p>Download the installer and run it.</p>",
            ),
        ),
        (
            "faq.html",
            &page(
                "FAQ",
                "Frequently asked questions",
                "https://example.com/faq/",
                "<p>Answers to common questions.</p>",
            ),
        ),
    ]);
    let index = TempDir::new().unwrap();
    let (_, engine) = index_site(&site, &index);

    let payloads = engine.search("installer", 10).unwrap();
    assert_eq!(payloads.len(), 1);

    let record = ResultRecord::unpack(&payloads[0]).unwrap();
    assert_eq!(record.path, b"/guide.html".to_vec());
    assert_eq!(record.title, b"Install Guide".to_vec());
    assert_eq!(record.description, b"How to install the widget".to_vec());
    assert_eq!(record.url, b"https://example.com/guide/".to_vec());
}

#[test]
fn skips_pages_without_metadata_and_noindex_pages() {
    let site = write_site(&[
        (
            "kept.html",
            &page("Kept", "stays in", "https://example.com/kept/", "<p>body</p>"),
        ),
        ("no_meta.html", "<html><body>nothing here</body></html>"),
        (
            "robots_out.html",
            r#"<html><title>Out</title>
<meta name="description" content="opted out">
<meta name="robots" content="nointernalindex"></html>"#,
        ),
    ]);
    let index = TempDir::new().unwrap();
    let pipeline = DocumentPipeline::new("nointernalindex");
    let walker = FileWalker::new(vec!["*.html".to_string()], vec![], 10).unwrap();
    let mut engine = TantivyEngine::open_or_create(index.path(), "en").unwrap();

    let stats = pipeline
        .index_directory(&mut engine, &walker, site.path())
        .unwrap();
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.files_skipped, 2);
}

#[test]
fn noindex_region_text_is_unsearchable() {
    let site = write_site(&[(
        "page.html",
        &page(
            "Mixed",
            "public and private",
            "",
            r#"<p>falcon</p><div class="nointernalindex"><p>ocelot</p></div>"#,
        ),
    )]);
    let index = TempDir::new().unwrap();
    let (_, engine) = index_site(&site, &index);

    assert_eq!(engine.search("falcon", 10).unwrap().len(), 1);
    assert!(engine.search("ocelot", 10).unwrap().is_empty());
}

#[test]
fn script_bodies_are_unsearchable() {
    let site = write_site(&[(
        "app.html",
        &page(
            "App",
            "scripted page",
            "",
            "<p>visible heron</p><script>var secretWombat = (1 < 2);</script>",
        ),
    )]);
    let index = TempDir::new().unwrap();
    let (_, engine) = index_site(&site, &index);

    assert_eq!(engine.search("heron", 10).unwrap().len(), 1);
    assert!(engine.search("secretWombat", 10).unwrap().is_empty());
}

#[test]
fn reindexing_replaces_documents_by_path() {
    let site = write_site(&[(
        "page.html",
        &page("First Title", "first description", "", "<p>alpha</p>"),
    )]);
    let index = TempDir::new().unwrap();
    index_site(&site, &index);

    fs::write(
        site.path().join("page.html"),
        page("Second Title", "second description", "", "<p>alpha</p>"),
    )
    .unwrap();
    let (_, engine) = index_site(&site, &index);

    let payloads = engine.search("alpha", 10).unwrap();
    assert_eq!(payloads.len(), 1);
    let record = ResultRecord::unpack(&payloads[0]).unwrap();
    assert_eq!(record.title, b"Second Title".to_vec());
}

#[test]
fn json_rendering_of_ranked_results() {
    let site = write_site(&[(
        "quote.html",
        &page(
            r#"He said \"hi\""#,
            "a page about quoting",
            "",
            "<p>quoting pelican</p>",
        ),
    )]);
    let index = TempDir::new().unwrap();
    let (_, engine) = index_site(&site, &index);

    let payloads = engine.search("pelican", 10).unwrap();
    let records: Vec<ResultRecord> = payloads
        .iter()
        .map(|p| ResultRecord::unpack(p).unwrap())
        .collect();

    let out = render_results_to_vec(&records).unwrap();
    let text = String::from_utf8_lossy(&out).into_owned();
    assert!(text.starts_with(r#"{"results":["#));
    assert!(text.contains(r#""path":"/quote.html""#));
    assert!(text.contains(r#"He said \"hi\""#));
    assert!(text.ends_with("]}"));
}

#[test]
fn template_rendering_of_ranked_results() {
    let site = write_site(&[
        (
            "one.html",
            &page(
                "One",
                "heavily relevant",
                "https://example.com/one/",
                "<p>bison bison bison</p>",
            ),
        ),
        (
            "two.html",
            &page("Two", "barely relevant", "", "<p>one bison grazing</p>"),
        ),
    ]);
    let index = TempDir::new().unwrap();
    let (_, engine) = index_site(&site, &index);

    let payloads = engine.search("bison", 10).unwrap();
    let records: Vec<ResultRecord> = payloads
        .iter()
        .map(|p| ResultRecord::unpack(p).unwrap())
        .collect();
    assert_eq!(records.len(), 2);

    let template =
        Template::parse(b"<h1>{{ search }}</h1><ul>{{ results }}</ul><!-- {{ search_escaped }} -->")
            .unwrap();
    let fragment = render_result_fragments(&records);
    let mut sink = std::io::Cursor::new(Vec::new());
    template
        .render(b"O'Brien's bison", &fragment, &mut sink)
        .unwrap();
    let text = String::from_utf8_lossy(&sink.into_inner()).into_owned();

    assert!(text.starts_with("<h1>O'Brien's bison</h1><ul>"));
    assert!(text.contains(r#"href="https://example.com/one/""#));
    assert!(text.contains(r#"href="/two.html""#));
    assert!(text.contains(r"O\'Brien\'s bison"));
    // Ranked order: the title/body-heavy page comes first
    let one = text.find("One").unwrap();
    let two = text.find("Two").unwrap();
    assert!(one < two);
}
