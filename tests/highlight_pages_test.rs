use relocation_advisor::config::{DestinationMode, HighlighterSettings};
use relocation_advisor::core::highlight::{Highlighter, HighlightConfig, PAGE_EXTENSION};
use relocation_advisor::{PageStore, Storage};
use scraper::{Html, Selector};
use tempfile::TempDir;

fn nav_page(title: &str, root_attrs: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"{root_attrs}>
<head><title>{title}</title></head>
<body>
<header>
  <a href="index.html" class="brand"><img src="/img/logo.svg" alt="Relocate"></a>
  <nav>
    <a href="index.html" class="brand-small"><svg width="10" height="10"></svg></a>
    <a href="costarica.html">Costa Rica</a>
    <a href="panama.html">Panama</a>
    <a href="belize.html">Belize</a>
    <a href="faq.html">FAQ</a>
  </nav>
</header>
<div class="slideover-panel">
  <nav>
    <a href="/costarica.html">Costa Rica</a>
    <a href="panama.html"><img src="/img/flag-pa.png" alt=""></a>
  </nav>
</div>
<main><a href="belize.html">Read about Belize</a></main>
</body>
</html>"#
    )
}

fn classes(html: &str, href: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"header nav a[href="{}"]"#, href)).unwrap();
    doc.select(&selector)
        .next()
        .and_then(|a| a.value().attr("class"))
        .map(|c| c.split_whitespace().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

#[test]
fn test_panama_page_marks_other_destinations() {
    let decorator = HighlighterSettings::default().decorator().unwrap();
    let html = decorator.decorate_html(&nav_page("Panama", ""), "panama.html");

    assert_eq!(classes(&html, "costarica.html"), vec!["other-destination"]);
    assert_eq!(classes(&html, "belize.html"), vec!["other-destination"]);
    assert!(classes(&html, "panama.html").is_empty());
    assert!(classes(&html, "faq.html").is_empty());

    // logo 連結保持原樣
    let doc = Html::parse_document(&html);
    let logo = Selector::parse("header nav a.brand-small").unwrap();
    assert_eq!(doc.select(&logo).next().unwrap().value().attr("class"), Some("brand-small"));

    // 只處理導覽列中的連結
    let main_link = Selector::parse("main a").unwrap();
    assert_eq!(doc.select(&main_link).next().unwrap().value().attr("class"), None);
}

#[test]
fn test_plan_skips_logos_and_duplicates() {
    let highlighter = Highlighter::new(HighlightConfig::default()).unwrap();
    let doc = Html::parse_document(&nav_page("Home", ""));
    let plan = highlighter.plan(&doc, "/");

    let filenames: Vec<&str> = plan.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(filenames, vec!["costarica.html", "panama.html", "belize.html", "faq.html"]);
    assert!(plan.iter().filter(|d| d.filename != "faq.html").all(|d| d.highlight));
}

#[test]
fn test_document_attribute_mode() {
    let settings = HighlighterSettings {
        destination_source: DestinationMode::DocumentAttribute,
        ..HighlighterSettings::default()
    };
    let decorator = settings.decorator().unwrap();

    let with_attr = nav_page("Belize", r#" data-destination-pages="panama.html,belize.html""#);
    let html = decorator.decorate_html(&with_attr, "belize.html");
    assert_eq!(classes(&html, "panama.html"), vec!["other-destination"]);
    assert!(classes(&html, "costarica.html").is_empty());
    assert!(classes(&html, "belize.html").is_empty());

    let without_attr = nav_page("Belize", "");
    assert_eq!(decorator.decorate_html(&without_attr, "belize.html"), without_attr);
}

#[tokio::test]
async fn test_decorate_directory_of_pages() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let source = PageStore::new(input.path());
    let target = PageStore::new(output.path());

    for (name, title) in [("costarica.html", "Costa Rica"), ("panama.html", "Panama"), ("belize.html", "Belize")] {
        source.write_file(name, nav_page(title, "").as_bytes()).await.unwrap();
    }
    source.write_file("styles.css", b"body {}").await.unwrap();

    let decorator = HighlighterSettings::default().decorator().unwrap();
    let pages = source.list_pages(PAGE_EXTENSION).await.unwrap();
    assert_eq!(pages.len(), 3);

    for name in &pages {
        let html = source.read_page(name).await.unwrap();
        target
            .write_file(name, decorator.decorate_html(&html, name).as_bytes())
            .await
            .unwrap();
    }

    for name in &pages {
        let html = target.read_page(name).await.unwrap();
        for other in ["costarica.html", "panama.html", "belize.html"] {
            let expected: Vec<String> = if other == name.as_str() {
                vec![]
            } else {
                vec!["other-destination".to_string()]
            };
            assert_eq!(classes(&html, other), expected, "{} -> {}", name, other);
        }
    }
}
