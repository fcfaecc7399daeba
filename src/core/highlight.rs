use crate::utils::error::{AdvisorError, Result};
use html5ever::{LocalName, Namespace, QualName};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{BTreeSet, HashSet};

pub const DEFAULT_DESTINATION_PAGES: [&str; 3] = ["costarica.html", "panama.html", "belize.html"];
pub const DEFAULT_NAV_SELECTORS: [&str; 2] = ["header nav a", ".slideover-panel nav a"];
pub const DEFAULT_CLASS_NAME: &str = "other-destination";
pub const DEFAULT_ROOT_ATTRIBUTE: &str = "data-destination-pages";
pub const DEFAULT_INDEX_PAGE: &str = "index.html";
pub const PAGE_EXTENSION: &str = ".html";

/// 含有圖片或 SVG 的連結視為 logo，不處理
const LOGO_SELECTOR: &str = "img, svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationSource {
    Fixed(BTreeSet<String>),
    /// 從 `<html>` 上以逗號分隔的屬性讀取；屬性缺少或為空時不做任何事
    DocumentAttribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    pub destination_filenames: BTreeSet<String>,
    pub selectors: Vec<String>,
    pub class_name: String,
    pub extension: String,
    pub index_name: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            destination_filenames: DEFAULT_DESTINATION_PAGES.iter().map(|p| p.to_string()).collect(),
            selectors: DEFAULT_NAV_SELECTORS.iter().map(|s| s.to_string()).collect(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            extension: PAGE_EXTENSION.to_string(),
            index_name: DEFAULT_INDEX_PAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDecision {
    pub filename: String,
    pub href: String,
    pub highlight: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightReport {
    pub highlighted: Vec<String>,
    pub cleared: Vec<String>,
    pub skipped_logos: usize,
}

/// URL 路徑的最後一段（小寫）；空路徑回傳 index 名稱
pub fn current_page_filename(path: &str, index_name: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default().trim();
    if last.is_empty() {
        index_name.to_lowercase()
    } else {
        last.to_lowercase()
    }
}

pub fn parse_destination_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn normalize_target(href: &str, extension: &str) -> Option<String> {
    let lowered = href.trim().to_lowercase();
    if !lowered.ends_with(&extension.to_lowercase()) {
        return None;
    }
    lowered.rsplit('/').next().map(|name| name.to_string())
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    config: HighlightConfig,
    selectors: Vec<Selector>,
    logo: Selector,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Result<Self> {
        let selectors = config
            .selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;
        let logo = parse_selector(LOGO_SELECTOR)?;

        Ok(Self {
            config,
            selectors,
            logo,
        })
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// 依 selector 順序收集連結，以檔名去重（先出現者為準）
    fn anchors<'a>(&self, doc: &'a Html) -> (Vec<(String, ElementRef<'a>)>, usize) {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut skipped_logos = 0;

        for selector in &self.selectors {
            for element in doc.select(selector) {
                if element.value().name() != "a" {
                    continue;
                }
                let Some(filename) = element
                    .value()
                    .attr("href")
                    .and_then(|href| normalize_target(href, &self.config.extension))
                else {
                    continue;
                };
                if element.select(&self.logo).next().is_some() {
                    skipped_logos += 1;
                    continue;
                }
                if seen.insert(filename.clone()) {
                    records.push((filename, element));
                }
            }
        }

        (records, skipped_logos)
    }

    fn decide(&self, filename: &str, current: &str, destinations: &BTreeSet<String>) -> bool {
        destinations.contains(filename) && filename != current
    }

    pub fn plan(&self, doc: &Html, current_page: &str) -> Vec<LinkDecision> {
        self.plan_with(doc, current_page, &self.config.destination_filenames)
    }

    fn plan_with(
        &self,
        doc: &Html,
        current_page: &str,
        destinations: &BTreeSet<String>,
    ) -> Vec<LinkDecision> {
        let current = current_page_filename(current_page, &self.config.index_name);
        let (records, _) = self.anchors(doc);

        records
            .into_iter()
            .map(|(filename, element)| LinkDecision {
                highlight: self.decide(&filename, &current, destinations),
                href: element.value().attr("href").unwrap_or_default().to_string(),
                filename,
            })
            .collect()
    }

    pub fn apply(&self, doc: &mut Html, current_page: &str) -> HighlightReport {
        self.apply_with(doc, current_page, &self.config.destination_filenames)
    }

    /// DOM 變動後可再次呼叫；結果與第一次相同
    pub fn refresh(&self, doc: &mut Html, current_page: &str) -> HighlightReport {
        self.apply(doc, current_page)
    }

    fn apply_with(
        &self,
        doc: &mut Html,
        current_page: &str,
        destinations: &BTreeSet<String>,
    ) -> HighlightReport {
        let current = current_page_filename(current_page, &self.config.index_name);
        let (records, skipped_logos) = self.anchors(doc);
        let updates: Vec<_> = records
            .into_iter()
            .map(|(filename, element)| {
                let highlight = self.decide(&filename, &current, destinations);
                (element.id(), filename, highlight)
            })
            .collect();

        let mut report = HighlightReport {
            skipped_logos,
            ..HighlightReport::default()
        };

        for (id, filename, highlight) in updates {
            if let Some(mut node) = doc.tree.get_mut(id) {
                if let Node::Element(element) = node.value() {
                    set_class(element, &self.config.class_name, highlight);
                }
            }
            if highlight {
                report.highlighted.push(filename);
            } else {
                report.cleared.push(filename);
            }
        }

        report
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AdvisorError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn set_class(element: &mut Element, class_name: &str, present: bool) {
    let key = QualName::new(None, Namespace::from(""), LocalName::from("class"));
    let current = element
        .attrs
        .get(&key)
        .map(|value| value.to_string())
        .unwrap_or_default();

    let mut tokens: Vec<&str> = current
        .split_whitespace()
        .filter(|token| *token != class_name)
        .collect();
    if present {
        tokens.push(class_name);
    }

    let updated = tokens.join(" ");
    if updated.is_empty() {
        element.attrs.remove(&key);
    } else {
        element.attrs.insert(key, updated.into());
    }
}

/// 將設定的目的地來源套用到整份頁面
#[derive(Debug, Clone)]
pub struct PageDecorator {
    highlighter: Highlighter,
    source: DestinationSource,
}

impl PageDecorator {
    pub fn new(mut config: HighlightConfig, source: DestinationSource) -> Result<Self> {
        if let DestinationSource::Fixed(pages) = &source {
            config.destination_filenames = pages.iter().map(|p| p.to_lowercase()).collect();
        }
        Ok(Self {
            highlighter: Highlighter::new(config)?,
            source,
        })
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    fn destinations(&self, doc: &Html) -> Option<BTreeSet<String>> {
        match &self.source {
            DestinationSource::Fixed(_) => {
                Some(self.highlighter.config.destination_filenames.clone())
            }
            DestinationSource::DocumentAttribute(attr) => {
                let pages = doc
                    .root_element()
                    .value()
                    .attr(attr)
                    .map(parse_destination_list)
                    .unwrap_or_default();
                if pages.is_empty() {
                    None
                } else {
                    Some(pages)
                }
            }
        }
    }

    pub fn plan(&self, doc: &Html, current_page: &str) -> Vec<LinkDecision> {
        match self.destinations(doc) {
            Some(destinations) => self.highlighter.plan_with(doc, current_page, &destinations),
            None => Vec::new(),
        }
    }

    /// 目的地清單不存在時回傳 None，頁面保持不變
    pub fn decorate(&self, doc: &mut Html, current_page: &str) -> Option<HighlightReport> {
        let destinations = self.destinations(doc)?;
        Some(self.highlighter.apply_with(doc, current_page, &destinations))
    }

    pub fn decorate_html(&self, source: &str, current_page: &str) -> String {
        let mut doc = Html::parse_document(source);
        match self.decorate(&mut doc, current_page) {
            Some(report) => {
                tracing::debug!(
                    "Decorated {}: {} highlighted, {} cleared, {} logos skipped",
                    current_page,
                    report.highlighted.len(),
                    report.cleared.len(),
                    report.skipped_logos
                );
                doc.html()
            }
            None => source.to_string(),
        }
    }
}
