//! Locates cladograms in a full article.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static CLADE_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.clade").expect("valid clade table selector"));

/// Returns the outer HTML of every top-level cladogram of a document, in
/// document order.
///
/// A cladogram is a `table.clade` that is not nested inside another
/// `table.clade`; nested ones are part of their enclosing cladogram.
///
/// # Example
/// ```
/// use cladewick::markup::find_cladograms;
///
/// let page = r#"<html><body>
///   <h2>Phylogeny</h2>
///   <table class="clade"><tbody><tr>
///     <td class="clade-label"></td><td class="clade-leaf">Apteryx</td>
///   </tr></tbody></table>
/// </body></html>"#;
/// assert_eq!(find_cladograms(page).len(), 1);
/// ```
pub fn find_cladograms(document: &str) -> Vec<String> {
    let document = Html::parse_document(document);
    let cladograms: Vec<String> = document
        .select(&CLADE_TABLE)
        .filter(|table| !is_inside_clade_table(*table))
        .map(|table| table.html())
        .collect();
    log::debug!("Found {} cladograms", cladograms.len());
    cladograms
}

fn is_inside_clade_table(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| CLADE_TABLE.matches(&ancestor))
}
