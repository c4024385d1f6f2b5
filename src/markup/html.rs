//! Walks HTML markup and extracts taxonomy elements.
//!
//! Two kinds of structure carry the hierarchy:
//!
//! # Cladogram tables
//! The rendering of the `{{clade}}` template is a recursive table layout:
//! ```text
//! table.clade
//!   tbody
//!     tr                      one row per child branch
//!       td.clade-label        clade name on the branch (may be empty;
//!                             style "dashed" marks an uncertain branch)
//!       td.clade-leaf         either leaf text (link, image) or a
//!                             nested table.clade
//!     tr
//!       td.clade-slabel       secondary label below the branch, e.g. "690 Mya"
//! ```
//! A table no branch or list item names is an unnamed clade when it has
//! several branch rows.
//!
//! # Nested lists
//! `ul`, `ol` and `dl` (wiki indentation) lists: each item is a taxon, a
//! list inside an item holds its children. Items without text but with a
//! nested list only indent, they do not create an element. A `dt` term
//! heads the `dd` items following it.
//!
//! Depth is counted per structural container, so it reflects containment
//! in the document and not its indentation.

use crate::markup::element::{ElementKind, Fragment, MarkupElement};
use crate::markup::normalizer::clean_label;
use crate::model::TaxonAttributes;
use scraper::{ElementRef, Html};

/// Elements whose content never contributes to a label.
const NOISE_TAGS: [&str; 10] = [
    "img", "figure", "figcaption", "style", "script", "noscript", "audio", "video", "svg", "link",
];

/// Extracts all taxonomy elements of an HTML fragment in document order.
///
/// Labels are cleaned; no elements are dropped yet.
pub(crate) fn extract_fragment(html: &str, noise_classes: &[String]) -> Fragment {
    let document = Html::parse_fragment(html);
    let mut walker = MarkupWalker {
        noise_classes,
        fragment: Fragment::new(),
    };
    walker.walk(document.root_element(), 0);
    walker.fragment
}

// =#========================================================================#=
// MARKUP WALKER
// =#========================================================================#=
struct MarkupWalker<'n> {
    noise_classes: &'n [String],
    fragment: Fragment,
}

impl MarkupWalker<'_> {
    /// Dispatches on structural containers, descends through everything else.
    fn walk(&mut self, element: ElementRef<'_>, depth: usize) {
        if is_clade_table(element) {
            self.walk_unnamed_clade_table(element, depth);
        } else if is_list(element) {
            self.walk_list(element, depth);
        } else if !self.is_noise(element) {
            for child in element.children().filter_map(ElementRef::wrap) {
                self.walk(child, depth);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Cladogram tables
    // ------------------------------------------------------------------------
    /// Walks a cladogram table that no row or list item names.
    ///
    /// The table itself is the clade: with several branches it becomes an
    /// unnamed element holding them, a single branch stands for itself.
    fn walk_unnamed_clade_table(&mut self, table: ElementRef<'_>, depth: usize) {
        if count_clade_rows(table) > 1 {
            self.fragment.push(MarkupElement::clade(depth, ""));
            self.walk_clade_table(table, depth + 1);
        } else {
            self.walk_clade_table(table, depth);
        }
    }

    fn walk_clade_table(&mut self, table: ElementRef<'_>, depth: usize) {
        // Position of the last element created for a row of this table
        let mut last: Option<usize> = None;

        for row in direct_rows(table) {
            let cells = direct_cells(row);
            let Some(&first) = cells.first() else {
                continue;
            };

            if has_class(first, "clade-label") {
                let label = self.text_of(first);
                let uncertain = first
                    .value()
                    .attr("style")
                    .is_some_and(|style| style.contains("dashed"));

                let Some(&leaf_cell) = cells.iter().skip(1).find(|c| has_class(**c, "clade-leaf")) else {
                    log::warn!("Clade row {label:?} without leaf cell");
                    if !label.is_empty() {
                        let element = MarkupElement::leaf(depth, label).with_attributes(TaxonAttributes {
                            uncertain,
                            ..Default::default()
                        });
                        last = Some(self.fragment.push(element));
                    }
                    continue;
                };

                if let Some(nested) = self.nested_clade_table(leaf_cell) {
                    let element = MarkupElement::clade(depth, label).with_attributes(TaxonAttributes {
                        uncertain,
                        ..Default::default()
                    });
                    last = Some(self.fragment.push(element));
                    self.walk_clade_table(nested, depth + 1);
                } else {
                    let leaf_label = self.text_of(leaf_cell);
                    let attributes = TaxonAttributes {
                        link: self.find_link(leaf_cell),
                        image: self.find_attribute(leaf_cell, "img", "src"),
                        info: Vec::new(),
                        uncertain,
                    };

                    if label.is_empty() {
                        // Branch without own name, the leaf names it
                        let element = MarkupElement::leaf(depth, leaf_label).with_attributes(attributes);
                        last = Some(self.fragment.push(element));
                    } else {
                        let element = MarkupElement::clade(depth, label).with_attributes(attributes);
                        last = Some(self.fragment.push(element));
                        self.fragment.push(MarkupElement::leaf(depth + 1, leaf_label));
                    }
                }
            } else if has_class(first, "clade-slabel") {
                let info = self.text_of(first);
                if info.is_empty() {
                    continue;
                }
                match last {
                    Some(index) => self.fragment.elements_mut()[index].attributes.info.push(info),
                    None => log::warn!("Secondary label {info:?} before any clade row"),
                }
            } else {
                let under = last.map(|i| self.fragment.elements()[i].label.clone());
                let classes: Vec<&str> = first.value().classes().collect();
                log::warn!("Unexpected class of cell in the row under {under:?}: {classes:?}");
            }
        }
    }

    /// Finds a cladogram table inside a leaf cell, looking through wrapper
    /// elements but not into other tables.
    fn nested_clade_table<'a>(&self, cell: ElementRef<'a>) -> Option<ElementRef<'a>> {
        for child in cell.children().filter_map(ElementRef::wrap) {
            if is_clade_table(child) {
                return Some(child);
            }
            if child.value().name() == "table" || self.is_noise(child) {
                continue;
            }
            if let Some(table) = self.nested_clade_table(child) {
                return Some(table);
            }
        }
        None
    }

    // ------------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------------
    fn walk_list(&mut self, list: ElementRef<'_>, depth: usize) {
        // A labeled term heads the descriptions following it
        let mut under_term = false;

        for child in list.children().filter_map(ElementRef::wrap) {
            if self.is_noise(child) {
                continue;
            }
            match child.value().name() {
                "li" => {
                    self.walk_list_item(child, depth);
                }
                "dt" => under_term = self.walk_list_item(child, depth),
                "dd" => {
                    self.walk_list_item(child, depth + usize::from(under_term));
                }
                // Lists directly inside lists, invalid but common in wiki output
                "ul" | "ol" | "dl" => self.walk_list(child, depth + 1),
                _ => {}
            }
        }
    }

    /// Walks one list item, returning whether it yielded an element.
    fn walk_list_item(&mut self, item: ElementRef<'_>, depth: usize) -> bool {
        let label = self.text_of(item);
        let mut nested = Vec::new();
        self.collect_structures(item, &mut nested);

        let labeled = !label.is_empty();
        if labeled {
            let kind = if nested.is_empty() {
                ElementKind::Leaf
            } else {
                ElementKind::Clade
            };
            let attributes = TaxonAttributes {
                link: self.find_link(item),
                image: self.find_attribute(item, "img", "src"),
                ..Default::default()
            };
            self.fragment.push(MarkupElement {
                depth,
                label,
                kind,
                attributes,
            });
        }

        for structure in nested {
            if labeled && is_clade_table(structure) {
                // The item names the cladogram
                self.walk_clade_table(structure, depth + 1);
            } else {
                self.walk(structure, depth + 1);
            }
        }
        labeled
    }

    /// Collects lists and cladogram tables below `element`, looking through
    /// wrapper elements.
    fn collect_structures<'a>(&self, element: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            if is_list(child) || is_clade_table(child) {
                out.push(child);
            } else if !self.is_noise(child) && child.value().name() != "table" {
                self.collect_structures(child, out);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Text and attributes
    // ------------------------------------------------------------------------
    /// Returns the cleaned text of an element, without noise and without
    /// nested structures.
    fn text_of(&self, element: ElementRef<'_>) -> String {
        let mut text = String::new();
        self.collect_text(element, &mut text);
        clean_label(&text)
    }

    fn collect_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(child) = ElementRef::wrap(child) {
                match child.value().name() {
                    "br" => out.push(' '),
                    "table" | "ul" | "ol" | "dl" => {}
                    // Keep words of neighboring blocks apart
                    "p" | "div" => {
                        out.push(' ');
                        if !self.is_noise(child) {
                            self.collect_text(child, out);
                        }
                        out.push(' ');
                    }
                    _ if self.is_noise(child) => {}
                    _ => self.collect_text(child, out),
                }
            }
        }
    }

    /// Returns the target of the first text link (image links are skipped).
    fn find_link(&self, element: ElementRef<'_>) -> Option<String> {
        for child in element.children().filter_map(ElementRef::wrap) {
            if child.value().name() == "a" {
                let has_text = child.text().any(|t| !t.trim().is_empty());
                match child.value().attr("href") {
                    Some(href) if has_text => return Some(href.to_string()),
                    _ => continue,
                }
            }
            if is_structure_or_table(child) || self.is_noise(child) {
                continue;
            }
            if let Some(link) = self.find_link(child) {
                return Some(link);
            }
        }
        None
    }

    /// Returns `attr` of the first `tag` element, not looking into nested
    /// structures.
    fn find_attribute(&self, element: ElementRef<'_>, tag: &str, attr: &str) -> Option<String> {
        for child in element.children().filter_map(ElementRef::wrap) {
            if child.value().name() == tag {
                if let Some(value) = child.value().attr(attr) {
                    return Some(value.to_string());
                }
            }
            if is_structure_or_table(child) {
                continue;
            }
            if let Some(value) = self.find_attribute(child, tag, attr) {
                return Some(value);
            }
        }
        None
    }

    fn is_noise(&self, element: ElementRef<'_>) -> bool {
        let value = element.value();
        NOISE_TAGS.contains(&value.name())
            || value
                .classes()
                .any(|class| self.noise_classes.iter().any(|noise| noise == class))
    }
}

// ============================================================================
// Helpers
// ============================================================================
fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn is_clade_table(element: ElementRef<'_>) -> bool {
    element.value().name() == "table" && has_class(element, "clade")
}

fn is_list(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "ul" | "ol" | "dl")
}

fn is_structure_or_table(element: ElementRef<'_>) -> bool {
    is_list(element) || element.value().name() == "table"
}

/// Returns the direct rows of a table (not rows of nested tables).
///
/// Rows may be direct children or inside `thead`, `tbody`, `tfoot`.
fn direct_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// Counts the rows of a table that start a branch (`td.clade-label`).
fn count_clade_rows(table: ElementRef<'_>) -> usize {
    direct_rows(table)
        .into_iter()
        .filter(|row| {
            direct_cells(*row)
                .first()
                .is_some_and(|cell| has_class(*cell, "clade-label"))
        })
        .count()
}

/// Returns the direct `td`/`th` cells of a row.
fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}
