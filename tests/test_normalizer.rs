use cladewick::TaxonomyError;
use cladewick::markup::{ElementKind, Fragment, MarkupElement, MarkupNormalizer, clean_label, normalize_html};
use cladewick::model::TaxonAttributes;
use proptest::prelude::*;

fn labels(fragment: &Fragment) -> Vec<(usize, &str)> {
    fragment
        .elements()
        .iter()
        .map(|e| (e.depth, e.label.as_str()))
        .collect()
}

// --- TESTS LABEL CLEANING ---
#[test]
fn test_clean_label_citations_and_spaces() {
    assert_eq!(clean_label("Aves[1][2]"), "Aves");
    assert_eq!(clean_label("Dinornis [note 4]"), "Dinornis");
    assert_eq!(clean_label("Kakapo[citation needed]"), "Kakapo");
    assert_eq!(clean_label("Strigops\u{a0}\u{a0}habroptilus "), "Strigops habroptilus");
    assert_eq!(clean_label("\u{a0}[12]\u{a0}"), "");
}

#[test]
fn test_clean_label_is_stable() {
    for raw in ["Neornithes[1[2]]", "  Apteryx   owenii [a]", "†Moa", "Ratitae [paraphyletic]"] {
        let once = clean_label(raw);
        assert_eq!(clean_label(&once), once);
    }
}

// --- TESTS CLADOGRAM TABLES ---
#[test]
fn test_clade_table_structure() {
    let html = r#"
<table class="clade"><tbody>
  <tr><td class="clade-label">Neornithes</td><td class="clade-leaf">
    <table class="clade"><tbody>
      <tr><td class="clade-label"></td><td class="clade-leaf"><a href="/wiki/Palaeognathae">Palaeognathae</a></td></tr>
      <tr><td class="clade-label">Neognathae</td><td class="clade-leaf">
        <table class="clade"><tbody>
          <tr><td class="clade-label"></td><td class="clade-leaf">Galloanserae</td></tr>
          <tr><td class="clade-label"></td><td class="clade-leaf">Neoaves</td></tr>
        </tbody></table>
      </td></tr>
    </tbody></table>
  </td></tr>
</tbody></table>"#;
    let fragment = normalize_html(html).unwrap();

    assert_eq!(
        labels(&fragment),
        vec![
            (0, "Neornithes"),
            (1, "Palaeognathae"),
            (1, "Neognathae"),
            (2, "Galloanserae"),
            (2, "Neoaves"),
        ]
    );
    let elements = fragment.elements();
    assert_eq!(elements[0].kind, ElementKind::Clade);
    assert_eq!(elements[1].kind, ElementKind::Leaf);
    assert_eq!(elements[1].attributes.link.as_deref(), Some("/wiki/Palaeognathae"));
}

#[test]
fn test_clade_table_labeled_leaf_row() {
    // A named branch ending in a leaf gives the branch name a leaf child
    let html = r#"<table class="clade"><tbody>
  <tr><td class="clade-label">Apterygidae</td><td class="clade-leaf">Apteryx</td></tr>
</tbody></table>"#;
    let fragment = normalize_html(html).unwrap();
    assert_eq!(labels(&fragment), vec![(0, "Apterygidae"), (1, "Apteryx")]);
}

#[test]
fn test_clade_table_noise_is_removed() {
    let html = r##"<table class="clade"><tbody>
  <tr><td class="clade-label"></td><td class="clade-leaf"><span>Kiwi<sup class="reference"><a href="#cite_note-3">[3]</a></sup></span>&nbsp;<a href="/wiki/File:Kiwi.png"><img src="//upload/kiwi.png"></a></td></tr>
  <tr><td class="clade-label"></td><td class="clade-leaf"><div class="thumb"><div class="thumbcaption">Moa drawing</div></div>Moa</td></tr>
</tbody></table>"##;
    let fragment = normalize_html(html).unwrap();

    assert_eq!(labels(&fragment), vec![(0, ""), (1, "Kiwi"), (1, "Moa")]);
    let kiwi = &fragment.elements()[1];
    assert_eq!(kiwi.attributes.image.as_deref(), Some("//upload/kiwi.png"));
    assert_eq!(kiwi.attributes.link, None);
}

#[test]
fn test_clade_table_dashed_and_secondary_label() {
    let html = r#"<table class="clade"><tbody>
  <tr><td class="clade-label" style="border-left: 1px dashed">Dinornithiformes</td><td class="clade-leaf">
    <table class="clade"><tbody>
      <tr><td class="clade-label"></td><td class="clade-leaf">Dinornis</td></tr>
    </tbody></table>
  </td></tr>
  <tr><td class="clade-slabel">Miocene[4]</td></tr>
</tbody></table>"#;
    let fragment = normalize_html(html).unwrap();
    let moa = &fragment.elements()[0];

    assert_eq!(moa.label, "Dinornithiformes");
    assert!(moa.attributes.uncertain);
    assert_eq!(moa.attributes.info, vec!["Miocene"]);
}

#[test]
fn test_extra_noise_class() {
    let html = "<ul><li>Aves<ul><li>Kiwi</li><li class=\"extinct\">Moa</li></ul></li></ul>";
    let fragment = MarkupNormalizer::new()
        .with_noise_class("extinct")
        .normalize_html(html)
        .unwrap();
    // Noise items are skipped together with everything nested in them
    assert_eq!(labels(&fragment), vec![(0, "Aves"), (1, "Kiwi")]);
}

// --- TESTS LISTS ---
#[test]
fn test_nested_unordered_list() {
    let html = r#"<div class="mw-parser-output"><ul>
  <li>Palaeognathae
    <ul>
      <li>Struthioniformes</li>
      <li>Notopalaeognathae<ul><li>Rheiformes</li></ul></li>
    </ul>
  </li>
  <li>Neognathae</li>
</ul></div>"#;
    let fragment = normalize_html(html).unwrap();
    assert_eq!(
        labels(&fragment),
        vec![
            (0, "Palaeognathae"),
            (1, "Struthioniformes"),
            (1, "Notopalaeognathae"),
            (2, "Rheiformes"),
            (0, "Neognathae"),
        ]
    );
}

#[test]
fn test_definition_list_indentation() {
    let html = "<dl><dd>Order <b>Apterygiformes</b><dl><dd>Family Apterygidae<dl><dd>Genus <i>Apteryx</i></dd></dl></dd></dl></dd></dl>";
    let fragment = normalize_html(html).unwrap();
    assert_eq!(
        labels(&fragment),
        vec![
            (0, "Order Apterygiformes"),
            (1, "Family Apterygidae"),
            (2, "Genus Apteryx"),
        ]
    );
}

#[test]
fn test_definition_list_terms() {
    let html = "<dl><dt>Palaeognathae</dt><dd>Struthio</dd><dd>Apteryx</dd><dt>Neognathae</dt><dd>Gallus</dd></dl>";
    let fragment = normalize_html(html).unwrap();
    assert_eq!(
        labels(&fragment),
        vec![
            (0, "Palaeognathae"),
            (1, "Struthio"),
            (1, "Apteryx"),
            (0, "Neognathae"),
            (1, "Gallus"),
        ]
    );
}

// --- TESTS EMPTY INPUT ---
#[test]
fn test_empty_taxonomy() {
    assert_eq!(normalize_html(""), Err(TaxonomyError::EmptyTaxonomy));
    assert_eq!(normalize_html("<p>No taxonomy here.</p>"), Err(TaxonomyError::EmptyTaxonomy));
    assert_eq!(
        normalize_html("<ul><li><sup class=\"reference\">[1]</sup><img src=\"a.png\"></li></ul>"),
        Err(TaxonomyError::EmptyTaxonomy)
    );
}

#[test]
fn test_normalize_fragment_drops_unusable() {
    let fragment = Fragment::from_elements(vec![
        MarkupElement::clade(0, "Aves"),
        MarkupElement::clade(1, "[5]"),
        MarkupElement::clade(1, " "),
        MarkupElement::leaf(2, "Kiwi"),
    ]);
    let normalized = MarkupNormalizer::new().normalize(fragment).unwrap();
    assert_eq!(labels(&normalized), vec![(0, "Aves"), (1, ""), (2, "Kiwi")]);
}

#[test]
fn test_normalize_cleans_attributes() {
    let fragment = Fragment::from_elements(vec![MarkupElement::leaf(0, "Kiwi").with_attributes(
        TaxonAttributes {
            link: Some("  ".to_string()),
            image: Some(" //upload/kiwi.png ".to_string()),
            info: vec!["[1]".to_string(), "Pliocene\u{a0}[2]".to_string()],
            uncertain: false,
        },
    )]);
    let normalized = MarkupNormalizer::new().normalize(fragment).unwrap();
    let attributes = &normalized.elements()[0].attributes;
    assert_eq!(attributes.link, None);
    assert_eq!(attributes.image.as_deref(), Some("//upload/kiwi.png"));
    assert_eq!(attributes.info, vec!["Pliocene"]);
}

// --- PROPERTIES ---
fn noisy_label() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "Aves", "Kiwi", " ", "\u{a0}", "[1]", "[a]", "[citation needed]", "\u{200B}", "(", "]", "[",
        ]),
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

fn noisy_fragment() -> impl Strategy<Value = Fragment> {
    prop::collection::vec((0usize..4, noisy_label()), 0..30).prop_map(|elements| {
        elements
            .into_iter()
            .map(|(depth, label)| MarkupElement::clade(depth, label))
            .collect()
    })
}

#[test]
fn proptest_normalize_is_idempotent() {
    proptest!(|(fragment in noisy_fragment())| {
        let normalizer = MarkupNormalizer::new();
        match normalizer.normalize(fragment) {
            Ok(once) => {
                let twice = normalizer.normalize(once.clone());
                prop_assert_eq!(twice, Ok(once));
            }
            Err(err) => prop_assert_eq!(err, TaxonomyError::EmptyTaxonomy),
        }
    });
}

#[test]
fn proptest_clean_label_is_idempotent() {
    proptest!(|(label in noisy_label())| {
        let once = clean_label(&label);
        prop_assert_eq!(clean_label(&once), once);
    });
}
