use cladewick::TaxonomyError;
use cladewick::convert::Converter;
use cladewick::html_to_newick;
use cladewick::markup::find_cladograms;
use cladewick::model::AnomalyKind;
use cladewick::newick::{NewickStyle, parse_str, write_newick_file};
use std::fs;

const NEORNITHES: &str = r#"
<table class="clade"><tbody>
  <tr><td class="clade-label">Neornithes</td><td class="clade-leaf">
    <table class="clade"><tbody>
      <tr><td class="clade-label" style="border-bottom: 1px dashed">Palaeognathae</td><td class="clade-leaf">
        <table class="clade"><tbody>
          <tr><td class="clade-label"></td><td class="clade-leaf"><a href="/wiki/Struthio">Struthio</a></td></tr>
        </tbody></table>
      </td></tr>
      <tr><td class="clade-slabel">Cretaceous</td></tr>
      <tr><td class="clade-label"></td><td class="clade-leaf"><a href="/wiki/Neognathae">Neognathae</a>&nbsp;<img src="//upload/neo.png"></td></tr>
    </tbody></table>
  </td></tr>
</tbody></table>"#;

fn page(cladograms: &[&str]) -> String {
    let mut html = String::from("<html><head><title>Birds</title></head><body><h1>Birds</h1><p>Birds are a group of dinosaurs.<sup class=\"reference\">[1]</sup></p>");
    for (i, cladogram) in cladograms.iter().enumerate() {
        html.push_str(&format!("<h2>Phylogeny {i}</h2><div class=\"clade-wrapper\">{cladogram}</div>"));
    }
    html.push_str("</body></html>");
    html
}

// --- TESTS CONVERSION ---
#[test]
fn test_cladogram_to_plain_newick() {
    assert_eq!(
        html_to_newick(NEORNITHES).unwrap(),
        "((Struthio)Palaeognathae,Neognathae)Neornithes;"
    );
}

#[test]
fn test_cladogram_to_nhx_newick() {
    let conversion = Converter::new()
        .with_style(NewickStyle::Nhx)
        .convert_html(NEORNITHES)
        .unwrap();

    assert_eq!(
        conversion.newick,
        "((Struthio[&&NHX:link=/wiki/Struthio])Palaeognathae[&&NHX:info=Cretaceous:support=0.5],\
         Neognathae[&&NHX:link=/wiki/Neognathae:img=//upload/neo.png])Neornithes;"
    );
    assert!(conversion.anomalies.is_empty());
}

#[test]
fn test_nested_list_with_sanitized_labels() {
    let html = "<ul><li>Ratites (paraphyletic)<ul><li>Rhea americana, greater rhea</li><li>Emu;\u{a0}Dromaius</li></ul></li></ul>";
    assert_eq!(
        html_to_newick(html).unwrap(),
        "(Rhea_americana__greater_rhea,Emu__Dromaius)Ratites__paraphyletic_;"
    );
}

#[test]
fn test_single_taxon() {
    assert_eq!(html_to_newick("<ul><li>Aves[1]</li></ul>").unwrap(), "Aves;");
}

#[test]
fn test_empty_taxonomy_produces_no_tree() {
    assert_eq!(html_to_newick(""), Err(TaxonomyError::EmptyTaxonomy));
    assert_eq!(
        html_to_newick("<ul><li><sup class=\"reference\">[1]</sup></li></ul>"),
        Err(TaxonomyError::EmptyTaxonomy)
    );
}

fn top_level_cladogram(taxa: &[&str]) -> String {
    let mut html = String::from("<table class=\"clade\"><tbody>");
    for taxon in taxa {
        html.push_str(&format!(
            "<tr><td class=\"clade-label\"></td><td class=\"clade-leaf\"><a href=\"/wiki/{taxon}\">{taxon}</a></td></tr>"
        ));
    }
    html.push_str("</tbody></table>");
    html
}

#[test]
fn test_top_level_cladogram_with_two_rows() {
    let conversion = Converter::new()
        .convert_html(&top_level_cladogram(&["Ornithischia", "Saurischia"]))
        .unwrap();
    assert_eq!(conversion.newick, "(Ornithischia,Saurischia);");
    assert!(conversion.anomalies.is_empty());
    assert_eq!(conversion.tree.root().label(), "");
}

#[test]
fn test_top_level_cladogram_with_three_rows() {
    let html = r#"<table class="clade"><tbody>
  <tr><td class="clade-label"></td><td class="clade-leaf">Ornithischia</td></tr>
  <tr><td class="clade-label">Saurischia</td><td class="clade-leaf">
    <table class="clade"><tbody>
      <tr><td class="clade-label"></td><td class="clade-leaf">Sauropodomorpha</td></tr>
      <tr><td class="clade-label"></td><td class="clade-leaf">Theropoda</td></tr>
    </tbody></table>
  </td></tr>
  <tr><td class="clade-slabel">Jurassic</td></tr>
  <tr><td class="clade-label"></td><td class="clade-leaf">Pterosauria</td></tr>
</tbody></table>"#;
    let conversion = Converter::new().convert_html(html).unwrap();
    assert_eq!(
        conversion.newick,
        "(Ornithischia,(Sauropodomorpha,Theropoda)Saurischia,Pterosauria);"
    );
    assert!(conversion.anomalies.is_empty());

    let flat = Converter::new()
        .convert_html(&top_level_cladogram(&["Ornithischia", "Sauropodomorpha", "Theropoda"]))
        .unwrap();
    assert_eq!(flat.newick, "(Ornithischia,Sauropodomorpha,Theropoda);");
    assert!(flat.anomalies.is_empty());
}

#[test]
fn test_balanced_cladogram_is_clean() {
    fn clade(out: &mut String, name: &str, levels: usize) {
        out.push_str("<table class=\"clade\"><tbody>");
        for i in 0..3 {
            let child = format!("{name}_{i}");
            if levels > 1 {
                out.push_str(&format!("<tr><td class=\"clade-label\">{child}</td><td class=\"clade-leaf\">"));
                clade(out, &child, levels - 1);
            } else {
                out.push_str(&format!(
                    "<tr><td class=\"clade-label\"></td><td class=\"clade-leaf\">{child}<sup class=\"reference\">[1]</sup>"
                ));
            }
            out.push_str("</td></tr>");
        }
        out.push_str("</tbody></table>");
    }
    let mut html = String::new();
    clade(&mut html, "T", 3);

    let conversion = Converter::new().convert_html(&html).unwrap();
    assert!(conversion.anomalies.is_empty());
    assert_eq!(conversion.tree.num_leaves(), 27);
    assert_eq!(conversion.tree.root().children().len(), 3);
    assert!(conversion.newick.starts_with("(((T_0_0_0,T_0_0_1,T_0_0_2)T_0_0,"));
    assert!(conversion.newick.ends_with(")T_2);"));
}

#[test]
fn test_named_list_item_holds_cladogram() {
    let html = format!("<ul><li>Dinosauria{}</li></ul>", top_level_cladogram(&["Ornithischia", "Saurischia"]));
    let conversion = Converter::new().convert_html(&html).unwrap();
    assert_eq!(conversion.newick, "(Ornithischia,Saurischia)Dinosauria;");
    assert!(conversion.anomalies.is_empty());
}

#[test]
fn test_definition_term_heads_descriptions() {
    let conversion = Converter::new()
        .convert_html("<dl><dt>Aves</dt><dd>Kiwi</dd><dd>Emu</dd></dl>")
        .unwrap();
    assert_eq!(conversion.newick, "(Kiwi,Emu)Aves;");
    assert!(conversion.anomalies.is_empty());
}

#[test]
fn test_sibling_top_level_items_are_reattached() {
    let conversion = Converter::new()
        .convert_html("<ul><li>Aves<ul><li>Kiwi</li></ul></li><li>Crocodilia</li></ul>")
        .unwrap();
    assert_eq!(conversion.newick, "(Kiwi,Crocodilia)Aves;");
    assert_eq!(conversion.anomalies.len(), 1);
    assert_eq!(conversion.anomalies[0].kind, AnomalyKind::Reattached);
}

#[test]
fn test_duplicate_list_items_collapse() {
    let html = "<ul><li>Aves<ul><li>Palaeognathae<ul><li>Struthio</li></ul></li><li>Palaeognathae<ul><li>Apteryx</li></ul></li></ul></li></ul>";
    let conversion = Converter::new().convert_html(html).unwrap();
    assert_eq!(conversion.newick, "((Struthio,Apteryx)Palaeognathae)Aves;");
    assert_eq!(conversion.anomalies[0].kind, AnomalyKind::DuplicateCollapsed);

    let kept = Converter::new()
        .with_collapse_duplicates(false)
        .convert_html(html)
        .unwrap();
    assert_eq!(kept.newick, "((Struthio)Palaeognathae,(Apteryx)Palaeognathae)Aves;");
}

#[test]
fn test_output_reads_back() {
    let conversion = Converter::new().convert_html(NEORNITHES).unwrap();
    let reread = parse_str(&conversion.newick).unwrap();
    assert_eq!(reread.labels(), conversion.tree.labels());
    assert_eq!(reread.num_nodes(), conversion.tree.num_nodes());
}

// --- TESTS PAGES ---
#[test]
fn test_locator_finds_only_top_level_cladograms() {
    let html = page(&[NEORNITHES, "<table class=\"clade\"><tbody><tr><td class=\"clade-label\"></td><td class=\"clade-leaf\">Aves</td></tr></tbody></table>"]);
    let cladograms = find_cladograms(&html);
    assert_eq!(cladograms.len(), 2);
    assert!(cladograms[0].contains("Neornithes"));
    assert!(cladograms[1].contains("Aves"));

    assert!(find_cladograms(&page(&[])).is_empty());
}

#[test]
fn test_convert_page_keeps_going_after_failure() {
    let empty = "<table class=\"clade\"><tbody><tr><td class=\"clade-label\"></td><td class=\"clade-leaf\"><sup class=\"reference\">[2]</sup></td></tr></tbody></table>";
    let results = Converter::new().convert_page(&page(&[NEORNITHES, empty]));

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].as_ref().unwrap().newick,
        "((Struthio)Palaeognathae,Neognathae)Neornithes;"
    );
    assert_eq!(results[1], Err(TaxonomyError::EmptyTaxonomy));
}

// --- TESTS FILE OUTPUT ---
#[test]
fn test_write_newick_file() {
    let first = Converter::new().convert_html(NEORNITHES).unwrap().tree;
    let second = Converter::new().convert_html("<ul><li>Aves</li></ul>").unwrap().tree;
    let path = std::env::temp_dir().join(format!("cladewick-test-{}.nwk", std::process::id()));

    write_newick_file(&path, &[first, second], NewickStyle::Plain).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(written, "((Struthio)Palaeognathae,Neognathae)Neornithes;\nAves;\n");
}
