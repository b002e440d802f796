use mdimg::links::{extract_image_targets, normalize_embeds, rewrite_links, ConversionMap};

#[test]
fn test_extract_mixed_local_and_remote() {
    let content = "a ![x](1.png) b ![y](http://h/2.png)";
    assert_eq!(extract_image_targets(content), vec!["1.png", "http://h/2.png"]);
}

#[test]
fn test_normalized_embeds_become_extractable() {
    let content = normalize_embeds("Look: ![[pic.png]]\n![[img/other.jpg]]", "note");
    assert_eq!(extract_image_targets(&content), vec!["pic.png", "img/other.jpg"]);
}

#[test]
fn test_rewrite_preserves_empty_description() {
    let mut map = ConversionMap::new();
    map.insert("pic.png".to_string(), "http://cdn/pic.png".to_string());

    assert_eq!(rewrite_links("![](pic.png)", &map), "![](http://cdn/pic.png)");
}

#[test]
fn test_target_with_paren_is_cut_short() {
    // Link targets containing `)` are not supported
    let targets = extract_image_targets("![x](photo(1).png)");
    assert_eq!(targets, vec!["photo(1"]);
}
