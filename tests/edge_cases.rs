//! Edge case tests: degenerate listings must score without panicking and
//! stay within 0-100.

use listaudit::loader::{load_file, LoadError};
use listaudit::{score_listing, IssueValue, ListingImage, ListingInput, Rule};
use std::io::Write;
use tempfile::NamedTempFile;

fn titled(title: &str) -> ListingInput {
    ListingInput {
        title: title.to_string(),
        ..Default::default()
    }
}

fn write_listing(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn whitespace_only_title_is_missing() {
    let result = score_listing(&titled("   \t "));
    assert_eq!(result.categories.title.score, 0);
    assert!(result.has_issue(Rule::TitleMissing));
}

#[test]
fn accented_title_measured_in_characters() {
    let title = "Tasse à café en céramique émaillée";
    assert!(title.len() > title.chars().count());
    let result = score_listing(&titled(title));
    assert_eq!(result.categories.title.score, 100);
    assert!(result.categories.title.issues.is_empty());
}

#[test]
fn short_accented_title_reports_character_count() {
    let result = score_listing(&titled("Ça va café"));
    let issue = result
        .issues
        .iter()
        .find(|i| i.rule == Rule::TitleShort)
        .expect("title_short");
    assert_eq!(issue.current_value, Some(IssueValue::Number(10)));
}

#[test]
fn huge_description_stays_bounded() {
    let input = ListingInput {
        title: "Ceramic Coffee Mug With Handle".to_string(),
        description: "Step 1 done. ".repeat(10_000),
        ..Default::default()
    };
    let result = score_listing(&input);
    assert_eq!(result.categories.description.score, 100);
    assert!(result.overall_score <= 100);
}

#[test]
fn huge_repetitive_title() {
    let result = score_listing(&titled(&"Mug ".repeat(5_000)));
    assert_eq!(result.categories.title.score, 70);
    assert!(result.has_issue(Rule::TitleLong));
    assert!(result.has_issue(Rule::TitleRepetitive));
    assert!(!result.has_issue(Rule::TitleSpam));
}

#[test]
fn spam_patterns_detected() {
    for title in ["SUPERCHEAP ceramic mug", "Ceramic Mugggggg", "ÉÉÉÉÉÉÉÉÉÉ mug", "Mug!! on sale"] {
        let result = score_listing(&titled(title));
        assert!(result.has_issue(Rule::TitleSpam), "{} should be spam", title);
    }
    let result = score_listing(&titled("Coffee Mug, 350ml"));
    assert!(!result.has_issue(Rule::TitleSpam));
}

#[test]
fn non_positive_or_non_finite_price_is_missing() {
    for price in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let input = ListingInput {
            price: Some(price),
            ..Default::default()
        };
        let result = score_listing(&input);
        assert!(result.has_issue(Rule::NoPrice), "price {} should be rejected", price);
        assert_eq!(result.categories.structure.score, 0);
    }

    let input = ListingInput {
        price: Some(0.01),
        ..Default::default()
    };
    assert!(!score_listing(&input).has_issue(Rule::NoPrice));
}

#[test]
fn markup_only_description_is_missing() {
    let input = ListingInput {
        description: "<p><br/></p>  ".to_string(),
        ..Default::default()
    };
    let result = score_listing(&input);
    assert_eq!(result.categories.description.score, 0);
    assert!(result.has_issue(Rule::DescMissing));
}

#[test]
fn markup_around_title_still_echoes() {
    let title = "Handmade Speckled Stoneware Coffee Mug";
    let input = ListingInput {
        title: title.to_string(),
        description: format!("<p><b>{}</b></p>", title.to_uppercase()),
        ..Default::default()
    };
    assert!(score_listing(&input).has_issue(Rule::DescSameAsTitle));
}

#[test]
fn blank_alt_text_and_tags_do_not_count() {
    let input = ListingInput {
        images: vec![ListingImage::new("https://cdn.example.com/a.jpg").with_alt("   ")],
        tags: vec![String::new(), "  ".to_string()],
        sku: Some("  ".to_string()),
        ..Default::default()
    };
    let result = score_listing(&input);
    assert!(result.has_issue(Rule::MissingAlt));
    // only the valid image URL scores in images, nothing in structure
    assert_eq!(result.categories.images.score, 40);
    assert_eq!(result.categories.structure.score, 0);
}

#[test]
fn placeholder_category_ignored_in_any_case() {
    let input = ListingInput {
        category: Some("UNCATEGORIZED".to_string()),
        ..Default::default()
    };
    let result = score_listing(&input);
    assert_eq!(result.categories.meta.score, 0);
    assert_eq!(result.categories.structure.score, 0);
}

#[test]
fn unknown_fields_are_ignored() {
    let file = write_listing(r#"{"title":"Ceramic Coffee Mug","color":"red","stock":4}"#);
    let listings = load_file(file.path()).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].input.title, "Ceramic Coffee Mug");
}

#[test]
fn wrong_field_type_is_a_load_error() {
    let file = write_listing(r#"{"title":"Mug","price":"12.00"}"#);
    assert!(matches!(load_file(file.path()), Err(LoadError::Json { .. })));

    let file = write_listing("[1, 2]");
    assert!(matches!(load_file(file.path()), Err(LoadError::Json { .. })));
}

#[test]
fn empty_file_and_empty_array() {
    let file = write_listing("");
    assert!(matches!(load_file(file.path()), Err(LoadError::Json { .. })));

    let file = write_listing("[]");
    assert!(matches!(load_file(file.path()), Err(LoadError::Empty { .. })));
}

#[test]
fn blank_sku_falls_back_to_file_name() {
    let file = write_listing(r#"{"title":"Mug","sku":"   "}"#);
    let listings = load_file(file.path()).unwrap();
    let stem = file.path().file_stem().unwrap().to_string_lossy().into_owned();
    assert_eq!(listings[0].id, stem);
}

#[test]
fn null_fields_load_and_score_as_absent() {
    let file = write_listing(r#"{"title": null, "images": null, "tags": null, "price": 10}"#);
    let listings = load_file(file.path()).unwrap();
    let result = score_listing(&listings[0].input);
    assert!(result.has_issue(Rule::TitleMissing));
    assert!(result.has_issue(Rule::NoImages));
    assert!(!result.has_issue(Rule::NoPrice));
}

#[test]
fn null_field_does_not_sink_array_file() {
    let file = write_listing(
        r#"[{"sku": "A-1", "description": null}, {"sku": "A-2", "images": [{"url": null}]}]"#,
    );
    let listings = load_file(file.path()).unwrap();
    assert_eq!(listings.len(), 2);
    assert!(score_listing(&listings[0].input).has_issue(Rule::DescMissing));
    let second = score_listing(&listings[1].input);
    assert!(second.has_issue(Rule::MissingAlt));
    // one image, no alt, unparseable URL
    assert_eq!(second.categories.images.score, 15);
}
