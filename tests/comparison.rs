use lexcompare::{
    Document, EngineConfig, Status, TokenKind, TokenizeConfig, compare_documents, similarity,
    tokenize,
};

fn law(id: &str, title: &str, content: &str) -> Document {
    Document::new(id, title)
        .with_type("Luật")
        .with_content(content)
}

fn long_sentence(topic: &str) -> String {
    format!(
        "Quy định về {topic} được áp dụng thống nhất trên phạm vi cả nước đối với mọi cơ quan, tổ chức và cá nhân có liên quan."
    )
}

#[test]
fn similarity_is_symmetric_and_bounded() {
    let pairs = [
        ("Điều 1. Phạm vi điều chỉnh", "Điều 1. Đối tượng áp dụng"),
        ("kitten", "sitting"),
        ("", "abc"),
        ("Luật Đất đai", "Luật Đất đai"),
    ];
    for (a, b) in pairs {
        let ab = similarity(a, b);
        assert_eq!(ab, similarity(b, a));
        assert!((0.0..=100.0).contains(&ab));
    }
    assert_eq!(similarity("Luật", "Luật"), 100.0);
    assert_eq!(similarity("", ""), 100.0);
    assert_eq!(similarity("", "abc"), 0.0);
}

#[test]
fn paragraph_indices_never_decrease() {
    let markup = format!(
        "<p>Điều 1. Ngắn.</p><p>{} {} {}</p><p>Điều 3.</p>",
        long_sentence("thuế"),
        long_sentence("phí"),
        long_sentence("lệ phí"),
    );
    let tokens = tokenize(&markup, &TokenizeConfig::default());
    assert!(tokens.len() >= 4);
    assert!(tokens
        .windows(2)
        .all(|w| w[0].paragraph_index <= w[1].paragraph_index));
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Sentence));
}

#[test]
fn identical_documents_report_no_changes() {
    let content = "<p>Điều 1. Phạm vi điều chỉnh.</p><p>Điều 2. Đối tượng áp dụng.</p>";
    let current = law("2", "Luật Thuế 2020", content);
    let previous = law("1", "Luật Thuế 2015", content);

    let result = compare_documents(Some(&current), Some(&previous), &EngineConfig::default())
        .into_result()
        .unwrap();
    assert!(result.comparison.additions.is_empty());
    assert!(result.comparison.deletions.is_empty());
    assert!(result.comparison.modifications.is_empty());
    assert!(result.comparison.summary.contains("<strong>0</strong>"));
}

#[test]
fn new_article_is_reported_as_an_addition() {
    let previous = law("1", "Luật Đất đai 2003", "<p>Điều 1. Abc.</p>");
    let current = law(
        "2",
        "Luật Đất đai 2013",
        "<p>Điều 1. Abc.</p><p>Điều 2. Mới.</p>",
    );

    let result = compare_documents(Some(&current), Some(&previous), &EngineConfig::default())
        .into_result()
        .unwrap();
    let additions = &result.comparison.additions;
    assert_eq!(additions.len(), 1);
    assert!(additions[0].content.contains("Điều 2. Mới."));
    assert_eq!(additions[0].location, "Đoạn 2");
    assert!(result.comparison.deletions.is_empty());
}

#[test]
fn removed_article_is_reported_as_a_deletion() {
    let previous = law(
        "1",
        "Luật Đất đai 2003",
        "<p>Điều 1. Abc.</p><p>Điều 2. Quy định về giao đất cho hộ gia đình.</p>",
    );
    let current = law("2", "Luật Đất đai 2013", "<p>Điều 1. Abc.</p>");

    let result = compare_documents(Some(&current), Some(&previous), &EngineConfig::default())
        .into_result()
        .unwrap();
    let deletions = &result.comparison.deletions;
    assert_eq!(deletions.len(), 1);
    assert!(deletions[0].content.contains("giao đất"));
    assert!(deletions[0].location.contains("trong văn bản cũ"));
}

#[test]
fn appended_sentence_in_long_paragraph_is_an_addition() {
    let base = format!(
        "{} {} {}",
        long_sentence("thuế thu nhập"),
        long_sentence("phí bảo vệ môi trường"),
        long_sentence("lệ phí trước bạ"),
    );
    let extra = "Trường hợp điều ước quốc tế mà Việt Nam là thành viên có quy định khác thì áp dụng theo điều ước quốc tế đó.";
    let previous = law("1", "Luật Thuế", &format!("<p>{base}</p>"));
    let current = law("2", "Luật Thuế", &format!("<p>{base} {extra}</p>"));

    let result = compare_documents(Some(&current), Some(&previous), &EngineConfig::default())
        .into_result()
        .unwrap();
    let additions = &result.comparison.additions;
    assert_eq!(additions.len(), 1);
    assert!(additions[0].content.contains("điều ước quốc tế"));
    assert!(result.comparison.deletions.is_empty());
}

#[test]
fn absent_document_yields_error_envelope() {
    let doc = law("1", "Luật Đất đai", "<p>Điều 1.</p>");
    let envelope = compare_documents(None, Some(&doc), &EngineConfig::default());
    assert_eq!(envelope.status, Status::Error);
    assert!(envelope.data.is_none());
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["data"], serde_json::json!([]));
}

#[test]
fn yaml_config_drives_labels_and_thresholds() {
    let cfg = EngineConfig::from_yaml(
        r#"
version: "1.0"
diff:
  labels: english
  addition_threshold: 0.5
  modification_upper: 0.9
"#,
    )
    .unwrap();
    let previous = Document::new("1", "Tax Act").with_content("<p>Article 1. Scope.</p>");
    let current = Document::new("2", "Tax Act")
        .with_content("<p>Article 1. Scope.</p><p>Article 2. Subjects of taxation.</p>");

    let result = compare_documents(Some(&current), Some(&previous), &cfg)
        .into_result()
        .unwrap();
    assert_eq!(result.comparison.additions.len(), 1);
    assert_eq!(result.comparison.additions[0].location, "Paragraph 2");
    assert_eq!(result.documents_info.current.document_type, "Unknown");
}
