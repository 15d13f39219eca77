//! 错误处理集成测试
//!
//! 测试任一部件失败时整个文稿被拒绝

use slide_translate::package::PackageOptions;
use slide_translate::translation::{
    ErrorCategory, PackageError, PackageTranslator, TranslationError,
};

mod common {
    include!("common/mod.rs");
}

use common::{dictionary, DeckBuilder, RecordingClient, SLIDE_A, SLIDE_B};

#[tokio::test]
async fn test_provider_failure_aborts_package() {
    let deck = DeckBuilder::standard();
    let client = RecordingClient::new(dictionary()).failing_on("World");

    let error = PackageTranslator::default()
        .translate_package(&deck, "en", "fr", &client)
        .await
        .expect_err("a provider failure must reject the whole deck");

    // 部件 B 没有收到任何调用
    assert_eq!(client.calls(), vec!["Hello", "World"]);

    match &error {
        PackageError::Translation { part, failure } => {
            assert_eq!(part, SLIDE_A);
            assert_eq!(failure.leaf_index, 2);
            assert_eq!(failure.text, "World");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let cause = error.provider_error().unwrap();
    assert!(matches!(cause, TranslationError::Provider { status: 429, .. }));
    assert_eq!(cause.category(), ErrorCategory::Provider);
    assert!(error.to_string().contains("rate limited"));
}

#[tokio::test]
async fn test_failure_in_later_part_still_rejects() {
    let deck = DeckBuilder::standard();
    let client = RecordingClient::new(dictionary()).failing_on("Foo");

    let error = PackageTranslator::default()
        .translate_package(&deck, "en", "fr", &client)
        .await
        .unwrap_err();

    assert_eq!(error.part(), Some(SLIDE_B));
    assert_eq!(client.calls(), vec!["Hello", "World", "Foo"]);
}

#[tokio::test]
async fn test_oversized_part_rejects_package() {
    let long_text = "x".repeat(16 * 1024);
    let deck = DeckBuilder::build(&[
        (SLIDE_A, &["Hello"][..]),
        (SLIDE_B, &[long_text.as_str()][..]),
    ]);
    let options = PackageOptions {
        max_part_bytes: 4096,
        ..PackageOptions::default()
    };
    let client = RecordingClient::new(dictionary());

    let error = PackageTranslator::new(options)
        .translate_package(&deck, "en", "fr", &client)
        .await
        .expect_err("an oversized slide must reject the whole deck");

    assert_eq!(client.calls(), vec!["Hello"]);
    match &error {
        PackageError::Read { part, message } => {
            assert_eq!(part, SLIDE_B);
            assert!(message.contains("4096"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_not_a_zip_archive() {
    let client = RecordingClient::new(dictionary());
    let error = PackageTranslator::default()
        .translate_package(b"plain text, not a deck", "en", "fr", &client)
        .await
        .unwrap_err();

    assert!(matches!(error, PackageError::Archive(_)));
    assert_eq!(error.part(), None);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_slide_is_reported_with_its_path() {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("ppt/slides/slide1.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<p:sld><a:t>broken</p:sld>").unwrap();
    let deck = writer.finish().unwrap().into_inner();

    let client = RecordingClient::new(dictionary());
    let error = PackageTranslator::default()
        .translate_package(&deck, "en", "fr", &client)
        .await
        .unwrap_err();

    assert!(matches!(error, PackageError::Parse { .. }));
    assert_eq!(error.part(), Some("ppt/slides/slide1.xml"));
    assert!(client.calls().is_empty());
}

#[test]
fn test_inspect_reports_malformed_slide() {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("ppt/slides/slide3.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&[0xff, 0xfe, 0x00]).unwrap();
    let deck = writer.finish().unwrap().into_inner();

    let error = PackageTranslator::default().inspect(&deck).unwrap_err();
    assert_eq!(error.part(), Some("ppt/slides/slide3.xml"));
}
