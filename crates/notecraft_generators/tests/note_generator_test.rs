//! Tests for note orchestration and batch runs.

mod test_utils;

use notecraft_generators::NoteRequest;
use notecraft_storage::NoteStorage;
use tempfile::TempDir;
use test_utils::{IMAGE, MockImage, MockText, TEXT, config, files_in, pipeline, post, topic_list};

#[tokio::test]
async fn test_note_with_topic_is_saved() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(post("阳台小菜园"));
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("阳台种菜".to_string()),
        image_count: Some(2),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert_eq!(text.calls(), 1, "no topic generation when a topic is given");
    assert_eq!(note.title(), "阳台小菜园");
    assert_eq!(note.category(), "生活方式");
    assert_eq!(note.images().len(), 2);
    assert_eq!(note.metadata().content_provider(), TEXT);
    assert_eq!(note.metadata().image_provider().as_deref(), Some(IMAGE));
    assert_eq!(note.metadata().style(), "生活分享");
    assert_eq!(*note.metadata().image_failures(), 0);
    assert!(image.prompts()[0].starts_with("阳台小菜园"));

    let saved = generator.notes().list().await?;
    assert_eq!(saved, vec![note]);
    Ok(())
}

#[tokio::test]
async fn test_note_without_topic_generates_one() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(topic_list(&["通勤穿搭"])).push(post("一周通勤不重样"));
    let generator = pipeline(&config, &text, &MockImage::new());

    let request = NoteRequest {
        category: Some("时尚".to_string()),
        image_count: Some(0),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert_eq!(note.content().topic().title(), "通勤穿搭");
    assert_eq!(note.category(), "时尚");
    assert!(text.prompts()[1].contains("通勤穿搭"));
    Ok(())
}

#[tokio::test]
async fn test_topic_failure_falls_back_to_category() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push_err().push(post("读书的意义"));
    let generator = pipeline(&config, &text, &MockImage::new());

    let request = NoteRequest {
        category: Some("读书".to_string()),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert_eq!(note.content().topic().title(), "读书");
    assert!(text.prompts()[1].contains("读书"));
    Ok(())
}

#[tokio::test]
async fn test_image_failures_are_recorded() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(post("雪山"));
    let image = MockImage::failing_on(&[0, 1]);
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("雪山".to_string()),
        image_count: Some(2),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert!(note.images().is_empty());
    assert_eq!(*note.metadata().image_failures(), 2);
    assert_eq!(files_in(&config.output.content_dir).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_content_failure_saves_nothing() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push_err();
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("任何".to_string()),
        ..NoteRequest::default()
    };
    assert!(generator.generate_note(&request).await.is_err());
    assert_eq!(image.calls(), 0);
    assert!(files_in(&config.output.content_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_emoji_only_title_saves_nothing() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push("标题：🌸✨🍂\n正文：正文内容");
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("春天".to_string()),
        ..NoteRequest::default()
    };
    let err = generator
        .generate_note(&request)
        .await
        .expect_err("a title of emoji only is no title");
    assert!(format!("{err}").contains("title"));
    assert_eq!(image.calls(), 0);
    assert!(files_in(&config.output.content_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_custom_image_prompts_are_sent_as_is() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(post("周末露营"));
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("露营".to_string()),
        image_count: Some(2),
        image_prompts: Some(vec![
            "帐篷 星空".to_string(),
            "  ".to_string(),
            "篝火 晚餐".to_string(),
            "超出数量".to_string(),
        ]),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert_eq!(image.prompts(), ["帐篷 星空", "篝火 晚餐"]);
    let used: Vec<&str> = note.images().iter().map(|i| i.prompt().as_str()).collect();
    assert_eq!(used, ["帐篷 星空", "篝火 晚餐"]);
    Ok(())
}

#[tokio::test]
async fn test_derived_image_prompts_differ_per_image() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(post("阳台小菜园"));
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("阳台种菜".to_string()),
        image_count: Some(3),
        ..NoteRequest::default()
    };
    generator.generate_note(&request).await?;

    let prompts = image.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].starts_with("阳台小菜园"));
    assert!(prompts[1].starts_with("第一段"));
    assert!(prompts[2].starts_with("第二段"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_provider_fails_before_any_request() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    let generator = pipeline(&config, &text, &MockImage::new());

    let request = NoteRequest {
        topic: Some("t".to_string()),
        content_provider: Some("nonexistent".to_string()),
        ..NoteRequest::default()
    };
    let err = generator.generate_note(&request).await.expect_err("unknown provider");

    assert!(err.is_config());
    assert_eq!(text.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_blank_image_provider_disables_images() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let mut config = config(temp.path());
    config.generation.image_provider = String::new();
    let text = MockText::new();
    text.push(post("无图笔记"));
    let image = MockImage::new();
    let generator = pipeline(&config, &text, &image);

    let request = NoteRequest {
        topic: Some("无图".to_string()),
        image_count: Some(3),
        ..NoteRequest::default()
    };
    let note = generator.generate_note(&request).await?;

    assert_eq!(image.calls(), 0);
    assert!(note.metadata().image_provider().is_none());
    Ok(())
}

#[tokio::test]
async fn test_batch_skips_failed_item_and_keeps_order() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(topic_list(&["第一", "第二", "第三"]))
        .push(post("一号笔记"))
        .push_err()
        .push(post("三号笔记"));
    let generator = pipeline(&config, &text, &MockImage::new());

    let report = generator
        .batch_generate_notes(3, &NoteRequest::default())
        .await?;

    assert_eq!(*report.requested(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    let titles: Vec<&str> = report.notes().iter().map(|n| n.title()).collect();
    assert_eq!(titles, ["一号笔记", "三号笔记"]);

    let failure = &report.failures()[0];
    assert_eq!(*failure.index(), 1);
    assert_eq!(failure.topic(), "第二");
    assert!(failure.message().contains("401"));

    assert_eq!(files_in(&config.output.content_dir).len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_batch_topic_failure_returns_empty_report() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push_err();
    let generator = pipeline(&config, &text, &MockImage::new());

    let report = generator
        .batch_generate_notes(4, &NoteRequest::default())
        .await?;

    assert!(report.notes().is_empty());
    assert!(report.failures().is_empty());
    assert!(report.topic_error().is_some());
    assert_eq!(text.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_batch_item_retries() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let mut config = config(temp.path());
    config.generation.item_retries = 1;
    let text = MockText::new();
    text.push(topic_list(&["甲", "乙"]))
        .push_err()
        .push(post("甲笔记"))
        .push(post("乙笔记"));
    let generator = pipeline(&config, &text, &MockImage::new());

    let report = generator
        .batch_generate_notes(2, &NoteRequest::default())
        .await?;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(text.calls(), 4);
    Ok(())
}

#[tokio::test]
async fn test_topic_contents_continue_past_failures() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = config(temp.path());
    let text = MockText::new();
    text.push(topic_list(&["春", "夏"]))
        .push_err()
        .push(post("夏天的冰饮"));
    let generator = pipeline(&config, &text, &MockImage::new());

    let report = generator
        .generate_topic_contents(Some("季节"), Some(2), Some("轻松"), None)
        .await?;

    assert_eq!(report.contents().len(), 1);
    assert_eq!(report.contents()[0].title(), "夏天的冰饮");
    assert_eq!(report.failures()[0].topic(), "春");
    assert!(files_in(&config.output.content_dir).is_empty());
    Ok(())
}
