//! Tests for the topic, content and image generators.

mod test_utils;

use notecraft_config::NotecraftConfig;
use notecraft_core::{Content, ImageParams, ScriptFilter, Topic};
use notecraft_error::NotecraftErrorKind;
use notecraft_generators::{ContentGenerator, ImageGenerator, TopicGenerator};
use notecraft_storage::FileSystemImageStorage;
use std::sync::Arc;
use tempfile::TempDir;
use test_utils::{IMAGE, MockImage, MockText, files_in, post, topic_list};

#[tokio::test]
async fn test_zero_topics_makes_no_request() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    let generator = TopicGenerator::new(text.clone(), &config.prompts);

    assert!(generator.generate_topics("美食", 0).await?.is_empty());
    assert_eq!(text.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_topics_carry_requested_category() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    text.push(topic_list(&["早餐", "午餐", "晚餐"]));
    let generator = TopicGenerator::new(text.clone(), &config.prompts);

    let topics = generator.generate_topics("美食", 3).await?;

    assert_eq!(topics.len(), 3);
    assert!(topics.iter().all(|t| t.category() == "美食"));
    let prompt = &text.prompts()[0];
    assert!(prompt.contains("3个"));
    assert!(prompt.contains("\"美食\""));
    assert!(text.system_prompts()[0].is_some());
    Ok(())
}

#[tokio::test]
async fn test_fewer_topics_than_requested_is_accepted() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    text.push("1. 标题：只有一个\n描述：其余的没有生成");
    let generator = TopicGenerator::new(text.clone(), &config.prompts);

    assert_eq!(generator.generate_topics("美食", 5).await?.len(), 1);
    assert_eq!(text.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_content_prompt_uses_topic_and_style() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    text.push(post("周末露营清单"));
    let generator = ContentGenerator::new(text.clone(), &config.prompts);
    let topic = Topic::from_title("户外", "新手露营");

    let content = generator.generate_content(&topic, "干货教程").await?;

    assert_eq!(content.title(), "周末露营清单");
    assert_eq!(content.body(), "第一段。\n\n第二段。");
    assert_eq!(content.hashtags(), &["日常", "分享"]);
    assert_eq!(content.topic(), &topic);
    let prompt = &text.prompts()[0];
    assert!(prompt.contains("新手露营"));
    assert!(prompt.contains("干货教程"));
    Ok(())
}

#[tokio::test]
async fn test_unparseable_content_is_parse_error() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    text.push("抱歉，我无法完成这个请求。");
    let generator = ContentGenerator::new(text.clone(), &config.prompts);

    let err = generator
        .generate_content(&Topic::from_title("c", "t"), "s")
        .await
        .expect_err("no sections");
    assert!(matches!(err.kind(), NotecraftErrorKind::Parse(_)));
    Ok(())
}

#[tokio::test]
async fn test_provider_error_propagates_from_content() -> anyhow::Result<()> {
    let config = NotecraftConfig::bundled()?;
    let text = MockText::new();
    text.push_err();
    let generator = ContentGenerator::new(text.clone(), &config.prompts);

    let err = generator
        .generate_content(&Topic::from_title("c", "t"), "s")
        .await
        .expect_err("provider rejected");
    assert!(matches!(err.kind(), NotecraftErrorKind::Provider(_)));
    Ok(())
}

#[tokio::test]
async fn test_image_prompt_keeps_target_script() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = NotecraftConfig::bundled()?;
    let image = MockImage::new();
    let storage = Arc::new(FileSystemImageStorage::new(temp.path())?);
    let generator = ImageGenerator::new(image.clone(), storage, &config.prompts, ScriptFilter::Han);

    assert!(generator.prompt_for("秋日🍂穿搭 OOTD!").starts_with("秋日穿搭，小红书风格"));
    // Nothing survives the Han filter, so the title is used as written.
    assert!(generator.prompt_for("Autumn  looks").starts_with("Autumn looks，"));
    Ok(())
}

#[tokio::test]
async fn test_partial_image_failure_is_not_fatal() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = NotecraftConfig::bundled()?;
    let image = MockImage::failing_on(&[1]);
    let storage = Arc::new(FileSystemImageStorage::new(temp.path())?);
    let generator = ImageGenerator::new(image.clone(), storage, &config.prompts, ScriptFilter::Han);

    let batch = generator
        .generate("雪山日出", &ImageParams::new(1024, 1024), 3)
        .await;

    assert_eq!(image.calls(), 3);
    assert_eq!(batch.images().len(), 2);
    assert_eq!(*batch.failures(), 1);
    assert!(image.prompts().iter().all(|p| p == "雪山日出"));

    let files = files_in(temp.path());
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.starts_with(IMAGE) && f.ends_with(".png")));

    let first = &batch.images()[0];
    assert_eq!((*first.width(), *first.height()), (1024, 1024));
    assert_eq!(first.provider(), IMAGE);
    assert_eq!(first.source_url().as_deref(), Some("https://cdn.example.com/0.png"));
    assert!(first.path().exists());
    Ok(())
}

#[tokio::test]
async fn test_post_prompts_use_title_then_paragraphs() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let config = NotecraftConfig::bundled()?;
    let storage = Arc::new(FileSystemImageStorage::new(temp.path())?);
    let generator = ImageGenerator::new(MockImage::new(), storage, &config.prompts, ScriptFilter::Han);
    let content = Content::new(
        Topic::from_title("旅行", "海边"),
        "海边日落",
        "沙滩上的🐚贝壳\n\n傍晚的渔船",
        vec![],
        "",
    );

    let prompts = generator.prompts_for(&content, 5);
    assert_eq!(prompts.len(), 5);
    assert!(prompts[0].starts_with("海边日落，"));
    assert!(prompts[1].starts_with("沙滩上的贝壳，"));
    assert!(prompts[2].starts_with("傍晚的渔船，"));
    assert!(prompts[3].starts_with("海边日落细节特写，"));
    assert!(prompts[4].starts_with("海边日落生活场景，"));
    assert!(generator.prompts_for(&content, 0).is_empty());
    Ok(())
}
