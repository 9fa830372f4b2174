//! End-to-end session scenarios against a fake provider

use threadsmith::commands::render_card;
use threadsmith::commands::Session;
use threadsmith::core::{ImagePanel, Visual};
use threadsmith::models::{Config, ImageStyle, ModelVersion, Mood, Post, Scene};

mod common;

use common::{tired_worker_post, FakeProvider};

fn session_with(provider: FakeProvider) -> Session<FakeProvider> {
    Session::new(Config::default(), provider)
}

#[tokio::test]
async fn test_generate_renders_single_post_scenario() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.selection_mut().mood = Mood::Cynical;
    session.selection_mut().scene = Scene::Work;

    let count = session.generate().await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(session.store().posts().len(), 1);
    assert_eq!(session.store().posts()[0].content, "上班好累");
    assert_eq!(session.store().posts()[0].tags, vec!["社畜"]);

    // The prompt carried the mood/scene labels and a tone directive
    let instruction = session.provider().last_instruction().unwrap();
    assert!(instruction.contains("厭世吐槽"));
    assert!(instruction.contains("職場社畜"));
    assert!(instruction.contains("時間感優化要求"));

    // Rendering produces one card showing the content and the tagged hashtag
    let card_text = render_card(&session.store().posts()[0], session.card(0).unwrap());
    assert!(card_text.contains("上班好累"));
    assert!(card_text.contains("#社畜"));
}

#[tokio::test]
async fn test_keyword_add_remove_reflected_in_next_prompt() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.selection_mut().add_keyword("颱風").unwrap();
    session.selection_mut().add_keyword("放假").unwrap();

    session.generate().await.unwrap();
    let instruction = session.provider().last_instruction().unwrap();
    assert!(instruction.contains("颱風"));
    assert!(instruction.contains("放假"));

    assert!(session.selection_mut().remove_keyword("颱風"));
    assert_eq!(session.selection().keywords(), ["放假"]);

    session.generate().await.unwrap();
    let instruction = session.provider().last_instruction().unwrap();
    assert!(!instruction.contains("颱風"));
    assert!(instruction.contains("放假"));
}

#[tokio::test]
async fn test_schedule_scenario() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.generate().await.unwrap();

    session.store_mut().schedule(0, "2025-03-09 21:00");
    let scheduled = session
        .store_mut()
        .schedule(0, "2025-03-10 09:00")
        .unwrap()
        .clone();

    assert_eq!(scheduled.scheduled_time, "2025-03-10 09:00");
    assert!(!scheduled.id.is_empty());
    // Newest entry sits at the head of the schedule list
    assert_eq!(session.store().scheduled()[0].id, scheduled.id);
    assert_ne!(session.store().scheduled()[1].id, scheduled.id);
}

#[tokio::test]
async fn test_generation_replaces_previous_batch_wholesale() {
    let mut session = session_with(FakeProvider::returning(vec![
        tired_worker_post(),
        Post::new("週五晚上喝一杯", vec!["TGIF".to_string()]),
    ]));
    session.generate().await.unwrap();
    assert_eq!(session.store().posts().len(), 2);
    session.store_mut().set_search_query("喝一杯");

    session.generate().await.unwrap();
    // Replaced, never appended; search query reset with the new batch
    assert_eq!(session.store().posts().len(), 2);
    assert_eq!(session.store().search_query(), "");
}

#[tokio::test]
async fn test_auth_failure_keeps_rendered_results() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.generate().await.unwrap();
    assert_eq!(session.store().posts().len(), 1);

    session.replace_provider(FakeProvider::rejecting_credential());
    let err = session.generate().await.unwrap_err();
    assert!(err.is_auth());

    // The failed call must not lose what was already on screen
    assert_eq!(session.store().posts().len(), 1);
    assert_eq!(session.store().posts()[0].content, "上班好累");
}

#[tokio::test]
async fn test_zero_item_generation_is_empty_not_error() {
    let mut session = session_with(FakeProvider::returning(Vec::new()));
    let count = session.generate().await.unwrap();
    assert_eq!(count, 0);
    assert!(session.store().posts().is_empty());
}

#[tokio::test]
async fn test_edit_commit_flows_through_store() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.generate().await.unwrap();

    let post = session.store().posts()[0].clone();
    let card = session.card_mut(0).unwrap();
    assert!(card.start_edit(&post));
    assert!(card.set_draft("改好的內容", "#foo, ,bar"));

    assert!(session.commit_edit(0));
    assert_eq!(session.store().posts()[0].content, "改好的內容");
    assert_eq!(session.store().posts()[0].tags, vec!["foo", "bar"]);
    assert!(!session.card(0).unwrap().is_editing());

    // Cancelled edits leave the post untouched
    let post = session.store().posts()[0].clone();
    let card = session.card_mut(0).unwrap();
    card.start_edit(&post);
    card.set_draft("不要這個", "x");
    assert!(card.cancel_edit());
    assert!(!session.commit_edit(0));
    assert_eq!(session.store().posts()[0].content, "改好的內容");
}

#[tokio::test]
async fn test_visual_generation_displays_result() {
    let visual = Visual::Image {
        mime_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    };
    let mut session = session_with(
        FakeProvider::returning(vec![tired_worker_post()]).with_visual(visual.clone()),
    );
    session.generate().await.unwrap();

    let displayed = session.request_visual(0, ImageStyle::Default).await.unwrap();
    assert!(displayed);
    assert!(matches!(
        session.card(0).unwrap().image_panel(),
        ImagePanel::Displaying(_)
    ));

    // Regenerating goes through the open panel and displays the new result
    let displayed = session.request_visual(0, ImageStyle::Cyberpunk).await.unwrap();
    assert!(displayed);
}

#[tokio::test]
async fn test_visual_without_payload_is_none_not_error() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.generate().await.unwrap();

    let displayed = session.request_visual(0, ImageStyle::Default).await.unwrap();
    assert!(!displayed);
    // Panel stays open so the user can retry
    assert_eq!(*session.card(0).unwrap().image_panel(), ImagePanel::Open);
}

#[tokio::test]
async fn test_copy_and_publish_formatting() {
    let mut session = session_with(FakeProvider::returning(vec![tired_worker_post()]));
    session.generate().await.unwrap();

    assert_eq!(session.copy_text(0).unwrap(), "上班好累\n\n#社畜");
    let url = session.publish_url(0).unwrap();
    assert!(url.starts_with("https://www.threads.net/intent/post?text="));
    assert!(!url.contains('#'));

    assert!(session.copy_text(99).is_none());
    assert!(session.publish_url(99).is_none());
}

#[tokio::test]
async fn test_model_version_flows_into_request() {
    let mut session = session_with(FakeProvider::returning(vec![]));
    session.selection_mut().model = ModelVersion::Pro;
    session.generate().await.unwrap();
    // The fake records only the instruction; the model id is covered by the
    // prompt builder unit tests. Here we just confirm the call happened.
    assert!(session.provider().last_instruction().is_some());
}
