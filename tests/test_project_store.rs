//! Integration tests for the saved project store.
//!
//! Tests cover:
//! - Saving new projects and replacing existing ones
//! - Conversation, contract, stencil and artist updates
//! - Deleting projects
//! - Concurrent updates to the same project
//! - The raw `inkgenius_projects` value and how unreadable data is treated
//! - Persistence across reopening the database

mod common;

use inkgenius::core::db::PROJECTS_KEY;

use common::*;

#[tokio::test]
async fn test_empty_store_lists_nothing() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;

    assert!(studio.list_projects().await?.is_empty());
    assert!(studio.get_item(PROJECTS_KEY).await?.is_none());
    assert!(studio.get_project("missing").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_save_adds_exactly_one_entry() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let project = make_test_project("a fox and a moon");

    studio.save_project(&project).await?;

    let projects = studio.list_projects().await?;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0], project);

    // stored as a JSON array under the well-known key
    let raw = studio.get_item(PROJECTS_KEY).await?.expect("projects key should be set");
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["id"], project.id.as_str());
    assert!(value[0]["savedAt"].is_i64());

    Ok(())
}

#[tokio::test]
async fn test_new_projects_go_first_and_resave_replaces_in_place() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let first = make_test_project("first");
    let second = make_test_project("second");

    studio.save_project(&first).await?;
    studio.save_project(&second).await?;

    let ids: Vec<String> = studio.list_projects().await?.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

    // saving the first again with a change keeps its position and the count
    let mut changed = first.clone();
    changed.prompt = Some("first, revised".to_string());
    studio.save_project(&changed).await?;

    let projects = studio.list_projects().await?;
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].id, first.id);
    assert_eq!(projects[1].prompt.as_deref(), Some("first, revised"));

    Ok(())
}

#[tokio::test]
async fn test_conversation_is_appended_in_order() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let project = make_test_project("koi").with_artist(make_test_artist("Iron Rose"));
    studio.save_project(&project).await?;

    studio
        .append_message(&project.id, Message::from_user("Hi, are you booking in May?"))
        .await?;
    let updated = studio
        .append_message(&project.id, Message::from_artist("Yes, we have a few slots."))
        .await?;

    assert_eq!(updated.conversation.len(), 2);
    assert_eq!(updated.conversation[0].sender, Sender::User);
    assert_eq!(updated.conversation[1].sender, Sender::Artist);
    assert!(updated.conversation[0].timestamp <= updated.conversation[1].timestamp);

    let stored = studio.get_project(&project.id).await?.expect("project should exist");
    assert_eq!(stored.conversation, updated.conversation);

    Ok(())
}

#[tokio::test]
async fn test_contract_stencil_and_artist_updates() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let project = make_test_project("rose");
    studio.save_project(&project).await?;

    let contract = Contract {
        status: ContractStatus::InProgress,
        price: Some(320.0),
        date: Some("2026-11-20".to_string()),
    };
    studio.update_contract(&project.id, contract.clone()).await?;
    studio.set_stencil(&project.id, test_design_uri()).await?;
    let updated = studio.set_artist(&project.id, make_test_artist("Black Lotus")).await?;

    assert_eq!(updated.contract, Some(contract));
    assert_eq!(updated.stencil.as_deref(), Some(test_design_uri().as_str()));
    assert_eq!(updated.artist.as_ref().map(|a| a.name.as_str()), Some("Black Lotus"));

    let raw = studio.get_item(PROJECTS_KEY).await?.expect("projects key should be set");
    assert!(raw.contains("\"In Progress\""));

    Ok(())
}

#[tokio::test]
async fn test_updates_to_unknown_project_fail() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    studio.save_project(&make_test_project("only")).await?;

    assert!(studio.append_message("nope", Message::from_user("hello")).await.is_err());
    assert!(studio.delete_project("nope").await.is_err());
    assert_eq!(studio.list_projects().await?.len(), 1);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_all_land() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let project = make_test_project("swallow");
    studio.save_project(&project).await?;

    for round in 0..20 {
        let contract = Contract {
            status: ContractStatus::Pending,
            price: Some(round as f64),
            date: None,
        };
        let (appended, updated) = tokio::join!(
            studio.append_message(&project.id, Message::from_user(format!("message {round}"))),
            studio.update_contract(&project.id, contract),
        );
        appended?;
        updated?;
    }

    let stored = studio.get_project(&project.id).await?.expect("project should exist");
    assert_eq!(stored.conversation.len(), 20);
    assert_eq!(stored.conversation[19].text, "message 19");
    assert_eq!(stored.contract.and_then(|c| c.price), Some(19.0));

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_that_project() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    let keep = make_test_project("keep");
    let drop = make_test_project("drop");
    studio.save_project(&keep).await?;
    studio.save_project(&drop).await?;

    studio.delete_project(&drop.id).await?;

    let projects = studio.list_projects().await?;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, keep.id);

    Ok(())
}

#[tokio::test]
async fn test_unreadable_projects_read_as_empty_but_are_not_overwritten() -> anyhow::Result<()> {
    let (studio, _temp_dir) = create_test_studio().await;
    studio.set_item(PROJECTS_KEY, "{not json").await?;

    assert!(studio.list_projects().await?.is_empty());
    assert!(studio.save_project(&make_test_project("new")).await.is_err());
    assert_eq!(studio.get_item(PROJECTS_KEY).await?.as_deref(), Some("{not json"));

    // clearing the key recovers
    studio.remove_item(PROJECTS_KEY).await?;
    studio.save_project(&make_test_project("new")).await?;
    assert_eq!(studio.list_projects().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_projects_persist_across_reopen() -> anyhow::Result<()> {
    let (studio, temp_dir) = create_test_studio().await;
    let project = make_test_project("persist me").with_artist(make_test_artist("Iron Rose"));
    studio.save_project(&project).await?;
    studio
        .append_message(&project.id, Message::from_user("Still open?"))
        .await?;
    let path = studio.path().to_path_buf();
    studio.close().await;

    let reopened = StudioDb::open(&path).await?;
    let projects = reopened.list_projects().await?;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project.id);
    assert_eq!(projects[0].conversation.len(), 1);
    drop(temp_dir);

    Ok(())
}
