#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end relay behavior against an in-memory directory and recording
//! fakes for the chat platform and SMS gateway.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    secrecy::Secret,
    textline_directory::{Directory, MemoryDirectory, NewConversation, Trigger},
    textline_relay::{
        BridgeIdentity, ChannelHandle, ChatApi, ChatPost, HistoryMessage, OperatorAction,
        PickerItem, Relay, SmsGateway, TriggerOutcome,
    },
};

const SENDER: &str = "+15557654321";
const RECEIVER: &str = "+15550001111";
const TOKEN: &str = "trigger-secret";

#[derive(Default)]
struct FakeChat {
    posts: Mutex<Vec<ChatPost>>,
    operator_posts: Mutex<Vec<(String, String)>>,
    pickers: Mutex<Vec<(String, Vec<PickerItem>)>>,
    deleted: Mutex<Vec<(String, String)>>,
    invites: Mutex<Vec<(String, String)>>,
    channels_created: AtomicUsize,
    history: Mutex<Vec<HistoryMessage>>,
}

impl FakeChat {
    fn set_history(&self, messages: Vec<HistoryMessage>) {
        *self.history.lock().unwrap() = messages;
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn create_channel(&self, name: &str) -> anyhow::Result<ChannelHandle> {
        let n = self.channels_created.fetch_add(1, Ordering::SeqCst);
        Ok(ChannelHandle {
            id: format!("C{n}"),
            name: name.to_string(),
        })
    }

    async fn invite(&self, channel_id: &str, user_id: &str) -> anyhow::Result<()> {
        self.invites
            .lock()
            .unwrap()
            .push((channel_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn post_message(&self, post: &ChatPost) -> anyhow::Result<()> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn post_as_operator(&self, channel_id: &str, text: &str) -> anyhow::Result<()> {
        self.operator_posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn post_picker(&self, channel_id: &str, items: &[PickerItem]) -> anyhow::Result<()> {
        self.pickers
            .lock()
            .unwrap()
            .push((channel_id.to_string(), items.to_vec()));
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, ts: &str) -> anyhow::Result<()> {
        self.deleted
            .lock()
            .unwrap()
            .push((channel_id.to_string(), ts.to_string()));
        Ok(())
    }

    async fn history(&self, _channel_id: &str) -> anyhow::Result<Vec<HistoryMessage>> {
        Ok(self.history.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct FakeSms {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl SmsGateway for FakeSms {
    async fn send(&self, from: &str, to: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string(), body.to_string()));
        Ok(())
    }
}

fn setup() -> (Relay, Arc<MemoryDirectory>, Arc<FakeChat>, Arc<FakeSms>) {
    let directory = Arc::new(MemoryDirectory::new());
    let chat = Arc::new(FakeChat::default());
    let sms = Arc::new(FakeSms::default());
    let relay = Relay::new(
        Arc::clone(&directory) as Arc<dyn Directory>,
        Arc::clone(&chat) as Arc<dyn ChatApi>,
        Arc::clone(&sms) as Arc<dyn SmsGateway>,
        BridgeIdentity {
            user_id: "U-BRIDGE".into(),
            bot_id: "B-BRIDGE".into(),
        },
        Secret::new(TOKEN.into()),
    );
    (relay, directory, chat, sms)
}

/// Bind a second pair to an existing channel, bypassing the resolver.
async fn bind_pair(directory: &MemoryDirectory, sender: &str, channel_id: &str) {
    directory
        .insert_conversation(NewConversation {
            sender: sender.into(),
            receiver: RECEIVER.into(),
            channel_id: channel_id.into(),
            display_name: format!("sms-{}", sender.trim_start_matches('+')),
        })
        .await
        .unwrap();
}

// ── Session resolution ──────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_twice_yields_one_conversation() {
    let (relay, _, chat, _) = setup();

    let first = relay.resolve(SENDER, RECEIVER).await.unwrap();
    let second = relay.resolve(SENDER, RECEIVER).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(chat.channels_created.load(Ordering::SeqCst), 1);
    assert_eq!(
        chat.invites.lock().unwrap().as_slice(),
        &[(first.channel_id.clone(), "U-BRIDGE".to_string())]
    );
}

#[tokio::test]
async fn concurrent_resolution_converges_on_one_record() {
    let (relay, directory, _, _) = setup();

    let (a, b) = tokio::join!(relay.resolve(SENDER, RECEIVER), relay.resolve(SENDER, RECEIVER));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.id, b.id);
    let bound = directory.conversation_by_pair(SENDER, RECEIVER).await.unwrap().unwrap();
    assert_eq!(bound.id, a.id);
}

#[tokio::test]
async fn resolver_names_channel_after_sender() {
    let (relay, _, _, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    assert_eq!(conversation.display_name, "sms-15557654321");
}

// ── Inbound routing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn inbound_sms_posts_once_into_bound_channel() {
    let (relay, _, chat, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay.on_inbound_sms(SENDER, RECEIVER, "hello").await;

    let posts = chat.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel_id, conversation.channel_id);
    assert_eq!(posts[0].text, "hello");
    assert_eq!(posts[0].username.as_deref(), Some("Sms 15557654321"));
    assert_eq!(posts[0].icon_url, None);
}

#[tokio::test]
async fn inbound_sms_carries_avatar_when_set() {
    let (relay, directory, chat, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    directory
        .update_avatar_url(&conversation.id, "https://example.com/jane.png")
        .await
        .unwrap();

    relay.on_inbound_sms(SENDER, RECEIVER, "hi again").await;

    let posts = chat.posts.lock().unwrap();
    assert_eq!(
        posts[0].icon_url.as_deref(),
        Some("https://example.com/jane.png")
    );
}

// ── Outbound relay ──────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_message_sends_sms_direction_swapped() {
    let (relay, _, _, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay
        .on_channel_message(&conversation.channel_id, "hi", None)
        .await;

    let sent = sms.sent.lock().unwrap();
    assert_eq!(
        sent.as_slice(),
        &[(RECEIVER.to_string(), SENDER.to_string(), "hi".to_string())]
    );
}

#[tokio::test]
async fn subtyped_messages_are_not_relayed() {
    let (relay, _, _, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay
        .on_channel_message(&conversation.channel_id, "relayed text", Some("bot_message"))
        .await;

    assert!(sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unbound_channel_message_is_a_noop() {
    let (relay, _, _, sms) = setup();
    relay.on_channel_message("C-unbound", "hi", None).await;
    assert!(sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn outbound_text_is_emoji_expanded() {
    let (relay, _, _, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay
        .on_channel_message(&conversation.channel_id, "bye :wave:", None)
        .await;

    assert_eq!(sms.sent.lock().unwrap()[0].2, "bye \u{1f44b}");
}

#[tokio::test]
async fn multi_bound_channel_fans_out_one_send_per_record() {
    let (relay, directory, _, sms) = setup();
    bind_pair(&directory, "+15550000001", "C9").await;
    bind_pair(&directory, "+15550000002", "C9").await;

    relay.on_channel_message("C9", "broadcast", None).await;

    let mut sent = sms.sent.lock().unwrap().clone();
    sent.sort();
    assert_eq!(
        sent,
        vec![
            (RECEIVER.into(), "+15550000001".into(), "broadcast".into()),
            (RECEIVER.into(), "+15550000002".into(), "broadcast".into()),
        ]
    );
}

// ── Reaction relay ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reaction_on_relayed_post_is_annotated_and_sent() {
    let (relay, _, chat, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    chat.set_history(vec![HistoryMessage {
        ts: "111.222".into(),
        text: "hello :tada:".into(),
        subtype: Some("bot_message".into()),
        bot_id: Some("B-BRIDGE".into()),
    }]);

    relay
        .on_reaction(&conversation.channel_id, "111.222", "message", "wave")
        .await;

    let sent = sms.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].2,
        "Reacted with \u{1f44b} to \"hello \u{1f389}\""
    );
    assert_eq!(sent[0].0, RECEIVER);
    assert_eq!(sent[0].1, SENDER);
}

#[tokio::test]
async fn reaction_on_human_post_stays_in_channel() {
    let (relay, _, chat, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    chat.set_history(vec![HistoryMessage {
        ts: "111.222".into(),
        text: "colleague note".into(),
        subtype: None,
        bot_id: None,
    }]);

    relay
        .on_reaction(&conversation.channel_id, "111.222", "message", "wave")
        .await;

    assert!(sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reaction_on_foreign_bot_post_is_ignored() {
    let (relay, _, chat, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    chat.set_history(vec![HistoryMessage {
        ts: "111.222".into(),
        text: "some other integration".into(),
        subtype: Some("bot_message".into()),
        bot_id: Some("B-OTHER".into()),
    }]);

    relay
        .on_reaction(&conversation.channel_id, "111.222", "message", "wave")
        .await;

    assert!(sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_message_reaction_items_are_ignored() {
    let (relay, _, chat, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    chat.set_history(vec![HistoryMessage {
        ts: "111.222".into(),
        text: "hello".into(),
        subtype: Some("bot_message".into()),
        bot_id: Some("B-BRIDGE".into()),
    }]);

    relay
        .on_reaction(&conversation.channel_id, "111.222", "file", "wave")
        .await;

    assert!(sms.sent.lock().unwrap().is_empty());
}

// ── Metadata sync ───────────────────────────────────────────────────────────

#[tokio::test]
async fn rename_updates_every_bound_record_and_nothing_else() {
    let (relay, directory, _, _) = setup();
    bind_pair(&directory, "+15550000001", "C9").await;
    bind_pair(&directory, "+15550000002", "C9").await;

    relay.on_channel_rename("C9", "Jane Doe").await;

    for sender in ["+15550000001", "+15550000002"] {
        let conversation = directory
            .conversation_by_pair(sender, RECEIVER)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conversation.display_name, "Jane Doe");
        assert_eq!(conversation.sender, sender);
        assert_eq!(conversation.receiver, RECEIVER);
        assert_eq!(conversation.channel_id, "C9");
    }
}

#[tokio::test]
async fn chat_picture_command_updates_avatars_and_confirms() {
    let (relay, directory, chat, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay
        .chat_command(
            &conversation.channel_id,
            "picture https://example.com/a.png",
        )
        .await;

    let updated = directory
        .conversation_by_pair(SENDER, RECEIVER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.avatar_url.as_deref(), Some("https://example.com/a.png"));

    let posts = chat.posts.lock().unwrap();
    assert_eq!(posts.last().unwrap().text, "Profile picture has been updated.");
}

#[tokio::test]
async fn chat_picture_wrong_arity_replies_usage_without_state_change() {
    let (relay, directory, chat, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();

    relay.chat_command(&conversation.channel_id, "picture").await;

    let unchanged = directory
        .conversation_by_pair(SENDER, RECEIVER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.avatar_url, None);

    let posts = chat.posts.lock().unwrap();
    assert!(posts.last().unwrap().text.contains("picture [url]"));
}

#[tokio::test]
async fn chat_command_outside_bridged_channel_is_silent() {
    let (relay, _, chat, _) = setup();
    relay.chat_command("C-unbound", "picture x").await;
    assert!(chat.posts.lock().unwrap().is_empty());
}

// ── Trigger executor ────────────────────────────────────────────────────────

fn seed_triggers(directory: &MemoryDirectory) {
    directory.seed_trigger(Trigger {
        id: "t-live".into(),
        active: true,
        sender: "+15550001111".into(),
        receiver: "+15557654321".into(),
        message: "Welcome :tada:".into(),
    });
    directory.seed_trigger(Trigger {
        id: "t-off".into(),
        active: false,
        sender: "+15550001111".into(),
        receiver: "+15557654321".into(),
        message: "dormant".into(),
    });
}

#[tokio::test]
async fn trigger_validation_order_and_send() {
    let (relay, directory, _, sms) = setup();
    seed_triggers(&directory);

    assert_eq!(
        relay.execute_trigger("nope", TOKEN).await,
        TriggerOutcome::InvalidTriggerId
    );
    assert_eq!(
        relay.execute_trigger("t-off", TOKEN).await,
        TriggerOutcome::TriggerInactive
    );
    // Token is checked before existence or the active flag.
    assert_eq!(
        relay.execute_trigger("t-live", "wrong").await,
        TriggerOutcome::InvalidAuthToken
    );
    assert!(sms.sent.lock().unwrap().is_empty());

    assert_eq!(
        relay.execute_trigger("t-live", TOKEN).await,
        TriggerOutcome::Sent
    );
    // Unswapped: stored sender → stored receiver, emoji-expanded.
    assert_eq!(
        sms.sent.lock().unwrap().as_slice(),
        &[(
            "+15550001111".to_string(),
            "+15557654321".to_string(),
            "Welcome \u{1f389}".to_string()
        )]
    );
}

#[tokio::test]
async fn trigger_reports_store_outage_distinctly() {
    let (relay, directory, _, _) = setup();
    seed_triggers(&directory);
    directory.set_offline(true);

    assert_eq!(
        relay.execute_trigger("t-live", TOKEN).await,
        TriggerOutcome::DirectoryUnavailable
    );
}

// ── Canned responses ────────────────────────────────────────────────────────

#[tokio::test]
async fn picker_lists_all_responses_in_bridged_channel() {
    let (relay, directory, chat, _) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    directory.add_canned_response("On my way.").await.unwrap();
    directory.add_canned_response("Thanks!").await.unwrap();

    relay
        .open_response_picker(&conversation.channel_id)
        .await
        .unwrap();

    let pickers = chat.pickers.lock().unwrap();
    assert_eq!(pickers.len(), 1);
    let (channel, items) = &pickers[0];
    assert_eq!(channel, &conversation.channel_id);
    let messages: Vec<&str> = items.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["On my way.", "Thanks!"]);
}

#[tokio::test]
async fn picker_outside_bridged_channel_is_a_noop() {
    let (relay, directory, chat, _) = setup();
    directory.add_canned_response("On my way.").await.unwrap();

    relay.open_response_picker("C-unbound").await.unwrap();

    assert!(chat.pickers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sending_a_response_reenters_the_message_pipeline() {
    let (relay, directory, chat, sms) = setup();
    let conversation = relay.resolve(SENDER, RECEIVER).await.unwrap();
    let response = directory.add_canned_response("On my way.").await.unwrap();

    relay
        .on_operator_action(OperatorAction::SendResponse {
            channel_id: conversation.channel_id.clone(),
            message_ts: "9.9".into(),
            response_id: response.id,
        })
        .await;

    // The listing is removed and the text is posted as the operator; no SMS
    // has gone out yet.
    assert_eq!(
        chat.deleted.lock().unwrap().as_slice(),
        &[(conversation.channel_id.clone(), "9.9".to_string())]
    );
    let operator_posts = chat.operator_posts.lock().unwrap().clone();
    assert_eq!(
        operator_posts.as_slice(),
        &[(conversation.channel_id.clone(), "On my way.".to_string())]
    );
    assert!(sms.sent.lock().unwrap().is_empty());

    // The post comes back around as an ordinary message event, and only then
    // is the SMS produced by the standard relay path.
    relay
        .on_channel_message(&conversation.channel_id, &operator_posts[0].1, None)
        .await;
    assert_eq!(
        sms.sent.lock().unwrap().as_slice(),
        &[(RECEIVER.to_string(), SENDER.to_string(), "On my way.".to_string())]
    );
}

#[tokio::test]
async fn dismiss_deletes_the_listing_only() {
    let (relay, directory, chat, _) = setup();
    directory.add_canned_response("Keep me.").await.unwrap();

    relay
        .on_operator_action(OperatorAction::Dismiss {
            channel_id: "C1".into(),
            message_ts: "5.5".into(),
        })
        .await;

    assert_eq!(
        chat.deleted.lock().unwrap().as_slice(),
        &[("C1".to_string(), "5.5".to_string())]
    );
    assert_eq!(directory.list_canned_responses().await.unwrap().len(), 1);
}

#[tokio::test]
async fn saving_a_response_persists_it() {
    let (relay, directory, _, _) = setup();

    relay
        .on_operator_action(OperatorAction::SaveResponse {
            message: "Talk soon.".into(),
        })
        .await;

    let all = directory.list_canned_responses().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].message, "Talk soon.");
}

#[tokio::test]
async fn saving_an_empty_response_is_ignored() {
    let (relay, directory, _, _) = setup();

    relay
        .on_operator_action(OperatorAction::SaveResponse {
            message: String::new(),
        })
        .await;

    assert!(directory.list_canned_responses().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_actions_are_a_handled_default() {
    let (relay, _, chat, sms) = setup();

    relay
        .on_operator_action(OperatorAction::Unknown {
            id: "mystery".into(),
        })
        .await;

    assert!(chat.deleted.lock().unwrap().is_empty());
    assert!(sms.sent.lock().unwrap().is_empty());
}
