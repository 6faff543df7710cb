//! Block Kit layouts for the canned-response picker.
//!
//! Reference: <https://api.slack.com/reference/block-kit/blocks>

use serde_json::{Value, json};

use textline_relay::PickerItem;

/// The picker listing: a header, one section per stored response with its
/// send button, and a dismiss row. Button values carry the response ids.
#[must_use]
pub fn response_picker(items: &[PickerItem]) -> Vec<Value> {
    let mut blocks = vec![
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": "*Please choose a response*" }
        }),
        json!({ "type": "divider" }),
    ];

    for item in items {
        blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": item.message },
            "accessory": {
                "type": "button",
                "action_id": "response:send",
                "text": { "type": "plain_text", "text": "Send :incoming_envelope:", "emoji": true },
                "value": item.id
            }
        }));
    }

    blocks.push(json!({ "type": "divider" }));
    blocks.push(json!({
        "type": "actions",
        "elements": [{
            "type": "button",
            "action_id": "dismiss",
            "text": { "type": "plain_text", "text": "Dismiss", "emoji": true },
            "value": "dismiss"
        }]
    }));
    blocks
}
