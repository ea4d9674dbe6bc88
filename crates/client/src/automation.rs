//! Scripted-testing surface.
//!
//! Mirrors every open decision surface (action bar buttons, dialog options)
//! as a structured, enumerable interactable list, with `click`/`wait_for`
//! entry points. Used by end-to-end scripts instead of human interaction.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use skirmish_domain::{ActionId, CardUid, ChoiceKind, Side, SlotKey, ZoneId};

use crate::client::GameClient;

/// One currently clickable thing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactable {
    /// Stable id accepted by [`Automation::click`]
    pub id: String,
    pub kind: InteractableKind,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractableKind {
    BarAction,
    DialogOption { dialog: String },
}

pub struct Automation {
    client: GameClient,
    poll_interval: Duration,
}

impl Automation {
    pub(crate) fn new(client: GameClient) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Enumerate everything currently clickable
    pub async fn list(&self) -> Vec<Interactable> {
        let bar = self.client.action_bar().await;
        let mut out: Vec<Interactable> = bar
            .descriptors
            .iter()
            .map(|descriptor| Interactable {
                id: format!("bar:{}", descriptor.id.slug()),
                kind: InteractableKind::BarAction,
                label: descriptor.label.clone(),
                enabled: descriptor.enabled,
            })
            .collect();

        for (name, dialog) in self.client.dialogs().named() {
            let state = dialog.automation_state();
            if !state.open {
                continue;
            }
            for option in state.options {
                out.push(Interactable {
                    id: format!("dialog:{name}:{}", option.id),
                    kind: InteractableKind::DialogOption {
                        dialog: name.to_string(),
                    },
                    label: option.label,
                    enabled: option.enabled && !option.done,
                });
            }
        }
        out
    }

    /// Click an interactable (or a board element) by id.
    ///
    /// Accepted forms: `bar:<action-slug>`, `dialog:<name>:<option>`,
    /// `slot:<side>-<zone>`, `hand:<card-uid>`, `base:<side>`.
    pub async fn click(&self, id: &str) -> Result<()> {
        if let Some(slug) = id.strip_prefix("bar:") {
            let action =
                ActionId::from_slug(slug).with_context(|| format!("unknown bar action: {slug}"))?;
            return self.client.invoke_action(action).await;
        }

        if let Some(rest) = id.strip_prefix("dialog:") {
            let (dialog, option) = rest
                .split_once(':')
                .with_context(|| format!("malformed dialog id: {id}"))?;
            return match dialog {
                "prompt" => self.client.choose_dialog_option(ChoiceKind::Prompt, option).await,
                "option" => self.client.choose_dialog_option(ChoiceKind::Option, option).await,
                "token" => self.client.choose_dialog_option(ChoiceKind::Token, option).await,
                "burst" => self.client.choose_dialog_option(ChoiceKind::Burst, option).await,
                "burst-group" | "burst-item" => {
                    self.client
                        .choose_dialog_option(ChoiceKind::BurstGroup, option)
                        .await
                }
                "blocker" => {
                    self.client
                        .choose_dialog_option(ChoiceKind::Blocker, option)
                        .await
                }
                "slot-replacement" => {
                    self.client.choose_replacement_slot(ZoneId::new(option)).await
                }
                "error" => {
                    self.client.dismiss_error().await;
                    Ok(())
                }
                other => bail!("unknown dialog: {other}"),
            };
        }

        if let Some(rest) = id.strip_prefix("slot:") {
            let key = parse_slot_key(rest)?;
            return self.client.click_slot(key).await;
        }
        if let Some(uid) = id.strip_prefix("hand:") {
            return self.client.click_hand(CardUid::new(uid)).await;
        }
        if let Some(side) = id.strip_prefix("base:") {
            return self.client.click_base(parse_side(side)?).await;
        }

        bail!("unknown interactable id: {id}")
    }

    /// Poll (with refreshes) until the interactable list satisfies the
    /// predicate or the timeout elapses.
    pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Result<Vec<Interactable>>
    where
        F: Fn(&[Interactable]) -> bool,
    {
        let started = Instant::now();
        loop {
            let list = self.list().await;
            if predicate(&list) {
                return Ok(list);
            }
            if started.elapsed() >= timeout {
                bail!("wait_for timed out after {timeout:?}; last list: {list:?}");
            }
            self.client.refresh().await?;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn parse_slot_key(raw: &str) -> Result<SlotKey> {
    let (side, zone) = raw
        .split_once('-')
        .with_context(|| format!("malformed slot id: {raw}"))?;
    Ok(SlotKey::new(parse_side(side)?, zone))
}

fn parse_side(raw: &str) -> Result<Side> {
    match raw {
        "local" => Ok(Side::Local),
        "opponent" => Ok(Side::Opponent),
        other => bail!("unknown side: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::GameContext;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::headless::{headless_dialogs, HeadlessBoard, HeadlessTimer};
    use crate::ports::outbound::MockGameServerPort;
    use crate::testkit;
    use skirmish_shared::ResponseResult;
    use std::sync::Arc;

    fn client_with(snapshot: skirmish_shared::GameSnapshot) -> GameClient {
        let mut server = MockGameServerPort::new();
        server
            .expect_get_game_status()
            .returning(move |_, _| Ok(snapshot.clone()));
        server
            .expect_confirm_option_choice()
            .returning(|_| Ok(ResponseResult::success_empty()));
        GameClient::new(
            GameContext::new("g1", "player_1"),
            Arc::new(server),
            headless_dialogs(),
            Arc::new(HeadlessBoard::new()),
            Arc::new(HeadlessTimer::new()),
            Arc::new(FixedClock::at(0)),
        )
    }

    #[tokio::test]
    async fn lists_bar_actions_and_open_dialog_options() {
        let client = client_with(
            testkit::snapshot()
                .main_phase("player_1")
                .with_option_choice("e1", "player_1", testkit::options(&["a", "b"]))
                .build(),
        );
        client.refresh().await.expect("refresh");

        let automation = client.automation();
        let list = automation.list().await;
        let ids: Vec<&str> = list.iter().map(|item| item.id.as_str()).collect();
        assert!(ids.contains(&"dialog:option:a"));
        assert!(ids.contains(&"dialog:option:b"));
    }

    #[tokio::test]
    async fn clicking_a_dialog_option_submits_it() {
        let client = client_with(
            testkit::snapshot()
                .main_phase("player_1")
                .with_option_choice("e1", "player_1", testkit::options(&["a"]))
                .build(),
        );
        client.refresh().await.expect("refresh");

        let automation = client.automation();
        automation.click("dialog:option:a").await.expect("click");
        // Dialog hidden optimistically after the submit
        assert!(!client.dialogs().option.is_open());
    }

    #[tokio::test]
    async fn unknown_id_is_an_error() {
        let client = client_with(testkit::snapshot().main_phase("player_1").build());
        client.refresh().await.expect("refresh");
        let automation = client.automation();
        assert!(automation.click("bogus").await.is_err());
    }
}
