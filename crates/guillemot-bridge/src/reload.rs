//! # Reload Controller
//!
//! Reads the editor's document on demand and drives a session reload. There are two triggers:
//! - **Submit** (the submit control): reload and move on; update messages are not displayed.
//! - **Full update** (the editor key chord): reload, show the resulting message in the error
//!   slot (clearing it on success), then refresh textures immediately.
//!
//! Triggers are queued and handled one at a time, each reading the document when it is handled.

use std::sync::Arc;

use guillemot_core::{ReloadOutcome, SessionError, SessionHandle};
use guillemot_surface::{OutputSlot, OutputSurface, SharedInput, TextureHost, refresh_textures};
use tokio::sync::mpsc;

/// Callback installed on an editor key chord.
pub type KeyAction = Box<dyn Fn() + Send + Sync>;

/// The text-editing collaborator.
pub trait ConfigEditor: Send + Sync {
    /// The document's current text.
    fn document(&self) -> String;

    /// Runs `action` whenever `chord` (e.g. `Mod-Enter`) is pressed.
    fn bind_key(&self, chord: &str, action: KeyAction);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadTrigger {
    Submit,
    FullUpdate,
}

/// Cloneable sender for reload triggers.
#[derive(Clone, Debug)]
pub struct TriggerSender(mpsc::UnboundedSender<ReloadTrigger>);

impl TriggerSender {
    /// Queues a submit. Returns false if the controller has stopped.
    pub fn submit(&self) -> bool {
        self.0.send(ReloadTrigger::Submit).is_ok()
    }

    /// Queues a full update. Returns false if the controller has stopped.
    pub fn full_update(&self) -> bool {
        self.0.send(ReloadTrigger::FullUpdate).is_ok()
    }
}

pub fn trigger_channel() -> (TriggerSender, mpsc::UnboundedReceiver<ReloadTrigger>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TriggerSender(tx), rx)
}

/// Installs the full-update key chord on the editor.
pub fn bind_reload_key(editor: &dyn ConfigEditor, chord: &str, triggers: TriggerSender) {
    editor.bind_key(
        chord,
        Box::new(move || {
            if !triggers.full_update() {
                tracing::warn!("Reload controller has stopped; key press ignored");
            }
        }),
    );
}

pub struct ReloadController<S> {
    session: SessionHandle,
    editor: Arc<dyn ConfigEditor>,
    surface: Arc<S>,
    input: SharedInput,
}

impl<S> ReloadController<S>
where
    S: OutputSurface + TextureHost + 'static,
{
    pub fn new(
        session: SessionHandle,
        editor: Arc<dyn ConfigEditor>,
        surface: Arc<S>,
        input: SharedInput,
    ) -> Self {
        Self {
            session,
            editor,
            surface,
            input,
        }
    }

    /// Reloads from the document without displaying update messages.
    ///
    /// A failed first-time construction is still reported, since the engine never came up.
    pub async fn submit(&self) -> Result<ReloadOutcome, SessionError> {
        let outcome = self.reload().await?;
        if !outcome.ready {
            self.surface.set_error(&outcome.message);
        }
        Ok(outcome)
    }

    /// Reloads from the document, displays the outcome and refreshes textures.
    pub async fn full_update(&self) -> Result<ReloadOutcome, SessionError> {
        let outcome = self.reload().await?;
        self.surface.set_error(&outcome.message);

        let texture_ids = self.session.texture_ids().await?;
        refresh_textures(self.surface.as_ref(), &texture_ids);
        Ok(outcome)
    }

    /// Handles queued triggers until every sender is gone or the session stops.
    pub async fn run(self, mut triggers: mpsc::UnboundedReceiver<ReloadTrigger>) {
        tracing::info!("Reload controller started");

        while let Some(trigger) = triggers.recv().await {
            let result = match trigger {
                ReloadTrigger::Submit => self.submit().await,
                ReloadTrigger::FullUpdate => self.full_update().await,
            };

            match result {
                Ok(outcome) => {
                    tracing::debug!(?trigger, ready = outcome.ready, message = %outcome.message, "Reload handled");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Reload controller stopping");
                    break;
                }
            }
        }
    }

    async fn reload(&self) -> Result<ReloadOutcome, SessionError> {
        let config = self.editor.document();
        let outcome = self.session.reload(config).await?;

        if outcome.ready {
            // Layout may shift once engine content is injected.
            self.input.refresh_viewport(&self.surface.bounding_box());
        }
        if let Some(defs) = &outcome.image_definitions {
            self.surface.write_slot(OutputSlot::ImageDefs, defs);
        }

        Ok(outcome)
    }
}
