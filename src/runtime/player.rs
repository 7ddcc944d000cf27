//! One visit to the player screen.

use crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::app::SessionContext;
use crate::audio::{RodioSound, Sound};
use crate::config::Settings;
use crate::engine::{NavigationEngine, Notice, TickIntervals};
use crate::error::Result;
use crate::keys::{Keymap, PlayerAction};
use crate::mpris::{ControlCmd, MprisHandle, session_title};
use crate::schedule::{IntervalClock, Scheduler};
use crate::session::{AudioSession, SessionReconciler, SessionStore};
use crate::ui::PlayerPanel;

/// What the event loop should do after an action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Back,
    Quit,
}

pub struct PlayerScreen<S: Sound, C: Scheduler> {
    engine: NavigationEngine<S, C>,
    /// Installed on entry, dropped on close.
    keymap: Option<Keymap>,
    context: SessionContext,
    seek_seconds: f64,
}

impl PlayerScreen<RodioSound, IntervalClock> {
    /// Load the session's stored audio on the default output device.
    pub fn open(context: SessionContext, settings: &Settings, mpris: &MprisHandle) -> Result<Self> {
        let sound = RodioSound::open(&context.session.file_path)?;
        Ok(Self::new(
            context,
            sound,
            IntervalClock::new(),
            settings,
            Some(mpris.clone()),
        ))
    }
}

impl<S: Sound, C: Scheduler> PlayerScreen<S, C> {
    pub fn new(
        context: SessionContext,
        sound: S,
        clock: C,
        settings: &Settings,
        mpris: Option<MprisHandle>,
    ) -> Self {
        let mut engine = NavigationEngine::new(
            context.session.clone(),
            sound,
            clock,
            TickIntervals::from(&settings.playback),
        );

        if let Some(mpris) = mpris {
            let name = context.session.name.clone();
            mpris.set_length(engine.status().length);
            engine.on_label_change(move |index, count| {
                mpris.set_title(Some(session_title(&name, index, count)));
            });
        }

        info!(
            session = %context.session.name,
            file = %context.selected_file.display(),
            "entered player"
        );

        Self {
            engine,
            keymap: Some(Keymap::from_settings(&settings.controls)),
            context,
            seek_seconds: settings.playback.seek_seconds as f64,
        }
    }

    pub fn engine(&self) -> &NavigationEngine<S, C> {
        &self.engine
    }

    /// Run due timers.
    pub fn tick(&mut self) -> usize {
        self.engine.pump()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.engine.take_notices()
    }

    pub fn handle_key<St: SessionStore>(
        &mut self,
        key: KeyEvent,
        reconciler: &mut SessionReconciler<St>,
    ) -> Result<Flow> {
        let Some(action) = self.keymap.as_ref().and_then(|k| k.action(key)) else {
            return Ok(Flow::Continue);
        };
        self.apply(action, reconciler)
    }

    pub fn apply<St: SessionStore>(
        &mut self,
        action: PlayerAction,
        reconciler: &mut SessionReconciler<St>,
    ) -> Result<Flow> {
        debug!(?action, "player action");
        match action {
            PlayerAction::Reverse => self.engine.reverse(),
            PlayerAction::Next => self.engine.next(),
            PlayerAction::Play => self.engine.play(),
            PlayerAction::Pause => self.engine.pause(),
            PlayerAction::SetBookmark => self.engine.set_bookmark(),
            PlayerAction::RemoveBookmark => self.engine.remove_bookmark(),
            PlayerAction::SeekBack => self.engine.seek_by(-self.seek_seconds),
            PlayerAction::SeekForward => self.engine.seek_by(self.seek_seconds),
            PlayerAction::Save => {
                self.save(reconciler)?;
            }
            PlayerAction::Back => return Ok(Flow::Back),
            PlayerAction::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Media keys act like their player-screen counterparts.
    pub fn control(&mut self, cmd: ControlCmd) -> Flow {
        match cmd {
            ControlCmd::Play => self.engine.play(),
            ControlCmd::Pause | ControlCmd::Stop => self.engine.pause(),
            ControlCmd::PlayPause => self.engine.toggle(),
            ControlCmd::Next => self.engine.next(),
            ControlCmd::Prev => self.engine.reverse(),
            ControlCmd::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Persist what changed and keep playing. Returns whether anything was written.
    pub fn save<St: SessionStore>(&mut self, reconciler: &mut SessionReconciler<St>) -> Result<bool> {
        let written = reconciler.flush(&mut self.context.session, self.engine.snapshot())?;
        if written {
            info!(session = %self.context.session.name, "session saved");
            self.engine.notify(Notice::Saved);
        }
        Ok(written)
    }

    /// Leave the screen: stop playback, release the sound and persist the
    /// session. Returns the session as now stored.
    pub fn close<St: SessionStore>(
        mut self,
        reconciler: &mut SessionReconciler<St>,
    ) -> Result<AudioSession> {
        self.keymap = None;
        let current = self.engine.leave();
        reconciler.flush(&mut self.context.session, current)?;
        Ok(self.context.session)
    }

    pub fn panel(&self) -> PlayerPanel {
        let session = self.engine.session();
        PlayerPanel {
            name: session.name.clone(),
            status: self.engine.status(),
            spend_time: session.spend_time,
            finished_times: session.finished_times,
            help: self
                .keymap
                .as_ref()
                .map(|k| k.help(self.seek_seconds as u64))
                .unwrap_or_default(),
        }
    }
}
