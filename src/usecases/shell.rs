//! The shell orchestrator: routes terminal and engine events to the
//! launcher, the modal choreography, the composer, and the conversation
//! store.
//!
//! The surrounding host screens are a thin stand-in for the line-of-business
//! app: navigating them emits the route-name signal the context classifier
//! consumes.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::{
    animation::ModalTransition,
    composer_state::ComposerState,
    context::classify,
    events::{AppEvent, EngineEvent, KeyInput, PointerEvent},
    launcher::{GestureOutcome, LauncherState, ScreenBounds},
    quick_actions::{actions_for, QuickAction},
};

use super::{
    contracts::{Clock, HapticStrength, Haptics},
    conversation::{ConversationStore, SendOutcome, TranscriptUpdate},
};

/// One navigable screen of the host application. Only the route name matters
/// to the engine; the title is for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostScreen {
    pub title: &'static str,
    pub route: &'static str,
}

pub const HOST_SCREENS: &[HostScreen] = &[
    HostScreen { title: "Dashboard", route: "home-dashboard" },
    HostScreen { title: "Projects", route: "projects-list" },
    HostScreen { title: "Project Sizes", route: "master-project-size" },
    HostScreen { title: "Customers", route: "customers-list" },
    HostScreen { title: "Payments", route: "payment-entries" },
    HostScreen { title: "Bookings", route: "booking-register" },
    HostScreen { title: "Brokers", route: "brokers-list" },
    HostScreen { title: "Properties", route: "property-inventory" },
    HostScreen { title: "Reports", route: "collection-reports" },
    HostScreen { title: "Masters", route: "masters-index" },
    HostScreen { title: "Utilities", route: "utilities-tools" },
    HostScreen { title: "Dispatches", route: "dispatch-register" },
    HostScreen { title: "Feedback", route: "feedback-inbox" },
];

pub struct AssistantShell {
    running: bool,
    selected_screen: usize,
    screen_bounds: ScreenBounds,
    launcher: LauncherState,
    modal: ModalTransition,
    composer: ComposerState,
    conversation: ConversationStore,
    selected_action: usize,
    haptics: Box<dyn Haptics>,
    clock: Box<dyn Clock>,
}

impl AssistantShell {
    pub fn new(
        conversation: ConversationStore,
        haptics: Box<dyn Haptics>,
        clock: Box<dyn Clock>,
        screen_bounds: ScreenBounds,
    ) -> Self {
        let now = clock.now();
        let mut shell = Self {
            running: true,
            selected_screen: 0,
            screen_bounds,
            launcher: LauncherState::at_default_corner(screen_bounds, now),
            modal: ModalTransition::default(),
            composer: ComposerState::default(),
            conversation,
            selected_action: 0,
            haptics,
            clock,
        };
        shell.apply_route_change();
        shell
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn screens(&self) -> &'static [HostScreen] {
        HOST_SCREENS
    }

    pub fn selected_screen(&self) -> usize {
        self.selected_screen
    }

    pub fn launcher(&self) -> &LauncherState {
        &self.launcher
    }

    pub fn modal(&self) -> &ModalTransition {
        &self.modal
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn quick_actions(&self) -> &'static [QuickAction] {
        actions_for(self.conversation.session().context())
    }

    pub fn selected_action(&self) -> usize {
        self.selected_action
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::QuitRequested => self.running = false,
            AppEvent::Resized { width, height } => {
                self.screen_bounds = ScreenBounds::new(f32::from(width), f32::from(height));
                self.launcher.clamp_to(self.screen_bounds);
            }
            AppEvent::Pointer(pointer) => self.on_pointer(pointer),
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Engine(engine) => self.on_engine(engine),
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        let now = self.clock.now();
        if self.launcher.tick(now) {
            self.haptics.pulse(HapticStrength::Light);
        }
        self.modal.tick(now);
        self.conversation.tick(now);
        self.launcher
            .set_unread(self.conversation.session().has_unread(), now);
    }

    fn on_pointer(&mut self, pointer: PointerEvent) {
        let now = self.clock.now();
        match pointer {
            PointerEvent::Down { x, y } => {
                self.launcher.pointer_down(f32::from(x), f32::from(y));
            }
            PointerEvent::Move { x, y } => {
                let outcome =
                    self.launcher
                        .pointer_move(f32::from(x), f32::from(y), self.screen_bounds);
                if outcome == GestureOutcome::Claimed {
                    self.haptics.pulse(HapticStrength::Medium);
                }
            }
            PointerEvent::Up { x, y } => {
                let outcome = self.launcher.pointer_up(
                    f32::from(x),
                    f32::from(y),
                    self.screen_bounds,
                    now,
                );
                if outcome == GestureOutcome::Tap {
                    self.open_assistant();
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyInput) {
        if key.ctrl && key.key == "c" {
            self.running = false;
            return;
        }

        if self.conversation.session().is_open() {
            self.on_modal_key(key);
        } else {
            self.on_host_key(key);
        }
    }

    fn on_host_key(&mut self, key: KeyInput) {
        match key.key.as_str() {
            "q" => self.running = false,
            "j" | "down" => {
                self.selected_screen = (self.selected_screen + 1) % HOST_SCREENS.len();
                self.apply_route_change();
            }
            "k" | "up" => {
                self.selected_screen =
                    (self.selected_screen + HOST_SCREENS.len() - 1) % HOST_SCREENS.len();
                self.apply_route_change();
            }
            "a" | "enter" => self.open_assistant(),
            _ => {}
        }
    }

    fn on_modal_key(&mut self, key: KeyInput) {
        let now = self.clock.now();

        if key.ctrl {
            match key.key.as_str() {
                "l" => self.conversation.clear_chat(now),
                "v" => {
                    if self.conversation.session().is_listening() {
                        self.conversation.stop_voice_input();
                    } else {
                        self.conversation.start_voice_input(now);
                    }
                }
                "s" => self.conversation.speak_last_reply(),
                _ => {}
            }
            return;
        }

        match key.key.as_str() {
            "esc" => self.close_assistant(),
            "enter" => self.send_draft(now),
            "tab" => self.apply_selected_action(),
            "up" => {
                let count = self.quick_actions().len();
                self.selected_action = (self.selected_action + count - 1) % count;
            }
            "down" => {
                let count = self.quick_actions().len();
                self.selected_action = (self.selected_action + 1) % count;
            }
            "backspace" => self.composer.delete_char_before(),
            "left" => self.composer.move_cursor_left(),
            "right" => self.composer.move_cursor_right(),
            "home" => self.composer.move_cursor_home(),
            "end" => self.composer.move_cursor_end(),
            other => {
                let mut chars = other.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    self.composer.insert_char(ch);
                }
            }
        }
    }

    fn on_engine(&mut self, engine: EngineEvent) {
        let now = self.clock.now();
        match engine {
            EngineEvent::ReplyArrived { request_id, result } => {
                self.conversation.on_reply(request_id, result, now);
            }
            EngineEvent::Recognition { session, event } => {
                match self.conversation.on_recognition_event(session, event, now) {
                    Some(TranscriptUpdate::Partial(text))
                    | Some(TranscriptUpdate::Final(text)) => {
                        self.composer.set_transcript(&text);
                    }
                    None => {}
                }
            }
            EngineEvent::SynthesisFinished { utterance } => {
                self.conversation.on_synthesis_finished(utterance);
            }
        }
        self.launcher
            .set_unread(self.conversation.session().has_unread(), now);
    }

    fn send_draft(&mut self, now: DateTime<Utc>) {
        let (text, voice_originated) = self.composer.take();
        let outcome = self.conversation.send(&text, voice_originated, now);

        if outcome == SendOutcome::RejectedDebounced {
            // A rapid double-tap must not eat the draft.
            if voice_originated {
                self.composer.set_transcript(&text);
            } else {
                self.composer.set_text(&text);
            }
        }
    }

    fn apply_selected_action(&mut self) {
        let actions = self.quick_actions();
        if let Some(action) = actions.get(self.selected_action) {
            self.composer.set_text(action.action_text);
        }
    }

    fn open_assistant(&mut self) {
        let now = self.clock.now();
        self.conversation.open();
        // Replaying while already open resets the animation values first.
        self.modal.play_open(now);
        self.selected_action = 0;
        self.launcher.set_unread(false, now);
    }

    fn close_assistant(&mut self) {
        let now = self.clock.now();
        self.conversation.close();
        self.modal.play_close(now);
        self.composer.clear();
    }

    fn apply_route_change(&mut self) {
        let route = HOST_SCREENS[self.selected_screen].route;
        let context = classify(Some(route));
        tracing::debug!(route, context = context.wire_tag(), "route changed");
        self.conversation.set_context(context);
        if self.selected_action >= actions_for(context).len() {
            self.selected_action = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{
        domain::{
            animation::ModalPhase,
            context::Context,
            events::{BackendFailure, RecognitionEvent, RecognitionSessionId},
            launcher::{EDGE_MARGIN, LAUNCHER_WIDTH},
        },
        usecases::{
            contracts::{
                AssistantRequest, KeyValueStore, ReplyDispatch, SpeechParams, SpeechRecognizer,
                SpeechSynthesizer,
            },
            voice::VoiceCoordinator,
        },
    };

    #[derive(Clone, Default)]
    struct SharedKvStore {
        entries: Rc<RefCell<HashMap<String, String>>>,
    }

    impl KeyValueStore for SharedKvStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        fn remove(&mut self, key: &str) -> anyhow::Result<()> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingDispatch {
        requests: Rc<RefCell<Vec<(u64, AssistantRequest)>>>,
    }

    impl ReplyDispatch for RecordingDispatch {
        fn dispatch(&mut self, request_id: u64, request: AssistantRequest) {
            self.requests.borrow_mut().push((request_id, request));
        }
    }

    #[derive(Clone, Default)]
    struct QuietRecognizer;

    impl SpeechRecognizer for QuietRecognizer {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&mut self, _session: RecognitionSessionId, _locale: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn stop(&mut self) {}
    }

    #[derive(Clone, Default)]
    struct QuietSynthesizer;

    impl SpeechSynthesizer for QuietSynthesizer {
        fn speak(
            &mut self,
            _utterance: crate::domain::events::UtteranceId,
            _text: &str,
            _params: &SpeechParams,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        fn stop(&mut self) {}
    }

    #[derive(Clone, Default)]
    struct RecordingHaptics {
        pulses: Rc<RefCell<Vec<HapticStrength>>>,
    }

    impl Haptics for RecordingHaptics {
        fn pulse(&mut self, strength: HapticStrength) {
            self.pulses.borrow_mut().push(strength);
        }
    }

    #[derive(Clone)]
    struct ManualClock {
        now: Rc<RefCell<DateTime<Utc>>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Rc::new(RefCell::new(
                    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                )),
            }
        }

        fn advance_ms(&self, ms: i64) {
            let mut now = self.now.borrow_mut();
            *now += Duration::milliseconds(ms);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.borrow()
        }
    }

    struct Fixture {
        shell: AssistantShell,
        dispatch: RecordingDispatch,
        haptics: RecordingHaptics,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::new();
        let dispatch = RecordingDispatch::default();
        let haptics = RecordingHaptics::default();
        let voice = VoiceCoordinator::new(
            Box::new(QuietRecognizer),
            Box::new(QuietSynthesizer),
            SpeechParams {
                locale: "en-IN".to_owned(),
                pitch: 1.0,
                rate: 0.9,
            },
        );
        let conversation = ConversationStore::restore(
            voice,
            Box::new(SharedKvStore::default()),
            Box::new(dispatch.clone()),
            clock.now(),
        );
        let shell = AssistantShell::new(
            conversation,
            Box::new(haptics.clone()),
            Box::new(clock.clone()),
            ScreenBounds::new(100.0, 40.0),
        );
        Fixture {
            shell,
            dispatch,
            haptics,
            clock,
        }
    }

    fn key(name: &str) -> AppEvent {
        AppEvent::Key(KeyInput::new(name, false))
    }

    fn ctrl(name: &str) -> AppEvent {
        AppEvent::Key(KeyInput::new(name, true))
    }

    #[test]
    fn starts_on_the_dashboard_in_the_general_context() {
        let f = fixture();
        assert_eq!(f.shell.selected_screen(), 0);
        assert_eq!(f.shell.conversation().session().context(), Context::General);
    }

    #[test]
    fn navigating_to_a_screen_reclassifies_the_context() {
        let mut f = fixture();

        f.shell.handle_event(key("j")).unwrap(); // Projects
        assert_eq!(
            f.shell.conversation().session().context(),
            Context::Projects
        );

        f.shell.handle_event(key("j")).unwrap(); // Project Sizes -> Masters
        assert_eq!(f.shell.conversation().session().context(), Context::Masters);
    }

    #[test]
    fn quick_actions_follow_the_context() {
        let mut f = fixture();
        f.shell.handle_event(key("j")).unwrap(); // Projects

        let labels: Vec<_> = f.shell.quick_actions().iter().map(|a| a.label).collect();
        assert!(labels.contains(&"Project status"));
    }

    #[test]
    fn opening_the_assistant_starts_the_modal_transition() {
        let mut f = fixture();

        f.shell.handle_event(key("a")).unwrap();

        assert!(f.shell.conversation().session().is_open());
        assert_eq!(f.shell.modal().phase(), ModalPhase::Opening);
    }

    #[test]
    fn escape_closes_the_assistant_and_plays_the_close_transition() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        f.shell.handle_event(key("esc")).unwrap();

        assert!(!f.shell.conversation().session().is_open());
        assert_eq!(f.shell.modal().phase(), ModalPhase::Closing);
        // The modal stays visible until the close transition completes.
        assert!(f.shell.modal().is_visible());

        f.clock.advance_ms(10_000);
        f.shell.handle_event(AppEvent::Tick).unwrap();
        assert!(!f.shell.modal().is_visible());
    }

    #[test]
    fn typed_text_lands_in_the_composer_and_enter_sends_it() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        for ch in ["h", "i"] {
            f.shell.handle_event(key(ch)).unwrap();
        }
        assert_eq!(f.shell.composer().text(), "hi");

        f.shell.handle_event(key("enter")).unwrap();

        assert!(f.shell.composer().is_empty());
        assert_eq!(f.dispatch.requests.borrow().len(), 1);
        assert_eq!(f.dispatch.requests.borrow()[0].1.message, "hi");
    }

    #[test]
    fn debounced_send_keeps_the_draft_in_the_composer() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        f.shell.handle_event(key("x")).unwrap();
        f.shell.handle_event(key("enter")).unwrap();
        f.shell.handle_event(key("y")).unwrap();
        f.shell.handle_event(key("enter")).unwrap(); // inside the debounce window

        assert_eq!(f.shell.composer().text(), "y");
        assert_eq!(f.dispatch.requests.borrow().len(), 1);
    }

    #[test]
    fn tab_applies_the_selected_quick_action_to_the_composer() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        f.shell.handle_event(key("down")).unwrap();
        f.shell.handle_event(key("tab")).unwrap();

        let expected = f.shell.quick_actions()[1].action_text;
        assert_eq!(f.shell.composer().text(), expected);
    }

    #[test]
    fn launcher_tap_via_pointer_opens_the_assistant() {
        let mut f = fixture();
        let (x, y) = f.shell.launcher().position(f.clock.now());

        f.shell
            .handle_event(AppEvent::Pointer(PointerEvent::Down {
                x: x as u16 + 1,
                y: y as u16,
            }))
            .unwrap();
        f.shell
            .handle_event(AppEvent::Pointer(PointerEvent::Up {
                x: x as u16 + 1,
                y: y as u16,
            }))
            .unwrap();

        assert!(f.shell.conversation().session().is_open());
    }

    #[test]
    fn launcher_drag_snaps_and_fires_the_haptic_sequence() {
        let mut f = fixture();
        let (x, y) = f.shell.launcher().position(f.clock.now());
        let (x, y) = (x as u16, y as u16);

        f.shell
            .handle_event(AppEvent::Pointer(PointerEvent::Down { x: x + 1, y }))
            .unwrap();
        f.shell
            .handle_event(AppEvent::Pointer(PointerEvent::Move { x: x - 40, y }))
            .unwrap();
        f.shell
            .handle_event(AppEvent::Pointer(PointerEvent::Up { x: x - 40, y }))
            .unwrap();

        // Claim fired the medium haptic; the tap path was not taken.
        assert_eq!(
            f.haptics.pulses.borrow().as_slice(),
            &[HapticStrength::Medium]
        );
        assert!(!f.shell.conversation().session().is_open());

        f.clock.advance_ms(10_000);
        f.shell.handle_event(AppEvent::Tick).unwrap();

        // Settle fired the light haptic and the launcher rests on an edge.
        assert_eq!(
            f.haptics.pulses.borrow().as_slice(),
            &[HapticStrength::Medium, HapticStrength::Light]
        );
        let (snapped_x, _) = f.shell.launcher().position(f.clock.now());
        assert!(
            snapped_x == EDGE_MARGIN || snapped_x == 100.0 - LAUNCHER_WIDTH - EDGE_MARGIN
        );
    }

    #[test]
    fn reply_after_close_raises_unread_and_reopening_clears_it() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();
        f.shell.handle_event(key("h")).unwrap();
        f.shell.handle_event(key("enter")).unwrap();
        let request_id = f.dispatch.requests.borrow()[0].0;

        f.shell.handle_event(key("esc")).unwrap();
        f.clock.advance_ms(600);
        f.shell
            .handle_event(AppEvent::Engine(EngineEvent::ReplyArrived {
                request_id,
                result: Ok("late reply".to_owned()),
            }))
            .unwrap();

        assert!(f.shell.conversation().session().has_unread());
        assert!(f.shell.launcher().badge().is_visible());

        f.shell.handle_event(key("a")).unwrap();
        assert!(!f.shell.conversation().session().has_unread());
    }

    #[test]
    fn failed_reply_surfaces_the_fallback_text() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();
        f.shell.handle_event(key("h")).unwrap();
        f.shell.handle_event(key("enter")).unwrap();
        let request_id = f.dispatch.requests.borrow()[0].0;

        f.shell
            .handle_event(AppEvent::Engine(EngineEvent::ReplyArrived {
                request_id,
                result: Err(BackendFailure::Unavailable),
            }))
            .unwrap();

        let last = f
            .shell
            .conversation()
            .session()
            .messages()
            .last()
            .unwrap()
            .content
            .clone();
        assert_eq!(last, crate::usecases::conversation::REPLY_FALLBACK_TEXT);
    }

    #[test]
    fn voice_toggle_listens_and_final_transcript_fills_the_composer() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        f.shell.handle_event(ctrl("v")).unwrap();
        assert!(f.shell.conversation().session().is_listening());

        let session = RecognitionSessionId(1);
        f.shell
            .handle_event(AppEvent::Engine(EngineEvent::Recognition {
                session,
                event: RecognitionEvent::Partial("book a".to_owned()),
            }))
            .unwrap();
        assert_eq!(f.shell.composer().text(), "book a");

        f.shell
            .handle_event(AppEvent::Engine(EngineEvent::Recognition {
                session,
                event: RecognitionEvent::Final("book a site visit".to_owned()),
            }))
            .unwrap();

        assert!(!f.shell.conversation().session().is_listening());
        assert_eq!(f.shell.composer().text(), "book a site visit");
        assert!(f.shell.composer().is_voice_originated());
        // The transcript is not auto-sent.
        assert!(f.dispatch.requests.borrow().is_empty());
    }

    #[test]
    fn ctrl_l_clears_the_chat() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();
        f.shell.handle_event(key("h")).unwrap();
        f.shell.handle_event(key("enter")).unwrap();
        assert_eq!(f.shell.conversation().session().messages().len(), 2);

        f.shell.handle_event(ctrl("l")).unwrap();

        assert_eq!(f.shell.conversation().session().messages().len(), 1);
    }

    #[test]
    fn quit_requires_the_modal_to_be_closed() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();

        // "q" is ordinary text while the modal is open.
        f.shell.handle_event(key("q")).unwrap();
        assert!(f.shell.is_running());
        assert_eq!(f.shell.composer().text(), "q");

        f.shell.handle_event(key("esc")).unwrap();
        f.shell.handle_event(key("q")).unwrap();
        assert!(!f.shell.is_running());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut f = fixture();
        f.shell.handle_event(key("a")).unwrap();
        f.shell.handle_event(ctrl("c")).unwrap();
        assert!(!f.shell.is_running());
    }
}
