use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::animation::{Choreographer, Choreography, Playback};
use crate::config::Config;
use crate::deck::Deck;
use crate::feedback::{Haptics, LogTelemetry, SoundBoard, Telemetry};
use crate::render::stage::Stage;
use crate::render::{self, Hits, StoryView};
use crate::story::{Command, Story, Timing, Trigger};
use crate::theme::Theme;

const TOAST_SECONDS: f32 = 1.5;

pub struct LaunchOptions {
    pub deck: Option<PathBuf>,
    pub windowed: bool,
    /// 1-indexed.
    pub start_slide: Option<usize>,
    pub sound: bool,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else {
            (1.0 - (elapsed - fade_start) / (TOAST_SECONDS - fade_start)).max(0.0)
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_SECONDS
    }
}

/// On-screen controls that take a click instead of starting a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Sound,
    Action,
    Answer(usize),
    Skip,
}

/// Pointer and keyboard input gathered from one egui frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Key(egui::Key),
    PointerDown(egui::Pos2),
    PointerMove(egui::Pos2),
    PointerUp(egui::Pos2),
    PointerGone,
}

const OPTION_KEYS: [egui::Key; 9] = [
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
    egui::Key::Num7,
    egui::Key::Num8,
    egui::Key::Num9,
];

const HANDLED_KEYS: [egui::Key; 10] = [
    egui::Key::ArrowLeft,
    egui::Key::ArrowRight,
    egui::Key::ArrowUp,
    egui::Key::Space,
    egui::Key::Escape,
    egui::Key::M,
    egui::Key::R,
    egui::Key::D,
    egui::Key::F,
    egui::Key::Q,
];

struct StoryApp {
    deck: Deck,
    choreographies: Vec<Choreography>,
    story: Story,
    stage: Stage,
    choreographer: Choreographer,
    sound: SoundBoard,
    haptics: Haptics,
    telemetry: Option<LogTelemetry>,
    theme: Theme,
    clock: Instant,
    toast: Option<Toast>,
    /// Story column from the last frame, for pointer conversion.
    story_rect: egui::Rect,
    hits: Hits,
    pressed: Option<Control>,
    gesture_live: bool,
}

impl StoryApp {
    fn new(deck: Deck, config: &Config, timing: Timing, options: &LaunchOptions) -> Self {
        let story = Story::new(deck.quizzes(), timing);
        let slides = story.slide_count();
        let choreographies = deck.slides.iter().map(Choreography::for_slide).collect();
        let viewport = story.viewport();

        let mut app = Self {
            choreographies,
            story,
            stage: Stage::new(slides),
            choreographer: Choreographer::new(slides),
            sound: SoundBoard::new(!(options.sound || config.sound_on())),
            haptics: Haptics::new(config.haptics_on()),
            telemetry: config.telemetry_enabled().then(LogTelemetry::new),
            theme: Theme::from_name(config.theme()),
            clock: Instant::now(),
            toast: None,
            story_rect: egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(viewport.width, viewport.height),
            ),
            hits: Hits::default(),
            pressed: None,
            gesture_live: false,
            deck,
        };

        app.story.start(0);
        if let Some(n) = options.start_slide {
            let index = n.saturating_sub(1).min(slides.saturating_sub(1));
            app.story.go_to_slide(index, Trigger::Swipe, 0);
        }
        app.dispatch(0);
        app
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    /// Hand every pending story command to whoever carries it out.
    fn dispatch(&mut self, now_ms: u64) {
        let height = self.story.viewport().height;
        for command in self.story.take_commands() {
            if self.stage.apply(&command, now_ms, height) {
                continue;
            }
            match command {
                Command::PlayEntrance { slide } => self.choreographer.play(slide, now_ms),
                Command::RevealContent { slide } => {
                    self.choreographer.reveal_content(slide, now_ms)
                }
                Command::Sound(cue) => self.sound.play(cue),
                Command::Haptic(pattern) => self.haptics.vibrate(pattern, now_ms),
                Command::Telemetry(event) => {
                    if let Some(telemetry) = &mut self.telemetry {
                        telemetry.track(event);
                    }
                }
                other => tracing::trace!(?other, "command without a handler"),
            }
        }
    }

    fn local(&self, pos: egui::Pos2) -> (f32, f32) {
        (pos.x - self.story_rect.left(), pos.y - self.story_rect.top())
    }

    fn control_at(&self, pos: egui::Pos2) -> Option<Control> {
        if self.hits.sound.is_some_and(|r| r.contains(pos)) {
            return Some(Control::Sound);
        }
        if let Some(i) = self.hits.quiz.options.iter().position(|r| r.contains(pos)) {
            return Some(Control::Answer(i));
        }
        if self.hits.quiz.skip.is_some_and(|r| r.contains(pos)) {
            return Some(Control::Skip);
        }
        if self.hits.action.is_some_and(|r| r.contains(pos)) {
            return Some(Control::Action);
        }
        None
    }

    fn toggle_sound(&mut self) {
        let muted = self.sound.toggle_mute();
        self.toast = Some(Toast::new(if muted { "Sound off" } else { "Sound on" }));
    }

    fn activate(&mut self, control: Control, now_ms: u64) {
        match control {
            Control::Sound => self.toggle_sound(),
            Control::Action => {
                let current = self.story.current_slide();
                if current == 0 {
                    self.story.activate_reveal(now_ms);
                } else if current + 1 == self.story.slide_count() {
                    self.story.replay(now_ms);
                }
            }
            Control::Answer(index) => {
                self.story.select_option(index, now_ms);
            }
            Control::Skip => {
                self.story.skip_quiz(now_ms);
            }
        }
    }

    fn handle_key(&mut self, key: egui::Key, now_ms: u64) -> Option<egui::ViewportCommand> {
        if let Some(index) = OPTION_KEYS.iter().position(|k| *k == key) {
            self.story.select_option(index, now_ms);
            return None;
        }
        match key {
            egui::Key::Q => return Some(egui::ViewportCommand::Close),
            egui::Key::ArrowRight => {
                self.story.next(Trigger::Key, now_ms);
            }
            egui::Key::ArrowLeft => {
                self.story.prev(Trigger::Key, now_ms);
            }
            egui::Key::ArrowUp | egui::Key::Space => self.story.activate_reveal(now_ms),
            egui::Key::Escape => {
                self.story.skip_quiz(now_ms);
            }
            egui::Key::M => self.toggle_sound(),
            egui::Key::R => {
                if self.story.current_slide() + 1 == self.story.slide_count() {
                    self.story.replay(now_ms);
                }
            }
            egui::Key::D => {
                self.theme = self.theme.toggled();
                self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
            }
            _ => {}
        }
        None
    }

    fn handle_input(&mut self, input: Input, now_ms: u64) -> Option<egui::ViewportCommand> {
        match input {
            Input::Key(key) => return self.handle_key(key, now_ms),
            Input::PointerDown(pos) => {
                if let Some(control) = self.control_at(pos) {
                    self.pressed = Some(control);
                } else {
                    let (x, y) = self.local(pos);
                    self.story.pointer_down(x, y);
                    self.gesture_live = true;
                }
            }
            Input::PointerMove(pos) => {
                if self.gesture_live {
                    let (x, y) = self.local(pos);
                    self.story.pointer_move(x, y, now_ms);
                }
            }
            Input::PointerUp(pos) => {
                if let Some(control) = self.pressed.take() {
                    // Released elsewhere means the press was abandoned.
                    if self.control_at(pos) == Some(control) {
                        self.activate(control, now_ms);
                    }
                } else if self.gesture_live {
                    self.gesture_live = false;
                    let (x, y) = self.local(pos);
                    self.story.pointer_up(x, y, now_ms);
                }
            }
            Input::PointerGone => {
                self.pressed = None;
                if self.gesture_live {
                    self.gesture_live = false;
                    self.story.pointer_cancel(now_ms);
                }
            }
        }
        None
    }

    fn step(&mut self, inputs: Vec<Input>, now_ms: u64) -> Vec<egui::ViewportCommand> {
        self.story.tick(now_ms);
        let mut viewport_cmds = Vec::new();
        for input in inputs {
            viewport_cmds.extend(self.handle_input(input, now_ms));
        }
        self.dispatch(now_ms);
        self.stage.prune(now_ms);
        viewport_cmds
    }

    fn set_story_rect(&mut self, rect: egui::Rect) {
        if rect.size() != self.story_rect.size() {
            self.story.set_viewport(rect.width(), rect.height());
        }
        self.story_rect = rect;
    }
}

fn collect_input(i: &egui::InputState, viewport_cmds: &mut Vec<egui::ViewportCommand>) -> Vec<Input> {
    let mut inputs = Vec::new();
    if i.key_pressed(egui::Key::F) {
        viewport_cmds.push(egui::ViewportCommand::Fullscreen(
            !i.viewport().fullscreen.unwrap_or(false),
        ));
    }
    for key in HANDLED_KEYS.iter().chain(&OPTION_KEYS) {
        if *key != egui::Key::F && i.key_pressed(*key) {
            inputs.push(Input::Key(*key));
        }
    }
    for event in &i.events {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => inputs.push(if *pressed {
                Input::PointerDown(*pos)
            } else {
                Input::PointerUp(*pos)
            }),
            egui::Event::PointerMoved(pos) => inputs.push(Input::PointerMove(*pos)),
            egui::Event::PointerGone => inputs.push(Input::PointerGone),
            _ => {}
        }
    }
    inputs
}

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = self.now_ms();

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let inputs = ctx.input(|i| collect_input(i, &mut viewport_cmds));
        viewport_cmds.extend(self.step(inputs, now_ms));
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let screen = ui.max_rect();
                self.set_story_rect(render::story_rect(screen));
                let rect = self
                    .story_rect
                    .translate(egui::vec2(self.haptics.shake(now_ms), 0.0));

                let view = StoryView {
                    deck: &self.deck,
                    choreographies: &self.choreographies,
                    choreographer: &self.choreographer,
                    stage: &self.stage,
                    theme: &self.theme,
                    current: self.story.current_slide(),
                    muted: self.sound.is_muted(),
                    dwell_ms: self.story.timing().dwell_ms,
                    now_ms,
                };
                let painter = ui.painter();
                self.hits = render::draw_story(painter, &view, rect);
                render::chrome::draw_letterbox(painter, screen, self.story_rect);

                if let Some(toast) = &self.toast {
                    let scale = render::compute_scale(self.story_rect);
                    render::chrome::draw_toast(
                        painter,
                        &toast.message,
                        &self.theme,
                        self.story_rect,
                        toast.opacity(),
                        scale,
                    );
                }
            });

        // The background never stops moving.
        ctx.request_repaint();
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let deck = match &options.deck {
        Some(path) => Deck::load(path)?,
        None => Deck::builtin()?,
    };
    for problem in deck.problems() {
        tracing::warn!("{problem}");
    }

    let config = Config::load_or_default();
    let mut timing = Timing::default();
    if !config.quiz_timer_on() {
        timing.quiz.countdown_ms = None;
    }

    let title = deck.display_title().to_string();
    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([430.0, 900.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };
    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    tracing::info!(deck = %title, slides = deck.slides.len(), "starting story");
    eframe::run_native(
        &title,
        native,
        Box::new(move |_cc| Ok(Box::new(StoryApp::new(deck, &config, timing, &options)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
