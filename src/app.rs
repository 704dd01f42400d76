//! Panya chat window: egui/eframe application.
//!
//! # Architecture
//!
//! [`PanyaApp`] is the top-level [`eframe::App`].  It owns the
//! [`ChatSession`] and two channel endpoints:
//!
//! * `request_tx` sends [`ChatRequest`]s to the [`RequestRunner`](crate::session::RequestRunner).
//! * `event_rx` receives [`RunnerEvent`]s, drained without blocking at the
//!   start of every frame.
//!
//! # Layout
//!
//! | Area | Contents |
//! |------|----------|
//! | Header | Title, subtitle, "Save transcript" |
//! | Centre | Message bubbles, code blocks with copy buttons, loading dots |
//! | Footer | Notices, attachment chip, text field, attach / mic / send |
//! | Modal | Recording timer, level bars, start / stop / cancel |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::audio::{Microphone, WaveformData};
use crate::chat::Message;
use crate::config::{AppConfig, AppPaths};
use crate::recording::RecordingPhase;
use crate::render::markup::{self, Block};
use crate::render::CopyFlags;
use crate::session::{ChatSession, NoticeKind, RunnerEvent};
use crate::transport::{fallback_message, ChatRequest, Endpoint, TransportError};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 161, 224);
const USER_TEXT: egui::Color32 = egui::Color32::WHITE;
const ASSISTANT_BG: egui::Color32 = egui::Color32::from_rgb(245, 247, 250);
const CODE_BG: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const CODE_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 220, 220);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 60);
const RECORDING_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 68, 68);

const WAVEFORM_BARS: usize = 32;

/// System fonts tried, in order, for Thai glyphs.
const THAI_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\tahoma.ttf",
    "C:\\Windows\\Fonts\\LeelawUI.ttf",
    "/System/Library/Fonts/Supplemental/Thonburi.ttc",
    "/usr/share/fonts/truetype/tlwg/Loma.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansThai-Regular.ttf",
];

// ---------------------------------------------------------------------------
// PanyaApp
// ---------------------------------------------------------------------------

pub struct PanyaApp {
    session: ChatSession,
    config: AppConfig,
    paths: AppPaths,
    microphone: Microphone,

    // ── UI state ─────────────────────────────────────────────────────────
    copy_flags: CopyFlags,
    /// Path typed into the attach row; `None` while the row is hidden.
    attach_path: Option<String>,
    /// Message count at the last frame, to scroll when it grows.
    seen_messages: usize,

    // ── Channels ─────────────────────────────────────────────────────────
    request_tx: mpsc::Sender<ChatRequest>,
    event_rx: mpsc::Receiver<RunnerEvent>,
}

impl PanyaApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        paths: AppPaths,
        request_tx: mpsc::Sender<ChatRequest>,
        event_rx: mpsc::Receiver<RunnerEvent>,
    ) -> Self {
        install_thai_font(&cc.egui_ctx);

        Self {
            session: ChatSession::new(&config),
            microphone: Microphone::new(config.audio.input_device.clone()),
            config,
            paths,
            copy_flags: CopyFlags::new(),
            attach_path: None,
            seen_messages: 0,
            request_tx,
            event_rx,
        }
    }

    // ── Channel plumbing ─────────────────────────────────────────────────

    /// Drain all pending runner events (non-blocking).
    fn poll_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                RunnerEvent::Answer(answer) => self.session.receive_answer(answer),
                RunnerEvent::Transcript(result) => self.session.receive_transcript(result, now),
            }
        }
    }

    /// Hand a request to the runner.  If the runner cannot take it, answer
    /// locally so the composer and the recorder never stay stuck.
    fn dispatch(&mut self, request: ChatRequest) {
        let endpoint = request.endpoint();
        let reason = match self.request_tx.try_send(request) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => "request queue full",
            Err(TrySendError::Closed(_)) => "request runner stopped",
        };

        log::error!("app: {reason}, cannot reach {}", endpoint.path());
        match endpoint {
            Endpoint::Transcribe => self
                .session
                .receive_transcript(Err(TransportError::Request(reason.into())), Instant::now()),
            Endpoint::Text | Endpoint::Image => self
                .session
                .receive_answer(fallback_message(endpoint).to_string()),
        }
    }

    fn send_draft(&mut self) {
        if let Some(request) = self.session.submit() {
            self.dispatch(request);
        }
    }

    /// Attach files dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let now = Instant::now();
        for file in dropped {
            if let Some(path) = &file.path {
                self.session.attach_file(path, now);
            } else if let Some(bytes) = &file.bytes {
                self.session.attach_bytes(&file.name, bytes.to_vec(), now);
            }
        }
    }

    // ── Header ───────────────────────────────────────────────────────────

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(&self.config.ui.title)
                        .color(ACCENT)
                        .size(20.0)
                        .strong(),
                );
                ui.label(
                    egui::RichText::new(&self.config.ui.subtitle)
                        .color(egui::Color32::GRAY)
                        .size(12.0),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Save transcript").clicked() {
                    let dir = self.paths.transcripts_dir.clone();
                    self.session
                        .export_transcript(&self.config.ui.title, &dir, Instant::now());
                }
            });
        });
        ui.add_space(4.0);
    }

    // ── Messages ─────────────────────────────────────────────────────────

    fn draw_messages(&mut self, ui: &mut egui::Ui) {
        let count = self.session.conversation().len();
        let grew = count != self.seen_messages;
        self.seen_messages = count;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(8.0);
                let messages: Vec<Message> = self.session.conversation().messages().to_vec();
                for (index, message) in messages.iter().enumerate() {
                    self.draw_bubble(ui, index, message);
                    ui.add_space(8.0);
                }

                if self.session.composer().is_busy() {
                    draw_loading_dots(ui);
                }

                if grew {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }

    fn draw_bubble(&mut self, ui: &mut egui::Ui, index: usize, message: &Message) {
        let max_width = ui.available_width() * 0.8;
        let (fill, text_color, layout) = if message.is_user() {
            (
                ACCENT,
                USER_TEXT,
                egui::Layout::right_to_left(egui::Align::TOP),
            )
        } else {
            (
                ASSISTANT_BG,
                egui::Color32::from_rgb(40, 40, 40),
                egui::Layout::left_to_right(egui::Align::TOP),
            )
        };

        ui.with_layout(layout, |ui| {
            egui::Frame::new()
                .fill(fill)
                .corner_radius(egui::CornerRadius::same(12))
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.vertical(|ui| {
                        if let Some(image) = &message.image {
                            ui.label(
                                egui::RichText::new(format!(
                                    "[image] {} ({})",
                                    image.file_name,
                                    image.size_label()
                                ))
                                .color(text_color)
                                .italics(),
                            );
                        }
                        if let Some(text) = &message.text {
                            let blocks = markup::parse(text);
                            for (block_index, block) in blocks.iter().enumerate() {
                                self.draw_block(ui, (index, block_index), block, text_color);
                            }
                        }
                    });
                });
        });
    }

    fn draw_block(
        &mut self,
        ui: &mut egui::Ui,
        key: (usize, usize),
        block: &Block,
        text_color: egui::Color32,
    ) {
        match block {
            Block::Prose(lines) => {
                for line in lines {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        if line.is_empty() {
                            ui.label(" ");
                        }
                        for span in line {
                            let mut text = egui::RichText::new(&span.text).color(text_color);
                            if span.bold {
                                text = text.strong();
                            }
                            ui.label(text);
                        }
                    });
                }
            }
            Block::Code { lang, code } => {
                let now = Instant::now();
                egui::Frame::new()
                    .fill(CODE_BG)
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(lang.as_deref().unwrap_or("code"))
                                    .color(egui::Color32::GRAY)
                                    .size(11.0),
                            );
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    let label = if self.copy_flags.is_copied(key, now) {
                                        "Copied!"
                                    } else {
                                        "Copy"
                                    };
                                    if ui.small_button(label).clicked() {
                                        ui.ctx().copy_text(code.clone());
                                        self.copy_flags.mark(key, now);
                                    }
                                },
                            );
                        });
                        ui.label(egui::RichText::new(code).monospace().color(CODE_TEXT));
                    });
            }
        }
    }

    // ── Footer ───────────────────────────────────────────────────────────

    fn draw_notices(&mut self, ui: &mut egui::Ui) {
        let mut dismissed = None;
        for (index, notice) in self.session.notices().iter().enumerate() {
            let color = match notice.kind {
                NoticeKind::Info => ACCENT,
                NoticeKind::Error => ERROR_COLOR,
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&notice.message).color(color));
                if ui.small_button("x").clicked() {
                    dismissed = Some(index);
                }
            });
        }
        if let Some(index) = dismissed {
            self.session.dismiss_notice(index);
        }
    }

    fn draw_composer(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        self.draw_notices(ui);

        if let Some(attachment) = self.session.composer().attachment() {
            let chip = format!("[image] {} ({})", attachment.file_name, attachment.size_label());
            let mut remove = false;
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(chip).color(ACCENT));
                remove = ui.small_button("Remove").clicked();
            });
            if remove {
                self.session.composer_mut().clear_attachment();
            }
        }

        if let Some(path) = self.attach_path.as_mut() {
            let mut attach = false;
            let mut close = false;
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(path)
                        .hint_text("Image path (or drop a file onto the window)")
                        .desired_width(ui.available_width() - 120.0),
                );
                attach = ui.button("Attach").clicked()
                    || (response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)));
                close = ui.button("Close").clicked();
            });
            if attach && !path.trim().is_empty() {
                let target = PathBuf::from(path.trim());
                self.session.attach_file(&target, Instant::now());
                close = true;
            }
            if close {
                self.attach_path = None;
            }
        }

        let busy = self.session.composer().is_busy();
        let recorder_open = self.session.recorder().is_some();
        let mut send = false;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!busy, egui::Button::new("Image"))
                .on_hover_text("Attach an image")
                .clicked()
            {
                self.attach_path = Some(String::new());
            }
            if ui
                .add_enabled(!busy && !recorder_open, egui::Button::new("Mic"))
                .on_hover_text("Dictate with the microphone")
                .clicked()
            {
                self.session.open_recorder();
            }

            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(self.session.composer_mut().draft_mut())
                    .hint_text("Ask about PLCnext...")
                    .desired_width(ui.available_width() - 70.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send = true;
                response.request_focus();
            }

            let can_send = self.session.composer().can_submit();
            if ui
                .add_enabled(can_send, egui::Button::new("Send").fill(ACCENT))
                .clicked()
            {
                send = true;
            }
        });
        ui.add_space(6.0);

        if send {
            self.send_draft();
        }
    }

    // ── Recording modal ──────────────────────────────────────────────────

    fn draw_recorder(&mut self, ctx: &egui::Context) {
        let Some(recorder) = self.session.recorder() else {
            return;
        };

        let elapsed = recorder.elapsed_secs();
        let limit = recorder.max_secs();
        let waveform = recorder.waveform(WAVEFORM_BARS);
        let phase = match recorder.phase() {
            RecordingPhase::Idle => Phase::Idle,
            RecordingPhase::Recording(_) => Phase::Recording,
            RecordingPhase::Transcribing { .. } => Phase::Transcribing,
        };

        let mut open = true;
        let mut action = None;

        egui::Window::new("Voice input")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.set_min_width(280.0);
                ui.horizontal(|ui| {
                    let (text, color) = match phase {
                        Phase::Idle => ("Ready to record", egui::Color32::GRAY),
                        Phase::Recording => ("Recording", RECORDING_COLOR),
                        Phase::Transcribing => ("Transcribing...", ACCENT),
                    };
                    ui.label(egui::RichText::new(text).color(color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut timer = format_clock(elapsed);
                        if limit > 0 {
                            timer.push_str(&format!(" / {}", format_clock(limit)));
                        }
                        ui.label(egui::RichText::new(timer).monospace());
                    });
                });

                ui.add_space(4.0);
                draw_waveform(ui, &waveform);
                ui.add_space(6.0);

                ui.horizontal(|ui| match phase {
                    Phase::Idle => {
                        if ui.button("Start").clicked() {
                            action = Some(RecorderAction::Start);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(RecorderAction::Cancel);
                        }
                    }
                    Phase::Recording => {
                        if ui.button("Stop").clicked() {
                            action = Some(RecorderAction::Stop);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(RecorderAction::Cancel);
                        }
                    }
                    Phase::Transcribing => {
                        ui.spinner();
                    }
                });
            });

        if !open && phase != Phase::Transcribing {
            action = Some(RecorderAction::Cancel);
        }

        let now = Instant::now();
        match action {
            Some(RecorderAction::Start) => self.session.start_recording(&self.microphone, now),
            Some(RecorderAction::Stop) => {
                if let Some(request) = self.session.stop_recording(now) {
                    self.dispatch(request);
                }
            }
            Some(RecorderAction::Cancel) => self.session.cancel_recording(),
            None => {}
        }
    }

    /// Whether anything on screen is animating or time-driven.
    fn needs_repaint(&self) -> Option<Duration> {
        if self.session.recorder().is_some_and(|r| r.holds_device()) {
            return Some(Duration::from_millis(33));
        }
        if self.session.composer().is_busy() || self.session.recorder().is_some() {
            return Some(Duration::from_millis(66));
        }
        if self.copy_flags.any_active() || !self.session.notices().is_empty() {
            return Some(Duration::from_millis(250));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Recording,
    Transcribing,
}

#[derive(Debug, Clone, Copy)]
enum RecorderAction {
    Start,
    Stop,
    Cancel,
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Three dots pulsing in turn while a reply is pending.
fn draw_loading_dots(ui: &mut egui::Ui) {
    let time = ui.input(|i| i.time) as f32;
    egui::Frame::new()
        .fill(ASSISTANT_BG)
        .corner_radius(egui::CornerRadius::same(12))
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(36.0, 10.0), egui::Sense::hover());
            let painter = ui.painter();
            for i in 0..3 {
                let phase = time * 4.0 - i as f32 * 0.7;
                let alpha = 0.3 + 0.7 * (phase.sin() * 0.5 + 0.5);
                let center = egui::pos2(rect.left() + 6.0 + i as f32 * 12.0, rect.center().y);
                painter.circle_filled(center, 4.0, egui::Color32::GRAY.gamma_multiply(alpha));
            }
        });
}

/// Level bars for the recording modal.
fn draw_waveform(ui: &mut egui::Ui, waveform: &WaveformData) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 36.0),
        egui::Sense::hover(),
    );

    let painter = ui.painter();
    let num_bars = waveform.bars.len().max(1);
    let bar_width = rect.width() / num_bars as f32;

    for (i, &amplitude) in waveform.bars.iter().enumerate() {
        let x = rect.left() + i as f32 * bar_width;
        // RMS of speech rarely exceeds 0.3; scale so normal speech fills the box.
        let bar_height = (amplitude * 3.0 * rect.height()).clamp(2.0, rect.height());

        painter.rect_filled(
            egui::Rect::from_center_size(
                egui::pos2(x + bar_width / 2.0, rect.center().y),
                egui::vec2((bar_width * 0.65).max(1.0), bar_height),
            ),
            1.0,
            RECORDING_COLOR,
        );
    }
}

/// `m:ss`
fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Add the first Thai-capable system font found as a fallback for every family.
fn install_thai_font(ctx: &egui::Context) {
    let Some((path, bytes)) = THAI_FONT_CANDIDATES
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|bytes| (*p, bytes)))
    else {
        log::warn!("app: no Thai font found; Thai text may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("thai".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("thai".to_owned());
    }
    ctx.set_fonts(fonts);
    log::info!("app: using {path} for Thai text");
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for PanyaApp {
    /// Called every frame by eframe.  Polls channels and timers, then renders.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // --- Poll non-blocking channels and timers ------------------------
        self.poll_events();
        if let Some(request) = self.session.poll_recording(now) {
            self.dispatch(request);
        }
        self.session.expire_notices(now);
        self.copy_flags.expire(now);
        self.handle_dropped_files(ctx);

        if let Some(after) = self.needs_repaint() {
            ctx.request_repaint_after(after);
        }

        // --- Panels -------------------------------------------------------
        egui::TopBottomPanel::top("header").show(ctx, |ui| self.draw_header(ui));
        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| self.draw_composer(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.draw_messages(ui));

        self.draw_recorder(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.session.recorder().is_some() {
            self.session.cancel_recording();
        }
        log::info!("Panya chat closing");
    }
}
