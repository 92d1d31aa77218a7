use std::{cell::RefCell, rc::Rc, sync::Arc};

use client_core::{
    validator, BoardView, MoveError, RenderDispatcher, RulesEngine, SessionController,
    StandardRules,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::GameStatus;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme::{self, lighten_color};

const CELL_GAP: f32 = 2.0;

/// Text and colour of the line above the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub text: String,
    pub color: Option<egui::Color32>,
}

/// Picks the headline for the latest frame. A rejection only shows while the
/// frame it was raised against is still current.
pub fn headline_for(
    view: Option<&BoardView>,
    rejection: Option<(u64, MoveError)>,
    connect_error: Option<&str>,
    endpoint: &str,
) -> Headline {
    if let Some(err) = connect_error {
        return Headline {
            text: format!("Connection failed: {err}"),
            color: theme::headline_color(GameStatus::Error),
        };
    }
    let Some(view) = view else {
        return Headline {
            text: format!("Connecting to {endpoint}..."),
            color: None,
        };
    };
    if let Some((version, err)) = rejection {
        if version == view.version() && !view.status().is_terminal() {
            return Headline {
                text: err.to_string(),
                color: Some(theme::REJECTION),
            };
        }
    }
    Headline {
        text: view.headline().to_string(),
        color: theme::headline_color(view.status()),
    }
}

/// Cells accept clicks on the local turn when they are a legal target or
/// already occupied; occupied cells answer with a rejection.
pub fn cell_enabled(view: &BoardView, rules: &dyn RulesEngine, row: usize, col: usize) -> bool {
    if !view.is_local_turn() {
        return false;
    }
    let occupied = view
        .contents_at(row, col)
        .map(|cell| !cell.is_empty())
        .unwrap_or(false);
    occupied || validator::is_legal(rules, view, row, col)
}

pub struct ReversiApp {
    endpoint: String,
    dispatcher: RenderDispatcher,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: Option<Arc<SessionController>>,
    frame: Rc<RefCell<Option<BoardView>>>,
    rejection: Option<(u64, MoveError)>,
    connect_error: Option<String>,
    rules: StandardRules,
}

impl ReversiApp {
    pub fn new(
        endpoint: String,
        dispatcher: RenderDispatcher,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            endpoint,
            dispatcher,
            cmd_tx,
            ui_rx,
            session: None,
            frame: Rc::new(RefCell::new(None)),
            rejection: None,
            connect_error: None,
            rules: StandardRules,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Connected(session) => {
                    let frame = Rc::clone(&self.frame);
                    session.register_render_callback(&mut self.dispatcher, move |view| {
                        *frame.borrow_mut() = Some(view.clone());
                    });
                    *self.frame.borrow_mut() = session.snapshot().map(|view| (*view).clone());
                    self.session = Some(session);
                }
                UiEvent::ConnectFailed(message) => {
                    self.connect_error = Some(message);
                }
            }
        }
    }

    fn show_headline(&self, ctx: &egui::Context) {
        let frame = self.frame.borrow();
        let headline = headline_for(
            frame.as_ref(),
            self.rejection,
            self.connect_error.as_deref(),
            &self.endpoint,
        );

        egui::TopBottomPanel::top("headline").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let mut text = egui::RichText::new(headline.text).size(22.0).strong();
                if let Some(color) = headline.color {
                    text = text.color(color);
                }
                ui.label(text);
            });
            ui.add_space(8.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        let frame = self.frame.borrow();
        let (moves, running) = match frame.as_ref() {
            Some(view) => (view.moves_text(), view.status().run_state_text()),
            None => (String::new(), "Stopped"),
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(moves);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(running);
                });
            });
        });
    }

    fn show_board(&mut self, ctx: &egui::Context) {
        let Some(view) = self.frame.borrow().clone() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            });
            return;
        };

        let dims = view.dimensions();
        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let side = ((available.x / dims.cols as f32).min(available.y / dims.rows as f32)
                - CELL_GAP)
                .max(12.0);

            ui.scope(|ui| {
                let visuals = ui.visuals_mut();
                visuals.widgets.inactive.weak_bg_fill = theme::BOARD_FELT;
                visuals.widgets.inactive.bg_fill = theme::BOARD_FELT;
                visuals.widgets.hovered.weak_bg_fill = lighten_color(theme::BOARD_FELT, 0.25);
                visuals.widgets.hovered.bg_fill = lighten_color(theme::BOARD_FELT, 0.25);
                visuals.widgets.active.weak_bg_fill = lighten_color(theme::BOARD_FELT, 0.4);
                visuals.widgets.active.bg_fill = lighten_color(theme::BOARD_FELT, 0.4);
                ui.spacing_mut().item_spacing = egui::vec2(CELL_GAP, CELL_GAP);

                for row in 0..dims.rows {
                    ui.horizontal(|ui| {
                        for col in 0..dims.cols {
                            let cell = view.contents_at(row, col).unwrap_or_default();
                            let glyph = match theme::disc_color(cell) {
                                Some(color) => {
                                    egui::RichText::new("●").size(side * 0.7).color(color)
                                }
                                None => egui::RichText::new(" ").size(side * 0.7),
                            };
                            let enabled = cell_enabled(&view, &self.rules, row, col);
                            let button = egui::Button::new(glyph)
                                .min_size(egui::vec2(side, side))
                                .corner_radius(2.0);
                            if ui.add_enabled(enabled, button).clicked() {
                                clicked = Some((row, col));
                            }
                        }
                    });
                }
            });
        });

        if let Some((row, col)) = clicked {
            self.submit(&view, row, col);
        }
    }

    fn submit(&mut self, view: &BoardView, row: usize, col: usize) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match session.submit_move_intent(row, col) {
            Ok(()) => self.rejection = None,
            Err(err) => {
                tracing::debug!(row, col, "move rejected: {err}");
                self.rejection = Some((view.version(), err));
            }
        }
    }
}

impl eframe::App for ReversiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if self.session.is_some() {
            self.dispatcher.run_pending();
        }

        self.show_headline(ctx);
        self.show_status_bar(ctx);
        self.show_board(ctx);
    }
}

impl Drop for ReversiApp {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
