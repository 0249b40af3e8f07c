use std::{sync::Arc, time::Duration};

use client_core::{
    managed_element_ids,
    projector::{
        DIALOGUE_ANIMATION_CLASS, DIALOGUE_BOTTOM_ID, DIALOGUE_TOP_ID, MATCH_STATUS_ID,
        USER_NAME_ID,
    },
    ActionDispatcher, ElementTree, HostBridge, ViewBindings, ViewProjector, LOGIN_BUTTON_ID,
};
use crossbeam_channel::Receiver;
use eframe::egui;
use shared::domain::{PathKind, WebsitePage};

use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::PendingCalls,
};

const DIALOGUE_FADE_SECS: f32 = 0.8;
const IDLE_REPAINT: Duration = Duration::from_millis(100);

/// Every element the shell draws, including the login control the
/// dispatcher locks.
pub fn build_element_tree() -> ElementTree {
    ElementTree::with_elements(managed_element_ids().into_iter().chain([LOGIN_BUTTON_ID]))
}

#[derive(Default)]
struct InputDrafts {
    proxy_secret: String,
    username: String,
    password: String,
    dedi_path: String,
    cluster_path: String,
}

impl InputDrafts {
    fn path_mut(&mut self, kind: PathKind) -> &mut String {
        match kind {
            PathKind::DedicatedServer => &mut self.dedi_path,
            PathKind::Cluster => &mut self.cluster_path,
        }
    }
}

pub struct ShellApp {
    tree: ElementTree,
    projector: ViewProjector,
    dispatcher: ActionDispatcher,
    ui_rx: Receiver<UiEvent>,
    pending: PendingCalls,
    inputs: InputDrafts,
    status: String,
    status_banner: Option<UiError>,
}

impl ShellApp {
    pub fn new(
        bridge: Arc<dyn HostBridge>,
        ui_rx: Receiver<UiEvent>,
        login_cooldown: Duration,
    ) -> Self {
        let mut tree = build_element_tree();
        let projector = ViewProjector::new(ViewBindings::resolve(&tree));
        let mut dispatcher = ActionDispatcher::new(&tree, login_cooldown);
        dispatcher.attach_bridge(bridge);
        projector.initialize(&mut tree);

        Self {
            tree,
            projector,
            dispatcher,
            ui_rx,
            pending: PendingCalls::default(),
            inputs: InputDrafts::default(),
            status: "Starting host...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Notification(notification) => {
                    self.projector.apply(&mut self.tree, &notification);
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status_banner = Some(err);
                }
                UiEvent::PathPicked { kind, path } => {
                    *self.inputs.path_mut(kind) = path;
                }
            }
        }

        if let Some(err) = self.pending.poll().pop() {
            self.status_banner = Some(err);
        }
    }

    fn visible(&self, id: &str) -> bool {
        self.tree.is_visible(id)
    }

    /// The "Logged in as" line, only while signed in with a known name.
    fn identity_line(&self) -> Option<&str> {
        if !self.visible("connected-section") {
            return None;
        }
        self.tree.text(USER_NAME_ID).filter(|text| {
            text.strip_prefix("Logged in as")
                .is_some_and(|name| !name.trim().is_empty())
        })
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Ranked DST");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(text) = self.identity_line() {
                    ui.weak(text);
                }
            });
        });
        ui.weak(&self.status);

        let mut dismiss = false;
        if let Some(err) = &self.status_banner {
            egui::Frame::NONE
                .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(ui.visuals().error_fg_color, err.banner_text());
                        dismiss = ui.small_button("x").clicked();
                    });
                });
        }
        if dismiss {
            self.status_banner = None;
        }
    }

    fn show_connection_sections(&mut self, ui: &mut egui::Ui) {
        if self.visible("login-section") {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Sign in").strong());
                ui.add(egui::TextEdit::singleline(&mut self.inputs.username).hint_text("Username"));
                ui.add(
                    egui::TextEdit::singleline(&mut self.inputs.password)
                        .password(true)
                        .hint_text("Password"),
                );
                self.show_login_button(ui);
            });
        }

        if self.visible("proxy-secret-section") {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Proxy secret").strong());
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.inputs.proxy_secret)
                            .password(true)
                            .hint_text("Paste the secret from the website"),
                    );
                    if ui.button("Save").clicked() {
                        let call = self.dispatcher.save_proxy_secret(&self.inputs.proxy_secret);
                        self.pending.track(call);
                    }
                });
            });
        }

        if self.visible("no-connection-section") {
            ui.colored_label(
                ui.visuals().warn_fg_color,
                "The ranked server is unreachable. Retrying in the background.",
            );
        }

        if self.visible("connecting-section") {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Connecting...");
            });
        }

        if self.visible("connected-section") {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Connected").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Log out").clicked() {
                            let call = self.dispatcher.logout(&self.projector, &mut self.tree);
                            self.pending.track(call);
                        }
                    });
                });
                ui.horizontal_wrapped(|ui| {
                    for page in WebsitePage::ALL {
                        if ui.link(page.as_str()).clicked() {
                            let call = self.dispatcher.open_website(page.as_str());
                            self.pending.track(call);
                        }
                    }
                });
                self.show_path_row(ui, PathKind::DedicatedServer, "Dedicated server");
                self.show_path_row(ui, PathKind::Cluster, "Cluster folder");
                ui.horizontal(|ui| {
                    if ui.button("Start server").clicked() {
                        let call = self.dispatcher.start_server();
                        self.pending.track(call);
                    }
                    if ui.button("Stop server").clicked() {
                        let call = self.dispatcher.stop_server();
                        self.pending.track(call);
                    }
                });
            });
        }
    }

    fn show_login_button(&mut self, ui: &mut egui::Ui) {
        let (enabled, opacity) = self
            .tree
            .get(LOGIN_BUTTON_ID)
            .map(|button| (button.is_interactive(), button.opacity()))
            .unwrap_or((true, 1.0));

        ui.scope(|ui| {
            ui.multiply_opacity(opacity);
            if ui.add_enabled(enabled, egui::Button::new("Log in")).clicked() {
                let call = self.dispatcher.login_clicked(
                    &mut self.tree,
                    &self.inputs.username,
                    &self.inputs.password,
                );
                self.pending.track(call);
            }
        });
    }

    fn show_path_row(&mut self, ui: &mut egui::Ui, kind: PathKind, label: &str) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.text_edit_singleline(self.inputs.path_mut(kind));
            if ui.button("Browse").clicked() {
                let call = self.dispatcher.open_file_explorer(kind);
                self.pending.track(call);
            }
            if ui.button("Submit").clicked() {
                let call = match kind {
                    PathKind::DedicatedServer => {
                        self.dispatcher.submit_path(&self.inputs.dedi_path, kind)
                    }
                    PathKind::Cluster => self.dispatcher.submit_path(&self.inputs.cluster_path, kind),
                };
                self.pending.track(call);
            }
        });
    }

    fn show_match_sections(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Match:");
            ui.monospace(self.tree.text(MATCH_STATUS_ID).unwrap_or_default());
        });

        for (id, heading) in [
            ("no-match-section", "No live match"),
            ("world-generating-section", "Generating world"),
            ("world-ready-section", "World ready"),
            ("in-progress-section", "Match in progress"),
            ("completed-section", "Run complete"),
        ] {
            if self.visible(id) {
                ui.label(egui::RichText::new(heading).strong().size(18.0));
            }
        }

        ui.add_space(8.0);
        self.show_dialogue_line(ui, DIALOGUE_TOP_ID);
        self.show_dialogue_line(ui, DIALOGUE_BOTTOM_ID);
    }

    /// Fades the line in from the moment the animation class was last re-added.
    fn show_dialogue_line(&self, ui: &mut egui::Ui, id: &str) {
        let Some(element) = self.tree.get(id) else {
            return;
        };
        let progress = element
            .class_added_at(DIALOGUE_ANIMATION_CLASS)
            .map(|started| (started.elapsed().as_secs_f32() / DIALOGUE_FADE_SECS).clamp(0.0, 1.0))
            .unwrap_or(1.0);

        ui.scope(|ui| {
            ui.multiply_opacity(progress);
            ui.label(egui::RichText::new(element.text()).italics());
        });
        if progress < 1.0 {
            ui.ctx().request_repaint();
        }
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.dispatcher.poll_login_cooldown(&mut self.tree);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_header(ui);
            ui.add_space(6.0);
            self.show_connection_sections(ui);
            self.show_match_sections(ui);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                if ui.small_button("Test host").clicked() {
                    let call = self.dispatcher.test_button();
                    self.pending.track(call);
                }
            });
        });

        ctx.request_repaint_after(IDLE_REPAINT);
    }
}
