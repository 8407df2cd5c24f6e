use std::{path::PathBuf, sync::Arc, time::Duration};

use client_core::{
    download_file_name, ClientConfig, ClientContext, EditPage, EditView, GenerateView,
    GeneratePage, GenerationMutation, MutationState, Navigator, ResultStore, Route,
    DEFAULT_SERVER_URL,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::GenerationResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            download_dir: None,
        }
    }
}

impl StartupConfig {
    /// Resolves the client config; without an explicit directory the user's
    /// download folder is used, then the working directory.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let download_dir = self
            .download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        ClientConfig::new(&self.server_url, download_dir)
    }
}

#[derive(Debug, Clone)]
struct StatusBanner {
    category: UiErrorCategory,
    message: String,
}

impl From<&UiError> for StatusBanner {
    fn from(err: &UiError) -> Self {
        Self {
            category: err.category(),
            message: err.message().to_string(),
        }
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    generate: GeneratePage,
    edit: EditPage,
    mutation: Arc<GenerationMutation>,
    store: Arc<ResultStore>,
    navigator: Navigator,
    server_url: String,
    download_dir: PathBuf,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        context: &ClientContext,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            generate: context.generate_page(),
            edit: context.edit_page(),
            mutation: Arc::clone(&context.mutation),
            store: Arc::clone(&context.store),
            navigator: Navigator::new(),
            server_url: context.config.server_url.to_string(),
            download_dir: context.config.download_dir.clone(),
            status: "Backend worker pending".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::GenerationSettled(state) => {
                    self.status = settled_status(&state);
                    self.status_banner = match &state {
                        MutationState::Error(failure) => Some(StatusBanner::from(
                            &UiError::from_failure(UiErrorContext::Generate, failure),
                        )),
                        _ => None,
                    };
                }
                UiEvent::VideoSaved { path, bytes } => {
                    self.status = format!(
                        "Saved video to {} ({})",
                        path.display(),
                        human_readable_bytes(bytes)
                    );
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.status_banner = Some(StatusBanner::from(&err));
                }
            }
        }
    }

    fn request_generate(&mut self) {
        if !self.generate.can_generate() {
            return;
        }
        let text = self.generate.text().to_string();
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Generate { text },
            &mut self.status,
        ) {
            self.status = "Generating video...".to_string();
            self.status_banner = None;
        }
    }

    fn request_save(&mut self) {
        let Some(result) = self.store.get() else {
            self.status = "Nothing to save yet".to_string();
            return;
        };
        let video = result.video();
        let file_name = match download_file_name(video) {
            Ok(name) => name,
            Err(err) => {
                tracing::error!(error = %err, "cannot derive video file name");
                return;
            }
        };

        let Some(target) = rfd::FileDialog::new()
            .set_directory(&self.download_dir)
            .set_file_name(&file_name)
            .save_file()
        else {
            return;
        };

        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SaveVideo {
                url: video.url.clone(),
                target: target.clone(),
            },
            &mut self.status,
        ) {
            self.status = format!("Downloading video to {}", target.display());
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{}: {}",
                                err_label(banner.category),
                                banner.message
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_generate_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Generate");
        ui.add_space(8.0);

        match self.generate.view() {
            GenerateView::Editor {
                text: _,
                can_generate,
                pending,
                error,
            } => {
                ui.label("Script");
                ui.add_enabled(
                    !pending,
                    egui::TextEdit::multiline(self.generate.text_mut())
                        .hint_text("Write the narration for your video...")
                        .desired_rows(12)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let label = if pending { "Generating..." } else { "Generate" };
                    if ui
                        .add_enabled(can_generate, egui::Button::new(label))
                        .clicked()
                    {
                        self.request_generate();
                    }
                    if pending {
                        ui.spinner();
                    }
                });

                if let Some(error) = error {
                    ui.add_space(6.0);
                    ui.colored_label(egui::Color32::from_rgb(220, 90, 90), error);
                }
            }
            GenerateView::Video { url, name } => {
                ui.label(egui::RichText::new(&name).strong());
                ui.hyperlink_to(&url, &url);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Edit").clicked() {
                        self.generate.edit(&mut self.navigator);
                    }
                    if ui.button("Save").clicked() {
                        self.request_save();
                    }
                    if ui.button("Start over").clicked() {
                        if let Err(err) = self.generate.start_over() {
                            self.status = err.to_string();
                        }
                    }
                });
            }
        }
    }

    fn show_edit_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Edit");
        ui.add_space(8.0);

        match self.edit.view() {
            EditView::Empty => {
                ui.label("Nothing has been generated yet.");
            }
            EditView::Loaded(result) => {
                egui::ScrollArea::vertical().show(ui, |ui| render_result(ui, &result));
            }
        }

        ui.add_space(8.0);
        if ui.button("Back to generate").clicked() {
            self.edit.back(&mut self.navigator);
        }
    }
}

fn render_result(ui: &mut egui::Ui, result: &GenerationResult) {
    ui.label(&result.message);
    ui.label(format!("Execution time: {:.2}s", result.execution_time));
    if !result.keywords.is_empty() {
        ui.label(format!("Keywords: {}", result.keywords.join(", ")));
    }
    ui.separator();

    let media = &result.result;
    egui::Grid::new("generated_media")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Video");
            ui.hyperlink_to(media.video.file_name(), &media.video.url);
            ui.end_row();
            ui.label("Voiceover");
            ui.hyperlink_to(&media.voiceover.name, &media.voiceover.url);
            ui.end_row();
            ui.label("Subtitle");
            ui.hyperlink_to(&media.subtitle.name, &media.subtitle.url);
            ui.end_row();
            for clip in &media.video.clips {
                ui.label("Clip");
                ui.hyperlink_to(&clip.name, &clip.url);
                ui.end_row();
            }
        });

    ui.separator();
    let stock = &result.relevant_videos;
    ui.label(format!("Stock footage from {} ({})", stock.source, stock.keyword));
    if let Some(description) = &stock.description {
        ui.label(description);
    }
    ui.hyperlink_to(&stock.url, &stock.url);
    if let Some(score) = stock.similarity_score {
        ui.label(format!("Similarity: {score:.2}"));
    }
}

fn settled_status(state: &MutationState) -> String {
    match state {
        MutationState::Success(result) => {
            format!("Video ready: {}", result.video().file_name())
        }
        MutationState::Error(failure) => format!("Generation failed: {failure}"),
        MutationState::Idle | MutationState::Pending => "Ready".to_string(),
    }
}

fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("route_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for route in Route::ALL {
                    let selected = self.navigator.current() == route;
                    if ui.selectable_label(selected, route.path()).clicked() {
                        self.navigator.navigate(route);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&self.server_url).weak());
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            match self.navigator.current() {
                Route::Generate => self.show_generate_page(ui),
                Route::Edit => self.show_edit_page(ui),
            }
        });

        if self.mutation.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
