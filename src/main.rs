use sketch_studio::app::SketchApp;
use sketch_studio::gen::{GeminiClient, GenerationController, PromptTemplate};
use sketch_studio::logging;
use sketch_studio::settings::{Settings, SETTINGS_FILE};

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE);
    logging::init(settings.debug_logging);

    // A missing key degrades to an empty credential: the app still starts and
    // the first request fails through the normal error path.
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set, generation requests will fail");
    }

    let client = Arc::new(GeminiClient::new(
        api_key,
        settings.model.clone(),
        Some(Duration::from_secs(settings.request_timeout_secs)),
    )?);
    let controller = GenerationController::new(
        client,
        PromptTemplate::new(settings.instruction_template.clone()),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("AI Sketch Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "AI Sketch Studio",
        native_options,
        Box::new(move |_cc| Box::new(SketchApp::new(settings, controller))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start UI: {err}"))
}
