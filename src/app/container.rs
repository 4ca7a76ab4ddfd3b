use std::sync::Arc;

use crate::adapters::{FfmpegPreviewAdapter, FfmpegRenderAdapter, FfprobeAdapter, StderrAlert};
use crate::app::{export_interactor::ExportInteractor, import_interactor::ImportInteractor};
use crate::config::EditorConfig;
use crate::ports::{AlertPort, PreviewPort, ProbePort, RenderPort};

pub trait AppContainer: Send + Sync {
    fn import_interactor(&self) -> Arc<ImportInteractor>;
    fn export_interactor(&self) -> Arc<ExportInteractor>;
    fn probe_port(&self) -> Arc<dyn ProbePort>;
    fn config(&self) -> &EditorConfig;
}

pub struct DefaultAppContainer {
    config: EditorConfig,
    probe_port: Arc<dyn ProbePort>,
    import_interactor: Arc<ImportInteractor>,
    export_interactor: Arc<ExportInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffmpeg-backed adapters described by `config`
    pub fn new(config: EditorConfig) -> Self {
        let probe_port: Arc<dyn ProbePort> = Arc::new(FfprobeAdapter::new(config.tools.ffprobe()));
        let preview_port: Option<Arc<dyn PreviewPort>> = if config.import.generate_previews {
            Some(Arc::new(FfmpegPreviewAdapter::new(
                config.tools.ffmpeg(),
                config.preview.clone(),
            )))
        } else {
            None
        };
        let render_port: Arc<dyn RenderPort> = Arc::new(FfmpegRenderAdapter::new(
            config.tools.ffmpeg(),
            config.render.threads,
        ));
        let alert_port: Arc<dyn AlertPort> = Arc::new(StderrAlert);

        Self::with_ports(config, probe_port, preview_port, render_port, alert_port)
    }

    /// Wire explicit port implementations
    pub fn with_ports(
        config: EditorConfig,
        probe_port: Arc<dyn ProbePort>,
        preview_port: Option<Arc<dyn PreviewPort>>,
        render_port: Arc<dyn RenderPort>,
        alert_port: Arc<dyn AlertPort>,
    ) -> Self {
        let import_interactor = Arc::new(ImportInteractor::new(
            Arc::clone(&probe_port),
            preview_port,
            alert_port,
            config.import.default_duration,
        ));
        let export_interactor = Arc::new(ExportInteractor::new(render_port));

        Self {
            config,
            probe_port,
            import_interactor,
            export_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn import_interactor(&self) -> Arc<ImportInteractor> {
        Arc::clone(&self.import_interactor)
    }

    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }

    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }

    fn config(&self) -> &EditorConfig {
        &self.config
    }
}
