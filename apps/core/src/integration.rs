//! Analysis panel and module routing.
//!
//! Turns the analysis simulator's answer into something a view can always
//! render, and integrates an analysed file into its module page.

use crate::actors::traits::AnalysisSimulator;
use crate::models::{AnalysisModule, AnalysisResult, UploadedFile};
use crate::notify::{Notifier, Toast};
use serde::Serialize;
use tracing::{error, info, warn};

pub const ANALYSIS_UNAVAILABLE_MESSAGE: &str =
    "Impossible d'analyser ce fichier. Veuillez vérifier le format et réessayer.";

/// What the analysis panel shows once loading is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisView {
    Ready { analysis: AnalysisResult },
    Unavailable { message: String },
}

impl AnalysisView {
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisView::Ready { analysis } => Some(analysis),
            AnalysisView::Unavailable { .. } => None,
        }
    }

    fn unavailable() -> Self {
        AnalysisView::Unavailable {
            message: ANALYSIS_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// Requests the analysis of an uploaded file. Errors are surfaced as a
/// destructive notification and an `Unavailable` view.
pub async fn load_analysis<A>(analyzer: &A, notifier: &dyn Notifier, file: &UploadedFile) -> AnalysisView
where
    A: AnalysisSimulator + ?Sized,
{
    match analyzer.analyze(file).await {
        Ok(Some(analysis)) => AnalysisView::Ready { analysis },
        Ok(None) => {
            warn!("No analysis available for {} ({})", file.name, file.id);
            AnalysisView::unavailable()
        }
        Err(e) => {
            error!("Analysis error: {}", e);
            notifier.notify(Toast::error(
                "Erreur d'analyse",
                "Impossible d'analyser ce fichier. Veuillez réessayer.",
            ));
            AnalysisView::unavailable()
        }
    }
}

/// Destination of an integrated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleRoute {
    pub module: AnalysisModule,
    pub path: &'static str,
}

/// Integrates an analysed file into its module and announces it.
pub fn integrate(notifier: &dyn Notifier, file: &UploadedFile, analysis: &AnalysisResult) -> ModuleRoute {
    let module = analysis.module_type;
    info!("Integrating {} into {}", file.name, module);
    notifier.notify(Toast::success(
        "Document intégré avec succès",
        format!(
            "\"{}\" a été intégré au module {}.",
            file.name,
            module.display_name()
        ),
    ));
    ModuleRoute {
        module,
        path: module.route(),
    }
}
