use gallery_core::{AppViewModel, DisplaySelection, GalleryPhase, Notice};
use gallery_engine::ProbeResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeLine {
    pub index: usize,
    pub url: String,
    pub verified: bool,
}

/// Final summary printed as JSON once the gallery settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryReport {
    pub phase: GalleryPhase,
    pub username: Option<String>,
    pub candidates: usize,
    pub selection: Option<DisplaySelection>,
    pub notice: Option<Notice>,
    pub checked_utc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<ProbeLine>>,
}

impl GalleryReport {
    pub fn build(
        view: &AppViewModel,
        selection: Option<&DisplaySelection>,
        probes: Option<&[ProbeResult]>,
        checked_utc: String,
    ) -> Self {
        let probes = probes.map(|results| {
            let mut lines: Vec<ProbeLine> = results
                .iter()
                .map(|result| ProbeLine {
                    index: result.index,
                    url: result.url.clone(),
                    verified: result.verified,
                })
                .collect();
            // Probes arrive in completion order.
            lines.sort_by_key(|line| line.index);
            lines
        });

        Self {
            phase: view.gallery.phase,
            username: view.gallery.username.clone(),
            candidates: view.gallery.candidates,
            selection: selection.cloned(),
            notice: view.gallery.notice.clone(),
            checked_utc,
            probes,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
