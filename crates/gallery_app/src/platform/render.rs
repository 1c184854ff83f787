use gallery_core::{AppViewModel, GalleryPhase, Notice, SlideRole};

/// Terminal lines for the current view.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let gallery = &view.gallery;
    let mut lines = Vec::new();

    match gallery.phase {
        GalleryPhase::Idle => {}
        GalleryPhase::Loading => lines.push("Loading gallery images...".to_string()),
        GalleryPhase::Probing => {
            let (settled, total) = gallery.progress.unwrap_or((0, gallery.candidates));
            lines.push(format!(
                "Testing images... {settled}/{total} ({} loaded)",
                gallery.verified_so_far
            ));
        }
        GalleryPhase::Ready => {
            let username = gallery.username.as_deref().unwrap_or_default();
            lines.push(format!("@{username}: {} images", gallery.tiles.len()));
            for (index, tile) in gallery.tiles.iter().enumerate() {
                lines.push(format!("  [{:>2}] {} -> {}", index + 1, tile.alt, tile.url));
            }
            if !view.carousel.roles.is_empty() {
                lines.push(format!("  slides {}", render_indicators(&view.carousel.roles)));
            }
        }
        GalleryPhase::Failed => {}
    }

    if let Some(notice) = &gallery.notice {
        lines.push(render_notice(notice));
    }
    if let Some(lightbox) = &gallery.lightbox {
        lines.push(format!("Viewing {}: {}", lightbox.title, lightbox.url));
    }
    lines
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::NoImagesFound => "Error: no images found".to_string(),
        Notice::NoneLoaded => {
            "Error: none of the images could be loaded. Please try again later.".to_string()
        }
        Notice::LowSupply { verified, wanted } => {
            format!("Warning: only {verified} of {wanted} wanted images loaded")
        }
        Notice::LoadFailed { message } => format!("Error: {message}"),
    }
}

fn render_indicators(roles: &[SlideRole]) -> String {
    roles
        .iter()
        .map(|role| match role {
            SlideRole::Active => "[*]",
            SlideRole::Previous => "[<]",
            SlideRole::Next => "[>]",
            SlideRole::Hidden => "[ ]",
        })
        .collect()
}
