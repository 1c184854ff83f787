use crate::{Autoplay, CarouselPhase, GalleryPhase, Notice, SlideRole};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub gallery: GalleryView,
    pub carousel: CarouselView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryView {
    pub phase: GalleryPhase,
    pub username: Option<String>,
    pub candidates: usize,
    pub tiles: Vec<TileView>,
    pub notice: Option<Notice>,
    /// `(settled, total)` while probing.
    pub progress: Option<(usize, usize)>,
    pub verified_so_far: usize,
    pub lightbox: Option<LightboxView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxView {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarouselView {
    pub current: usize,
    pub roles: Vec<SlideRole>,
    pub phase: CarouselPhase,
    pub autoplay: Autoplay,
}
